use super::*;

use partscout_core::{
    AggregateResult, AppConfig, Availability, Dealership, PriceQuote, SearchResultRow,
};

fn test_config() -> AppConfig {
    AppConfig {
        base_url: "https://parts.ford.com".to_owned(),
        store_id: "1405".to_owned(),
        catalog_id: "251".to_owned(),
        log_level: "info".to_owned(),
        request_timeout_secs: 20,
        max_retries: 3,
        retry_backoff_base_ms: 100,
        concurrency: 10,
        max_dealerships: 1_000_000,
        radius_miles: 100.0,
        user_agent: "partscout-test/0.1".to_owned(),
        accept_language: "en-US,en;q=0.9".to_owned(),
    }
}

fn search_args(extra: &[&str]) -> search::SearchArgs {
    let mut argv = vec![
        "partscout",
        "search",
        "--search",
        "fl500s",
        "--latitude",
        "42.33",
        "--longitude",
        "-83.05",
    ];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).expect("expected valid cli args");
    match cli.command {
        Commands::Search(args) => args,
    }
}

#[test]
fn parses_search_with_negative_longitude() {
    let args = search_args(&[]);
    assert_eq!(args.search_terms, vec!["fl500s".to_owned()]);
    assert!((args.longitude + 83.05).abs() < 1e-9);
    assert_eq!(args.output, std::path::PathBuf::from("results.json"));
    assert!(args.radius.is_none());
}

#[test]
fn parses_multiple_search_terms() {
    let cli = Cli::try_parse_from([
        "partscout",
        "search",
        "--search",
        "fl500s",
        "fl820s",
        "--search",
        "mc-8",
        "--latitude",
        "0",
        "--longitude",
        "0",
    ])
    .unwrap();
    let Commands::Search(args) = cli.command;
    assert_eq!(args.search_terms, vec!["fl500s", "fl820s", "mc-8"]);
}

#[test]
fn search_requires_a_term_and_location() {
    assert!(
        Cli::try_parse_from(["partscout", "search", "--latitude", "1", "--longitude", "1"]).is_err()
    );
    assert!(Cli::try_parse_from(["partscout", "search", "--search", "fl500s"]).is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["partscout"]).is_err());
}

#[test]
fn request_falls_back_to_config_defaults() {
    let mut config = test_config();
    config.concurrency = 4;
    config.radius_miles = 25.0;

    let request = search::build_request(&search_args(&[]), &config).unwrap();
    assert_eq!(request.concurrency, 4);
    assert!((request.radius_miles - 25.0).abs() < f64::EPSILON);
    assert_eq!(request.max_dealerships, 1_000_000);
}

#[test]
fn flags_override_config() {
    let args = search_args(&[
        "--radius",
        "50",
        "--concurrency",
        "2",
        "--max-dealerships",
        "5",
    ]);
    let request = search::build_request(&args, &test_config()).unwrap();
    assert_eq!(request.concurrency, 2);
    assert_eq!(request.max_dealerships, 5);
    assert!((request.radius_miles - 50.0).abs() < f64::EPSILON);
}

#[test]
fn blank_terms_are_dropped_and_all_blank_is_rejected() {
    let mut args = search_args(&[]);
    args.search_terms = vec!["  fl500s ".to_owned(), "   ".to_owned()];
    let request = search::build_request(&args, &test_config()).unwrap();
    assert_eq!(request.search_terms, vec!["fl500s".to_owned()]);

    args.search_terms = vec![" ".to_owned()];
    assert!(search::build_request(&args, &test_config()).is_err());
}

#[test]
fn rejects_out_of_range_inputs() {
    let config = test_config();

    let mut args = search_args(&[]);
    args.latitude = 91.0;
    assert!(search::build_request(&args, &config).is_err());

    let mut args = search_args(&[]);
    args.longitude = f64::NAN;
    assert!(search::build_request(&args, &config).is_err());

    let args = search_args(&["--radius", "0"]);
    assert!(search::build_request(&args, &config).is_err());

    let args = search_args(&["--concurrency", "0"]);
    assert!(search::build_request(&args, &config).is_err());

    let args = search_args(&["--max-dealerships", "0"]);
    assert!(search::build_request(&args, &config).is_err());
}

fn sample_row() -> SearchResultRow {
    SearchResultRow {
        dealership: Dealership {
            id: "715839251".to_owned(),
            name: "Motor City Ford".to_owned(),
            city: "Detroit".to_owned(),
            state: "MI".to_owned(),
            zip: "48226".to_owned(),
            phone: String::new(),
            latitude: 42.3467,
            longitude: -83.0603,
            context_switch_url: String::new(),
        },
        results: vec![
            PriceQuote::new("fl500s", 8.97, Availability::InStock),
            PriceQuote::missing("zzqx"),
        ],
    }
}

#[test]
fn format_row_shows_price_or_placeholder() {
    let text = search::format_row(&sample_row());
    assert!(text.starts_with("Motor City Ford (Detroit, MI 48226)"));
    assert!(text.contains("$8.97"));
    assert!(text.contains("In Stock"));
    assert!(text.contains("n/a"));
}

#[test]
fn write_results_emits_pretty_camel_case_json() {
    let dir = std::env::temp_dir().join(format!("partscout-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("results.json");

    let aggregate = AggregateResult {
        resolved_parts: vec![],
        search_results: vec![sample_row()],
    };
    search::write_results(&path, &aggregate).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"searchResults\""));
    assert!(written.contains('\n'), "output should be pretty-printed");
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert!(value["searchResults"][0]["results"][1]["price"].is_null());

    std::fs::remove_dir_all(&dir).unwrap();
}
