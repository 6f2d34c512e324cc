//! The `search` command: one full run against the vendor, printed as it
//! streams and written to a JSON file at the end.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use partscout_core::{AggregateResult, AppConfig, Location, ResolvedPart, SearchResultRow};
use partscout_scraper::{run_search, SearchRequest, SearchSink, SessionClient, VendorEndpoints};

#[derive(Debug, clap::Args)]
pub(crate) struct SearchArgs {
    /// Part number or keyword; repeat the flag or pass several values
    #[arg(long = "search", required = true, num_args = 1..)]
    pub search_terms: Vec<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    /// Search radius in miles [default: PARTSCOUT_RADIUS_MILES]
    #[arg(long)]
    pub radius: Option<f64>,

    /// Concurrent lookups per phase [default: PARTSCOUT_CONCURRENCY]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Upper bound on dealers returned by the directory
    #[arg(long)]
    pub max_dealerships: Option<u32>,

    #[arg(long, default_value = "results.json")]
    pub output: PathBuf,
}

/// Validates the command-line inputs and fills unset knobs from `config`.
///
/// Blank search terms are dropped; at least one must remain.
pub(crate) fn build_request(
    args: &SearchArgs,
    config: &AppConfig,
) -> anyhow::Result<SearchRequest> {
    let search_terms: Vec<String> = args
        .search_terms
        .iter()
        .map(|term| term.trim().to_owned())
        .filter(|term| !term.is_empty())
        .collect();
    if search_terms.is_empty() {
        anyhow::bail!("at least one non-blank --search term is required");
    }

    if !(-90.0..=90.0).contains(&args.latitude) {
        anyhow::bail!("--latitude must be within [-90, 90], got {}", args.latitude);
    }
    if !(-180.0..=180.0).contains(&args.longitude) {
        anyhow::bail!(
            "--longitude must be within [-180, 180], got {}",
            args.longitude
        );
    }

    let radius_miles = args.radius.unwrap_or(config.radius_miles);
    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        anyhow::bail!("--radius must be a positive number of miles, got {radius_miles}");
    }

    let concurrency = args.concurrency.unwrap_or(config.concurrency);
    if concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }

    let max_dealerships = args.max_dealerships.unwrap_or(config.max_dealerships);
    if max_dealerships == 0 {
        anyhow::bail!("--max-dealerships must be at least 1");
    }

    Ok(SearchRequest {
        search_terms,
        radius_miles,
        location: Location {
            latitude: args.latitude,
            longitude: args.longitude,
        },
        concurrency,
        max_dealerships,
    })
}

/// Runs one search, printing rows as they arrive, and writes the aggregate
/// to `args.output`. Ctrl-C stops the run at the next dealer boundary.
///
/// # Errors
///
/// Returns an error on invalid arguments, a fatal vendor failure, or when
/// the output file cannot be written. Nothing is written for a cancelled run.
pub(crate) async fn run_search_command(
    config: &AppConfig,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let request = build_request(args, config)?;
    let client = SessionClient::from_config(config).context("failed to build HTTP client")?;
    let endpoints = VendorEndpoints::from_config(config);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    tracing::info!(
        terms = request.search_terms.len(),
        latitude = request.location.latitude,
        longitude = request.location.longitude,
        radius_miles = request.radius_miles,
        concurrency = request.concurrency,
        "starting search"
    );

    let outcome = match run_search(&client, &endpoints, &request, &TerminalSink, &cancel).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, network = err.is_network(), "search aborted");
            return Err(err).context("search aborted");
        }
    };

    let Some(aggregate) = outcome else {
        println!("search cancelled; no results written");
        return Ok(());
    };

    for term in aggregate.unresolved_terms(&request.search_terms) {
        tracing::warn!(search_term = term, "no catalog part found");
        println!("could not find part: {term}");
    }

    write_results(&args.output, &aggregate)?;
    println!(
        "wrote {} dealer rows to {}",
        aggregate.search_results.len(),
        args.output.display()
    );
    Ok(())
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received ctrl-c, stopping after the current dealer");
            cancel.cancel();
        }
    });
}

pub(crate) fn write_results(path: &Path, aggregate: &AggregateResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(aggregate).context("failed to serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write results to {}", path.display()))
}

/// Prints each notification to stdout as a human-readable line.
struct TerminalSink;

impl SearchSink for TerminalSink {
    fn parts_resolved(&self, parts: &[ResolvedPart]) {
        println!("resolved {} part(s):", parts.len());
        for part in parts {
            println!(
                "  {:<16} {} ({}, qty {})",
                part.search_term, part.name, part.part_number, part.package_quantity
            );
        }
    }

    fn result(&self, row: &SearchResultRow) {
        println!("{}", format_row(row));
    }

    fn progress(&self, fraction: f64) {
        println!("[{:>3.0}%]", fraction * 100.0);
    }

    fn complete(&self) {
        tracing::debug!("search run finished");
    }
}

pub(crate) fn format_row(row: &SearchResultRow) -> String {
    let dealer = &row.dealership;
    let mut line = format!("{} ({}, {} {})", dealer.name, dealer.city, dealer.state, dealer.zip);
    for quote in &row.results {
        let price = if quote.has_price() {
            format!("${:.2}", quote.price)
        } else {
            "n/a".to_owned()
        };
        line.push_str(&format!(
            "\n  {:<16} {:>10}  {}",
            quote.search_term, price, quote.availability
        ));
    }
    line
}
