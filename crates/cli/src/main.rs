//! dealscout command line entry point.
//!
//! Runs one price search in a headless browser, saves the offer table as CSV
//! and prints the table followed by the best deal.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dealscout_client::{ChromiumProvider, SearchOptions, SessionProvider, run_search};
use dealscout_core::{AppConfig, Error, OfferTable, SearchReport, sink::write_csv};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dealscout")]
#[command(about = "Compare a product's price across Amazon, Flipkart and Myntra")]
struct Cli {
    /// Product to search for. Words are joined with single spaces.
    query: Vec<String>,

    /// Scrape the storefronts concurrently, one browser per site.
    #[arg(long)]
    parallel: bool,

    /// CSV file for the offer table [default: configured output_path].
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Skip writing the CSV file.
    #[arg(long, conflicts_with = "output")]
    no_save: bool,

    /// Print the search report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn query(&self) -> String {
        self.query.join(" ")
    }

    /// `--parallel` can only turn concurrency on; the config decides otherwise.
    fn search_options(&self, config: &AppConfig) -> SearchOptions {
        let mut options = SearchOptions::from(config);
        options.parallel |= self.parallel;
        options
    }

    fn output_path(&self, config: &AppConfig) -> Option<PathBuf> {
        if self.no_save {
            return None;
        }
        Some(self.output.clone().unwrap_or_else(|| config.output_path.clone()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let provider = ChromiumProvider::new();

    match execute(&provider, &cli, &config, &mut std::io::stdout()).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", describe(&err));
            Ok(ExitCode::from(exit_code(&err)))
        }
    }
}

/// Search, persist and print one query.
async fn execute<P: SessionProvider, W: Write>(
    provider: &P, cli: &Cli, config: &AppConfig, out: &mut W,
) -> Result<SearchReport, Error> {
    let report = run_search(provider, &cli.query(), &cli.search_options(config)).await?;

    if let Some(path) = cli.output_path(config) {
        write_csv(&report.offers, &path)?;
        tracing::info!(path = %path.display(), "saved offer table");
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| Error::SinkFailed(e.to_string()))?;
        writeln!(out, "{json}")?;
    } else {
        write!(out, "{}", render_table(&report.offers))?;
        writeln!(out)?;
        writeln!(out, "{}", report.best_deal)?;
    }

    Ok(report)
}

/// Left-aligned text table with the same columns as the CSV file.
fn render_table(table: &OfferTable) -> String {
    let header = ["Website", "Price", "Reviews"];
    let rows: Vec<[&str; 3]> = table
        .iter()
        .map(|offer| [offer.site.name(), offer.price_text(), offer.review_text()])
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut text = String::new();
    for row in std::iter::once(&header).chain(&rows) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

fn describe(err: &Error) -> String {
    match err {
        Error::InvalidInput(msg) => format!("error: invalid search query: {msg}"),
        Error::SessionUnavailable(msg) => format!("error: could not start a browser session: {msg}"),
        Error::SinkFailed(msg) => format!("error: could not save results: {msg}"),
    }
}

fn exit_code(err: &Error) -> u8 {
    match err {
        Error::InvalidInput(_) => 2,
        Error::SessionUnavailable(_) => 3,
        Error::SinkFailed(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealscout_client::fixture::{FixturePage, FixtureProvider};
    use dealscout_core::{BestDeal, RawOffer, Site};

    fn storefronts() -> FixtureProvider {
        FixtureProvider::new()
            .site(Site::Amazon, FixturePage::listing(Site::Amazon, "1,499", "4.3 out of 5 stars"))
            .site(Site::Flipkart, FixturePage::listing(Site::Flipkart, "₹1,399", "812 Ratings"))
            .site(Site::Myntra, FixturePage::listing(Site::Myntra, "Rs. 1599", "4.0"))
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dealscout").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_query_words_are_joined() {
        assert_eq!(cli(&["running", "shoes"]).query(), "running shoes");
        assert_eq!(cli(&[]).query(), "");
    }

    #[test]
    fn test_no_save_conflicts_with_output() {
        let result = Cli::try_parse_from(["dealscout", "shoes", "--no-save", "--output", "x.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_path_resolution() {
        let config = AppConfig::default();
        assert_eq!(cli(&["shoes"]).output_path(&config), Some(PathBuf::from("offers.csv")));
        assert_eq!(cli(&["shoes", "-o", "deals.csv"]).output_path(&config), Some(PathBuf::from("deals.csv")));
        assert_eq!(cli(&["shoes", "--no-save"]).output_path(&config), None);
    }

    #[test]
    fn test_parallel_flag_overrides_config() {
        let config = AppConfig::default();
        assert!(!cli(&["shoes"]).search_options(&config).parallel);
        assert!(cli(&["shoes", "--parallel"]).search_options(&config).parallel);

        let config = AppConfig { parallel: true, ..Default::default() };
        assert!(cli(&["shoes"]).search_options(&config).parallel);
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = OfferTable::from_raw([
            RawOffer::new(Site::Amazon, Some("₹1,499".into()), Some("4.3 out of 5 stars".into())),
            RawOffer::unavailable(Site::Myntra),
        ]);

        let text = render_table(&table);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Website  Price   Reviews");
        assert_eq!(lines[1], "Amazon   ₹1,499  4.3 out of 5 stars");
        assert_eq!(lines[2], "Myntra   N/A     N/A");
    }

    #[test]
    fn test_errors_have_distinct_exit_codes() {
        let invalid = Error::InvalidInput("query cannot be empty".into());
        let session = Error::SessionUnavailable("chrome not found".into());

        assert_ne!(exit_code(&invalid), exit_code(&session));
        assert_ne!(exit_code(&invalid), 0);
        assert!(describe(&invalid).contains("invalid search query"));
        assert!(describe(&session).contains("browser session"));
    }

    #[tokio::test]
    async fn test_execute_prints_table_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let args = cli(&["desk", "lamp", "--output", path.to_str().unwrap()]);
        let mut out = Vec::new();

        let report = execute(&storefronts(), &args, &AppConfig::default(), &mut out).await.unwrap();

        assert_eq!(report.query, "desk lamp");
        assert_eq!(report.best_deal, BestDeal::Found { site: Site::Flipkart, price_minor: 1399 });

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Website"));
        assert!(printed.trim_end().ends_with("Website with the lowest price: Flipkart - ₹1399"));

        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_execute_json_output() {
        let args = cli(&["desk", "lamp", "--no-save", "--json"]);
        let mut out = Vec::new();

        execute(&storefronts(), &args, &AppConfig::default(), &mut out).await.unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["query"], "desk lamp");
        assert_eq!(value["best_deal"]["status"], "found");
        assert_eq!(value["offers"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_execute_rejects_empty_query() {
        let provider = storefronts();
        let args = cli(&["--no-save"]);
        let mut out = Vec::new();

        let err = execute(&provider, &args, &AppConfig::default(), &mut out).await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(provider.acquired(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_execute_reports_session_failure() {
        let args = cli(&["desk", "lamp", "--no-save"]);
        let mut out = Vec::new();

        let err = execute(&FixtureProvider::unavailable(), &args, &AppConfig::default(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::SessionUnavailable(_)));
    }
}
