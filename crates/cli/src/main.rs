//! Command line entry point for the VWAP calculator.
//!
//! Reads a CSV of ticks, prints one VWAP line per (window, pair) and writes
//! the same listing to `vwap-<epoch-millis>.csv` in the output directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vwap_core::Config;

const USAGE: &str = "Usage: vwap-calculator <input-file.csv>";

#[derive(Parser, Debug)]
#[command(
    name = "vwap-calculator",
    version,
    about = "Per-window VWAP for each currency pair in a CSV of ticks"
)]
struct Cli {
    /// Input CSV with TIMESTAMP, CURRENCY-PAIR, PRICE and VOLUME columns
    #[arg(value_name = "INPUT_CSV")]
    input: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Window length in minutes (default 60)
    #[arg(long, value_name = "MINUTES")]
    window_minutes: Option<u64>,

    /// Date the clock times are anchored to (default today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    anchor_date: Option<NaiveDate>,

    /// Directory for the output listing (default current directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("\nWelcome to VWAP calculator!\n");

    // A missing input exits with status 0; callers may rely on it.
    let Some(input) = cli.input.as_deref() else {
        println!("Error: Please provide an input CSV file");
        println!("{}\n", USAGE);
        return Ok(());
    };

    let config = load_config(&cli)?;
    let output = run(input, &config)?;
    println!(
        "\nVWAP Records are also written to output file {}\n",
        output.display()
    );
    Ok(())
}

/// Merge the optional config file with command line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(minutes) = cli.window_minutes {
        config.window.window_minutes = minutes;
    }
    if let Some(date) = cli.anchor_date {
        config.run.anchor_date = Some(date);
    }
    if let Some(dir) = &cli.output_dir {
        config.run.output_dir = dir.clone();
    }

    // Pinned once so every stamp in the run shares the same date.
    config.run.anchor_date = Some(config.run.resolve_anchor_date());
    Ok(config)
}

/// Calculate, print and write the listing. Returns the output path.
fn run(input: &Path, config: &Config) -> Result<PathBuf> {
    let records = vwap_ingestion::calculate_vwap(input, config)
        .with_context(|| format!("failed to calculate VWAP for {}", input.display()))?;

    for record in &records {
        println!("{}", vwap_report::console_line(record)?);
    }

    let output = vwap_report::output_path(&config.run.output_dir);
    vwap_report::write_records(&output, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), records = records.len(), "listing written");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_is_optional() {
        let cli = Cli::try_parse_from(["vwap-calculator"]).unwrap();
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let cli = Cli::try_parse_from([
            "vwap-calculator",
            "ticks.csv",
            "--window-minutes",
            "15",
            "--anchor-date",
            "2024-03-15",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("ticks.csv")));
        assert_eq!(config.window.window_minutes, 15);
        assert_eq!(config.run.anchor_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(config.run.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_anchor_date_pinned_without_flag() {
        let cli = Cli::try_parse_from(["vwap-calculator", "ticks.csv"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert!(config.run.anchor_date.is_some());
        assert_eq!(config.window.window_minutes, 60);
    }

    #[test]
    fn test_bad_anchor_date_rejected() {
        assert!(Cli::try_parse_from(["vwap-calculator", "--anchor-date", "15/03/2024"]).is_err());
    }

    #[test]
    fn test_run_writes_listing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ticks.csv");
        std::fs::write(
            &input,
            "TIMESTAMP,CURRENCY-PAIR,PRICE,VOLUME\n\
             9:10 AM,AUD/USD,0.65,1000\n\
             9:20 AM,AUD/USD,0.66,500\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.run.anchor_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        config.run.output_dir = dir.path().to_path_buf();

        let output = run(&input, &config).unwrap();
        let (_, rows) = vwap_report::read_listing(&output).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "0.6533");
    }

    #[test]
    fn test_run_zero_window_fails() {
        let mut config = Config::default();
        config.window.window_minutes = 0;
        let err = run(Path::new("ticks.csv"), &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<vwap_core::Error>(),
            Some(vwap_core::Error::InvalidConfiguration(_))
        ));
    }
}
