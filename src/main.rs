use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use emission_atlas::config::Config;
use emission_atlas::data::{aggregate_with, loader};
use emission_atlas::report::Report;

/// Aggregate regional emission records and print chart statistics as JSON
#[derive(Parser, Debug)]
#[command(name = "emission-atlas")]
#[command(version)]
struct Args {
    /// Emission data file (.csv, .json or .parquet)
    data_file: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classification to report on (repeatable; default: all)
    #[arg(long = "classification")]
    classifications: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if !args.classifications.is_empty() {
        config.classifications = args.classifications;
    }

    let rows = loader::load_file(&args.data_file)
        .with_context(|| format!("loading {}", args.data_file.display()))?;
    let agg = aggregate_with(rows, &config.aggregate_options());
    info!(
        "{} rows accepted, {} excluded, {} rejected",
        agg.accepted, agg.excluded, agg.rejected
    );

    let report = Report::build(&agg, &config);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "emission-atlas",
            "data.csv",
            "--config",
            "cfg.json",
            "--classification",
            "A",
            "--classification",
            "B",
        ])
        .unwrap();
        assert_eq!(args.data_file, PathBuf::from("data.csv"));
        assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(args.classifications, vec!["A", "B"]);
    }

    #[test]
    fn test_args_reject_extra_positional() {
        assert!(Args::try_parse_from(["emission-atlas", "a.csv", "b.csv"]).is_err());
        assert!(Args::try_parse_from(["emission-atlas"]).is_err());
    }

    #[test]
    fn test_help_is_not_a_failure() {
        let err = Args::try_parse_from(["emission-atlas", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
