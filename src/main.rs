//! Command-line entry point.
//!
//! `terramon_service assess <report.json|->` ingests one telemetry frame:
//! fetch precipitation for its coordinates, score it, append the record,
//! and print the risk level plus an address lookup URL.
//!
//! `terramon_service list` prints every stored record as a JSON array.

use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use terramon_service::config::{self, DEFAULT_CONFIG_PATH};
use terramon_service::logging;
use terramon_service::model::SensorReport;
use terramon_service::pipeline;
use terramon_service::store::RecordStore;

#[derive(Parser, Debug)]
#[command(
    name = "terramon_service",
    about = "Ingest landslide sensor telemetry and assess risk",
    version
)]
struct Cli {
    /// Service configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, value_name = "PATH")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest one telemetry frame and print its risk level
    Assess {
        /// Sensor report JSON file, or '-' to read from stdin
        report: String,
    },
    /// Print every stored record as a JSON array
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(
        config.min_level(),
        config.log_file.as_deref(),
        config.console_timestamps,
    );

    let store = RecordStore::new(&config.store_path);

    match cli.command {
        Command::Assess { report } => run_assess(&store, &report),
        Command::List => run_list(&store),
    }
}

fn run_assess(store: &RecordStore, input: &str) -> ExitCode {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read report from {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let report: SensorReport = match serde_json::from_str(&raw) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Invalid sensor report: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline::ingest_report(&client, store, &report) {
        Ok(outcome) => {
            println!("Risk level: {}", outcome.risk);
            println!("Address lookup: {}", outcome.reverse_geocode_url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Ingestion failed for {}: {}", report.device_id, e);
            ExitCode::FAILURE
        }
    }
}

fn run_list(store: &RecordStore) -> ExitCode {
    match store.load_all() {
        Ok(records) => match serde_json::to_string_pretty(&records) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize records: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Failed to read record store: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(input)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_flag_and_assess_subcommand_parse() {
        let cli = Cli::try_parse_from([
            "terramon_service",
            "--config",
            "/etc/terramon.toml",
            "assess",
            "-",
        ])
        .unwrap();
        assert_eq!(cli.config, "/etc/terramon.toml");
        assert!(matches!(cli.command, Command::Assess { ref report } if report == "-"));
    }

    #[test]
    fn test_list_subcommand_uses_default_config() {
        let cli = Cli::try_parse_from(["terramon_service", "list"]).unwrap();
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["terramon_service"]).is_err());
    }

    #[test]
    fn test_assess_requires_a_report_argument() {
        assert!(Cli::try_parse_from(["terramon_service", "assess"]).is_err());
    }
}
