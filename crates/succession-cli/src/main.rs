mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::facts::FactsArgs;
use commands::init_config::InitConfigArgs;
use commands::tax::TaxArgs;

/// Indicative French succession and gift duties for NL-FR families
#[derive(Parser)]
#[command(
    name = "succession",
    version,
    about = "Indicative French succession and gift duties for NL-FR families",
    long_about = "Compute indicative French inheritance (succession) and lifetime gift \
                  (donation) duties per recipient, compare the chosen split against a \
                  low-tax benchmark and list the legal points that need attention. \
                  Facts are read as JSON from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine config (TOML). Falls back to $SUCCESSION_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: per-recipient tax, benchmark gap, nudges and exclusions
    Report(FactsArgs),
    /// Only the contextual legal warnings for the given facts
    Nudges(FactsArgs),
    /// Export payload with inputs, outputs, sources and disclaimer
    Dossier(FactsArgs),
    /// Plain-text summary for copy/paste
    Summary(FactsArgs),
    /// Tax for a single recipient
    Tax(TaxArgs),
    /// Write the default engine config as TOML
    InitConfig(InitConfigArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args, config_path),
        Commands::Nudges(args) => commands::report::run_nudges(args, config_path),
        Commands::Dossier(args) => commands::report::run_dossier(args, config_path),
        Commands::Summary(args) => commands::report::run_summary(args, config_path),
        Commands::Tax(args) => commands::tax::run_tax(args, config_path),
        Commands::InitConfig(args) => commands::init_config::run_init_config(args),
        Commands::Version => {
            println!("succession {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
