// shoprec CLI - monthly revenue recognition and cash reconciliation

mod exit_codes;
mod input;
mod recon;
mod table;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "shoprec")]
#[command(about = "Reconcile store orders against payment transactions, month by month")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the monthly summary from an orders export and a transactions export
    #[command(after_help = "\
Examples:
  shoprec run --orders orders_export.csv --transactions payment_transactions.csv
  shoprec run --orders orders.csv --transactions txns.csv --output jan.csv
  shoprec run --orders orders.csv --transactions txns.csv --config store.toml --json
  shoprec run --orders orders.tsv --transactions txns.tsv --delimiter tab")]
    Run {
        /// Orders export (CSV)
        #[arg(long, env = "SHOPREC_ORDERS")]
        orders: Option<PathBuf>,

        /// Payment transactions export (CSV)
        #[arg(long, env = "SHOPREC_TRANSACTIONS")]
        transactions: Option<PathBuf>,

        /// Column mapping / rules config (TOML)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Where to write the summary CSV (default: output.file from config)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Field delimiter for both inputs (default: detected per file)
        #[arg(long, value_parser = input::parse_delimiter)]
        delimiter: Option<u8>,

        /// Print the full result as JSON on stdout instead of a table
        #[arg(long)]
        json: bool,

        /// Do not print the table on stdout
        #[arg(long)]
        no_table: bool,

        /// Suppress stderr status lines and warnings
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Check a config file without running
    #[command(after_help = "\
Examples:
  shoprec validate store.toml")]
    Validate {
        /// Path to the TOML config
        config: PathBuf,
    },

    /// Print the default config as TOML
    Config,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (verbose, quiet) {
        (0, true) => "error",
        (0, false) => "warn",
        (1, _) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(cli.command, Commands::Run { quiet: true, .. });
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Run {
            orders,
            transactions,
            config,
            output,
            delimiter,
            json,
            no_table,
            quiet,
        } => recon::cmd_run(recon::RunArgs {
            orders,
            transactions,
            config,
            output,
            delimiter,
            json,
            no_table,
            quiet,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Config => recon::cmd_config(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
