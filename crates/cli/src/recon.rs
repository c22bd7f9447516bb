//! `shoprec run` / `validate` / `config` — monthly revenue reconciliation.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use shoprec_recon::export::{to_json, write_csv};
use shoprec_recon::{run_csv, ReconConfig, ReconError};

use crate::exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_INPUT, EXIT_OUTPUT, EXIT_USAGE};
use crate::input::{read_text, sniff_delimiter};
use crate::{table, CliError};

pub const MISSING_INPUTS: &str = "Please provide both the Orders and Payment Transactions CSV files.";

pub struct RunArgs {
    pub orders: Option<PathBuf>,
    pub transactions: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub delimiter: Option<u8>,
    pub json: bool,
    pub no_table: bool,
    pub quiet: bool,
}

fn recon_err(err: ReconError) -> CliError {
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint: None }
}

/// Both inputs must be present before anything is read.
fn require_inputs(
    orders: Option<PathBuf>,
    transactions: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf), CliError> {
    let present = |p: &Option<PathBuf>| p.as_deref().is_some_and(Path::is_file);

    let mut missing = Vec::new();
    if !present(&orders) {
        missing.push(describe_missing("orders", "--orders", orders.as_deref()));
    }
    if !present(&transactions) {
        missing.push(describe_missing("transactions", "--transactions", transactions.as_deref()));
    }

    match (orders, transactions) {
        (Some(o), Some(t)) if missing.is_empty() => Ok((o, t)),
        _ => Err(CliError {
            code: EXIT_USAGE,
            message: MISSING_INPUTS.into(),
            hint: Some(missing.join("; ")),
        }),
    }
}

fn describe_missing(what: &str, flag: &str, path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("{what} file not found: {}", p.display()),
        None => format!("{what} file not given ({flag})"),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    let config = ReconConfig::from_toml(&text).map_err(recon_err)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn read_input(path: &Path, forced: Option<u8>) -> Result<(String, u8), CliError> {
    let text = read_text(path).map_err(|e| CliError {
        code: EXIT_INPUT,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })?;
    let delimiter = forced.unwrap_or_else(|| sniff_delimiter(&text));
    log::debug!("{}: delimiter {:?}", path.display(), delimiter as char);
    Ok((text, delimiter))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (orders_path, transactions_path) = require_inputs(args.orders, args.transactions)?;
    let config = load_config(args.config.as_deref())?;

    let (orders_csv, orders_delim) = read_input(&orders_path, args.delimiter)?;
    let (txns_csv, txns_delim) = read_input(&transactions_path, args.delimiter)?;

    let result = run_csv(
        &config,
        (orders_csv.as_str(), orders_delim),
        (txns_csv.as_str(), txns_delim),
    )
    .map_err(recon_err)?;

    let output_path = args.output.unwrap_or_else(|| PathBuf::from(&config.output.file));
    write_report_file(&output_path, &result.report)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = to_json(&result).map_err(recon_err)?;
        writeln!(out, "{json}").map_err(stdout_err)?;
    } else if !args.no_table {
        write!(out, "{}", table::render(&result.report)).map_err(stdout_err)?;
    }

    if !args.quiet {
        let s = &result.summary;
        eprintln!("Reconciliation complete.");
        eprintln!(
            "{} order lines ({} recognized, {} deferred), {} transactions ({} charges) across {} months",
            s.order_lines,
            s.recognized_lines,
            s.deferred_lines,
            s.transactions,
            s.charge_transactions,
            s.months,
        );
        eprintln!("wrote {}", output_path.display());
    }

    Ok(())
}

fn stdout_err(e: std::io::Error) -> CliError {
    CliError { code: EXIT_OUTPUT, message: format!("cannot write to stdout: {e}"), hint: None }
}

fn write_report_file(path: &Path, report: &shoprec_recon::ReconReport) -> Result<(), CliError> {
    let file = File::create(path).map_err(|e| CliError {
        code: EXIT_OUTPUT,
        message: format!("cannot write {}: {e}", path.display()),
        hint: None,
    })?;
    write_csv(report, BufWriter::new(file)).map_err(recon_err)
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    load_config(Some(&config))?;
    eprintln!("{}: OK", config.display());
    Ok(())
}

pub fn cmd_config() -> Result<(), CliError> {
    let text = ReconConfig::default().to_toml().map_err(recon_err)?;
    print!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_inputs_missing() {
        let err = require_inputs(None, None).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert_eq!(err.message, MISSING_INPUTS);
        let hint = err.hint.unwrap();
        assert!(hint.contains("--orders") && hint.contains("--transactions"), "{hint}");
    }

    #[test]
    fn nonexistent_path_counts_as_missing() {
        let err = require_inputs(
            Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
            Some(PathBuf::from("/definitely/not/here.csv")),
        )
        .unwrap_err();
        let hint = err.hint.unwrap();
        assert!(hint.starts_with("transactions file not found"), "{hint}");
        assert!(!hint.contains("orders"), "{hint}");
    }

    #[test]
    fn default_config_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.output.file, "monthly_reconciliation.csv");
    }
}
