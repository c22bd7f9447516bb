use crate::aggregate::{aggregate, cash_spec, deferred_spec, recognized_spec};
use crate::classify::{charges, deferred, recognized};
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::merge::merge;
use crate::model::{ReconInput, ReconMeta, ReconReport, ReconResult, ReconSummary};
use crate::normalize::{load_orders, load_transactions};

/// Classify, aggregate and merge. Pure: same input, same report.
pub fn summarize(
    config: &ReconConfig,
    input: &ReconInput,
) -> Result<(ReconReport, ReconSummary), ReconError> {
    let rules = &config.rules;

    let recognized_lines = recognized(&input.orders, rules);
    let deferred_lines = deferred(&input.orders, rules);
    let charge_rows = charges(&input.transactions, rules);
    log::debug!(
        "classified {} recognized, {} deferred, {} charges",
        recognized_lines.len(),
        deferred_lines.len(),
        charge_rows.len()
    );

    let tracks = [
        aggregate(&recognized_lines, &recognized_spec())?,
        aggregate(&deferred_lines, &deferred_spec())?,
        aggregate(&charge_rows, &cash_spec())?,
    ];
    let report = merge(&tracks);

    let summary = ReconSummary {
        order_lines: input.orders.len(),
        transactions: input.transactions.len(),
        recognized_lines: recognized_lines.len(),
        deferred_lines: deferred_lines.len(),
        charge_transactions: charge_rows.len(),
        dropped_recognized: tracks[0].dropped,
        dropped_deferred: tracks[1].dropped,
        dropped_charges: tracks[2].dropped,
        months: report.rows.len(),
    };

    Ok((report, summary))
}

/// Run reconciliation on normalized records. Returns report + summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    let (report, summary) = summarize(config, input)?;
    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        report,
    })
}

/// Load both exports from delimited text, each with its own delimiter, then [`run`].
pub fn run_csv(
    config: &ReconConfig,
    (orders_csv, orders_delimiter): (&str, u8),
    (transactions_csv, transactions_delimiter): (&str, u8),
) -> Result<ReconResult, ReconError> {
    let input = ReconInput {
        orders: load_orders(orders_csv, orders_delimiter, &config.orders.columns)?,
        transactions: load_transactions(
            transactions_csv,
            transactions_delimiter,
            &config.transactions.columns,
        )?,
    };
    run(config, &input)
}
