//! Order and transaction loaders: delimited text in, typed records out.
//!
//! A missing required column fails the whole table. Bad cells do not: order
//! amounts fall back to zero, transaction amounts and all timestamps to `None`.

use crate::config::{OrderColumns, TransactionColumns};
use crate::error::ReconError;
use crate::model::{LineAmounts, OrderLine, Transaction};
use crate::parse::{parse_decimal, parse_timestamp};

pub const ORDERS_TABLE: &str = "orders";
pub const TRANSACTIONS_TABLE: &str = "transactions";

/// Header positions for a fixed set of required columns.
struct ColumnIndex {
    positions: Vec<usize>,
}

impl ColumnIndex {
    fn resolve(
        table: &str,
        headers: &csv::StringRecord,
        columns: &[(&'static str, &str)],
    ) -> Result<Self, ReconError> {
        let positions = columns
            .iter()
            .map(|&(_, name)| {
                headers.iter().position(|h| h.trim() == name.trim()).ok_or_else(|| {
                    ReconError::MissingColumn { table: table.into(), column: name.into() }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { positions })
    }

    /// Cell for the `n`th required column; short rows read as blank.
    fn cell<'r>(&self, record: &'r csv::StringRecord, n: usize) -> &'r str {
        record.get(self.positions[n]).unwrap_or("")
    }
}

fn open_reader(csv_data: &str, delimiter: u8) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(csv_data.trim_start_matches('\u{feff}').as_bytes())
}

/// Parse the orders export into order lines, same count and order as input.
pub fn load_orders(
    csv_data: &str,
    delimiter: u8,
    columns: &OrderColumns,
) -> Result<Vec<OrderLine>, ReconError> {
    let mut reader = open_reader(csv_data, delimiter);
    let headers = reader.headers().map_err(|e| ReconError::csv(ORDERS_TABLE, e))?.clone();
    let idx = ColumnIndex::resolve(ORDERS_TABLE, &headers, &columns.fields())?;

    let mut orders = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::csv(ORDERS_TABLE, e))?;
        let amount = |n| parse_decimal(idx.cell(&record, n)).unwrap_or_default();

        let amounts = LineAmounts {
            quantity: amount(4),
            unit_price: amount(5),
            discount: amount(6),
            shipping: amount(7),
            taxes: amount(8),
        };

        orders.push(OrderLine::new(
            parse_timestamp(idx.cell(&record, 0)),
            parse_timestamp(idx.cell(&record, 1)),
            idx.cell(&record, 2).trim(),
            idx.cell(&record, 3).trim(),
            amounts,
        ));
    }

    log::debug!("loaded {} order lines", orders.len());
    Ok(orders)
}

/// Parse the payment transactions export.
pub fn load_transactions(
    csv_data: &str,
    delimiter: u8,
    columns: &TransactionColumns,
) -> Result<Vec<Transaction>, ReconError> {
    let mut reader = open_reader(csv_data, delimiter);
    let headers = reader
        .headers()
        .map_err(|e| ReconError::csv(TRANSACTIONS_TABLE, e))?
        .clone();
    let idx = ColumnIndex::resolve(TRANSACTIONS_TABLE, &headers, &columns.fields())?;

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::csv(TRANSACTIONS_TABLE, e))?;
        transactions.push(Transaction::new(
            parse_timestamp(idx.cell(&record, 0)),
            idx.cell(&record, 1).trim(),
            parse_decimal(idx.cell(&record, 2)),
            parse_decimal(idx.cell(&record, 3)),
            parse_decimal(idx.cell(&record, 4)),
        ));
    }

    log::debug!("loaded {} transactions", transactions.len());
    Ok(transactions)
}
