//! Month-keyed aggregation driven by a descriptor: a key selector plus a list
//! of (source value, output column) measures. Every measure is a sum that
//! skips undefined values.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{MonthTotals, MonthlyAggregate, Month, RevenueLine, Transaction};

pub const TRACK_RECOGNIZED: &str = "recognized";
pub const TRACK_DEFERRED: &str = "deferred";
pub const TRACK_CASH: &str = "cash";

pub const GROSS_REVENUE: &str = "Gross Revenue";
pub const RECOGNIZED_DISCOUNTS: &str = "Recognized Discounts";
pub const RECOGNIZED_SHIPPING: &str = "Recognized Shipping";
pub const RECOGNIZED_TAXES: &str = "Recognized Taxes";
pub const NET_RECOGNIZED_REVENUE: &str = "Net Recognized Revenue";
pub const DEFERRED_DISCOUNT: &str = "Deferred Discount";
pub const DEFERRED_SHIPPING: &str = "Deferred Shipping";
pub const DEFERRED_TAXES: &str = "Deferred Taxes";
pub const NET_DEFERRED_REVENUE: &str = "Net Deferred Revenue";
pub const GROSS_CASH: &str = "Gross Cash from Customers";
pub const MERCHANT_FEES: &str = "Merchant Fees";
pub const NET_CASH: &str = "Net Cash Received";

/// One summed output column.
pub struct Measure<T> {
    pub name: &'static str,
    pub value: fn(&T) -> Option<Decimal>,
}

impl<T> Measure<T> {
    pub fn new(name: &'static str, value: fn(&T) -> Option<Decimal>) -> Self {
        Self { name, value }
    }
}

pub struct AggregateSpec<T> {
    pub track: &'static str,
    pub key: fn(&T) -> Option<Month>,
    pub measures: Vec<Measure<T>>,
}

impl<T> AggregateSpec<T> {
    pub fn columns(&self) -> Vec<String> {
        self.measures.iter().map(|m| m.name.to_string()).collect()
    }
}

/// Group rows by month and sum each measure. Rows without a month key are
/// counted in `dropped` and otherwise ignored. Months come out ascending.
/// Fails if a total overflows.
pub fn aggregate<T>(rows: &[T], spec: &AggregateSpec<T>) -> Result<MonthlyAggregate, ReconError> {
    let mut groups: BTreeMap<Month, (usize, Vec<Decimal>)> = BTreeMap::new();
    let mut dropped = 0;

    for row in rows {
        let Some(month) = (spec.key)(row) else {
            dropped += 1;
            continue;
        };
        let entry = groups
            .entry(month)
            .or_insert_with(|| (0, vec![Decimal::ZERO; spec.measures.len()]));
        entry.0 += 1;
        for (total, measure) in entry.1.iter_mut().zip(&spec.measures) {
            if let Some(v) = (measure.value)(row) {
                *total = total.checked_add(v).ok_or_else(|| ReconError::Overflow {
                    track: spec.track.to_string(),
                    column: measure.name.to_string(),
                    month,
                })?;
            }
        }
    }

    if dropped > 0 {
        log::warn!(
            "{}: {dropped} of {} rows have no month key and were left out",
            spec.track,
            rows.len()
        );
    }

    Ok(MonthlyAggregate {
        track: spec.track.to_string(),
        columns: spec.columns(),
        months: groups
            .into_iter()
            .map(|(month, (record_count, values))| MonthTotals { month, record_count, values })
            .collect(),
        dropped,
    })
}

// ---------------------------------------------------------------------------
// Track descriptors
// ---------------------------------------------------------------------------

/// Recognized revenue, keyed by fulfillment month.
pub fn recognized_spec<'a>() -> AggregateSpec<RevenueLine<'a>> {
    AggregateSpec {
        track: TRACK_RECOGNIZED,
        key: |l: &RevenueLine| l.order.fulfilled_month,
        measures: vec![
            Measure::new(GROSS_REVENUE, |l: &RevenueLine| Some(l.order.gross_revenue)),
            Measure::new(RECOGNIZED_DISCOUNTS, |l: &RevenueLine| Some(l.order.amounts.discount)),
            Measure::new(RECOGNIZED_SHIPPING, |l: &RevenueLine| Some(l.order.amounts.shipping)),
            Measure::new(RECOGNIZED_TAXES, |l: &RevenueLine| Some(l.order.amounts.taxes)),
            Measure::new(NET_RECOGNIZED_REVENUE, |l: &RevenueLine| Some(l.net_revenue)),
        ],
    }
}

/// Deferred revenue, keyed by payment month.
pub fn deferred_spec<'a>() -> AggregateSpec<RevenueLine<'a>> {
    AggregateSpec {
        track: TRACK_DEFERRED,
        key: |l: &RevenueLine| l.order.paid_month,
        measures: vec![
            Measure::new(GROSS_REVENUE, |l: &RevenueLine| Some(l.order.gross_revenue)),
            Measure::new(DEFERRED_DISCOUNT, |l: &RevenueLine| Some(l.order.amounts.discount)),
            Measure::new(DEFERRED_SHIPPING, |l: &RevenueLine| Some(l.order.amounts.shipping)),
            Measure::new(DEFERRED_TAXES, |l: &RevenueLine| Some(l.order.amounts.taxes)),
            Measure::new(NET_DEFERRED_REVENUE, |l: &RevenueLine| Some(l.net_revenue)),
        ],
    }
}

/// Merchant cash from charges, keyed by transaction month.
pub fn cash_spec<'a>() -> AggregateSpec<&'a Transaction> {
    AggregateSpec {
        track: TRACK_CASH,
        key: |t: &&Transaction| t.month,
        measures: vec![
            Measure::new(GROSS_CASH, |t: &&Transaction| t.amount),
            Measure::new(MERCHANT_FEES, |t: &&Transaction| t.fee),
            Measure::new(NET_CASH, |t: &&Transaction| t.net),
        ],
    }
}
