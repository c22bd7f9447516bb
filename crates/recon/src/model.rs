use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Month key
// ---------------------------------------------------------------------------

/// Calendar month used as the grouping unit. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(ts: &NaiveDateTime) -> Self {
        Self { year: ts.year(), month: ts.month() }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Numeric columns of an order line. Never undefined: unparseable cells are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineAmounts {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub taxes: Decimal,
}

/// One normalized row of the orders export.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub paid_at: Option<NaiveDateTime>,
    pub fulfilled_at: Option<NaiveDateTime>,
    pub fulfillment_status: String,
    pub financial_status: String,
    pub amounts: LineAmounts,
    /// `quantity * unit_price`.
    pub gross_revenue: Decimal,
    /// `gross_revenue + shipping - discount`.
    pub net_revenue: Decimal,
    pub paid_month: Option<Month>,
    pub fulfilled_month: Option<Month>,
}

impl OrderLine {
    pub fn new(
        paid_at: Option<NaiveDateTime>,
        fulfilled_at: Option<NaiveDateTime>,
        fulfillment_status: impl Into<String>,
        financial_status: impl Into<String>,
        amounts: LineAmounts,
    ) -> Self {
        // A line whose revenue does not fit a Decimal counts like unparseable cells.
        let (amounts, gross_revenue, net_revenue) = match amounts.revenue() {
            Some((gross, net)) => (amounts, gross, net),
            None => {
                log::warn!("order line amounts out of range, counted as zero: {amounts:?}");
                (LineAmounts::default(), Decimal::ZERO, Decimal::ZERO)
            }
        };
        Self {
            paid_month: paid_at.as_ref().map(Month::of),
            fulfilled_month: fulfilled_at.as_ref().map(Month::of),
            paid_at,
            fulfilled_at,
            fulfillment_status: fulfillment_status.into(),
            financial_status: financial_status.into(),
            amounts,
            gross_revenue,
            net_revenue,
        }
    }
}

impl LineAmounts {
    /// Gross and net revenue, or `None` on overflow.
    fn revenue(&self) -> Option<(Decimal, Decimal)> {
        let gross = self.quantity.checked_mul(self.unit_price)?;
        let net = gross.checked_add(self.shipping)?.checked_sub(self.discount)?;
        Some((gross, net))
    }
}

/// One normalized row of the payment transactions export.
///
/// Unlike order lines, unparseable amounts stay `None` instead of becoming zero.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub date: Option<NaiveDateTime>,
    pub month: Option<Month>,
    pub kind: String,
    pub amount: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub net: Option<Decimal>,
}

impl Transaction {
    pub fn new(
        date: Option<NaiveDateTime>,
        kind: impl Into<String>,
        amount: Option<Decimal>,
        fee: Option<Decimal>,
        net: Option<Decimal>,
    ) -> Self {
        Self {
            month: date.as_ref().map(Month::of),
            date,
            kind: kind.into(),
            amount,
            fee,
            net,
        }
    }
}

/// Normalized records for one run.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub orders: Vec<OrderLine>,
    pub transactions: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// An order line selected into a revenue bucket, with its net revenue.
#[derive(Debug, Clone, Copy)]
pub struct RevenueLine<'a> {
    pub order: &'a OrderLine,
    pub net_revenue: Decimal,
}

impl<'a> RevenueLine<'a> {
    pub fn new(order: &'a OrderLine) -> Self {
        Self { order, net_revenue: order.net_revenue }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-month sums for one track (recognized, deferred, cash).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyAggregate {
    pub track: String,
    pub columns: Vec<String>,
    pub months: Vec<MonthTotals>,
    /// Rows excluded because their month key was undefined.
    pub dropped: usize,
}

impl MonthlyAggregate {
    pub fn get(&self, month: Month) -> Option<&MonthTotals> {
        self.months
            .binary_search_by(|m| m.month.cmp(&month))
            .ok()
            .map(|i| &self.months[i])
    }

    /// Sum for `month` in the named column, if both exist.
    pub fn value(&self, month: Month, column: &str) -> Option<Decimal> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.get(month).map(|m| m.values[idx])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotals {
    pub month: Month,
    pub record_count: usize,
    pub values: Vec<Decimal>,
}

// ---------------------------------------------------------------------------
// Report + Output
// ---------------------------------------------------------------------------

/// Outer join of all tracks on month, ascending. Absent measures are zero.
#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub month: Month,
    pub values: Vec<Decimal>,
}

impl ReconReport {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, month: Month) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.month == month)
    }

    /// Value of `column` in `month`'s row.
    pub fn value(&self, month: Month, column: &str) -> Option<Decimal> {
        let idx = self.column_index(column)?;
        self.row(month).map(|r| r.values[idx])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub order_lines: usize,
    pub transactions: usize,
    pub recognized_lines: usize,
    pub deferred_lines: usize,
    pub charge_transactions: usize,
    pub dropped_recognized: usize,
    pub dropped_deferred: usize,
    pub dropped_charges: usize,
    pub months: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub report: ReconReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
}
