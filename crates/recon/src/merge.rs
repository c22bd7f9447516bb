use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;

use crate::model::{Month, MonthlyAggregate, ReconReport, ReportRow};

/// Full outer join of per-track aggregates on month.
///
/// Columns are laid out track by track in the given order. A column name used
/// by more than one track is qualified with each track's label, e.g.
/// `Gross Revenue (deferred)`. Months missing from a track are zero-filled.
pub fn merge(aggregates: &[MonthlyAggregate]) -> ReconReport {
    let columns = merged_columns(aggregates);

    let months: BTreeSet<Month> = aggregates
        .iter()
        .flat_map(|a| a.months.iter().map(|m| m.month))
        .collect();

    let rows = months
        .into_iter()
        .map(|month| {
            let mut values = Vec::with_capacity(columns.len());
            for agg in aggregates {
                match agg.get(month) {
                    Some(totals) => values.extend_from_slice(&totals.values),
                    None => values.extend(std::iter::repeat(Decimal::ZERO).take(agg.columns.len())),
                }
            }
            ReportRow { month, values }
        })
        .collect();

    ReconReport { columns, rows }
}

fn merged_columns(aggregates: &[MonthlyAggregate]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut shared = HashSet::new();
    for agg in aggregates {
        for col in &agg.columns {
            if !seen.insert(col.as_str()) {
                shared.insert(col.as_str());
            }
        }
    }

    aggregates
        .iter()
        .flat_map(|agg| {
            agg.columns.iter().map(|col| {
                if shared.contains(col.as_str()) {
                    format!("{col} ({})", agg.track)
                } else {
                    col.clone()
                }
            })
        })
        .collect()
}
