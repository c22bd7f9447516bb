//! Report serialization: delimited table for download, JSON for tooling.

use std::io::Write;

use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{ReconReport, ReconResult};

/// Amounts print without trailing zeros; zero prints as `0`.
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Header `Month` + report columns, one row per month, ascending.
pub fn write_csv<W: Write>(report: &ReconReport, writer: W) -> Result<(), ReconError> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    let mut header = vec!["Month".to_string()];
    header.extend(report.columns.iter().cloned());
    csv.write_record(&header).map_err(|e| ReconError::Output(e.to_string()))?;

    for row in &report.rows {
        let mut record = vec![row.month.to_string()];
        record.extend(row.values.iter().map(|v| format_amount(*v)));
        csv.write_record(&record).map_err(|e| ReconError::Output(e.to_string()))?;
    }

    csv.flush().map_err(|e| ReconError::Output(e.to_string()))
}

pub fn to_json(result: &ReconResult) -> Result<String, ReconError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| ReconError::Output(format!("JSON serialization error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Month, ReportRow};
    use rust_decimal_macros::dec;

    fn report() -> ReconReport {
        ReconReport {
            columns: vec!["Net Recognized Revenue".into(), "Merchant Fees".into()],
            rows: vec![
                ReportRow { month: Month::new(2024, 1), values: vec![dec!(23.00), dec!(0)] },
                ReportRow { month: Month::new(2024, 2), values: vec![dec!(0), dec!(1.20)] },
            ],
        }
    }

    #[test]
    fn csv_layout() {
        let mut buf = Vec::new();
        write_csv(&report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Month,Net Recognized Revenue,Merchant Fees\n2024-01,23,0\n2024-02,0,1.2\n"
        );
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(dec!(10.500)), "10.5");
        assert_eq!(format_amount(dec!(-0.00)), "0");
        assert_eq!(format_amount(dec!(-3.25)), "-3.25");
    }

    #[test]
    fn json_months_are_strings() {
        let result = ReconResult {
            meta: crate::model::ReconMeta { engine_version: "0".into(), run_at: "now".into() },
            summary: crate::model::ReconSummary {
                order_lines: 0,
                transactions: 0,
                recognized_lines: 0,
                deferred_lines: 0,
                charge_transactions: 0,
                dropped_recognized: 0,
                dropped_deferred: 0,
                dropped_charges: 0,
                months: 2,
            },
            report: report(),
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&result).unwrap()).unwrap();
        assert_eq!(json["report"]["rows"][0]["month"], "2024-01");
        assert_eq!(json["report"]["columns"][1], "Merchant Fees");
        assert_eq!(json["summary"]["months"], 2);
    }
}
