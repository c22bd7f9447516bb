//! Plain-text rendering of the report for the terminal.

use shoprec_recon::export::format_amount;
use shoprec_recon::ReconReport;

/// Aligned table: month left-aligned, amounts right-aligned, header rule.
pub fn render(report: &ReconReport) -> String {
    let mut header = vec!["Month".to_string()];
    header.extend(report.columns.iter().cloned());

    let body: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.month.to_string()];
            cells.extend(row.values.iter().map(|v| format_amount(*v)));
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    if body.is_empty() {
        out.push_str("(no months)\n");
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| if i == 0 { format!("{cell:<w$}") } else { format!("{cell:>w$}") })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
