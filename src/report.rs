//! Text table of cluster sizes and the grand total.

use crate::estimate::RunResult;

const RULE: &str = "+-------------------------------+";

/// Renders the histogram as a bordered, tab-aligned table: one row per
/// cluster size (ascending) with its occurrence count and `size * count`,
/// then a TOTAL row.
pub fn format_report(result: &RunResult) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "| cluster size\t| count\t| total\t|".to_string(),
        RULE.to_string(),
    ];
    for (size, count) in result.histogram.iter() {
        lines.push(format!(
            "| {size}\t\t| {count}\t| {}\t|",
            size as u64 * count as u64
        ));
    }
    lines.push(RULE.to_string());
    lines.push(format!("| TOTAL\t\t\t| {}\t|", result.total_cells));
    lines.push(RULE.to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
