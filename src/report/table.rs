//! Fixed-width comparison table

use crate::analysis::ComparedRow;
use crate::fmt::{format_count, format_signed, glyph, truncate, CHART};
use crate::workbook::Workbook;
use console::style;
use std::fmt::{self, Write as _};

const KEY_WIDTH: usize = 31;

/// Format the workbook's ranked rows as a table with a totals footer
pub fn format_comparison_table(workbook: &Workbook) -> Result<String, fmt::Error> {
    let meta = &workbook.meta;
    let primary = workbook.totals.primary.as_str();
    let mut output = String::new();

    writeln!(
        output,
        "\n{} {} for {}",
        glyph(CHART),
        style(&meta.analysis).bold(),
        style(&meta.client).cyan()
    )?;
    writeln!(
        output,
        "   P1: {} .. {}   P2: {} .. {}   ({} by {})",
        meta.p1_start, meta.p1_end, meta.p2_start, meta.p2_end, primary, meta.dimension
    )?;
    writeln!(output, "{}", "=".repeat(80))?;
    writeln!(
        output,
        "{:<31} {:>10} {:>10} {:>9} {:>8} {:>7}",
        meta.dimension, "P1", "P2", "Δ", "Δ%", "Share"
    )?;
    writeln!(output, "{}", "-".repeat(80))?;

    if workbook.rows.is_empty() {
        writeln!(output, "{}", style("(no rows)").dim())?;
    }
    for row in &workbook.rows {
        write_row(&mut output, row, primary)?;
    }

    writeln!(output, "{}", "-".repeat(80))?;
    if let Some(total) = workbook.totals.measure(primary) {
        writeln!(
            output,
            "{:<31} {:>10} {:>10} {:>9} {:>8}",
            style("Total").bold(),
            format_count(total.p1),
            format_count(total.p2),
            format_signed(total.delta_abs, 0),
            format!("{:+.1}%", total.delta_pct)
        )?;
    }
    for rate in &workbook.totals.rates {
        writeln!(
            output,
            "{:<31} {:>10.2} {:>10.2} {:>9} pp",
            rate.name,
            rate.p1,
            rate.p2,
            format_signed(rate.delta_pp, 2)
        )?;
    }
    writeln!(output, "{}", "=".repeat(80))?;

    Ok(output)
}

fn write_row(output: &mut String, row: &ComparedRow, primary: &str) -> fmt::Result {
    let (p1, p2) = row
        .measure(primary)
        .map_or((0.0, 0.0), |m| (m.p1, m.p2));

    let delta = format_signed(row.delta_abs, 0);
    let delta = if row.delta_abs > 0.0 {
        style(delta).green()
    } else if row.delta_abs < 0.0 {
        style(delta).red()
    } else {
        style(delta).dim()
    };

    writeln!(
        output,
        "{:<31} {:>10} {:>10} {:>9} {:>8} {:>7}",
        truncate(&row.key, KEY_WIDTH),
        format_count(p1),
        format_count(p2),
        delta,
        format!("{:+.1}%", row.delta_pct),
        format!("{:.1}%", row.contribution_pct)
    )
}

/// Print the comparison table to stdout
pub fn print_comparison_table(workbook: &Workbook) -> anyhow::Result<()> {
    print!("{}", format_comparison_table(workbook)?);
    Ok(())
}
