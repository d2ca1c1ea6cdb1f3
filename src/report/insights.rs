//! Growth and decline drivers

use crate::analysis::ComparedRow;
use crate::fmt::{format_signed, glyph, truncate, DECLINE, GROWTH, INFO};
use crate::workbook::Workbook;
use console::style;
use std::cmp::Ordering;
use std::fmt::{self, Write as _};

/// Drivers listed per direction by default
pub const DEFAULT_DRIVERS: usize = 5;

/// The rows that moved the total the most in each direction
#[derive(Debug)]
pub struct Insights<'a> {
    /// Net change of the primary measure
    pub net_change: f64,
    /// Net change in percent
    pub net_change_pct: f64,
    /// Rows with positive delta, largest first
    pub growth: Vec<&'a ComparedRow>,
    /// Rows with negative delta, largest drop first
    pub decline: Vec<&'a ComparedRow>,
}

impl<'a> Insights<'a> {
    /// Pick up to `limit` drivers per direction from the workbook rows
    pub fn from_workbook(workbook: &'a Workbook, limit: usize) -> Self {
        let mut growth: Vec<&ComparedRow> =
            workbook.rows.iter().filter(|r| r.delta_abs > 0.0).collect();
        let mut decline: Vec<&ComparedRow> =
            workbook.rows.iter().filter(|r| r.delta_abs < 0.0).collect();

        growth.sort_by(|a, b| by_magnitude(a, b));
        decline.sort_by(|a, b| by_magnitude(a, b));
        growth.truncate(limit);
        decline.truncate(limit);

        Self {
            net_change: workbook.totals.total_delta_abs(),
            net_change_pct: workbook.totals.total_delta_pct(),
            growth,
            decline,
        }
    }
}

fn by_magnitude(a: &ComparedRow, b: &ComparedRow) -> Ordering {
    b.delta_abs
        .abs()
        .total_cmp(&a.delta_abs.abs())
        .then_with(|| a.key.cmp(&b.key))
}

/// Format the drivers section
pub fn format_insights(workbook: &Workbook, limit: usize) -> Result<String, fmt::Error> {
    let insights = Insights::from_workbook(workbook, limit);
    let primary = &workbook.totals.primary;
    let mut output = String::new();

    writeln!(
        output,
        "\n{} {} ({}): net change {} {} ({:+.1}%)",
        glyph(INFO),
        style(&workbook.meta.analysis).bold(),
        workbook.meta.client,
        format_signed(insights.net_change, 0),
        primary,
        insights.net_change_pct
    )?;

    write_section(&mut output, glyph(GROWTH), "Growth drivers", &insights.growth)?;
    write_section(&mut output, glyph(DECLINE), "Decline drivers", &insights.decline)?;

    Ok(output)
}

fn write_section(
    output: &mut String,
    icon: &str,
    title: &str,
    rows: &[&ComparedRow],
) -> fmt::Result {
    writeln!(output, "\n{} {}", icon, style(title).bold())?;
    if rows.is_empty() {
        writeln!(output, "   {}", style("none").dim())?;
    }
    for row in rows {
        writeln!(
            output,
            "   {} {:<40} {:>9} ({:.1}% of net change)",
            style("→").dim(),
            truncate(&row.key, 40),
            format_signed(row.delta_abs, 0),
            row.contribution_pct
        )?;
    }
    Ok(())
}

/// Print the drivers section to stdout
pub fn print_insights(workbook: &Workbook, limit: usize) -> anyhow::Result<()> {
    print!("{}", format_insights(workbook, limit)?);
    Ok(())
}
