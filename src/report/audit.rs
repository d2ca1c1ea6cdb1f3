//! Audit result and summary output

use crate::audit::{AuditResult, AuditStatus, AuditSummary};
use crate::fmt::{glyph, CHECKMARK, CROSSMARK, MICROSCOPE, WARNING};
use console::style;
use std::fmt::{self, Write as _};

fn status_glyph(status: AuditStatus) -> &'static str {
    match status {
        AuditStatus::Passed => glyph(CHECKMARK),
        AuditStatus::Warning => glyph(WARNING),
        AuditStatus::Failed => glyph(CROSSMARK),
    }
}

fn status_label(status: AuditStatus) -> String {
    let label = status.as_str().to_uppercase();
    match status {
        AuditStatus::Passed => style(label).green().bold().to_string(),
        AuditStatus::Warning => style(label).yellow().bold().to_string(),
        AuditStatus::Failed => style(label).red().bold().to_string(),
    }
}

/// Format one audit result with its evidence, issues and alternatives
pub fn format_audit_result(result: &AuditResult) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "{} {} {} (confidence {:.0}%)",
        status_glyph(result.status),
        status_label(result.status),
        result.claim,
        result.confidence * 100.0
    )?;
    for evidence in &result.evidence {
        writeln!(output, "   {} {}", style("evidence:").dim(), evidence)?;
    }
    for issue in &result.issues {
        writeln!(output, "   {} {}", style("issue:").yellow(), issue)?;
    }
    if !result.alternative_hypotheses.is_empty() {
        writeln!(output, "   {}", style("alternatives:").cyan())?;
        for alternative in &result.alternative_hypotheses {
            writeln!(output, "     - {}", alternative)?;
        }
    }

    Ok(output)
}

/// Format the session summary
pub fn format_audit_summary(summary: &AuditSummary) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(
        output,
        "\n{} Audit summary for {}",
        glyph(MICROSCOPE),
        style(&summary.client).cyan()
    )?;
    writeln!(output, "{}", "=".repeat(80))?;
    writeln!(output, "   Run:        {}", style(&summary.run_id).dim())?;
    writeln!(output, "   Checks:     {}", summary.total_checks)?;
    writeln!(
        output,
        "   Passed:     {}",
        style(summary.passed).green()
    )?;
    writeln!(
        output,
        "   Warnings:   {}",
        style(summary.warnings).yellow()
    )?;
    writeln!(output, "   Failed:     {}", style(summary.failed).red())?;
    writeln!(
        output,
        "   Confidence: {:.0}%",
        summary.overall_confidence * 100.0
    )?;

    if !summary.details.is_empty() {
        writeln!(output, "{}", "-".repeat(80))?;
        for detail in &summary.details {
            writeln!(
                output,
                "{} {} ({:.0}%)",
                status_glyph(detail.status),
                detail.claim,
                detail.confidence * 100.0
            )?;
            for issue in &detail.issues {
                writeln!(output, "   {} {}", style("→").dim(), issue)?;
            }
        }
    }
    writeln!(output, "{}", "=".repeat(80))?;

    Ok(output)
}

/// Print one audit result to stdout
pub fn print_audit_result(result: &AuditResult) -> anyhow::Result<()> {
    print!("{}", format_audit_result(result)?);
    Ok(())
}

/// Print the session summary to stdout
pub fn print_audit_summary(summary: &AuditSummary) -> anyhow::Result<()> {
    print!("{}", format_audit_summary(summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditSession;

    fn warning() -> AuditResult {
        AuditResult {
            claim: "Падение трафика".to_string(),
            status: AuditStatus::Warning,
            evidence: vec!["reports/acme/summary.json".to_string()],
            issues: vec!["Low confidence (45%) - consider alternatives".to_string()],
            alternative_hypotheses: vec!["Сезонное снижение активности".to_string()],
            confidence: 0.45,
        }
    }

    #[test]
    fn test_result_lists_issues_and_alternatives() {
        console::set_colors_enabled(false);
        let output = format_audit_result(&warning()).unwrap();
        assert!(output.contains("WARNING"));
        assert!(output.contains("(confidence 45%)"));
        assert!(output.contains("issue: Low confidence"));
        assert!(output.contains("- Сезонное снижение активности"));
    }

    #[test]
    fn test_summary_lists_non_passed_details() {
        console::set_colors_enabled(false);
        let mut session = AuditSession::new("acme");
        session.record(warning());
        let output = format_audit_summary(&session.summary()).unwrap();

        assert!(output.contains("Checks:     1"));
        assert!(output.contains("Warnings:   1"));
        assert!(output.contains("Падение трафика (45%)"));
    }
}
