//! Audit command implementation
//!
//! Handles the `traffic-audit audit` subcommands. Each one runs its checks in
//! a fresh [`AuditSession`], prints the results and fails with
//! [`AnalyticsError::AuditFailed`] when a check failed.

use anyhow::{Context, Result};
use console::style;
use std::collections::BTreeMap;
use std::path::Path;

use crate::analysis::Period;
use crate::audit::{
    checklist, parse_claim, parse_labeled_value, parse_supporting, AuditEngine, AuditPlan,
    AuditResult, AuditSession, DataPoint, Language, CHECKLIST_TYPES,
};
use crate::config::{ConfigLoader, ProjectLayout};
use crate::error::AnalyticsError;
use crate::fmt::{glyph, INFO, MICROSCOPE};
use crate::report::{print_audit_result, print_audit_summary};

/// Reporting language from the client's config, Russian if it cannot be read
fn client_language(layout: &ProjectLayout, client: &str) -> Language {
    match ConfigLoader::load(layout, client) {
        Ok(config) => Language::from_code(&config.reporting.language),
        Err(e) => {
            log::debug!("Using default language for '{}': {:#}", client, e);
            Language::default()
        }
    }
}

fn engine(layout: &ProjectLayout, client: &str, language: Option<Language>) -> AuditEngine {
    let language = language.unwrap_or_else(|| client_language(layout, client));
    AuditEngine::new(layout, client).with_language(language)
}

/// Print one result and turn a failure into an error
fn finish_single(session: &mut AuditSession, result: AuditResult) -> Result<()> {
    print_audit_result(session.record(result))?;
    let summary = session.summary();
    if summary.is_failure(false) {
        return Err(AnalyticsError::AuditFailed {
            failed: summary.failed,
            warnings: summary.warnings,
        }
        .into());
    }
    Ok(())
}

/// Verify a `metric=value` claim against a report file
pub fn cmd_audit_metric(
    layout: &ProjectLayout,
    client: &str,
    claim: &str,
    source_file: &str,
    period: Option<&str>,
) -> Result<()> {
    let (metric, value) = parse_claim(claim)?;
    let data_point = DataPoint::new(metric, value, source_file, period.unwrap_or_default());

    let mut session = AuditSession::new(client);
    let result = engine(layout, client, None).verify_data_source(&data_point);
    finish_single(&mut session, result)
}

/// Re-derive a calculation
pub fn cmd_audit_calc(
    layout: &ProjectLayout,
    result: f64,
    operands: &[f64],
    operation: &str,
    description: Option<&str>,
) -> Result<()> {
    let mut session = AuditSession::new("");
    let audit = AuditEngine::new(layout, "").verify_calculation(
        result,
        operands,
        operation,
        description.unwrap_or(operation),
    );
    finish_single(&mut session, audit)
}

/// Compare `label=value` readings of one metric
pub fn cmd_audit_cross_ref(layout: &ProjectLayout, metric: &str, sources: &[String]) -> Result<()> {
    let sources = sources
        .iter()
        .map(|s| parse_labeled_value(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = AuditSession::new("");
    let result = AuditEngine::new(layout, "").cross_reference(metric, &sources);
    finish_single(&mut session, result)
}

/// Score a hypothesis against `metric=value@file` data points
pub fn cmd_audit_hypothesis(
    layout: &ProjectLayout,
    client: &str,
    hypothesis: &str,
    data: &[String],
    period: Option<&str>,
    language: Option<Language>,
) -> Result<()> {
    let period = period.unwrap_or_default();
    let supporting = data
        .iter()
        .map(|d| parse_supporting(d, period))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = AuditSession::new(client);
    let result =
        engine(layout, client, language).check_hypothesis(hypothesis, &supporting, &BTreeMap::new());
    finish_single(&mut session, result)
}

/// Check that a client's workbooks for a period exist and are fresh
pub fn cmd_audit_data(layout: &ProjectLayout, client: &str, start: &str, end: &str) -> Result<()> {
    let period = Period::parse(start, end)?;
    let mut session = AuditSession::new(client);
    let result = AuditEngine::new(layout, client).audit_data(&period);
    finish_single(&mut session, result)
}

/// Run every check in a plan file and print the summary
pub fn cmd_audit_run(
    layout: &ProjectLayout,
    client: &str,
    plan_path: &Path,
    strict: bool,
    json: bool,
) -> Result<()> {
    let plan = AuditPlan::load(plan_path)?;
    let audit_engine = engine(layout, client, None);
    let mut session = AuditSession::new(client);
    plan.execute(&audit_engine, &mut session);
    let summary = session.summary();

    if json {
        let output =
            serde_json::to_string_pretty(&summary).context("Failed to serialize audit summary")?;
        println!("{}", output);
    } else {
        println!(
            "{} Running {} checks from {}",
            glyph(MICROSCOPE),
            plan.len(),
            style(plan_path.display()).cyan()
        );
        for result in session.results() {
            print_audit_result(result)?;
        }
        print_audit_summary(&summary)?;
    }

    if summary.is_failure(strict) {
        return Err(AnalyticsError::AuditFailed {
            failed: summary.failed,
            warnings: summary.warnings,
        }
        .into());
    }
    Ok(())
}

/// Print the review checklist for an analysis type
pub fn cmd_audit_checklist(analysis_type: &str, language: Language) -> Result<()> {
    let items = checklist(analysis_type, language);
    if items.is_empty() {
        println!(
            "{} No checklist for '{}'. Known types: {}",
            glyph(INFO),
            analysis_type,
            CHECKLIST_TYPES.join(", ")
        );
        return Ok(());
    }

    println!("{} {}", glyph(MICROSCOPE), style(analysis_type).bold());
    for (i, item) in items.iter().enumerate() {
        println!("   {}. {}", i + 1, item);
    }
    Ok(())
}
