//! Audit engine: re-checks figures, arithmetic and hypotheses
//!
//! Every check returns an [`AuditResult`]. I/O problems while reading
//! evidence become issues on the result rather than errors.

use super::alternatives::{generate_alternatives, Language};
use super::types::{render_json, AuditResult, AuditStatus, DataPoint};
use crate::analysis::Period;
use crate::config::ProjectLayout;
use crate::infra::{FileSystem, RealFileSystem};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Files older than this many whole days are flagged as stale
pub const STALE_AFTER_DAYS: u64 = 7;

/// Absolute tolerance when re-deriving a calculation
pub const CALCULATION_TOLERANCE: f64 = 0.01;

/// Relative spread between sources above which a cross-reference warns
pub const MAX_SOURCE_DEVIATION_PCT: f64 = 10.0;

/// Workbook prefixes a complete data set must contain
pub const REQUIRED_WORKBOOKS: [&str; 2] = ["analysis_sources_", "analysis_pages_"];

const SECONDS_PER_DAY: u64 = 86_400;

/// Arithmetic a report may claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Sum of all operands
    Sum,
    /// `o[1] - o[0]`
    Delta,
    /// `(o[1] - o[0]) / o[0] * 100`
    PctChange,
    /// Arithmetic mean
    Avg,
}

impl Operation {
    /// Parse `sum`, `delta`, `pct_change` or `avg`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sum" => Some(Operation::Sum),
            "delta" => Some(Operation::Delta),
            "pct_change" => Some(Operation::PctChange),
            "avg" => Some(Operation::Avg),
            _ => None,
        }
    }

    /// Expected result, or the issue preventing one
    fn evaluate(&self, operands: &[f64]) -> Result<f64, String> {
        match (self, operands) {
            (Operation::Sum, _) => Ok(operands.iter().sum()),
            (Operation::Delta, [a, b, ..]) => Ok(b - a),
            (Operation::PctChange, [a, _, ..]) if *a == 0.0 => {
                Err("Division by zero in percent change".to_string())
            }
            (Operation::PctChange, [a, b, ..]) => Ok((b - a) / a * 100.0),
            (Operation::Avg, []) => Err("Average of no operands".to_string()),
            (Operation::Avg, _) => Ok(operands.iter().sum::<f64>() / operands.len() as f64),
            (Operation::Delta | Operation::PctChange, _) => Err(format!(
                "Operation needs 2 operands, got {}",
                operands.len()
            )),
        }
    }
}

/// Re-verifies report claims for one client
pub struct AuditEngine<FS: FileSystem = RealFileSystem> {
    client: String,
    reports_dir: PathBuf,
    cache_dir: PathBuf,
    language: Language,
    now: SystemTime,
    fs: FS,
}

impl AuditEngine<RealFileSystem> {
    /// Engine for `client` under `layout`, on the real filesystem
    pub fn new(layout: &ProjectLayout, client: &str) -> Self {
        Self::with_fs(layout, client, RealFileSystem)
    }
}

impl<FS: FileSystem> AuditEngine<FS> {
    /// Engine with a custom filesystem implementation
    pub fn with_fs(layout: &ProjectLayout, client: &str, fs: FS) -> Self {
        Self {
            client: client.to_string(),
            reports_dir: layout.reports_dir(client),
            cache_dir: layout.cache_dir(client),
            language: Language::default(),
            now: SystemTime::now(),
            fs,
        }
    }

    /// Render alternatives in `language`
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Measure file age against `now` instead of the wall clock
    pub fn with_reference_time(mut self, now: SystemTime) -> Self {
        self.now = now;
        self
    }

    /// Client being audited
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Directory source files are resolved against
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Whole days since `path` was modified, if known
    fn age_days(&self, path: &Path) -> Option<u64> {
        let modified = self.fs.metadata(path).ok()?.modified().ok()?;
        let age = self
            .now
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        Some(age.as_secs() / SECONDS_PER_DAY)
    }

    /// Check that a quoted figure exists, matches and is fresh
    pub fn verify_data_source(&self, data_point: &DataPoint) -> AuditResult {
        let source_path = self.reports_dir.join(&data_point.source_file);

        if !self.fs.exists(&source_path) {
            log::debug!("Source file missing: {}", source_path.display());
            return AuditResult {
                claim: format!("{} = {}", data_point.metric, data_point.value),
                status: AuditStatus::Failed,
                evidence: Vec::new(),
                issues: vec![format!("Source file not found: {}", data_point.source_file)],
                alternative_hypotheses: Vec::new(),
                confidence: 0.0,
            };
        }

        let evidence = vec![source_path.display().to_string()];
        let mut issues = Vec::new();

        match self.lookup_metric(&source_path, &data_point.metric) {
            Ok(None) => issues.push(format!("Metric '{}' not found in source", data_point.metric)),
            Ok(Some(found)) if !data_point.value.matches(&found) => {
                log::debug!("Mismatch for '{}' in {}", data_point.metric, source_path.display());
                issues.push(format!(
                    "Value mismatch: claimed {}, source has {}",
                    data_point.value,
                    render_json(&found)
                ));
            }
            Ok(Some(_)) => {}
            Err(reason) => issues.push(format!("Error reading source: {}", reason)),
        }

        if let Some(days) = self.age_days(&source_path) {
            if days > STALE_AFTER_DAYS {
                issues.push(format!("Data is {} days old - may be stale", days));
            }
        }

        AuditResult::from_issues(
            format!(
                "{} = {} ({})",
                data_point.metric, data_point.value, data_point.period
            ),
            evidence,
            issues,
            AuditStatus::Failed,
            0.0,
        )
    }

    /// Top-level value of `metric` in a JSON object file; null reads as absent
    fn lookup_metric(&self, path: &Path, metric: &str) -> Result<Option<serde_json::Value>, String> {
        let contents = self.fs.read_to_string(path).map_err(|e| e.to_string())?;
        let data: serde_json::Value = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
        let object = data
            .as_object()
            .ok_or_else(|| "expected a JSON object at the top level".to_string())?;
        Ok(object.get(metric).filter(|v| !v.is_null()).cloned())
    }

    /// Re-derive a claimed calculation
    ///
    /// ```
    /// use traffic_audit::audit::{AuditEngine, AuditStatus};
    /// use traffic_audit::config::ProjectLayout;
    ///
    /// let engine = AuditEngine::new(&ProjectLayout::new("."), "acme");
    /// let ok = engine.verify_calculation(5.0, &[2.0, 3.0], "sum", "total");
    /// assert_eq!(ok.status, AuditStatus::Passed);
    ///
    /// let wrong = engine.verify_calculation(6.0, &[2.0, 3.0], "sum", "total");
    /// assert!(wrong.issues[0].contains("5.00"));
    /// ```
    pub fn verify_calculation(
        &self,
        result: f64,
        operands: &[f64],
        operation: &str,
        description: &str,
    ) -> AuditResult {
        let mut issues = Vec::new();

        match Operation::parse(operation) {
            None => issues.push(format!("Unknown operation: {}", operation)),
            Some(op) => match op.evaluate(operands) {
                Ok(expected) if (result - expected).abs() > CALCULATION_TOLERANCE => {
                    issues.push(format!(
                        "Calculation error: expected {:.2}, got {:.2}",
                        expected, result
                    ));
                }
                Ok(_) => {}
                Err(issue) => issues.push(issue),
            },
        }

        AuditResult::from_issues(
            format!("{} = {}", description, result),
            vec![format!("Operands: {:?}, Operation: {}", operands, operation)],
            issues,
            AuditStatus::Failed,
            0.0,
        )
    }

    /// Score a hypothesis against its supporting data
    ///
    /// A `language` entry in `context` overrides the engine's language for
    /// the alternatives.
    pub fn check_hypothesis(
        &self,
        hypothesis: &str,
        supporting_data: &[DataPoint],
        context: &BTreeMap<String, String>,
    ) -> AuditResult {
        if supporting_data.is_empty() {
            return AuditResult {
                claim: hypothesis.to_string(),
                status: AuditStatus::Failed,
                evidence: Vec::new(),
                issues: vec!["No supporting data for hypothesis".to_string()],
                alternative_hypotheses: Vec::new(),
                confidence: 0.0,
            };
        }

        let mut issues = Vec::new();
        let mut evidence = Vec::new();
        for data_point in supporting_data {
            let audit = self.verify_data_source(data_point);
            if audit.status == AuditStatus::Failed {
                issues.extend(audit.issues);
            }
            evidence.extend(audit.evidence);
        }

        let language = context
            .get("language")
            .map_or(self.language, |code| Language::from_code(code));
        let alternatives = generate_alternatives(hypothesis, language);

        let confidence =
            hypothesis_confidence(supporting_data.len(), issues.len(), alternatives.len());
        if confidence < 0.5 {
            issues.push(format!(
                "Low confidence ({:.0}%) - consider alternatives",
                confidence * 100.0
            ));
        }

        let status = if confidence >= 0.7 && issues.is_empty() {
            AuditStatus::Passed
        } else {
            AuditStatus::Warning
        };

        AuditResult {
            claim: hypothesis.to_string(),
            status,
            evidence,
            issues,
            alternative_hypotheses: alternatives,
            confidence,
        }
    }

    /// Compare one metric as reported by several sources
    pub fn cross_reference(&self, metric: &str, sources: &[(String, f64)]) -> AuditResult {
        let evidence = sources
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();
        let mut issues = Vec::new();

        if sources.len() < 2 {
            issues.push("Need at least 2 sources for cross-reference".to_string());
        }

        let values: Vec<f64> = sources.iter().map(|(_, v)| *v).collect();
        if values.windows(2).any(|w| w[0] != w[1]) {
            let max = values.iter().copied().fold(f64::MIN, f64::max);
            let min = values.iter().copied().fold(f64::MAX, f64::min);
            let deviation = if min != 0.0 {
                (max - min) / min * 100.0
            } else {
                100.0
            };

            if deviation > MAX_SOURCE_DEVIATION_PCT {
                let rendered: Vec<String> = values.iter().map(f64::to_string).collect();
                issues.push(format!(
                    "Large deviation between sources: {:.1}% (values: [{}])",
                    deviation,
                    rendered.join(", ")
                ));
            }
        }

        AuditResult::from_issues(
            format!("{}: cross-reference check", metric),
            evidence,
            issues,
            AuditStatus::Warning,
            0.5,
        )
    }

    /// Check that the client's data set for `period` is present and fresh
    ///
    /// Requires the reports and cache directories, plus at least one sources
    /// workbook and one pages workbook with `period` as either compared range.
    pub fn audit_data(&self, period: &Period) -> AuditResult {
        let mut issues = Vec::new();
        let mut evidence = Vec::new();

        if !self.fs.exists(&self.reports_dir) {
            issues.push(format!(
                "Reports directory not found: {}",
                self.reports_dir.display()
            ));
        }
        if !self.fs.exists(&self.cache_dir) {
            issues.push(format!(
                "Cache directory not found: {}",
                self.cache_dir.display()
            ));
        }

        let names = self.cache_file_names();
        let compact = period.compact();
        for prefix in REQUIRED_WORKBOOKS {
            let matching: Vec<&String> = names
                .iter()
                .filter(|name| name.starts_with(prefix) && workbook_covers(name, &compact))
                .collect();

            if matching.is_empty() {
                issues.push(format!("Missing workbook: {}*{}*.json", prefix, compact));
                continue;
            }

            for name in matching {
                let path = self.cache_dir.join(name);
                evidence.push(path.display().to_string());
                if let Some(days) = self.age_days(&path) {
                    if days > STALE_AFTER_DAYS {
                        issues.push(format!("Stale data ({} days old): {}", days, name));
                    }
                }
            }
        }

        AuditResult::from_issues(
            format!("Data files for {} ({})", self.client, period),
            evidence,
            issues,
            AuditStatus::Failed,
            0.0,
        )
    }

    fn cache_file_names(&self) -> Vec<String> {
        let Ok(entries) = self.fs.read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

/// `0.5 + min(0.1·n, 0.3) − 0.1·issues − 0.05·alternatives`, clamped to [0, 1]
pub fn hypothesis_confidence(data_points: usize, issues: usize, alternatives: usize) -> f64 {
    let mut confidence = 0.5;
    confidence += (data_points as f64 * 0.1).min(0.3);
    confidence -= issues as f64 * 0.1;
    confidence -= alternatives as f64 * 0.05;
    confidence.clamp(0.0, 1.0)
}

/// Whether `analysis_..._<p1>__<p2>.json` has `compact` as p1 or p2
fn workbook_covers(file_name: &str, compact: &str) -> bool {
    let Some(stem) = file_name.strip_suffix(".json") else {
        return false;
    };
    let Some((left, p2)) = stem.rsplit_once("__") else {
        return false;
    };
    let p1 = left.rsplit('_').next().unwrap_or_default();
    p1 == compact || p2 == compact
}
