//! Audit data types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Verdict of a single audit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    /// Claim verified
    Passed,
    /// Claim contradicted or unverifiable
    Failed,
    /// Claim plausible but weakly supported
    Warning,
}

impl AuditStatus {
    /// Lowercase name as used in summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Passed => "passed",
            AuditStatus::Failed => "failed",
            AuditStatus::Warning => "warning",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one audit check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// The statement that was checked
    pub claim: String,
    /// Verdict
    pub status: AuditStatus,
    /// Files and values the verdict rests on
    pub evidence: Vec<String>,
    /// Problems found
    pub issues: Vec<String>,
    /// Competing explanations worth ruling out
    pub alternative_hypotheses: Vec<String>,
    /// Confidence in the claim, 0 to 1
    pub confidence: f64,
}

impl AuditResult {
    /// Passed with confidence 1.0 when `issues` is empty, else `failing_status`
    /// with `failing_confidence`
    pub(crate) fn from_issues(
        claim: String,
        evidence: Vec<String>,
        issues: Vec<String>,
        failing_status: AuditStatus,
        failing_confidence: f64,
    ) -> Self {
        let (status, confidence) = if issues.is_empty() {
            (AuditStatus::Passed, 1.0)
        } else {
            (failing_status, failing_confidence)
        };
        Self {
            claim,
            status,
            evidence,
            issues,
            alternative_hypotheses: Vec::new(),
            confidence,
        }
    }

    /// Whether the check passed
    pub fn passed(&self) -> bool {
        self.status == AuditStatus::Passed
    }
}

/// A claimed metric value: numeric when it parses as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    /// Numeric claim, compared numerically
    Number(f64),
    /// Anything else, compared as text
    Text(String),
}

impl ClaimValue {
    /// Number if `raw` parses as one, text otherwise
    ///
    /// ```
    /// use traffic_audit::audit::ClaimValue;
    ///
    /// assert_eq!(ClaimValue::parse("12499"), ClaimValue::Number(12499.0));
    /// assert_eq!(ClaimValue::parse("Q4"), ClaimValue::Text("Q4".to_string()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => ClaimValue::Number(n),
            _ => ClaimValue::Text(raw.to_string()),
        }
    }

    /// Whether a JSON value from a source file equals this claim
    pub fn matches(&self, source: &Value) -> bool {
        match (self, source) {
            (ClaimValue::Number(claimed), Value::Number(n)) => n.as_f64() == Some(*claimed),
            (ClaimValue::Number(claimed), Value::String(s)) => {
                s.trim().parse::<f64>().ok() == Some(*claimed)
            }
            (ClaimValue::Text(claimed), Value::String(s)) => claimed == s,
            (ClaimValue::Text(claimed), other) => *claimed == render_json(other),
            (ClaimValue::Number(_), _) => false,
        }
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::Number(n) => write!(f, "{}", n),
            ClaimValue::Text(s) => f.write_str(s),
        }
    }
}

/// Scalar JSON rendered the way it reads in a report
pub(crate) fn render_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        other => other.to_string(),
    }
}

/// One figure quoted in a report, with where it supposedly came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Metric name, looked up as a top-level key of the source file
    pub metric: String,
    /// Claimed value
    pub value: ClaimValue,
    /// Source file, relative to the client's reports directory
    pub source_file: String,
    /// Period label, informational
    #[serde(default)]
    pub period: String,
    /// Free-form context
    #[serde(default)]
    pub context: BTreeMap<String, Value>,
}

impl DataPoint {
    /// Data point without context
    pub fn new(
        metric: impl Into<String>,
        value: ClaimValue,
        source_file: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            metric: metric.into(),
            value,
            source_file: source_file.into(),
            period: period.into(),
            context: BTreeMap::new(),
        }
    }
}
