//! Accumulated audit results for one run

use super::types::{AuditResult, AuditStatus};
use serde::Serialize;
use uuid::Uuid;

/// Results of one audit run, owned by the caller
#[derive(Debug, Clone)]
pub struct AuditSession {
    run_id: Uuid,
    client: String,
    results: Vec<AuditResult>,
}

/// A check that did not pass, as listed in the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditDetail {
    /// The statement that was checked
    pub claim: String,
    /// Verdict
    pub status: AuditStatus,
    /// Problems found
    pub issues: Vec<String>,
    /// Confidence in the claim
    pub confidence: f64,
}

/// Aggregate verdict of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    /// Session run id
    pub run_id: String,
    /// Audited client
    pub client: String,
    /// Checks recorded
    pub total_checks: usize,
    /// Checks that passed
    pub passed: usize,
    /// Checks with warnings
    pub warnings: usize,
    /// Checks that failed
    pub failed: usize,
    /// Mean confidence across all checks, 0 when there are none
    pub overall_confidence: f64,
    /// Every check that did not pass, in recording order
    pub details: Vec<AuditDetail>,
}

impl AuditSummary {
    /// Whether the run should count as a failure
    ///
    /// In strict mode warnings fail the run too.
    pub fn is_failure(&self, strict: bool) -> bool {
        self.failed > 0 || (strict && self.warnings > 0)
    }
}

impl AuditSession {
    /// Empty session with a fresh run id
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            client: client.into(),
            results: Vec::new(),
        }
    }

    /// Unique id of this run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Audited client
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Append a result and hand back a reference to it
    pub fn record(&mut self, result: AuditResult) -> &AuditResult {
        if !result.passed() {
            log::debug!("Audit {}: {} ({})", self.run_id, result.claim, result.status);
        }
        self.results.push(result);
        &self.results[self.results.len() - 1]
    }

    /// Results in recording order
    pub fn results(&self) -> &[AuditResult] {
        &self.results
    }

    /// Counts, mean confidence and the non-passed details
    pub fn summary(&self) -> AuditSummary {
        let count = |status: AuditStatus| self.results.iter().filter(|r| r.status == status).count();

        let overall_confidence = if self.results.is_empty() {
            0.0
        } else {
            self.results.iter().map(|r| r.confidence).sum::<f64>() / self.results.len() as f64
        };

        let details = self
            .results
            .iter()
            .filter(|r| !r.passed())
            .map(|r| AuditDetail {
                claim: r.claim.clone(),
                status: r.status,
                issues: r.issues.clone(),
                confidence: r.confidence,
            })
            .collect();

        AuditSummary {
            run_id: self.run_id.to_string(),
            client: self.client.clone(),
            total_checks: self.results.len(),
            passed: count(AuditStatus::Passed),
            warnings: count(AuditStatus::Warning),
            failed: count(AuditStatus::Failed),
            overall_confidence,
            details,
        }
    }
}
