//! Audit plans: a batch of checks described in one JSON file
//!
//! ```json
//! {
//!   "data_points": [{"metric": "visits", "value": 100, "source_file": "summary.json"}],
//!   "calculations": [{"result": 5, "operands": [2, 3], "operation": "sum"}],
//!   "cross_references": [{"metric": "visits", "sources": [{"label": "metrika", "value": 1000}]}],
//!   "hypotheses": [{"hypothesis": "Рост трафика", "supporting_data": []}]
//! }
//! ```

use super::engine::AuditEngine;
use super::session::AuditSession;
use super::types::DataPoint;
use crate::error::AnalyticsError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A claimed calculation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculationCheck {
    /// Claimed result
    pub result: f64,
    /// Inputs of the calculation
    pub operands: Vec<f64>,
    /// `sum`, `delta`, `pct_change` or `avg`
    pub operation: String,
    /// Label used in the claim; the operation name when empty
    #[serde(default)]
    pub description: String,
}

/// One source's reading of a metric
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceValue {
    /// Source name
    pub label: String,
    /// Reported value
    pub value: f64,
}

/// A metric compared across sources
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrossReferenceCheck {
    /// Metric name
    pub metric: String,
    /// Readings to compare
    pub sources: Vec<SourceValue>,
}

/// A hypothesis with its supporting figures
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HypothesisCheck {
    /// Hypothesis text
    pub hypothesis: String,
    /// Figures backing it
    #[serde(default)]
    pub supporting_data: Vec<DataPoint>,
    /// Extra context; `language` selects the alternatives' language
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

/// Every check to run in one session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuditPlan {
    /// Figures to verify against source files
    pub data_points: Vec<DataPoint>,
    /// Calculations to re-derive
    pub calculations: Vec<CalculationCheck>,
    /// Metrics to compare across sources
    pub cross_references: Vec<CrossReferenceCheck>,
    /// Hypotheses to score
    pub hypotheses: Vec<HypothesisCheck>,
}

impl AuditPlan {
    /// Load a plan from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_fs(path, &RealFileSystem)
    }

    /// Load a plan using a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<Self> {
        let contents = fs.read_to_string(path).map_err(|e| AnalyticsError::Io {
            context: format!("reading audit plan {}", path.display()),
            source: e,
        })?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse audit plan {}", path.display()))
    }

    /// Number of checks the plan will run
    pub fn len(&self) -> usize {
        self.data_points.len()
            + self.calculations.len()
            + self.cross_references.len()
            + self.hypotheses.len()
    }

    /// Whether the plan has no checks
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every check, in plan order by section, into `session`
    pub fn execute<FS: FileSystem>(&self, engine: &AuditEngine<FS>, session: &mut AuditSession) {
        log::info!("Running audit plan with {} checks", self.len());

        for data_point in &self.data_points {
            session.record(engine.verify_data_source(data_point));
        }
        for calc in &self.calculations {
            let description = if calc.description.is_empty() {
                calc.operation.as_str()
            } else {
                calc.description.as_str()
            };
            session.record(engine.verify_calculation(
                calc.result,
                &calc.operands,
                &calc.operation,
                description,
            ));
        }
        for check in &self.cross_references {
            let sources: Vec<(String, f64)> = check
                .sources
                .iter()
                .map(|s| (s.label.clone(), s.value))
                .collect();
            session.record(engine.cross_reference(&check.metric, &sources));
        }
        for check in &self.hypotheses {
            session.record(engine.check_hypothesis(
                &check.hypothesis,
                &check.supporting_data,
                &check.context,
            ));
        }
    }
}
