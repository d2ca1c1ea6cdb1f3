#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! traffic-audit library
//!
//! Period-over-period comparison of web-analytics data with per-row
//! contribution analysis, plus an audit layer that re-checks the figures a
//! written report quotes. Everything the CLI does is available here.
//!
//! # Basic Example
//!
//! Comparing two periods of normalized rows:
//!
//! ```
//! use traffic_audit::analysis::{compare_periods, AnalysisKind, NormalizedRow};
//!
//! let schema = AnalysisKind::Sources.schema();
//! let p1 = vec![NormalizedRow::new("organic").with("visits", 100.0)];
//! let p2 = vec![
//!     NormalizedRow::new("organic").with("visits", 150.0),
//!     NormalizedRow::new("direct").with("visits", 20.0),
//! ];
//!
//! let rows = compare_periods(&schema, &p1, &p2);
//! assert_eq!(rows[0].key, "organic");
//! assert!((rows[0].contribution_pct - 71.43).abs() < 0.01);
//! ```
//!
//! # Advanced Example: Auditing a Report
//!
//! ```
//! use traffic_audit::audit::{AuditEngine, AuditSession, AuditStatus};
//! use traffic_audit::config::ProjectLayout;
//! use tempfile::TempDir;
//!
//! let root = TempDir::new().unwrap();
//! let layout = ProjectLayout::new(root.path());
//! let engine = AuditEngine::new(&layout, "acme");
//! let mut session = AuditSession::new("acme");
//!
//! session.record(engine.verify_calculation(5.0, &[2.0, 3.0], "sum", "total"));
//! session.record(engine.cross_reference(
//!     "visits",
//!     &[("metrika".to_string(), 1000.0), ("gsc".to_string(), 800.0)],
//! ));
//!
//! let summary = session.summary();
//! assert_eq!(summary.passed, 1);
//! assert_eq!(summary.warnings, 1);
//! assert_eq!(summary.details[0].status, AuditStatus::Warning);
//! ```

/// Period comparison, contribution and ranking
pub mod analysis;
/// Report auditing
pub mod audit;
/// Command handlers for CLI operations
pub mod cmd;
/// Client configuration and project layout
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Comparison pipeline orchestration
pub mod pipeline;
/// Console reporters
pub mod report;
/// Row sources and payload normalization
pub mod sources;
/// Workbooks and the per-client cache
pub mod workbook;
