//! Analysis pipeline orchestration
//!
//! Implements a complete period-over-period comparison:
//! 1. resolve identifiers from the client config ([`AnalysisRequest`])
//! 2. load cached or freshly fetched rows for both periods
//! 3. compare, attribute and rank
//! 4. build and persist the workbook

pub mod executor;
pub mod request;

pub use executor::{AnalysisOutcome, AnalysisPipeline, RowOrigin};
pub use request::{AnalysisRequest, DEFAULT_TRAFFIC_SOURCE};
