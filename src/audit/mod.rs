//! Report auditing
//!
//! Re-checks what a written report claims against the files it cites:
//! - quoted figures against their source JSON ([`AuditEngine::verify_data_source`])
//! - arithmetic ([`AuditEngine::verify_calculation`])
//! - agreement between sources ([`AuditEngine::cross_reference`])
//! - hypotheses and their alternatives ([`AuditEngine::check_hypothesis`])
//! - presence and freshness of a client's data set ([`AuditEngine::audit_data`])
//!
//! Results accumulate in an [`AuditSession`] owned by the caller.

pub mod alternatives;
pub mod checklist;
pub mod claim;
pub mod engine;
pub mod plan;
pub mod session;
pub mod types;

pub use alternatives::{generate_alternatives, Language};
pub use checklist::{checklist, CHECKLIST_TYPES};
pub use claim::{parse_claim, parse_labeled_value, parse_supporting};
pub use engine::{AuditEngine, Operation};
pub use plan::AuditPlan;
pub use session::{AuditDetail, AuditSession, AuditSummary};
pub use types::{AuditResult, AuditStatus, ClaimValue, DataPoint};
