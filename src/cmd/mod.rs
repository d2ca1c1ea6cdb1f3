//! Command handlers for the traffic-audit CLI
//!
//! This module contains all command implementations, organized by functionality.
//! Each submodule handles a specific CLI command.

pub mod audit;
pub mod clients;
pub mod compare;
pub mod completions;

// Re-export command functions for convenient access
pub use audit::{
    cmd_audit_calc, cmd_audit_checklist, cmd_audit_cross_ref, cmd_audit_data,
    cmd_audit_hypothesis, cmd_audit_metric, cmd_audit_run,
};
pub use clients::{cmd_clients, cmd_show, cmd_validate};
pub use compare::{cmd_compare, CompareOptions, OutputFormat};
pub use completions::cmd_completions;
