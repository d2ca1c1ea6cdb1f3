//! Console output for comparisons and audits
//!
//! Every reporter has a `format_*` function returning the text, and a
//! `print_*` wrapper that writes it to stdout.

pub mod audit;
pub mod insights;
pub mod table;

pub use audit::{format_audit_result, format_audit_summary, print_audit_result, print_audit_summary};
pub use insights::{format_insights, print_insights, Insights, DEFAULT_DRIVERS};
pub use table::{format_comparison_table, print_comparison_table};
