//! Error types with contextual suggestions
//!
//! Configuration and input problems are surfaced as [`AnalyticsError`] so the
//! CLI can print an actionable hint and exit with a sysexits-style code.
//! Everything else travels as `anyhow::Error` with `.context(..)` attached.
//!
//! # Examples
//!
//! ```
//! use traffic_audit::error::AnalyticsError;
//!
//! let error = AnalyticsError::MissingIdentifier {
//!     field: "metrika.goal_id".to_string(),
//!     client: "acme".to_string(),
//! };
//! assert_eq!(error.exit_code(), 78);
//! assert!(error.suggestion().unwrap().contains("config.toml"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before or while running an analysis
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Client configuration file does not exist
    #[error("Config not found: {path}")]
    ConfigNotFound {
        /// Expected path of the config file
        path: PathBuf,
    },

    /// A required identifier is missing or not positive in the client config
    #[error("{field} is not set for client '{client}'")]
    MissingIdentifier {
        /// Dotted config field name, e.g. `metrika.counter_id`
        field: String,
        /// Client name
        client: String,
    },

    /// A period boundary could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// A period ends before it starts
    #[error("Period end ({end}) is before period start ({start})")]
    InvalidPeriod {
        /// Period start as given
        start: String,
        /// Period end as given
        end: String,
    },

    /// Unknown analysis kind on the command line
    #[error("Unknown analysis kind: '{kind}'")]
    UnknownAnalysisKind {
        /// Rejected kind name
        kind: String,
        /// Accepted kind names
        valid_kinds: Vec<String>,
    },

    /// A raw payload the row source needs is missing
    #[error("No raw payload for {kind} at {path}")]
    PayloadNotFound {
        /// Analysis kind being fetched
        kind: String,
        /// Path that was probed
        path: PathBuf,
    },

    /// A `metric=value` style argument could not be parsed
    #[error("Invalid claim '{input}': expected {expected}")]
    InvalidClaim {
        /// Raw argument
        input: String,
        /// Expected shape
        expected: String,
    },

    /// An audit found failed checks, or warnings in strict mode
    #[error("Audit did not pass: {failed} failed, {warnings} warning(s)")]
    AuditFailed {
        /// Failed checks
        failed: usize,
        /// Checks with warnings
        warnings: usize,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl AnalyticsError {
    /// Actionable suggestion for resolving this error, if there is one.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigNotFound { path } => Some(format!(
                "Create {} (see 'traffic-audit clients' for known clients)",
                path.display()
            )),
            Self::MissingIdentifier { field, client } => Some(format!(
                "Set {} in clients/{}/config.toml",
                field, client
            )),
            Self::InvalidDate { .. } => Some("Dates must look like 2025-01-31".to_string()),
            Self::InvalidPeriod { .. } => {
                Some("Swap the dates so the period start comes first".to_string())
            }
            Self::UnknownAnalysisKind { valid_kinds, .. } => {
                Some(format!("Valid kinds: {}", valid_kinds.join(", ")))
            }
            Self::PayloadNotFound { .. } => Some(
                "Export the raw API response into the dump directory, or pass --dump-dir"
                    .to_string(),
            ),
            Self::InvalidClaim { .. } => None,
            Self::AuditFailed { .. } => {
                Some("Review the issues listed above before publishing the report".to_string())
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Unix-style exit code, following sysexits.h conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 66,       // EX_NOINPUT
            Self::MissingIdentifier { .. } => 78,    // EX_CONFIG
            Self::InvalidDate { .. } => 65,          // EX_DATAERR
            Self::InvalidPeriod { .. } => 65,        // EX_DATAERR
            Self::UnknownAnalysisKind { .. } => 64,  // EX_USAGE
            Self::PayloadNotFound { .. } => 66,      // EX_NOINPUT
            Self::InvalidClaim { .. } => 64,         // EX_USAGE
            Self::AuditFailed { .. } => 1,
            Self::Io { .. } => 74,                   // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(suggestion) = error
            .downcast_ref::<AnalyticsError>()
            .and_then(AnalyticsError::suggestion)
        {
            output.push_str(&format!(
                "\n{} {}\n",
                style("help:").cyan().bold(),
                suggestion
            ));
        }

        output
    }

    /// Exit code for an arbitrary error; 1 unless it is an [`AnalyticsError`]
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        error
            .downcast_ref::<AnalyticsError>()
            .map(AnalyticsError::exit_code)
            .unwrap_or(1)
    }
}
