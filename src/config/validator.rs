//! Client configuration validation
//!
//! Validators inspect a parsed [`ClientConfig`] and report issues by
//! severity. Errors make the config unusable for any analysis; warnings mark
//! analysis kinds that will be unavailable for the client.

use super::file::ClientConfig;

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    /// Informational message
    Info,
    /// Warning - should be addressed but not blocking
    Warning,
    /// Error - must be fixed
    Error,
}

impl ValidationSeverity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationSeverity::Info => "INFO",
            ValidationSeverity::Warning => "WARNING",
            ValidationSeverity::Error => "ERROR",
        }
    }
}

/// A validation issue found in configuration
///
/// # Examples
///
/// ```
/// use traffic_audit::config::validator::{ValidationIssue, ValidationSeverity};
///
/// let issue = ValidationIssue::error("metrika.counter_id", "Counter id is not set");
/// assert_eq!(issue.severity, ValidationSeverity::Error);
///
/// let warning = ValidationIssue::warning("gsc.site_url", "Search console not configured")
///     .with_suggestion("Add site_url under [gsc]");
/// assert!(warning.suggestion.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity level
    pub severity: ValidationSeverity,
    /// Dotted field name that has the issue
    pub field: String,
    /// Description of the issue
    pub message: String,
    /// Suggested fix (if available)
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new validation issue
    pub fn new(
        severity: ValidationSeverity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create an error issue
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Error, field, message)
    }

    /// Create a warning issue
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Warning, field, message)
    }

    /// Create an info issue
    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationSeverity::Info, field, message)
    }
}

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors)
    pub valid: bool,
    /// Issues found during validation
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    /// Add an issue
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        if issue.severity == ValidationSeverity::Error {
            self.valid = false;
        }
        self.issues.push(issue);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    /// Get only errors
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.by_severity(ValidationSeverity::Error)
    }

    /// Get only warnings
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.by_severity(ValidationSeverity::Warning)
    }

    fn by_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }
}

/// A single configuration check
pub trait ConfigValidator {
    /// Validator name
    fn name(&self) -> &str;

    /// Validate a parsed client config
    fn validate(&self, config: &ClientConfig) -> ValidationResult;
}

/// Fields every analysis depends on
pub struct RequiredFieldsValidator;

impl ConfigValidator for RequiredFieldsValidator {
    fn name(&self) -> &str {
        "required-fields"
    }

    fn validate(&self, config: &ClientConfig) -> ValidationResult {
        let mut result = ValidationResult::success();

        if config.site.name.trim().is_empty() {
            result.add_issue(
                ValidationIssue::error("site.name", "Site name is empty")
                    .with_suggestion("Set name under [site]"),
            );
        }

        if config.metrika.counter_id <= 0 {
            result.add_issue(
                ValidationIssue::error(
                    "metrika.counter_id",
                    format!("Counter id must be positive, got {}", config.metrika.counter_id),
                )
                .with_suggestion("Set counter_id under [metrika]"),
            );
        }

        result
    }
}

/// Optional integrations; a gap disables the analysis kinds that need it
pub struct IntegrationsValidator;

impl ConfigValidator for IntegrationsValidator {
    fn name(&self) -> &str {
        "integrations"
    }

    fn validate(&self, config: &ClientConfig) -> ValidationResult {
        let mut result = ValidationResult::success();

        if config.goal_id().is_none() {
            result.add_issue(
                ValidationIssue::warning(
                    "metrika.goal_id",
                    "Goal id not set: goals-by-source and goals-by-page are unavailable",
                )
                .with_suggestion("Set goal_id under [metrika]"),
            );
        }

        if config.gsc_site_url().is_none() {
            result.add_issue(
                ValidationIssue::warning(
                    "gsc.site_url",
                    "Search console not configured: gsc-queries and gsc-pages are unavailable",
                )
                .with_suggestion("Set site_url under [gsc]"),
            );
        }

        if config.webmaster_host_id().is_none() {
            result.add_issue(
                ValidationIssue::warning(
                    "webmaster.host_id",
                    "Webmaster host not configured: webmaster-queries is unavailable",
                )
                .with_suggestion("Set host_id under [webmaster]"),
            );
        }

        if !matches!(config.reporting.language.as_str(), "ru" | "en") {
            result.add_issue(ValidationIssue::info(
                "reporting.language",
                format!(
                    "Unsupported language '{}', reports fall back to Russian",
                    config.reporting.language
                ),
            ));
        }

        result
    }
}

/// Run the built-in validators in order and merge their issues
pub fn validate_client_config(config: &ClientConfig) -> ValidationResult {
    let validators: [&dyn ConfigValidator; 2] = [&RequiredFieldsValidator, &IntegrationsValidator];

    let mut result = ValidationResult::success();
    for validator in validators {
        let outcome = validator.validate(config);
        log::debug!(
            "Validator '{}' reported {} issue(s)",
            validator.name(),
            outcome.issues.len()
        );
        for issue in outcome.issues {
            result.add_issue(issue);
        }
    }
    result
}
