//! Client configuration and project layout
//!
//! This module provides:
//! - `clients/<client>/config.toml` parsing with defaults
//! - Client discovery
//! - Config validation with per-field severities
//! - The on-disk layout of a project root

pub mod file;
pub mod loader;
pub mod validator;

pub use file::{ClientConfig, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
pub use validator::{
    validate_client_config, ConfigValidator, ValidationIssue, ValidationResult,
    ValidationSeverity,
};

use std::path::{Path, PathBuf};

/// Directory layout under a project root
///
/// ```
/// use traffic_audit::config::ProjectLayout;
/// use std::path::Path;
///
/// let layout = ProjectLayout::new("/srv/analytics");
/// assert_eq!(layout.cache_dir("acme"), Path::new("/srv/analytics/data_cache/acme"));
/// assert_eq!(layout.reports_dir("acme"), Path::new("/srv/analytics/reports/acme"));
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/clients`
    pub fn clients_dir(&self) -> PathBuf {
        self.root.join("clients")
    }

    /// `<root>/clients/<client>`
    pub fn client_dir(&self, client: &str) -> PathBuf {
        self.clients_dir().join(client)
    }

    /// `<root>/data_cache/<client>`
    pub fn cache_dir(&self, client: &str) -> PathBuf {
        self.root.join("data_cache").join(client)
    }

    /// `<root>/reports/<client>`
    pub fn reports_dir(&self, client: &str) -> PathBuf {
        self.root.join("reports").join(client)
    }

    /// `<root>/dumps/<client>`, the default home of raw API payloads
    pub fn dumps_dir(&self, client: &str) -> PathBuf {
        self.root.join("dumps").join(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, "config.toml");
    }

    #[test]
    fn test_layout_client_dir_is_under_clients() {
        let layout = ProjectLayout::new("root");
        assert_eq!(
            layout.client_dir("acme"),
            PathBuf::from("root").join("clients").join("acme")
        );
        assert_eq!(layout.root(), Path::new("root"));
    }
}
