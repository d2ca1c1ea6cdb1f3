//! Client configuration file data structures

use serde::{Deserialize, Serialize};

/// Configuration file name inside `clients/<client>/`
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-client configuration (`clients/<client>/config.toml`)
///
/// Every section is optional in the file; missing values fall back to the
/// defaults below so a config with only `[site]` and `[metrika]` is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Site description
    #[serde(default)]
    pub site: SiteSettings,

    /// Web-analytics counter settings
    #[serde(default)]
    pub metrika: MetrikaSettings,

    /// Search-console property
    #[serde(default)]
    pub gsc: GscSettings,

    /// Webmaster-tools host
    #[serde(default)]
    pub webmaster: WebmasterSettings,

    /// Report generation settings
    #[serde(default)]
    pub reporting: ReportingSettings,
}

/// `[site]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Human-readable site name
    #[serde(default)]
    pub name: String,

    /// IANA timezone of the analytics counter
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "Europe/Zurich".to_string()
}

/// `[metrika]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetrikaSettings {
    /// Counter id; `0` means not configured
    #[serde(default)]
    pub counter_id: i64,

    /// Conversion goal id; `0` means not configured
    #[serde(default)]
    pub goal_id: i64,

    /// Currency of goal revenue
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for MetrikaSettings {
    fn default() -> Self {
        Self {
            counter_id: 0,
            goal_id: 0,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "RUB".to_string()
}

/// `[gsc]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GscSettings {
    /// Property url, e.g. `sc-domain:example.com`
    #[serde(default)]
    pub site_url: String,
}

/// `[webmaster]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebmasterSettings {
    /// Account user id
    #[serde(default)]
    pub user_id: String,

    /// Host id, e.g. `https:example.com:443`
    #[serde(default)]
    pub host_id: String,
}

/// `[reporting]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportingSettings {
    /// Whether narrative report generation is enabled
    #[serde(default = "default_llm_enabled")]
    pub llm_enabled: bool,

    /// Report language (`ru` or `en`)
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ReportingSettings {
    fn default() -> Self {
        Self {
            llm_enabled: default_llm_enabled(),
            language: default_language(),
        }
    }
}

fn default_llm_enabled() -> bool {
    true
}

fn default_language() -> String {
    "ru".to_string()
}

impl ClientConfig {
    /// Goal id if configured
    pub fn goal_id(&self) -> Option<i64> {
        (self.metrika.goal_id > 0).then_some(self.metrika.goal_id)
    }

    /// Counter id if configured
    pub fn counter_id(&self) -> Option<i64> {
        (self.metrika.counter_id > 0).then_some(self.metrika.counter_id)
    }

    /// Search-console site url if configured
    pub fn gsc_site_url(&self) -> Option<&str> {
        non_empty(&self.gsc.site_url)
    }

    /// Webmaster host id if configured
    pub fn webmaster_host_id(&self) -> Option<&str> {
        non_empty(&self.webmaster.host_id)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
