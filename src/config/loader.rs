//! Client configuration loading and discovery

use super::file::{ClientConfig, CONFIG_FILE_NAME};
use super::ProjectLayout;
use crate::error::AnalyticsError;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Loads client configs from `<root>/clients/<client>/config.toml`
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a client's config
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use traffic_audit::config::{ConfigLoader, ProjectLayout};
    ///
    /// let layout = ProjectLayout::new(".");
    /// let config = ConfigLoader::load(&layout, "acme")?;
    /// println!("Counter: {}", config.metrika.counter_id);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(layout: &ProjectLayout, client: &str) -> Result<ClientConfig> {
        Self::load_with_fs(layout, client, &RealFileSystem)
    }

    /// Load a client's config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(
        layout: &ProjectLayout,
        client: &str,
        fs: &FS,
    ) -> Result<ClientConfig> {
        let config_path = Self::config_path(layout, client);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AnalyticsError::ConfigNotFound { path: config_path }.into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", config_path.display()));
            }
        };

        let config: ClientConfig = toml_edit::de::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        log::debug!("Loaded config for client '{}'", client);
        Ok(config)
    }

    /// Path of a client's config file
    pub fn config_path(layout: &ProjectLayout, client: &str) -> PathBuf {
        layout.client_dir(client).join(CONFIG_FILE_NAME)
    }

    /// List client directories, sorted, skipping names starting with `_`
    pub fn list_clients(layout: &ProjectLayout) -> Result<Vec<String>> {
        Self::list_clients_with_fs(layout, &RealFileSystem)
    }

    /// List clients with a custom filesystem implementation
    pub fn list_clients_with_fs<FS: FileSystem>(
        layout: &ProjectLayout,
        fs: &FS,
    ) -> Result<Vec<String>> {
        let clients_dir = layout.clients_dir();
        if !fs.exists(&clients_dir) {
            return Ok(Vec::new());
        }

        let mut clients = Vec::new();
        for entry in fs
            .read_dir(&clients_dir)
            .with_context(|| format!("Failed to list {}", clients_dir.display()))?
        {
            let entry = entry.context("Failed to read client directory entry")?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.path().is_dir() && !name.starts_with('_') {
                clients.push(name);
            }
        }

        clients.sort();
        Ok(clients)
    }
}
