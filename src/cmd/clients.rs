//! Client commands
//!
//! Handles `traffic-audit clients`, `show` and `validate`.

use anyhow::Result;
use console::style;

use crate::config::{validate_client_config, ConfigLoader, ProjectLayout, ValidationSeverity};
use crate::fmt::{glyph, CHECKMARK, CROSSMARK, INFO, WARNING};

/// List configured clients
pub fn cmd_clients(layout: &ProjectLayout) -> Result<()> {
    let clients = ConfigLoader::list_clients(layout)?;

    if clients.is_empty() {
        println!(
            "{} No clients under {}",
            glyph(INFO),
            style(layout.clients_dir().display()).cyan()
        );
        return Ok(());
    }

    for client in clients {
        println!("{}", client);
    }
    Ok(())
}

/// Print a client's resolved configuration
pub fn cmd_show(layout: &ProjectLayout, client: &str) -> Result<()> {
    let config = ConfigLoader::load(layout, client)?;
    let unset = || style("(not set)").dim().to_string();

    println!("{} {}", style(client).bold(), style(&config.site.name).cyan());
    println!("   Timezone:        {}", config.site.timezone);
    println!(
        "   Metrika counter: {}",
        config.counter_id().map_or_else(unset, |id| id.to_string())
    );
    println!(
        "   Metrika goal:    {}",
        config.goal_id().map_or_else(unset, |id| id.to_string())
    );
    println!("   Currency:        {}", config.metrika.currency);
    println!(
        "   GSC site:        {}",
        config.gsc_site_url().map_or_else(unset, str::to_string)
    );
    println!(
        "   Webmaster host:  {}",
        config.webmaster_host_id().map_or_else(unset, str::to_string)
    );
    println!("   Language:        {}", config.reporting.language);
    println!("   LLM enabled:     {}", config.reporting.llm_enabled);
    Ok(())
}

/// Validate a client's configuration, failing on errors
pub fn cmd_validate(layout: &ProjectLayout, client: &str) -> Result<()> {
    let config = ConfigLoader::load(layout, client)?;
    let result = validate_client_config(&config);

    for issue in &result.issues {
        let icon = match issue.severity {
            ValidationSeverity::Error => glyph(CROSSMARK),
            ValidationSeverity::Warning => glyph(WARNING),
            ValidationSeverity::Info => glyph(INFO),
        };
        println!(
            "{} {} {}: {}",
            icon,
            style(issue.severity.as_str()).bold(),
            style(&issue.field).cyan(),
            issue.message
        );
        if let Some(suggestion) = &issue.suggestion {
            println!("   {} {}", style("→").dim(), suggestion);
        }
    }

    if result.has_errors() {
        anyhow::bail!(
            "Config for '{}' has {} error(s)",
            client,
            result.errors().len()
        );
    }

    println!(
        "{} Config for '{}' is valid ({} warning(s))",
        glyph(CHECKMARK),
        client,
        result.warnings().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(layout: &ProjectLayout, client: &str, contents: &str) {
        let dir = layout.client_dir(client);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), contents).unwrap();
    }

    #[test]
    fn test_validate_fails_on_missing_counter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let layout = ProjectLayout::new(temp_dir.path());
        write_config(&layout, "acme", "[site]\nname = \"Acme\"\n");

        let err = cmd_validate(&layout, "acme").unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn test_validate_passes_with_warnings_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let layout = ProjectLayout::new(temp_dir.path());
        write_config(
            &layout,
            "acme",
            "[site]\nname = \"Acme\"\n[metrika]\ncounter_id = 123\n",
        );

        assert!(cmd_validate(&layout, "acme").is_ok());
    }

    #[test]
    fn test_show_missing_client_is_config_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let layout = ProjectLayout::new(temp_dir.path());

        let err = cmd_show(&layout, "ghost").unwrap_err();
        assert!(err.to_string().contains("Config not found"));
    }
}
