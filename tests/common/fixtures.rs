//! Test fixture helpers for creating analytics projects
//!
//! A fixture project has the layout the CLI expects under `--root`:
//! `clients/<client>/config.toml`, `dumps/<client>/` with raw payloads and
//! `reports/<client>/` with a report summary.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// Client every fixture is created for
pub const CLIENT: &str = "acme";

/// January 2025, the baseline period of every fixture
pub const P1: [&str; 2] = ["2025-01-01", "2025-01-31"];

/// February 2025, the comparison period of every fixture
pub const P2: [&str; 2] = ["2025-02-01", "2025-02-28"];

/// A complete client config
pub const FULL_CONFIG: &str = r#"
[site]
name = "Acme Shop"

[metrika]
counter_id = 12345
goal_id = 777

[gsc]
site_url = "sc-domain:acme.example"

[webmaster]
user_id = "1"
host_id = "https:acme.example:443"

[reporting]
language = "en"
"#;

/// Analytics report payload: `(dimension name, visits)` rows
pub fn metrika_payload(rows: &[(&str, f64)]) -> Value {
    json!({
        "data": rows
            .iter()
            .map(|(name, visits)| json!({
                "dimensions": [{"name": name}],
                "metrics": [visits, visits * 0.8, 40.0, 2.0, 90.0]
            }))
            .collect::<Vec<_>>()
    })
}

/// Search-console payload: `(query, clicks, impressions)` rows
pub fn gsc_payload(rows: &[(&str, f64, f64)]) -> Value {
    json!({
        "rows": rows
            .iter()
            .map(|(query, clicks, impressions)| json!({
                "keys": [query],
                "clicks": clicks,
                "impressions": impressions,
                "ctr": clicks / impressions,
                "position": 4.2
            }))
            .collect::<Vec<_>>()
    })
}

/// Write `config` as the fixture client's config
pub fn write_config(root: &Path, config: &str) -> anyhow::Result<()> {
    let dir = root.join("clients").join(CLIENT);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config.toml"), config)?;
    Ok(())
}

/// Write a raw payload dump named `<stem>_<start>_<end>.json`
pub fn write_dump(root: &Path, stem: &str, period: [&str; 2], payload: &Value) -> anyhow::Result<()> {
    let dir = root.join("dumps").join(CLIENT);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join(format!("{}_{}_{}.json", stem, period[0], period[1])),
        serde_json::to_string_pretty(payload)?,
    )?;
    Ok(())
}

/// Write a report file under `reports/<client>/`
pub fn write_report(root: &Path, name: &str, contents: &str) -> anyhow::Result<()> {
    let dir = root.join("reports").join(CLIENT);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(name), contents)?;
    Ok(())
}

/// Project with a full config, source and page dumps for both periods,
/// search-console dumps and a report summary
pub fn create_project() -> anyhow::Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    write_config(root, FULL_CONFIG)?;

    write_dump(
        root,
        "metrika_sources",
        P1,
        &metrika_payload(&[("Search engine traffic", 100.0), ("Direct traffic", 0.0)]),
    )?;
    write_dump(
        root,
        "metrika_sources",
        P2,
        &metrika_payload(&[("Search engine traffic", 150.0), ("Direct traffic", 20.0)]),
    )?;
    write_dump(
        root,
        "metrika_pages",
        P1,
        &metrika_payload(&[("https://acme.example/", 80.0), ("https://acme.example/блог", 20.0)]),
    )?;
    write_dump(
        root,
        "metrika_pages",
        P2,
        &metrika_payload(&[("https://acme.example/", 70.0), ("https://acme.example/блог", 60.0)]),
    )?;
    write_dump(
        root,
        "gsc_queries_sc_domain_acme_example",
        P1,
        &gsc_payload(&[("acme shoes", 10.0, 100.0)]),
    )?;
    write_dump(
        root,
        "gsc_queries_sc_domain_acme_example",
        P2,
        &gsc_payload(&[("acme shoes", 30.0, 150.0), ("acme boots", 5.0, 50.0)]),
    )?;

    write_report(
        root,
        "summary.json",
        r#"{"visits_organic": 150, "visits_total": 170, "top_source": "Search engine traffic"}"#,
    )?;

    Ok(temp_dir)
}
