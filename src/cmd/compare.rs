//! Compare command implementation
//!
//! Handles `traffic-audit compare`, which compares one analysis kind across
//! two periods for a client and writes the workbook to the client's cache.

use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;

use crate::analysis::{AnalysisKind, Period};
use crate::config::{ConfigLoader, ProjectLayout};
use crate::fmt::{glyph, CHECKMARK};
use crate::pipeline::{AnalysisPipeline, AnalysisRequest, RowOrigin};
use crate::report::{print_comparison_table, print_insights, DEFAULT_DRIVERS};
use crate::sources::DumpDirSource;

/// How the comparison is shown on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Ranked table with totals
    #[default]
    Table,
    /// Top growth and decline drivers
    Insights,
    /// The workbook as pretty JSON
    Json,
}

/// Arguments of one comparison
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Analysis kind
    pub kind: AnalysisKind,
    /// Client name
    pub client: String,
    /// Baseline period
    pub p1: Period,
    /// Comparison period
    pub p2: Period,
    /// Workbook row limit; zero or negative keeps every row
    pub limit: i64,
    /// Bypass normalized caches
    pub refresh: bool,
    /// Traffic source for pages-by-source
    pub source: Option<String>,
    /// Directory holding raw payload dumps; defaults to `<root>/dumps/<client>`
    pub dump_dir: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
}

impl CompareOptions {
    /// Options with the kind's default limit, no refresh and table output
    pub fn new(kind: AnalysisKind, client: impl Into<String>, p1: Period, p2: Period) -> Self {
        Self {
            kind,
            client: client.into(),
            p1,
            p2,
            limit: kind.default_limit(),
            refresh: false,
            source: None,
            dump_dir: None,
            format: OutputFormat::default(),
        }
    }
}

/// Run a comparison and print it
///
/// # Examples
///
/// ```no_run
/// use traffic_audit::analysis::{AnalysisKind, Period};
/// use traffic_audit::cmd::compare::{cmd_compare, CompareOptions};
/// use traffic_audit::config::ProjectLayout;
///
/// let options = CompareOptions::new(
///     AnalysisKind::Sources,
///     "acme",
///     Period::parse("2025-01-01", "2025-01-31")?,
///     Period::parse("2025-02-01", "2025-02-28")?,
/// );
/// cmd_compare(&ProjectLayout::new("."), &options)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The client config is missing or lacks an identifier the kind needs
/// - A period has to be fetched and its raw payload is not in the dump directory
/// - The cache directory is not writable
pub fn cmd_compare(layout: &ProjectLayout, options: &CompareOptions) -> Result<()> {
    let config = ConfigLoader::load(layout, &options.client)?;
    let request = AnalysisRequest::from_config(
        &options.client,
        &config,
        options.kind,
        options.p1,
        options.p2,
        options.source.as_deref(),
    )?
    .with_limit(options.limit)
    .with_refresh(options.refresh);

    let dump_dir = options
        .dump_dir
        .clone()
        .unwrap_or_else(|| layout.dumps_dir(&options.client));
    let source = DumpDirSource::new(dump_dir);

    let outcome = AnalysisPipeline::new(layout.cache_dir(&options.client), &source)
        .run(&request)?;

    match options.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.workbook)
                .context("Failed to serialize workbook")?;
            println!("{}", json);
        }
        OutputFormat::Table | OutputFormat::Insights => {
            if options.format == OutputFormat::Table {
                print_comparison_table(&outcome.workbook)?;
            } else {
                print_insights(&outcome.workbook, DEFAULT_DRIVERS)?;
            }
            let cached = outcome
                .origins
                .iter()
                .filter(|o| **o == RowOrigin::Cache)
                .count();
            println!(
                "\n{} Workbook saved: {} ({} of 2 periods from cache)",
                glyph(CHECKMARK),
                style(outcome.workbook_path.display()).cyan(),
                cached
            );
        }
    }

    Ok(())
}
