use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;
use traffic_audit::analysis::{AnalysisKind, Period};
use traffic_audit::audit::Language;
use traffic_audit::cmd::{self, CompareOptions, OutputFormat};
use traffic_audit::config::ProjectLayout;

/// Period-over-period traffic comparison and report auditing
///
/// traffic-audit compares two periods of web-analytics data per dimension,
/// attributes the net change to individual rows, and re-checks the figures
/// quoted in written reports.
#[derive(Parser)]
#[command(name = "traffic-audit", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root holding clients/, data_cache/ and reports/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    no_emoji: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured clients
    Clients,

    /// Show a client's configuration
    Show {
        /// Client name
        client: String,
    },

    /// Validate a client's configuration
    Validate {
        /// Client name
        client: String,
    },

    /// Compare two periods for one analysis kind
    Compare {
        /// Analysis kind: sources, pages, pages-by-source, goals-by-source,
        /// goals-by-page, gsc-queries, gsc-pages, webmaster-queries
        kind: AnalysisKind,

        /// Client name
        client: String,

        /// Period 1 start (YYYY-MM-DD)
        p1_start: String,

        /// Period 1 end (YYYY-MM-DD)
        p1_end: String,

        /// Period 2 start (YYYY-MM-DD)
        p2_start: String,

        /// Period 2 end (YYYY-MM-DD)
        p2_end: String,

        /// Rows kept in the workbook; 0 keeps all (default: 1000 for
        /// search-console kinds, 500 for webmaster queries, 50 otherwise)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Ignore normalized caches and fetch again
        #[arg(long)]
        refresh: bool,

        /// Traffic source for pages-by-source
        #[arg(long)]
        source: Option<String>,

        /// Directory with raw API payloads (default: <root>/dumps/<client>)
        #[arg(long)]
        dump_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Audit report claims
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    /// Verify a metric=value claim against a report file
    Metric {
        /// Claim as metric=value
        claim: String,

        /// Source file, relative to reports/<client>
        #[arg(long)]
        source: String,

        /// Client name
        #[arg(long)]
        client: String,

        /// Period label shown in the claim
        #[arg(long)]
        period: Option<String>,
    },

    /// Re-derive a calculation
    Calc {
        /// Claimed result
        #[arg(allow_negative_numbers = true)]
        result: f64,

        /// Operands
        #[arg(required = true, allow_negative_numbers = true)]
        operands: Vec<f64>,

        /// Operation: sum, delta, pct_change, avg
        #[arg(long)]
        op: String,

        /// Description shown in the claim
        #[arg(long)]
        description: Option<String>,
    },

    /// Compare one metric across sources
    CrossRef {
        /// Metric name
        metric: String,

        /// Readings as label=value
        #[arg(required = true)]
        sources: Vec<String>,
    },

    /// Score a hypothesis against its supporting data
    Hypothesis {
        /// Hypothesis text
        text: String,

        /// Client name
        #[arg(long)]
        client: String,

        /// Supporting data as metric=value@file (repeatable)
        #[arg(long = "data")]
        data: Vec<String>,

        /// Period label for the data points
        #[arg(long)]
        period: Option<String>,

        /// Language of alternatives (default: client's reporting language)
        #[arg(long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Check that a client's workbooks for a period exist and are fresh
    Data {
        /// Client name
        client: String,

        /// Period start (YYYY-MM-DD)
        start: String,

        /// Period end (YYYY-MM-DD)
        end: String,
    },

    /// Run every check in a JSON audit plan
    Run {
        /// Plan file
        plan: PathBuf,

        /// Client name
        #[arg(long)]
        client: String,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the review checklist for an analysis type
    Checklist {
        /// traffic, conversion, seo or hypothesis
        analysis_type: String,

        /// Checklist language
        #[arg(long, value_enum, default_value_t = LangArg::Ru)]
        lang: LangArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LangArg {
    Ru,
    En,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Ru => Language::Ru,
            LangArg::En => Language::En,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_compare(
    layout: &ProjectLayout,
    kind: AnalysisKind,
    client: &str,
    dates: [&str; 4],
    limit: Option<i64>,
    refresh: bool,
    source: Option<String>,
    dump_dir: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let [p1_start, p1_end, p2_start, p2_end] = dates;
    let mut options = CompareOptions::new(
        kind,
        client,
        Period::parse(p1_start, p1_end)?,
        Period::parse(p2_start, p2_end)?,
    );
    if let Some(limit) = limit {
        options.limit = limit;
    }
    options.refresh = refresh;
    options.source = source;
    options.dump_dir = dump_dir;
    options.format = format;
    cmd::cmd_compare(layout, &options)
}

fn run_audit(layout: &ProjectLayout, action: AuditCommands) -> anyhow::Result<()> {
    match action {
        AuditCommands::Metric {
            claim,
            source,
            client,
            period,
        } => cmd::cmd_audit_metric(layout, &client, &claim, &source, period.as_deref()),
        AuditCommands::Calc {
            result,
            operands,
            op,
            description,
        } => cmd::cmd_audit_calc(layout, result, &operands, &op, description.as_deref()),
        AuditCommands::CrossRef { metric, sources } => {
            cmd::cmd_audit_cross_ref(layout, &metric, &sources)
        }
        AuditCommands::Hypothesis {
            text,
            client,
            data,
            period,
            lang,
        } => cmd::cmd_audit_hypothesis(
            layout,
            &client,
            &text,
            &data,
            period.as_deref(),
            lang.map(Language::from),
        ),
        AuditCommands::Data { client, start, end } => {
            cmd::cmd_audit_data(layout, &client, &start, &end)
        }
        AuditCommands::Run {
            plan,
            client,
            strict,
            json,
        } => cmd::cmd_audit_run(layout, &client, &plan, strict, json),
        AuditCommands::Checklist {
            analysis_type,
            lang,
        } => cmd::cmd_audit_checklist(&analysis_type, lang.into()),
    }
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var(traffic_audit::fmt::NO_EMOJI_ENV, "1");
    }

    let layout = ProjectLayout::new(&cli.root);

    let result = match cli.command {
        Some(Commands::Clients) => cmd::cmd_clients(&layout),
        Some(Commands::Show { client }) => cmd::cmd_show(&layout, &client),
        Some(Commands::Validate { client }) => cmd::cmd_validate(&layout, &client),
        Some(Commands::Compare {
            kind,
            client,
            p1_start,
            p1_end,
            p2_start,
            p2_end,
            limit,
            refresh,
            source,
            dump_dir,
            format,
        }) => run_compare(
            &layout,
            kind,
            &client,
            [&p1_start, &p1_end, &p2_start, &p2_end],
            limit,
            refresh,
            source,
            dump_dir,
            format,
        ),
        Some(Commands::Audit { action }) => run_audit(&layout, action),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell, Cli::command());
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("traffic-audit v{}", env!("CARGO_PKG_VERSION"));
            println!("Period-over-period traffic comparison and report auditing\n");
            println!("Usage: traffic-audit [--root DIR] <COMMAND>\n");
            println!("Commands:");
            println!("  clients      List configured clients");
            println!("  show         Show a client's configuration");
            println!("  validate     Validate a client's configuration");
            println!("  compare      Compare two periods for one analysis kind");
            println!("  audit        Audit report claims");
            println!("  completions  Generate shell completions");
            println!("\nRun 'traffic-audit <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use traffic_audit::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
