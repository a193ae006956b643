//! CLI argument definitions, tracing setup, and the build command.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use threejs_docset_core::{BuildSummary, ProgressReporter, SystemTools};
use threejs_docset_shared::{
    BuildOptions, CONFIG_FILE_NAME, LATEST, Language, VersionRequest, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Build a Dash/Zeal docset from a local three.js checkout.
#[derive(Parser, Debug)]
#[command(
    name = "threejs-docset",
    about = "Generate a three.js docset for Dash and Zeal.",
    long_about = None,
    disable_version_flag = true,
)]
pub(crate) struct Cli {
    /// Documentation language to build.
    #[arg(short, long, value_enum, default_value = "en")]
    pub language: LanguageArg,

    /// Tag to check out, or `latest` for the highest numbered tag.
    #[arg(short = 'v', long = "version", default_value = LATEST)]
    pub version: VersionRequest,

    /// Project root holding the three.js checkout and assets (defaults to the current directory).
    #[arg(long, env = "THREEJS_DOCSET_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file (defaults to `<root>/docset.toml`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (--verbose, --verbose --verbose).
    #[arg(long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Documentation language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LanguageArg {
    En,
    Zh,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::Zh => Language::Zh,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "threejs_docset=info",
        1 => "threejs_docset=debug",
        _ => "threejs_docset=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the build.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().wrap_err("cannot determine current directory")?,
    };
    let root = std::fs::canonicalize(&root)
        .wrap_err_with(|| format!("project root '{}' not found", root.display()))?;

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(&root)?,
    };
    let config_path = cli.config.clone().unwrap_or_else(|| root.join(CONFIG_FILE_NAME));
    info!(
        root = %root.display(),
        config = %config_path.display(),
        "configuration loaded"
    );

    let opts = BuildOptions::new(&root, &config, cli.language.into(), cli.version);

    if !opts.paths.source.is_dir() {
        println!(
            "Please clone {} from {} first.",
            config.project.source_dir, config.project.repository
        );
        std::process::exit(1);
    }

    let reporter = CliProgress::new();
    let summary = threejs_docset_core::build_docset(&opts, &SystemTools, &reporter).await?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!("Build documents for version: {}", summary.version);
    println!();
    println!("  Docset built successfully!");
    println!("  Guides:   {}", summary.counts.guides);
    println!("  Classes:  {}", summary.counts.classes);
    println!("  Samples:  {}", summary.counts.samples);
    println!(
        "  Anchors:  {} in {} pages ({} unmatched)",
        summary.rewrite.anchors_replaced,
        summary.rewrite.pages_changed,
        summary.rewrite.unmatched_candidates
    );
    if summary.counts.skipped_groups > 0 {
        println!("  Skipped:  {} manifest groups", summary.counts.skipped_groups);
    }
    if !summary.script_misses.is_empty() {
        println!("  page.js:  unpatched {}", summary.script_misses.join(", "));
    }
    println!("  Path:     {}", summary.bundle.display());
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _summary: &BuildSummary) {
        self.spinner.finish_and_clear();
    }
}
