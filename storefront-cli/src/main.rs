//! Storefront - render and inspect the product catalog from the terminal
//!
//! Logs go to stderr so rendered HTML and JSON on stdout stay clean.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use storefront_core::StorefrontConfig;

mod catalog_cli;

use catalog_cli::CatalogCommand;

/// Modules that can be traced individually
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
enum TraceModule {
    Store,
    Search,
    Render,
    All,
}

impl TraceModule {
    fn filter_directive(&self) -> &'static str {
        match self {
            TraceModule::Store => "storefront_core::catalog=trace",
            TraceModule::Search => "storefront_core::search=trace",
            TraceModule::Render => "storefront_core::render=trace",
            TraceModule::All => "storefront_core=trace",
        }
    }
}

/// Log levels
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "storefront",
    about = "Render, search, and validate the storefront product catalog",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: CatalogCommand,

    /// Enable tracing for modules (comma-separated: store,search,render,all)
    #[clap(long, value_delimiter = ',', global = true)]
    trace: Vec<TraceModule>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Configuration file (defaults to ./storefront.yaml, then the user config dir)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Feed path or URL, overriding the configuration and STOREFRONT_FEED
    #[clap(long, global = true)]
    feed: Option<String>,
}

fn initialize_tracing(log_level: &LogLevel, trace_modules: &[TraceModule]) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    for module in trace_modules {
        if let Ok(parsed) = module.filter_directive().parse() {
            filter = filter.add_directive(parsed);
        }
    }

    if !trace_modules.is_empty() {
        // Structured output when tracing specific modules
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!(trace_modules = ?trace_modules, "Storefront tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>, feed: Option<String>) -> Result<StorefrontConfig> {
    let mut config = StorefrontConfig::discover(path.map(PathBuf::as_path))
        .context("Failed to load storefront configuration")?;
    if let Some(feed) = feed {
        debug!("Feed location overridden by --feed: {}", feed);
        config.feed = feed;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.trace);

    let config = load_config(cli.config.as_ref(), cli.feed)?;
    cli.command.execute(config).await
}
