//! Joblens command-line shell
//!
//! Thin wiring around the workspace crates: reads the run input, resolves
//! configuration, builds the HTTP stack and hands the record stream to a
//! sink. Scraping logic lives in the `crates/` directory.

pub mod input;
pub mod limits;
pub mod runner;
pub mod sink;
pub mod state;

use anyhow::{Context, Result};
use clap::Parser;
use input::ActorInput;
use joblens_core::AppConfig;
use joblens_http::{Fetcher, ReqwestTransport};
use joblens_scanner::{Endpoints, JobScraper};
use limits::Tier;
use runner::{run_scrape, RunReport, RunSettings};
use sink::{JsonLinesSink, RecordSink};
use state::RunState;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Extract job listings from public search pages as JSON Lines.
#[derive(Debug, Parser)]
#[command(name = "joblens", version, about)]
pub struct Cli {
    /// Run input JSON file, or `-` for stdin
    #[arg(long, short)]
    pub input: PathBuf,

    /// Append records to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Persist progress here and resume from it
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Outbound proxy URL, overriding input and config
    #[arg(long)]
    pub proxy: Option<String>,
}

/// Initialize tracing subscriber for logging
///
/// Logs go to stderr; stdout may carry records.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,joblens=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Parse arguments and run one scrape.
pub async fn run() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    info!("Starting Joblens v{}", env!("CARGO_PKG_VERSION"));

    let report = execute(&cli).await?;
    if report.failed > 0 {
        tracing::warn!("Run finished with {} delivery errors", report.failed);
    }
    Ok(())
}

/// Run the scrape described by `cli`.
pub async fn execute(cli: &Cli) -> Result<RunReport> {
    let input = read_input(cli)?;
    let query = input.to_query();
    query.validate()?;

    let config = load_config(cli, &input)?;

    let tier = Tier::from_env();
    let mut options = input.options(&config.scraping);
    options.max_results = tier.effective_max(options.max_results, config.output.free_tier_limit);
    if tier == Tier::Free {
        info!(
            "Free tier: limited to {} results. Subscribe to the actor for unlimited results.",
            config.output.free_tier_limit
        );
    }

    info!(
        "Starting job scraper | keywords='{}' | location='{}' | details={} | max_results={}",
        query.keywords.as_deref().unwrap_or_default(),
        query.location.as_deref().unwrap_or_default(),
        options.fetch_job_details,
        options.max_results
    );

    let transport =
        ReqwestTransport::new(&config.http).context("Failed to build HTTP client")?;
    let fetcher = Fetcher::from_config(&config.http, Arc::new(transport));
    let scraper = JobScraper::new(
        Arc::new(fetcher),
        Endpoints::new(config.scraping.base_url.as_str()),
        options,
    );

    let mut state = match cli.state.as_deref() {
        Some(path) => RunState::load(path)?,
        None => RunState::default(),
    };

    let mut sink = open_sink(cli)?;
    let settings = RunSettings {
        max_results: options.max_results,
        batch_size: config.output.batch_size,
        state_path: cli.state.as_deref(),
        tier,
        free_tier_limit: config.output.free_tier_limit,
    };

    Ok(run_scrape(&scraper, &query, sink.as_mut(), &mut state, &settings).await)
}

fn read_input(cli: &Cli) -> Result<ActorInput> {
    if cli.input.as_os_str() == "-" {
        return ActorInput::from_reader(io::stdin().lock());
    }
    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open input {}", cli.input.display()))?;
    ActorInput::from_reader(file)
}

/// Config file plus env overrides, with the proxy taken from (in order)
/// the command line, the run input, or the config itself.
fn load_config(cli: &Cli, input: &ActorInput) -> Result<AppConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());

    if let Some(proxy) = cli.proxy.clone().or_else(|| input.proxy_url()) {
        config.http.proxy_url = Some(proxy);
    }

    config.validate()?;
    Ok(config)
}

fn open_sink(cli: &Cli) -> Result<Box<dyn RecordSink>> {
    match cli.output.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output {}", path.display()))?;
            Ok(Box::new(JsonLinesSink::new(BufWriter::new(file))))
        }
        None => Ok(Box::new(JsonLinesSink::new(io::stdout()))),
    }
}
