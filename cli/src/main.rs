//! eqlog - ability point and damage rate tracker for EverQuest client logs.
//!
//! Usage: eqlog [--new] [--dps] <log file>
//!
//! Reports go to stdout; diagnostics go to stderr, or to EQLOG_LOG_PATH if set.

mod app_state;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use eqlog_core::{AbilityTracker, DamageAggregator, EventDispatcher, LineSource, StartPosition};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Track ability point and damage rates from an EverQuest log file")]
struct Cli {
    /// Log file to follow, named eqlog_<character>_<server>.txt
    path: PathBuf,

    /// Only parse lines written after startup
    #[arg(long)]
    new: bool,

    /// Enable damage-per-second reporting
    #[arg(long)]
    dps: bool,
}

/// Initialize logging, writing to EQLOG_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("EQLOG_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = app_state::load_config();

    let start = if cli.new {
        StartPosition::End
    } else {
        StartPosition::Beginning
    };
    let source = LineSource::open(&cli.path, start)
        .await
        .map_err(|e| format!("tracker: {}", error_chain(&e)))?
        .with_poll_interval(Duration::from_millis(config.poll_interval_ms));

    let started_at = Local::now().naive_local();
    let character = source.character().to_string();
    info!(
        path = %cli.path.display(),
        character = %character,
        server = source.info().server.as_deref().unwrap_or("unknown"),
        dps = cli.dps,
        "tracking log file"
    );

    let mut builder = EventDispatcher::builder(source)
        .started_at(started_at)
        .handler(AbilityTracker::new(&config, started_at));
    if cli.dps {
        builder = builder.handler(DamageAggregator::new(character, &config, started_at));
    }

    if !cli.new {
        println!("Parsing entire log file");
    }

    let mut handle = builder.build().start();

    let stats = tokio::select! {
        result = handle.wait() => result,
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| format!("signal: {}", e))?;
            info!("interrupted, stopping");
            handle.stop().await
        }
    }
    .map_err(|e| format!("tracker: {}", error_chain(&e)))?;

    info!(
        lines_read = stats.lines_read,
        lines_dispatched = stats.lines_dispatched,
        "done"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
