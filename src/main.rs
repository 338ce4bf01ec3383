//! Floating Sticks
//!
//! Runs the dual-stick host behind a REPL, a recorded trace, or the pad window.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use floating_sticks::config::{AppConfig, ConfigWatcher};
use floating_sticks::host::listener::FanoutListener;
use floating_sticks::host::{ChannelListener, ConsoleListener, HostHandle, HostListener};
use floating_sticks::paths::AppPaths;
use floating_sticks::trace::Trace;
use floating_sticks::{cli, pad};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Floating Sticks - dual virtual analogue sticks with quick-tap detection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults to the per-user config)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Also write daily-rotated logs into the logs directory
    #[arg(long)]
    log_file: bool,

    /// Replay a recorded pointer trace (CSV) and exit
    #[arg(long, value_name = "TRACE")]
    replay: Option<String>,

    /// Interactive prompt (the default when no other mode is given)
    #[arg(long)]
    repl: bool,

    /// Open the touch pad window
    #[arg(long)]
    pad: bool,

    /// Print the config file JSON schema and exit
    #[arg(long)]
    print_schema: bool,

    /// Print stick events as JSON lines instead of colored text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    if args.print_schema {
        println!("{}", AppConfig::schema_json()?);
        return Ok(());
    }

    let paths = AppPaths::detect();
    let _log_guard = init_logging(&args, &paths)?;

    info!("Starting Floating Sticks v{}...", env!("CARGO_PKG_VERSION"));

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            paths.ensure_directories()?;
            paths.config.to_string_lossy().into_owned()
        }
    };
    info!("Configuration file: {}", config_path);

    let (config_watcher, initial_config) = ConfigWatcher::new(config_path).await?;
    let config = (*initial_config).clone();
    info!("Configuration loaded with hot-reload enabled");

    if args.pad {
        let (channel, events) = ChannelListener::unbounded();
        let channel: Arc<dyn HostListener> = Arc::new(channel);
        let console: Arc<dyn HostListener> = Arc::new(ConsoleListener::new(args.json));
        let listener = FanoutListener::new(vec![channel, console]);
        let host = HostHandle::spawn(&config, Arc::new(listener));
        let reload = tokio::spawn(apply_config_updates(config_watcher, host.clone()));

        pad::run_pad(host.clone(), events, &config)?;

        reload.abort();
        host.shutdown();
        info!("Floating Sticks shutdown complete");
        return Ok(());
    }

    let host = HostHandle::spawn(&config, Arc::new(ConsoleListener::new(args.json)));
    let reload = tokio::spawn(apply_config_updates(config_watcher, host.clone()));

    if let Some(trace_path) = &args.replay {
        let trace = Trace::load(trace_path)
            .await
            .with_context(|| format!("Failed to load trace {}", trace_path))?;
        trace.replay(&host).await?;

        // Let pending returns and hides play out before exiting
        tokio::time::sleep(settle_time(&config)).await;
    } else {
        if !args.repl {
            info!("No mode given, starting the REPL");
        }
        tokio::select! {
            result = cli::run_repl(host.clone()) => result?,
            _ = shutdown_signal() => {}
        }
    }

    reload.abort();
    host.shutdown();
    info!("Floating Sticks shutdown complete");
    Ok(())
}

async fn apply_config_updates(mut watcher: ConfigWatcher, host: HostHandle) {
    while let Some(new_config) = watcher.next_config().await {
        info!("Configuration file changed, applying");
        if host.apply_config(new_config).is_err() {
            break;
        }
    }
}

fn settle_time(config: &AppConfig) -> Duration {
    let longest_return = config
        .sticks
        .left
        .return_to_center_delay_ms
        .max(config.sticks.right.return_to_center_delay_ms);
    Duration::from_millis(longest_return.max(config.host.hide_delay_ms) + 50)
}

fn init_logging(args: &Args, paths: &AppPaths) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));

    // stdout carries stick events, so logs go to stderr
    let console = match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let (file, guard) = if args.log_file {
        std::fs::create_dir_all(&paths.logs_dir)
            .with_context(|| format!("Failed to create {}", paths.logs_dir.display()))?;
        let appender = tracing_appender::rolling::daily(&paths.logs_dir, "floating-sticks.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
