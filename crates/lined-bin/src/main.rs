//! lined entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::run_session;
use core_config::{LogConfig, load_from};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Once;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "lined", version, about = "Line buffer editor with batched undo/redo")]
struct Args {
    /// Read the session from this file instead of standard input.
    #[arg(long = "input")]
    pub input: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `lined.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Do not write a log file, whatever the configuration says.
    #[arg(long = "no-log")]
    pub no_log: bool,
}

fn configure_logging(log: &LogConfig) -> Result<Option<WorkerGuard>> {
    let log_path = log.directory.join(&log.file);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log.file.as_str())
        .build(&log.directory)
        .with_context(|| format!("open log file {}", log_path.display()))?;
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let _log_guard = if config.file.log.enabled && !args.no_log {
        configure_logging(&config.file.log)?
    } else {
        None
    };
    install_panic_hook();
    info!(target: "runtime", config = ?config.source, input = ?args.input, "startup");

    let effective = config.effective();
    let stdout = io::stdout().lock();
    let result = match &args.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("open input {}", path.display()))?;
            run_session(BufReader::new(file), stdout, &effective)
        }
        None => run_session(io::stdin().lock(), stdout, &effective),
    };
    match &result {
        Ok(summary) => info!(target: "runtime", ?summary, "shutdown"),
        Err(e) => error!(target: "runtime", error = ?e, "session_failed"),
    }
    result.map(|_| ())
}
