#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use anyhow::Result;
use core_actions::{SessionSummary, run_session, run_with_engine};
use core_config::{Config, EffectiveConfig};
use core_state::{EditEngine, GrowthPolicy};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Default settings with a small history reservation so growth is exercised.
pub fn config() -> EffectiveConfig {
    let mut cfg = Config::default().effective();
    cfg.initial_capacity = 4;
    cfg.growth_increment = 2;
    cfg
}

pub fn run_with(input: &str, cfg: &EffectiveConfig) -> Result<(String, SessionSummary)> {
    let mut out = Vec::new();
    let summary = run_session(input.as_bytes(), &mut out, cfg)?;
    Ok((String::from_utf8(out)?, summary))
}

pub fn run(input: &str) -> (String, SessionSummary) {
    run_with(input, &config()).expect("session failed")
}

/// Run a session and hand back the engine for inspection.
pub fn run_keeping_engine(input: &str) -> (String, SessionSummary, EditEngine) {
    let cfg = config();
    let mut engine =
        EditEngine::with_policy(GrowthPolicy::new(cfg.initial_capacity, cfg.growth_increment))
            .expect("history reservation");
    let mut out = Vec::new();
    let summary =
        run_with_engine(&mut engine, input.as_bytes(), &mut out, &cfg).expect("session failed");
    (String::from_utf8(out).expect("utf8 output"), summary, engine)
}

pub fn document(engine: &EditEngine) -> Vec<String> {
    engine
        .lines()
        .map(|l| String::from_utf8_lossy(l).into_owned())
        .collect()
}

#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl<'a> Write for LockedWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a TRACE subscriber and return everything it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = BufferWriter {
        inner: buffer.clone(),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    let value = with_default(subscriber, f);
    let bytes = buffer.lock().expect("log buffer poisoned").clone();
    (value, String::from_utf8_lossy(&bytes).into_owned())
}
