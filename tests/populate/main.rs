//! Populate integration tests.
//!
//! Every test runs the full phase pipeline against an in-process store
//! (or PostgreSQL, when `POSTGRESQL_CONNECTION_STRING` is set) and checks
//! the committed dataset:
//! 1. Loads a run configuration (fixture file or inline YAML)
//! 2. Runs the orchestrator with a fresh performance monitor
//! 3. Inspects the rows, counts, report and spans

mod batching;
mod blobs;
mod determinism;
mod failures;
mod logging;
mod postgresql_populate;
mod references;
mod resume;

use perf_monitor::PerformanceMonitor;
use seed_core::{RunPlan, SeedConfig};
use seed_populate::{MemoryStore, Orchestrator, RunReport};
use std::io;
use std::sync::{Arc, Mutex};

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/seed_config.yaml");

pub fn fixture_config() -> SeedConfig {
    SeedConfig::from_file(FIXTURE).expect("Failed to load fixture config")
}

pub fn plan_from_yaml(yaml: &str) -> RunPlan {
    SeedConfig::from_yaml(yaml)
        .expect("Failed to parse config")
        .validate()
        .expect("Invalid config")
}

/// Run `plan` against a fresh retaining memory store.
pub async fn populate(plan: RunPlan) -> (Arc<MemoryStore>, Arc<PerformanceMonitor>, RunReport) {
    let store = Arc::new(MemoryStore::retaining());
    let monitor = Arc::new(PerformanceMonitor::new());
    let report = Orchestrator::new(plan, store.clone(), monitor.clone())
        .run()
        .await
        .expect("populate run failed");
    (store, monitor, report)
}

/// In-memory log sink for asserting on progress lines.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Install a thread-local subscriber writing INFO and above to the returned
/// sink. Only valid on a current-thread runtime.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

/// Like [`capture_logs`], filtered by `directives` the way the binary
/// filters its output.
pub fn capture_filtered_logs(
    directives: &str,
) -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(directives))
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
