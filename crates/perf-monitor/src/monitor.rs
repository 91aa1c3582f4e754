//! Span registry implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A completed span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanResult {
    /// Span name
    pub name: String,
    /// Elapsed wall-clock time in milliseconds
    pub duration_ms: u64,
    /// When the span was stopped
    pub timestamp: DateTime<Utc>,
    /// Description passed to `stop`
    pub description: String,
    /// Full-precision elapsed time, used for ordering
    #[serde(skip)]
    pub elapsed: Duration,
}

/// How many times a span name was started and stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanCounts {
    pub starts: u64,
    pub stops: u64,
}

#[derive(Debug, Default)]
struct SpanSlot {
    started: Option<Instant>,
    result: Option<SpanResult>,
    counts: SpanCounts,
}

/// Registry of named timing spans.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    slots: RwLock<HashMap<String, Arc<Mutex<SpanSlot>>>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing_slot(&self, name: &str) -> Option<Arc<Mutex<SpanSlot>>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(name).cloned()
    }

    fn slot(&self, name: &str) -> Arc<Mutex<SpanSlot>> {
        if let Some(slot) = self.existing_slot(name) {
            return slot;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.entry(name.to_string()).or_default().clone()
    }

    /// Start (or restart) the span `name`.
    ///
    /// Starting a span that is already running overwrites the previous start.
    pub fn start(&self, name: &str, description: &str) {
        let slot = self.slot(name);
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.started = Some(Instant::now());
        slot.counts.starts += 1;
        debug!("Span '{}' started: {}", name, description);
    }

    /// Stop the span `name` and record its result, replacing any earlier
    /// result under the same name.
    ///
    /// Returns `None` and logs a warning when the span was never started.
    pub fn stop(&self, name: &str, description: &str) -> Option<SpanResult> {
        let Some(slot) = self.existing_slot(name) else {
            warn!("Span '{}' stopped without a matching start", name);
            return None;
        };
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(started) = slot.started.take() else {
            warn!("Span '{}' stopped without a matching start", name);
            return None;
        };

        let elapsed = started.elapsed();
        let result = SpanResult {
            name: name.to_string(),
            duration_ms: elapsed.as_millis() as u64,
            timestamp: Utc::now(),
            description: description.to_string(),
            elapsed,
        };
        slot.counts.stops += 1;
        slot.result = Some(result.clone());
        debug!("Span '{}' stopped after {:?}: {}", name, elapsed, description);
        Some(result)
    }

    /// Run `operation` inside the span `name`.
    ///
    /// The span is stopped exactly once whether or not the operation fails.
    /// On failure the stop description carries the error and the error is
    /// returned unchanged.
    pub fn measure<T, E, F>(&self, name: &str, description: &str, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        self.start(name, description);
        let outcome = operation();
        self.finish(name, description, &outcome);
        outcome
    }

    /// Async counterpart of [`PerformanceMonitor::measure`].
    pub async fn measure_async<T, E, Fut>(
        &self,
        name: &str,
        description: &str,
        operation: Fut,
    ) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.start(name, description);
        let outcome = operation.await;
        self.finish(name, description, &outcome);
        outcome
    }

    fn finish<T, E: Display>(&self, name: &str, description: &str, outcome: &Result<T, E>) {
        match outcome {
            Ok(_) => {
                self.stop(name, description);
            }
            Err(e) => {
                self.stop(name, &format!("{description} (failed: {e})"));
            }
        }
    }

    /// Last recorded result for `name`.
    pub fn result(&self, name: &str) -> Option<SpanResult> {
        let slot = self.existing_slot(name)?;
        let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.result.clone()
    }

    /// Whether `name` has been started and not yet stopped.
    pub fn is_active(&self, name: &str) -> bool {
        let Some(slot) = self.existing_slot(name) else {
            return false;
        };
        let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.started.is_some()
    }

    /// Start/stop counters for `name`.
    pub fn counts(&self, name: &str) -> SpanCounts {
        let Some(slot) = self.existing_slot(name) else {
            return SpanCounts::default();
        };
        let slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.counts
    }

    /// All recorded results, slowest first.
    pub fn summary(&self) -> Vec<SpanResult> {
        let slots: Vec<Arc<Mutex<SpanSlot>>> = {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            slots.values().cloned().collect()
        };

        let mut results: Vec<SpanResult> = slots
            .iter()
            .filter_map(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .result
                    .clone()
            })
            .collect();
        results.sort_by(|a, b| b.elapsed.cmp(&a.elapsed).then_with(|| a.name.cmp(&b.name)));
        results
    }

    /// Log the summary at info level.
    pub fn log_summary(&self) {
        let summary = self.summary();
        if summary.is_empty() {
            info!("Performance summary: no spans recorded");
            return;
        }
        info!("Performance summary ({} spans, slowest first):", summary.len());
        for result in &summary {
            info!(
                "  {}: {} ms - {}",
                result.name, result.duration_ms, result.description
            );
        }
    }
}
