//! Named timing spans.
//!
//! A [`PerformanceMonitor`] records wall-clock durations for named operations.
//! One monitor is created per run and passed to whatever needs instrumenting;
//! there is no process-wide instance.
//!
//! Each span name owns its own lock. The registry map is only locked to look
//! up or insert a name, so unrelated spans never serialize on each other.
//!
//! ```rust
//! use perf_monitor::PerformanceMonitor;
//!
//! let monitor = PerformanceMonitor::new();
//! let result: Result<u32, String> = monitor.measure("load", "load users", || Ok(3));
//! assert_eq!(result, Ok(3));
//! assert!(monitor.result("load").is_some());
//! ```

mod monitor;

pub use monitor::{PerformanceMonitor, SpanCounts, SpanResult};
