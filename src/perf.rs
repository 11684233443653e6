//! Conversion step timing.
//!
//! Every converter step runs under a [`ScopedTimer`]. Timers warn when a
//! step exceeds its threshold and, when attached to a [`StepStats`], record
//! the sample so callers can inspect per-step averages.
//!
//! Enable the `profiling` feature to additionally trace every step
//! duration, regardless of threshold:
//! ```toml
//! [dependencies]
//! pdf2img = { features = ["profiling"] }
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use parking_lot::Mutex;
#[cfg(feature = "profiling")]
use tracing::trace;
use tracing::warn;

/// Number of samples to keep per step
const STATS_SAMPLE_COUNT: usize = 100;

/// Time a scope and trace its duration. Zero-cost when profiling is disabled.
///
/// # Example
/// ```ignore
/// fn encode() {
///     profile_scope!("encode");
///     // ... work ...
/// }
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, 0.0);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

pub use profile_scope;

/// Rolling statistics for one step.
#[derive(Debug, Clone)]
pub struct OperationStats {
    samples: VecDeque<f64>,
    count: u64,
    min_ms: f64,
    max_ms: f64,
    sum_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(STATS_SAMPLE_COUNT),
            count: 0,
            min_ms: f64::MAX,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl OperationStats {
    /// Record a new timing sample.
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= STATS_SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    /// Average over the retained samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    /// Total number of recorded samples, including evicted ones.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min_ms }
    }

    pub fn max(&self) -> f64 {
        self.max_ms
    }
}

/// Per-step statistics shared by all conversions of one converter.
#[derive(Debug, Default)]
pub struct StepStats {
    steps: Mutex<HashMap<&'static str, OperationStats>>,
}

impl StepStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, step: &'static str, ms: f64) {
        self.steps.lock().entry(step).or_default().record(ms);
    }

    /// Snapshot of one step's statistics.
    pub fn get(&self, step: &str) -> Option<OperationStats> {
        self.steps.lock().get(step).cloned()
    }

    /// Names of all steps recorded so far, sorted.
    pub fn steps(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.steps.lock().keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// RAII timer: measures from creation to drop.
pub struct ScopedTimer<'a> {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
    stats: Option<&'a StepStats>,
}

impl<'a> ScopedTimer<'a> {
    /// Create a timer that warns above `threshold_ms`.
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
            stats: None,
        }
    }

    /// Also record the duration into `stats` on drop.
    pub fn recording(name: &'static str, threshold_ms: f64, stats: &'a StepStats) -> Self {
        Self {
            stats: Some(stats),
            ..Self::new(name, threshold_ms)
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        if let Some(stats) = self.stats {
            stats.record(self.name, elapsed_ms);
        }

        #[cfg(feature = "profiling")]
        trace!("[PERF] {}: {:.2}ms", self.name, elapsed_ms);

        if self.threshold_ms > 0.0 && elapsed_ms > self.threshold_ms {
            warn!(
                step = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow conversion step"
            );
        }
    }
}
