//! Metrics collection and reporting using metrics-rs.
//!
//! Recording is a no-op until a recorder is installed; `compare_logs --metrics`
//! installs [`CliRecorder`] and prints its summary after the report.

use std::fmt::Write;
use std::sync::Arc;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use nestrace_log::RecordComparison;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::LogRole;

// ============================================================================
// Metric descriptions
// ============================================================================

/// Register metric descriptions. Call once at startup.
pub fn init() {
    describe_counter!(
        "nestrace_lines_compared_total",
        Unit::Count,
        "Line pairs that parsed on both sides and were compared"
    );
    describe_counter!(
        "nestrace_lines_skipped_total",
        Unit::Count,
        "Line pairs skipped because one side did not parse"
    );
    describe_counter!(
        "nestrace_mismatches_total",
        Unit::Count,
        "Compared line pairs that differed"
    );
    describe_counter!(
        "nestrace_field_mismatches_total",
        Unit::Count,
        "Differing fields, labelled by field"
    );
    describe_gauge!("nestrace_log_lines", Unit::Count, "Lines read per log");
    describe_histogram!(
        "nestrace_load_seconds",
        Unit::Seconds,
        "Time spent reading a log into memory"
    );
}

// ============================================================================
// Metric recording functions
// ============================================================================

#[allow(clippy::cast_precision_loss)]
pub fn record_log_loaded(role: LogRole, lines: usize, seconds: f64) {
    let labels = [("role", role.as_str().to_string())];
    gauge!("nestrace_log_lines", &labels).set(lines as f64);
    histogram!("nestrace_load_seconds", &labels).record(seconds);
}

pub fn record_compared() {
    counter!("nestrace_lines_compared_total").increment(1);
}

pub fn record_skipped() {
    counter!("nestrace_lines_skipped_total").increment(1);
}

/// Record one differing line pair and each of its differing fields.
pub fn record_mismatch(comparison: &RecordComparison) {
    counter!("nestrace_mismatches_total").increment(1);
    for field in comparison.differences.iter().filter_map(|d| d.field()) {
        let labels = [("field", field.label().to_string())];
        counter!("nestrace_field_mismatches_total", &labels).increment(1);
    }
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// Values by rendered key (`name{label=value,...}`).
struct Storage<T>(RwLock<FxHashMap<String, T>>);

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self(RwLock::new(FxHashMap::default()))
    }
}

impl<T: Default> Storage<T> {
    fn update(&self, key: &str, apply: impl FnOnce(&mut T)) {
        let mut values = self.0.write();
        if let Some(value) = values.get_mut(key) {
            apply(value);
        } else {
            let mut value = T::default();
            apply(&mut value);
            values.insert(key.to_string(), value);
        }
    }

    /// Entries ordered by key.
    fn snapshot(&self) -> Vec<(String, T)>
    where
        T: Clone,
    {
        let mut entries: Vec<_> = self
            .0
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// A registered metric bound to its slot in the recorder's storage.
struct Slot<T> {
    key: String,
    storage: Arc<Storage<T>>,
}

impl<T> Slot<T> {
    fn new(key: &Key, storage: &Arc<Storage<T>>) -> Arc<Self> {
        Arc::new(Self {
            key: render_key(key),
            storage: Arc::clone(storage),
        })
    }
}

impl metrics::CounterFn for Slot<u64> {
    fn increment(&self, value: u64) {
        self.storage.update(&self.key, |total| *total += value);
    }

    fn absolute(&self, value: u64) {
        self.storage.update(&self.key, |total| *total = value);
    }
}

impl metrics::GaugeFn for Slot<f64> {
    fn increment(&self, value: f64) {
        self.storage.update(&self.key, |level| *level += value);
    }

    fn decrement(&self, value: f64) {
        self.storage.update(&self.key, |level| *level -= value);
    }

    fn set(&self, value: f64) {
        self.storage.update(&self.key, |level| *level = value);
    }
}

impl metrics::HistogramFn for Slot<Vec<f64>> {
    fn record(&self, value: f64) {
        self.storage.update(&self.key, |samples| samples.push(value));
    }
}

fn render_key(key: &Key) -> String {
    let mut rendered = key.name().to_string();
    let mut labels = key.labels().peekable();
    if labels.peek().is_some() {
        let labels: Vec<String> = labels.map(|l| format!("{}={}", l.key(), l.value())).collect();
        let _ = write!(rendered, "{{{}}}", labels.join(","));
    }
    rendered
}

/// Recorder that keeps metrics in memory for a terminal summary.
#[derive(Default)]
pub struct CliRecorder {
    counters: Arc<Storage<u64>>,
    gauges: Arc<Storage<f64>>,
    histograms: Arc<Storage<Vec<f64>>>,
}

impl CliRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install this recorder as the global metrics recorder.
    ///
    /// Returns `None` if a global recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = self.handle();
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }

    /// A handle sharing this recorder's storage.
    #[must_use]
    pub fn handle(&self) -> CliRecorderHandle {
        CliRecorderHandle {
            counters: Arc::clone(&self.counters),
            gauges: Arc::clone(&self.gauges),
            histograms: Arc::clone(&self.histograms),
        }
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Slot::new(key, &self.counters))
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Slot::new(key, &self.gauges))
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Slot::new(key, &self.histograms))
    }
}

/// Read access to metrics collected by a [`CliRecorder`].
pub struct CliRecorderHandle {
    counters: Arc<Storage<u64>>,
    gauges: Arc<Storage<f64>>,
    histograms: Arc<Storage<Vec<f64>>>,
}

impl CliRecorderHandle {
    #[must_use]
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.counters.0.read().get(key).copied()
    }

    #[must_use]
    pub fn get_gauge(&self, key: &str) -> Option<f64> {
        self.gauges.0.read().get(key).copied()
    }

    /// Render all collected metrics, keys sorted within each section.
    #[must_use]
    pub fn render_summary(&self) -> String {
        let counters = self.counters.snapshot();
        let gauges = self.gauges.snapshot();
        let histograms = self.histograms.snapshot();

        if counters.is_empty() && gauges.is_empty() && histograms.is_empty() {
            return "No metrics collected.\n".to_string();
        }

        let mut out = String::from("\n## Metrics Summary\n\n");
        if !counters.is_empty() {
            section(&mut out, "Counters", &counters, ToString::to_string);
        }
        if !gauges.is_empty() {
            section(&mut out, "Gauges", &gauges, |value| format!("{value:.6}"));
        }
        if !histograms.is_empty() {
            section(&mut out, "Histograms", &histograms, |s| describe_samples(s));
        }
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.render_summary());
    }
}

fn section<T>(
    out: &mut String,
    title: &str,
    entries: &[(String, T)],
    show: impl Fn(&T) -> String,
) {
    let _ = writeln!(out, "### {title}");
    for (key, value) in entries {
        let _ = writeln!(out, "  {key}: {}", show(value));
    }
    out.push('\n');
}

#[allow(clippy::cast_precision_loss)]
fn describe_samples(samples: &[f64]) -> String {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len().max(1) as f64;
    let count = samples.len();
    format!("count={count}, min={min:.6}, max={max:.6}, avg={avg:.6}")
}
