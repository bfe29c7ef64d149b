//! Scoped timing regions and a process-global profiler.
//!
//! Wrap a section in a [`ScopedRegion`] to have its wall time accumulated
//! under a label. [`Profiler::report`] summarizes the regions and can be
//! exported as a Chrome trace (chrome://tracing) JSON array.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
struct RegionStat {
    total: Duration,
    count: u64,
}

/// Accumulated wall time per labeled region.
#[derive(Debug, Default)]
pub struct Profiler {
    regions: Mutex<HashMap<String, RegionStat>>,
}

/// One region in a [`ProfilerReport`].
#[derive(Clone, Debug, Serialize)]
pub struct RegionTiming {
    pub name: String,
    pub total_ms: f64,
    pub count: u64,
    pub mean_ms: f64,
}

/// Summary of every region recorded so far.
#[derive(Clone, Debug, Serialize)]
pub struct ProfilerReport {
    pub regions: Vec<RegionTiming>,
    pub total_ms: f64,
}

/// Chrome trace event (for chrome://tracing).
#[derive(Clone, Debug, Serialize)]
pub struct ChromeTraceEvent {
    pub name: String,
    pub cat: String,
    pub ph: String,
    pub ts: f64,
    pub pid: u32,
    pub tid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dur: Option<f64>,
}

static GLOBAL_PROFILER: OnceLock<Profiler> = OnceLock::new();

/// The process-wide profiler that [`ScopedRegion`] records into.
pub fn global() -> &'static Profiler {
    GLOBAL_PROFILER.get_or_init(Profiler::new)
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, elapsed: Duration) {
        let mut regions = self.regions.lock().unwrap();
        let stat = regions.entry(label.to_string()).or_default();
        stat.total += elapsed;
        stat.count += 1;
    }

    pub fn report(&self) -> ProfilerReport {
        let regions = self.regions.lock().unwrap();
        let mut timings: Vec<RegionTiming> = regions
            .iter()
            .map(|(name, stat)| {
                let total_ms = stat.total.as_secs_f64() * 1000.0;
                RegionTiming {
                    name: name.clone(),
                    total_ms,
                    count: stat.count,
                    mean_ms: if stat.count > 0 {
                        total_ms / stat.count as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();
        timings.sort_by(|a, b| a.name.cmp(&b.name));
        let total_ms = timings.iter().map(|t| t.total_ms).sum();
        ProfilerReport {
            regions: timings,
            total_ms,
        }
    }

    pub fn reset(&self) {
        self.regions.lock().unwrap().clear();
    }
}

impl ProfilerReport {
    /// Export as a flat sequence of begin/end Chrome trace events.
    pub fn to_chrome_trace(&self, pid: u32, tid: u32) -> Vec<ChromeTraceEvent> {
        let mut events = Vec::new();
        let mut ts_us = 0.0f64;
        for region in &self.regions {
            let dur_us = region.total_ms * 1000.0;
            events.push(ChromeTraceEvent {
                name: region.name.clone(),
                cat: "dispatch".to_string(),
                ph: "B".to_string(),
                ts: ts_us,
                pid,
                tid,
                dur: None,
            });
            ts_us += dur_us;
            events.push(ChromeTraceEvent {
                name: region.name.clone(),
                cat: "dispatch".to_string(),
                ph: "E".to_string(),
                ts: ts_us,
                pid,
                tid,
                dur: Some(dur_us),
            });
        }
        events
    }
}

/// RAII timing region; records into the global profiler on drop.
pub struct ScopedRegion {
    label: String,
    start: Instant,
}

impl ScopedRegion {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedRegion {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!(region = %self.label, ms = elapsed.as_secs_f64() * 1000.0, "region closed");
        global().record(&self.label, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_aggregates_counts() {
        let profiler = Profiler::new();
        profiler.record("a", Duration::from_millis(2));
        profiler.record("a", Duration::from_millis(4));
        profiler.record("b", Duration::from_millis(1));
        let report = profiler.report();
        assert_eq!(report.regions.len(), 2);
        let a = &report.regions[0];
        assert_eq!(a.name, "a");
        assert_eq!(a.count, 2);
        assert!((a.total_ms - 6.0).abs() < 1.0);
    }

    #[test]
    fn chrome_trace_pairs_events() {
        let profiler = Profiler::new();
        profiler.record("region", Duration::from_millis(3));
        let events = profiler.report().to_chrome_trace(1, 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].ph, "B");
        assert_eq!(events[1].ph, "E");
    }
}
