//! Tuning-round lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use super::tuner::{Tuner, VarId};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// One tuning round: request values, run the work, record how long it took.
///
/// Recorded measurements are fed back to the tuner when the context is
/// dropped. Requests without a matching [`record_elapsed`] are discarded,
/// so an aborted round does not poison the search.
///
/// [`record_elapsed`]: TuningContext::record_elapsed
pub struct TuningContext<'t> {
    tuner: &'t Tuner,
    id: u64,
    requested: Vec<(VarId, i64)>,
    measurements: Vec<(VarId, i64, f64)>,
}

impl<'t> TuningContext<'t> {
    pub(crate) fn begin(tuner: &'t Tuner) -> Self {
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        debug!(context = id, "begin tuning context");
        Self {
            tuner,
            id,
            requested: Vec::new(),
            measurements: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Value to use for `var` in this round.
    pub fn request(&mut self, var: VarId) -> i64 {
        let value = self.tuner.next_value(var);
        self.requested.push((var, value));
        value
    }

    /// Attach the measured cost of the work that used `var`'s value.
    pub fn record_elapsed(&mut self, var: VarId, elapsed: Duration) {
        if let Some(&(_, value)) = self.requested.iter().rev().find(|(v, _)| *v == var) {
            self.measurements
                .push((var, value, elapsed.as_secs_f64() * 1000.0));
        }
    }

    /// End the round, flushing feedback. Equivalent to dropping the context.
    pub fn end(self) {}
}

impl Drop for TuningContext<'_> {
    fn drop(&mut self) {
        for (var, value, ms) in self.measurements.drain(..) {
            self.tuner.feedback(var, value, ms);
        }
        debug!(context = self.id, "end tuning context");
    }
}
