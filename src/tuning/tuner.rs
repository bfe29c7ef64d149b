//! Process-global tuning search: candidate sampling, feedback, convergence.
//!
//! Each declared variable is explored by measuring every candidate
//! `TRIALS_PER_CANDIDATE` times and keeping the one with the lowest median
//! cost. Candidates are visited in a shuffled order so that systematic
//! warm-up effects do not always land on the same value. Override a variable
//! with env `OCTOTUNE_OVERRIDE_<NAME>` (uppercased, non-alphanumerics
//! replaced by `_`).

use std::collections::HashMap;
use std::env;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::OctotuneError;

use super::candidates::{Candidates, VariableInfo};
use super::context::TuningContext;

/// Measurements taken per candidate before a variable converges.
pub const TRIALS_PER_CANDIDATE: usize = 5;

/// Handle to a declared tuning variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarId(pub(crate) usize);

pub(crate) struct VarState {
    info: VariableInfo,
    override_value: Option<i64>,
    order: Vec<i64>,
    samples: HashMap<i64, Vec<f64>>,
    converged: Option<i64>,
}

#[derive(Default)]
struct TunerInner {
    vars: Vec<VarState>,
    by_name: HashMap<String, usize>,
}

/// Search state for all declared variables.
pub struct Tuner {
    inner: Mutex<TunerInner>,
}

/// Observable state of one variable, for reports and `info` output.
#[derive(Clone, Debug, Serialize)]
pub struct VarSnapshot {
    pub name: String,
    pub candidates: usize,
    pub samples: usize,
    pub converged: bool,
    pub best: Option<i64>,
    pub overridden: bool,
}

static GLOBAL_TUNER: OnceLock<Tuner> = OnceLock::new();

/// The process-wide tuner instance.
pub fn global() -> &'static Tuner {
    GLOBAL_TUNER.get_or_init(Tuner::new)
}

impl Tuner {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TunerInner::default()),
        }
    }

    /// Declare a tunable variable. Declaring the same name again returns the
    /// existing handle, so call sites may re-declare on every dispatch.
    pub fn declare_output_var(&self, info: VariableInfo) -> Result<VarId, OctotuneError> {
        info.candidates.validate(&info.name)?;

        let mut inner = self.inner.lock().unwrap();
        if let Some(&idx) = inner.by_name.get(&info.name) {
            return Ok(VarId(idx));
        }

        let values = info.candidates.values();
        let mut order = values.clone();
        order.shuffle(&mut rand::thread_rng());
        let override_value = read_override(&info.name, &info.candidates);

        let samples = values.iter().map(|&v| (v, Vec::new())).collect();
        let idx = inner.vars.len();
        inner.by_name.insert(info.name.clone(), idx);
        debug!(name = %info.name, candidates = values.len(), "declared tuning variable");
        inner.vars.push(VarState {
            info,
            override_value,
            order,
            samples,
            converged: None,
        });
        Ok(VarId(idx))
    }

    /// Open a tuning round. Values requested through the context feed their
    /// recorded timings back when the context ends.
    pub fn new_context(&self) -> TuningContext<'_> {
        TuningContext::begin(self)
    }

    pub fn converged(&self, var: VarId) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.vars[var.0].converged.is_some()
    }

    /// Winning value once the search has converged.
    pub fn best(&self, var: VarId) -> Option<i64> {
        let inner = self.inner.lock().unwrap();
        inner.vars[var.0].converged
    }

    pub fn snapshot(&self) -> Vec<VarSnapshot> {
        let inner = self.inner.lock().unwrap();
        inner
            .vars
            .iter()
            .map(|state| VarSnapshot {
                name: state.info.name.clone(),
                candidates: state.samples.len(),
                samples: state.samples.values().map(Vec::len).sum(),
                converged: state.converged.is_some(),
                best: state.converged,
                overridden: state.override_value.is_some(),
            })
            .collect()
    }

    /// Value to try in the current round.
    pub(crate) fn next_value(&self, var: VarId) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let state = &mut inner.vars[var.0];
        if let Some(v) = state.override_value {
            return v;
        }
        if let Some(best) = state.converged {
            return best;
        }
        for &candidate in &state.order {
            if state.samples[&candidate].len() < TRIALS_PER_CANDIDATE {
                return candidate;
            }
        }
        finalize(state)
    }

    /// Fold one measurement back into the search.
    pub(crate) fn feedback(&self, var: VarId, value: i64, elapsed_ms: f64) {
        let mut inner = self.inner.lock().unwrap();
        let state = &mut inner.vars[var.0];
        if state.override_value.is_some() || state.converged.is_some() {
            return;
        }
        if let Some(times) = state.samples.get_mut(&value) {
            times.push(elapsed_ms);
        }
        if state
            .samples
            .values()
            .all(|times| times.len() >= TRIALS_PER_CANDIDATE)
        {
            finalize(state);
        }
    }
}

impl Default for Tuner {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the candidate with the lowest median and mark the variable converged.
fn finalize(state: &mut VarState) -> i64 {
    let best = state
        .samples
        .iter()
        .filter(|(_, times)| !times.is_empty())
        .map(|(&value, times)| (value, median(times)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(value, _)| value)
        .unwrap_or(state.info.default);
    state.converged = Some(best);
    info!(name = %state.info.name, best, "tuning variable converged");
    best
}

fn median(times: &[f64]) -> f64 {
    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted[sorted.len() / 2]
}

/// Env var name for an override: `foreach_cell.chunk_size` ->
/// `OCTOTUNE_OVERRIDE_FOREACH_CELL_CHUNK_SIZE`.
fn override_env_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("OCTOTUNE_OVERRIDE_{sanitized}")
}

fn read_override(name: &str, candidates: &Candidates) -> Option<i64> {
    let key = override_env_name(name);
    let raw = env::var(&key).ok()?;
    match raw.trim().parse::<i64>() {
        Ok(value) if candidates.contains(value) => {
            info!(name, value, "tuning variable overridden via {key}");
            Some(value)
        }
        Ok(value) => {
            warn!(name, value, "override {key} is not a candidate; ignoring");
            None
        }
        Err(_) => {
            warn!(name, raw = %raw, "override {key} is not an integer; ignoring");
            None
        }
    }
}

/// Time each variant under a categorical variable named `name` and converge
/// on the fastest. Returns the index executed this round.
pub fn fastest_of(name: &str, variants: &mut [&mut dyn FnMut()]) -> Result<usize, OctotuneError> {
    if variants.is_empty() {
        return Err(OctotuneError::NoVariants(name.to_string()));
    }
    let tuner = global();
    let var = tuner.declare_output_var(VariableInfo::categorical(name, variants.len()))?;
    let mut ctx = tuner.new_context();
    let choice = (ctx.request(var).max(0) as usize).min(variants.len() - 1);
    let start = Instant::now();
    variants[choice]();
    ctx.record_elapsed(var, start.elapsed());
    Ok(choice)
}
