//! Auto-tuning: candidate management, context lifecycle, feedback loop.
//!
//! Kernels declare output variables (a chunk size, a policy choice), request
//! a value inside a [`TuningContext`], run, and record the elapsed time. The
//! global [`Tuner`] sweeps the candidate set and converges on the value with
//! the lowest median cost for the rest of the process lifetime.

mod candidates;
mod context;
mod tuner;

pub use candidates::{Candidates, VariableInfo};
pub use context::TuningContext;
pub use tuner::{fastest_of, global, Tuner, VarId, VarSnapshot, TRIALS_PER_CANDIDATE};
