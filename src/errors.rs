//! Central error types for octotune.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OctotuneError {
    #[error("Invalid block shape {bx}x{by}x{bz}: all dimensions must be nonzero")]
    InvalidShape { bx: u32, by: u32, bz: u32 },

    #[error("Mesh too large: {octants} octants x {cells_per_block} cells per block overflows the flat index")]
    MeshTooLarge { octants: u32, cells_per_block: u32 },

    #[error("Output length mismatch: expected {expected}, got {actual}")]
    OutputLenMismatch { expected: usize, actual: usize },

    #[error("Tuning variable '{0}' has no candidate values")]
    EmptyCandidates(String),

    #[error("Invalid candidate range for '{name}': lo {lo}, hi {hi}, step {step}")]
    InvalidCandidateRange {
        name: String,
        lo: i64,
        hi: i64,
        step: i64,
    },

    #[error("No variants supplied to fastest_of '{0}'")]
    NoVariants(String),
}
