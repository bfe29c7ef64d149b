//! # octotune
//!
//! Auto-tuned cell-wise parallel dispatch over block-structured octree
//! meshes.
//!
//! ## Architecture
//!
//! - **Mesh**: opaque octant collection, each octant carrying a dense
//!   `bx * by * bz` block of cells addressed by flat index or (i, j, k)
//! - **Dispatch**: a generic for-each-cell executor with three rayon
//!   execution-policy variants (flat, block-planes, hierarchical)
//! - **Tuning**: candidate sweep with timing feedback that converges on the
//!   chunk size or policy with the lowest median cost
//! - **Profiling**: scoped regions with a Chrome-trace exportable report

pub mod dispatch;
pub mod errors;
pub mod mesh;
pub mod profiling;
pub mod runtime;
pub mod tuning;

pub use dispatch::{CellExecutor, ExecPolicy, CHUNK_CANDIDATES, DEFAULT_CHUNK_SIZE};
pub use errors::OctotuneError;
pub use mesh::{BlockShape, CellIndex, OctantId, OctreeMesh};
pub use profiling::{Profiler, ProfilerReport, ScopedRegion};
pub use tuning::{fastest_of, Candidates, Tuner, TuningContext, VarId, VariableInfo};
