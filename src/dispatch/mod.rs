//! Cell-wise parallel dispatch: execution policies and the executor.

mod foreach;
mod policy;

pub use foreach::{CellExecutor, CHUNK_CANDIDATES, DEFAULT_CHUNK_SIZE};
pub use policy::ExecPolicy;
