//! Execution-policy variants for the cell-wise dispatch.

/// How a cell sweep is split across the rayon pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecPolicy {
    /// One parallel range over every cell of every octant.
    Flat,
    /// Parallel over (octant, z-plane) pairs; each plane is swept serially.
    BlockPlanes,
    /// Parallel league over octants with a nested parallel sweep per block.
    Hierarchical,
}

impl ExecPolicy {
    pub const ALL: [ExecPolicy; 3] = [
        ExecPolicy::Flat,
        ExecPolicy::BlockPlanes,
        ExecPolicy::Hierarchical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExecPolicy::Flat => "flat",
            ExecPolicy::BlockPlanes => "block_planes",
            ExecPolicy::Hierarchical => "hierarchical",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Some(ExecPolicy::Flat),
            "block_planes" => Some(ExecPolicy::BlockPlanes),
            "hierarchical" => Some(ExecPolicy::Hierarchical),
            _ => None,
        }
    }

    /// Policy for a tuner-supplied categorical index, clamped to range.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx.min(Self::ALL.len() - 1)]
    }
}
