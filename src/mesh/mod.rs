//! Block-structured octree mesh: octants, block shapes, cell indices.
//!
//! The mesh is treated as an opaque collection of octants, each carrying a
//! dense block of `bx * by * bz` cells. Cells are addressed either by a
//! global flat index or by (octant, i, j, k).

mod index;
mod shape;

pub use index::{CellIndex, OctantId};
pub use shape::BlockShape;

use crate::errors::OctotuneError;

/// Octant collection with a fixed count.
#[derive(Clone, Copy, Debug)]
pub struct OctreeMesh {
    num_octants: u32,
}

impl OctreeMesh {
    pub fn with_octants(num_octants: u32) -> Self {
        Self { num_octants }
    }

    #[inline]
    pub fn num_octants(&self) -> u32 {
        self.num_octants
    }

    /// Total cell count across all octants for the given block shape.
    pub fn total_cells(&self, shape: BlockShape) -> Result<u32, OctotuneError> {
        shape.validate()?;
        shape
            .bx
            .checked_mul(shape.by)
            .and_then(|n| n.checked_mul(shape.bz))
            .and_then(|n| n.checked_mul(self.num_octants))
            .ok_or(OctotuneError::MeshTooLarge {
                octants: self.num_octants,
                cells_per_block: shape.bx.saturating_mul(shape.by).saturating_mul(shape.bz),
            })
    }
}
