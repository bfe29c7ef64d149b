//! Per-octant block shape.

use crate::errors::OctotuneError;

/// Dimensions of the cell block carried by every octant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockShape {
    pub bx: u32,
    pub by: u32,
    pub bz: u32,
}

impl BlockShape {
    pub fn new(bx: u32, by: u32, bz: u32) -> Self {
        Self { bx, by, bz }
    }

    /// Cube shape, `n` cells per side.
    pub fn cube(n: u32) -> Self {
        Self::new(n, n, n)
    }

    #[inline]
    pub fn cells_per_block(&self) -> u32 {
        self.bx * self.by * self.bz
    }

    pub fn validate(&self) -> Result<(), OctotuneError> {
        if self.bx == 0 || self.by == 0 || self.bz == 0 {
            return Err(OctotuneError::InvalidShape {
                bx: self.bx,
                by: self.by,
                bz: self.bz,
            });
        }
        Ok(())
    }
}
