//! Cell index arithmetic: flat index <-> (octant, i, j, k).

use super::shape::BlockShape;

/// Opaque octant handle within a mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OctantId(pub u32);

/// A single cell inside an octant's block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellIndex {
    pub octant: OctantId,
    pub i: u32,
    pub j: u32,
    pub k: u32,
    pub shape: BlockShape,
}

impl CellIndex {
    /// Split a global flat index into octant plus in-block coordinates.
    #[inline]
    pub fn decompose(flat: u32, shape: BlockShape) -> Self {
        let cells_per_block = shape.cells_per_block();
        let octant = OctantId(flat / cells_per_block);
        let local = flat % cells_per_block;
        Self::from_local(octant, local, shape)
    }

    /// Decode an in-block flat offset into (i, j, k).
    #[inline]
    pub fn from_local(octant: OctantId, local: u32, shape: BlockShape) -> Self {
        let bx = shape.bx;
        let by = shape.by;
        let k = local / (bx * by);
        let j = (local - k * bx * by) / bx;
        let i = local - j * bx - k * bx * by;
        Self {
            octant,
            i,
            j,
            k,
            shape,
        }
    }

    /// Global flat index; inverse of [`CellIndex::decompose`].
    #[inline]
    pub fn flat_index(&self) -> u32 {
        let bx = self.shape.bx;
        let by = self.shape.by;
        self.octant.0 * self.shape.cells_per_block() + self.k * bx * by + self.j * bx + self.i
    }

    /// Flat offset within the octant's block.
    #[inline]
    pub fn local_index(&self) -> u32 {
        let bx = self.shape.bx;
        let by = self.shape.by;
        self.k * bx * by + self.j * bx + self.i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_matches_manual_arithmetic() {
        let shape = BlockShape::new(4, 3, 2);
        // flat 30 -> octant 1, local 6 -> k = 0, j = 1, i = 2
        let c = CellIndex::decompose(30, shape);
        assert_eq!(c.octant, OctantId(1));
        assert_eq!((c.i, c.j, c.k), (2, 1, 0));
        assert_eq!(c.flat_index(), 30);
    }

    #[test]
    fn local_index_inverse_of_from_local() {
        let shape = BlockShape::new(5, 7, 3);
        for local in 0..shape.cells_per_block() {
            let c = CellIndex::from_local(OctantId(0), local, shape);
            assert_eq!(c.local_index(), local);
        }
    }
}
