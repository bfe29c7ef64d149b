//! Generic for-each-cell dispatch over an octree mesh.

use std::time::Instant;

use rayon::prelude::*;
use tracing::trace;

use crate::errors::OctotuneError;
use crate::mesh::{BlockShape, CellIndex, OctantId, OctreeMesh};
use crate::tuning::{self, Candidates, VariableInfo};

use super::policy::ExecPolicy;

/// Chunk-size candidates offered to the tuner.
pub const CHUNK_CANDIDATES: [i64; 8] = [8, 16, 32, 64, 128, 256, 512, 1024];

/// Chunk size used before the tuner has anything better to say.
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Drives cell-wise kernels over the octants of a mesh.
#[derive(Clone, Copy, Debug)]
pub struct CellExecutor {
    mesh: OctreeMesh,
}

impl CellExecutor {
    pub fn new(mesh: OctreeMesh) -> Self {
        Self { mesh }
    }

    pub fn mesh(&self) -> &OctreeMesh {
        &self.mesh
    }

    /// Dispatch `f` over every cell with an explicit policy and chunk
    /// granularity, writing `f(cell)` into `out[cell.flat_index()]`.
    pub fn fill_cells<T, F>(
        &self,
        label: &str,
        shape: BlockShape,
        policy: ExecPolicy,
        chunk_size: usize,
        out: &mut [T],
        f: F,
    ) -> Result<(), OctotuneError>
    where
        T: Send,
        F: Fn(CellIndex) -> T + Sync,
    {
        let total = self.mesh.total_cells(shape)? as usize;
        if out.len() != total {
            return Err(OctotuneError::OutputLenMismatch {
                expected: total,
                actual: out.len(),
            });
        }
        trace!(label, policy = policy.name(), chunk_size, "dispatch");
        let chunk = chunk_size.max(1);
        match policy {
            ExecPolicy::Flat => run_flat(shape, chunk, out, &f),
            ExecPolicy::BlockPlanes => run_block_planes(shape, chunk, out, &f),
            ExecPolicy::Hierarchical => run_hierarchical(shape, chunk, out, &f),
        }
        Ok(())
    }

    /// Flat dispatch with a tuner-selected chunk size. Returns the chunk
    /// size used this round.
    pub fn fill_cells_tuned_chunk<T, F>(
        &self,
        label: &str,
        shape: BlockShape,
        out: &mut [T],
        f: F,
    ) -> Result<usize, OctotuneError>
    where
        T: Send,
        F: Fn(CellIndex) -> T + Sync,
    {
        let tuner = tuning::global();
        let var = tuner.declare_output_var(VariableInfo::new(
            format!("{label}.chunk_size"),
            Candidates::set(CHUNK_CANDIDATES),
            DEFAULT_CHUNK_SIZE as i64,
        ))?;
        let mut ctx = tuner.new_context();
        let chunk = ctx.request(var).max(1) as usize;
        let start = Instant::now();
        self.fill_cells(label, shape, ExecPolicy::Flat, chunk, out, f)?;
        ctx.record_elapsed(var, start.elapsed());
        Ok(chunk)
    }

    /// Dispatch with a tuner-selected execution policy. Returns the policy
    /// used this round.
    pub fn fill_cells_tuned_policy<T, F>(
        &self,
        label: &str,
        shape: BlockShape,
        out: &mut [T],
        f: F,
    ) -> Result<ExecPolicy, OctotuneError>
    where
        T: Send,
        F: Fn(CellIndex) -> T + Sync,
    {
        let tuner = tuning::global();
        let var = tuner.declare_output_var(VariableInfo::categorical(
            format!("{label}.policy"),
            ExecPolicy::ALL.len(),
        ))?;
        let mut ctx = tuner.new_context();
        let policy = ExecPolicy::from_index(ctx.request(var).max(0) as usize);
        let start = Instant::now();
        self.fill_cells(label, shape, policy, DEFAULT_CHUNK_SIZE, out, f)?;
        ctx.record_elapsed(var, start.elapsed());
        Ok(policy)
    }

    /// Side-effect-only sweep: `f` sees every cell exactly once, no output
    /// buffer.
    pub fn foreach_cell<F>(
        &self,
        label: &str,
        shape: BlockShape,
        f: F,
    ) -> Result<(), OctotuneError>
    where
        F: Fn(CellIndex) + Sync,
    {
        let total = self.mesh.total_cells(shape)?;
        trace!(label, total, "foreach dispatch");
        (0..total)
            .into_par_iter()
            .for_each(|flat| f(CellIndex::decompose(flat, shape)));
        Ok(())
    }
}

fn run_flat<T, F>(shape: BlockShape, chunk: usize, out: &mut [T], f: &F)
where
    T: Send,
    F: Fn(CellIndex) -> T + Sync,
{
    out.par_iter_mut()
        .enumerate()
        .with_min_len(chunk)
        .for_each(|(flat, slot)| {
            *slot = f(CellIndex::decompose(flat as u32, shape));
        });
}

fn run_block_planes<T, F>(shape: BlockShape, chunk: usize, out: &mut [T], f: &F)
where
    T: Send,
    F: Fn(CellIndex) -> T + Sync,
{
    let bx = shape.bx;
    let plane_len = (shape.bx * shape.by) as usize;
    let bz = shape.bz as usize;
    let min_planes = (chunk / plane_len).max(1);
    out.par_chunks_exact_mut(plane_len)
        .enumerate()
        .with_min_len(min_planes)
        .for_each(|(plane_idx, plane)| {
            let octant = OctantId((plane_idx / bz) as u32);
            let k = (plane_idx % bz) as u32;
            for (p, slot) in plane.iter_mut().enumerate() {
                let j = p as u32 / bx;
                let i = p as u32 % bx;
                *slot = f(CellIndex {
                    octant,
                    i,
                    j,
                    k,
                    shape,
                });
            }
        });
}

fn run_hierarchical<T, F>(shape: BlockShape, chunk: usize, out: &mut [T], f: &F)
where
    T: Send,
    F: Fn(CellIndex) -> T + Sync,
{
    let cells_per_block = shape.cells_per_block() as usize;
    out.par_chunks_exact_mut(cells_per_block)
        .enumerate()
        .for_each(|(oct, block)| {
            let octant = OctantId(oct as u32);
            block
                .par_iter_mut()
                .enumerate()
                .with_min_len(chunk)
                .for_each(|(local, slot)| {
                    *slot = f(CellIndex::from_local(octant, local as u32, shape));
                });
        });
}
