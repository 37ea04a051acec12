use crate::{AdvanceError, Current, Float, GridDim, Result};
use itertools::izip;
use rayon::prelude::*;
use serde::Deserialize;
use std::sync::Mutex;

/// How the private buffers are summed into the shared current grid.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeDiscipline {
    // one buffer at a time under a lock, each adding its whole grid
    Serialized,
    // the grid is cut into slices and every slice sums all buffers
    Partitioned,
}

impl Default for MergeDiscipline {
    fn default() -> MergeDiscipline {
        MergeDiscipline::Partitioned
    }
}

/// One zeroed current buffer per worker. Lives for a single step: it is
/// filled during the particle phase, merged once, then dropped.
pub struct AccumBuffers {
    buffers: Vec<Current>,
}

impl AccumBuffers {
    pub fn allocate(n_workers: usize, dim: GridDim) -> Result<AccumBuffers> {
        let buffers = (0..n_workers)
            .map(|worker| Current::try_new(dim, worker))
            .collect::<Result<Vec<Current>>>()?;
        Ok(AccumBuffers { buffers })
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn as_slice(&self) -> &[Current] {
        &self.buffers
    }

    pub fn as_mut_slice(&mut self) -> &mut [Current] {
        &mut self.buffers
    }

    pub fn merge_into(self, grid: &mut Current, discipline: MergeDiscipline) -> Result<()> {
        merge(grid, &self.buffers, discipline)
    }
}

/// Adds every buffer into `grid`. Must only be called once all workers
/// are done writing their buffers; on return the grid holds the full sum.
pub fn merge(grid: &mut Current, buffers: &[Current], discipline: MergeDiscipline) -> Result<()> {
    if !cfg!(feature = "unchecked") {
        for buf in buffers {
            assert_eq!(buf.dim(), grid.dim());
        }
    }
    tracing::trace!(buffers = buffers.len(), ?discipline, "merging current buffers");
    match discipline {
        MergeDiscipline::Serialized => merge_serialized(grid, buffers),
        MergeDiscipline::Partitioned => {
            merge_partitioned(grid, buffers);
            Ok(())
        }
    }
}

fn merge_serialized(grid: &mut Current, buffers: &[Current]) -> Result<()> {
    let shared = Mutex::new(grid);
    buffers.par_iter().try_for_each(|buf| {
        let mut grid = shared.lock().map_err(|_| AdvanceError::MergeLockPoisoned)?;
        grid.add(buf);
        Ok(())
    })
}

fn merge_partitioned(grid: &mut Current, buffers: &[Current]) {
    let n_parts = buffers.len().max(1);
    for (dst, srcs) in [
        (
            &mut grid.j_x.spatial,
            buffers.iter().map(|b| &b.j_x.spatial[..]).collect::<Vec<_>>(),
        ),
        (
            &mut grid.j_y.spatial,
            buffers.iter().map(|b| &b.j_y.spatial[..]).collect::<Vec<_>>(),
        ),
        (
            &mut grid.j_z.spatial,
            buffers.iter().map(|b| &b.j_z.spatial[..]).collect::<Vec<_>>(),
        ),
    ] {
        merge_component(dst, &srcs, n_parts);
    }
}

// Each slice of `dst` is owned by one task, which walks the buffers in
// index order, so the result does not depend on scheduling.
fn merge_component(dst: &mut [Float], srcs: &[&[Float]], n_parts: usize) {
    let chunk_len = ((dst.len() + n_parts - 1) / n_parts).max(1);
    dst.par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(k, slice)| {
            let start = k * chunk_len;
            let end = start + slice.len();
            for src in srcs {
                for (d, s) in izip!(slice.iter_mut(), &src[start..end]) {
                    *d += *s;
                }
            }
        });
}

/// Combines the per-worker energy partials in worker order.
pub fn reduce_energy(partials: &[f64]) -> f64 {
    partials.iter().sum()
}
