use crate::{AdvanceError, Particle, Result, Species};
use rayon::prelude::*;

/// When to reorder particles by cell. Checked once per step, after the
/// iteration counter has been advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSchedule {
    // 0 disables sorting
    pub n_sort: u32,
}

impl SortSchedule {
    pub fn new(n_sort: u32) -> SortSchedule {
        SortSchedule { n_sort }
    }

    pub fn is_due(&self, iter: u64) -> bool {
        self.n_sort > 0 && iter % self.n_sort as u64 == 0
    }
}

/// What the post-processing did to the particle collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BcReport {
    pub removed: usize,
    pub window_moved: bool,
    pub sorted: bool,
}

#[inline(always)]
fn wrap_index(ix: i32, nx0: i32) -> i32 {
    ix + if ix < 0 { nx0 } else { 0 } - if ix >= nx0 { nx0 } else { 0 }
}

/// Brings cell indices that left the box back in from the other side.
/// Each particle moves at most one cell per step, so one shift suffices.
pub fn wrap_periodic(parts: &mut [Particle], nx: usize) {
    let nx0 = nx as i32;
    parts
        .par_iter_mut()
        .for_each(|part| part.ix = wrap_index(part.ix, nx0));
}

/// Same as [`wrap_periodic`] on the calling thread.
pub fn wrap_periodic_serial(parts: &mut [Particle], nx: usize) {
    let nx0 = nx as i32;
    for part in parts.iter_mut() {
        part.ix = wrap_index(part.ix, nx0);
    }
}

/// Removes every particle whose cell index is outside [0, nx). A removed
/// slot is overwritten with the last live particle, so the survivors are
/// left in no particular order. Returns the number removed.
pub fn compact_open(parts: &mut Vec<Particle>, nx: usize) -> Result<usize> {
    let nx0 = nx as i32;
    let np = parts.len();
    let mut live = np;
    let mut removed = 0;
    let mut i = 0;
    while i < live {
        let ix = parts[i].ix;
        if ix < 0 || ix >= nx0 {
            live -= 1;
            parts.swap(i, live);
            removed += 1;
            continue;
        }
        i += 1;
    }
    parts.truncate(live);
    check_compaction(parts, np, removed, nx)?;
    Ok(removed)
}

// Every survivor must be inside the box and the counts must add up.
fn check_compaction(parts: &[Particle], np: usize, removed: usize, nx: usize) -> Result<()> {
    let nx0 = nx as i32;
    let kept = parts.iter().filter(|p| p.ix >= 0 && p.ix < nx0).count();
    if kept != parts.len() || kept + removed != np {
        return Err(AdvanceError::CompactionInconsistent { np, kept, removed });
    }
    Ok(())
}

/// Stable counting sort by cell index. All indices must be inside the box.
pub fn sort_by_cell(parts: &mut Vec<Particle>, nx: usize) {
    // counts[k + 1] starts as the population of cell k, then becomes the
    // first slot of cell k + 1
    let mut counts = vec![0usize; nx + 1];
    for part in parts.iter() {
        if !cfg!(feature = "unchecked") {
            assert!(part.ix >= 0 && (part.ix as usize) < nx);
        }
        counts[part.ix as usize + 1] += 1;
    }
    for k in 1..=nx {
        counts[k] += counts[k - 1];
    }
    let mut order = vec![0usize; parts.len()];
    for (i, part) in parts.iter().enumerate() {
        let slot = &mut counts[part.ix as usize];
        order[*slot] = i;
        *slot += 1;
    }
    *parts = order.iter().map(|&i| parts[i]).collect();
}

impl Species {
    /// Shifts the particles one cell left once the window has fallen a
    /// full cell behind the light front. Returns whether it moved.
    pub fn move_window(&mut self) -> bool {
        let front = self.iter as f64 * self.dt as f64;
        if front > self.dx as f64 * (self.n_move + 1) as f64 {
            for part in self.particles.iter_mut() {
                part.ix -= 1;
            }
            self.n_move += 1;
            true
        } else {
            false
        }
    }

    /// Post-processing run after the merge barrier: finalizes the energy
    /// diagnostic, advances `iter`, applies the boundary condition and
    /// sorts on schedule. Only the periodic wrap uses rayon, and only
    /// when `parallel` is set.
    pub(crate) fn apply_bc(&mut self, reduced_energy: f64, parallel: bool) -> Result<BcReport> {
        self.energy = self.q as f64 * self.m_q as f64 * reduced_energy * self.dx as f64;
        self.iter += 1;

        let mut report = BcReport::default();
        if self.absorbs() {
            if self.moving_window {
                report.window_moved = self.move_window();
            }
            report.removed = compact_open(&mut self.particles, self.nx)?;
        } else if parallel {
            wrap_periodic(&mut self.particles, self.nx);
        } else {
            wrap_periodic_serial(&mut self.particles, self.nx);
        }

        if self.sort.is_due(self.iter) {
            tracing::trace!(species = %self.name, iter = self.iter, "sorting particles by cell");
            sort_by_cell(&mut self.particles, self.nx);
            report.sorted = true;
        }
        Ok(report)
    }
}
