use crate::accum::{reduce_energy, AccumBuffers, MergeDiscipline};
use crate::prtls::bnd::BcReport;
use crate::prtls::deposit::{deposit_current, ltrim};
use crate::prtls::interp::{interpolate, Interpolation};
use crate::prtls::push::boris_push;
use crate::{AdvanceError, Current, Emf, Float, ParallelParams, Particle, Result, Species};
use rayon::prelude::*;

/// Fixed pool of workers the particle phase is partitioned over.
pub struct Workers {
    pool: rayon::ThreadPool,
    n_workers: usize,
}

impl Workers {
    /// Builds a pool of `n_workers` threads; 0 picks rayon's default.
    pub fn new(n_workers: usize) -> Result<Workers> {
        let n_workers = if n_workers == 0 {
            rayon::current_num_threads()
        } else {
            n_workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|i| format!("em1d-worker-{}", i))
            .build()
            .map_err(|e| AdvanceError::WorkerPool(e.to_string()))?;
        tracing::info!(n_workers, "built particle worker pool");
        Ok(Workers { pool, n_workers })
    }

    pub fn from_params(params: &ParallelParams) -> Result<Workers> {
        Workers::new(params.n_workers)
    }

    pub fn n_workers(&self) -> usize {
        self.n_workers
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceOptions {
    pub merge: MergeDiscipline,
    pub interpolation: Interpolation,
}

impl From<&ParallelParams> for AdvanceOptions {
    fn from(params: &ParallelParams) -> AdvanceOptions {
        AdvanceOptions {
            merge: params.merge,
            interpolation: params.interpolation,
        }
    }
}

/// Per-step statistics handed back to the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub pushed: usize,
    pub removed: usize,
    pub sorted: bool,
    pub window_moved: bool,
}

impl StepReport {
    fn new(pushed: usize, bc: BcReport) -> StepReport {
        StepReport {
            pushed,
            removed: bc.removed,
            sorted: bc.sorted,
            window_moved: bc.window_moved,
        }
    }
}

// Quantities fixed for the whole step.
#[derive(Clone, Copy, Debug)]
struct StepConsts {
    // 0.5 dt / m_q
    tem: Float,
    dt_dx: Float,
    // q dx / dt
    qnx: Float,
    q: Float,
    interpolation: Interpolation,
}

impl StepConsts {
    fn new(spec: &Species, interpolation: Interpolation) -> StepConsts {
        StepConsts {
            tem: 0.5 * spec.dt / spec.m_q,
            dt_dx: spec.dt / spec.dx,
            qnx: spec.q * spec.dx / spec.dt,
            q: spec.q,
            interpolation,
        }
    }
}

// Interpolate, push, deposit and move one particle. `index` is its
// position in the species collection and labels any error. Returns the
// particle's contribution to the kinetic energy sum.
#[inline(always)]
fn advance_particle(
    index: usize,
    part: &mut Particle,
    emf: &Emf,
    current: &mut Current,
    k: &StepConsts,
) -> Result<f64> {
    let (e, b) = interpolate(emf, part, k.interpolation);
    let pushed = boris_push(index, [part.ux, part.uy, part.uz], e, b, k.tem)?;
    let [ux, uy, uz] = pushed.u;

    // advance position using the new momentum
    let rg = 1.0 / (1.0 + ux * ux + uy * uy + uz * uz).sqrt();
    let dx = k.dt_dx * rg * ux;
    let x1 = part.x + dx;
    let di = ltrim(x1);
    let x_new = x1 - di as Float;
    // also rejects NaN
    if !(0.0..=1.0).contains(&x_new) {
        return Err(AdvanceError::PositionOutOfRange { index, x: x_new });
    }

    let qvy = k.q * uy * rg;
    let qvz = k.q * uz * rg;
    deposit_current(part.ix, di, part.x, dx, k.qnx, qvy, qvz, current);

    part.ix += di;
    part.x = x_new;
    // x1 + 1 may round up to exactly 1 after a left crossing
    if part.x >= 1.0 {
        part.x = 0.0;
        part.ix += 1;
    }
    part.ux = ux;
    part.uy = uy;
    part.uz = uz;
    Ok(pushed.energy)
}

fn warn_on_err<T>(res: Result<T>, species: &str) -> Result<T> {
    if let Err(ref err) = res {
        tracing::warn!(species, error = %err, "particle advance failed");
    }
    res
}

impl Species {
    /// Advances every particle by one time step and accumulates their
    /// current into `current`, which the caller must have zeroed.
    ///
    /// Particles are split into contiguous, equally sized partitions, one
    /// per worker. Each partition deposits into its own private buffer;
    /// once every worker has finished the buffers are merged into
    /// `current` with `opts.merge`. Boundary conditions and the cadence
    /// sort run sequentially afterwards.
    ///
    /// On error `current` is left untouched, while particles already
    /// processed keep their new state.
    pub fn advance(
        &mut self,
        emf: &Emf,
        current: &mut Current,
        workers: &Workers,
        opts: &AdvanceOptions,
    ) -> Result<StepReport> {
        if !cfg!(feature = "unchecked") {
            assert_eq!(emf.dim(), current.dim());
            assert_eq!(emf.dim().nx, self.nx);
        }
        let consts = StepConsts::new(self, opts.interpolation);
        let np = self.particles.len();
        let n_workers = workers.n_workers();
        let chunk_len = ((np + n_workers - 1) / n_workers).max(1);
        // partitions that actually hold particles
        let n_parts = (np + chunk_len - 1) / chunk_len;

        let mut buffers = AccumBuffers::allocate(n_parts, current.dim())?;
        let name = &self.name;
        let particles = &mut self.particles;

        let partials = workers.pool.install(|| {
            particles
                .par_chunks_mut(chunk_len)
                .zip(buffers.as_mut_slice().par_iter_mut())
                .enumerate()
                .map(|(w, (parts, buf))| -> Result<f64> {
                    let offset = w * chunk_len;
                    let mut energy = 0.0;
                    for (i, part) in parts.iter_mut().enumerate() {
                        energy += warn_on_err(
                            advance_particle(offset + i, part, emf, buf, &consts),
                            name,
                        )?;
                    }
                    Ok(energy)
                })
                .collect::<Result<Vec<f64>>>()
        })?;

        // every partition is done once install returns
        workers
            .pool
            .install(|| buffers.merge_into(current, opts.merge))?;

        let energy = reduce_energy(&partials);
        let bc = workers.pool.install(|| self.apply_bc(energy, true))?;
        let report = StepReport::new(np, bc);
        tracing::debug!(
            species = %self.name,
            iter = self.iter,
            pushed = report.pushed,
            removed = report.removed,
            sorted = report.sorted,
            energy = self.energy,
            "advanced species"
        );
        Ok(report)
    }

    /// Single-threaded advance that deposits straight into `current`.
    /// No step, the boundary pass included, touches a rayon pool.
    /// On error the grid holds the contributions of the particles before
    /// the failing one.
    pub fn advance_serial(
        &mut self,
        emf: &Emf,
        current: &mut Current,
        interpolation: Interpolation,
    ) -> Result<StepReport> {
        if !cfg!(feature = "unchecked") {
            assert_eq!(emf.dim(), current.dim());
            assert_eq!(emf.dim().nx, self.nx);
        }
        let consts = StepConsts::new(self, interpolation);
        let np = self.particles.len();
        let mut energy = 0.0;
        for (i, part) in self.particles.iter_mut().enumerate() {
            energy += warn_on_err(advance_particle(i, part, emf, current, &consts), &self.name)?;
        }
        let bc = self.apply_bc(energy, false)?;
        let report = StepReport::new(np, bc);
        tracing::debug!(
            species = %self.name,
            iter = self.iter,
            pushed = report.pushed,
            removed = report.removed,
            sorted = report.sorted,
            energy = self.energy,
            "advanced species serially"
        );
        Ok(report)
    }
}

/// Free-function form of [`Species::advance`].
pub fn advance(
    species: &mut Species,
    emf: &Emf,
    current: &mut Current,
    workers: &Workers,
    opts: &AdvanceOptions,
) -> Result<StepReport> {
    species.advance(emf, current, workers, opts)
}
