use crate::{AdvanceError, Float, Result, SpeciesParams};
use serde::Deserialize;

pub mod bnd;
pub mod deposit;
pub mod interp;
pub mod push;

use crate::prtls::bnd::SortSchedule;

/// A macro particle. `x` is the position inside cell `ix`, in [0, 1);
/// `ux, uy, uz` are the momentum components normalized to m c.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub ix: i32,
    pub x: Float,
    pub ux: Float,
    pub uy: Float,
    pub uz: Float,
}

impl Particle {
    pub fn new(ix: i32, x: Float, u: [Float; 3]) -> Particle {
        Particle {
            ix,
            x,
            ux: u[0],
            uy: u[1],
            uz: u[2],
        }
    }

    /// Lorentz factor for the current momentum.
    pub fn gamma(&self) -> Float {
        (1.0 + self.ux * self.ux + self.uy * self.uy + self.uz * self.uz).sqrt()
    }

    /// Position in cell units from the left edge of the box.
    pub fn position(&self) -> Float {
        self.ix as Float + self.x
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BcType {
    Periodic,
    // absorbing
    Open,
}

impl Default for BcType {
    fn default() -> BcType {
        BcType::Periodic
    }
}

#[derive(Clone, Debug)]
pub struct Species {
    pub name: String,
    pub(crate) particles: Vec<Particle>,
    pub q: Float,
    pub m_q: Float,
    pub dt: Float,
    pub dx: Float,
    pub nx: usize,
    pub iter: u64,
    pub energy: f64,
    pub bc_type: BcType,
    pub sort: SortSchedule,
    pub moving_window: bool,
    // number of cells the window has moved so far
    pub n_move: u64,
}

impl Species {
    pub fn new(params: &SpeciesParams) -> Result<Species> {
        let finite = [params.q, params.m_q, params.dt, params.dx]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(AdvanceError::InvalidParams(
                "q, m_q, dt and dx must be finite".to_string(),
            ));
        }
        if params.nx == 0 || params.nx > i32::MAX as usize / 2 {
            return Err(AdvanceError::InvalidParams(format!(
                "nx = {} is out of range",
                params.nx
            )));
        }
        if params.dt <= 0.0 || params.dx <= 0.0 {
            return Err(AdvanceError::InvalidParams(
                "dt and dx must be positive".to_string(),
            ));
        }
        if params.m_q == 0.0 {
            return Err(AdvanceError::InvalidParams(
                "charge to mass ratio must be non-zero".to_string(),
            ));
        }
        // particles may move at most one cell per step
        if params.dt > params.dx {
            return Err(AdvanceError::InvalidParams(format!(
                "Courant condition violated: dt = {} > dx = {}",
                params.dt, params.dx
            )));
        }
        Ok(Species {
            name: params.name.clone(),
            particles: Vec::new(),
            q: params.q,
            m_q: params.m_q,
            dt: params.dt,
            dx: params.dx,
            nx: params.nx,
            iter: 0,
            energy: 0.0,
            bc_type: params.bc_type,
            sort: SortSchedule::new(params.n_sort),
            moving_window: params.moving_window,
            n_move: 0,
        })
    }

    pub fn np(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn add_particle(&mut self, part: Particle) {
        if !cfg!(feature = "unchecked") {
            assert!(part.ix >= 0 && (part.ix as usize) < self.nx);
            assert!(part.x >= 0.0 && part.x < 1.0);
        }
        self.particles.push(part);
    }

    pub fn extend<I: IntoIterator<Item = Particle>>(&mut self, parts: I) {
        for part in parts {
            self.add_particle(part);
        }
    }

    // open boundaries apply whenever the window moves, whatever bc_type says
    pub(crate) fn absorbs(&self) -> bool {
        self.moving_window || self.bc_type == BcType::Open
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::build_test_species;

    fn params() -> SpeciesParams {
        SpeciesParams {
            name: "lecs".to_string(),
            q: -1.0,
            m_q: -1.0,
            dt: 0.5,
            dx: 1.0,
            nx: 16,
            bc_type: BcType::Open,
            n_sort: 4,
            moving_window: false,
        }
    }

    #[test]
    fn species_init() {
        let spec = Species::new(&params()).unwrap();
        assert_eq!(spec.np(), 0);
        assert_eq!(spec.iter, 0);
        assert_eq!(spec.energy, 0.0);
        assert_eq!(spec.sort.n_sort, 4);
        assert!(spec.absorbs());
        assert!(!build_test_species().absorbs());
    }

    #[test]
    fn invalid_params_rejected() {
        let mut p = params();
        p.nx = 0;
        assert!(matches!(Species::new(&p), Err(AdvanceError::InvalidParams(_))));

        let mut p = params();
        p.dt = 2.0;
        assert!(matches!(Species::new(&p), Err(AdvanceError::InvalidParams(_))));

        let mut p = params();
        p.m_q = 0.0;
        assert!(matches!(Species::new(&p), Err(AdvanceError::InvalidParams(_))));

        let mut p = params();
        p.dx = Float::NAN;
        assert!(matches!(Species::new(&p), Err(AdvanceError::InvalidParams(_))));
    }

    #[test]
    fn particle_helpers() {
        let p = Particle::new(3, 0.25, [0.0, 0.0, 0.0]);
        assert_eq!(p.gamma(), 1.0);
        assert_eq!(p.position(), 3.25);

        let mut spec = build_test_species();
        spec.extend(vec![p, Particle::new(0, 0.0, [1.0, 0.0, 0.0])]);
        assert_eq!(spec.np(), 2);
        assert_eq!(spec.particles()[0], p);
    }

    #[test]
    #[should_panic]
    #[cfg(not(feature = "unchecked"))]
    fn add_particle_outside_box_panics() {
        let mut spec = build_test_species();
        spec.add_particle(Particle::new(16, 0.5, [0.0; 3]));
    }
}
