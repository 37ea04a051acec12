#![allow(dead_code)]
use em1d_rs::{BcType, Current, Emf, Float, Particle, Species, SpeciesParams};
use rand::prelude::*;
use rand_distr::StandardNormal;

pub const NX: usize = 16;

pub fn species_params(bc_type: BcType) -> SpeciesParams {
    // A small electron species on a 16 cell box. dt = dx / 2 keeps every
    // particle well inside the one-cell-per-step limit.
    SpeciesParams {
        name: "electrons".to_string(),
        q: -1.0,
        m_q: -1.0,
        dt: 0.5,
        dx: 1.0,
        nx: NX,
        bc_type,
        n_sort: 0,
        moving_window: false,
    }
}

pub fn setup_species(bc_type: BcType) -> Species {
    Species::new(&species_params(bc_type)).unwrap()
}

/// Loads `np` particles uniformly in space with a thermal momentum spread.
pub fn load_thermal(spec: &mut Species, np: usize, uth: Float, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let nx = spec.nx as i32;
    let parts: Vec<Particle> = (0..np)
        .map(|_| {
            let ix = rng.gen_range(0..nx);
            let x: Float = rng.gen();
            let u = [
                uth * rng.sample::<Float, _>(StandardNormal),
                uth * rng.sample::<Float, _>(StandardNormal),
                uth * rng.sample::<Float, _>(StandardNormal),
            ];
            Particle::new(ix, x, u)
        })
        .collect();
    spec.extend(parts);
}

/// Smooth, periodic E and B, guard cells included.
pub fn wave_emf(nx: usize) -> Emf {
    let mut emf = Emf::new(nx);
    let k = 2.0 * std::f64::consts::PI / nx as f64;
    for ix in -1..(nx as i32 + 2) {
        let phase = k * ix as f64;
        *emf.e_x.at_mut(ix) = (0.05 * phase.sin()) as Float;
        *emf.e_y.at_mut(ix) = (0.02 * phase.cos()) as Float;
        *emf.e_z.at_mut(ix) = (-0.03 * (2.0 * phase).sin()) as Float;
        *emf.b_x.at_mut(ix) = 0.1;
        *emf.b_y.at_mut(ix) = (0.04 * phase.cos()) as Float;
        *emf.b_z.at_mut(ix) = (0.2 + 0.05 * phase.sin()) as Float;
    }
    emf
}

/// Compares two current grids cell by cell. Summation order may differ
/// between the grids, so the tolerance grows with the number of
/// particles that contributed.
pub fn assert_grids_close(a: &Current, b: &Current, np: usize) {
    let scale = b.max_abs().max(1.0);
    let tol = (np.max(1) as Float) * Float::EPSILON * scale;
    for (fa, fb) in [(&a.j_x, &b.j_x), (&a.j_y, &b.j_y), (&a.j_z, &b.j_z)] {
        assert_eq!(fa.spatial.len(), fb.spatial.len());
        for (i, (va, vb)) in fa.spatial.iter().zip(fb.spatial.iter()).enumerate() {
            assert!(
                (va - vb).abs() <= tol,
                "cell {}: {} vs {} (tol {})",
                i,
                va,
                vb,
                tol
            );
        }
    }
}

/// Node charge density of the species from linear weighting, with the
/// periodic image folded back in.
pub fn node_charge(spec: &Species) -> Vec<f64> {
    let nx = spec.nx;
    let mut rho = vec![0.0f64; nx];
    for part in spec.particles() {
        let ix = part.ix as usize;
        let x = part.x as f64;
        rho[ix] += spec.q as f64 * (1.0 - x);
        rho[(ix + 1) % nx] += spec.q as f64 * x;
    }
    rho
}
