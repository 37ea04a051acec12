mod common;

use common::{load_thermal, setup_species, species_params, NX};
use em1d_rs::{AdvanceOptions, BcType, Current, Emf, Float, Particle, Species, Workers};

fn step(spec: &mut Species, workers: &Workers) -> em1d_rs::StepReport {
    let emf = Emf::new(NX);
    let mut current = Current::new(NX);
    spec.advance(&emf, &mut current, workers, &AdvanceOptions::default())
        .unwrap()
}

// uy is untouched without fields, so it works as an identity tag
fn tags(spec: &Species) -> Vec<Float> {
    let mut tags: Vec<Float> = spec.particles().iter().map(|p| p.uy).collect();
    tags.sort_by(|a, b| a.partial_cmp(b).unwrap());
    tags
}

#[test]
fn open_boundary_removes_exactly_the_leavers() {
    for n_workers in [1, 4] {
        let mut spec = setup_species(BcType::Open);
        let mut kept = Vec::new();
        let mut tag = 0.0;
        // stationary particles spread over the box
        for ix in 0..NX as i32 {
            tag += 0.001;
            spec.add_particle(Particle::new(ix, 0.5, [0.0, tag, 0.0]));
            kept.push(tag);
        }
        // three leave through the right face, two through the left
        for _ in 0..3 {
            tag += 0.001;
            spec.add_particle(Particle::new(NX as i32 - 1, 0.95, [1.0, tag, 0.0]));
        }
        for _ in 0..2 {
            tag += 0.001;
            spec.add_particle(Particle::new(0, 0.05, [-1.0, tag, 0.0]));
        }
        // this one moves but stays inside
        tag += 0.001;
        spec.add_particle(Particle::new(7, 0.2, [1.0, tag, 0.0]));
        kept.push(tag);

        let n = spec.np();
        let workers = Workers::new(n_workers).unwrap();
        let report = step(&mut spec, &workers);
        assert_eq!(report.removed, 5);
        assert_eq!(spec.np(), n - 5);
        kept.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(tags(&spec), kept);
        assert!(spec
            .particles()
            .iter()
            .all(|p| p.ix >= 0 && (p.ix as usize) < NX));
    }
}

#[test]
fn sort_runs_on_cadence() {
    let mut params = species_params(BcType::Periodic);
    params.n_sort = 3;
    let mut spec = Species::new(&params).unwrap();
    load_thermal(&mut spec, 300, 0.3, 11);
    let workers = Workers::new(2).unwrap();

    for n in 1..=6u64 {
        let report = step(&mut spec, &workers);
        assert_eq!(spec.iter, n);
        assert_eq!(report.sorted, n % 3 == 0);
        if report.sorted {
            assert!(spec.particles().windows(2).all(|w| w[0].ix <= w[1].ix));
        }
    }
}

#[test]
fn sort_keeps_every_particle() {
    let mut params = species_params(BcType::Periodic);
    params.n_sort = 1;
    let mut spec = Species::new(&params).unwrap();
    load_thermal(&mut spec, 200, 0.3, 5);
    let before = tags(&spec);
    let workers = Workers::new(3).unwrap();
    step(&mut spec, &workers);
    assert_eq!(spec.np(), 200);
    assert_eq!(tags(&spec), before);
}

#[test]
fn moving_window_drops_particles_behind_it() {
    let mut params = species_params(BcType::Periodic);
    params.moving_window = true;
    let mut spec = Species::new(&params).unwrap();
    for ix in 0..4 {
        spec.add_particle(Particle::new(ix, 0.5, [0.0; 3]));
    }
    let workers = Workers::new(2).unwrap();

    // dt = dx / 2, so the window moves every other step starting at iter 3
    let mut moved = Vec::new();
    for _ in 0..5 {
        let report = step(&mut spec, &workers);
        moved.push(report.window_moved);
    }
    assert_eq!(moved, vec![false, false, true, false, true]);
    assert_eq!(spec.n_move, 2);
    assert_eq!(spec.np(), 2);
    let mut ixs: Vec<i32> = spec.particles().iter().map(|p| p.ix).collect();
    ixs.sort_unstable();
    assert_eq!(ixs, vec![0, 1]);
}
