use crate::{Float, Result};
use itertools::izip;

pub mod field;
pub mod ghosts;
use crate::flds::field::{Field, GridDim};

/// Electric and magnetic field grids. Produced by the field solver and
/// read-only for the whole particle advance.
#[derive(Clone, Debug)]
pub struct Emf {
    pub e_x: Field,
    pub e_y: Field,
    pub e_z: Field,
    pub b_x: Field,
    pub b_y: Field,
    pub b_z: Field,
}

impl Emf {
    pub fn new(nx: usize) -> Emf {
        let dim = GridDim::new(nx);
        Emf {
            e_x: Field::new(dim),
            e_y: Field::new(dim),
            e_z: Field::new(dim),
            b_x: Field::new(dim),
            b_y: Field::new(dim),
            b_z: Field::new(dim),
        }
    }

    pub fn dim(&self) -> GridDim {
        self.e_x.dim
    }

    /// Fills every cell, guards included, with the same E and B.
    pub fn set_uniform(&mut self, e: [Float; 3], b: [Float; 3]) {
        for (fld, val) in [
            (&mut self.e_x, e[0]),
            (&mut self.e_y, e[1]),
            (&mut self.e_z, e[2]),
            (&mut self.b_x, b[0]),
            (&mut self.b_y, b[1]),
            (&mut self.b_z, b[2]),
        ] {
            for v in fld.spatial.iter_mut() {
                *v = val;
            }
        }
    }
}

/// Current density grid. The same type serves as the shared grid handed
/// to the field solver and as each worker's private accumulation buffer.
#[derive(Clone, Debug)]
pub struct Current {
    pub j_x: Field,
    pub j_y: Field,
    pub j_z: Field,
}

impl Current {
    pub fn new(nx: usize) -> Current {
        let dim = GridDim::new(nx);
        Current {
            j_x: Field::new(dim),
            j_y: Field::new(dim),
            j_z: Field::new(dim),
        }
    }

    pub fn try_new(dim: GridDim, worker: usize) -> Result<Current> {
        Ok(Current {
            j_x: Field::try_new(dim, worker)?,
            j_y: Field::try_new(dim, worker)?,
            j_z: Field::try_new(dim, worker)?,
        })
    }

    pub fn dim(&self) -> GridDim {
        self.j_x.dim
    }

    pub fn zero(&mut self) {
        self.j_x.zero();
        self.j_y.zero();
        self.j_z.zero();
    }

    /// Adds `other` component-wise into self over the storage range
    /// `start..start + len`.
    pub fn add_range(&mut self, other: &Current, start: usize, len: usize) {
        if !cfg!(feature = "unchecked") {
            assert_eq!(self.dim(), other.dim());
            assert!(start + len <= self.dim().len());
        }
        let end = start + len;
        for (dst, src) in [
            (&mut self.j_x.spatial, &other.j_x.spatial),
            (&mut self.j_y.spatial, &other.j_y.spatial),
            (&mut self.j_z.spatial, &other.j_z.spatial),
        ] {
            for (d, s) in izip!(&mut dst[start..end], &src[start..end]) {
                *d += *s;
            }
        }
    }

    pub fn add(&mut self, other: &Current) {
        let len = self.dim().len();
        self.add_range(other, 0, len);
    }

    /// Largest absolute value over all three components.
    pub fn max_abs(&self) -> Float {
        self.j_x
            .spatial
            .iter()
            .chain(self.j_y.spatial.iter())
            .chain(self.j_z.spatial.iter())
            .fold(0.0, |m: Float, v| m.max(v.abs()))
    }
}
