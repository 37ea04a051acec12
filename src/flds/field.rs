use crate::{AdvanceError, Float, Result};

// Guard cells below and above the physical cells. The lower guard is
// needed by the staggered interpolation and by particles crossing out of
// cell 0; the two upper guards cover a particle in the last cell crossing
// right, whose second sub-segment touches nx and nx + 1.
pub const GUARD_CELLS: [usize; 2] = [1, 2];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDim {
    pub nx: usize,
    pub gc: [usize; 2],
}

impl GridDim {
    pub fn new(nx: usize) -> GridDim {
        GridDim {
            nx,
            gc: GUARD_CELLS,
        }
    }

    /// Number of stored cells, guards included.
    pub fn len(&self) -> usize {
        self.gc[0] + self.nx + self.gc[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_index(&self, ix: i32) -> usize {
        // Convenience method to go from a cell index, where cell 0 is the
        // first physical cell, to a position in the storage vec.
        //
        // -----------------------------------------------------------
        // |  [0]  |  [1]  |  [2]  | ... | [nx] | [nx+1] | [nx+2] |
        // |  -1   |   0   |   1   | ... | nx-1 |   nx   |  nx+1  |
        // -----------------------------------------------------------
        //  guard                                  guard    guard
        if !cfg!(feature = "unchecked") {
            assert!(ix >= -(self.gc[0] as i32));
            assert!(ix < (self.nx + self.gc[1]) as i32);
        }
        (ix + self.gc[0] as i32) as usize
    }
}

/// One scalar component stored on the grid, guard cells included.
#[derive(Clone, Debug)]
pub struct Field {
    pub spatial: Vec<Float>,
    pub dim: GridDim,
}

impl Field {
    pub fn new(dim: GridDim) -> Field {
        Field {
            spatial: vec![0.0; dim.len()],
            dim,
        }
    }

    /// Same as `new` but reports an allocation failure instead of aborting.
    pub fn try_new(dim: GridDim, worker: usize) -> Result<Field> {
        let mut spatial: Vec<Float> = Vec::new();
        spatial
            .try_reserve_exact(dim.len())
            .map_err(|_| AdvanceError::AllocationFailed {
                worker,
                len: dim.len(),
            })?;
        spatial.resize(dim.len(), 0.0);
        Ok(Field { spatial, dim })
    }

    #[inline(always)]
    pub fn at(&self, ix: i32) -> Float {
        self.spatial[self.dim.get_index(ix)]
    }

    #[inline(always)]
    pub fn at_mut(&mut self, ix: i32) -> &mut Float {
        let i = self.dim.get_index(ix);
        &mut self.spatial[i]
    }

    pub fn zero(&mut self) {
        for v in self.spatial.iter_mut() {
            *v = 0.0;
        }
    }

    /// Values of the physical cells only.
    pub fn interior(&self) -> &[Float] {
        &self.spatial[self.dim.gc[0]..self.dim.gc[0] + self.dim.nx]
    }
}
