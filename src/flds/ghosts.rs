use crate::flds::{field::Field, Current, Emf};

// Periodic guard-cell exchange. The advance itself never calls these; the
// driver uses them around the field solve.

#[inline(always)]
pub fn update_ghosts(fld: &mut Field) {
    let nx = fld.dim.nx as i32;
    let gc = fld.dim.gc;
    if !cfg!(feature = "unchecked") {
        assert!(gc[0] as i32 <= nx && gc[1] as i32 <= nx);
    }
    // copy the last physical cells into the lower guards
    for i in -(gc[0] as i32)..0 {
        let v = fld.at(nx + i);
        *fld.at_mut(i) = v;
    }
    // copy the first physical cells into the upper guards
    for i in 0..gc[1] as i32 {
        let v = fld.at(i);
        *fld.at_mut(nx + i) = v;
    }
}

#[inline(always)]
pub fn deposit_ghosts(fld: &mut Field) {
    let nx = fld.dim.nx as i32;
    let gc = fld.dim.gc;
    if !cfg!(feature = "unchecked") {
        assert!(gc[0] as i32 <= nx && gc[1] as i32 <= nx);
    }
    // lower guards fold onto the right edge
    for i in -(gc[0] as i32)..0 {
        let v = fld.at(i);
        *fld.at_mut(nx + i) += v;
    }
    // upper guards fold onto the left edge
    for i in 0..gc[1] as i32 {
        let v = fld.at(nx + i);
        *fld.at_mut(i) += v;
    }
    update_ghosts(fld);
}

impl Emf {
    pub fn update_ghosts(&mut self) {
        for fld in [
            &mut self.e_x,
            &mut self.e_y,
            &mut self.e_z,
            &mut self.b_x,
            &mut self.b_y,
            &mut self.b_z,
        ] {
            update_ghosts(fld);
        }
    }
}

impl Current {
    pub fn deposit_ghosts(&mut self) {
        for fld in [&mut self.j_x, &mut self.j_y, &mut self.j_z] {
            deposit_ghosts(fld);
        }
    }
}
