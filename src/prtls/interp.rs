use crate::{Emf, Float, Particle};
use serde::Deserialize;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    // every component lives on the cell nodes
    Collocated,
    // Yee layout: Ex, By, Bz sit half a cell to the right of the nodes
    Staggered,
}

impl Default for Interpolation {
    fn default() -> Interpolation {
        Interpolation::Collocated
    }
}

/// Linearly interpolates E and B at the particle location. Pure read of
/// the field grid; `ix` is guaranteed in range by the caller.
#[inline(always)]
pub fn interpolate(emf: &Emf, part: &Particle, scheme: Interpolation) -> ([Float; 3], [Float; 3]) {
    let i = part.ix;
    let w1 = part.x;
    match scheme {
        Interpolation::Collocated => {
            let w0 = 1.0 - w1;
            (
                [
                    emf.e_x.at(i) * w0 + emf.e_x.at(i + 1) * w1,
                    emf.e_y.at(i) * w0 + emf.e_y.at(i + 1) * w1,
                    emf.e_z.at(i) * w0 + emf.e_z.at(i + 1) * w1,
                ],
                [
                    emf.b_x.at(i) * w0 + emf.b_x.at(i + 1) * w1,
                    emf.b_y.at(i) * w0 + emf.b_y.at(i + 1) * w1,
                    emf.b_z.at(i) * w0 + emf.b_z.at(i + 1) * w1,
                ],
            )
        }
        Interpolation::Staggered => {
            let mut ih = if w1 < 0.5 { -1 } else { 0 };
            let w1h = w1 - 0.5 - ih as Float;
            ih += i;
            (
                [
                    emf.e_x.at(ih) * (1.0 - w1h) + emf.e_x.at(ih + 1) * w1h,
                    emf.e_y.at(i) * (1.0 - w1) + emf.e_y.at(i + 1) * w1,
                    emf.e_z.at(i) * (1.0 - w1) + emf.e_z.at(i + 1) * w1,
                ],
                [
                    emf.b_x.at(i) * (1.0 - w1) + emf.b_x.at(i + 1) * w1,
                    emf.b_y.at(ih) * (1.0 - w1h) + emf.b_y.at(ih + 1) * w1h,
                    emf.b_z.at(ih) * (1.0 - w1h) + emf.b_z.at(ih + 1) * w1h,
                ],
            )
        }
    }
}
