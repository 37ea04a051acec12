use crate::{AdvanceError, Float, Result};

/// Result of pushing one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pushed {
    pub u: [Float; 3],
    // |u-|^2 / (1 + gamma), summed by the caller into the energy diagnostic
    pub energy: f64,
}

/// Relativistic Boris push. `tem` is 0.5 dt / m_q; `e` and `b` are the
/// fields interpolated at the particle. `index` only labels errors.
#[inline(always)]
pub fn boris_push(
    index: usize,
    u: [Float; 3],
    e: [Float; 3],
    b: [Float; 3],
    tem: Float,
) -> Result<Pushed> {
    // half electric impulse
    let ext = e[0] * tem;
    let eyt = e[1] * tem;
    let ezt = e[2] * tem;

    let mut utx = u[0] + ext;
    let mut uty = u[1] + eyt;
    let mut utz = u[2] + ezt;

    let u2 = utx * utx + uty * uty + utz * utz;
    let gamma = (1.0 + u2).sqrt();
    if !gamma.is_finite() {
        return Err(AdvanceError::NonFiniteGamma { index, gamma });
    }
    let energy = u2 as f64 / (1.0 + gamma as f64);

    //  Now, the rotation:
    let gtem = tem / gamma;
    let mut bxt = b[0] * gtem;
    let mut byt = b[1] * gtem;
    let mut bzt = b[2] * gtem;

    let otsq = 2.0 / (1.0 + bxt * bxt + byt * byt + bzt * bzt);

    let ux = utx + uty * bzt - utz * byt;
    let uy = uty + utz * bxt - utx * bzt;
    let uz = utz + utx * byt - uty * bxt;

    bxt *= otsq;
    byt *= otsq;
    bzt *= otsq;

    utx += uy * bzt - uz * byt;
    uty += uz * bxt - ux * bzt;
    utz += ux * byt - uy * bxt;

    // second half electric impulse
    let u = [utx + ext, uty + eyt, utz + ezt];
    if !u.iter().all(|v| v.is_finite()) {
        return Err(AdvanceError::NonFiniteMomentum { index });
    }
    Ok(Pushed { u, energy })
}
