use crate::{Current, Float};

// Straight-line motion inside one cell, the unit the weighting acts on.
#[derive(Clone, Copy, Debug)]
struct VirtualParticle {
    ix: i32,
    x0: Float,
    x1: Float,
    dx: Float,
    qvy: Float,
    qvz: Float,
}

/// Cell-crossing delta for a trial position `x1 = x0 + dx`: +1 when it
/// left through the right face, -1 through the left face, 0 otherwise.
#[inline(always)]
pub fn ltrim(x: Float) -> i32 {
    (x >= 1.0) as i32 - (x < 0.0) as i32
}

/// Charge-conserving (zig-zag) deposition of one particle's motion.
///
/// The particle starts at `(ix, x0)`, moves `dx` (in cells, |dx| < 1) and
/// ends in cell `ix + di`. When a cell face is crossed the motion is split
/// at the face into two virtual particles, each deposited with its own
/// linear weights. `qnx` is q dx / dt; `qvy` and `qvz` are q v_y and q v_z.
///
/// Contributions are added to `current`, which is either a worker's
/// private accumulation buffer or, in the serial path, the shared grid.
#[inline(always)]
#[allow(clippy::too_many_arguments)]
pub fn deposit_current(
    ix: i32,
    di: i32,
    x0: Float,
    dx: Float,
    qnx: Float,
    qvy: Float,
    qvz: Float,
    current: &mut Current,
) {
    // the transverse weights below sum to 2, hence the halving
    let mut vp = [VirtualParticle {
        ix,
        x0,
        x1: x0 + dx,
        dx,
        qvy: qvy / 2.0,
        qvz: qvz / 2.0,
    }; 2];
    let mut vnp = 1;

    if di != 0 {
        // face the particle went through: 1 on the right, 0 on the left
        let ib = (di == 1) as i32;
        let delta = (x0 + dx - ib as Float) / dx;

        // the part of the motion past the face
        vp[1].x0 = (1 - ib) as Float;
        vp[1].x1 = (x0 + dx) - di as Float;
        vp[1].dx = dx * delta;
        vp[1].ix = ix + di;

        let vqy = vp[0].qvy * delta;
        let vqz = vp[0].qvz * delta;
        vp[1].qvy = vqy;
        vp[1].qvz = vqz;

        // and the part up to it
        vp[0].x1 = ib as Float;
        vp[0].dx -= vp[1].dx;
        vp[0].qvy -= vqy;
        vp[0].qvz -= vqz;
        vnp += 1;
    }

    for v in &vp[..vnp] {
        if !cfg!(feature = "unchecked") {
            assert!(v.x0 >= 0.0 && v.x0 <= 1.0);
            assert!(v.x1 >= 0.0 && v.x1 <= 1.0);
        }
        let s0 = [1.0 - v.x0, v.x0];
        let s1 = [1.0 - v.x1, v.x1];

        *current.j_x.at_mut(v.ix) += qnx * v.dx;

        *current.j_y.at_mut(v.ix) += v.qvy * (s0[0] + s1[0]);
        *current.j_y.at_mut(v.ix + 1) += v.qvy * (s0[1] + s1[1]);

        *current.j_z.at_mut(v.ix) += v.qvz * (s0[0] + s1[0]);
        *current.j_z.at_mut(v.ix + 1) += v.qvz * (s0[1] + s1[1]);
    }
}
