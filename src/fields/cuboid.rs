//! Uniformly magnetized cuboid.
//!
//! The magnet is replaced by its equivalent surface charge σ = J·n on the six
//! faces. Each face is a uniformly charged rectangle whose field integrates in
//! closed form: the normal component is a corner sum of `atan` terms and the
//! two in-plane components are pairs of logarithms along the rectangle edges.
//! Inside the body the polarization itself is added to obtain B.
//!
//! ## Domain partition
//!
//! | region                         | value                                             |
//! |--------------------------------|---------------------------------------------------|
//! | off the surface                | closed form                                       |
//! | on a face or an extended edge  | closed form, logarithm pairs in cancellation-free form |
//! | on the surface                 | mean of the inner and outer limits                |
//! | on a charged edge or corner    | zero-vector sentinel (log divergence)             |
//! | beyond 50 × the half diagonal  | Gauss quadrature over point dipoles               |

use std::f64::consts::PI;

use crate::errors::Result;
use crate::math::{ensure_finite_vector, ensure_positive, R3, Scalar};

use super::multipole::{cuboid_far_field, is_far};
use super::FieldKernel;

/// Homogeneously magnetized rectangular block centred on the origin with its
/// edges parallel to the local axes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    magnetization: R3,
    dimension: R3,
}

impl Cuboid {
    /// Creates a cuboid with polarization `magnetization` (mT) and full side
    /// lengths `dimension` (mm) along the local x, y and z axes.
    pub fn new(magnetization: R3, dimension: R3) -> Result<Self> {
        ensure_finite_vector("cuboid magnetization", &magnetization)?;
        for (label, side) in ["a", "b", "c"].iter().zip(dimension.iter()) {
            ensure_positive(&format!("cuboid side {label}"), *side)?;
        }
        Ok(Self {
            magnetization,
            dimension,
        })
    }

    /// Polarization vector in mT.
    #[must_use]
    pub const fn magnetization(&self) -> R3 {
        self.magnetization
    }

    /// Side lengths in mm.
    #[must_use]
    pub const fn dimension(&self) -> R3 {
        self.dimension
    }
}

impl FieldKernel for Cuboid {
    fn field_local(&self, point: &R3) -> R3 {
        let half = self.dimension * 0.5;
        if is_far(point, half.norm()) {
            return cuboid_far_field(&self.magnetization, &half, point);
        }
        self.closed_form(&half, point)
    }
}

impl Cuboid {
    fn closed_form(&self, half: &R3, point: &R3) -> R3 {
        let mut h = R3::zeros();
        for k in 0..3 {
            let (i, j) = ((k + 1) % 3, (k + 2) % 3);
            for sign in [1.0, -1.0] {
                let sigma = sign * self.magnetization[k];
                if sigma == 0.0 {
                    continue;
                }
                let Some(face) = charged_rectangle(
                    point[i],
                    point[j],
                    point[k] - sign * half[k],
                    half[i],
                    half[j],
                ) else {
                    return R3::zeros();
                };
                h[i] += sigma * face[0];
                h[j] += sigma * face[1];
                h[k] += sigma * face[2];
            }
        }
        h / (4.0 * PI) + self.magnetization * interior_weight(point, half)
    }
}

/// Fraction of the solid angle around `point` occupied by the body: 1 inside,
/// ½ on a face, ¼ on an edge, ⅛ on a corner, 0 outside.
fn interior_weight(point: &R3, half: &R3) -> Scalar {
    point
        .iter()
        .zip(half.iter())
        .map(|(p, h)| match p.abs().partial_cmp(h) {
            Some(std::cmp::Ordering::Less) => 1.0,
            Some(std::cmp::Ordering::Equal) => 0.5,
            _ => 0.0,
        })
        .product()
}

/// Field of a unit-density rectangle `[-hp, hp] × [-hq, hq]` seen from the
/// in-plane coordinates `(p, q)` at normal offset `w`, scaled by 4π.
///
/// Returns `[in-plane p, in-plane q, normal]`, or `None` when the point sits
/// on an edge of the rectangle.
fn charged_rectangle(p: Scalar, q: Scalar, w: Scalar, hp: Scalar, hq: Scalar) -> Option<[Scalar; 3]> {
    let (ua, ub) = (p - hp, p + hp);
    let (va, vb) = (q - hq, q + hq);

    let along_q_at_ua = edge_log(va, vb, ua.hypot(w))?;
    let along_q_at_ub = edge_log(va, vb, ub.hypot(w))?;
    let along_p_at_va = edge_log(ua, ub, va.hypot(w))?;
    let along_p_at_vb = edge_log(ua, ub, vb.hypot(w))?;

    // The face's own normal component jumps by 2π across the plane; on the
    // plane itself the mean of both sides is 0.
    let normal = if w == 0.0 {
        0.0
    } else {
        let corner = |u: Scalar, v: Scalar| (u * v / (w * (u * u + v * v + w * w).sqrt())).atan();
        corner(ub, vb) - corner(ua, vb) - corner(ub, va) + corner(ua, va)
    };

    Some([along_q_at_ua - along_q_at_ub, along_p_at_va - along_p_at_vb, normal])
}

/// `ln((v2 + √(v2² + s²)) / (v1 + √(v1² + s²)))` for `v1 < v2`.
///
/// Each branch avoids forming `v + √(v² + s²)` where it cancels. With `s == 0`
/// the value is finite only when `[v1, v2]` excludes the origin, i.e. when the
/// point lies on the edge's line but beyond the edge.
fn edge_log(v1: Scalar, v2: Scalar, s: Scalar) -> Option<Scalar> {
    let r1 = v1.hypot(s);
    let r2 = v2.hypot(s);
    if v1 >= 0.0 {
        if v1 == 0.0 && s == 0.0 {
            return None;
        }
        Some(((v2 + r2) / (v1 + r1)).ln())
    } else if v2 <= 0.0 {
        if v2 == 0.0 && s == 0.0 {
            return None;
        }
        Some(((r1 - v1) / (r2 - v2)).ln())
    } else if s == 0.0 {
        None
    } else {
        Some(((v2 + r2) * (r1 - v1) / (s * s)).ln())
    }
}
