//! Far-field evaluation of uniformly polarized bodies.
//!
//! Far from a magnet the closed forms subtract nearly equal face or strip
//! contributions and lose precision with the cube of the distance. Out there
//! the body is instead integrated as a sum of point dipoles placed at
//! Gauss–Legendre nodes. Three nodes per axis integrate the Taylor expansion
//! of the dipole field exactly up to fifth order, so the remaining error
//! falls off as `(size / r)⁶`.

use std::f64::consts::PI;

use crate::math::{R3, Scalar};

use super::dipole::dipole_field;

/// Distance, in units of the body's bounding radius, beyond which the
/// quadrature replaces the closed form.
pub(crate) const FAR_FIELD_RATIO: Scalar = 50.0;

/// Three-point Gauss–Legendre rule on [-1, 1] as `(node, weight)`.
const GAUSS_3: [(Scalar, Scalar); 3] = [
    (-0.774_596_669_241_483_4, 5.0 / 9.0),
    (0.0, 8.0 / 9.0),
    (0.774_596_669_241_483_4, 5.0 / 9.0),
];

/// Azimuthal samples per disk ring; exact for harmonics below this order.
const AZIMUTH_SAMPLES: usize = 6;

/// True when `point` is far enough from a body of `bounding_radius` centred on
/// the origin for the quadrature to be used.
#[inline]
pub(crate) fn is_far(point: &R3, bounding_radius: Scalar) -> bool {
    point.norm_squared() > (FAR_FIELD_RATIO * bounding_radius).powi(2)
}

/// Field of a box `[-half, half]` with polarization `magnetization`.
pub(crate) fn cuboid_far_field(magnetization: &R3, half: &R3, point: &R3) -> R3 {
    let volume = 8.0 * half.x * half.y * half.z;
    let mut b = R3::zeros();
    for &(u, wu) in &GAUSS_3 {
        for &(v, wv) in &GAUSS_3 {
            for &(w, ww) in &GAUSS_3 {
                let node = R3::new(u * half.x, v * half.y, w * half.z);
                let weight = wu * wv * ww / 8.0 * volume;
                b += dipole_field(&(magnetization * weight), &(point - node));
            }
        }
    }
    b
}

/// Field of a cylinder of `radius` spanning `[-half, half]` along z with
/// polarization `magnetization`.
///
/// The disk is sampled at Gauss nodes in `r²`, which is uniform in area.
pub(crate) fn cylinder_far_field(magnetization: &R3, radius: Scalar, half: Scalar, point: &R3) -> R3 {
    let volume = PI * radius * radius * 2.0 * half;
    let dphi = 2.0 * PI / AZIMUTH_SAMPLES as Scalar;
    let mut b = R3::zeros();
    for &(s, ws) in &GAUSS_3 {
        let r = radius * (0.5 * (s + 1.0)).sqrt();
        for k in 0..AZIMUTH_SAMPLES {
            let (sin, cos) = ((k as Scalar + 0.5) * dphi).sin_cos();
            for &(t, wt) in &GAUSS_3 {
                let node = R3::new(r * cos, r * sin, t * half);
                let weight = ws * wt / (4.0 * AZIMUTH_SAMPLES as Scalar) * volume;
                b += dipole_field(&(magnetization * weight), &(point - node));
            }
        }
    }
    b
}
