//! Circular current loop.
//!
//! The loop lies in the local xy-plane, centred on the origin, with positive
//! current circulating counter-clockwise about +z.
//!
//! ## Domain partition
//!
//! | region                 | value                                                  |
//! |------------------------|--------------------------------------------------------|
//! | general                | elliptic form, both components free of `E − K` cancellation |
//! | ρ² < 1e-6 (R² + z²)    | fourth-order expansion about the axis                       |
//! | ρ = 0                  | `B_z = μ₀ I R² / (2 (R² + z²)^{3/2})`, `B_ρ = 0`             |
//! | on or at the wire      | zero-vector sentinel                                        |
//!
//! The axis test is relative to the distance from the loop centre, so points
//! far out in the loop plane (small k² but ρ ≫ R) stay on the elliptic form.

use std::f64::consts::PI;

use crate::constants::MU0_OVER_4PI;
use crate::errors::Result;
use crate::math::{ensure_finite, ensure_positive, R3, Scalar};

use super::elliptic::{cel, ellip_d, ellip_e};
use super::FieldKernel;

/// Below this value of ρ² / (R² + z²) the axial expansion is used.
const NEAR_AXIS_RATIO: Scalar = 1.0e-6;

/// Circular filament of zero cross-section.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularLoop {
    current: Scalar,
    diameter: Scalar,
}

impl CircularLoop {
    /// Creates a loop carrying `current` (A) with `diameter` (mm).
    pub fn new(current: Scalar, diameter: Scalar) -> Result<Self> {
        ensure_finite("loop current", current)?;
        ensure_positive("loop diameter", diameter)?;
        Ok(Self { current, diameter })
    }

    /// Current in A.
    #[must_use]
    pub const fn current(&self) -> Scalar {
        self.current
    }

    /// Diameter in mm.
    #[must_use]
    pub const fn diameter(&self) -> Scalar {
        self.diameter
    }
}

impl FieldKernel for CircularLoop {
    fn field_local(&self, point: &R3) -> R3 {
        let radius = 0.5 * self.diameter;
        let z = point.z;
        let rho = point.x.hypot(point.y);
        let (b_rho, b_z) = if rho * rho < NEAR_AXIS_RATIO * (radius * radius + z * z) {
            near_axis(self.current, radius, rho, z)
        } else {
            match elliptic(self.current, radius, rho, z) {
                Some(components) => components,
                None => return R3::zeros(),
            }
        };

        if rho > 0.0 {
            R3::new(b_rho * point.x / rho, b_rho * point.y / rho, b_z)
        } else {
            R3::new(0.0, 0.0, b_z)
        }
    }
}

fn near_axis(current: Scalar, radius: Scalar, rho: Scalar, z: Scalar) -> (Scalar, Scalar) {
    let c = 2.0 * PI * MU0_OVER_4PI * current * radius * radius;
    let s = radius * radius + z * z;
    let (r2, z2, a2) = (rho * rho, z * z, radius * radius);
    let b_z = c
        * (s.powf(-1.5) - 0.75 * r2 * (4.0 * z2 - a2) * s.powf(-3.5)
            + 45.0 / 64.0 * r2 * r2 * (a2 * a2 - 12.0 * a2 * z2 + 8.0 * z2 * z2) * s.powf(-5.5));
    let b_rho = c * z * rho * (1.5 * s.powf(-2.5) + 15.0 / 16.0 * r2 * (3.0 * a2 - 4.0 * z2) * s.powf(-4.5));
    (b_rho, b_z)
}

/// `None` on the wire, where `kc` vanishes.
fn elliptic(current: Scalar, radius: Scalar, rho: Scalar, z: Scalar) -> Option<(Scalar, Scalar)> {
    let apr2 = (radius + rho).powi(2) + z * z;
    let amr2 = (radius - rho).powi(2) + z * z;
    let kc = (amr2 / apr2).sqrt();
    if kc == 0.0 {
        return None;
    }
    let k2 = 4.0 * radius * rho / apr2;
    let c = 2.0 * MU0_OVER_4PI * current / apr2.sqrt();

    // K − E = k²·D removes the cancellation between the K and E terms.
    let e = ellip_e(kc);
    let d = ellip_d(kc);
    let b_z = c * (k2 * d + 2.0 * radius * (radius - rho) / amr2 * e);

    // (z/ρ)(−K + (R² + ρ² + z²)/amr² · E) rewritten with E − 2D and D so the
    // leading terms no longer cancel.
    let e_minus_2d = cel(kc, 1.0, 1.0, -(1.0 + k2));
    let b_rho = c * z * 4.0 * radius * (apr2 * e_minus_2d + 8.0 * radius * rho * d) / (2.0 * amr2 * apr2);
    Some((b_rho, b_z))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn on_axis_matches_reference_value() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        let b = coil.field_local(&R3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(b, R3::new(0.0, 0.0, 0.561_985_18), epsilon = 1.0e-8);
    }

    #[test]
    fn centre_field_is_mu0_i_over_2r() {
        let coil = CircularLoop::new(5.0, 4.0).expect("valid loop");
        let b = coil.field_local(&R3::zeros());
        assert_relative_eq!(b.z, 2.0 * PI * MU0_OVER_4PI * 5.0 / 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn elliptic_form_matches_fine_polygon() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        let b = coil.field_local(&R3::new(0.6, 0.3, 0.4));
        assert_relative_eq!(b, R3::new(2.458_553_489, 1.229_276_745, 4.909_776_983), epsilon = 1.0e-7);
    }

    #[test]
    fn near_axis_branch_joins_elliptic_branch() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        // The switch sits at ρ ≈ 1.22e-3 for z = 0.7.
        let inside = coil.field_local(&R3::new(1.2e-3, 0.0, 0.7));
        let outside = coil.field_local(&R3::new(1.25e-3, 0.0, 0.7));
        assert_relative_eq!(inside.z, 3.454_619_840_478_632, max_relative = 1.0e-12);
        assert_relative_eq!(outside.z, 3.454_619_703_233_101, max_relative = 1.0e-12);
        assert_relative_eq!(inside.x, 2.921_358_971_114_144_6e-3, max_relative = 1.0e-10);
        assert_relative_eq!(outside.x, 3.043_082_370_718_502_2e-3, max_relative = 1.0e-10);
    }

    #[test]
    fn radial_field_vanishes_linearly_towards_axis() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        let axis = coil.field_local(&R3::new(0.0, 0.0, 0.7));
        assert_eq!(axis.x, 0.0);
        for rho in [1.0e-3, 1.0e-5, 1.0e-9] {
            let b = coil.field_local(&R3::new(rho, 0.0, 0.7));
            assert_relative_eq!(b.x / rho, 2.434_464_782_886_6, max_relative = 1.0e-5);
            assert_relative_eq!(b.z, axis.z, max_relative = 1.0e-6);
        }
    }

    #[test]
    fn wire_returns_sentinel() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        assert_eq!(coil.field_local(&R3::new(0.0, -1.0, 0.0)), R3::zeros());
        // (R − ρ)² + z² underflows to zero just off the wire.
        assert_eq!(coil.field_local(&R3::new(1.0, 0.0, 1.0e-170)), R3::zeros());
        let close = coil.field_local(&R3::new(1.0, 0.0, 1.0e-150));
        assert!(close.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn far_field_in_loop_plane_is_dipolar() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        let moment = 10.0 * PI;
        for rho in [1.0e3, 3.0e6, 5.0e6, 1.0e7] {
            let b = coil.field_local(&R3::new(rho, 0.0, 0.0));
            let dipole = -MU0_OVER_4PI * moment / (rho * rho * rho);
            assert_eq!(b.x, 0.0);
            assert_relative_eq!(b.z, dipole, max_relative = 1.0e-5);
        }
    }

    #[test]
    fn far_field_on_diagonal_is_dipolar() {
        let coil = CircularLoop::new(10.0, 2.0).expect("valid loop");
        let moment = R3::new(0.0, 0.0, 10.0 * PI);
        for r in [1.0e4, 1.0e6] {
            let p = R3::new(r, 0.5 * r, -0.8 * r);
            let d = p.norm();
            let rhat = p / d;
            let dipole = MU0_OVER_4PI * (3.0 * moment.dot(&rhat) * rhat - moment) / (d * d * d);
            assert_relative_eq!(coil.field_local(&p), dipole, max_relative = 1.0e-6);
        }
    }
}
