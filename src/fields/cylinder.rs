//! Uniformly magnetized solid cylinder.
//!
//! The axial part of the polarization is evaluated with the closed form of
//! Derby & Olbert, which expresses both components through Bulirsch's `cel`.
//! The transverse part has charges only on the mantle (σ = J⊥·n); the mantle
//! is split into axial strips, each strip integrated exactly along z, and the
//! strips summed with the midpoint rule in φ.
//!
//! ## Domain partition
//!
//! | region                                  | value                                       |
//! |-----------------------------------------|---------------------------------------------|
//! | off the symmetry axis                   | closed form                                 |
//! | ρ ≤ 1e-10·R                             | on-axis formula, B_ρ = 0                    |
//! | on mantle or caps                       | mean of the inner and outer limits          |
//! | on a rim circle (ρ = R, |z| = h/2)      | zero-vector sentinel (log divergence)       |
//! | on a transverse strip line              | zero-vector sentinel                        |
//! | beyond 50 × √(R² + (h/2)²)              | Gauss quadrature over point dipoles         |

use std::f64::consts::PI;

use crate::errors::{MagnetostaticsError, Result};
use crate::math::{ensure_finite_vector, ensure_positive, R3, Scalar};

use super::elliptic::cel;
use super::multipole::{cylinder_far_field, is_far};
use super::FieldKernel;

/// Number of mantle strips used for transverse magnetization unless set.
pub const DEFAULT_TRANSVERSE_ITERATIONS: usize = 50;

/// Radial distance, relative to the radius, treated as lying on the axis.
const ON_AXIS_TOLERANCE: Scalar = 1.0e-10;

/// Homogeneously magnetized cylinder centred on the origin with its symmetry
/// axis along local z.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    magnetization: R3,
    diameter: Scalar,
    height: Scalar,
    iterations: usize,
}

impl Cylinder {
    /// Creates a cylinder with polarization `magnetization` (mT), `diameter`
    /// and `height` (mm).
    pub fn new(magnetization: R3, diameter: Scalar, height: Scalar) -> Result<Self> {
        Self::with_iterations(magnetization, diameter, height, DEFAULT_TRANSVERSE_ITERATIONS)
    }

    /// Like [`Cylinder::new`] with an explicit number of mantle strips for
    /// the transverse part. Fewer strips are faster and less precise.
    pub fn with_iterations(
        magnetization: R3,
        diameter: Scalar,
        height: Scalar,
        iterations: usize,
    ) -> Result<Self> {
        ensure_finite_vector("cylinder magnetization", &magnetization)?;
        ensure_positive("cylinder diameter", diameter)?;
        ensure_positive("cylinder height", height)?;
        if iterations == 0 {
            return Err(MagnetostaticsError::InvalidParameter(
                "cylinder transverse iterations must be at least 1".into(),
            ));
        }
        Ok(Self {
            magnetization,
            diameter,
            height,
            iterations,
        })
    }

    /// Polarization vector in mT.
    #[must_use]
    pub const fn magnetization(&self) -> R3 {
        self.magnetization
    }

    /// Diameter in mm.
    #[must_use]
    pub const fn diameter(&self) -> Scalar {
        self.diameter
    }

    /// Height in mm.
    #[must_use]
    pub const fn height(&self) -> Scalar {
        self.height
    }

    /// Number of mantle strips used for transverse magnetization.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }
}

impl FieldKernel for Cylinder {
    fn field_local(&self, point: &R3) -> R3 {
        let radius = 0.5 * self.diameter;
        let half = 0.5 * self.height;
        if is_far(point, radius.hypot(half)) {
            return cylinder_far_field(&self.magnetization, radius, half, point);
        }
        self.closed_form(radius, half, point)
    }
}

impl Cylinder {
    fn closed_form(&self, radius: Scalar, half: Scalar, point: &R3) -> R3 {
        let rho = point.x.hypot(point.y);
        if rho == radius && point.z.abs() == half {
            return R3::zeros();
        }

        let mut b = R3::zeros();
        let jz = self.magnetization.z;
        if jz != 0.0 {
            let (b_rho, b_z) = axial_field(jz, radius, half, rho, point.z);
            if rho > 0.0 {
                b.x += b_rho * point.x / rho;
                b.y += b_rho * point.y / rho;
            }
            b.z += b_z;
        }

        let transverse = R3::new(self.magnetization.x, self.magnetization.y, 0.0);
        if transverse.x != 0.0 || transverse.y != 0.0 {
            let Some(h) = transverse_charge_field(&transverse, radius, half, point, self.iterations)
            else {
                return R3::zeros();
            };
            b += h + transverse * interior_weight(rho, point.z, radius, half);
        }
        b
    }
}

/// Axial polarization `jz`: `(B_ρ, B_z)` at cylindrical coordinates
/// `(rho, z)`. Already includes the polarization inside the body.
fn axial_field(jz: Scalar, radius: Scalar, half: Scalar, rho: Scalar, z: Scalar) -> (Scalar, Scalar) {
    let zp = z + half;
    let zm = z - half;
    if rho <= ON_AXIS_TOLERANCE * radius {
        let b_z = 0.5 * jz * (zp / zp.hypot(radius) - zm / zm.hypot(radius));
        return (0.0, b_z);
    }

    let b0 = jz / PI;
    let dp = zp.hypot(radius + rho);
    let dm = zm.hypot(radius + rho);
    let (alpha_p, alpha_m) = (radius / dp, radius / dm);
    let (beta_p, beta_m) = (zp / dp, zm / dm);
    let gamma = (radius - rho) / (radius + rho);
    let kp = zp.hypot(radius - rho) / dp;
    let km = zm.hypot(radius - rho) / dm;

    let b_rho = b0 * (alpha_p * cel(kp, 1.0, 1.0, -1.0) - alpha_m * cel(km, 1.0, 1.0, -1.0));
    let b_z = b0 * radius / (radius + rho)
        * (beta_p * cel(kp, gamma * gamma, 1.0, gamma) - beta_m * cel(km, gamma * gamma, 1.0, gamma));
    (b_rho, b_z)
}

/// H-field (in mT) of the mantle charge produced by transverse polarization.
fn transverse_charge_field(
    transverse: &R3,
    radius: Scalar,
    half: Scalar,
    point: &R3,
    iterations: usize,
) -> Option<R3> {
    let dphi = 2.0 * PI / iterations as Scalar;
    let (u_bottom, u_top) = (point.z + half, point.z - half);
    let mut h = R3::zeros();
    for i in 0..iterations {
        let phi = (i as Scalar + 0.5) * dphi;
        let (sin, cos) = phi.sin_cos();
        let lambda = (transverse.x * cos + transverse.y * sin) * radius * dphi;
        let dx = point.x - radius * cos;
        let dy = point.y - radius * sin;
        let s = dx.hypot(dy);
        if s == 0.0 {
            return None;
        }
        let (r_bottom, r_top) = (s.hypot(u_bottom), s.hypot(u_top));
        let radial = lambda / (4.0 * PI * s) * (u_bottom / r_bottom - u_top / r_top);
        h.x += radial * dx / s;
        h.y += radial * dy / s;
        h.z += lambda / (4.0 * PI) * (1.0 / r_top - 1.0 / r_bottom);
    }
    Some(h)
}

fn interior_weight(rho: Scalar, z: Scalar, radius: Scalar, half: Scalar) -> Scalar {
    let side = |value: Scalar, limit: Scalar| {
        if value < limit {
            1.0
        } else if value == limit {
            0.5
        } else {
            0.0
        }
    };
    side(rho, radius) * side(z.abs(), half)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::super::dipole::dipole_field;
    use super::super::multipole::FAR_FIELD_RATIO;
    use super::*;

    fn axial_unit(jz: Scalar) -> Cylinder {
        Cylinder::new(R3::new(0.0, 0.0, jz), 1.0, 1.0).expect("valid cylinder")
    }

    #[test]
    fn matches_reference_value_off_axis() {
        let b = axial_unit(1000.0).field_local(&R3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(b, R3::new(34.316_622_43, 0.0, 10.160_909_15), epsilon = 1.0e-6);
    }

    #[test]
    fn on_axis_matches_solenoid_formula() {
        let magnet = axial_unit(1000.0);
        let z: Scalar = 0.3;
        let expected = 500.0 * ((z + 0.5) / (z + 0.5).hypot(0.5) - (z - 0.5) / (z - 0.5).hypot(0.5));
        let b = magnet.field_local(&R3::new(0.0, 0.0, z));
        assert_relative_eq!(b, R3::new(0.0, 0.0, expected), epsilon = 1.0e-9);
        assert_relative_eq!(expected, 609.694_490_18, epsilon = 1.0e-6);
    }

    #[test]
    fn field_converges_onto_the_axis() {
        let magnet = axial_unit(1000.0);
        let on_axis = magnet.field_local(&R3::new(0.0, 0.0, 0.3));
        for rho in [1.0e-4, 1.0e-6, 1.0e-8] {
            let near = magnet.field_local(&R3::new(rho, 0.0, 0.3));
            assert!(near.iter().all(|c| c.is_finite()));
            assert_relative_eq!(near, on_axis, epsilon = 1.0e3 * rho);
        }
    }

    #[test]
    fn mantle_value_is_mean_of_both_sides() {
        let magnet = axial_unit(1000.0);
        let inner = magnet.field_local(&R3::new(0.5 - 1.0e-9, 0.0, 0.2));
        let on = magnet.field_local(&R3::new(0.5, 0.0, 0.2));
        let outer = magnet.field_local(&R3::new(0.5 + 1.0e-9, 0.0, 0.2));
        assert_relative_eq!(on, (inner + outer) * 0.5, epsilon = 1.0e-4);
        assert_relative_eq!(inner.z - outer.z, 1000.0, epsilon = 1.0e-3);
    }

    #[test]
    fn rim_circle_returns_sentinel() {
        let magnet = axial_unit(1000.0);
        assert_eq!(magnet.field_local(&R3::new(0.0, 0.5, 0.5)), R3::zeros());
    }

    #[test]
    fn transverse_part_converges_with_iterations() {
        let coarse = Cylinder::with_iterations(R3::new(1000.0, 0.0, 0.0), 1.0, 1.0, 50).expect("valid");
        let fine = Cylinder::with_iterations(R3::new(1000.0, 0.0, 0.0), 1.0, 1.0, 4000).expect("valid");
        let outside = R3::new(1.0, 0.3, 0.8);
        let inside = R3::new(0.1, 0.05, 0.1);
        assert_relative_eq!(coarse.field_local(&outside), fine.field_local(&outside), max_relative = 1.0e-9);
        assert_relative_eq!(
            coarse.field_local(&inside),
            R3::new(647.373_145_48, -1.352_719_25, 10.619_584_77),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn transverse_far_field_approaches_dipole() {
        let j = R3::new(0.0, 800.0, 0.0);
        let magnet = Cylinder::new(j, 1.0, 1.0).expect("valid");
        let r = R3::new(20.0, 35.0, -25.0);
        let moment = j * (PI * 0.25);
        let d = r.norm();
        let dipole = (r * (3.0 * moment.dot(&r) / d.powi(2)) - moment) / (4.0 * PI * d.powi(3));
        assert_relative_eq!(magnet.field_local(&r), dipole, max_relative = 1.0e-3);
    }

    #[test]
    fn quadrature_agrees_with_closed_form_past_the_switch() {
        let magnet = Cylinder::new(R3::new(400.0, -300.0, 700.0), 2.0, 1.5).expect("valid");
        let (radius, half) = (1.0, 0.75);
        for direction in [R3::new(0.6, -0.3, 0.7), R3::z(), R3::new(-0.2, 0.9, 0.1)] {
            let p = direction.normalize() * (1.2 * FAR_FIELD_RATIO * Scalar::hypot(radius, half));
            assert_relative_eq!(
                cylinder_far_field(&magnet.magnetization, radius, half, &p),
                magnet.closed_form(radius, half, &p),
                max_relative = 1.0e-7
            );
        }
    }

    #[test]
    fn far_field_matches_dipole_across_distances() {
        let size = Scalar::hypot(0.5, 0.5);
        let moment_per_tesla = PI * 0.25;
        for j in [R3::new(0.0, 0.0, 1000.0), R3::new(0.0, 800.0, 0.0)] {
            let magnet = Cylinder::new(j, 1.0, 1.0).expect("valid");
            for ratio in [1.0e2, 1.0e3, 1.0e5, 1.0e7] {
                let p = R3::new(0.6, -0.3, 0.7).normalize() * (ratio * size);
                let tolerance = 3.0 / (ratio * ratio) + 1.0e-9;
                assert_relative_eq!(
                    magnet.field_local(&p),
                    dipole_field(&(j * moment_per_tesla), &p),
                    max_relative = tolerance
                );
            }
        }
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(Cylinder::new(R3::z(), 0.0, 1.0).is_err());
        assert!(Cylinder::new(R3::z(), 1.0, -1.0).is_err());
        assert!(Cylinder::with_iterations(R3::z(), 1.0, 1.0, 0).is_err());
    }
}
