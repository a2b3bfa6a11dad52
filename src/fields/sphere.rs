//! Uniformly magnetized sphere.
//!
//! Outside the sphere the field is exactly that of a point dipole carrying
//! the total moment J·V; inside it is uniform, B = ⅔·J. The surface belongs
//! to the interior. There are no undefined points.

use std::f64::consts::PI;

use crate::errors::Result;
use crate::math::{ensure_finite_vector, ensure_positive, R3, Scalar};

use super::dipole::dipole_field;
use super::FieldKernel;

/// Homogeneously magnetized sphere centred on the origin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    magnetization: R3,
    diameter: Scalar,
}

impl Sphere {
    /// Creates a sphere with polarization `magnetization` (mT) and `diameter` (mm).
    pub fn new(magnetization: R3, diameter: Scalar) -> Result<Self> {
        ensure_finite_vector("sphere magnetization", &magnetization)?;
        ensure_positive("sphere diameter", diameter)?;
        Ok(Self {
            magnetization,
            diameter,
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
}

impl FieldKernel for Sphere {
    fn field_local(&self, point: &R3) -> R3 {
        let radius = 0.5 * self.diameter;
        if point.norm() <= radius {
            return self.magnetization * (2.0 / 3.0);
        }
        let volume = 4.0 / 3.0 * PI * radius.powi(3);
        dipole_field(&(self.magnetization * volume), point)
    }
}
