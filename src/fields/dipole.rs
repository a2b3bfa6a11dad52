//! Magnetic point dipole.
//!
//! `B = (3(m·r̂)r̂ − m) / (4π r³)` with the moment in mT·mm³. The field has no
//! finite value at the dipole itself; `r = 0` returns the zero-vector
//! sentinel.

use std::f64::consts::PI;

use crate::errors::Result;
use crate::math::{ensure_finite_vector, R3};

use super::FieldKernel;

/// Point dipole located at the origin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dipole {
    moment: R3,
}

impl Dipole {
    /// Creates a dipole with `moment` in mT·mm³.
    pub fn new(moment: R3) -> Result<Self> {
        ensure_finite_vector("dipole moment", &moment)?;
        Ok(Self { moment })
    }

    /// Dipole moment in mT·mm³.
    #[must_use]
    pub const fn moment(&self) -> R3 {
        self.moment
    }
}

impl FieldKernel for Dipole {
    fn field_local(&self, point: &R3) -> R3 {
        dipole_field(&self.moment, point)
    }
}

/// Field at `point` of a dipole `moment` sitting at the origin.
#[inline]
#[must_use]
pub(crate) fn dipole_field(moment: &R3, point: &R3) -> R3 {
    let r2 = point.norm_squared();
    if r2 == 0.0 {
        return R3::zeros();
    }
    let r = r2.sqrt();
    (point * (3.0 * moment.dot(point) / r2) - moment) / (4.0 * PI * r2 * r)
}
