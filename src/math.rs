//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::{Matrix3, Unit, UnitQuaternion, Vector3};

use crate::errors::{MagnetostaticsError, Result};

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for three-dimensional real vectors.
pub type R3 = Vector3<Scalar>;
/// Convenient alias for three-by-three real matrices.
pub type R3x3 = Matrix3<Scalar>;
/// Orientation of a source relative to the world frame.
pub type Rotation = UnitQuaternion<Scalar>;

/// Builds the active, right-handed rotation of `angle_deg` degrees about `axis`.
///
/// The axis does not need to be normalized but must be finite and non-zero.
pub fn rotation_from_angle_axis(angle_deg: Scalar, axis: &R3) -> Result<Rotation> {
    ensure_finite("rotation angle", angle_deg)?;
    ensure_finite_vector("rotation axis", axis)?;
    let norm = axis.norm();
    if norm == 0.0 {
        return Err(MagnetostaticsError::InvalidParameter(
            "rotation axis must be a non-zero vector".into(),
        ));
    }
    let unit = Unit::new_unchecked(axis / norm);
    Ok(UnitQuaternion::from_axis_angle(&unit, angle_deg.to_radians()))
}

/// Rejects NaN and infinite scalars.
pub(crate) fn ensure_finite(what: &str, value: Scalar) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MagnetostaticsError::InvalidParameter(format!(
            "{what} must be finite, got {value}"
        )))
    }
}

/// Rejects vectors with a NaN or infinite component.
pub(crate) fn ensure_finite_vector(what: &str, value: &R3) -> Result<()> {
    if value.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(MagnetostaticsError::InvalidParameter(format!(
            "{what} must be finite, got [{}, {}, {}]",
            value.x, value.y, value.z
        )))
    }
}

/// Rejects non-finite, zero and negative geometric dimensions.
pub(crate) fn ensure_positive(what: &str, value: Scalar) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MagnetostaticsError::InvalidParameter(format!(
            "{what} must be positive and finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let rot = rotation_from_angle_axis(90.0, &R3::new(0.0, 0.0, 5.0)).expect("valid axis");
        let v = rot * R3::x();
        assert_relative_eq!(v, R3::y(), epsilon = 1.0e-12);
    }

    #[test]
    fn zero_axis_is_rejected() {
        let err = rotation_from_angle_axis(30.0, &R3::zeros()).unwrap_err();
        assert!(matches!(err, MagnetostaticsError::InvalidParameter(_)));
    }

    #[test]
    fn non_finite_angle_is_rejected() {
        assert!(rotation_from_angle_axis(Scalar::NAN, &R3::z()).is_err());
        assert!(ensure_finite_vector("p", &R3::new(0.0, Scalar::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn dimensions_must_be_strictly_positive() {
        assert!(ensure_positive("d", 1.0e-9).is_ok());
        assert!(ensure_positive("d", 0.0).is_err());
        assert!(ensure_positive("d", -2.0).is_err());
    }
}
