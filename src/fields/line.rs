//! Polygonal line current.
//!
//! Current flows from the first vertex to the last along straight segments.
//! Each segment uses the closed Biot–Savart form
//!
//! ```text
//! B = μ₀I/4π · (L × r₁) · 2(|r₁| + |r₂|) / (|r₁||r₂| ((|r₁| + |r₂|)² − |L|²))
//! ```
//!
//! where `L` is the segment vector and `r₁`, `r₂` point from its ends to the
//! observer. Written this way no difference of nearly equal terms appears, so
//! the field stays accurate far from the segment. Zero-length segments are skipped. A point collinear with a
//! segment receives nothing from it: the exact limit beyond the segment and
//! the sentinel on the wire itself.

use crate::constants::MU0_OVER_4PI;
use crate::errors::{MagnetostaticsError, Result};
use crate::math::{ensure_finite, ensure_finite_vector, R3, Scalar};

use super::FieldKernel;

/// Squared sine of the angle below which observer and segment are collinear.
const COLLINEAR_TOLERANCE: Scalar = 1.0e-24;

/// Piecewise-straight filament through a list of vertices.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LineCurrent {
    current: Scalar,
    vertices: Vec<R3>,
}

impl LineCurrent {
    /// Creates a line current with `current` (A) flowing through `vertices`
    /// (mm). At least two vertices are required.
    pub fn new(current: Scalar, vertices: Vec<R3>) -> Result<Self> {
        ensure_finite("line current", current)?;
        if vertices.len() < 2 {
            return Err(MagnetostaticsError::InvalidParameter(format!(
                "line current needs at least 2 vertices, got {}",
                vertices.len()
            )));
        }
        for vertex in &vertices {
            ensure_finite_vector("line current vertex", vertex)?;
        }
        Ok(Self { current, vertices })
    }

    /// Current in A.
    #[must_use]
    pub const fn current(&self) -> Scalar {
        self.current
    }

    /// Vertices in the local frame, in mm.
    #[must_use]
    pub fn vertices(&self) -> &[R3] {
        &self.vertices
    }
}

impl FieldKernel for LineCurrent {
    fn field_local(&self, point: &R3) -> R3 {
        self.vertices
            .windows(2)
            .map(|pair| segment_field(&pair[0], &pair[1], point))
            .sum::<R3>()
            * (MU0_OVER_4PI * self.current)
    }
}

/// Geometric part of one segment's field, per unit μ₀I/4π.
fn segment_field(start: &R3, end: &R3, point: &R3) -> R3 {
    let l = end - start;
    let l2 = l.norm_squared();
    if l2 == 0.0 {
        return R3::zeros();
    }
    let r1 = point - start;
    let r2 = point - end;
    let cross = l.cross(&r1);
    let cross2 = cross.norm_squared();
    if cross2 <= COLLINEAR_TOLERANCE * l2 * r1.norm_squared() {
        return R3::zeros();
    }
    let (n1, n2) = (r1.norm(), r2.norm());
    let sum = n1 + n2;
    cross * (2.0 * sum / (n1 * n2 * (sum * sum - l2)))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::super::dipole::dipole_field;
    use super::*;

    fn polygon(n: usize, closing_index: usize) -> Vec<R3> {
        (0..=closing_index)
            .map(|i| {
                let phi = 2.0 * PI * i as Scalar / n as Scalar;
                R3::new(phi.cos(), phi.sin(), 0.0)
            })
            .collect()
    }

    #[test]
    fn polygon_matches_reference_value() {
        let line = LineCurrent::new(10.0, polygon(35, 35)).expect("valid line");
        let b = line.field_local(&R3::new(0.0, 0.0, 2.0));
        assert_relative_eq!(b, R3::new(0.0, 0.0, 0.559_871_233), epsilon = 1.0e-8);
    }

    #[test]
    fn long_straight_wire_approaches_ampere_law() {
        let line = LineCurrent::new(
            3.0,
            vec![R3::new(0.0, 0.0, -1.0e6), R3::new(0.0, 0.0, 1.0e6)],
        )
        .expect("valid line");
        let b = line.field_local(&R3::new(2.0, 0.0, 0.0));
        // μ₀I/(2πd) = 2·(μ₀/4π)·I/d
        assert_relative_eq!(b, R3::new(0.0, 2.0 * MU0_OVER_4PI * 3.0 / 2.0, 0.0), max_relative = 1.0e-9);
    }

    #[test]
    fn collinear_points_receive_no_contribution() {
        let line = LineCurrent::new(1.0, vec![R3::zeros(), R3::x()]).expect("valid line");
        assert_eq!(line.field_local(&R3::new(3.0, 0.0, 0.0)), R3::zeros());
        assert_eq!(line.field_local(&R3::new(0.5, 0.0, 0.0)), R3::zeros());
        assert_eq!(line.field_local(&R3::zeros()), R3::zeros());
    }

    #[test]
    fn repeated_vertices_are_ignored() {
        let single = LineCurrent::new(2.0, vec![R3::zeros(), R3::x()]).expect("valid line");
        let doubled = LineCurrent::new(2.0, vec![R3::zeros(), R3::zeros(), R3::x(), R3::x()]).expect("valid line");
        let p = R3::new(0.2, 0.7, -0.4);
        assert_relative_eq!(single.field_local(&p), doubled.field_local(&p), epsilon = 1.0e-15);
    }

    #[test]
    fn square_loop_far_field_is_dipolar() {
        let a = 2.0;
        let h = 0.5 * a;
        let square = vec![
            R3::new(-h, -h, 0.0),
            R3::new(h, -h, 0.0),
            R3::new(h, h, 0.0),
            R3::new(-h, h, 0.0),
            R3::new(-h, -h, 0.0),
        ];
        let current = 4.0;
        let line = LineCurrent::new(current, square).expect("valid line");
        // Moment of the loop in mT·mm³.
        let moment = R3::new(0.0, 0.0, 4.0 * PI * MU0_OVER_4PI * current * a * a);
        for ratio in [1.0e2, 1.0e4, 1.0e5, 1.0e7] {
            let r = ratio * a;
            let p = R3::new(0.6 * r, -0.3 * r, 0.7 * r);
            let expected = dipole_field(&moment, &p);
            let tolerance = 3.0 / (ratio * ratio) + 1.0e-7;
            assert_relative_eq!(line.field_local(&p), expected, max_relative = tolerance);
        }
    }

    #[test]
    fn rejects_single_vertex() {
        assert!(LineCurrent::new(1.0, vec![R3::zeros()]).is_err());
        assert!(LineCurrent::new(Scalar::INFINITY, vec![R3::zeros(), R3::x()]).is_err());
    }
}
