//! Observation-point generators for batched queries.

use crate::math::{R3, Scalar};

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// `n` evenly spaced points on the segment from `start` to `stop`, endpoints
/// included.
#[must_use]
pub fn line_points(start: R3, stop: R3, n: usize) -> Vec<R3> {
    linspace(0.0, 1.0, n)
        .into_iter()
        .map(|t| start + (stop - start) * t)
        .collect()
}

/// Row-major grid spanned by `origin + u·s + v·t` for `s` in `u_samples` and
/// `t` in `v_samples`; the `v` index varies fastest.
#[must_use]
pub fn plane_grid(origin: R3, u: R3, v: R3, u_samples: &[Scalar], v_samples: &[Scalar]) -> Vec<R3> {
    u_samples
        .iter()
        .flat_map(|&s| v_samples.iter().map(move |&t| origin + u * s + v * t))
        .collect()
}

/// Grid in the y = 0 plane, x varying slowest.
#[must_use]
pub fn grid_xz(xs: &[Scalar], zs: &[Scalar]) -> Vec<R3> {
    plane_grid(R3::zeros(), R3::x(), R3::z(), xs, zs)
}

/// Grid in the z = `z` plane, x varying slowest.
#[must_use]
pub fn grid_xy(xs: &[Scalar], ys: &[Scalar], z: Scalar) -> Vec<R3> {
    plane_grid(R3::new(0.0, 0.0, z), R3::x(), R3::y(), xs, ys)
}

/// Applies `f` to each point and collects results.
#[must_use]
pub fn sweep_map<I, F, T>(points: I, f: F) -> Vec<T>
where
    I: IntoIterator<Item = R3>,
    F: FnMut(R3) -> T,
{
    points.into_iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_basic() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
    }

    #[test]
    fn line_points_hit_endpoints() {
        let pts = line_points(R3::new(1.0, 0.0, 0.0), R3::new(1.0, 4.0, -2.0), 3);
        assert_eq!(pts.len(), 3);
        assert_relative_eq!(pts[1], R3::new(1.0, 2.0, -1.0));
        assert_relative_eq!(pts[2], R3::new(1.0, 4.0, -2.0));
    }

    #[test]
    fn grid_layout_is_row_major() {
        let pts = grid_xz(&[0.0, 1.0], &[-1.0, 0.0, 1.0]);
        assert_eq!(pts.len(), 6);
        assert_eq!(pts[0], R3::new(0.0, 0.0, -1.0));
        assert_eq!(pts[2], R3::new(0.0, 0.0, 1.0));
        assert_eq!(pts[3], R3::new(1.0, 0.0, -1.0));
        let xy = grid_xy(&[2.0], &[3.0], 5.0);
        assert_eq!(xy, vec![R3::new(2.0, 3.0, 5.0)]);
    }

    #[test]
    fn sweep_map_runs_function() {
        let out = sweep_map(grid_xz(&[1.0, 2.0], &[0.0]), |p| p.x * 2.0);
        assert_eq!(out, vec![2.0, 4.0]);
    }
}
