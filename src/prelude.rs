//! Convenience re-exports for building magnet assemblies.

pub use crate::batch::{BatchEvaluator, FieldSource, PreparedSource};
pub use crate::collection::Collection;
pub use crate::config::EvaluationConfig;
pub use crate::constants::*;
pub use crate::errors::{MagnetostaticsError, Result};
pub use crate::fields::{
    CircularLoop, Cuboid, Cylinder, Dipole, FieldKernel, LineCurrent, Sphere,
    DEFAULT_TRANSVERSE_ITERATIONS,
};
pub use crate::math::{rotation_from_angle_axis, R3, R3x3, Rotation, Scalar};
pub use crate::pose::Pose;
pub use crate::sources::{SharedSource, Source, SourceKind, SourceTag};
pub use crate::sweep::{grid_xy, grid_xz, line_points, linspace, plane_grid, sweep_map};
