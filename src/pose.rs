//! Position and orientation of a source in world coordinates.
//!
//! Angles are given in degrees and rotations are active and right-handed: a
//! positive angle turns a vector counter-clockwise when looking down the axis
//! towards the origin. Orientation maps local vectors to world vectors.

use crate::errors::Result;
use crate::math::{ensure_finite_vector, rotation_from_angle_axis, Rotation, R3, Scalar};

/// Placement of a source: the world position of its local origin and the
/// rotation taking local axes to world axes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    position: R3,
    orientation: Rotation,
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(R3::zeros())
    }
}

impl Pose {
    /// Creates an unrotated pose at `position`. The position is not checked;
    /// [`Source::with_pose`](crate::sources::Source::with_pose) rejects
    /// non-finite poses.
    #[must_use]
    pub fn new(position: R3) -> Self {
        Self {
            position,
            orientation: Rotation::identity(),
        }
    }

    /// Creates a pose at `position` rotated by `angle_deg` about `axis`.
    pub fn with_orientation(position: R3, angle_deg: Scalar, axis: R3) -> Result<Self> {
        ensure_finite_vector("position", &position)?;
        Ok(Self {
            position,
            orientation: rotation_from_angle_axis(angle_deg, &axis)?,
        })
    }

    /// World position of the local origin (mm).
    #[must_use]
    pub const fn position(&self) -> R3 {
        self.position
    }

    /// Rotation from local to world frame.
    #[must_use]
    pub const fn orientation(&self) -> Rotation {
        self.orientation
    }

    /// Rotation angle of the orientation in degrees, within `[0, 180]`.
    #[must_use]
    pub fn angle(&self) -> Scalar {
        self.orientation.angle().to_degrees()
    }

    /// Unit rotation axis of the orientation; `+z` for the identity.
    #[must_use]
    pub fn axis(&self) -> R3 {
        self.orientation
            .axis()
            .map_or_else(R3::z, |axis| axis.into_inner())
    }

    /// Translates the pose by `displacement`.
    pub fn move_by(&mut self, displacement: R3) -> &mut Self {
        self.position += displacement;
        self
    }

    /// Places the pose at an absolute `position`.
    pub fn move_to(&mut self, position: R3) -> &mut Self {
        self.position = position;
        self
    }

    /// Rotates by `angle_deg` about `axis` passing through `anchor`.
    ///
    /// `anchor = None` rotates about the current position, which only changes
    /// the orientation. Fails if the axis is zero or any input is non-finite.
    pub fn rotate(&mut self, angle_deg: Scalar, axis: R3, anchor: Option<R3>) -> Result<&mut Self> {
        let rotation = rotation_from_angle_axis(angle_deg, &axis)?;
        let anchor = match anchor {
            Some(anchor) => {
                ensure_finite_vector("rotation anchor", &anchor)?;
                anchor
            }
            None => self.position,
        };
        Ok(self.apply_rotation(&rotation, &anchor))
    }

    /// Applies an already validated rotation about `anchor`.
    pub(crate) fn apply_rotation(&mut self, rotation: &Rotation, anchor: &R3) -> &mut Self {
        self.orientation = rotation * self.orientation;
        self.orientation.renormalize();
        self.position = anchor + rotation * (self.position - anchor);
        self
    }

    /// Maps a world point into the local frame.
    #[must_use]
    pub fn to_local(&self, world_point: &R3) -> R3 {
        self.orientation
            .inverse_transform_vector(&(world_point - self.position))
    }

    /// Maps a local vector to the world frame (no translation).
    #[must_use]
    pub fn to_world_vector(&self, local_vector: &R3) -> R3 {
        self.orientation * local_vector
    }

    /// Maps a local point to the world frame.
    #[must_use]
    pub fn to_world_point(&self, local_point: &R3) -> R3 {
        self.orientation * local_point + self.position
    }
}
