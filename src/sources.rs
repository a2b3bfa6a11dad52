//! Field sources: a kernel variant bound to a pose.
//!
//! A [`Source`] answers world-frame field queries by mapping the observation
//! point into its local frame, evaluating its kernel and rotating the result
//! back. [`SharedSource`] is the reference-counted handle used for collection
//! membership, so that moving a source through one collection is visible
//! through every other collection holding it.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::Result;
use crate::fields::{CircularLoop, Cuboid, Cylinder, Dipole, FieldKernel, LineCurrent, Sphere};
use crate::math::{ensure_finite_vector, rotation_from_angle_axis, R3, Rotation, Scalar};
use crate::pose::Pose;

/// Geometry type of a source, fixed for its lifetime.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTag {
    /// Uniformly magnetized cuboid.
    Cuboid,
    /// Uniformly magnetized cylinder.
    Cylinder,
    /// Uniformly magnetized sphere.
    Sphere,
    /// Circular current loop.
    CircularLoop,
    /// Polygonal line current.
    LineCurrent,
    /// Point dipole.
    Dipole,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cuboid => "cuboid",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
            Self::CircularLoop => "circular loop",
            Self::LineCurrent => "line current",
            Self::Dipole => "dipole",
        };
        f.write_str(name)
    }
}

/// Kernel variant together with its parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// See [`Cuboid`].
    Cuboid(Cuboid),
    /// See [`Cylinder`].
    Cylinder(Cylinder),
    /// See [`Sphere`].
    Sphere(Sphere),
    /// See [`CircularLoop`].
    CircularLoop(CircularLoop),
    /// See [`LineCurrent`].
    LineCurrent(LineCurrent),
    /// See [`Dipole`].
    Dipole(Dipole),
}

impl SourceKind {
    /// Type tag of this variant.
    #[must_use]
    pub const fn tag(&self) -> SourceTag {
        match self {
            Self::Cuboid(_) => SourceTag::Cuboid,
            Self::Cylinder(_) => SourceTag::Cylinder,
            Self::Sphere(_) => SourceTag::Sphere,
            Self::CircularLoop(_) => SourceTag::CircularLoop,
            Self::LineCurrent(_) => SourceTag::LineCurrent,
            Self::Dipole(_) => SourceTag::Dipole,
        }
    }
}

impl FieldKernel for SourceKind {
    fn field_local(&self, point: &R3) -> R3 {
        match self {
            Self::Cuboid(kernel) => kernel.field_local(point),
            Self::Cylinder(kernel) => kernel.field_local(point),
            Self::Sphere(kernel) => kernel.field_local(point),
            Self::CircularLoop(kernel) => kernel.field_local(point),
            Self::LineCurrent(kernel) => kernel.field_local(point),
            Self::Dipole(kernel) => kernel.field_local(point),
        }
    }
}

macro_rules! impl_from_kernel {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for SourceKind {
                fn from(kernel: $variant) -> Self {
                    Self::$variant(kernel)
                }
            }
        )*
    };
}

impl_from_kernel!(Cuboid, Cylinder, Sphere, CircularLoop, LineCurrent, Dipole);

/// One idealized magnet, current or moment placed in the world.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    kind: SourceKind,
    pose: Pose,
}

impl Source {
    /// Creates a source at the origin with identity orientation.
    #[must_use]
    pub fn new(kind: impl Into<SourceKind>) -> Self {
        Self {
            kind: kind.into(),
            pose: Pose::default(),
        }
    }

    /// Creates a source with an explicit pose. Fails if the pose position is
    /// not finite.
    pub fn with_pose(kind: impl Into<SourceKind>, pose: Pose) -> Result<Self> {
        ensure_finite_vector("position", &pose.position())?;
        Ok(Self {
            kind: kind.into(),
            pose,
        })
    }

    /// Uniformly magnetized cuboid; see [`Cuboid::new`].
    pub fn cuboid(magnetization: R3, dimension: R3) -> Result<Self> {
        Ok(Self::new(Cuboid::new(magnetization, dimension)?))
    }

    /// Uniformly magnetized cylinder; see [`Cylinder::new`].
    pub fn cylinder(magnetization: R3, diameter: Scalar, height: Scalar) -> Result<Self> {
        Ok(Self::new(Cylinder::new(magnetization, diameter, height)?))
    }

    /// Cylinder with an explicit mantle strip count; see
    /// [`Cylinder::with_iterations`].
    pub fn cylinder_with_iterations(
        magnetization: R3,
        diameter: Scalar,
        height: Scalar,
        iterations: usize,
    ) -> Result<Self> {
        Ok(Self::new(Cylinder::with_iterations(
            magnetization,
            diameter,
            height,
            iterations,
        )?))
    }

    /// Uniformly magnetized sphere; see [`Sphere::new`].
    pub fn sphere(magnetization: R3, diameter: Scalar) -> Result<Self> {
        Ok(Self::new(Sphere::new(magnetization, diameter)?))
    }

    /// Circular current loop; see [`CircularLoop::new`].
    pub fn circular_loop(current: Scalar, diameter: Scalar) -> Result<Self> {
        Ok(Self::new(CircularLoop::new(current, diameter)?))
    }

    /// Polygonal line current; see [`LineCurrent::new`].
    pub fn line_current(current: Scalar, vertices: Vec<R3>) -> Result<Self> {
        Ok(Self::new(LineCurrent::new(current, vertices)?))
    }

    /// Point dipole; see [`Dipole::new`].
    pub fn dipole(moment: R3) -> Result<Self> {
        Ok(Self::new(Dipole::new(moment)?))
    }

    /// Places the source at `position`, builder style.
    pub fn at(mut self, position: R3) -> Result<Self> {
        ensure_finite_vector("position", &position)?;
        self.pose.move_to(position);
        Ok(self)
    }

    /// Sets the initial orientation to `angle_deg` about `axis`, builder style.
    pub fn oriented(mut self, angle_deg: Scalar, axis: R3) -> Result<Self> {
        self.pose = Pose::with_orientation(self.pose.position(), angle_deg, axis)?;
        Ok(self)
    }

    /// Kernel variant and parameters.
    #[must_use]
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Geometry type tag.
    #[must_use]
    pub const fn tag(&self) -> SourceTag {
        self.kind.tag()
    }

    /// Current pose.
    #[must_use]
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    /// World position (mm).
    #[must_use]
    pub const fn position(&self) -> R3 {
        self.pose.position()
    }

    /// Local-to-world rotation.
    #[must_use]
    pub const fn orientation(&self) -> Rotation {
        self.pose.orientation()
    }

    /// Flux density (mT) at a world point (mm).
    #[must_use]
    pub fn field(&self, point: &R3) -> R3 {
        let local = self.pose.to_local(point);
        self.pose.to_world_vector(&self.kind.field_local(&local))
    }

    /// Translates the source.
    pub fn move_by(&mut self, displacement: R3) -> &mut Self {
        self.pose.move_by(displacement);
        self
    }

    /// Places the source at an absolute position.
    pub fn move_to(&mut self, position: R3) -> &mut Self {
        self.pose.move_to(position);
        self
    }

    /// Rotates the source; see [`Pose::rotate`].
    pub fn rotate(&mut self, angle_deg: Scalar, axis: R3, anchor: Option<R3>) -> Result<&mut Self> {
        self.pose.rotate(angle_deg, axis, anchor)?;
        Ok(self)
    }

    pub(crate) fn apply_rotation(&mut self, rotation: &Rotation, anchor: &R3) {
        self.pose.apply_rotation(rotation, anchor);
    }

    /// Wraps the source in a shareable handle.
    #[must_use]
    pub fn into_shared(self) -> SharedSource {
        SharedSource::new(self)
    }
}

/// Reference-counted, lock-protected source.
///
/// Clones share the same underlying source. Field queries take a read lock;
/// `move_by`, `move_to` and `rotate` take a write lock, so readers never
/// observe a half-updated pose.
#[derive(Clone)]
pub struct SharedSource(Arc<RwLock<Source>>);

impl SharedSource {
    /// Wraps `source`.
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self(Arc::new(RwLock::new(source)))
    }

    /// Locks the source for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Source> {
        self.0.read()
    }

    /// Locks the source for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Source> {
        self.0.write()
    }

    /// True when both handles refer to the same source.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy of the current source state.
    #[must_use]
    pub fn snapshot(&self) -> Source {
        self.read().clone()
    }

    /// Geometry type tag.
    #[must_use]
    pub fn tag(&self) -> SourceTag {
        self.read().tag()
    }

    /// Current world position.
    #[must_use]
    pub fn position(&self) -> R3 {
        self.read().position()
    }

    /// Flux density (mT) at a world point (mm).
    #[must_use]
    pub fn field(&self, point: &R3) -> R3 {
        self.read().field(point)
    }

    /// Translates the source.
    pub fn move_by(&self, displacement: R3) -> &Self {
        self.write().move_by(displacement);
        self
    }

    /// Places the source at an absolute position.
    pub fn move_to(&self, position: R3) -> &Self {
        self.write().move_to(position);
        self
    }

    /// Rotates the source; see [`Pose::rotate`].
    pub fn rotate(&self, angle_deg: Scalar, axis: R3, anchor: Option<R3>) -> Result<&Self> {
        let rotation = rotation_from_angle_axis(angle_deg, &axis)?;
        if let Some(anchor) = &anchor {
            ensure_finite_vector("rotation anchor", anchor)?;
        }
        let mut source = self.write();
        let anchor = anchor.unwrap_or_else(|| source.position());
        source.apply_rotation(&rotation, &anchor);
        Ok(self)
    }
}

impl From<Source> for SharedSource {
    fn from(source: Source) -> Self {
        Self::new(source)
    }
}

impl fmt::Debug for SharedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.read();
        f.debug_struct("SharedSource")
            .field("tag", &source.tag())
            .field("position", &source.position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn unrotated_source_at_origin_matches_kernel() {
        let kernel = Cuboid::new(R3::new(0.0, 0.0, 1000.0), R3::new(1.0, 1.0, 1.0)).expect("valid");
        let source = Source::new(kernel);
        let p = R3::new(1.0, 0.0, 1.0);
        assert_eq!(source.field(&p), kernel.field_local(&p));
        assert_eq!(source.tag(), SourceTag::Cuboid);
    }

    #[test]
    fn explicit_pose_must_be_finite() {
        let kernel = Dipole::new(R3::z()).expect("valid");
        assert!(Source::with_pose(kernel, Pose::new(R3::repeat(Scalar::NAN))).is_err());
        assert!(Source::with_pose(kernel, Pose::new(R3::new(0.0, Scalar::INFINITY, 0.0))).is_err());

        let pose = Pose::with_orientation(R3::new(1.0, 2.0, 3.0), 30.0, R3::x()).expect("valid");
        let source = Source::with_pose(kernel, pose).expect("finite pose");
        assert_eq!(source.pose(), &pose);
    }

    #[test]
    fn translated_source_shifts_field() {
        let moved = Source::sphere(R3::new(0.0, 0.0, 1000.0), 1.0)
            .and_then(|s| s.at(R3::new(5.0, -2.0, 1.0)))
            .expect("valid");
        let centred = Source::sphere(R3::new(0.0, 0.0, 1000.0), 1.0).expect("valid");
        let offset = R3::new(1.0, 0.0, 1.0);
        assert_relative_eq!(
            moved.field(&(R3::new(5.0, -2.0, 1.0) + offset)),
            centred.field(&offset),
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn rotating_magnet_rotates_its_field() {
        // Turning a z-magnetized cuboid by 90° about y points its polarization
        // along +x.
        let rotated = Source::cuboid(R3::new(0.0, 0.0, 1000.0), R3::new(1.0, 2.0, 3.0))
            .and_then(|s| s.oriented(90.0, R3::y()))
            .expect("valid");
        let reference = Source::cuboid(R3::new(1000.0, 0.0, 0.0), R3::new(3.0, 2.0, 1.0)).expect("valid");
        let p = R3::new(2.0, 0.5, -1.5);
        assert_relative_eq!(rotated.field(&p), reference.field(&p), epsilon = 1.0e-9);
    }

    #[test]
    fn methods_chain() {
        let mut source = Source::dipole(R3::z()).expect("valid");
        source
            .move_by(R3::x())
            .move_by(R3::y())
            .rotate(90.0, R3::z(), Some(R3::zeros()))
            .expect("valid axis")
            .move_to(R3::new(0.0, 0.0, 4.0));
        assert_eq!(source.position(), R3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(source.pose().angle(), 90.0, epsilon = 1.0e-10);
    }

    #[test]
    fn shared_handles_see_each_others_moves() {
        let a = Source::sphere(R3::z(), 1.0).expect("valid").into_shared();
        let b = a.clone();
        a.move_by(R3::new(1.0, 2.0, 3.0));
        assert!(a.ptr_eq(&b));
        assert_eq!(b.position(), R3::new(1.0, 2.0, 3.0));
        let c = SharedSource::new(a.snapshot());
        assert!(!c.ptr_eq(&a));
    }

    #[test]
    fn shared_rotation_validates_before_locking() {
        let a = Source::dipole(R3::x()).expect("valid").into_shared();
        assert!(a.rotate(10.0, R3::zeros(), None).is_err());
        assert!(a.rotate(10.0, R3::z(), Some(R3::new(Scalar::NAN, 0.0, 0.0))).is_err());
        a.rotate(180.0, R3::z(), Some(R3::new(1.0, 0.0, 0.0))).expect("valid");
        assert_relative_eq!(a.position(), R3::new(2.0, 0.0, 0.0), epsilon = 1.0e-12);
    }

    #[test]
    fn builder_rejects_non_finite_position() {
        let result = Source::dipole(R3::z()).and_then(|s| s.at(R3::new(0.0, Scalar::INFINITY, 0.0)));
        assert!(result.is_err());
    }
}
