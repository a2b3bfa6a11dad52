//! Ordered groups of shared sources that move as one rigid body and answer
//! field queries by superposition.

use std::slice;

use tracing::{debug, warn};

use crate::batch::BatchEvaluator;
use crate::errors::{MagnetostaticsError, Result};
use crate::math::{ensure_finite_vector, rotation_from_angle_axis, R3, Scalar};
use crate::sources::SharedSource;

/// Deduplicated, ordered set of [`SharedSource`] handles.
///
/// Membership is by handle identity: adding the same handle twice is a no-op,
/// and one handle may sit in any number of collections. Cloning a collection
/// clones the handles, not the sources behind them.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    members: Vec<SharedSource>,
}

impl Collection {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Collection holding `sources` in order, duplicates dropped.
    #[must_use]
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SharedSource>,
    {
        let mut collection = Self::new();
        collection.extend(sources);
        collection
    }

    /// Appends `source`. Returns `false` if it was already a member.
    pub fn add(&mut self, source: impl Into<SharedSource>) -> bool {
        let source = source.into();
        if self.contains(&source) {
            warn!(tag = %source.tag(), "source already in collection, ignoring");
            return false;
        }
        self.members.push(source);
        debug!(members = self.members.len(), "source added to collection");
        true
    }

    /// Appends every source, returning how many were new.
    pub fn extend<I, S>(&mut self, sources: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<SharedSource>,
    {
        sources
            .into_iter()
            .fold(0, |added, source| added + usize::from(self.add(source)))
    }

    /// Adds every member of `other`, keeping its order.
    pub fn absorb(&mut self, other: &Self) -> usize {
        self.extend(other.members.iter().cloned())
    }

    /// Removes `source` and hands back the member handle.
    pub fn remove(&mut self, source: &SharedSource) -> Result<SharedSource> {
        let index = self
            .members
            .iter()
            .position(|member| member.ptr_eq(source))
            .ok_or_else(|| {
                MagnetostaticsError::NotFound(format!(
                    "{} is not a member of this collection",
                    source.tag()
                ))
            })?;
        self.remove_at(index)
    }

    /// Removes the member at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<SharedSource> {
        if index >= self.members.len() {
            return Err(MagnetostaticsError::NotFound(format!(
                "index {index} out of range for collection of {}",
                self.members.len()
            )));
        }
        let removed = self.members.remove(index);
        debug!(index, members = self.members.len(), "source removed from collection");
        Ok(removed)
    }

    /// Removes the last member, if any.
    pub fn pop(&mut self) -> Option<SharedSource> {
        let removed = self.members.pop();
        if removed.is_some() {
            debug!(members = self.members.len(), "source removed from collection");
        }
        removed
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, SharedSource> {
        self.members.iter()
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SharedSource> {
        self.members.get(index)
    }

    /// True when `source` is a member.
    #[must_use]
    pub fn contains(&self, source: &SharedSource) -> bool {
        self.members.iter().any(|member| member.ptr_eq(source))
    }

    /// Mean of member positions; `None` when empty.
    #[must_use]
    pub fn centroid(&self) -> Option<R3> {
        if self.members.is_empty() {
            return None;
        }
        let sum = self
            .members
            .iter()
            .fold(R3::zeros(), |acc, member| acc + member.position());
        Some(sum / self.members.len() as Scalar)
    }

    /// Translates every member by `displacement`.
    pub fn move_by(&mut self, displacement: R3) -> &mut Self {
        for member in &self.members {
            member.move_by(displacement);
        }
        self
    }

    /// Rotates every member by `angle_deg` about `axis` through one common
    /// anchor, the member centroid when `anchor` is `None`.
    ///
    /// Relative positions and orientations are preserved. The axis is checked
    /// before any member moves, so an error leaves the collection untouched.
    pub fn rotate(&mut self, angle_deg: Scalar, axis: R3, anchor: Option<R3>) -> Result<&mut Self> {
        let rotation = rotation_from_angle_axis(angle_deg, &axis)?;
        if let Some(anchor) = &anchor {
            ensure_finite_vector("rotation anchor", anchor)?;
        }
        let Some(anchor) = anchor.or_else(|| self.centroid()) else {
            return Ok(self);
        };
        for member in &self.members {
            member.write().apply_rotation(&rotation, &anchor);
        }
        debug!(
            members = self.members.len(),
            angle_deg,
            anchor = ?anchor,
            "collection rotated"
        );
        Ok(self)
    }

    /// Rotates every member about its own position. Positions stay put, only
    /// orientations change.
    pub fn rotate_members_in_place(&mut self, angle_deg: Scalar, axis: R3) -> Result<&mut Self> {
        let rotation = rotation_from_angle_axis(angle_deg, &axis)?;
        for member in &self.members {
            let mut source = member.write();
            let anchor = source.position();
            source.apply_rotation(&rotation, &anchor);
        }
        debug!(members = self.members.len(), angle_deg, "members rotated in place");
        Ok(self)
    }

    /// Superposed flux density (mT) at a world point (mm). Exactly zero for an
    /// empty collection.
    #[must_use]
    pub fn field(&self, point: &R3) -> R3 {
        self.members
            .iter()
            .fold(R3::zeros(), |acc, member| acc + member.field(point))
    }

    /// Superposed field at every point, in input order.
    pub fn field_batch(&self, points: &[R3]) -> Result<Vec<R3>> {
        BatchEvaluator::default().evaluate_collection(self, points)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a SharedSource;
    type IntoIter = slice::Iter<'a, SharedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<SharedSource>> FromIterator<S> for Collection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_sources(iter)
    }
}
