//! Closed-form magnetic field kernels, one per source geometry.
//!
//! Every kernel maps an observation point expressed in the source's local
//! frame to the flux density in that same frame. Kernels are pure functions
//! of their parameters and the point: they hold no mutable state and may be
//! called from any number of threads at once.
//!
//! Points where a closed form breaks down are handled per geometry, either
//! with an exact limiting expression or, where no finite field exists, with
//! the zero vector. Each module lists its own partition of the domain.

mod circular;
mod cuboid;
mod cylinder;
mod dipole;
/// Bulirsch's general complete elliptic integral and its special cases.
pub mod elliptic;
mod line;
mod multipole;
mod sphere;

pub use circular::CircularLoop;
pub use cuboid::Cuboid;
pub use cylinder::{Cylinder, DEFAULT_TRANSVERSE_ITERATIONS};
pub use dipole::Dipole;
pub use line::LineCurrent;
pub use sphere::Sphere;

use crate::math::R3;

/// Capability shared by every source geometry: the flux density (mT) at a
/// point (mm) given in the source's canonical local frame.
pub trait FieldKernel {
    /// Evaluates the local-frame field at `point`.
    fn field_local(&self, point: &R3) -> R3;
}
