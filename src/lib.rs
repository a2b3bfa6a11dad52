#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Physical constants and unit conversions used by the kernels.
pub mod constants;
/// Shared mathematical utilities (vectors, matrices, rotations).
pub mod math;
/// Closed-form field kernels, one per source geometry.
pub mod fields;
/// Position and orientation of a source.
pub mod pose;
/// Sources binding a kernel to a pose, and shared handles to them.
pub mod sources;
/// Rigid groups of sources and their superposed field.
pub mod collection;
/// Batched evaluation over many observation points.
pub mod batch;
/// Settings for batched evaluation.
pub mod config;
/// Observation-point grids and sampling helpers.
pub mod sweep;
/// Error types shared across modules.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
