//! Batched field evaluation over many observation points.
//!
//! Each source is snapshotted once per batch into a [`PreparedSource`]: its
//! position, the rotation matrix and its inverse, and a copy of its kernel.
//! Locks on shared sources are held only while the snapshot is taken, so a
//! long batch never blocks writers.

use tracing::trace;

use crate::collection::Collection;
use crate::config::EvaluationConfig;
use crate::errors::{MagnetostaticsError, Result};
use crate::fields::FieldKernel;
use crate::math::{ensure_finite_vector, R3, R3x3};
use crate::sources::{SharedSource, Source, SourceKind};

/// Immutable per-batch copy of one source with its frame transforms
/// precomputed.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    position: R3,
    to_local: R3x3,
    to_world: R3x3,
    kind: SourceKind,
}

impl PreparedSource {
    /// Snapshots `source`.
    #[must_use]
    pub fn from_source(source: &Source) -> Self {
        let to_world = source.orientation().to_rotation_matrix().into_inner();
        Self {
            position: source.position(),
            to_local: to_world.transpose(),
            to_world,
            kind: source.kind().clone(),
        }
    }

    /// World-frame flux density (mT) at a world point (mm).
    #[inline]
    #[must_use]
    pub fn field(&self, point: &R3) -> R3 {
        let local = self.to_local * (point - self.position);
        self.to_world * self.kind.field_local(&local)
    }
}

/// Anything that produces a world-frame field: a single source, a shared
/// handle or a whole collection.
pub trait FieldSource {
    /// Flux density (mT) at a world point (mm). Never fails; see the kernel
    /// docs for the values returned at singular points.
    fn field(&self, point: &R3) -> R3;

    /// Snapshot of every contributing source, in summation order.
    fn prepare(&self) -> Vec<PreparedSource>;

    /// Like [`FieldSource::field`] but rejects non-finite points.
    fn try_field(&self, point: &R3) -> Result<R3> {
        ensure_finite_vector("observation point", point)?;
        Ok(self.field(point))
    }

    /// Evaluates every point with the default [`EvaluationConfig`].
    fn field_batch(&self, points: &[R3]) -> Result<Vec<R3>> {
        BatchEvaluator::default().evaluate(self, points)
    }
}

impl FieldSource for Source {
    fn field(&self, point: &R3) -> R3 {
        Self::field(self, point)
    }

    fn prepare(&self) -> Vec<PreparedSource> {
        vec![PreparedSource::from_source(self)]
    }
}

impl FieldSource for SharedSource {
    fn field(&self, point: &R3) -> R3 {
        Self::field(self, point)
    }

    fn prepare(&self) -> Vec<PreparedSource> {
        vec![PreparedSource::from_source(&self.read())]
    }
}

impl FieldSource for Collection {
    fn field(&self, point: &R3) -> R3 {
        Self::field(self, point)
    }

    fn prepare(&self) -> Vec<PreparedSource> {
        self.iter()
            .map(|member| PreparedSource::from_source(&member.read()))
            .collect()
    }
}

/// Evaluates sources over point sets, in input order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchEvaluator {
    config: EvaluationConfig,
}

impl BatchEvaluator {
    /// Creates an evaluator with the given scheduling settings.
    #[must_use]
    pub const fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Field of a single source at every point.
    pub fn evaluate_source(&self, source: &Source, points: &[R3]) -> Result<Vec<R3>> {
        self.evaluate(source, points)
    }

    /// Superposed field of a collection at every point.
    pub fn evaluate_collection(&self, collection: &Collection, points: &[R3]) -> Result<Vec<R3>> {
        self.evaluate(collection, points)
    }

    /// Field of any [`FieldSource`] at every point.
    ///
    /// Fails with `InvalidParameter` naming the first non-finite point; no
    /// field is evaluated in that case.
    pub fn evaluate<S: FieldSource + ?Sized>(&self, source: &S, points: &[R3]) -> Result<Vec<R3>> {
        if let Some(index) = points
            .iter()
            .position(|p| !p.iter().all(|c| c.is_finite()))
        {
            return Err(MagnetostaticsError::InvalidParameter(format!(
                "observation point {index} must be finite"
            )));
        }

        let prepared = source.prepare();
        let parallel = self.config.dispatches_parallel(points.len());
        trace!(
            points = points.len(),
            sources = prepared.len(),
            parallel,
            threads = ?self.config.threads,
            "evaluating batch"
        );

        let mut out = vec![R3::zeros(); points.len()];
        if prepared.is_empty() {
            return Ok(out);
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            if parallel {
                let chunk = self.config.chunk_size.max(1);
                let run = |out: &mut [R3]| {
                    out.par_chunks_mut(chunk)
                        .zip(points.par_chunks(chunk))
                        .for_each(|(dst, src)| fill(dst, src, &prepared));
                };
                match self.config.threads {
                    Some(threads) => {
                        let pool = rayon::ThreadPoolBuilder::new()
                            .num_threads(threads)
                            .build()
                            .map_err(|e| {
                                MagnetostaticsError::InvalidParameter(format!(
                                    "failed to build a {threads}-thread pool: {e}"
                                ))
                            })?;
                        pool.install(|| run(out.as_mut_slice()));
                    }
                    None => run(out.as_mut_slice()),
                }
                return Ok(out);
            }
        }

        fill(&mut out, points, &prepared);
        Ok(out)
    }
}

fn fill(dst: &mut [R3], points: &[R3], prepared: &[PreparedSource]) {
    for (slot, point) in dst.iter_mut().zip(points) {
        *slot = prepared
            .iter()
            .fold(R3::zeros(), |acc, source| acc + source.field(point));
    }
}
