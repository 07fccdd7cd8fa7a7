//! Batch orchestration: one immutable snapshot list in, keyed results out.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use replenish_core::{BatchRunId, ProductId, UrgencyLevel};
use replenish_policy::{PolicyConfig, SharedPolicy};

use crate::engine::PredictionEngine;
use crate::result::{PredictionError, PredictionResult};
use crate::snapshot::ProductSnapshot;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),

    #[error("snapshot source returned invalid data: {0}")]
    InvalidData(String),
}

/// Source of product snapshots (inventory/sales read model).
///
/// Implementations materialize the full list in memory; the engine never calls
/// back into the source while a batch is running.
pub trait SnapshotProvider: Send + Sync {
    fn load(&self) -> Result<Vec<ProductSnapshot>, ProviderError>;
}

impl SnapshotProvider for Vec<ProductSnapshot> {
    fn load(&self) -> Result<Vec<ProductSnapshot>, ProviderError> {
        Ok(self.clone())
    }
}

/// How a batch is spread over threads.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Threads(NonZeroUsize),
}

impl Parallelism {
    /// One worker per available core (sequential if that cannot be determined).
    pub fn available() -> Self {
        thread::available_parallelism()
            .map(Parallelism::Threads)
            .unwrap_or(Parallelism::Sequential)
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::available()
    }
}

/// A product that could not be predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Position in the input list.
    pub index: usize,
    pub product_id: ProductId,
    pub error: PredictionError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub failed: usize,
}

impl UrgencySummary {
    fn record(&mut self, urgency: UrgencyLevel) {
        match urgency {
            UrgencyLevel::Critical => self.critical += 1,
            UrgencyLevel::High => self.high += 1,
            UrgencyLevel::Medium => self.medium += 1,
            UrgencyLevel::Low => self.low += 1,
        }
    }
}

/// Results of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub run_id: BatchRunId,
    pub as_of: NaiveDate,
    pub policy_version: u32,
    pub results: BTreeMap<ProductId, PredictionResult>,
    pub failures: Vec<BatchFailure>,
    pub summary: UrgencySummary,
}

impl BatchOutcome {
    /// Products needing immediate attention (input for alerting).
    pub fn critical(&self) -> impl Iterator<Item = &PredictionResult> {
        self.results
            .values()
            .filter(|r| r.urgency_level == UrgencyLevel::Critical)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a `PredictionEngine` across a product list.
#[derive(Debug, Clone)]
pub struct BatchPredictor {
    engine: PredictionEngine,
    parallelism: Parallelism,
}

impl BatchPredictor {
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self {
            engine: PredictionEngine::new(policy),
            parallelism: Parallelism::default(),
        }
    }

    /// Bind to the policy currently held by a hot-reload handle.
    ///
    /// Later reloads do not affect this predictor.
    pub fn from_shared(policy: &SharedPolicy) -> Self {
        Self::new(policy.current())
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Load snapshots once from `provider`, then predict them.
    pub fn run<P>(&self, provider: &P, as_of: NaiveDate) -> Result<BatchOutcome, ProviderError>
    where
        P: SnapshotProvider + ?Sized,
    {
        let snapshots = provider.load().inspect_err(|e| {
            warn!(error = %e, "failed to load product snapshots");
        })?;
        Ok(self.predict_batch(&snapshots, as_of))
    }

    /// Predict every snapshot. Per-item failures are collected, never propagated.
    ///
    /// The first occurrence of a product id wins; later ones are reported as
    /// `DuplicateProduct` failures.
    pub fn predict_batch(&self, snapshots: &[ProductSnapshot], as_of: NaiveDate) -> BatchOutcome {
        let run_id = BatchRunId::new();
        let outcomes = self.predict_all(snapshots, as_of);

        let mut results = BTreeMap::new();
        let mut failures = Vec::new();
        let mut summary = UrgencySummary::default();

        for (index, (snapshot, outcome)) in snapshots.iter().zip(outcomes).enumerate() {
            let outcome = outcome.and_then(|result| {
                if results.contains_key(&result.product_id) {
                    Err(PredictionError::DuplicateProduct(result.product_id))
                } else {
                    Ok(result)
                }
            });

            match outcome {
                Ok(result) => {
                    summary.record(result.urgency_level);
                    results.insert(result.product_id.clone(), result);
                }
                Err(error) => {
                    warn!(%run_id, index, product_id = %snapshot.product_id, error = %error, "product prediction failed");
                    summary.failed += 1;
                    failures.push(BatchFailure {
                        index,
                        product_id: snapshot.product_id.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            %run_id,
            %as_of,
            policy_version = self.engine.policy().version,
            products = snapshots.len(),
            succeeded = results.len(),
            failed = failures.len(),
            critical = summary.critical,
            "batch prediction finished"
        );

        BatchOutcome {
            run_id,
            as_of,
            policy_version: self.engine.policy().version,
            results,
            failures,
            summary,
        }
    }

    /// One outcome per snapshot, in input order.
    fn predict_all(
        &self,
        snapshots: &[ProductSnapshot],
        as_of: NaiveDate,
    ) -> Vec<Result<PredictionResult, PredictionError>> {
        let workers = match self.parallelism {
            Parallelism::Sequential => return snapshots.iter().map(|s| self.predict_one(s, as_of)).collect(),
            Parallelism::Threads(n) => n.get(),
        };

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| snapshots.par_iter().map(|s| self.predict_one(s, as_of)).collect()),
            Err(e) => {
                warn!(error = %e, workers, "could not build prediction pool; using the global pool");
                snapshots.par_iter().map(|s| self.predict_one(s, as_of)).collect()
            }
        }
    }

    /// A panic while predicting one product fails that product only.
    fn predict_one(&self, snapshot: &ProductSnapshot, as_of: NaiveDate) -> Result<PredictionResult, PredictionError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.engine.predict(snapshot, as_of))).unwrap_or_else(|_| {
            warn!(product_id = %snapshot.product_id, "prediction panicked");
            Err(PredictionError::Internal("prediction panicked".to_string()))
        })
    }
}
