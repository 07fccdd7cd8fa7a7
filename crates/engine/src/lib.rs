//! `replenish-engine`
//!
//! **Responsibility:** turn product snapshots into replenishment predictions.
//!
//! This crate is a deterministic calculator:
//! - It performs no IO and never reads the system clock (`as_of` is injected).
//! - It never places orders; results are recommendations for an external orchestrator.
//! - One bad product never aborts a batch; failures are reported next to results.

pub mod batch;
pub mod classify;
pub mod coverage;
pub mod demand;
pub mod engine;
pub mod forecast;
pub mod reasoning;
pub mod result;
pub mod snapshot;

pub use batch::{BatchFailure, BatchOutcome, BatchPredictor, Parallelism, ProviderError, SnapshotProvider, UrgencySummary};
pub use classify::{StockStatus, classify_urgency};
pub use coverage::{CoveragePlan, CoverageStrategy};
pub use engine::{PredictionEngine, predict, predict_batch};
pub use forecast::{ForecastDay, weekly_forecast};
pub use result::{InputWarning, PredictionError, PredictionResult};
pub use snapshot::{ProductSnapshot, SupplierInfo, Trend};

pub use replenish_core::{ProductId, SupplierId, UrgencyLevel};
pub use replenish_policy::PolicyConfig;
