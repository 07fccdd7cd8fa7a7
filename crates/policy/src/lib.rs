//! `replenish-policy`
//!
//! **Responsibility:** replenishment business rules as data.
//!
//! - `PolicyConfig` is an immutable value: callers pass it explicitly, there is no global.
//! - Every lookup is total (never panics, never divides by zero).
//! - Loading (JSON, file, `REPLENISH_*` overrides) and hot reload live in `loader`.

pub mod config;
pub mod loader;
pub mod lookup;

pub use config::{CoverageDays, OrderFrequencyBounds, PolicyConfig, SafetyStockRules};
pub use loader::{PolicyError, SharedPolicy, load_from_path};
