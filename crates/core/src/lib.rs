//! `replenish-core` — shared building blocks for the replenishment engine.
//!
//! This crate contains **pure** primitives (no IO, no clocks, no logging setup).

pub mod error;
pub mod id;
pub mod urgency;

pub use error::{DomainError, DomainResult};
pub use id::{BatchRunId, ProductId, SupplierId};
pub use urgency::UrgencyLevel;
