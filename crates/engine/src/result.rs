//! Prediction output and per-product error types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use replenish_core::{ProductId, UrgencyLevel};

use crate::classify::StockStatus;
use crate::coverage::CoveragePlan;
use crate::forecast::ForecastDay;

/// Replenishment prediction for one product.
///
/// This is a recommendation, not an order. It is recomputed every cycle and
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub product_id: ProductId,

    /// Days of stock left at the current demand rate (999 when there is no demand).
    pub days_remaining: f64,

    /// Tier used for planning (the external override when one was supplied).
    pub urgency_level: UrgencyLevel,

    /// Tier derived from `days_remaining` alone.
    pub computed_urgency: UrgencyLevel,

    pub stock_status: StockStatus,
    pub recommended_order_date: NaiveDate,
    pub recommended_quantity: u64,
    pub safety_stock: u64,
    pub reorder_point: u64,
    pub next_stockout_date: NaiveDate,

    /// 0–100.
    pub confidence_score: u8,

    /// The coverage window decision behind `recommended_quantity`.
    pub coverage: CoveragePlan,

    /// `recommended_quantity × unit_price`, when the price is known.
    pub estimated_order_value: Option<f64>,

    pub weekly_forecast: [ForecastDay; 7],

    /// Human-readable summary derived from the fields above.
    pub reasoning: String,

    /// Inputs that were clamped or ignored before computing.
    pub warnings: Vec<InputWarning>,
}

/// An input value that was adjusted before prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputWarning {
    pub field: String,
    pub original: f64,
    /// `None` when the value was dropped instead of clamped.
    pub adjusted: Option<f64>,
}

impl InputWarning {
    pub fn clamped(field: impl Into<String>, original: f64, adjusted: f64) -> Self {
        Self {
            field: field.into(),
            original,
            adjusted: Some(adjusted),
        }
    }

    pub fn dropped(field: impl Into<String>, original: f64) -> Self {
        Self {
            field: field.into(),
            original,
            adjusted: None,
        }
    }
}

/// Per-product prediction failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PredictionError {
    #[error("malformed input in {field}: {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("product {0} appears more than once in the batch")]
    DuplicateProduct(ProductId),

    #[error("internal error: {0}")]
    Internal(String),
}
