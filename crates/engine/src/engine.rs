use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use replenish_core::UrgencyLevel;
use replenish_policy::PolicyConfig;

use crate::batch::{BatchOutcome, BatchPredictor, Parallelism};
use crate::classify::{StockStatus, classify_urgency};
use crate::coverage::{CoveragePlan, CoverageStrategy};
use crate::demand;
use crate::forecast::weekly_forecast;
use crate::reasoning::{self, ReasoningFacts};
use crate::result::{PredictionError, PredictionResult};
use crate::snapshot::ProductSnapshot;

/// Stateless prediction engine bound to one policy snapshot.
///
/// Cloning is cheap (the policy is shared). Identical `(snapshot, as_of)` inputs
/// always produce identical results.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    policy: Arc<PolicyConfig>,
}

impl PredictionEngine {
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn days_remaining(&self, current_stock: f64, avg_daily_sales: f64) -> f64 {
        demand::days_remaining(current_stock, avg_daily_sales)
    }

    pub fn urgency(&self, days_remaining: f64, lead_time_days: u32) -> UrgencyLevel {
        classify_urgency(days_remaining, lead_time_days)
    }

    pub fn safety_stock(&self, avg_daily_sales: f64, lead_time_days: u32, variability: f64, reliability_score: f64) -> u64 {
        demand::safety_stock(&self.policy, avg_daily_sales, lead_time_days, variability, reliability_score)
    }

    pub fn reorder_point(&self, avg_daily_sales: f64, lead_time_days: u32, safety_stock: u64) -> u64 {
        demand::reorder_point(avg_daily_sales, lead_time_days, safety_stock)
    }

    /// Size an order for `product`; `urgency` may be unknown.
    ///
    /// The snapshot is expected to be sanitized (see `ProductSnapshot::sanitized`).
    pub fn optimal_order_quantity(&self, product: &ProductSnapshot, urgency: Option<UrgencyLevel>) -> (CoveragePlan, u64) {
        let strategy = CoverageStrategy::select(&self.policy, product, urgency);
        // Consumed only by the frequency-estimated window.
        let safety_stock = self.safety_stock(
            product.avg_daily_sales,
            product.lead_time_days,
            product.variability,
            self.reliability_of(product),
        );
        let plan = CoveragePlan::new(strategy, product.avg_daily_sales, safety_stock);
        let quantity = plan.order_quantity(product.current_stock);
        (plan, quantity)
    }

    /// Predict replenishment for one product as of `as_of`.
    pub fn predict(&self, snapshot: &ProductSnapshot, as_of: NaiveDate) -> Result<PredictionResult, PredictionError> {
        let (product, warnings) = snapshot.sanitized()?;

        let days_remaining = self.days_remaining(product.current_stock, product.avg_daily_sales);
        let computed_urgency = self.urgency(days_remaining, product.lead_time_days);
        let urgency_level = product.urgency_level.unwrap_or(computed_urgency);

        let safety_stock = self.safety_stock(
            product.avg_daily_sales,
            product.lead_time_days,
            product.variability,
            self.reliability_of(&product),
        );
        let (coverage, recommended_quantity) = self.optimal_order_quantity(&product, Some(urgency_level));

        let recommended_order_date = demand::recommended_order_date(as_of, days_remaining, product.lead_time_days);
        let next_stockout_date = demand::next_stockout_date(as_of, days_remaining);
        let weekly_forecast = weekly_forecast(product.current_stock, product.avg_daily_sales * 7.0, as_of);
        let confidence_score = demand::confidence(product.variability);
        let reorder_point = self.reorder_point(product.avg_daily_sales, product.lead_time_days, safety_stock);
        let stock_status = StockStatus::from_position(product.current_stock, product.avg_daily_sales, days_remaining);
        let estimated_order_value = product.unit_price.map(|price| price * recommended_quantity as f64);

        let reasoning = reasoning::compose(&ReasoningFacts {
            product_name: &product.name,
            stock_status,
            current_stock: product.current_stock,
            avg_daily_sales: product.avg_daily_sales,
            days_remaining,
            trend: product.trend,
            urgency: urgency_level,
            computed_urgency,
            coverage: &coverage,
            safety_stock,
            recommended_quantity,
            recommended_order_date,
        });

        debug!(
            product_id = %product.product_id,
            days_remaining,
            urgency = %urgency_level,
            strategy = coverage.strategy.describe(),
            coverage_days = coverage.coverage_days,
            recommended_quantity,
            "prediction computed"
        );

        Ok(PredictionResult {
            product_id: product.product_id,
            days_remaining,
            urgency_level,
            computed_urgency,
            stock_status,
            recommended_order_date,
            recommended_quantity,
            safety_stock,
            reorder_point,
            next_stockout_date,
            confidence_score,
            coverage,
            estimated_order_value,
            weekly_forecast,
            reasoning,
            warnings,
        })
    }

    fn reliability_of(&self, product: &ProductSnapshot) -> f64 {
        product
            .supplier
            .as_ref()
            .map(|s| s.reliability_score)
            .unwrap_or(self.policy.safety_stock.unknown_supplier_reliability)
    }
}

/// Predict one product with an explicit policy.
pub fn predict(
    snapshot: &ProductSnapshot,
    policy: Arc<PolicyConfig>,
    as_of: NaiveDate,
) -> Result<PredictionResult, PredictionError> {
    PredictionEngine::new(policy).predict(snapshot, as_of)
}

/// Sequentially predict a list of products, keyed by product id.
///
/// Failed products are reported in `failures`; the first occurrence of a
/// product id wins.
pub fn predict_batch(snapshots: &[ProductSnapshot], policy: Arc<PolicyConfig>, as_of: NaiveDate) -> BatchOutcome {
    BatchPredictor::new(policy)
        .with_parallelism(Parallelism::Sequential)
        .predict_batch(snapshots, as_of)
}
