//! Coverage-window selection: how many days of demand an order should cover.
//!
//! Strategies, in priority order:
//! 1. `CadenceBased`: the supplier has an observed order cadence and the product is
//!    MEDIUM/LOW urgency. Covers lead time + cadence + a share of the cadence.
//! 2. `UrgencyBased`: the urgency tier is known. Uses the policy's tier days.
//! 3. `FrequencyEstimated`: only supplier facts are known. Uses the estimated order
//!    frequency + lead time, and is the only strategy that adds safety stock on top.
//! 4. `Default`: nothing is known. Uses the policy default.

use serde::{Deserialize, Serialize};

use replenish_core::UrgencyLevel;
use replenish_policy::PolicyConfig;

use crate::demand::ceil_units;
use crate::snapshot::ProductSnapshot;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum CoverageStrategy {
    CadenceBased {
        lead_time_days: u32,
        cadence_days: u32,
        buffer_days: u32,
    },
    UrgencyBased {
        urgency: UrgencyLevel,
        tier_days: u32,
    },
    FrequencyEstimated {
        order_frequency_days: u32,
        lead_time_days: u32,
    },
    Default {
        days: u32,
    },
}

impl CoverageStrategy {
    pub fn select(policy: &PolicyConfig, product: &ProductSnapshot, urgency: Option<UrgencyLevel>) -> Self {
        let lead_time_days = product.lead_time_days;
        let supplier = product.supplier.as_ref();

        if let (Some(cadence_days), Some(level)) = (supplier.and_then(|s| s.observed_cadence()), urgency) {
            if level.allows_cadence_planning() {
                let buffer = ceil_units(f64::from(cadence_days) * policy.cadence_buffer_ratio);
                return CoverageStrategy::CadenceBased {
                    lead_time_days,
                    cadence_days,
                    buffer_days: u32::try_from(buffer).unwrap_or(u32::MAX),
                };
            }
        }

        if let Some(level) = urgency {
            return CoverageStrategy::UrgencyBased {
                urgency: level,
                tier_days: policy.coverage_days(level),
            };
        }

        if let Some(supplier) = supplier {
            let order_frequency_days = policy.estimate_order_frequency(
                &supplier.name,
                supplier.avg_product_value.unwrap_or(0.0),
                supplier.total_products_count.unwrap_or(0),
            );
            return CoverageStrategy::FrequencyEstimated {
                order_frequency_days,
                lead_time_days,
            };
        }

        CoverageStrategy::Default {
            days: policy.default_coverage_days(),
        }
    }

    pub fn coverage_days(&self) -> u32 {
        match *self {
            CoverageStrategy::CadenceBased {
                lead_time_days,
                cadence_days,
                buffer_days,
            } => lead_time_days.saturating_add(cadence_days).saturating_add(buffer_days),
            CoverageStrategy::UrgencyBased { tier_days, .. } => tier_days,
            CoverageStrategy::FrequencyEstimated {
                order_frequency_days,
                lead_time_days,
            } => order_frequency_days.saturating_add(lead_time_days),
            CoverageStrategy::Default { days } => days,
        }
    }

    /// Whether safety stock is added on top of the coverage window.
    ///
    /// Cadence and tier windows already carry a buffer; the estimated-frequency
    /// window does not.
    pub fn adds_safety_stock(&self) -> bool {
        matches!(self, CoverageStrategy::FrequencyEstimated { .. })
    }

    pub fn describe(&self) -> &'static str {
        match self {
            CoverageStrategy::CadenceBased { .. } => "supplier order cadence",
            CoverageStrategy::UrgencyBased { .. } => "urgency tier",
            CoverageStrategy::FrequencyEstimated { .. } => "estimated order frequency",
            CoverageStrategy::Default { .. } => "default policy window",
        }
    }
}

/// The sizing decision behind a recommended quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoveragePlan {
    pub strategy: CoverageStrategy,
    pub coverage_days: u32,
    pub adds_safety_stock: bool,
    /// Stock the order should bring the product up to.
    pub target_stock: f64,
}

impl CoveragePlan {
    pub fn new(strategy: CoverageStrategy, avg_daily_sales: f64, safety_stock: u64) -> Self {
        let coverage_days = strategy.coverage_days();
        let adds_safety_stock = strategy.adds_safety_stock();
        let mut target_stock = avg_daily_sales.max(0.0) * f64::from(coverage_days);
        if adds_safety_stock {
            target_stock += safety_stock as f64;
        }
        Self {
            strategy,
            coverage_days,
            adds_safety_stock,
            target_stock,
        }
    }

    /// Units to order. `current_stock` already includes quantities on order.
    pub fn order_quantity(&self, current_stock: f64) -> u64 {
        ceil_units(self.target_stock - current_stock.max(0.0))
    }
}
