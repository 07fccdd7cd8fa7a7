//! Step-function classifications over days of stock remaining.

use serde::{Deserialize, Serialize};

use replenish_core::UrgencyLevel;

/// Upper bounds (inclusive) of each tier, in days remaining.
pub const CRITICAL_MAX_DAYS: f64 = 2.0;
pub const HIGH_MAX_DAYS: f64 = 5.0;
pub const MEDIUM_MAX_DAYS: f64 = 10.0;

/// Beyond this many days of stock a product is considered overstocked.
pub const OVERSTOCK_MIN_DAYS: f64 = 90.0;

/// Classify stockout urgency.
///
/// Tiers are fixed thresholds on `days_remaining`. The lead time is accepted but
/// does not shift the tiers.
pub fn classify_urgency(days_remaining: f64, _lead_time_days: u32) -> UrgencyLevel {
    if days_remaining <= CRITICAL_MAX_DAYS {
        UrgencyLevel::Critical
    } else if days_remaining <= HIGH_MAX_DAYS {
        UrgencyLevel::High
    } else if days_remaining <= MEDIUM_MAX_DAYS {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}

/// Coarse description of the stock position, used for explanations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    /// No observable demand, whatever is on hand.
    NoMovement,
    Low,
    Adequate,
    Overstocked,
}

impl StockStatus {
    pub fn from_position(current_stock: f64, avg_daily_sales: f64, days_remaining: f64) -> Self {
        if current_stock <= 0.0 {
            StockStatus::OutOfStock
        } else if avg_daily_sales <= 0.0 {
            StockStatus::NoMovement
        } else if days_remaining <= HIGH_MAX_DAYS {
            StockStatus::Low
        } else if days_remaining > OVERSTOCK_MIN_DAYS {
            StockStatus::Overstocked
        } else {
            StockStatus::Adequate
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out of stock",
            StockStatus::NoMovement => "not moving",
            StockStatus::Low => "running low",
            StockStatus::Adequate => "adequately stocked",
            StockStatus::Overstocked => "overstocked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgency_thresholds_are_inclusive() {
        assert_eq!(classify_urgency(-1.0, 3), UrgencyLevel::Critical);
        assert_eq!(classify_urgency(0.0, 3), UrgencyLevel::Critical);
        assert_eq!(classify_urgency(2.0, 3), UrgencyLevel::Critical);
        assert_eq!(classify_urgency(2.01, 3), UrgencyLevel::High);
        assert_eq!(classify_urgency(5.0, 3), UrgencyLevel::High);
        assert_eq!(classify_urgency(10.0, 3), UrgencyLevel::Medium);
        assert_eq!(classify_urgency(10.5, 3), UrgencyLevel::Low);
        assert_eq!(classify_urgency(999.0, 3), UrgencyLevel::Low);
    }

    #[test]
    fn stock_status_from_position() {
        assert_eq!(StockStatus::from_position(0.0, 4.0, 0.0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_position(50.0, 0.0, 999.0), StockStatus::NoMovement);
        assert_eq!(StockStatus::from_position(8.0, 4.0, 2.0), StockStatus::Low);
        assert_eq!(StockStatus::from_position(40.0, 4.0, 10.0), StockStatus::Adequate);
        assert_eq!(StockStatus::from_position(400.0, 4.0, 100.0), StockStatus::Overstocked);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: lead time never changes the urgency tier.
            #[test]
            fn urgency_ignores_lead_time(
                days in 0.0f64..1_000.0,
                lt1 in 0u32..120,
                lt2 in 0u32..120,
            ) {
                prop_assert_eq!(classify_urgency(days, lt1), classify_urgency(days, lt2));
            }

            /// Property: fewer days remaining is never less urgent.
            #[test]
            fn urgency_is_monotonic(a in 0.0f64..1_000.0, b in 0.0f64..1_000.0) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(classify_urgency(lo, 0) <= classify_urgency(hi, 0));
            }
        }
    }
}
