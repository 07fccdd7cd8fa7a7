//! Total lookup functions over `PolicyConfig`.

use replenish_core::UrgencyLevel;

use crate::config::{ORDER_FREQUENCY_BANDS, ORDER_FREQUENCY_FALLBACK_DAYS, PolicyConfig};

impl PolicyConfig {
    /// Minimum order value for a supplier; unknown suppliers get the default.
    pub fn min_order_value(&self, supplier_name: &str) -> f64 {
        self.min_order_value_by_supplier
            .get(supplier_name)
            .copied()
            .unwrap_or(self.min_order_value_default)
    }

    /// Coverage days for an urgency tier.
    pub fn coverage_days(&self, urgency: UrgencyLevel) -> u32 {
        let c = &self.coverage_days;
        match urgency {
            UrgencyLevel::Critical => c.critical,
            UrgencyLevel::High => c.high,
            UrgencyLevel::Medium => c.medium,
            UrgencyLevel::Low => c.low,
        }
    }

    pub fn default_coverage_days(&self) -> u32 {
        self.coverage_days.default
    }

    /// Safety-stock multiplier.
    ///
    /// High variability wins over any reliability score. A NaN reliability falls
    /// through to the unreliable tier.
    pub fn safety_stock_multiplier(&self, reliability_score: f64, variability: f64) -> f64 {
        let s = &self.safety_stock;
        if variability > s.high_variability_threshold {
            s.high_variability
        } else if reliability_score >= s.reliable_threshold {
            s.reliable
        } else if reliability_score >= s.average_threshold {
            s.average
        } else {
            s.unreliable
        }
    }

    /// Expected days between orders to a supplier, derived from how much of its
    /// catalogue one minimum-value order covers.
    ///
    /// Falls back to `order_frequency.default_days` when the catalogue size or
    /// the average product value is zero/unknown.
    pub fn estimate_order_frequency(
        &self,
        supplier_name: &str,
        avg_product_value: f64,
        total_products_count: u32,
    ) -> u32 {
        let bounds = &self.order_frequency;
        if total_products_count == 0 || !avg_product_value.is_finite() || avg_product_value <= 0.0 {
            return bounds.default_days;
        }

        let products_per_order = (self.min_order_value(supplier_name) / avg_product_value).ceil();
        let ratio = products_per_order / f64::from(total_products_count);

        let days = ORDER_FREQUENCY_BANDS
            .iter()
            .find(|(above, _)| ratio > *above)
            .map(|(_, days)| *days)
            .unwrap_or(ORDER_FREQUENCY_FALLBACK_DAYS);

        days.clamp(bounds.min_days, bounds.max_days.max(bounds.min_days))
    }
}
