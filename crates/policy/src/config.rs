//! Policy data: named constants, the `PolicyConfig` value and its validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use replenish_core::{DomainError, DomainResult};

/// Minimum order value applied when a supplier has no override.
pub const DEFAULT_MIN_ORDER_VALUE: f64 = 500.0;

/// Coverage days per urgency tier. Lead time plus a buffer is already baked in.
pub const COVERAGE_DAYS_CRITICAL: u32 = 5;
pub const COVERAGE_DAYS_HIGH: u32 = 7;
pub const COVERAGE_DAYS_MEDIUM: u32 = 10;
pub const COVERAGE_DAYS_LOW: u32 = 13;
pub const COVERAGE_DAYS_DEFAULT: u32 = 7;

/// Share of the observed supplier cadence added on top of cadence-based coverage.
pub const CADENCE_BUFFER_RATIO: f64 = 0.5;

/// Demand horizon used to size safety stock, independent of the actual lead time.
pub const SAFETY_STOCK_BASE_HORIZON_DAYS: u32 = 14;

pub const SAFETY_MULTIPLIER_RELIABLE: f64 = 0.3;
pub const SAFETY_MULTIPLIER_AVERAGE: f64 = 0.5;
pub const SAFETY_MULTIPLIER_UNRELIABLE: f64 = 0.8;
pub const SAFETY_MULTIPLIER_HIGH_VARIABILITY: f64 = 1.0;

pub const RELIABLE_SCORE_THRESHOLD: f64 = 80.0;
pub const AVERAGE_SCORE_THRESHOLD: f64 = 50.0;
pub const HIGH_VARIABILITY_THRESHOLD: f64 = 0.8;

/// Reliability assumed for products without supplier information.
pub const UNKNOWN_SUPPLIER_RELIABILITY: f64 = 50.0;

pub const ORDER_FREQUENCY_MIN_DAYS: u32 = 7;
pub const ORDER_FREQUENCY_MAX_DAYS: u32 = 60;
pub const ORDER_FREQUENCY_DEFAULT_DAYS: u32 = 30;
pub const ORDER_FREQUENCY_LOOKBACK_MONTHS: u32 = 6;

/// Order-frequency bands: `(ratio strictly above, days)`, checked top to bottom.
///
/// The ratio is "products one minimum-value order covers" / "products the supplier carries".
pub const ORDER_FREQUENCY_BANDS: [(f64, u32); 3] = [(0.5, 21), (0.3, 30), (0.15, 45)];

/// Frequency used when no band matches.
pub const ORDER_FREQUENCY_FALLBACK_DAYS: u32 = 60;

/// Coverage days per urgency tier, plus the tier-less default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageDays {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub default: u32,
}

impl Default for CoverageDays {
    fn default() -> Self {
        Self {
            critical: COVERAGE_DAYS_CRITICAL,
            high: COVERAGE_DAYS_HIGH,
            medium: COVERAGE_DAYS_MEDIUM,
            low: COVERAGE_DAYS_LOW,
            default: COVERAGE_DAYS_DEFAULT,
        }
    }
}

/// Safety-stock sizing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyStockRules {
    pub reliable: f64,
    pub average: f64,
    pub unreliable: f64,
    pub high_variability: f64,
    pub reliable_threshold: f64,
    pub average_threshold: f64,
    pub high_variability_threshold: f64,
    pub base_horizon_days: u32,
    pub unknown_supplier_reliability: f64,
}

impl Default for SafetyStockRules {
    fn default() -> Self {
        Self {
            reliable: SAFETY_MULTIPLIER_RELIABLE,
            average: SAFETY_MULTIPLIER_AVERAGE,
            unreliable: SAFETY_MULTIPLIER_UNRELIABLE,
            high_variability: SAFETY_MULTIPLIER_HIGH_VARIABILITY,
            reliable_threshold: RELIABLE_SCORE_THRESHOLD,
            average_threshold: AVERAGE_SCORE_THRESHOLD,
            high_variability_threshold: HIGH_VARIABILITY_THRESHOLD,
            base_horizon_days: SAFETY_STOCK_BASE_HORIZON_DAYS,
            unknown_supplier_reliability: UNKNOWN_SUPPLIER_RELIABILITY,
        }
    }
}

/// Bounds on how often a supplier is expected to be ordered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFrequencyBounds {
    pub min_days: u32,
    pub max_days: u32,
    pub default_days: u32,
    /// History window the upstream provider uses when observing cadence.
    pub lookback_months: u32,
}

impl Default for OrderFrequencyBounds {
    fn default() -> Self {
        Self {
            min_days: ORDER_FREQUENCY_MIN_DAYS,
            max_days: ORDER_FREQUENCY_MAX_DAYS,
            default_days: ORDER_FREQUENCY_DEFAULT_DAYS,
            lookback_months: ORDER_FREQUENCY_LOOKBACK_MONTHS,
        }
    }
}

/// Replenishment policy.
///
/// Treat an instance as immutable for the duration of a computation; build a new
/// one (or swap it through `SharedPolicy`) to change rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub version: u32,
    pub min_order_value_default: f64,
    /// Supplier name -> minimum order value override.
    pub min_order_value_by_supplier: BTreeMap<String, f64>,
    pub coverage_days: CoverageDays,
    pub cadence_buffer_ratio: f64,
    pub safety_stock: SafetyStockRules,
    pub order_frequency: OrderFrequencyBounds,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            version: 1,
            min_order_value_default: DEFAULT_MIN_ORDER_VALUE,
            min_order_value_by_supplier: BTreeMap::new(),
            coverage_days: CoverageDays::default(),
            cadence_buffer_ratio: CADENCE_BUFFER_RATIO,
            safety_stock: SafetyStockRules::default(),
            order_frequency: OrderFrequencyBounds::default(),
        }
    }
}

impl PolicyConfig {
    pub fn with_supplier_min_order_value(mut self, supplier: impl Into<String>, value: f64) -> Self {
        self.min_order_value_by_supplier.insert(supplier.into(), value);
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Check the rules are internally consistent.
    ///
    /// The multiplier ordering is what keeps safety stock monotonic in both
    /// variability and reliability.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_non_negative("min_order_value_default", self.min_order_value_default)?;
        for (supplier, value) in &self.min_order_value_by_supplier {
            ensure_non_negative(&format!("min_order_value_by_supplier[{supplier}]"), *value)?;
        }

        let c = &self.coverage_days;
        for (name, days) in [
            ("critical", c.critical),
            ("high", c.high),
            ("medium", c.medium),
            ("low", c.low),
            ("default", c.default),
        ] {
            if days == 0 {
                return Err(DomainError::validation(format!(
                    "coverage_days.{name} must be greater than zero"
                )));
            }
        }
        ensure_non_negative("cadence_buffer_ratio", self.cadence_buffer_ratio)?;

        let s = &self.safety_stock;
        ensure_non_negative("safety_stock.reliable", s.reliable)?;
        ensure_non_negative("safety_stock.average", s.average)?;
        ensure_non_negative("safety_stock.unreliable", s.unreliable)?;
        ensure_non_negative("safety_stock.high_variability", s.high_variability)?;
        if !(s.reliable <= s.average && s.average <= s.unreliable && s.unreliable <= s.high_variability) {
            return Err(DomainError::invariant(
                "safety stock multipliers must satisfy reliable <= average <= unreliable <= high_variability",
            ));
        }
        ensure_in_range("safety_stock.reliable_threshold", s.reliable_threshold, 0.0, 100.0)?;
        ensure_in_range("safety_stock.average_threshold", s.average_threshold, 0.0, 100.0)?;
        if s.average_threshold > s.reliable_threshold {
            return Err(DomainError::invariant(
                "safety_stock.average_threshold cannot exceed reliable_threshold",
            ));
        }
        ensure_in_range(
            "safety_stock.high_variability_threshold",
            s.high_variability_threshold,
            0.0,
            1.0,
        )?;
        ensure_in_range(
            "safety_stock.unknown_supplier_reliability",
            s.unknown_supplier_reliability,
            0.0,
            100.0,
        )?;

        let f = &self.order_frequency;
        if f.min_days == 0 {
            return Err(DomainError::validation("order_frequency.min_days must be greater than zero"));
        }
        if f.min_days > f.max_days {
            return Err(DomainError::invariant("order_frequency.min_days exceeds max_days"));
        }
        if f.default_days < f.min_days || f.default_days > f.max_days {
            return Err(DomainError::invariant(
                "order_frequency.default_days must lie within [min_days, max_days]",
            ));
        }

        Ok(())
    }
}

fn ensure_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a finite non-negative number (got {value})"
        )));
    }
    Ok(())
}

fn ensure_in_range(field: &str, value: f64, lo: f64, hi: f64) -> DomainResult<()> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(DomainError::validation(format!(
            "{field} must lie within [{lo}, {hi}] (got {value})"
        )));
    }
    Ok(())
}
