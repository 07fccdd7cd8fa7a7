//! Input records supplied by the upstream inventory/sales provider.

use serde::{Deserialize, Serialize};
use tracing::warn;

use replenish_core::{ProductId, SupplierId, UrgencyLevel};

use crate::result::{InputWarning, PredictionError};

/// Upper bound on a usable demand rate, in units per day.
///
/// Keeps every derived quantity (rate × horizon days × 7) finite.
pub const MAX_DAILY_SALES: f64 = 1.0e9;

/// Observed sales trend for a product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Stable,
    Declining,
    Volatile,
    Growing,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Stable => "stable",
            Trend::Declining => "declining",
            Trend::Volatile => "volatile",
            Trend::Growing => "growing",
        }
    }
}

/// Supplier facts joined onto a product by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInfo {
    pub id: SupplierId,
    pub name: String,
    pub lead_time_days: u32,
    /// Observed real interval between orders, when there is enough history.
    #[serde(default)]
    pub cadence_days: Option<u32>,
    /// 0–100.
    pub reliability_score: f64,
    #[serde(default)]
    pub avg_product_value: Option<f64>,
    #[serde(default)]
    pub total_products_count: Option<u32>,
}

impl SupplierInfo {
    pub fn new(id: SupplierId, name: impl Into<String>, reliability_score: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lead_time_days: 0,
            cadence_days: None,
            reliability_score,
            avg_product_value: None,
            total_products_count: None,
        }
    }

    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_cadence_days(mut self, days: u32) -> Self {
        self.cadence_days = Some(days);
        self
    }

    pub fn with_catalogue(mut self, avg_product_value: f64, total_products_count: u32) -> Self {
        self.avg_product_value = Some(avg_product_value);
        self.total_products_count = Some(total_products_count);
        self
    }

    /// Cadence usable for planning (a zero-day cadence carries no information).
    pub fn observed_cadence(&self) -> Option<u32> {
        self.cadence_days.filter(|days| *days > 0)
    }
}

/// Point-in-time view of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub name: String,
    /// On hand, already including quantities on order.
    pub current_stock: f64,
    pub avg_daily_sales: f64,
    /// Coefficient of variation of daily demand, 0–1.
    pub variability: f64,
    pub lead_time_days: u32,
    #[serde(default)]
    pub trend: Trend,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub supplier: Option<SupplierInfo>,
    /// Externally decided urgency; replaces the computed tier when present.
    #[serde(default)]
    pub urgency_level: Option<UrgencyLevel>,
}

impl ProductSnapshot {
    pub fn new(product_id: ProductId, name: impl Into<String>, current_stock: f64, avg_daily_sales: f64) -> Self {
        Self {
            product_id,
            name: name.into(),
            current_stock,
            avg_daily_sales,
            variability: 0.0,
            lead_time_days: 0,
            trend: Trend::Stable,
            category: String::new(),
            unit_price: None,
            supplier: None,
            urgency_level: None,
        }
    }

    pub fn with_variability(mut self, variability: f64) -> Self {
        self.variability = variability;
        self
    }

    pub fn with_lead_time_days(mut self, days: u32) -> Self {
        self.lead_time_days = days;
        self
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = Some(price);
        self
    }

    pub fn with_supplier(mut self, supplier: SupplierInfo) -> Self {
        self.supplier = Some(supplier);
        self
    }

    pub fn with_urgency_override(mut self, urgency: UrgencyLevel) -> Self {
        self.urgency_level = Some(urgency);
        self
    }

    /// Return a copy safe to compute on.
    ///
    /// Non-finite numbers and blank ids are rejected. Finite values outside their
    /// domain (including demand above `MAX_DAILY_SALES`) are clamped and reported
    /// as warnings.
    pub fn sanitized(&self) -> Result<(ProductSnapshot, Vec<InputWarning>), PredictionError> {
        if self.product_id.is_blank() {
            return Err(PredictionError::InvalidId("product_id is blank".to_string()));
        }

        let mut clean = self.clone();
        let mut warnings = Vec::new();

        clean.current_stock = clamp_field(&self.product_id, "current_stock", self.current_stock, 0.0, f64::MAX, &mut warnings)?;
        clean.avg_daily_sales =
            clamp_field(&self.product_id, "avg_daily_sales", self.avg_daily_sales, 0.0, MAX_DAILY_SALES, &mut warnings)?;
        clean.variability = clamp_field(&self.product_id, "variability", self.variability, 0.0, 1.0, &mut warnings)?;

        if let Some(price) = self.unit_price {
            if !price.is_finite() || price < 0.0 {
                warn!(product_id = %self.product_id, field = "unit_price", value = price, "ignoring unusable unit price");
                warnings.push(InputWarning::dropped("unit_price", price));
                clean.unit_price = None;
            }
        }

        if let Some(supplier) = clean.supplier.as_mut() {
            supplier.reliability_score = clamp_field(
                &self.product_id,
                "supplier.reliability_score",
                supplier.reliability_score,
                0.0,
                100.0,
                &mut warnings,
            )?;
        }

        Ok((clean, warnings))
    }
}

fn clamp_field(
    product_id: &ProductId,
    field: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    warnings: &mut Vec<InputWarning>,
) -> Result<f64, PredictionError> {
    if !value.is_finite() {
        return Err(PredictionError::MalformedInput {
            field: field.to_string(),
            reason: format!("expected a finite number, got {value}"),
        });
    }
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        warn!(%product_id, field, value, clamped, "clamped out-of-range input");
        warnings.push(InputWarning::clamped(field, value, clamped));
    }
    Ok(clamped)
}
