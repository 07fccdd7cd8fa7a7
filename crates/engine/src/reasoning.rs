//! Plain-language explanation of a prediction.
//!
//! Derived from the structured decision fields; same facts always render the same text.

use chrono::NaiveDate;

use replenish_core::UrgencyLevel;

use crate::classify::StockStatus;
use crate::coverage::CoveragePlan;
use crate::demand::NO_DEPLETION_DAYS;
use crate::snapshot::Trend;

/// Facts an explanation is built from.
#[derive(Debug, Clone)]
pub struct ReasoningFacts<'a> {
    pub product_name: &'a str,
    pub stock_status: StockStatus,
    pub current_stock: f64,
    pub avg_daily_sales: f64,
    pub days_remaining: f64,
    pub trend: Trend,
    pub urgency: UrgencyLevel,
    pub computed_urgency: UrgencyLevel,
    pub coverage: &'a CoveragePlan,
    pub safety_stock: u64,
    pub recommended_quantity: u64,
    pub recommended_order_date: NaiveDate,
}

pub fn compose(facts: &ReasoningFacts<'_>) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(5);

    let runway = if facts.days_remaining >= NO_DEPLETION_DAYS {
        "no measurable depletion".to_string()
    } else {
        format!("{:.1} days of cover", facts.days_remaining)
    };
    parts.push(format!(
        "{} is {}: {:.0} units on hand, selling {:.1}/day ({runway}).",
        facts.product_name,
        facts.stock_status.describe(),
        facts.current_stock,
        facts.avg_daily_sales,
    ));

    parts.push(trend_sentence(facts.trend).to_string());

    if facts.urgency == facts.computed_urgency {
        parts.push(format!("Urgency {}.", facts.urgency));
    } else {
        parts.push(format!(
            "Urgency {} (set externally; computed {}).",
            facts.urgency, facts.computed_urgency
        ));
    }

    let window = if facts.coverage.adds_safety_stock {
        format!(
            "{} days plus {} units of safety stock",
            facts.coverage.coverage_days, facts.safety_stock
        )
    } else {
        format!("{} days", facts.coverage.coverage_days)
    };

    if facts.recommended_quantity == 0 {
        parts.push(format!(
            "No order needed: stock already covers the {} window ({window}).",
            facts.coverage.strategy.describe()
        ));
    } else {
        parts.push(format!(
            "Order {} units by {}, sized on the {} window ({window}).",
            facts.recommended_quantity,
            facts.recommended_order_date.format("%Y-%m-%d"),
            facts.coverage.strategy.describe()
        ));
    }

    parts.join(" ")
}

fn trend_sentence(trend: Trend) -> &'static str {
    match trend {
        Trend::Stable => "Sales are stable.",
        Trend::Declining => "Sales are declining; the order may run long.",
        Trend::Volatile => "Sales are volatile; watch for sudden spikes.",
        Trend::Growing => "Sales are growing; the order may run short.",
    }
}
