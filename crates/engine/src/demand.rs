//! Demand-depletion arithmetic: runway, buffers, dates and confidence.
//!
//! Every function is total: divisions are guarded and date offsets are capped,
//! so no input produces NaN, infinity or a panic.

use chrono::{Days, NaiveDate};

use replenish_policy::PolicyConfig;

/// Days remaining reported when there is no observable depletion.
pub const NO_DEPLETION_DAYS: f64 = 999.0;

/// Largest day offset applied to `as_of` when deriving dates.
pub const MAX_HORIZON_DAYS: u64 = 999;

/// Days of stock left at the current rate; `NO_DEPLETION_DAYS` when the rate is zero.
pub fn days_remaining(current_stock: f64, avg_daily_sales: f64) -> f64 {
    if avg_daily_sales.is_nan() || avg_daily_sales <= 0.0 {
        return NO_DEPLETION_DAYS;
    }
    let days = current_stock.max(0.0) / avg_daily_sales;
    if days.is_finite() { days } else { NO_DEPLETION_DAYS }
}

/// Buffer against demand variability and supplier unreliability.
///
/// Sized over the policy's fixed base horizon (14 days by default); the actual
/// lead time is intentionally not part of the formula.
pub fn safety_stock(
    policy: &PolicyConfig,
    avg_daily_sales: f64,
    _lead_time_days: u32,
    variability: f64,
    reliability_score: f64,
) -> u64 {
    let multiplier = policy.safety_stock_multiplier(reliability_score, variability);
    let horizon = f64::from(policy.safety_stock.base_horizon_days);
    ceil_units(avg_daily_sales * horizon * multiplier)
}

/// Stock level at which a new order should be triggered. Reported only.
pub fn reorder_point(avg_daily_sales: f64, lead_time_days: u32, safety_stock: u64) -> u64 {
    ceil_units(avg_daily_sales * f64::from(lead_time_days) + safety_stock as f64)
}

/// Latest sensible date to place the next order.
///
/// Orders today once less than half the lead time is left; otherwise leaves a
/// one-day margin before the lead time would overlap the stockout.
pub fn recommended_order_date(as_of: NaiveDate, days_remaining: f64, lead_time_days: u32) -> NaiveDate {
    let lead = f64::from(lead_time_days);
    if days_remaining < lead * 0.5 {
        return as_of;
    }
    offset_date(as_of, days_remaining - lead - 1.0)
}

pub fn next_stockout_date(as_of: NaiveDate, days_remaining: f64) -> NaiveDate {
    offset_date(as_of, days_remaining)
}

/// Confidence in the prediction (0–100), driven by demand variability.
///
/// - below 0.3: 100 down to 90
/// - 0.3 to 0.8: linear 90 down to 70
/// - above 0.8: 50
pub fn confidence(variability: f64) -> u8 {
    let v = if variability.is_finite() { variability.clamp(0.0, 1.0) } else { 1.0 };
    let score = if v < 0.3 {
        100.0 - (v / 0.3) * 10.0
    } else if v <= 0.8 {
        90.0 - ((v - 0.3) / 0.5) * 20.0
    } else {
        50.0
    };
    score.round().clamp(0.0, 100.0) as u8
}

/// Round a quantity up to whole units, never below zero.
pub fn ceil_units(quantity: f64) -> u64 {
    if quantity.is_nan() || quantity <= 0.0 {
        return 0;
    }
    let units = quantity.ceil();
    if units >= u64::MAX as f64 { u64::MAX } else { units as u64 }
}

fn offset_date(as_of: NaiveDate, days: f64) -> NaiveDate {
    let offset = if days > 0.0 {
        (days.floor() as u64).min(MAX_HORIZON_DAYS)
    } else {
        0
    };
    as_of.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_remaining_uses_sentinel_without_demand() {
        assert_eq!(days_remaining(10.0, 5.0), 2.0);
        assert_eq!(days_remaining(10.0, 0.0), NO_DEPLETION_DAYS);
        assert_eq!(days_remaining(0.0, 0.0), NO_DEPLETION_DAYS);
        assert_eq!(days_remaining(10.0, f64::NAN), NO_DEPLETION_DAYS);
    }

    #[test]
    fn safety_stock_uses_fixed_horizon() {
        let policy = PolicyConfig::default();
        // 5/day × 14 days × 0.3 (reliable, low variability).
        assert_eq!(safety_stock(&policy, 5.0, 3, 0.2, 90.0), 21);
        // Lead time does not enter the formula.
        assert_eq!(safety_stock(&policy, 5.0, 30, 0.2, 90.0), 21);
        // High variability dominates reliability.
        assert_eq!(safety_stock(&policy, 5.0, 3, 0.9, 90.0), 70);
        assert_eq!(safety_stock(&policy, 0.0, 3, 0.9, 10.0), 0);
    }

    #[test]
    fn reorder_point_adds_lead_time_demand() {
        assert_eq!(reorder_point(5.0, 3, 21), 36);
        assert_eq!(reorder_point(0.5, 3, 0), 2);
    }

    #[test]
    fn order_date_is_today_when_runway_is_short() {
        let today = day(2026, 3, 2);
        assert_eq!(recommended_order_date(today, 1.0, 4), today);
    }

    #[test]
    fn order_date_leaves_a_day_before_lead_time() {
        let today = day(2026, 3, 2);
        // floor(12.5 - 3 - 1) = 8
        assert_eq!(recommended_order_date(today, 12.5, 3), day(2026, 3, 10));
        // max(0, floor(2 - 3 - 1)) = 0
        assert_eq!(recommended_order_date(today, 2.0, 3), today);
    }

    #[test]
    fn dates_are_capped_at_horizon() {
        let today = day(2026, 1, 1);
        let capped = today.checked_add_days(Days::new(MAX_HORIZON_DAYS)).unwrap();
        assert_eq!(next_stockout_date(today, 1.0e12), capped);
        assert_eq!(next_stockout_date(today, 2.7), day(2026, 1, 3));
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(confidence(0.0), 100);
        assert_eq!(confidence(0.15), 95);
        assert_eq!(confidence(0.3), 90);
        assert_eq!(confidence(0.55), 80);
        assert_eq!(confidence(0.8), 70);
        assert_eq!(confidence(0.81), 50);
        assert_eq!(confidence(f64::NAN), 50);
    }

    #[test]
    fn ceil_units_never_negative() {
        assert_eq!(ceil_units(-3.2), 0);
        assert_eq!(ceil_units(f64::NAN), 0);
        assert_eq!(ceil_units(0.0001), 1);
        assert_eq!(ceil_units(15.0), 15);
    }
}
