//! Seven-day sales/stock projection with a fixed weekly seasonality profile.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Share of a week's demand falling on each weekday, Monday first.
///
/// Friday is the delivery-heavy peak for restaurant customers; weekends are light.
/// The shares sum to 1.0.
pub const WEEKDAY_DEMAND_SHARE: [f64; 7] = [0.15, 0.14, 0.14, 0.16, 0.25, 0.10, 0.06];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub expected_sales: f64,
    /// Projected closing stock, floored at zero.
    pub expected_stock: f64,
}

pub fn demand_share(weekday: Weekday) -> f64 {
    WEEKDAY_DEMAND_SHARE[weekday.num_days_from_monday() as usize]
}

/// Project the next seven calendar days starting at `start` (inclusive).
///
/// Pure function of its arguments; negative or non-finite inputs count as zero.
pub fn weekly_forecast(current_stock: f64, avg_weekly_sales: f64, start: NaiveDate) -> [ForecastDay; 7] {
    let weekly = non_negative(avg_weekly_sales);
    let mut running = non_negative(current_stock);

    std::array::from_fn(|offset| {
        let date = start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(NaiveDate::MAX);
        let weekday = date.weekday();
        let expected_sales = weekly * demand_share(weekday);
        running -= expected_sales;

        ForecastDay {
            date,
            weekday,
            expected_sales,
            expected_stock: running.max(0.0),
        }
    })
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
