//! End-to-end scenarios through the public API: JSON policy + JSON snapshots in,
//! batch outcome out.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use replenish_engine::{
    BatchPredictor, CoverageStrategy, Parallelism, PolicyConfig, PredictionError, ProductId, ProductSnapshot,
    UrgencyLevel, predict, weekly_forecast,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn policy() -> Arc<PolicyConfig> {
    let policy = PolicyConfig::from_json_str(
        r#"{
            "version": 12,
            "min_order_value_by_supplier": { "Caseificio Rossi": 800.0 }
        }"#,
    )
    .unwrap();
    Arc::new(policy)
}

fn snapshots() -> Vec<ProductSnapshot> {
    serde_json::from_str(
        r#"[
            {
                "product_id": "MOZZ-1KG",
                "name": "Mozzarella 1kg",
                "current_stock": 10.0,
                "avg_daily_sales": 5.0,
                "variability": 0.2,
                "lead_time_days": 3,
                "trend": "stable",
                "category": "dairy",
                "unit_price": 6.4,
                "supplier": {
                    "id": "SUP-7",
                    "name": "Caseificio Rossi",
                    "lead_time_days": 3,
                    "reliability_score": 90.0
                }
            },
            {
                "product_id": "SAFFRON-5G",
                "name": "Saffron 5g",
                "current_stock": 40.0,
                "avg_daily_sales": 0.0,
                "variability": 0.1,
                "lead_time_days": 10,
                "trend": "declining"
            },
            {
                "product_id": "TOMATO-2KG",
                "name": "Tomato passata 2kg",
                "current_stock": 0.0,
                "avg_daily_sales": 8.0,
                "variability": 0.9,
                "lead_time_days": 2,
                "trend": "volatile"
            },
            {
                "product_id": "FLOUR-25KG",
                "name": "Flour 00 25kg",
                "current_stock": 64.0,
                "avg_daily_sales": 8.0,
                "variability": 0.4,
                "lead_time_days": 4,
                "trend": "growing",
                "supplier": {
                    "id": "SUP-2",
                    "name": "Molino Bianchi",
                    "lead_time_days": 4,
                    "cadence_days": 14,
                    "reliability_score": 60.0,
                    "avg_product_value": 20.0,
                    "total_products_count": 40
                }
            },
            {
                "product_id": "BROKEN",
                "name": "Broken row",
                "current_stock": -12.0,
                "avg_daily_sales": 3.0,
                "variability": 0.5,
                "lead_time_days": 1
            }
        ]"#,
    )
    .unwrap()
}

fn pid(s: &str) -> ProductId {
    ProductId::parse(s).unwrap()
}

#[test]
fn critical_scenario_matches_documented_numbers() {
    replenish_observability::init_for_tests();

    let outcome = BatchPredictor::new(policy()).predict_batch(&snapshots(), as_of());
    let mozz = &outcome.results[&pid("MOZZ-1KG")];

    assert_eq!(mozz.days_remaining, 2.0);
    assert_eq!(mozz.urgency_level, UrgencyLevel::Critical);
    assert_eq!(mozz.coverage.coverage_days, 5);
    assert_eq!(mozz.coverage.target_stock, 25.0);
    assert_eq!(mozz.recommended_quantity, 15);
    assert_eq!(mozz.safety_stock, 21);
    assert!(!mozz.coverage.adds_safety_stock);
    assert_eq!(mozz.estimated_order_value, Some(15.0 * 6.4));
}

#[test]
fn idle_and_empty_products_follow_the_sentinel_rules() {
    let outcome = BatchPredictor::new(policy()).predict_batch(&snapshots(), as_of());

    let saffron = &outcome.results[&pid("SAFFRON-5G")];
    assert_eq!(saffron.days_remaining, 999.0);
    assert_eq!(saffron.urgency_level, UrgencyLevel::Low);
    assert_eq!(saffron.recommended_quantity, 0);

    let tomato = &outcome.results[&pid("TOMATO-2KG")];
    assert_eq!(tomato.urgency_level, UrgencyLevel::Critical);
    assert!(tomato.recommended_quantity > 0);
    assert_eq!(tomato.confidence_score, 50);
}

#[test]
fn cadence_supplier_sizes_medium_urgency_order() {
    let outcome = BatchPredictor::new(policy()).predict_batch(&snapshots(), as_of());
    let flour = &outcome.results[&pid("FLOUR-25KG")];

    // 64 / 8 = 8 days of cover.
    assert_eq!(flour.urgency_level, UrgencyLevel::Medium);
    assert_eq!(
        flour.coverage.strategy,
        CoverageStrategy::CadenceBased {
            lead_time_days: 4,
            cadence_days: 14,
            buffer_days: 7
        }
    );
    // 8/day × 25 days = 200 target, 64 on hand.
    assert_eq!(flour.recommended_quantity, 136);
    // floor(8 - 4 - 1) = 3 days from now.
    assert_eq!(flour.recommended_order_date, as_of() + Days::new(3));
    assert_eq!(flour.next_stockout_date, as_of() + Days::new(8));
}

#[test]
fn negative_stock_is_clamped_and_reported() {
    let outcome = BatchPredictor::new(policy()).predict_batch(&snapshots(), as_of());
    let broken = &outcome.results[&pid("BROKEN")];

    assert_eq!(broken.warnings.len(), 1);
    assert_eq!(broken.warnings[0].field, "current_stock");
    assert_eq!(broken.urgency_level, UrgencyLevel::Critical);
    assert_eq!(broken.recommended_quantity, 15);
    assert!(outcome.is_clean());
    assert_eq!(outcome.policy_version, 12);
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let mut products = snapshots();
    products.push(ProductSnapshot::new(pid("NAN"), "nan", 1.0, f64::NAN));

    let sequential = BatchPredictor::new(policy())
        .with_parallelism(Parallelism::Sequential)
        .predict_batch(&products, as_of());
    let parallel = BatchPredictor::new(policy())
        .with_parallelism(Parallelism::Threads(NonZeroUsize::new(3).unwrap()))
        .predict_batch(&products, as_of());

    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.failures, parallel.failures);
    assert!(matches!(parallel.failures[0].error, PredictionError::MalformedInput { .. }));
    assert_eq!(parallel.critical().count(), 3);
}

#[test]
fn single_prediction_is_idempotent() {
    let products = snapshots();
    let product = &products[0];
    let a = predict(product, policy(), as_of()).unwrap();
    let b = predict(product, policy(), as_of()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.reasoning, b.reasoning);
}

#[test]
fn weekly_forecast_never_shows_negative_stock() {
    let days = weekly_forecast(100.0, 70.0, as_of());
    assert_eq!(days.len(), 7);
    assert_eq!(days[0].weekday, Weekday::Mon);
    assert!(days.iter().all(|d| d.expected_stock >= 0.0));

    let short = weekly_forecast(20.0, 70.0, as_of());
    assert!(short.iter().all(|d| d.expected_stock >= 0.0));
    assert_eq!(short[6].expected_stock, 0.0);
    for pair in short.windows(2) {
        assert_eq!(pair[1].date.num_days_from_ce() - pair[0].date.num_days_from_ce(), 1);
    }
}

#[test]
fn outcome_serializes_for_downstream_consumers() {
    let outcome = BatchPredictor::new(policy()).predict_batch(&snapshots(), as_of());
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["results"]["MOZZ-1KG"]["urgency_level"], "CRITICAL");
    assert_eq!(json["results"]["MOZZ-1KG"]["coverage"]["strategy"]["strategy"], "urgency_based");
    assert_eq!(json["results"]["MOZZ-1KG"]["weekly_forecast"].as_array().unwrap().len(), 7);
}
