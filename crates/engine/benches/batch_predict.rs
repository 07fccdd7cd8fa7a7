use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use replenish_engine::{
    BatchPredictor, Parallelism, PolicyConfig, PredictionEngine, ProductId, ProductSnapshot, SupplierId, SupplierInfo,
    Trend,
};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Deterministic catalogue mixing every coverage strategy and urgency tier.
fn catalogue(n: usize) -> Vec<ProductSnapshot> {
    (0..n)
        .map(|i| {
            let id = ProductId::parse(format!("SKU-{i:06}")).unwrap();
            let mut snapshot = ProductSnapshot::new(id, format!("Item {i}"), (i % 97) as f64, (i % 13) as f64 * 0.75)
                .with_variability((i % 10) as f64 / 10.0)
                .with_lead_time_days((i % 6) as u32)
                .with_trend(match i % 4 {
                    0 => Trend::Stable,
                    1 => Trend::Growing,
                    2 => Trend::Declining,
                    _ => Trend::Volatile,
                });
            if i % 3 != 0 {
                let mut supplier = SupplierInfo::new(
                    SupplierId::parse(format!("SUP-{}", i % 25)).unwrap(),
                    format!("Supplier {}", i % 25),
                    (i % 101) as f64,
                )
                .with_catalogue(12.5, 40 + (i % 200) as u32);
                if i % 2 == 0 {
                    supplier = supplier.with_cadence_days(7 + (i % 21) as u32);
                }
                snapshot = snapshot.with_supplier(supplier);
            }
            snapshot
        })
        .collect()
}

fn bench_single_predict(c: &mut Criterion) {
    let engine = PredictionEngine::new(Arc::new(PolicyConfig::default()));
    let products = catalogue(64);

    c.bench_function("predict_single", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let product = &products[i % products.len()];
            i += 1;
            black_box(engine.predict(black_box(product), as_of()))
        });
    });
}

fn bench_batch(c: &mut Criterion) {
    let policy = Arc::new(PolicyConfig::default());
    let workers = std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);

    let mut group = c.benchmark_group("predict_batch");
    for size in [100usize, 1_000, 10_000] {
        let products = catalogue(size);
        group.throughput(Throughput::Elements(size as u64));

        let sequential = BatchPredictor::new(Arc::clone(&policy)).with_parallelism(Parallelism::Sequential);
        group.bench_with_input(BenchmarkId::new("sequential", size), &products, |b, products| {
            b.iter(|| black_box(sequential.predict_batch(products, as_of())));
        });

        let threaded = BatchPredictor::new(Arc::clone(&policy)).with_parallelism(Parallelism::Threads(workers));
        group.bench_with_input(BenchmarkId::new("threaded", size), &products, |b, products| {
            b.iter(|| black_box(threaded.predict_batch(products, as_of())));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_predict, bench_batch);
criterion_main!(benches);
