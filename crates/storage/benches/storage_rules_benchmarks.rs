use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use stowage_core::Weight;
use stowage_storage::{Priority, Product, StorageConstraints, apply_rules, apply_rules_to_records};

/// Deterministic product list; weights cycle so roughly half fit under the cap used below.
fn products(n: usize) -> Vec<Product> {
    (0..n)
        .map(|i| {
            let priority = match i % 4 {
                0 => Priority::High,
                1 => Priority::Medium,
                2 => Priority::Low,
                _ => Priority::parse("Unknown"),
            };
            Product::new(Weight::new(((i * 37) % 100) as f64).unwrap_or(Weight::ZERO))
                .with_priority(priority)
                .with_fragile(i % 3 == 0)
                .with_attribute("Product", json!(format!("Item {i}")))
        })
        .collect()
}

fn records(n: usize) -> Vec<Value> {
    products(n)
        .iter()
        .map(|p| serde_json::to_value(p).unwrap_or(Value::Null))
        .collect()
}

fn bench_apply_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_rules");
    let constraints = StorageConstraints::new()
        .with_priority_first(true)
        .with_fragile_on_top(true);

    for n in [100usize, 1_000, 10_000] {
        let input = products(n);
        let capped = constraints
            .with_max_storage_weight((n as f64) * 25.0)
            .unwrap_or(constraints);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("typed", n), &input, |b, input| {
            b.iter(|| apply_rules(black_box(input), black_box(&capped)))
        });
    }

    group.finish();
}

fn bench_apply_rules_to_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_rules_to_records");
    let constraints = json!({
        "max_storage_weight": 25_000,
        "priority_first": true,
        "fragile_on_top": true,
    });

    for n in [100usize, 1_000, 10_000] {
        let input = records(n);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("records", n), &input, |b, input| {
            b.iter(|| apply_rules_to_records(black_box(input), black_box(&constraints)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply_rules, bench_apply_rules_to_records);
criterion_main!(benches);
