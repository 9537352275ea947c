use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use haven::{price, CancellationPolicy, Charges, PricingRules};

const NIGHTS: &[u32] = &[1, 7, 30, 365];

fn bench_price(c: &mut Criterion) {
    let rules = PricingRules::default();
    let charges = Charges {
        nightly_rate: dec!(137.45),
        cleaning_fee: dec!(60),
        pet_fee: dec!(25),
        tourist_tax: dec!(12.30),
    };

    let mut group = c.benchmark_group("price");
    for &nights in NIGHTS {
        group.bench_with_input(BenchmarkId::new("flexible", nights), &nights, |b, &n| {
            b.iter(|| {
                price(
                    black_box(&rules),
                    black_box(&charges),
                    n,
                    CancellationPolicy::Flexible,
                    Decimal::ZERO,
                )
            });
        });
        group.bench_with_input(BenchmarkId::new("non_refundable", nights), &nights, |b, &n| {
            b.iter(|| {
                price(
                    black_box(&rules),
                    black_box(&charges),
                    n,
                    CancellationPolicy::NonRefundable,
                    dec!(50),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_price);
criterion_main!(benches);
