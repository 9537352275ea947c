use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

use haven::availability::{self, resolve};
use haven::config::Config;
use haven::{Charges, CreateOptions, Database, Lifecycle, Reservation, ReservationCode, StayRange};

const BOOKING_COUNTS: &[u64] = &[10, 100, 1000];

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Days::new(offset)
}

fn stay(start: u64, nights: u64) -> StayRange {
    StayRange::new(day(start), day(start + nights)).unwrap()
}

/// Back-to-back two-night stays starting on day 0.
fn reservations(count: u64) -> Vec<Reservation> {
    (0..count)
        .map(|i| {
            Reservation::builder(
                ReservationCode::new(format!("HV-B{i:05}")).unwrap(),
                stay(i * 2, 2),
            )
            .build()
            .unwrap()
        })
        .collect()
}

fn populated(count: u64) -> Lifecycle {
    let mut lifecycle = Lifecycle::new(Database::open_in_memory().unwrap(), Config::default())
        .with_event_sink(haven::events::NullSink);
    for i in 0..count {
        lifecycle
            .create(CreateOptions::new(stay(i * 2, 2), Charges::nightly(Decimal::from(100))))
            .unwrap();
    }
    lifecycle
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for &count in BOOKING_COUNTS {
        let rows = reservations(count);
        let candidate = stay(count * 2, 3);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| resolve(black_box(&candidate), black_box(rows), &[], None));
        });
    }
    group.finish();
}

fn bench_locked_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_available");
    for &count in BOOKING_COUNTS {
        let mut db = Database::open_in_memory().unwrap();
        {
            let tx = db.begin_transaction().unwrap();
            for r in &reservations(count) {
                Database::insert_reservation(&tx, r).unwrap();
            }
            tx.commit().unwrap();
        }

        let candidate = stay(count, 3);
        group.bench_with_input(BenchmarkId::from_parameter(count), &candidate, |b, candidate| {
            b.iter(|| {
                let tx = db.begin_transaction().unwrap();
                let result = availability::is_available(&*tx, black_box(candidate), None).unwrap();
                drop(tx);
                result
            });
        });
    }
    group.finish();
}

fn bench_create(c: &mut Criterion) {
    c.bench_function("lifecycle_create", |b| {
        b.iter_batched(
            || populated(50),
            |mut lifecycle| {
                lifecycle
                    .create(CreateOptions::new(stay(500, 4), Charges::nightly(Decimal::from(100))))
                    .unwrap()
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_resolve, bench_locked_check, bench_create);
criterion_main!(benches);
