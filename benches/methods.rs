//! Trial division against the incremental sieve.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cprimes::Method;

fn bench_first_n_primes(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_n_primes");

    for count in [100usize, 1_000, 5_000] {
        for method in Method::ALL {
            group.bench_with_input(BenchmarkId::new(method.label(), count), &count, |b, &count| {
                b.iter(|| method.generate(black_box(count)).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_first_n_primes);
criterion_main!(benches);
