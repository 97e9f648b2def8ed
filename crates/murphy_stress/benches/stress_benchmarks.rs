//! Criterion benchmarks for the shock-injection simulator.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use murphy_stress::simulate::{simulate, CancelToken, ShockModelParams};
use murphy_stress::StressConfig;

fn bench_simulate(c: &mut Criterion) {
    let params = ShockModelParams::new(0.0004, 0.012).unwrap();
    let mut group = c.benchmark_group("simulate");

    for n_simulations in [500usize, 2_000, 5_000] {
        let config = StressConfig::builder()
            .n_simulations(n_simulations)
            .n_days(252)
            .build()
            .unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(n_simulations),
            &config,
            |b, config| {
                b.iter(|| simulate(params, config, &CancelToken::new()).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_simulate);
criterion_main!(benches);
