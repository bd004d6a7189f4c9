//! Benchmarks for circuit evaluation and RK4 integration.
//!
//! Run with: cargo bench -p gpac-sim

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gpac_compile::{finalize, FinalizeOptions};
use gpac_ir::builtins;
use gpac_sim::{Rk4Driver, VectorField};

fn bench_vector_field_eval(c: &mut Criterion) {
    let mut exp = builtins::exp();
    finalize(&mut exp, FinalizeOptions::default()).unwrap();
    let field = VectorField::new(&exp).unwrap();

    c.bench_function("vector_field_eval_exp", |b| {
        b.iter(|| black_box(field.eval(&[1.0], 0.5).unwrap()));
    });
}

fn bench_rk4_over_fixed_interval(c: &mut Criterion) {
    let mut group = c.benchmark_group("rk4_exp");
    for steps in [100usize, 1_000, 10_000] {
        let dt = 1.0 / steps as f64;
        group.bench_with_input(BenchmarkId::from_parameter(steps), &dt, |b, &dt| {
            let mut exp = builtins::exp();
            finalize(&mut exp, FinalizeOptions::default()).unwrap();
            b.iter(|| {
                let driver = Rk4Driver::new(&exp, 0.0, 1.0, dt).unwrap();
                black_box(driver.run().unwrap());
            });
        });
    }
    group.finish();
}

fn bench_polynomial_field_eval(c: &mut Criterion) {
    let mut p = builtins::polynomial(&[1.0, -2.0, 0.5, 3.0, 1.0]);
    finalize(&mut p, FinalizeOptions::default()).unwrap();
    let field = VectorField::new(&p).unwrap();

    c.bench_function("vector_field_eval_polynomial_degree4", |b| {
        b.iter(|| black_box(field.eval(&[], 2.0).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_vector_field_eval,
    bench_rk4_over_fixed_interval,
    bench_polynomial_field_eval
);
criterion_main!(benches);
