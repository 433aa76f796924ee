//! Benchmarks for the z-sweep.
//!
//! Run with: `cargo bench --bench z_sweep_bench`
//!
//! Compares the serial and parallel contexts on the benchmark problem classes,
//! and measures the single-line elimination kernel on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sp_rs::storage::IDENTITY_ROW;
use sp_rs::sweep::{build_line, solve_system, SerialContext, ZSweep};
use sp_rs::{
    CoefficientSystems, Extents, FieldStore, FlowState, ProblemClass, SweepConstants, SystemKind,
};

/// A flow field with smooth variation along every axis.
fn setup_fields(ext: Extents) -> FieldStore {
    let mut fields = FieldStore::new(ext);
    for line in ext.lines() {
        let (i, j) = ext.line_coords(line);
        for k in 0..ext.n_rows() {
            let phase = 0.1 * (i + 2 * j + 3 * k) as f64;
            fields.primitives.set_cell(
                line,
                k,
                FlowState {
                    rho: 1.0 + 0.1 * phase.sin(),
                    u: 0.2 * phase.cos(),
                    v: 0.1 * phase.sin(),
                    w: 0.3 * (0.5 * phase).cos(),
                    speed: 1.2 + 0.05 * phase.sin(),
                },
            );
        }
    }
    fields.set_residual_from(|i, j, k| {
        let phase = 0.05 * (i + j + k) as f64;
        [phase.sin(), phase.cos(), 0.5, -phase, 1.0]
    });
    fields
}

/// Benchmark a full sweep per problem class and context.
fn bench_z_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("z_sweep");
    group.sample_size(20);

    for class in [ProblemClass::S, ProblemClass::W, ProblemClass::A] {
        let (nx2, ny2, nz2) = class.interior();
        let ext = Extents::new(nx2, ny2, nz2).unwrap();
        let constants = SweepConstants::for_class(class);
        let fields = setup_fields(ext);
        let mut systems = CoefficientSystems::new(&ext);
        let label = format!("{:?}", class);

        let mut serial = ZSweep::new(ext, SerialContext, SerialContext);
        group.bench_with_input(BenchmarkId::new("serial", &label), &ext, |b, _| {
            b.iter_batched_ref(
                || fields.clone(),
                |f| serial.run(f, &mut systems, black_box(&constants)).unwrap(),
                criterion::BatchSize::LargeInput,
            )
        });

        #[cfg(feature = "parallel")]
        {
            use sp_rs::ParallelContext;

            let mut parallel = ZSweep::new(ext, ParallelContext, ParallelContext);
            group.bench_with_input(BenchmarkId::new("parallel", &label), &ext, |b, _| {
                b.iter_batched_ref(
                    || fields.clone(),
                    |f| parallel.run(f, &mut systems, black_box(&constants)).unwrap(),
                    criterion::BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

/// Benchmark the build and elimination of a single line.
fn bench_single_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_line");

    for nz2 in [10, 34, 62, 160] {
        let ext = Extents::new(1, 1, nz2).unwrap();
        let constants = SweepConstants::derive(nz2 + 2, 0.001).unwrap();
        let fields = setup_fields(ext);
        let line = ext.line_index(1, 1);
        let snap = fields.primitives.line(line);
        let rhs0 = fields.line_residual(line).to_vec();

        group.bench_with_input(BenchmarkId::new("build_solve", nz2), &nz2, |b, _| {
            let mut base = vec![IDENTITY_ROW; ext.n_rows()];
            let mut plus = base.clone();
            let mut minus = base.clone();
            let mut rhs = rhs0.clone();
            b.iter(|| {
                rhs.copy_from_slice(&rhs0);
                build_line(&snap, &mut base, &mut plus, &mut minus, &constants);
                solve_system(&mut base, &mut rhs, SystemKind::Base).unwrap();
                solve_system(&mut plus, &mut rhs, SystemKind::PlusAcoustic).unwrap();
                solve_system(&mut minus, &mut rhs, SystemKind::MinusAcoustic).unwrap();
                black_box(rhs[1])
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_z_sweep, bench_single_line);
criterion_main!(benches);
