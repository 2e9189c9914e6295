use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knockoff_solver::{Formulation, ShrinkageSolver, SolverSettings};
use knockoff_types::GramMatrix;

/// AR(1) correlation matrix, rho^|i-j|
fn ar1(p: usize, rho: f64) -> GramMatrix {
    let rows: Vec<Vec<f64>> = (0..p)
        .map(|i| (0..p).map(|j| rho.powi((i as i32 - j as i32).abs())).collect())
        .collect();
    GramMatrix::from_rows(&rows).expect("AR(1) matrix is square")
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("shrinkage_sdp");
    group.sample_size(10);

    for p in [5, 10, 20] {
        let g = ar1(p, 0.5);
        for formulation in [Formulation::Block, Formulation::Compact] {
            let solver = ShrinkageSolver::with_settings(SolverSettings {
                formulation,
                ..SolverSettings::default()
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", formulation), p),
                &g,
                |b, g| b.iter(|| solver.solve(black_box(g)).expect("solve")),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
