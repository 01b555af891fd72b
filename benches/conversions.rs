//! Benchmarks for format conversions and the host sparse matrix-vector products

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use portsparse::{
    csr2ell, csr2ell_width, csr2hyb, csr_to_coo, csrmv, hybmv, CsrMatrix, EllMatrix, Handle,
    HostBackend, HostConfig, HybMatrix, HybPartition, MatDescr, Operation, ScalarArg,
};

/// Banded matrix with one dense row every `stride` rows
fn create_skewed_matrix(n: usize, stride: usize) -> CsrMatrix<f64> {
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    for i in 0..n {
        if i % stride == 0 {
            col_idx.extend((0..n as i32).step_by(4));
        } else {
            let lo = i.saturating_sub(2);
            let hi = (i + 3).min(n);
            col_idx.extend(lo as i32..hi as i32);
        }
        row_ptr.push(col_idx.len() as i32);
    }
    let values = vec![1.0; col_idx.len()];
    CsrMatrix::new(n, n, row_ptr, col_idx, values).unwrap()
}

fn bench_conversions(c: &mut Criterion) {
    let handle = Handle::<HostBackend>::create(HostConfig::default()).unwrap();
    let descr = MatDescr::create().unwrap();

    let mut group = c.benchmark_group("conversions");
    for &n in &[1_000usize, 10_000] {
        let a = create_skewed_matrix(n, 100);

        group.bench_with_input(BenchmarkId::new("csr_to_coo", n), &a, |b, a| {
            b.iter(|| black_box(csr_to_coo(&handle, &descr, a, &descr).unwrap()))
        });

        group.bench_with_input(BenchmarkId::new("csr2ell", n), &a, |b, a| {
            let width = csr2ell_width(&handle, a.n_rows, &descr, &a.row_ptr, &descr).unwrap();
            let mut ell = EllMatrix::with_width(a.n_rows, a.n_cols, width).unwrap();
            b.iter(|| csr2ell(&handle, &descr, a, &descr, black_box(&mut ell)).unwrap())
        });

        for partition in [HybPartition::Auto, HybPartition::Max] {
            let id = BenchmarkId::new(format!("csr2hyb_{:?}", partition), n);
            group.bench_with_input(id, &a, |b, a| {
                let mut hyb = HybMatrix::create().unwrap();
                b.iter(|| csr2hyb(&handle, &descr, a, black_box(&mut hyb), 0, partition).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_spmv(c: &mut Criterion) {
    let handle = Handle::<HostBackend>::create(HostConfig::default()).unwrap();
    let descr = MatDescr::create().unwrap();
    let n = 20_000;
    let a = create_skewed_matrix(n, 500);
    let x = vec![1.0; n];

    let mut hyb = HybMatrix::create().unwrap();
    csr2hyb(&handle, &descr, &a, &mut hyb, 0, HybPartition::Auto).unwrap();

    let mut group = c.benchmark_group("spmv");
    group.bench_function("csrmv", |b| {
        let mut y = vec![0.0; n];
        b.iter(|| {
            csrmv(
                &handle,
                Operation::NonTranspose,
                ScalarArg::Host(1.0),
                &descr,
                &a,
                &x,
                ScalarArg::Host(0.0),
                &mut y,
            )
            .unwrap();
            black_box(&y);
        })
    });
    group.bench_function("hybmv_auto", |b| {
        let mut y = vec![0.0; n];
        b.iter(|| {
            hybmv(
                &handle,
                Operation::NonTranspose,
                ScalarArg::Host(1.0),
                &descr,
                &hyb,
                &x,
                ScalarArg::Host(0.0),
                &mut y,
            )
            .unwrap();
            black_box(&y);
        })
    });
    group.finish();
}

criterion_group!(benches, bench_conversions, bench_spmv);
criterion_main!(benches);
