use portsparse::{
    csr2ell, csr2ell_width, csr2hyb, csr_to_coo, csrmv, hybmv, reference_spmv, CsrMatrix,
    EllMatrix, Handle, HostBackend, HostConfig, HybMatrix, HybPartition, MatDescr, Operation,
    ScalarArg, SparseResult,
};

fn main() -> SparseResult<()> {
    print_banner();

    let handle = Handle::<HostBackend>::create(HostConfig::default())?;
    let descr = MatDescr::create()?;
    println!("Handle version: {}", handle.version());
    println!("Threads: {}", handle.backend().config().n_threads);

    // One long row and several short ones
    // [1 0 2 0 0 0]
    // [0 3 4 5 6 7]
    // [0 0 0 0 8 0]
    // [9 0 0 0 0 1]
    let a = CsrMatrix::new(
        4,
        6,
        vec![0, 2, 7, 8, 10],
        vec![0, 2, 1, 2, 3, 4, 5, 4, 0, 5],
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 1.0],
    )?;

    println!("\nMatrix A:");
    println!("{:?}", a);

    let coo = csr_to_coo(&handle, &descr, &a, &descr)?;
    println!("\nCOO rows: {:?}", coo.row_idx);

    let width = csr2ell_width(&handle, a.n_rows, &descr, &a.row_ptr, &descr)?;
    let mut ell = EllMatrix::with_width(a.n_rows, a.n_cols, width)?;
    csr2ell(&handle, &descr, &a, &descr, &mut ell)?;
    println!("\nELL width {} ({} stored of {} cells)", width, ell.nnz(), a.n_rows * width);

    let mut hyb = HybMatrix::create()?;
    csr2hyb(&handle, &descr, &a, &mut hyb, 0, HybPartition::Auto)?;
    println!(
        "HYB auto partition: ELL width {}, {} ELL entries, {} COO entries",
        hyb.ell_width()?,
        hyb.ell_nnz()?,
        hyb.coo_nnz()?
    );

    let x = vec![1.0; a.n_cols];
    let mut y_csr = vec![0.0; a.n_rows];
    let mut y_hyb = vec![0.0; a.n_rows];
    csrmv(
        &handle,
        Operation::NonTranspose,
        ScalarArg::Host(1.0),
        &descr,
        &a,
        &x,
        ScalarArg::Host(0.0),
        &mut y_csr,
    )?;
    hybmv(
        &handle,
        Operation::NonTranspose,
        ScalarArg::Host(1.0),
        &descr,
        &hyb,
        &x,
        ScalarArg::Host(0.0),
        &mut y_hyb,
    )?;
    let expected = reference_spmv(
        Operation::NonTranspose,
        1.0,
        &a,
        descr.index_base(),
        &x,
        0.0,
        &y_csr,
    )?;

    println!("\ncsrmv:     {:?}", y_csr);
    println!("hybmv:     {:?}", y_hyb);
    println!("reference: {:?}", expected);

    hyb.destroy()?;
    descr.destroy()?;
    handle.destroy()
}

fn print_banner() {
    println!("portsparse {}: portable sparse matrix layer", portsparse::VERSION);
}
