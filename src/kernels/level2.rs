//! Level-2 contracts: sparse matrix-vector products in every format

use log::trace;

use crate::descriptor::MatDescr;
use crate::error::{SparseError, SparseResult};
use crate::handle::{Handle, Queue};
use crate::kernels::{Backend, Scalar, ScalarArg};
use crate::matrix::config::Operation;
use crate::matrix::{CooMatrix, CsrMatrix, EllMatrix, HybMatrix};

/// Checks x and y against the shape of op(A)
fn check_vectors(op: Operation, n_rows: usize, n_cols: usize, x_len: usize, y_len: usize) -> SparseResult<()> {
    let (x_expected, y_expected) = if op.is_transposed() {
        (n_rows, n_cols)
    } else {
        (n_cols, n_rows)
    };
    if x_len != x_expected {
        return Err(SparseError::invalid(
            "x",
            format!("length {} but op(A) needs {}", x_len, x_expected),
        ));
    }
    if y_len != y_expected {
        return Err(SparseError::invalid(
            "y",
            format!("length {} but op(A) produces {}", y_len, y_expected),
        ));
    }
    Ok(())
}

/// Resolves alpha and beta under the handle's pointer mode
fn resolve_scalars<B: Backend, T: Scalar>(
    handle: &Handle<B>,
    queue: Queue,
    alpha: ScalarArg<'_, T>,
    beta: ScalarArg<'_, T>,
) -> SparseResult<(T, T)> {
    let mode = handle.pointer_mode();
    let alpha = alpha.resolve("alpha", mode, handle.backend(), queue)?;
    let beta = beta.resolve("beta", mode, handle.backend(), queue)?;
    Ok((alpha, beta))
}

/// `y := alpha * op(A) * x + beta * y` with `A` in CSR format
#[allow(clippy::too_many_arguments)]
pub fn csrmv<B, T>(
    handle: &Handle<B>,
    op: Operation,
    alpha: ScalarArg<'_, T>,
    descr: &MatDescr,
    a: &CsrMatrix<T>,
    x: &[T],
    beta: ScalarArg<'_, T>,
    y: &mut [T],
) -> SparseResult<()>
where
    B: Backend,
    T: Scalar,
{
    descr.ensure_general("csrmv")?;
    a.validate(descr.index_base())?;
    check_vectors(op, a.n_rows, a.n_cols, x.len(), y.len())?;

    let queue = handle.active_queue();
    let (alpha, beta) = resolve_scalars(handle, queue, alpha, beta)?;

    trace!(
        "csrmv: {}x{} nnz={} op={:?} on queue {}",
        a.n_rows,
        a.n_cols,
        a.nnz(),
        op,
        queue.id()
    );
    handle
        .backend()
        .csrmv(queue, op, alpha, descr, a, x, beta, y)
}

/// `y := alpha * op(A) * x + beta * y` with `A` in COO format
#[allow(clippy::too_many_arguments)]
pub fn coomv<B, T>(
    handle: &Handle<B>,
    op: Operation,
    alpha: ScalarArg<'_, T>,
    descr: &MatDescr,
    a: &CooMatrix<T>,
    x: &[T],
    beta: ScalarArg<'_, T>,
    y: &mut [T],
) -> SparseResult<()>
where
    B: Backend,
    T: Scalar,
{
    descr.ensure_general("coomv")?;
    a.validate(descr.index_base())?;
    check_vectors(op, a.n_rows, a.n_cols, x.len(), y.len())?;

    let queue = handle.active_queue();
    let (alpha, beta) = resolve_scalars(handle, queue, alpha, beta)?;

    trace!(
        "coomv: {}x{} nnz={} op={:?} on queue {}",
        a.n_rows,
        a.n_cols,
        a.nnz(),
        op,
        queue.id()
    );
    handle
        .backend()
        .coomv(queue, op, alpha, descr, a, x, beta, y)
}

/// `y := alpha * op(A) * x + beta * y` with `A` in ELL format
#[allow(clippy::too_many_arguments)]
pub fn ellmv<B, T>(
    handle: &Handle<B>,
    op: Operation,
    alpha: ScalarArg<'_, T>,
    descr: &MatDescr,
    a: &EllMatrix<T>,
    x: &[T],
    beta: ScalarArg<'_, T>,
    y: &mut [T],
) -> SparseResult<()>
where
    B: Backend,
    T: Scalar,
{
    descr.ensure_general("ellmv")?;
    a.validate(descr.index_base())?;
    check_vectors(op, a.n_rows, a.n_cols, x.len(), y.len())?;

    let queue = handle.active_queue();
    let (alpha, beta) = resolve_scalars(handle, queue, alpha, beta)?;

    trace!(
        "ellmv: {}x{} width={} op={:?} on queue {}",
        a.n_rows,
        a.n_cols,
        a.width,
        op,
        queue.id()
    );
    handle
        .backend()
        .ellmv(queue, op, alpha, descr, a, x, beta, y)
}

/// `y := alpha * op(A) * x + beta * y` with `A` in HYB format
///
/// Fails with `NotInitialized` if `a` has not been populated by csr2hyb.
#[allow(clippy::too_many_arguments)]
pub fn hybmv<B, T>(
    handle: &Handle<B>,
    op: Operation,
    alpha: ScalarArg<'_, T>,
    descr: &MatDescr,
    a: &HybMatrix<T>,
    x: &[T],
    beta: ScalarArg<'_, T>,
    y: &mut [T],
) -> SparseResult<()>
where
    B: Backend,
    T: Scalar,
{
    descr.ensure_general("hybmv")?;
    let base = descr.index_base();
    a.ell()?.validate(base)?;
    a.coo()?.validate(base)?;
    let (n_rows, n_cols) = a.shape()?;
    check_vectors(op, n_rows, n_cols, x.len(), y.len())?;

    let queue = handle.active_queue();
    let (alpha, beta) = resolve_scalars(handle, queue, alpha, beta)?;

    trace!(
        "hybmv: {}x{} ell_width={} coo_nnz={} op={:?} on queue {}",
        n_rows,
        n_cols,
        a.ell_width()?,
        a.coo_nnz()?,
        op,
        queue.id()
    );
    handle
        .backend()
        .hybmv(queue, op, alpha, descr, a, x, beta, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::handle::PointerMode;
    use crate::kernels::HostBackend;
    use crate::matrix::config::{HostConfig, IndexBase, MatrixType};

    fn handle() -> Handle<HostBackend> {
        Handle::create(HostConfig::with_threads(2)).unwrap()
    }

    //    [1 2 0]
    //    [0 3 0]
    //    [4 0 5]
    fn sample() -> CsrMatrix<f64> {
        CsrMatrix::new(3, 3, vec![0, 2, 3, 5], vec![0, 1, 1, 0, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap()
    }

    #[test]
    fn test_csrmv_rejects_non_general() {
        let handle = handle();
        let mut descr = MatDescr::create().unwrap();
        descr.set_matrix_type(MatrixType::Symmetric);
        let mut y = vec![0.0; 3];
        let err = csrmv(
            &handle,
            Operation::NonTranspose,
            ScalarArg::Host(1.0),
            &descr,
            &sample(),
            &[1.0; 3],
            ScalarArg::Host(0.0),
            &mut y,
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::MatrixTypeNotSupported);
    }

    #[test]
    fn test_csrmv_rejects_wrong_lengths() {
        let handle = handle();
        let descr = MatDescr::create().unwrap();
        let mut y = vec![0.0; 2];
        let err = csrmv(
            &handle,
            Operation::NonTranspose,
            ScalarArg::Host(1.0),
            &descr,
            &sample(),
            &[1.0; 3],
            ScalarArg::Host(0.0),
            &mut y,
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }

    #[test]
    fn test_csrmv_rejects_base_mismatch() {
        let handle = handle();
        let mut descr = MatDescr::create().unwrap();
        descr.set_index_base(IndexBase::One);
        let mut y = vec![0.0; 3];
        let err = csrmv(
            &handle,
            Operation::NonTranspose,
            ScalarArg::Host(1.0),
            &descr,
            &sample(),
            &[1.0; 3],
            ScalarArg::Host(0.0),
            &mut y,
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }

    #[test]
    fn test_csrmv_device_scalars() {
        let mut handle = handle();
        handle.set_pointer_mode(PointerMode::Device);
        let descr = MatDescr::create().unwrap();
        let alpha = handle.upload_scalar(2.0).unwrap();
        let beta = handle.upload_scalar(1.0).unwrap();
        let mut y = vec![1.0, 1.0, 1.0];

        csrmv(
            &handle,
            Operation::NonTranspose,
            ScalarArg::Device(&alpha),
            &descr,
            &sample(),
            &[1.0, 1.0, 1.0],
            ScalarArg::Device(&beta),
            &mut y,
        )
        .unwrap();
        assert_eq!(y, vec![7.0, 7.0, 19.0]);
    }

    #[test]
    fn test_hybmv_unbuilt() {
        let handle = handle();
        let descr = MatDescr::create().unwrap();
        let hyb = HybMatrix::<f64>::create().unwrap();
        let mut y = vec![0.0; 3];
        let err = hybmv(
            &handle,
            Operation::NonTranspose,
            ScalarArg::Host(1.0),
            &descr,
            &hyb,
            &[1.0; 3],
            ScalarArg::Host(0.0),
            &mut y,
        )
        .unwrap_err();
        assert_eq!(err.status(), Status::NotInitialized);
    }
}
