//! Dense reference for sparse matrix-vector products
//!
//! Expands the matrix into an ndarray and multiplies densely. It is slow but
//! obviously correct, and serves as the baseline the kernel tests compare
//! against.

use ndarray::{ArrayView1, LinalgScalar};
use num_traits::Float;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::{IndexBase, Operation};
use crate::matrix::CsrMatrix;
use crate::utils::to_dense;

/// Computes `alpha * op(A) * x + beta * y` densely and returns the result
///
/// `y` is left untouched. A zero beta ignores `y` entirely, so NaN or
/// infinite values in it do not reach the result.
pub fn reference_spmv<T>(
    op: Operation,
    alpha: T,
    a: &CsrMatrix<T>,
    base: IndexBase,
    x: &[T],
    beta: T,
    y: &[T],
) -> SparseResult<Vec<T>>
where
    T: Float + LinalgScalar,
{
    let dense = to_dense(a, base)?;
    let dense = if op.is_transposed() { dense.t() } else { dense.view() };

    let (rows, cols) = dense.dim();
    if x.len() != cols || y.len() != rows {
        return Err(SparseError::invalid(
            "x",
            format!(
                "op(A) is {}x{} but x has {} and y has {} entries",
                rows,
                cols,
                x.len(),
                y.len()
            ),
        ));
    }

    let product = dense.dot(&ArrayView1::from(x));
    let result = product
        .iter()
        .zip(y)
        .map(|(&ax, &yi)| {
            if beta == T::zero() {
                alpha * ax
            } else {
                alpha * ax + beta * yi
            }
        })
        .collect();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_spmv() {
        // A = [1 2; 0 3]
        let a = CsrMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0]).unwrap();

        let y = reference_spmv(
            Operation::NonTranspose,
            1.0,
            &a,
            IndexBase::Zero,
            &[1.0, 1.0],
            0.0,
            &[0.0, 0.0],
        )
        .unwrap();
        assert_eq!(y, vec![3.0, 3.0]);

        let y = reference_spmv(
            Operation::Transpose,
            2.0,
            &a,
            IndexBase::Zero,
            &[1.0, 1.0],
            1.0,
            &[1.0, 1.0],
        )
        .unwrap();
        assert_eq!(y, vec![3.0, 11.0]);
    }

    #[test]
    fn test_reference_beta_zero_drops_nan() {
        let a = CsrMatrix::<f64>::identity(2, IndexBase::One);
        let y = reference_spmv(
            Operation::NonTranspose,
            1.0,
            &a,
            IndexBase::One,
            &[4.0, 5.0],
            0.0,
            &[f64::NAN, f64::INFINITY],
        )
        .unwrap();
        assert_eq!(y, vec![4.0, 5.0]);
    }
}
