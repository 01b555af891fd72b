//! Utilities for converting between our matrix formats and external libraries

use ndarray::Array2;
use num_traits::Num;
use sprs::CsMat;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::IndexBase;
use crate::matrix::CsrMatrix;

/// Converts our CSR matrix format to sprs CsMat format
///
/// sprs is always zero-based, so indices are shifted down from `base`.
/// Rows are sorted by column on the way in; duplicate entries are rejected
/// by sprs.
pub fn to_sprs_csr<T>(matrix: &CsrMatrix<T>, base: IndexBase) -> SparseResult<CsMat<T>>
where
    T: Copy + Num + Default,
{
    matrix.validate(base)?;

    let offset = base.offset();
    let indptr = matrix.row_ptr.iter().map(|&p| (p - offset) as usize).collect();
    let indices = matrix.col_idx.iter().map(|&c| (c - offset) as usize).collect();

    CsMat::new_from_unsorted(
        (matrix.n_rows, matrix.n_cols),
        indptr,
        indices,
        matrix.values.clone(),
    )
    .map_err(|(_, _, _, e)| SparseError::invalid("csr", e.to_string()))
}

/// Converts sprs CsMat to our CsrMatrix, emitting indices under `base`
pub fn from_sprs_csr<T>(matrix: CsMat<T>, base: IndexBase) -> SparseResult<CsrMatrix<T>>
where
    T: Copy + Num + Default,
{
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    crate::utils::check_index_range("nnz", data.len() + 1)?;
    crate::utils::check_index_range("n_cols", n_cols + 1)?;

    let offset = base.offset();
    CsrMatrix::new(
        n_rows,
        n_cols,
        indptr.into_iter().map(|p| p as i32 + offset).collect(),
        indices.into_iter().map(|c| c as i32 + offset).collect(),
        data,
    )
}

/// Expands a CSR matrix into a dense array, summing duplicate entries
pub fn to_dense<T>(matrix: &CsrMatrix<T>, base: IndexBase) -> SparseResult<Array2<T>>
where
    T: Copy + Num,
{
    matrix.validate(base)?;

    let offset = base.offset();
    let mut dense = Array2::from_elem((matrix.n_rows, matrix.n_cols), T::zero());
    for i in 0..matrix.n_rows {
        for (col, &val) in matrix.row_iter(i) {
            let cell = &mut dense[[i, (col - offset) as usize]];
            *cell = *cell + val;
        }
    }

    Ok(dense)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_roundtrip() {
        // Create a test matrix
        let original = CsrMatrix::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1.0f64, 2.0, 3.0, 4.0, 5.0],
        )
        .unwrap();

        // Convert to sprs and back
        let sprs_mat = to_sprs_csr(&original, IndexBase::Zero).unwrap();
        let roundtrip = from_sprs_csr(sprs_mat, IndexBase::Zero).unwrap();

        assert_eq!(roundtrip.n_rows, original.n_rows);
        assert_eq!(roundtrip.n_cols, original.n_cols);
        assert_eq!(roundtrip, original);
    }

    #[test]
    fn test_one_based_to_sprs() {
        let one_based = CsrMatrix::new(2, 2, vec![1, 2, 3], vec![2, 1], vec![5.0f64, 6.0]).unwrap();
        let sprs_mat = to_sprs_csr(&one_based, IndexBase::One).unwrap();

        assert_eq!(sprs_mat.get(0, 1), Some(&5.0));
        assert_eq!(sprs_mat.get(1, 0), Some(&6.0));
        assert_eq!(sprs_mat.get(0, 0), None);

        let back = from_sprs_csr(sprs_mat, IndexBase::One).unwrap();
        assert_eq!(back, one_based);
    }

    #[test]
    fn test_unsorted_row_is_sorted_by_sprs() {
        let unsorted = CsrMatrix::new(1, 3, vec![0, 2], vec![2, 0], vec![1.0f64, 2.0]).unwrap();
        let sprs_mat = to_sprs_csr(&unsorted, IndexBase::Zero).unwrap();
        assert_eq!(sprs_mat.indices(), &[0, 2]);
        assert_eq!(sprs_mat.data(), &[2.0, 1.0]);
    }

    #[test]
    fn test_to_dense_sums_duplicates() {
        let dup = CsrMatrix::new(1, 2, vec![0, 3], vec![1, 1, 0], vec![1.0f64, 2.0, 4.0]).unwrap();
        let dense = to_dense(&dup, IndexBase::Zero).unwrap();
        assert_eq!(dense[[0, 0]], 4.0);
        assert_eq!(dense[[0, 1]], 3.0);
    }
}
