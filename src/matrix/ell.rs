//! ELLPACK (ELL) matrix format
//!
//! Every row owns `width` consecutive cells in row-major layout. Cells past
//! the end of a row hold [`ELL_PADDING`] as their column index.

use num_traits::Num;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::IndexBase;
use crate::utils::check_index_range;

/// Column index marking an unused ELL cell
pub const ELL_PADDING: i32 = -1;

/// Number of cells in an ELL matrix, bounded by the 32-bit index range
fn cell_count(n_rows: usize, width: usize) -> SparseResult<usize> {
    let cells = n_rows.checked_mul(width).ok_or_else(|| {
        SparseError::invalid("ell_width", format!("{} x {} ELL cells overflow", n_rows, width))
    })?;
    check_index_range("ell_width", cells)?;
    Ok(cells)
}

/// A sparse matrix in ELL format
#[derive(Debug, Clone, PartialEq)]
pub struct EllMatrix<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Cells per row
    pub width: usize,

    /// Column indices (size: n_rows * width)
    pub col_idx: Vec<i32>,

    /// Values (size: n_rows * width)
    pub values: Vec<T>,
}

impl<T> EllMatrix<T>
where
    T: Copy + Num,
{
    /// Allocates an all-padding ELL matrix of the given width
    ///
    /// This is the allocation step between width discovery and the fill pass.
    /// Fails with `InvalidValue` when `n_rows * width` cells cannot be
    /// addressed with 32-bit indices.
    pub fn with_width(n_rows: usize, n_cols: usize, width: usize) -> SparseResult<Self> {
        let cells = cell_count(n_rows, width)?;

        Ok(Self {
            n_rows,
            n_cols,
            width,
            col_idx: vec![ELL_PADDING; cells],
            values: vec![T::zero(); cells],
        })
    }

    /// Wraps existing ELL arrays
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        width: usize,
        col_idx: Vec<i32>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            width,
            col_idx,
            values,
        };
        matrix.check_layout()?;
        Ok(matrix)
    }

    /// Checks that both arrays hold exactly `n_rows * width` cells
    ///
    /// Unlike [`EllMatrix::validate`] this ignores cell contents, so it also
    /// applies to output buffers that are about to be overwritten.
    pub fn check_layout(&self) -> SparseResult<()> {
        let cells = cell_count(self.n_rows, self.width)?;
        if self.col_idx.len() != cells || self.values.len() != cells {
            return Err(SparseError::invalid(
                "col_idx",
                format!(
                    "ELL arrays must hold n_rows * width = {} cells (got {} and {})",
                    cells,
                    self.col_idx.len(),
                    self.values.len()
                ),
            ));
        }
        Ok(())
    }

    /// Checks the layout and that every non-padding column index is in range
    /// under `base`
    pub fn validate(&self, base: IndexBase) -> SparseResult<()> {
        self.check_layout()?;

        let lo = base.offset();
        let hi = lo as i64 + self.n_cols as i64;
        match self
            .col_idx
            .iter()
            .find(|&&c| c != ELL_PADDING && (c < lo || c as i64 >= hi))
        {
            Some(bad) => Err(SparseError::invalid(
                "col_idx",
                format!("ELL column index {} outside [{}, {})", bad, lo, hi),
            )),
            None => Ok(()),
        }
    }

    /// Number of non-padding cells
    pub fn nnz(&self) -> usize {
        self.col_idx.iter().filter(|&&c| c != ELL_PADDING).count()
    }

    /// Iterates over the non-padding (col, value) cells of row i in slot order
    pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (i32, &T)> {
        let start = i * self.width;
        let end = start + self.width;

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .filter(|(col, _)| **col != ELL_PADDING)
            .map(|(&col, val)| (col, val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_width_is_all_padding() {
        let ell = EllMatrix::<f32>::with_width(3, 4, 2).unwrap();
        assert_eq!(ell.col_idx, vec![ELL_PADDING; 6]);
        assert_eq!(ell.nnz(), 0);
        assert_eq!(ell.row_entries(1).count(), 0);
    }

    #[test]
    fn test_zero_width() {
        let ell = EllMatrix::<f64>::with_width(5, 5, 0).unwrap();
        assert!(ell.col_idx.is_empty());
        assert_eq!(ell.row_entries(4).count(), 0);
    }

    #[test]
    fn test_row_entries_skips_padding() {
        let ell = EllMatrix::new(2, 3, 2, vec![0, 2, 1, -1], vec![1, 2, 3, 0]).unwrap();
        assert_eq!(ell.row_entries(0).collect::<Vec<_>>(), vec![(0, &1), (2, &2)]);
        assert_eq!(ell.row_entries(1).collect::<Vec<_>>(), vec![(1, &3)]);
        assert_eq!(ell.nnz(), 3);
        assert!(ell.validate(IndexBase::Zero).is_ok());
        assert!(ell.validate(IndexBase::One).is_err());
    }

    #[test]
    fn test_new_rejects_wrong_size() {
        assert!(EllMatrix::new(2, 2, 2, vec![0, 1, 0], vec![1, 1, 1]).is_err());
    }

    #[test]
    fn test_validate_catches_mutated_layout() {
        let mut ell = EllMatrix::new(2, 3, 2, vec![0, 2, 1, -1], vec![1, 2, 3, 0]).unwrap();
        ell.width = 3;
        let err = ell.validate(IndexBase::Zero).unwrap_err();
        assert_eq!(err.status(), crate::error::Status::InvalidValue);

        ell.width = 2;
        ell.values.pop();
        assert!(ell.validate(IndexBase::Zero).is_err());
        assert!(ell.check_layout().is_err());
    }

    #[test]
    fn test_huge_width_rejected() {
        let err = EllMatrix::<f64>::with_width(3, 3, 1 << 60).unwrap_err();
        assert_eq!(err.status(), crate::error::Status::InvalidValue);

        let err = EllMatrix::<f64>::with_width(usize::MAX, 3, 2).unwrap_err();
        assert_eq!(err.status(), crate::error::Status::InvalidValue);

        assert!(EllMatrix::<f64>::new(usize::MAX, 3, 2, vec![], vec![]).is_err());
    }
}
