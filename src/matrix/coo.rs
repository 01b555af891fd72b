//! Coordinate (COO) matrix format

use num_traits::Num;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::IndexBase;
use crate::matrix::csr::validate_indices;

/// A sparse matrix stored as explicit (row, col, value) triples
///
/// Entries may appear in any order and duplicates are allowed; producers in
/// this crate emit them grouped by row.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row index of each entry (size: nnz)
    pub row_idx: Vec<i32>,

    /// Column index of each entry (size: nnz)
    pub col_idx: Vec<i32>,

    /// Value of each entry (size: nnz)
    pub values: Vec<T>,
}

impl<T> CooMatrix<T>
where
    T: Copy + Num,
{
    /// Creates a COO matrix; the three arrays must have equal length
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_idx: Vec<i32>,
        col_idx: Vec<i32>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            row_idx,
            col_idx,
            values,
        };
        matrix.check_lengths()?;
        Ok(matrix)
    }

    fn check_lengths(&self) -> SparseResult<()> {
        let nnz = self.values.len();
        if self.row_idx.len() != nnz || self.col_idx.len() != nnz {
            return Err(SparseError::invalid(
                "values",
                format!(
                    "row_idx ({}), col_idx ({}) and values ({}) must have equal length",
                    self.row_idx.len(),
                    self.col_idx.len(),
                    nnz
                ),
            ));
        }
        Ok(())
    }

    /// An empty matrix
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_idx: Vec::new(),
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Checks that the arrays agree in length and every row and column index
    /// is in range under `base`
    pub fn validate(&self, base: IndexBase) -> SparseResult<()> {
        self.check_lengths()?;
        validate_indices("row_idx", &self.row_idx, self.n_rows, base)?;
        validate_indices("col_idx", &self.col_idx, self.n_cols, base)
    }

    /// Returns the number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterates over the stored (row, col, value) triples in storage order
    pub fn triplets(&self) -> impl Iterator<Item = (i32, i32, T)> + '_ {
        self.row_idx
            .iter()
            .zip(&self.col_idx)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }
}
