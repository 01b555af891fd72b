//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;
use num_traits::Num;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::IndexBase;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing offsets into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Indices are stored under the index base of the descriptor that accompanies
/// the matrix, so `row_ptr[0]` equals that base and `row_ptr[n_rows] - row_ptr[0]`
/// equals nnz.
#[derive(Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    pub row_ptr: Vec<i32>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<i32>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T> CsrMatrix<T>
where
    T: Copy + Num,
{
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// Only array lengths are checked here; index contents are checked against
    /// a descriptor's base by [`CsrMatrix::validate`].
    ///
    /// # Errors
    ///
    /// `InvalidValue` if:
    /// - row_ptr.len() is not n_rows + 1
    /// - col_idx.len() differs from values.len()
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<i32>,
        col_idx: Vec<i32>,
        values: Vec<T>,
    ) -> SparseResult<Self> {
        let matrix = Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        };
        matrix.check_lengths()?;
        Ok(matrix)
    }

    /// Checks that the array lengths agree with the shape and with each other
    fn check_lengths(&self) -> SparseResult<()> {
        if self.n_rows.checked_add(1) != Some(self.row_ptr.len()) {
            return Err(SparseError::invalid(
                "row_ptr",
                format!("length {} must be n_rows + 1 for {} rows", self.row_ptr.len(), self.n_rows),
            ));
        }
        if self.col_idx.len() != self.values.len() {
            return Err(SparseError::invalid(
                "col_idx",
                format!(
                    "length {} must equal values length {}",
                    self.col_idx.len(),
                    self.values.len()
                ),
            ));
        }
        Ok(())
    }

    /// Checks the index arrays against an index base
    ///
    /// The arrays must have the lengths the shape implies. The row pointer
    /// must start at the base, be non-decreasing and end at base + nnz; every
    /// column index must lie in `[base, base + n_cols)`.
    pub fn validate(&self, base: IndexBase) -> SparseResult<()> {
        self.check_lengths()?;
        validate_row_ptr(&self.row_ptr, self.nnz(), base)?;
        validate_indices("col_idx", &self.col_idx, self.n_cols, base)
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Offsets of row i's entries within col_idx and values
    #[inline]
    pub fn row_range(&self, i: usize) -> std::ops::Range<usize> {
        let origin = self.row_ptr[0];
        (self.row_ptr[i] - origin) as usize..(self.row_ptr[i + 1] - origin) as usize
    }

    /// Number of entries stored in row i
    #[inline]
    pub fn row_len(&self, i: usize) -> usize {
        (self.row_ptr[i + 1] - self.row_ptr[i]) as usize
    }

    /// Returns an iterator over the stored elements in row i
    ///
    /// Each item is a tuple (col_idx, value) with the column index as stored.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (i32, &T)> {
        let range = self.row_range(i);

        self.col_idx[range.clone()]
            .iter()
            .zip(&self.values[range])
            .map(|(&col, val)| (col, val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize, base: IndexBase) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![base.offset(); n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize, base: IndexBase) -> Self {
        let offset = base.offset();
        let row_ptr = (0..=n as i32).map(|i| i + offset).collect();
        let col_idx = (0..n as i32).map(|i| i + offset).collect();
        let values = vec![T::one(); n];

        Self {
            n_rows: n,
            n_cols: n,
            row_ptr,
            col_idx,
            values,
        }
    }
}

/// Checks a row pointer array against a base and an expected nnz
pub(crate) fn validate_row_ptr(row_ptr: &[i32], nnz: usize, base: IndexBase) -> SparseResult<()> {
    let first = match row_ptr.first() {
        Some(&first) => first,
        None => return Err(SparseError::invalid("row_ptr", "row pointer cannot be empty")),
    };
    if first != base.offset() {
        return Err(SparseError::invalid(
            "row_ptr",
            format!("row_ptr[0] = {} does not match index base {:?}", first, base),
        ));
    }
    if let Some(w) = row_ptr.windows(2).position(|w| w[1] < w[0]) {
        return Err(SparseError::invalid(
            "row_ptr",
            format!("row pointer decreases at row {}", w),
        ));
    }
    let last = row_ptr[row_ptr.len() - 1];
    if (last - first) as usize != nnz {
        return Err(SparseError::invalid(
            "row_ptr",
            format!("row_ptr spans {} entries but nnz is {}", last - first, nnz),
        ));
    }
    Ok(())
}

/// Checks that every index lies in `[base, base + bound)`
pub(crate) fn validate_indices(
    arg: &'static str,
    indices: &[i32],
    bound: usize,
    base: IndexBase,
) -> SparseResult<()> {
    let lo = base.offset() as i64;
    let hi = lo + bound as i64;
    match indices.iter().find(|&&idx| (idx as i64) < lo || (idx as i64) >= hi) {
        Some(bad) => Err(SparseError::invalid(
            arg,
            format!("index {} outside [{}, {})", bad, lo, hi),
        )),
        None => Ok(()),
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for CsrMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CsrMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let range = self.row_range(i);

                if range.is_empty() {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(range.len());

                    for j in range.start..(range.start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if range.len() > max_elements {
                        write!(f, "... ({} more)", range.len() - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
