//! Matrix metadata enums and tuning parameters

use std::fmt;

use crate::error::{SparseError, SparseResult};

/// Whether stored indices start at zero or one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexBase {
    /// C-style indexing
    Zero,
    /// Fortran-style indexing
    One,
}

impl IndexBase {
    /// The value added to a zero-based index to obtain a stored index
    pub fn offset(self) -> i32 {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }

    /// Re-expresses an index stored under `self` as an index stored under `to`
    #[inline]
    pub fn rebase(self, idx: i32, to: IndexBase) -> i32 {
        idx - self.offset() + to.offset()
    }
}

/// Structural class of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixType {
    /// No structure assumed
    General,
    /// A = A^T, only one triangle stored
    Symmetric,
    /// A = A^H, only one triangle stored
    Hermitian,
    /// Only one triangle is non-zero
    Triangular,
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixType::General => "general",
            MatrixType::Symmetric => "symmetric",
            MatrixType::Hermitian => "hermitian",
            MatrixType::Triangular => "triangular",
        };
        f.write_str(name)
    }
}

/// Which triangle is stored, for triangular and symmetric matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillMode {
    /// Lower triangle
    Lower,
    /// Upper triangle
    Upper,
}

/// Whether the diagonal is implicitly unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagType {
    /// Diagonal entries are stored
    NonUnit,
    /// Diagonal entries are assumed to be one
    Unit,
}

/// The operation applied to the matrix in a level-2 kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// op(A) = A
    NonTranspose,
    /// op(A) = A^T
    Transpose,
    /// op(A) = A^H; equal to A^T for real scalars
    ConjugateTranspose,
}

impl Operation {
    /// Whether the operation swaps the roles of rows and columns
    pub fn is_transposed(self) -> bool {
        !matches!(self, Operation::NonTranspose)
    }
}

/// Policy used to pick the ELL width of a HYB matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HybPartition {
    /// Width chosen by [`HybAutoPolicy`]
    Auto,
    /// Width supplied by the caller
    User,
    /// Width equals the longest row, leaving the COO part empty
    Max,
}

macro_rules! raw_code_conversions {
    ($ty:ident, $arg:literal, { $($code:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<i32> for $ty {
            type Error = SparseError;

            fn try_from(code: i32) -> SparseResult<Self> {
                match code {
                    $($code => Ok($ty::$variant),)+
                    other => Err(SparseError::invalid(
                        $arg,
                        format!("{} is not a valid code", other),
                    )),
                }
            }
        }

        impl From<$ty> for i32 {
            fn from(value: $ty) -> i32 {
                match value {
                    $($ty::$variant => $code,)+
                }
            }
        }
    };
}

raw_code_conversions!(IndexBase, "index_base", { 0 => Zero, 1 => One });
raw_code_conversions!(MatrixType, "matrix_type", {
    0 => General,
    1 => Symmetric,
    2 => Hermitian,
    3 => Triangular,
});
raw_code_conversions!(FillMode, "fill_mode", { 0 => Lower, 1 => Upper });
raw_code_conversions!(DiagType, "diag_type", { 0 => NonUnit, 1 => Unit });
raw_code_conversions!(Operation, "operation", {
    0 => NonTranspose,
    1 => Transpose,
    2 => ConjugateTranspose,
});
raw_code_conversions!(HybPartition, "partition", { 0 => Auto, 1 => User, 2 => Max });

/// Storage weights used by the automatic HYB partition
///
/// The automatic width minimises
/// `ell_slot_cost * m * width + coo_entry_cost * overflow(width)`,
/// where `overflow(width)` counts the entries that do not fit in the ELL part.
/// The defaults count machine words: an ELL slot holds a column and a value,
/// a COO entry additionally holds its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybAutoPolicy {
    /// Cost of one ELL slot, padding included
    pub ell_slot_cost: usize,
    /// Cost of one COO overflow entry
    pub coo_entry_cost: usize,
}

impl Default for HybAutoPolicy {
    fn default() -> Self {
        Self {
            ell_slot_cost: 2,
            coo_entry_cost: 3,
        }
    }
}

/// Parameters for the host compute backend
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Number of worker threads
    pub n_threads: usize,
    /// Rows below this count are processed without splitting work
    pub min_rows_per_task: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
            min_rows_per_task: 256,
        }
    }
}

impl HostConfig {
    /// Config with an explicit thread count
    pub fn with_threads(n_threads: usize) -> Self {
        Self {
            n_threads,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase() {
        assert_eq!(IndexBase::One.rebase(1, IndexBase::Zero), 0);
        assert_eq!(IndexBase::Zero.rebase(0, IndexBase::One), 1);
        assert_eq!(IndexBase::One.rebase(7, IndexBase::One), 7);
    }

    #[test]
    fn test_raw_codes() {
        assert_eq!(MatrixType::try_from(3).unwrap(), MatrixType::Triangular);
        assert_eq!(i32::from(HybPartition::Max), 2);
        assert_eq!(Operation::try_from(2).unwrap(), Operation::ConjugateTranspose);

        let err = FillMode::try_from(2).unwrap_err();
        assert_eq!(err.status(), crate::error::Status::InvalidValue);
        assert!(IndexBase::try_from(-1).is_err());
    }

    #[test]
    fn test_default_auto_policy() {
        let policy = HybAutoPolicy::default();
        assert!(policy.coo_entry_cost > policy.ell_slot_cost);
    }
}
