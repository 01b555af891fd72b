//! Outcome codes and the error type shared by every operation
//!
//! Every fallible call in the crate returns [`SparseResult`]. A failure is
//! one of the [`SparseError`] variants, and each variant maps onto exactly one
//! numeric [`Status`] code so that callers which track raw outcome codes can
//! still do so.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type SparseResult<T> = Result<T, SparseError>;

/// Failure kinds reported by handle, descriptor, conversion and kernel calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// The handle or resource was not initialized
    #[error("Library not initialized: {0}")]
    NotInitialized(String),

    /// A resource (backend context, worker pool, buffer) could not be allocated
    #[error("Allocation failed: {0}")]
    AllocFailed(String),

    /// An argument is outside its domain, dimensions disagree, or a width is too small
    #[error("Invalid value for '{arg}': {reason}")]
    InvalidValue {
        /// The offending argument
        arg: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The backend cannot run this request
    #[error("Architecture mismatch: {0}")]
    ArchMismatch(String),

    /// A memory space the operation needs is not accessible
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// The backend ran the request but it failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// An internal invariant was broken
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The descriptor's matrix type is not supported by the operation
    #[error("Matrix type {matrix_type} not supported by {op}")]
    MatrixTypeNotSupported {
        /// The rejected matrix type, as reported by its `Display` impl
        matrix_type: String,
        /// The operation name
        op: &'static str,
    },

    /// A zero pivot was encountered
    #[error("Zero pivot at position {0}")]
    ZeroPivot(usize),
}

impl SparseError {
    /// Shorthand for building an [`SparseError::InvalidValue`]
    pub fn invalid(arg: &'static str, reason: impl Into<String>) -> Self {
        SparseError::InvalidValue {
            arg,
            reason: reason.into(),
        }
    }

    /// The numeric outcome code for this failure
    pub fn status(&self) -> Status {
        match self {
            SparseError::NotInitialized(_) => Status::NotInitialized,
            SparseError::AllocFailed(_) => Status::AllocFailed,
            SparseError::InvalidValue { .. } => Status::InvalidValue,
            SparseError::ArchMismatch(_) => Status::ArchMismatch,
            SparseError::MappingError(_) => Status::MappingError,
            SparseError::ExecutionFailed(_) => Status::ExecutionFailed,
            SparseError::InternalError(_) => Status::InternalError,
            SparseError::MatrixTypeNotSupported { .. } => Status::MatrixTypeNotSupported,
            SparseError::ZeroPivot(_) => Status::ZeroPivot,
        }
    }
}

/// The closed set of outcome codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// The call succeeded
    Success = 0,
    /// Handle invalid or uninitialized
    NotInitialized = 1,
    /// Resource allocation failed
    AllocFailed = 2,
    /// Argument outside its domain
    InvalidValue = 3,
    /// Backend cannot run the request
    ArchMismatch = 4,
    /// Memory space inaccessible
    MappingError = 5,
    /// Backend ran but failed
    ExecutionFailed = 6,
    /// Internal failure
    InternalError = 7,
    /// Matrix type not supported
    MatrixTypeNotSupported = 8,
    /// Zero pivot computed
    ZeroPivot = 9,
}

impl Status {
    /// Numeric value of the code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Collapses a result into its outcome code
    pub fn from_result<T>(result: &SparseResult<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }

    /// Whether this is the success code
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl TryFrom<i32> for Status {
    type Error = SparseError;

    fn try_from(code: i32) -> SparseResult<Self> {
        Ok(match code {
            0 => Status::Success,
            1 => Status::NotInitialized,
            2 => Status::AllocFailed,
            3 => Status::InvalidValue,
            4 => Status::ArchMismatch,
            5 => Status::MappingError,
            6 => Status::ExecutionFailed,
            7 => Status::InternalError,
            8 => Status::MatrixTypeNotSupported,
            9 => Status::ZeroPivot,
            other => {
                return Err(SparseError::invalid(
                    "status",
                    format!("unknown outcome code {}", other),
                ))
            }
        })
    }
}
