//! # portsparse: a portable sparse linear algebra layer
//!
//! portsparse exposes one API for sparse matrix storage, format conversion
//! and sparse matrix-vector products, independent of the compute engine that
//! runs the arithmetic. Engines plug in through the [`Backend`] trait; the
//! bundled [`HostBackend`] runs on the CPU with a Rayon pool.
//!
//! ## Overview
//!
//! - **Handle**: a backend context plus the bound queue, pointer mode and
//!   HYB partition policy
//! - **Descriptor**: matrix type, fill mode, diagonal type and index base
//! - **Formats**: COO, CSR, ELL and HYB (an ELL part plus a COO overflow)
//! - **Conversions**: csr2coo, coo2csr, csr2ell and csr2hyb
//! - **Kernels**: axpyi, csrmv, coomv, ellmv and hybmv
//!
//! Indices are `i32` and are stored under the index base recorded in the
//! descriptor that accompanies each matrix.
//!
//! ## Usage
//!
//! ```
//! use portsparse::{
//!     csrmv, CsrMatrix, Handle, HostBackend, HostConfig, MatDescr, Operation, ScalarArg,
//! };
//!
//! # fn main() -> portsparse::SparseResult<()> {
//! let handle = Handle::<HostBackend>::create(HostConfig::default())?;
//! let descr = MatDescr::create()?;
//!
//! // [1 2]
//! // [0 3]
//! let a = CsrMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0])?;
//! let mut y = vec![0.0; 2];
//! csrmv(&handle, Operation::NonTranspose, ScalarArg::Host(1.0), &descr,
//!       &a, &[1.0, 1.0], ScalarArg::Host(0.0), &mut y)?;
//! assert_eq!(y, vec![3.0, 3.0]);
//! # Ok(())
//! # }
//! ```
//!
//! Converting to HYB with the automatic partition:
//!
//! ```
//! use portsparse::{csr2hyb, CsrMatrix, Handle, HostBackend, HostConfig, HybMatrix,
//!                  HybPartition, IndexBase, MatDescr};
//!
//! let handle = Handle::<HostBackend>::create(HostConfig::with_threads(1)).unwrap();
//! let descr = MatDescr::create().unwrap();
//! let a = CsrMatrix::<f64>::identity(4, IndexBase::Zero);
//!
//! let mut hyb = HybMatrix::create().unwrap();
//! csr2hyb(&handle, &descr, &a, &mut hyb, 0, HybPartition::Auto).unwrap();
//! assert_eq!(hyb.nnz().unwrap(), 4);
//! ```

pub mod descriptor;
pub mod error;
pub mod handle;
pub mod kernels;
pub mod matrix;
pub mod utils;

// Re-export primary components
pub use descriptor::MatDescr;
pub use error::{SparseError, SparseResult, Status};
pub use handle::{Handle, PointerMode, Queue};
pub use kernels::{axpyi, coomv, csrmv, ellmv, hybmv};
pub use kernels::{Backend, DeviceScalar, HostBackend, Scalar, ScalarArg};
pub use matrix::config::{
    DiagType, FillMode, HostConfig, HybAutoPolicy, HybPartition, IndexBase, MatrixType, Operation,
};
pub use matrix::{
    auto_ell_width, coo2csr, coo_to_csr, csr2coo, csr2ell, csr2ell_width, csr2hyb, csr_to_coo,
    hyb_ell_width, reference_spmv,
};
pub use matrix::{CooMatrix, CsrMatrix, EllMatrix, HybMatrix, ELL_PADDING};
pub use utils::{from_sprs_csr, to_dense, to_sprs_csr};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
