// Matrix data structures and format conversions

pub mod config;
pub mod conversion;
pub mod coo;
pub mod csr;
pub mod ell;
pub mod hyb;
pub mod reference;

pub use config::{
    DiagType, FillMode, HostConfig, HybAutoPolicy, HybPartition, IndexBase, MatrixType, Operation,
};
pub use conversion::{
    auto_ell_width, coo2csr, coo_to_csr, csr2coo, csr2ell, csr2ell_width, csr2hyb, csr_to_coo,
    hyb_ell_width,
};
pub use coo::CooMatrix;
pub use csr::CsrMatrix;
pub use ell::{EllMatrix, ELL_PADDING};
pub use hyb::HybMatrix;
pub use reference::reference_spmv;
