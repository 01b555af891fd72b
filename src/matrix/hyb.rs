//! Hybrid (HYB) matrix: an ELL prefix plus a COO overflow
//!
//! A `HybMatrix` starts unbuilt and is populated only by
//! [`csr2hyb`](crate::matrix::conversion::csr2hyb). Querying an unbuilt matrix
//! reports `NotInitialized`.

use log::debug;
use num_traits::Num;

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::HybPartition;
use crate::matrix::coo::CooMatrix;
use crate::matrix::ell::EllMatrix;

#[derive(Debug, Clone, PartialEq)]
enum HybState<T> {
    Unbuilt,
    Built {
        partition: HybPartition,
        ell: EllMatrix<T>,
        coo: CooMatrix<T>,
    },
}

/// A sparse matrix split into ELL and COO parts
#[derive(Debug, Clone, PartialEq)]
pub struct HybMatrix<T> {
    state: HybState<T>,
}

impl<T> HybMatrix<T>
where
    T: Copy + Num,
{
    /// Creates an empty, unbuilt HYB matrix
    pub fn create() -> SparseResult<Self> {
        debug!("creating HYB matrix");
        Ok(Self {
            state: HybState::Unbuilt,
        })
    }

    /// Releases both the ELL and the COO storage
    pub fn destroy(self) -> SparseResult<()> {
        if let HybState::Built { ell, coo, .. } = &self.state {
            debug!(
                "destroying HYB matrix ({} ELL cells, {} COO entries)",
                ell.col_idx.len(),
                coo.nnz()
            );
        }
        Ok(())
    }

    pub(crate) fn populate(&mut self, partition: HybPartition, ell: EllMatrix<T>, coo: CooMatrix<T>) {
        self.state = HybState::Built {
            partition,
            ell,
            coo,
        };
    }

    /// Whether a conversion has populated this matrix
    pub fn is_built(&self) -> bool {
        matches!(self.state, HybState::Built { .. })
    }

    fn parts(&self) -> SparseResult<(HybPartition, &EllMatrix<T>, &CooMatrix<T>)> {
        match &self.state {
            HybState::Built {
                partition,
                ell,
                coo,
            } => Ok((*partition, ell, coo)),
            HybState::Unbuilt => Err(SparseError::NotInitialized(
                "HYB matrix has not been populated by csr2hyb".into(),
            )),
        }
    }

    /// The ELL part
    pub fn ell(&self) -> SparseResult<&EllMatrix<T>> {
        self.parts().map(|(_, ell, _)| ell)
    }

    /// The COO overflow part
    pub fn coo(&self) -> SparseResult<&CooMatrix<T>> {
        self.parts().map(|(_, _, coo)| coo)
    }

    /// The policy the ELL width was chosen with
    pub fn partition(&self) -> SparseResult<HybPartition> {
        self.parts().map(|(partition, _, _)| partition)
    }

    /// Matrix dimensions (rows, cols)
    pub fn shape(&self) -> SparseResult<(usize, usize)> {
        self.parts().map(|(_, ell, _)| (ell.n_rows, ell.n_cols))
    }

    /// Width of the ELL part
    pub fn ell_width(&self) -> SparseResult<usize> {
        self.parts().map(|(_, ell, _)| ell.width)
    }

    /// Entries held in the ELL part (padding excluded)
    pub fn ell_nnz(&self) -> SparseResult<usize> {
        self.parts().map(|(_, ell, _)| ell.nnz())
    }

    /// Entries held in the COO part
    pub fn coo_nnz(&self) -> SparseResult<usize> {
        self.parts().map(|(_, _, coo)| coo.nnz())
    }

    /// Total stored entries across both parts
    pub fn nnz(&self) -> SparseResult<usize> {
        Ok(self.ell_nnz()? + self.coo_nnz()?)
    }
}
