//! Matrix descriptor: metadata attached to a logical sparse matrix
//!
//! A descriptor carries matrix type, fill mode, diagonal type and index base.
//! It never stores dimensions or nnz; those travel alongside every call.
//! Descriptors are created with [`MatDescr::create`] and released with
//! [`MatDescr::destroy`]; there is no `Default` impl.

use log::{debug, warn};

use crate::error::{SparseError, SparseResult};
use crate::matrix::config::{DiagType, FillMode, IndexBase, MatrixType};

/// Matrix metadata record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatDescr {
    matrix_type: MatrixType,
    fill_mode: FillMode,
    diag_type: DiagType,
    index_base: IndexBase,
}

impl MatDescr {
    /// Creates a descriptor for a general, lower, non-unit, zero-based matrix
    pub fn create() -> SparseResult<Self> {
        debug!("creating matrix descriptor");
        Ok(Self {
            matrix_type: MatrixType::General,
            fill_mode: FillMode::Lower,
            diag_type: DiagType::NonUnit,
            index_base: IndexBase::Zero,
        })
    }

    /// Releases the descriptor
    pub fn destroy(self) -> SparseResult<()> {
        debug!("destroying matrix descriptor");
        Ok(())
    }

    /// Copies every field of `src` into this descriptor
    pub fn copy_from(&mut self, src: &MatDescr) -> SparseResult<()> {
        self.matrix_type = src.matrix_type;
        self.fill_mode = src.fill_mode;
        self.diag_type = src.diag_type;
        self.index_base = src.index_base;
        Ok(())
    }

    /// Fails with `MatrixTypeNotSupported` unless the matrix type is general
    pub fn ensure_general(&self, op: &'static str) -> SparseResult<()> {
        if self.matrix_type != MatrixType::General {
            warn!("{} rejected: matrix type {}", op, self.matrix_type);
            return Err(SparseError::MatrixTypeNotSupported {
                matrix_type: self.matrix_type.to_string(),
                op,
            });
        }
        Ok(())
    }

    pub fn matrix_type(&self) -> MatrixType {
        self.matrix_type
    }

    pub fn set_matrix_type(&mut self, matrix_type: MatrixType) {
        self.matrix_type = matrix_type;
    }

    /// Sets the matrix type from its raw code, rejecting unknown codes
    pub fn set_matrix_type_raw(&mut self, code: i32) -> SparseResult<()> {
        self.matrix_type = MatrixType::try_from(code)?;
        Ok(())
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    /// Sets the fill mode from its raw code, rejecting unknown codes
    pub fn set_fill_mode_raw(&mut self, code: i32) -> SparseResult<()> {
        self.fill_mode = FillMode::try_from(code)?;
        Ok(())
    }

    pub fn diag_type(&self) -> DiagType {
        self.diag_type
    }

    pub fn set_diag_type(&mut self, diag_type: DiagType) {
        self.diag_type = diag_type;
    }

    /// Sets the diagonal type from its raw code, rejecting unknown codes
    pub fn set_diag_type_raw(&mut self, code: i32) -> SparseResult<()> {
        self.diag_type = DiagType::try_from(code)?;
        Ok(())
    }

    pub fn index_base(&self) -> IndexBase {
        self.index_base
    }

    pub fn set_index_base(&mut self, index_base: IndexBase) {
        self.index_base = index_base;
    }

    /// Sets the index base from its raw code, rejecting unknown codes
    pub fn set_index_base_raw(&mut self, code: i32) -> SparseResult<()> {
        self.index_base = IndexBase::try_from(code)?;
        Ok(())
    }
}
