//! Sparse level-1 and level-2 kernel contracts
//!
//! The functions in [`level1`] and [`level2`] validate their operands against
//! the descriptor, read alpha/beta according to the handle's pointer mode and
//! dispatch the arithmetic to the handle's [`Backend`]. Backends implement
//! the arithmetic; [`HostBackend`] is the bundled one.
//!
//! Every contract computes `y := alpha * op(A) * x + beta * y`. When beta is
//! zero, y is overwritten without being read.

pub mod host;
pub mod level1;
pub mod level2;

pub use host::HostBackend;
pub use level1::axpyi;
pub use level2::{coomv, csrmv, ellmv, hybmv};

use std::fmt;

use ndarray::LinalgScalar;
use num_traits::Float;

use crate::descriptor::MatDescr;
use crate::error::{SparseError, SparseResult};
use crate::handle::{PointerMode, Queue};
use crate::matrix::config::{IndexBase, Operation};
use crate::matrix::{CooMatrix, CsrMatrix, EllMatrix, HybMatrix};

/// Floating-point element types the kernels accept
pub trait Scalar: Float + LinalgScalar + Send + Sync + fmt::Debug {}

impl Scalar for f32 {}
impl Scalar for f64 {}

/// A scalar resident in backend memory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceScalar<T> {
    value: T,
}

impl<T: Scalar> DeviceScalar<T> {
    /// Wraps a value already placed in backend memory
    ///
    /// Backends call this from [`Backend::upload_scalar`].
    pub fn from_backend(value: T) -> Self {
        Self { value }
    }

    /// The stored value, for backends reading it back
    pub fn backend_value(&self) -> T {
        self.value
    }
}

/// A scalar operand, either a host value or a backend-resident one
#[derive(Debug, Clone, Copy)]
pub enum ScalarArg<'a, T> {
    /// Read from host memory; valid in [`PointerMode::Host`]
    Host(T),
    /// Read from backend memory; valid in [`PointerMode::Device`]
    Device(&'a DeviceScalar<T>),
}

impl<'a, T: Scalar> ScalarArg<'a, T> {
    /// Reads the scalar from the memory space the pointer mode designates
    pub(crate) fn resolve<B: Backend>(
        self,
        name: &'static str,
        mode: PointerMode,
        backend: &B,
        queue: Queue,
    ) -> SparseResult<T> {
        match (mode, self) {
            (PointerMode::Host, ScalarArg::Host(v)) => Ok(v),
            (PointerMode::Device, ScalarArg::Device(s)) => backend.read_scalar(queue, s),
            (PointerMode::Host, ScalarArg::Device(_)) => Err(SparseError::invalid(
                name,
                "backend-resident scalar passed while pointer mode is host",
            )),
            (PointerMode::Device, ScalarArg::Host(_)) => Err(SparseError::invalid(
                name,
                "host scalar passed while pointer mode is device",
            )),
        }
    }
}

/// A compute engine that executes kernel arithmetic
///
/// Operands reaching a backend have already been validated: index arrays are
/// consistent with `descr.index_base()`, and `x`/`y` have the lengths
/// `op(A)` requires. Backends must honour the rule that a zero beta
/// overwrites `y` without reading it.
pub trait Backend: Sized + Send + Sync {
    /// Parameters needed to establish the backend context
    type Config;

    /// Establishes the backend context
    fn connect(config: Self::Config) -> SparseResult<Self>;

    /// Tears the context down
    fn disconnect(self) -> SparseResult<()> {
        Ok(())
    }

    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// The queue used when a handle has none bound
    fn default_queue(&self) -> Queue {
        Queue::DEFAULT
    }

    /// Mints a new queue on this backend; ids must be unique per backend
    /// and never 0
    fn create_queue(&self) -> SparseResult<Queue>;

    /// Waits for all work on `queue`
    fn synchronize(&self, _queue: Queue) -> SparseResult<()> {
        Ok(())
    }

    /// Copies a host scalar into backend memory
    fn upload_scalar<T: Scalar>(&self, _queue: Queue, value: T) -> SparseResult<DeviceScalar<T>> {
        Ok(DeviceScalar::from_backend(value))
    }

    /// Reads a backend-resident scalar
    fn read_scalar<T: Scalar>(&self, _queue: Queue, scalar: &DeviceScalar<T>) -> SparseResult<T> {
        Ok(scalar.backend_value())
    }

    /// `y[x_ind[i] - base] += alpha * x_val[i]`
    fn axpyi<T: Scalar>(
        &self,
        queue: Queue,
        alpha: T,
        x_val: &[T],
        x_ind: &[i32],
        y: &mut [T],
        base: IndexBase,
    ) -> SparseResult<()>;

    /// `y := alpha * op(A) * x + beta * y` for CSR `A`
    #[allow(clippy::too_many_arguments)]
    fn csrmv<T: Scalar>(
        &self,
        queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &CsrMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()>;

    /// `y := alpha * op(A) * x + beta * y` for COO `A`
    #[allow(clippy::too_many_arguments)]
    fn coomv<T: Scalar>(
        &self,
        queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &CooMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()>;

    /// `y := alpha * op(A) * x + beta * y` for ELL `A`
    #[allow(clippy::too_many_arguments)]
    fn ellmv<T: Scalar>(
        &self,
        queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &EllMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()>;

    /// `y := alpha * op(A) * x + beta * y` for HYB `A`
    ///
    /// The default runs the ELL part with the caller's beta and then
    /// accumulates the COO part on top.
    #[allow(clippy::too_many_arguments)]
    fn hybmv<T: Scalar>(
        &self,
        queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &HybMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()> {
        self.ellmv(queue, op, alpha, descr, a.ell()?, x, beta, y)?;
        self.coomv(queue, op, alpha, descr, a.coo()?, x, T::one(), y)
    }
}
