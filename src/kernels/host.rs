//! # Host Backend
//!
//! Runs the kernel arithmetic on the CPU. Row-oriented products are spread
//! over a Rayon pool owned by the backend; scatter-style products (transposed
//! CSR/ELL and all COO products) run serially on the calling thread so that
//! accumulation order is deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use rayon::prelude::*;

use crate::descriptor::MatDescr;
use crate::error::{SparseError, SparseResult};
use crate::handle::Queue;
use crate::kernels::{Backend, Scalar};
use crate::matrix::config::{HostConfig, IndexBase, Operation};
use crate::matrix::ell::ELL_PADDING;
use crate::matrix::{CooMatrix, CsrMatrix, EllMatrix};

/// CPU implementation of [`Backend`]
pub struct HostBackend {
    pool: rayon::ThreadPool,
    config: HostConfig,
    next_queue: AtomicU64,
}

impl HostBackend {
    /// The parameters the backend was connected with
    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Writes `alpha * acc + beta * y` into `y`, never reading `y` when beta is zero
#[inline]
fn scaled_update<T: Scalar>(y: &mut T, alpha: T, acc: T, beta: T) {
    *y = if beta == T::zero() {
        alpha * acc
    } else {
        alpha * acc + beta * *y
    };
}

/// Applies `y := beta * y`, filling with zeros when beta is zero
fn scale_output<T: Scalar>(y: &mut [T], beta: T) {
    if beta == T::zero() {
        y.iter_mut().for_each(|v| *v = T::zero());
    } else if beta != T::one() {
        y.iter_mut().for_each(|v| *v = *v * beta);
    }
}

impl Backend for HostBackend {
    type Config = HostConfig;

    fn connect(config: HostConfig) -> SparseResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.n_threads)
            .thread_name(|i| format!("portsparse-host-{}", i))
            .build()
            .map_err(|e| SparseError::AllocFailed(format!("host worker pool: {}", e)))?;

        debug!("host backend connected with {} threads", pool.current_num_threads());
        Ok(Self {
            pool,
            config,
            next_queue: AtomicU64::new(1),
        })
    }

    fn name(&self) -> &'static str {
        "host"
    }

    // Host work runs to completion on the calling thread, so a queue is
    // only an ordering token here
    fn create_queue(&self) -> SparseResult<Queue> {
        Ok(Queue::from_backend(self.next_queue.fetch_add(1, Ordering::Relaxed)))
    }

    fn axpyi<T: Scalar>(
        &self,
        _queue: Queue,
        alpha: T,
        x_val: &[T],
        x_ind: &[i32],
        y: &mut [T],
        base: IndexBase,
    ) -> SparseResult<()> {
        let offset = base.offset();
        for (&v, &idx) in x_val.iter().zip(x_ind) {
            let slot = &mut y[(idx - offset) as usize];
            *slot = *slot + alpha * v;
        }
        Ok(())
    }

    fn csrmv<T: Scalar>(
        &self,
        _queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &CsrMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()> {
        let offset = descr.index_base().offset();

        if op.is_transposed() {
            scale_output(y, beta);
            for (i, &xi) in x.iter().enumerate() {
                for (col, &val) in a.row_iter(i) {
                    let slot = &mut y[(col - offset) as usize];
                    *slot = *slot + alpha * val * xi;
                }
            }
            return Ok(());
        }

        let min_len = self.config.min_rows_per_task.max(1);
        self.pool.install(|| {
            y.par_iter_mut()
                .with_min_len(min_len)
                .enumerate()
                .for_each(|(i, yi)| {
                    let acc = a
                        .row_iter(i)
                        .fold(T::zero(), |acc, (col, &val)| acc + val * x[(col - offset) as usize]);
                    scaled_update(yi, alpha, acc, beta);
                });
        });
        Ok(())
    }

    fn coomv<T: Scalar>(
        &self,
        _queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &CooMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()> {
        let offset = descr.index_base().offset();
        scale_output(y, beta);

        for (row, col, val) in a.triplets() {
            let (src, dst) = if op.is_transposed() { (row, col) } else { (col, row) };
            let slot = &mut y[(dst - offset) as usize];
            *slot = *slot + alpha * val * x[(src - offset) as usize];
        }
        Ok(())
    }

    fn ellmv<T: Scalar>(
        &self,
        _queue: Queue,
        op: Operation,
        alpha: T,
        descr: &MatDescr,
        a: &EllMatrix<T>,
        x: &[T],
        beta: T,
        y: &mut [T],
    ) -> SparseResult<()> {
        let offset = descr.index_base().offset();
        let width = a.width;

        if op.is_transposed() {
            scale_output(y, beta);
            for (i, &xi) in x.iter().enumerate() {
                for (col, &val) in a.row_entries(i) {
                    let slot = &mut y[(col - offset) as usize];
                    *slot = *slot + alpha * val * xi;
                }
            }
            return Ok(());
        }

        let min_len = self.config.min_rows_per_task.max(1);
        self.pool.install(|| {
            y.par_iter_mut()
                .with_min_len(min_len)
                .enumerate()
                .for_each(|(i, yi)| {
                    let cells = i * width..(i + 1) * width;
                    let acc = a.col_idx[cells.clone()]
                        .iter()
                        .zip(&a.values[cells])
                        .filter(|(col, _)| **col != ELL_PADDING)
                        .fold(T::zero(), |acc, (&col, &val)| acc + val * x[(col - offset) as usize]);
                    scaled_update(yi, alpha, acc, beta);
                });
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_update_ignores_stale_nan() {
        let mut y = f64::NAN;
        scaled_update(&mut y, 2.0, 3.0, 0.0);
        assert_eq!(y, 6.0);

        let mut y = 1.0;
        scaled_update(&mut y, 2.0, 3.0, 0.5);
        assert_eq!(y, 6.5);
    }

    #[test]
    fn test_scale_output() {
        let mut y = vec![f32::NAN, 1.0];
        scale_output(&mut y, 0.0);
        assert_eq!(y, vec![0.0, 0.0]);

        let mut y = vec![2.0f32, 4.0];
        scale_output(&mut y, 0.5);
        assert_eq!(y, vec![1.0, 2.0]);
    }

    #[test]
    fn test_connect() {
        let backend = HostBackend::connect(HostConfig::with_threads(3)).unwrap();
        assert_eq!(backend.name(), "host");
        assert_eq!(backend.config().n_threads, 3);
        backend.disconnect().unwrap();
    }
}
