//! Level-1 contract: sparse vector update

use log::{trace, warn};

use crate::error::{SparseError, SparseResult};
use crate::handle::Handle;
use crate::kernels::{Backend, Scalar, ScalarArg};
use crate::matrix::config::IndexBase;
use crate::matrix::csr::validate_indices;

/// Adds a scaled sparse vector to a dense vector: `y[x_ind[i]] += alpha * x_val[i]`
///
/// `x_ind` holds indices under `idx_base`; every index must address `y`.
pub fn axpyi<B, T>(
    handle: &Handle<B>,
    alpha: ScalarArg<'_, T>,
    x_val: &[T],
    x_ind: &[i32],
    y: &mut [T],
    idx_base: IndexBase,
) -> SparseResult<()>
where
    B: Backend,
    T: Scalar,
{
    if x_val.len() != x_ind.len() {
        warn!("axpyi rejected: {} values but {} indices", x_val.len(), x_ind.len());
        return Err(SparseError::invalid(
            "x_ind",
            format!("{} indices for {} values", x_ind.len(), x_val.len()),
        ));
    }
    validate_indices("x_ind", x_ind, y.len(), idx_base)?;

    let queue = handle.active_queue();
    let alpha = alpha.resolve("alpha", handle.pointer_mode(), handle.backend(), queue)?;

    trace!("axpyi: nnz={} len(y)={} on queue {}", x_val.len(), y.len(), queue.id());
    if x_val.is_empty() {
        return Ok(());
    }
    handle
        .backend()
        .axpyi(queue, alpha, x_val, x_ind, y, idx_base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use crate::handle::PointerMode;
    use crate::kernels::HostBackend;
    use crate::matrix::config::HostConfig;

    fn handle() -> Handle<HostBackend> {
        Handle::create(HostConfig::with_threads(1)).unwrap()
    }

    #[test]
    fn test_axpyi_zero_based() {
        let handle = handle();
        let mut y = vec![1.0f64; 5];
        axpyi(&handle, ScalarArg::Host(2.0), &[1.0, 3.0], &[0, 4], &mut y, IndexBase::Zero)
            .unwrap();
        assert_eq!(y, vec![3.0, 1.0, 1.0, 1.0, 7.0]);
    }

    #[test]
    fn test_axpyi_one_based() {
        let handle = handle();
        let mut y = vec![0.0f32; 3];
        axpyi(&handle, ScalarArg::Host(1.0), &[5.0], &[3], &mut y, IndexBase::One).unwrap();
        assert_eq!(y, vec![0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_axpyi_rejects_out_of_range() {
        let handle = handle();
        let mut y = vec![0.0f64; 3];
        let err = axpyi(&handle, ScalarArg::Host(1.0), &[1.0], &[3], &mut y, IndexBase::Zero)
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
        assert_eq!(y, vec![0.0; 3]);
    }

    #[test]
    fn test_axpyi_device_alpha() {
        let mut handle = handle();
        handle.set_pointer_mode(PointerMode::Device);
        let alpha = handle.upload_scalar(3.0f64).unwrap();
        let mut y = vec![1.0f64; 2];
        axpyi(&handle, ScalarArg::Device(&alpha), &[1.0], &[1], &mut y, IndexBase::Zero).unwrap();
        assert_eq!(y, vec![1.0, 4.0]);

        // A host scalar is not accepted in device pointer mode
        let err = axpyi(&handle, ScalarArg::Host(1.0), &[1.0], &[1], &mut y, IndexBase::Zero)
            .unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }
}
