//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_dense, to_sprs_csr};

use crate::error::{SparseError, SparseResult};

/// Computes an exclusive prefix sum (scan) starting at `start`
///
/// The output has one more element than the input; the last element is
/// `start` plus the total.
pub fn exclusive_scan(input: &[i32], start: i32) -> Vec<i32> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = start;

    result.push(sum);

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Ensures a count is addressable with 32-bit indices
pub fn check_index_range(arg: &'static str, count: usize) -> SparseResult<()> {
    if count > i32::MAX as usize {
        return Err(SparseError::invalid(
            arg,
            format!("{} exceeds the 32-bit index range", count),
        ));
    }
    Ok(())
}
