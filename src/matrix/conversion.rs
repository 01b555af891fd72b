//! Conversion functions between matrix formats
//!
//! Every conversion is split into a sizing pass and a fill pass so that the
//! caller can allocate the output exactly once in between:
//!
//! | conversion | sizing                          | fill                         |
//! |------------|---------------------------------|------------------------------|
//! | CSR → COO  | nnz (known)                     | [`csr2coo`] / [`csr_to_coo`] |
//! | COO → CSR  | m + 1 (known)                   | [`coo2csr`] / [`coo_to_csr`] |
//! | CSR → ELL  | [`csr2ell_width`]               | [`csr2ell`]                  |
//! | CSR → HYB  | [`hyb_ell_width`], COO overflow | [`csr2hyb`]                  |
//!
//! Inputs are validated in full before any output is written. Sources are
//! never modified.

use log::{debug, warn};
use num_traits::Num;

use crate::descriptor::MatDescr;
use crate::error::{SparseError, SparseResult};
use crate::handle::Handle;
use crate::kernels::Backend;
use crate::matrix::config::{HybAutoPolicy, HybPartition, IndexBase};
use crate::matrix::csr::{validate_indices, validate_row_ptr};
use crate::matrix::ell::ELL_PADDING;
use crate::matrix::{CooMatrix, CsrMatrix, EllMatrix, HybMatrix};
use crate::utils::{check_index_range, exclusive_scan};

fn check_len(arg: &'static str, got: usize, expected: usize) -> SparseResult<()> {
    if got != expected {
        return Err(SparseError::invalid(
            arg,
            format!("length {} but {} required", got, expected),
        ));
    }
    Ok(())
}

/// Row lengths of a validated row pointer
fn row_lengths(row_ptr: &[i32]) -> impl Iterator<Item = usize> + '_ {
    row_ptr.windows(2).map(|w| (w[1] - w[0]) as usize)
}

/// Expands a CSR row pointer into one row index per entry
///
/// `coo_row_ind` must hold `nnz` slots. Row indices are written under
/// `idx_base`, the same base `csr_row_ptr` is stored under.
pub fn csr2coo<B: Backend>(
    handle: &Handle<B>,
    csr_row_ptr: &[i32],
    nnz: usize,
    m: usize,
    coo_row_ind: &mut [i32],
    idx_base: IndexBase,
) -> SparseResult<()> {
    check_index_range("m", m)?;
    check_len("csr_row_ptr", csr_row_ptr.len(), m + 1)?;
    check_len("coo_row_ind", coo_row_ind.len(), nnz)?;
    validate_row_ptr(csr_row_ptr, nnz, idx_base)?;

    expand_row_ptr(csr_row_ptr, idx_base, coo_row_ind);

    debug!("csr2coo on '{}': m={} nnz={}", handle.backend().name(), m, nnz);
    Ok(())
}

/// Fills `out` with the row index of every entry, emitted under `out_base`
fn expand_row_ptr(row_ptr: &[i32], out_base: IndexBase, out: &mut [i32]) {
    let origin = row_ptr[0];
    for (i, w) in row_ptr.windows(2).enumerate() {
        let row = i as i32 + out_base.offset();
        let (start, end) = ((w[0] - origin) as usize, (w[1] - origin) as usize);
        out[start..end].iter_mut().for_each(|r| *r = row);
    }
}

/// Builds a CSR row pointer from COO row indices
///
/// Rows may appear in any order; the row pointer only records how many
/// entries each row owns. `csr_row_ptr` must hold `m + 1` slots and
/// `csr_row_ptr[0]` is set to the base.
pub fn coo2csr<B: Backend>(
    handle: &Handle<B>,
    coo_row_ind: &[i32],
    nnz: usize,
    m: usize,
    csr_row_ptr: &mut [i32],
    idx_base: IndexBase,
) -> SparseResult<()> {
    check_index_range("m", m)?;
    check_index_range("nnz", nnz)?;
    check_len("coo_row_ind", coo_row_ind.len(), nnz)?;
    check_len("csr_row_ptr", csr_row_ptr.len(), m + 1)?;
    validate_indices("coo_row_ind", coo_row_ind, m, idx_base)?;

    let counts = count_rows(coo_row_ind, m, idx_base);
    csr_row_ptr.copy_from_slice(&exclusive_scan(&counts, idx_base.offset()));

    debug!("coo2csr on '{}': m={} nnz={}", handle.backend().name(), m, nnz);
    Ok(())
}

fn count_rows(row_ind: &[i32], m: usize, base: IndexBase) -> Vec<i32> {
    let mut counts = vec![0i32; m];
    for &r in row_ind {
        counts[(r - base.offset()) as usize] += 1;
    }
    counts
}

/// Converts a CSR matrix to COO, re-basing indices from `descr_a` to `descr_c`
///
/// Entries come out in CSR storage order, so rows are grouped and
/// within-row order is unchanged.
pub fn csr_to_coo<B, T>(
    handle: &Handle<B>,
    descr_a: &MatDescr,
    a: &CsrMatrix<T>,
    descr_c: &MatDescr,
) -> SparseResult<CooMatrix<T>>
where
    B: Backend,
    T: Copy + Num,
{
    let (base_a, base_c) = (descr_a.index_base(), descr_c.index_base());
    a.validate(base_a)?;

    let nnz = a.nnz();
    let mut row_idx = vec![0; nnz];
    expand_row_ptr(&a.row_ptr, base_c, &mut row_idx);
    let col_idx = a.col_idx.iter().map(|&c| base_a.rebase(c, base_c)).collect();

    debug!("csr_to_coo on '{}': {}x{} nnz={}", handle.backend().name(), a.n_rows, a.n_cols, nnz);
    CooMatrix::new(a.n_rows, a.n_cols, row_idx, col_idx, a.values.clone())
}

/// Converts a COO matrix to CSR, re-basing indices from `descr_a` to `descr_c`
///
/// Entries are grouped by row with a stable counting sort: entries of the
/// same row keep their COO order, and duplicate (row, col) pairs are kept.
pub fn coo_to_csr<B, T>(
    handle: &Handle<B>,
    descr_a: &MatDescr,
    a: &CooMatrix<T>,
    descr_c: &MatDescr,
) -> SparseResult<CsrMatrix<T>>
where
    B: Backend,
    T: Copy + Num,
{
    let (base_a, base_c) = (descr_a.index_base(), descr_c.index_base());
    a.validate(base_a)?;
    let nnz = a.nnz();
    check_index_range("nnz", nnz)?;

    // Count pass
    let counts = count_rows(&a.row_idx, a.n_rows, base_a);
    let row_ptr = exclusive_scan(&counts, base_c.offset());

    // Fill pass
    let mut next: Vec<usize> = row_ptr[..a.n_rows]
        .iter()
        .map(|&p| (p - base_c.offset()) as usize)
        .collect();
    let mut col_idx = vec![0; nnz];
    let mut values = vec![T::zero(); nnz];
    for (row, col, val) in a.triplets() {
        let slot = &mut next[(row - base_a.offset()) as usize];
        col_idx[*slot] = base_a.rebase(col, base_c);
        values[*slot] = val;
        *slot += 1;
    }

    debug!("coo_to_csr on '{}': {}x{} nnz={}", handle.backend().name(), a.n_rows, a.n_cols, nnz);
    CsrMatrix::new(a.n_rows, a.n_cols, row_ptr, col_idx, values)
}

/// Computes the ELL width needed to hold a CSR matrix: its longest row
///
/// Returns 0 when `m` is 0. This is the sizing pass for [`csr2ell`].
pub fn csr2ell_width<B: Backend>(
    handle: &Handle<B>,
    m: usize,
    descr_a: &MatDescr,
    csr_row_ptr: &[i32],
    _descr_c: &MatDescr,
) -> SparseResult<usize> {
    check_index_range("m", m)?;
    check_len("csr_row_ptr", csr_row_ptr.len(), m + 1)?;
    let base = descr_a.index_base();
    let span = i64::from(csr_row_ptr[m]) - i64::from(csr_row_ptr[0]);
    let nnz = usize::try_from(span).map_err(|_| {
        SparseError::invalid("csr_row_ptr", format!("row pointer spans {} entries", span))
    })?;
    validate_row_ptr(csr_row_ptr, nnz, base)?;

    let width = row_lengths(csr_row_ptr).max().unwrap_or(0);
    debug!("csr2ell_width on '{}': m={} width={}", handle.backend().name(), m, width);
    Ok(width)
}

/// Copies a CSR matrix into a preallocated ELL matrix
///
/// `c` must have the shape of `a` and a width at least as large as the one
/// [`csr2ell_width`] reports. Row i's entries fill the first slots of its ELL
/// row in CSR order; the remaining slots get column [`ELL_PADDING`] and a
/// zero value. Column indices are re-based from `descr_a` to `descr_c`.
///
/// # Errors
///
/// - `MatrixTypeNotSupported` unless `descr_a` describes a general matrix
/// - `InvalidValue` if the shapes disagree or the width is too small
pub fn csr2ell<B, T>(
    handle: &Handle<B>,
    descr_a: &MatDescr,
    a: &CsrMatrix<T>,
    descr_c: &MatDescr,
    c: &mut EllMatrix<T>,
) -> SparseResult<()>
where
    B: Backend,
    T: Copy + Num,
{
    descr_a.ensure_general("csr2ell")?;
    let (base_a, base_c) = (descr_a.index_base(), descr_c.index_base());
    a.validate(base_a)?;

    if (c.n_rows, c.n_cols) != (a.n_rows, a.n_cols) {
        return Err(SparseError::invalid(
            "ell",
            format!(
                "ELL shape {}x{} differs from CSR shape {}x{}",
                c.n_rows,
                c.n_cols,
                a.n_rows,
                a.n_cols
            ),
        ));
    }
    let required = row_lengths(&a.row_ptr).max().unwrap_or(0);
    if c.width < required {
        warn!("csr2ell rejected: width {} below longest row {}", c.width, required);
        return Err(SparseError::invalid(
            "ell_width",
            format!("{} is smaller than the longest row ({})", c.width, required),
        ));
    }
    c.check_layout()?;

    fill_ell(a, base_a, base_c, c.width, &mut c.col_idx, &mut c.values, |_| {});

    debug!(
        "csr2ell on '{}': m={} nnz={} width={}",
        handle.backend().name(),
        a.n_rows,
        a.nnz(),
        c.width
    );
    Ok(())
}

/// Writes the first `width` entries of every row into ELL arrays
///
/// Entries past `width` are handed to `overflow` as (row, col, value) with
/// indices already under `base_c`.
fn fill_ell<T, F>(
    a: &CsrMatrix<T>,
    base_a: IndexBase,
    base_c: IndexBase,
    width: usize,
    ell_col: &mut [i32],
    ell_val: &mut [T],
    mut overflow: F,
) where
    T: Copy + Num,
    F: FnMut((i32, i32, T)),
{
    for i in 0..a.n_rows {
        let cells = i * width..(i + 1) * width;
        let (row_col, row_val) = (&mut ell_col[cells.clone()], &mut ell_val[cells]);
        let mut used = 0;

        for (rank, (col, &val)) in a.row_iter(i).enumerate() {
            let col = base_a.rebase(col, base_c);
            if rank < width {
                row_col[rank] = col;
                row_val[rank] = val;
                used += 1;
            } else {
                overflow((i as i32 + base_c.offset(), col, val));
            }
        }

        row_col[used..].iter_mut().for_each(|c| *c = ELL_PADDING);
        row_val[used..].iter_mut().for_each(|v| *v = T::zero());
    }
}

/// Picks the storage-minimising ELL width for the automatic HYB partition
///
/// Minimises `ell_slot_cost * m * w + coo_entry_cost * overflow(w)` over
/// `0 ..= max_row_len`, where `overflow(w)` is the number of entries beyond
/// the first `w` of each row. Ties resolve to the smallest width, so the
/// result is deterministic.
pub fn auto_ell_width(row_lengths: &[usize], policy: HybAutoPolicy) -> usize {
    let m = row_lengths.len();
    let max_len = row_lengths.iter().copied().max().unwrap_or(0);

    let mut histogram = vec![0usize; max_len + 1];
    for &len in row_lengths {
        histogram[len] += 1;
    }

    let ell_cost = policy.ell_slot_cost as u128 * m as u128;
    let coo_cost = policy.coo_entry_cost as u128;

    let mut overflow: u128 = row_lengths.iter().map(|&l| l as u128).sum();
    let mut longer = m - histogram[0]; // rows with len > w
    let mut best = (coo_cost * overflow, 0);

    for w in 1..=max_len {
        overflow -= longer as u128;
        longer -= histogram[w];
        let cost = ell_cost * w as u128 + coo_cost * overflow;
        if cost < best.0 {
            best = (cost, w);
        }
    }

    best.1
}

/// Sizing pass for [`csr2hyb`]: the ELL width a partition policy selects
///
/// `user_ell_width` is only consulted for [`HybPartition::User`], and is
/// rejected with `InvalidValue` when the ELL part it implies cannot be
/// addressed with 32-bit indices.
pub fn hyb_ell_width<B, T>(
    handle: &Handle<B>,
    descr: &MatDescr,
    a: &CsrMatrix<T>,
    user_ell_width: usize,
    partition: HybPartition,
) -> SparseResult<usize>
where
    B: Backend,
    T: Copy + Num,
{
    a.validate(descr.index_base())?;

    Ok(match partition {
        HybPartition::User => {
            let cells = a.n_rows.checked_mul(user_ell_width).unwrap_or(usize::MAX);
            check_index_range("user_ell_width", cells)?;
            user_ell_width
        }
        HybPartition::Max => row_lengths(&a.row_ptr).max().unwrap_or(0),
        HybPartition::Auto => {
            let lengths: Vec<usize> = row_lengths(&a.row_ptr).collect();
            auto_ell_width(&lengths, handle.hyb_auto_policy())
        }
    })
}

/// Converts a CSR matrix into a HYB matrix
///
/// The ELL width T comes from `partition` (see [`hyb_ell_width`]). In every
/// row, the first T entries go to the ELL part and the rest go to the COO
/// part with their true row index. Both parts keep the index base of `descr`.
/// A previously built `hyb` is replaced.
///
/// # Errors
///
/// - `MatrixTypeNotSupported` unless `descr` describes a general matrix
/// - `InvalidValue` if `a` is inconsistent with the descriptor's base
pub fn csr2hyb<B, T>(
    handle: &Handle<B>,
    descr: &MatDescr,
    a: &CsrMatrix<T>,
    hyb: &mut HybMatrix<T>,
    user_ell_width: usize,
    partition: HybPartition,
) -> SparseResult<()>
where
    B: Backend,
    T: Copy + Num,
{
    descr.ensure_general("csr2hyb")?;
    let width = hyb_ell_width(handle, descr, a, user_ell_width, partition)?;
    let base = descr.index_base();

    // Sizing pass for the overflow
    let coo_nnz: usize = row_lengths(&a.row_ptr).map(|len| len.saturating_sub(width)).sum();

    let mut ell = EllMatrix::with_width(a.n_rows, a.n_cols, width)?;
    let mut coo_row = Vec::with_capacity(coo_nnz);
    let mut coo_col = Vec::with_capacity(coo_nnz);
    let mut coo_val = Vec::with_capacity(coo_nnz);

    fill_ell(a, base, base, width, &mut ell.col_idx, &mut ell.values, |(r, c, v)| {
        coo_row.push(r);
        coo_col.push(c);
        coo_val.push(v);
    });

    if coo_row.len() != coo_nnz {
        return Err(SparseError::InternalError(format!(
            "HYB overflow sized {} but filled {}",
            coo_nnz,
            coo_row.len()
        )));
    }
    let coo = CooMatrix::new(a.n_rows, a.n_cols, coo_row, coo_col, coo_val)?;

    debug!(
        "csr2hyb on '{}': m={} nnz={} partition={:?} width={} coo_nnz={}",
        handle.backend().name(),
        a.n_rows,
        a.nnz(),
        partition,
        width,
        coo_nnz
    );
    hyb.populate(partition, ell, coo);
    Ok(())
}
