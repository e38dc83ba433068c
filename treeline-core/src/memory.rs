//! Pre-flight memory estimation and fallible allocation helpers.
//!
//! Provides a conservative estimate of peak memory consumption so callers can
//! reject oversized datasets before any allocation occurs, and small helpers
//! that surface allocation failure as [`TreelineError::OutOfMemory`] instead
//! of aborting.

use crate::error::TreelineError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Safety multiplier applied to the raw estimate to cover heap fragmentation,
/// Rayon thread-local buffers, and transient allocations.
const SAFETY_MULTIPLIER_NUMERATOR: u64 = 3;
const SAFETY_MULTIPLIER_DENOMINATOR: u64 = 2;

/// Size of one directed candidate edge (two `u32` endpoints plus an `f32`).
const DIRECTED_EDGE_BYTES: u64 = 12;

/// Size of one output edge (identical layout to a directed candidate).
const WEIGHTED_EDGE_BYTES: u64 = 12;

const U32_BYTES: u64 = 4;
const F32_BYTES: u64 = 4;
const F64_BYTES: u64 = 8;

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Returns a conservative estimate of peak memory (in bytes) required to
/// build a spanning tree over `point_count` points of dimension `dim`, with
/// the extra dendrogram arrays included when `dendrogram` is set.
///
/// The estimate covers:
///
/// - the hierarchy (permuted coordinates, per-node bounds, children),
/// - labels and the parent table (2N−1 entries each),
/// - per-round state (candidate slots, weights, radii, lower bounds,
///   per-leaf bests),
/// - the output edges, and
/// - in dendrogram mode, parents, heights, and chain metadata.
///
/// A 1.5× safety multiplier is applied to the raw total.
///
/// # Examples
///
/// ```
/// use treeline_core::estimate_peak_bytes;
///
/// let bytes = estimate_peak_bytes(1_000, 3, true);
/// assert!(bytes > 0, "estimate must be positive for non-empty datasets");
///
/// let zero = estimate_peak_bytes(0, 3, false);
/// assert_eq!(zero, 0, "empty dataset requires no memory");
/// ```
#[must_use]
pub fn estimate_peak_bytes(point_count: usize, dim: usize, dendrogram: bool) -> u64 {
    if point_count == 0 {
        return 0;
    }

    let n = point_count as u64;
    let d = dim as u64;
    let nodes = n.saturating_mul(2).saturating_sub(1);

    // Hierarchy: permuted coordinates, two bounds planes, children, the
    // leaf-to-point map.
    let hierarchy = n
        .saturating_mul(d)
        .saturating_mul(F32_BYTES)
        .saturating_add(nodes.saturating_mul(d).saturating_mul(2).saturating_mul(F32_BYTES))
        .saturating_add(n.saturating_mul(2).saturating_mul(U32_BYTES))
        .saturating_add(n.saturating_mul(U32_BYTES));

    // Labels and the parent table.
    let labels = nodes.saturating_mul(2).saturating_mul(U32_BYTES);

    // Per-round state: candidate slots (u64), weights, radii, lower bounds,
    // per-leaf bests, core distances.
    let round_state = n
        .saturating_mul(8)
        .saturating_add(n.saturating_mul(3).saturating_mul(F32_BYTES))
        .saturating_add(n.saturating_mul(DIRECTED_EDGE_BYTES))
        .saturating_add(n.saturating_mul(F32_BYTES));

    // Output edges.
    let edges = n.saturating_mul(WEIGHTED_EDGE_BYTES);

    let dendrogram_arrays = if dendrogram {
        // Parents over edges and leaves, heights, vertex-parent trace, and
        // chain metadata (offsets, levels, per-edge chain index).
        nodes
            .saturating_mul(U32_BYTES)
            .saturating_add(n.saturating_mul(F32_BYTES))
            .saturating_add(n.saturating_mul(U32_BYTES))
            .saturating_add(n.saturating_mul(3).saturating_mul(U32_BYTES))
            .saturating_add(n.saturating_mul(F64_BYTES))
    } else {
        0
    };

    let subtotal = hierarchy
        .saturating_add(labels)
        .saturating_add(round_state)
        .saturating_add(edges)
        .saturating_add(dendrogram_arrays);

    subtotal
        .saturating_mul(SAFETY_MULTIPLIER_NUMERATOR)
        .saturating_div(SAFETY_MULTIPLIER_DENOMINATOR)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Selects the appropriate binary unit and divisor for a byte count.
fn binary_unit(bytes: u64) -> (&'static str, u64) {
    if bytes >= TIB {
        ("TiB", TIB)
    } else if bytes >= GIB {
        ("GiB", GIB)
    } else if bytes >= MIB {
        ("MiB", MIB)
    } else {
        ("KiB", KIB)
    }
}

/// Formats a byte count as a human-readable string using binary units.
///
/// # Examples
///
/// ```
/// use treeline_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        return format!("{bytes} B");
    }
    let (label, divisor) = binary_unit(bytes);
    format!("{:.1} {label}", bytes as f64 / divisor as f64)
}

// ---------------------------------------------------------------------------
// Fallible allocation
// ---------------------------------------------------------------------------

/// Allocates a vector of `len` clones of `value`, surfacing failure as
/// [`TreelineError::OutOfMemory`].
pub(crate) fn try_filled_vec<T: Clone>(
    value: T,
    len: usize,
    resource: &'static str,
) -> Result<Vec<T>, TreelineError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| out_of_memory::<T>(len, resource))?;
    values.resize(len, value);
    Ok(values)
}

/// Allocates a vector of `len` values produced by `make`, surfacing failure
/// as [`TreelineError::OutOfMemory`].
pub(crate) fn try_vec_from_fn<T>(
    len: usize,
    resource: &'static str,
    make: impl FnMut(usize) -> T,
) -> Result<Vec<T>, TreelineError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| out_of_memory::<T>(len, resource))?;
    values.extend((0..len).map(make));
    Ok(values)
}

fn out_of_memory<T>(len: usize, resource: &'static str) -> TreelineError {
    TreelineError::OutOfMemory {
        resource,
        requested_bytes: (len as u64).saturating_mul(std::mem::size_of::<T>() as u64),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
