//! Labeled cycle cover sum: the polynomial evaluation behind each trial.
//!
//! For every non-empty marking set \(Y \subseteq V_2\) we build the reduced matrix
//! \(T_Y\) over \(V_1\), where \(T_Y[u][v] = \sum_{w \in Y \cap N(u) \cap N(v)} x(u,w)\,x(w,v)\),
//! and XOR its permanent into the running sum. Inclusion-exclusion over \(Y\) keeps only
//! the covers that use every vertex of \(V_2\) exactly once; the asymmetric labels at `s`
//! then cancel everything except Hamiltonian cycles.

use rayon::prelude::*;

use crate::error::Result;
use crate::labels::EdgeLabeling;
use crate::oracle::DecisionContext;
use crate::permanent::{permanent_in_place, SquareMatrix};

/// Enumerations smaller than this always run on the calling thread.
pub const PARALLEL_MIN_SUBSETS: u32 = 1 << 10;

/// Fills `t` with the reduced matrix \(T_Y\) for the marking mask `y`.
///
/// Bit `i` of `y` selects vertex `i + n/2` of \(V_2\).
pub fn reduced_matrix_into(
    ctx: &DecisionContext<'_>,
    labels: &EdgeLabeling,
    y: u32,
    t: &mut SquareMatrix,
) {
    let h = ctx.masks().left_size();
    let field = ctx.field();
    debug_assert_eq!(t.dim(), h);
    t.fill_zero();

    for u in 0..h {
        for v in 0..h {
            if u == v {
                continue;
            }
            let mut z = ctx.masks().get(u, v) & y;
            while z != 0 {
                let w = z.trailing_zeros() as usize + h;
                z &= z - 1;
                t.xor_assign(u, v, field.mul(labels.get(u, w), labels.get(w, v)));
            }
        }
    }
}

#[inline]
fn subset_permanent(
    ctx: &DecisionContext<'_>,
    labels: &EdgeLabeling,
    y: u32,
    scratch: &mut SquareMatrix,
) -> Result<u8> {
    reduced_matrix_into(ctx, labels, y, scratch);
    permanent_in_place(ctx.field(), scratch)
}

/// XOR of \(\mathrm{per}(T_Y)\) over every non-empty \(Y \subseteq V_2\).
///
/// With `parallel` set, large enumerations are split across the rayon pool with one
/// scratch matrix per job. XOR is associative and commutative, so the result does not
/// depend on the split.
///
/// # Errors
/// Propagates the first invariant violation raised by the permanent solver.
pub fn labeled_cycle_cover_sum(
    ctx: &DecisionContext<'_>,
    labels: &EdgeLabeling,
    parallel: bool,
) -> Result<u8> {
    let h = ctx.masks().left_size();
    let subsets = 1u32 << h;

    if parallel && subsets >= PARALLEL_MIN_SUBSETS {
        return (1..subsets)
            .into_par_iter()
            .map_init(
                || SquareMatrix::zeros(h),
                |scratch, y| subset_permanent(ctx, labels, y, scratch),
            )
            .try_reduce(|| 0u8, |a, b| Ok(a ^ b));
    }

    let mut scratch = SquareMatrix::zeros(h);
    let mut sum = 0u8;
    for y in 1..subsets {
        sum ^= subset_permanent(ctx, labels, y, &mut scratch)?;
    }
    Ok(sum)
}

// ============================================================================
// Tests
// ============================================================================
