//! Deterministic exact Hamiltonicity for small graphs, used to cross-check the oracle.

use crate::error::{Error, Result};
use crate::graph::BipartiteGraph;
use crate::oracle::Decision;

/// Largest vertex count accepted by [`has_hamiltonian_cycle`] (2^20 path states).
pub const EXACT_MAX_VERTICES: usize = 20;

// ============================================================================
// Public API
// ============================================================================

/// Returns whether `graph` has a Hamiltonian cycle, by dynamic programming over
/// vertex subsets.
///
/// `reach[mask]` is the set of vertices `v` such that some simple path starting at
/// vertex 0 visits exactly `mask` and ends at `v`.
///
/// # Errors
/// Returns [`Error::ExactSearchTooLarge`] above [`EXACT_MAX_VERTICES`].
pub fn has_hamiltonian_cycle(graph: &BipartiteGraph) -> Result<bool> {
    let n = graph.n();
    if n > EXACT_MAX_VERTICES {
        return Err(Error::ExactSearchTooLarge {
            n,
            limit: EXACT_MAX_VERTICES,
        });
    }
    // A simple cycle needs at least three vertices.
    if n < 3 {
        return Ok(false);
    }

    let adj = graph.adj();
    let full = (1usize << n) - 1;
    let mut reach = vec![0u64; 1 << n];
    reach[1] = 1;

    for mask in (1..=full).step_by(2) {
        let mut ends = reach[mask];
        while ends != 0 {
            let v = ends.trailing_zeros() as usize;
            ends &= ends - 1;
            let mut next = adj[v] & !(mask as u64);
            while next != 0 {
                let w = next.trailing_zeros() as usize;
                next &= next - 1;
                reach[mask | (1 << w)] |= 1u64 << w;
            }
        }
    }

    Ok(reach[full] & adj[0] != 0)
}

/// Outcome of comparing an oracle decision with the exact answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Agreement {
    /// Both say the same thing.
    Agree,
    /// The oracle missed an existing cycle; an accepted statistical outcome.
    FalseNegative,
    /// The oracle claimed a cycle that does not exist; always a defect.
    FalsePositive,
}

/// Compares `decision` with [`has_hamiltonian_cycle`].
///
/// # Errors
/// Returns [`Error::ExactSearchTooLarge`] above [`EXACT_MAX_VERTICES`].
pub fn cross_check(graph: &BipartiteGraph, decision: &Decision) -> Result<Agreement> {
    let exact = has_hamiltonian_cycle(graph)?;
    Ok(match (decision.is_hamiltonian(), exact) {
        (true, false) => Agreement::FalsePositive,
        (false, true) => Agreement::FalseNegative,
        _ => Agreement::Agree,
    })
}

// ============================================================================
// Tests
// ============================================================================
