//! Random field-valued labels on the directed arcs of the graph.
//!
//! Every edge `{u, v}` gets two arc labels, `x(u,v)` and `x(v,u)`. They agree on every
//! edge except those touching the distinguished vertex `s`, where they are forced to
//! differ. Reversing a cycle that avoids `s` then leaves its monomial unchanged, so such
//! cycle covers cancel in pairs over characteristic 2, while a Hamiltonian cycle (which
//! must pass through `s`) does not cancel against its reversal.

use rand::Rng;

use crate::gf::GaloisField;
use crate::graph::BipartiteGraph;

/// The distinguished vertex used by every decision: the first vertex of \(V_1\).
pub const DISTINGUISHED_VERTEX: usize = 0;

/// Dense `n × n` table of arc labels. `get(u, v) != 0` exactly when `{u, v}` is an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeLabeling {
    n: usize,
    labels: Vec<u8>,
}

impl EdgeLabeling {
    /// Draws a fresh labeling.
    ///
    /// Each edge receives one uniform non-zero value on both arcs. Then, for every
    /// neighbor `i` of `s`, one arc of `{s, i}` is redrawn excluding the other arc's
    /// value and zero.
    pub fn sample<R: Rng + ?Sized>(
        graph: &BipartiteGraph,
        field: &GaloisField,
        s: usize,
        rng: &mut R,
    ) -> Self {
        let n = graph.n();
        debug_assert!(s < n);
        let mut labeling = Self {
            n,
            labels: vec![0u8; n * n],
        };

        for (i, j) in graph.edges() {
            let r = field.random_nonzero(rng);
            labeling.set(i, j, r);
            labeling.set(j, i, r);
        }

        for i in 0..n {
            if i == s || labeling.get(i, s) == 0 {
                continue;
            }
            if i < s {
                let r = field.random_excluding(rng, &[labeling.get(i, s), 0]);
                labeling.set(s, i, r);
            } else {
                let r = field.random_excluding(rng, &[labeling.get(s, i), 0]);
                labeling.set(i, s, r);
            }
        }

        labeling
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Label of the arc `u -> v` (zero when there is no edge).
    #[inline(always)]
    pub fn get(&self, u: usize, v: usize) -> u8 {
        self.labels[u * self.n + v]
    }

    #[inline(always)]
    fn set(&mut self, u: usize, v: usize, value: u8) {
        self.labels[u * self.n + v] = value;
    }
}
