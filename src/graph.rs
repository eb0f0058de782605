//! Balanced bipartite graphs on at most 50 vertices, stored as `u64` neighbor bitsets.
//!
//! Vertices `0..n/2` form the part \(V_1\), vertices `n/2..n` form \(V_2\). Edges only
//! join the two parts. This module also holds the edge-list input builder.

use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Largest supported vertex count.
pub const MAX_VERTICES: usize = 50;

/// Largest supported marking set \(|V_2|\); subsets of it are enumerated as `u32` masks.
pub const MAX_MARKING_SET: usize = MAX_VERTICES / 2;

#[inline(always)]
const fn bit(v: usize) -> u64 {
    1u64 << v
}

/// Side of the bipartition a vertex belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    /// \(V_1 = \{0, \dots, n/2 - 1\}\).
    Left,
    /// \(V_2 = \{n/2, \dots, n - 1\}\).
    Right,
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Left => write!(f, "V1"),
            Part::Right => write!(f, "V2"),
        }
    }
}

// ============================================================================
// BipartiteGraph
// ============================================================================

/// An undirected balanced bipartite graph.
///
/// Invariants (checked by every constructor):
/// - `n` is even and `2 <= n <= 50`;
/// - `adj[v]` has no bits at or above `n` and no self-loop;
/// - adjacency is symmetric and never joins two vertices of the same part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BipartiteGraph {
    n: usize,
    adj: Vec<u64>,
}

impl BipartiteGraph {
    /// Creates an edgeless graph on `n` vertices.
    ///
    /// # Errors
    /// Returns [`Error::InvalidVertexCount`] unless `n` is even and within `[2, 50]`.
    pub fn new(n: usize) -> Result<Self> {
        if n < 2 || n > MAX_VERTICES || n % 2 != 0 {
            return Err(Error::InvalidVertexCount { n });
        }
        Ok(Self {
            n,
            adj: vec![0u64; n],
        })
    }

    /// Creates a graph from a list of undirected edges.
    ///
    /// # Errors
    /// Fails on an invalid `n` or on any edge rejected by [`add_edge`](Self::add_edge).
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut g = Self::new(n)?;
        for &(u, v) in edges {
            g.add_edge(u, v)?;
        }
        Ok(g)
    }

    /// Creates a graph from neighbor bitsets, validating every invariant.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn from_adj(adj: Vec<u64>) -> Result<Self> {
        let n = adj.len();
        let mut g = Self::new(n)?;
        let valid = bit(n) - 1;
        for (u, &row) in adj.iter().enumerate() {
            if row & !valid != 0 {
                return Err(Error::VertexOutOfRange {
                    vertex: (row & !valid).trailing_zeros() as usize,
                    n,
                });
            }
            if row & bit(u) != 0 {
                return Err(Error::SelfLoop { vertex: u });
            }
            let mut t = row;
            while t != 0 {
                let v = t.trailing_zeros() as usize;
                t &= t - 1;
                if adj[v] & bit(u) == 0 {
                    return Err(Error::NotSymmetric { u, v });
                }
                if g.part(u) == g.part(v) {
                    return Err(Error::EdgeWithinPart { u, v });
                }
            }
        }
        g.adj = adj;
        Ok(g)
    }

    /// Samples a random graph where each cross edge is present with probability `p`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidVertexCount`] for an unsupported `n`.
    pub fn new_random<R: Rng>(rng: &mut R, n: usize, p: f64) -> Result<Self> {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let mut g = Self::new(n)?;
        let h = g.half();
        for u in 0..h {
            for v in h..n {
                if rng.random_bool(p) {
                    g.adj[u] |= bit(v);
                    g.adj[v] |= bit(u);
                }
            }
        }
        Ok(g)
    }

    /// Inserts the undirected edge `{u, v}`. Inserting an existing edge is a no-op.
    ///
    /// # Errors
    /// Rejects out-of-range endpoints, self-loops, and edges inside one part.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<()> {
        for vertex in [u, v] {
            if vertex >= self.n {
                return Err(Error::VertexOutOfRange { vertex, n: self.n });
            }
        }
        if u == v {
            return Err(Error::SelfLoop { vertex: u });
        }
        if self.part(u) == self.part(v) {
            return Err(Error::EdgeWithinPart { u, v });
        }
        self.adj[u] |= bit(v);
        self.adj[v] |= bit(u);
        Ok(())
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Size of each part, `n / 2`.
    #[inline(always)]
    pub fn half(&self) -> usize {
        self.n / 2
    }

    /// Which part `v` belongs to.
    #[inline(always)]
    pub fn part(&self, v: usize) -> Part {
        debug_assert!(v < self.n);
        if v < self.half() {
            Part::Left
        } else {
            Part::Right
        }
    }

    /// Neighbor bitsets, one per vertex.
    #[inline(always)]
    pub fn adj(&self) -> &[u64] {
        &self.adj
    }

    /// Returns whether the edge `{u, v}` exists.
    #[inline(always)]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        debug_assert!(u < self.n && v < self.n);
        self.adj[u] & bit(v) != 0
    }

    /// Degree of `v`.
    #[inline(always)]
    pub fn degree(&self, v: usize) -> u32 {
        self.adj[v].count_ones()
    }

    /// Smallest vertex degree.
    pub fn min_degree(&self) -> u32 {
        self.adj.iter().map(|row| row.count_ones()).min().unwrap_or(0)
    }

    /// Number of undirected edges. Every edge runs between the parts.
    pub fn edge_count(&self) -> usize {
        self.adj[..self.half()]
            .iter()
            .map(|row| row.count_ones() as usize)
            .sum()
    }

    /// Iterates over the edges `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |u| {
            let mut t = self.adj[u] & !(bit(u + 1) - 1);
            std::iter::from_fn(move || {
                if t == 0 {
                    return None;
                }
                let v = t.trailing_zeros() as usize;
                t &= t - 1;
                Some((u, v))
            })
        })
    }

    /// Neighbors of `u` in \(V_2\) as a mask over `V2` indices (bit `w` is vertex `w + n/2`).
    #[inline(always)]
    pub fn right_neighbors(&self, u: usize) -> u32 {
        debug_assert_eq!(self.part(u), Part::Left);
        (self.adj[u] >> self.half()) as u32
    }

    /// Precomputes the common-neighbor masks of every ordered pair in \(V_1\).
    pub fn neighbor_masks(&self) -> NeighborMasks {
        let h = self.half();
        let mut masks = vec![0u32; h * h];
        for u in 0..h {
            let nu = self.right_neighbors(u);
            for v in 0..h {
                if u != v {
                    masks[u * h + v] = nu & self.right_neighbors(v);
                }
            }
        }
        NeighborMasks { h, masks }
    }
}

// ============================================================================
// NeighborMasks
// ============================================================================

/// For every ordered pair `(u, v)` of distinct \(V_1\) vertices, the set of \(V_2\)
/// vertices adjacent to both, as a mask over `V2` indices.
///
/// The diagonal is always empty. Independent of any randomization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborMasks {
    h: usize,
    masks: Vec<u32>,
}

impl NeighborMasks {
    /// Size of \(V_1\).
    #[inline(always)]
    pub fn left_size(&self) -> usize {
        self.h
    }

    /// Common neighbors of `u` and `v`.
    #[inline(always)]
    pub fn get(&self, u: usize, v: usize) -> u32 {
        self.masks[u * self.h + v]
    }

    /// Total number of `(u, v, w)` with `u != v` and `w` adjacent to both.
    pub fn common_pair_count(&self) -> usize {
        self.masks.iter().map(|m| m.count_ones() as usize).sum()
    }
}

// ============================================================================
// Edge-list input
// ============================================================================

/// Syntax errors in the edge-list input format.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The `n K` header is missing.
    #[error("missing header: expected vertex count and edge count")]
    MissingHeader,

    /// A numeric field could not be parsed.
    #[error("invalid {field}: {token:?} is not a non-negative integer")]
    InvalidInteger {
        /// Which header field was malformed.
        field: &'static str,
        /// The offending token.
        token: String,
    },

    /// The input ended before all announced edges were read.
    #[error("truncated edge list: expected {expected} edges, found {found}")]
    TruncatedEdgeList {
        /// Announced edge count.
        expected: usize,
        /// Complete edges actually present.
        found: usize,
    },

    /// More distinct labels appeared on one side than that part can hold.
    #[error("label {label:?} does not fit in {part}: it already holds {capacity} distinct labels")]
    PartOverflow {
        /// Side the label was read for.
        part: Part,
        /// The label that did not fit.
        label: String,
        /// Size of the part.
        capacity: usize,
    },
}

/// Assigns stable indices to labels in first-seen order, up to a fixed capacity.
struct LabelIndex<'a> {
    part: Part,
    labels: Vec<&'a str>,
    capacity: usize,
}

impl<'a> LabelIndex<'a> {
    fn new(part: Part, capacity: usize) -> Self {
        Self {
            part,
            labels: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn index_of(&mut self, label: &'a str) -> std::result::Result<usize, ParseError> {
        if let Some(i) = self.labels.iter().position(|&l| l == label) {
            return Ok(i);
        }
        if self.labels.len() == self.capacity {
            return Err(ParseError::PartOverflow {
                part: self.part,
                label: label.to_owned(),
                capacity: self.capacity,
            });
        }
        self.labels.push(label);
        Ok(self.labels.len() - 1)
    }
}

/// Parses the whitespace-separated edge-list format.
///
/// Layout: `n K` followed by `K` pairs `a b`. The first label of each pair names a
/// vertex of \(V_1\), the second a vertex of \(V_2\). Labels are arbitrary tokens; each
/// side numbers its distinct labels in first-seen order, so `a` becomes vertex `p` and
/// `b` becomes vertex `n/2 + q`. Repeated edges are accepted and stored once; tokens
/// after the last announced pair are ignored.
///
/// # Errors
/// Returns [`Error::Parse`] for malformed input and the graph errors of
/// [`BipartiteGraph::new`] for an unsupported `n`.
pub fn parse_edge_list(text: &str) -> Result<BipartiteGraph> {
    let mut tokens = text.split_whitespace();

    let n = parse_header_field(tokens.next(), "vertex count")?;
    let k = parse_header_field(tokens.next(), "edge count")?;

    let mut graph = BipartiteGraph::new(n)?;
    let h = graph.half();
    let mut left = LabelIndex::new(Part::Left, h);
    let mut right = LabelIndex::new(Part::Right, h);

    for found in 0..k {
        let (Some(a), Some(b)) = (tokens.next(), tokens.next()) else {
            return Err(ParseError::TruncatedEdgeList { expected: k, found }.into());
        };
        let p = left.index_of(a)?;
        let q = right.index_of(b)?;
        graph.add_edge(p, h + q)?;
    }

    if tokens.next().is_some() {
        log::debug!("ignoring input after {k} edges");
    }
    Ok(graph)
}

fn parse_header_field(token: Option<&str>, field: &'static str) -> Result<usize> {
    let token = token.ok_or(ParseError::MissingHeader)?;
    token.parse::<usize>().map_err(|_| {
        ParseError::InvalidInteger {
            field,
            token: token.to_owned(),
        }
        .into()
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    #[test]
    fn rejects_unsupported_vertex_counts() {
        for n in [0, 1, 3, 51, 52, 64] {
            assert_eq!(
                BipartiteGraph::new(n).unwrap_err(),
                Error::InvalidVertexCount { n }
            );
        }
        for n in (2..=50).step_by(2) {
            assert!(BipartiteGraph::new(n).is_ok());
        }
    }

    #[test]
    fn add_edge_validates_endpoints() {
        let mut g = BipartiteGraph::new(4).unwrap();
        assert_eq!(g.add_edge(0, 1).unwrap_err(), Error::EdgeWithinPart { u: 0, v: 1 });
        assert_eq!(g.add_edge(2, 3).unwrap_err(), Error::EdgeWithinPart { u: 2, v: 3 });
        assert_eq!(g.add_edge(1, 1).unwrap_err(), Error::SelfLoop { vertex: 1 });
        assert_eq!(
            g.add_edge(0, 4).unwrap_err(),
            Error::VertexOutOfRange { vertex: 4, n: 4 }
        );
        g.add_edge(2, 0).unwrap();
        g.add_edge(0, 2).unwrap();
        assert!(g.has_edge(0, 2) && g.has_edge(2, 0));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn from_adj_checks_invariants() {
        // 0 -- 2 only in one direction.
        assert_eq!(
            BipartiteGraph::from_adj(vec![0b0100, 0, 0, 0]).unwrap_err(),
            Error::NotSymmetric { u: 0, v: 2 }
        );
        assert_eq!(
            BipartiteGraph::from_adj(vec![0b0010, 0b0001, 0, 0]).unwrap_err(),
            Error::EdgeWithinPart { u: 0, v: 1 }
        );
        assert_eq!(
            BipartiteGraph::from_adj(vec![0b0001, 0, 0, 0]).unwrap_err(),
            Error::SelfLoop { vertex: 0 }
        );
        assert_eq!(
            BipartiteGraph::from_adj(vec![0b1_0000, 0, 0, 0]).unwrap_err(),
            Error::VertexOutOfRange { vertex: 4, n: 4 }
        );

        let g = BipartiteGraph::from_adj(vec![0b1100, 0b1000, 0b0001, 0b0011]).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.min_degree(), 1);
    }

    #[test]
    fn edges_iterates_each_edge_once() {
        let g = BipartiteGraph::from_edges(6, &[(0, 3), (4, 1), (2, 5), (0, 5)]).unwrap();
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 3), (0, 5), (1, 4), (2, 5)]);
    }

    #[test]
    fn handshaking_lemma_holds() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        for n in (2..=50).step_by(4) {
            let g = BipartiteGraph::new_random(&mut rng, n, 0.4).unwrap();
            let sum: u32 = (0..n).map(|v| g.degree(v)).sum();
            assert_eq!(sum as usize, 2 * g.edge_count());
            assert_eq!(g.edges().count(), g.edge_count());
        }
    }

    #[test]
    fn neighbor_masks_match_adjacency() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        for _ in 0..20 {
            let g = BipartiteGraph::new_random(&mut rng, 12, 0.5).unwrap();
            let h = g.half();
            let masks = g.neighbor_masks();
            let mut pairs = 0;
            for u in 0..h {
                assert_eq!(masks.get(u, u), 0);
                for v in 0..h {
                    if u == v {
                        continue;
                    }
                    for w in 0..h {
                        let common = g.has_edge(u, w + h) && g.has_edge(v, w + h);
                        assert_eq!(masks.get(u, v) & (1 << w) != 0, common);
                        pairs += usize::from(common);
                    }
                    assert_eq!(masks.get(u, v), masks.get(v, u));
                }
            }
            assert_eq!(masks.common_pair_count(), pairs);
        }
    }

    #[test]
    fn parse_assigns_first_seen_indices() {
        let text = "6 6\nb x\na y\nb y\nc z\na z\nc x\n";
        let g = parse_edge_list(text).unwrap();
        // b -> 0, a -> 1, c -> 2; x -> 3, y -> 4, z -> 5
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 3), (0, 4), (1, 4), (1, 5), (2, 3), (2, 5)]);
    }

    #[test]
    fn parse_accepts_duplicate_edges_and_trailing_tokens() {
        let g = parse_edge_list("4 3 u v u v w x extra").unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(0, 2));
        assert!(g.has_edge(1, 3));
    }

    #[test]
    fn parse_reports_malformed_input() {
        assert_eq!(
            parse_edge_list("").unwrap_err(),
            Error::Parse(ParseError::MissingHeader)
        );
        assert_eq!(
            parse_edge_list("4").unwrap_err(),
            Error::Parse(ParseError::MissingHeader)
        );
        assert!(matches!(
            parse_edge_list("four 1 a b").unwrap_err(),
            Error::Parse(ParseError::InvalidInteger { field: "vertex count", .. })
        ));
        assert_eq!(
            parse_edge_list("4 2 a b c").unwrap_err(),
            Error::Parse(ParseError::TruncatedEdgeList { expected: 2, found: 1 })
        );
        assert_eq!(
            parse_edge_list("5 0").unwrap_err(),
            Error::InvalidVertexCount { n: 5 }
        );
        assert!(matches!(
            parse_edge_list("4 3 a x b x c x").unwrap_err(),
            Error::Parse(ParseError::PartOverflow { part: Part::Left, capacity: 2, .. })
        ));
    }
}
