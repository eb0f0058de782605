//! # Bipartite Hamiltonicity via Björklund's Algebraic Sieve
//!
//! A randomized, one-sided-error decision procedure for Hamiltonian cycles in balanced
//! bipartite graphs on at most 50 vertices.
//!
//! This crate provides:
//! - Table-driven arithmetic in \(GF(2^k)\), \(2 \le k \le 8\).
//! - A permanent solver over \(GF(2^k)\) by Gaussian elimination (characteristic 2
//!   makes the permanent equal to the determinant).
//! - Random arc labelings that are symmetric everywhere except at a distinguished vertex.
//! - The labeled cycle cover sum: inclusion-exclusion over subsets of \(V_2\), one
//!   permanent per subset, optionally spread over a rayon pool.
//! - A trial-loop oracle with sound prechecks and an injectable, seedable RNG.
//!
//! ## Quick Start
//!
//! ```
//! use hamcycle::graph::BipartiteGraph;
//! use hamcycle::oracle::{HamiltonicityOracle, OracleConfig};
//!
//! // 0 - 2 - 1 - 3 - 0
//! let g = BipartiteGraph::from_edges(4, &[(0, 2), (2, 1), (1, 3), (3, 0)]).unwrap();
//! let oracle = HamiltonicityOracle::new(OracleConfig {
//!     seed: Some(12345),
//!     trials: Some(64),
//!     ..Default::default()
//! });
//! assert!(oracle.decide(&g).unwrap().is_hamiltonian());
//! ```
//!
//! ## Reading Edge Lists
//!
//! ```
//! use hamcycle::graph::parse_edge_list;
//! use hamcycle::oracle::decide_hamiltonicity;
//!
//! let g = parse_edge_list("4 1\nalice bob\n").unwrap();
//! // One edge cannot close a cycle: the prechecks reject it outright.
//! assert!(!decide_hamiltonicity(&g).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`gf`]: \(GF(2^k)\) tables, multiplication, division, constrained sampling.
//! - [`permanent`]: dense square matrices and the elimination-based permanent.
//! - [`graph`]: bitset bipartite graphs, common-neighbor masks, edge-list parsing.
//! - [`labels`]: per-trial random arc labels.
//! - [`cover`]: the labeled cycle cover sum.
//! - [`oracle`]: configuration, prechecks, and the trial loop.
//! - [`validate`]: exact Hamiltonicity for small graphs, for cross-checking.
//!
//! ## Performance Notes
//!
//! - A trial enumerates \(2^{n/2} - 1\) subsets, each with an \(O((n/2)^3)\)
//!   elimination. Practical up to roughly `n = 40`.
//! - Field multiplication and division are single table lookups.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::needless_range_loop)] // Often clearer for matrix indexing
#![allow(clippy::doc_markdown)] // LaTeX-style notation in docs

pub mod cover;
pub mod error;
pub mod gf;
pub mod graph;
pub mod labels;
pub mod oracle;
pub mod permanent;
pub mod validate;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::error::{Error, InvariantViolation, Result};
    pub use crate::gf::GaloisField;
    pub use crate::graph::{parse_edge_list, BipartiteGraph};
    pub use crate::oracle::{
        decide_hamiltonicity, render_verdict, Decision, HamiltonicityOracle, OracleConfig,
    };
    pub use crate::permanent::{permanent, SquareMatrix};
}
