//! Randomized Hamiltonicity decision for balanced bipartite graphs (Björklund).
//!
//! A decision runs cheap necessary-condition prechecks, builds \(GF(2^k)\) with
//! \(2^k > c \cdot n\), and then repeats independent trials. Each trial draws a fresh
//! edge labeling and evaluates the labeled cycle cover sum. A non-zero sum proves that
//! a Hamiltonian cycle exists; a zero sum is inconclusive. The error is one-sided:
//! `true` is never wrong, `false` may be a false negative with probability shrinking
//! geometrically in the number of trials.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::cover::labeled_cycle_cover_sum;
use crate::error::{Error, Result};
use crate::gf::GaloisField;
use crate::graph::{BipartiteGraph, NeighborMasks};
use crate::labels::{EdgeLabeling, DISTINGUISHED_VERTEX};

// ============================================================================
// Configuration
// ============================================================================

/// Default constant `c` in the field-size rule \(2^k > c \cdot n\).
pub const DEFAULT_FIELD_FACTOR: usize = 2;

/// Decision parameters.
#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// Number of independent trials; `None` uses the vertex count `n`.
    pub trials: Option<usize>,
    /// Constant `c` in \(2^k > c \cdot n\). Larger values lower the per-trial miss rate.
    pub field_factor: usize,
    /// Optional deterministic seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Spread each trial's subset enumeration over the rayon pool.
    pub parallel: bool,
    /// Run the edge-count and degree prechecks before any trial.
    pub prechecks: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            trials: None,
            field_factor: DEFAULT_FIELD_FACTOR,
            seed: None,
            parallel: true,
            prechecks: true,
        }
    }
}

// ============================================================================
// Decision context
// ============================================================================

/// Everything a decision shares across its trials, built once per call.
///
/// All fields are read-only once constructed.
#[derive(Clone, Debug)]
pub struct DecisionContext<'g> {
    graph: &'g BipartiteGraph,
    field: GaloisField,
    masks: NeighborMasks,
    s: usize,
}

impl<'g> DecisionContext<'g> {
    /// Builds the field for `graph` and precomputes its neighbor masks.
    ///
    /// # Errors
    /// Returns [`Error::FieldTooSmall`] if `field_factor * n` needs a degree above 8.
    pub fn new(graph: &'g BipartiteGraph, field_factor: usize) -> Result<Self> {
        Ok(Self {
            graph,
            field: GaloisField::for_vertex_count(graph.n(), field_factor)?,
            masks: graph.neighbor_masks(),
            s: DISTINGUISHED_VERTEX,
        })
    }

    /// The graph under decision.
    #[inline(always)]
    pub fn graph(&self) -> &'g BipartiteGraph {
        self.graph
    }

    /// Field tables.
    #[inline(always)]
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Common-neighbor masks over \(V_1 \times V_1\).
    #[inline(always)]
    pub fn masks(&self) -> &NeighborMasks {
        &self.masks
    }

    /// The distinguished vertex `s`.
    #[inline(always)]
    pub fn distinguished_vertex(&self) -> usize {
        self.s
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Necessary condition that ruled a graph out before any trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precheck {
    /// Fewer edges between the parts than vertices; a Hamiltonian cycle uses `n` of them.
    TooFewEdges {
        /// Edges present.
        edges: usize,
        /// Vertex count.
        n: usize,
    },
    /// Some vertex has fewer than two neighbors.
    LowDegree {
        /// The first such vertex.
        vertex: usize,
        /// Its degree.
        degree: u32,
    },
}

/// How a decision reached its verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// A precheck failed; no trial ran.
    Rejected(Precheck),
    /// Trial number `trial` (1-based) produced a non-zero sum.
    Hamiltonian {
        /// The accepting trial.
        trial: usize,
    },
    /// Every trial produced a zero sum.
    Exhausted {
        /// Trials run.
        trials: usize,
    },
}

impl Decision {
    /// The verdict: `true` only with concrete evidence of a Hamiltonian cycle.
    pub fn is_hamiltonian(&self) -> bool {
        matches!(self, Decision::Hamiltonian { .. })
    }

    /// Number of trials that were run.
    pub fn trials_run(&self) -> usize {
        match *self {
            Decision::Rejected(_) => 0,
            Decision::Hamiltonian { trial } => trial,
            Decision::Exhausted { trials } => trials,
        }
    }
}

/// Checks the cheap necessary conditions for a Hamiltonian cycle.
///
/// Both are sound: a Hamiltonian cycle of a graph on `n` vertices consists of `n`
/// edges and gives every vertex degree at least two.
pub fn precheck(graph: &BipartiteGraph) -> Option<Precheck> {
    let edges = graph.edge_count();
    if edges < graph.n() {
        return Some(Precheck::TooFewEdges { edges, n: graph.n() });
    }
    (0..graph.n())
        .map(|v| (v, graph.degree(v)))
        .find(|&(_, d)| d < 2)
        .map(|(vertex, degree)| Precheck::LowDegree { vertex, degree })
}

// ============================================================================
// HamiltonicityOracle
// ============================================================================

/// Decides Hamiltonicity of balanced bipartite graphs with one-sided error.
#[derive(Clone, Debug, Default)]
pub struct HamiltonicityOracle {
    cfg: OracleConfig,
}

impl HamiltonicityOracle {
    /// Creates an oracle with the given configuration.
    pub fn new(cfg: OracleConfig) -> Self {
        Self { cfg }
    }

    /// The active configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.cfg
    }

    /// Decides `graph`, seeding a fresh RNG from the configured seed or OS entropy.
    ///
    /// # Errors
    /// See [`decide_with_rng`](Self::decide_with_rng).
    pub fn decide(&self, graph: &BipartiteGraph) -> Result<Decision> {
        let seed = self.cfg.seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = SmallRng::seed_from_u64(splitmix64(seed));
        self.decide_with_rng(graph, &mut rng)
    }

    /// Decides `graph` drawing every label from `rng`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTrialCount`] for a zero trial budget,
    /// [`Error::FieldTooSmall`] when the field factor is too large for `n`, and
    /// propagates any invariant violation from the arithmetic.
    pub fn decide_with_rng<R: Rng + ?Sized>(
        &self,
        graph: &BipartiteGraph,
        rng: &mut R,
    ) -> Result<Decision> {
        let trials = self.cfg.trials.unwrap_or(graph.n());
        if trials == 0 {
            return Err(Error::InvalidTrialCount);
        }

        if self.cfg.prechecks {
            if let Some(reason) = precheck(graph) {
                log::debug!("n={}: rejected before any trial: {reason:?}", graph.n());
                return Ok(Decision::Rejected(reason));
            }
        }

        let ctx = DecisionContext::new(graph, self.cfg.field_factor)?;
        log::debug!(
            "n={}: GF(2^{}), {} common-neighbor pairs, up to {trials} trials over {} marking subsets",
            graph.n(),
            ctx.field().degree(),
            ctx.masks().common_pair_count(),
            (1u64 << graph.half()) - 1
        );

        for trial in 1..=trials {
            let labels =
                EdgeLabeling::sample(graph, ctx.field(), ctx.distinguished_vertex(), rng);
            let sum = labeled_cycle_cover_sum(&ctx, &labels, self.cfg.parallel)?;
            log::trace!("trial {trial}/{trials}: labeled cycle cover sum = {sum:#04x}");
            if sum != 0 {
                log::debug!("n={}: Hamiltonian cycle certified by trial {trial}", graph.n());
                return Ok(Decision::Hamiltonian { trial });
            }
        }

        log::debug!("n={}: all {trials} trials returned zero", graph.n());
        Ok(Decision::Exhausted { trials })
    }
}

/// Decides `graph` with the default configuration.
///
/// # Errors
/// Propagates any error of [`HamiltonicityOracle::decide`].
pub fn decide_hamiltonicity(graph: &BipartiteGraph) -> Result<bool> {
    HamiltonicityOracle::default()
        .decide(graph)
        .map(|d| d.is_hamiltonian())
}

/// Renders a verdict as the `yes` / `no` token.
pub fn render_verdict(hamiltonian: bool) -> &'static str {
    if hamiltonian {
        "yes"
    } else {
        "no"
    }
}

/// SplitMix64 mixer; spreads nearby user seeds across the RNG state space.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn square() -> BipartiteGraph {
        BipartiteGraph::from_edges(4, &[(0, 2), (2, 1), (1, 3), (3, 0)]).unwrap()
    }

    fn seeded(seed: u64) -> HamiltonicityOracle {
        HamiltonicityOracle::new(OracleConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    #[test]
    fn four_cycle_is_hamiltonian() {
        let g = square();
        let mut hits = 0;
        for seed in 0..100 {
            hits += usize::from(seeded(seed).decide(&g).unwrap().is_hamiltonian());
        }
        assert!(hits >= 99, "4-cycle detected only {hits}/100 times");
    }

    #[test]
    fn single_edge_is_rejected_without_trials() {
        let g = BipartiteGraph::from_edges(4, &[(0, 2)]).unwrap();
        let d = seeded(1).decide(&g).unwrap();
        assert_eq!(d, Decision::Rejected(Precheck::TooFewEdges { edges: 1, n: 4 }));
        assert_eq!(d.trials_run(), 0);
        assert!(!d.is_hamiltonian());
    }

    #[test]
    fn minimal_graph_is_rejected() {
        let g = BipartiteGraph::from_edges(2, &[(0, 1)]).unwrap();
        let d = seeded(2).decide(&g).unwrap();
        assert_eq!(d, Decision::Rejected(Precheck::TooFewEdges { edges: 1, n: 2 }));

        let no_prechecks = HamiltonicityOracle::new(OracleConfig {
            seed: Some(2),
            prechecks: false,
            ..Default::default()
        });
        assert_eq!(
            no_prechecks.decide(&g).unwrap(),
            Decision::Exhausted { trials: 2 }
        );
    }

    #[test]
    fn pendant_vertex_is_rejected_by_degree() {
        // Enough edges overall, but vertex 5 hangs off vertex 2 alone.
        let g = BipartiteGraph::from_edges(
            6,
            &[(0, 3), (0, 4), (1, 3), (1, 4), (2, 3), (2, 4), (2, 5)],
        )
        .unwrap();
        assert_eq!(
            precheck(&g),
            Some(Precheck::LowDegree { vertex: 5, degree: 1 })
        );
    }

    #[test]
    fn same_seed_same_decision() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        for _ in 0..10 {
            let g = BipartiteGraph::new_random(&mut rng, 10, 0.5).unwrap();
            assert_eq!(seeded(77).decide(&g).unwrap(), seeded(77).decide(&g).unwrap());
        }
    }

    #[test]
    fn trial_budget_is_honored() {
        // Two disjoint 4-cycles: passes both prechecks, never yields a non-zero sum.
        let g = BipartiteGraph::from_edges(
            8,
            &[(0, 4), (4, 1), (1, 5), (5, 0), (2, 6), (6, 3), (3, 7), (7, 2)],
        )
        .unwrap();
        let oracle = HamiltonicityOracle::new(OracleConfig {
            trials: Some(3),
            seed: Some(5),
            ..Default::default()
        });
        assert_eq!(oracle.decide(&g).unwrap(), Decision::Exhausted { trials: 3 });
        assert_eq!(seeded(5).decide(&g).unwrap().trials_run(), 8);
    }

    #[test]
    fn invalid_configuration_is_reported() {
        let g = square();
        let zero_trials = HamiltonicityOracle::new(OracleConfig {
            trials: Some(0),
            ..Default::default()
        });
        assert_eq!(zero_trials.decide(&g).unwrap_err(), Error::InvalidTrialCount);

        let huge_field = HamiltonicityOracle::new(OracleConfig {
            field_factor: 100,
            ..Default::default()
        });
        assert_eq!(
            huge_field.decide(&g).unwrap_err(),
            Error::FieldTooSmall { n: 4, factor: 100 }
        );
    }

    #[test]
    fn context_uses_smallest_adequate_field() {
        let g = square();
        let ctx = DecisionContext::new(&g, DEFAULT_FIELD_FACTOR).unwrap();
        assert_eq!(ctx.field().degree(), 4);
        assert_eq!(ctx.distinguished_vertex(), 0);
        assert_eq!(ctx.graph().n(), 4);
        assert_eq!(ctx.masks().common_pair_count(), 4);
    }

    #[test]
    fn verdicts_render_as_tokens() {
        assert_eq!(render_verdict(true), "yes");
        assert_eq!(render_verdict(false), "no");
    }

    #[test]
    fn splitmix64_is_deterministic() {
        assert_eq!(splitmix64(0), splitmix64(0));
        assert_ne!(splitmix64(0), splitmix64(1));
    }
}
