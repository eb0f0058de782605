//! Error taxonomy shared by every stage of a decision.

use thiserror::Error;

use crate::graph::ParseError;

/// Internal arithmetic states that can only be reached through a logic defect.
///
/// These never appear on an expected control-flow path: an elimination pivot is
/// always checked against zero before it is used as a divisor.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A field division saw the zero element as its divisor.
    #[error("division by the zero field element")]
    DivisionByZero,
}

/// Errors produced while building inputs for, or running, a decision.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Error {
    #[error("vertex count {n} is not supported (expected an even n with 2 <= n <= 50)")]
    InvalidVertexCount { n: usize },

    #[error("field degree {k} is not supported (expected 2 <= k <= 8)")]
    InvalidFieldDegree { k: u32 },

    #[error("no supported field satisfies 2^k > {factor} * {n}")]
    FieldTooSmall { n: usize, factor: usize },

    #[error("vertex {vertex} is out of range for a graph on {n} vertices")]
    VertexOutOfRange { vertex: usize, n: usize },

    #[error("self-loop at vertex {vertex}")]
    SelfLoop { vertex: usize },

    #[error("edge ({u}, {v}) joins two vertices of the same part")]
    EdgeWithinPart { u: usize, v: usize },

    #[error("adjacency is not symmetric at ({u}, {v})")]
    NotSymmetric { u: usize, v: usize },

    #[error("exact search supports at most {limit} vertices, got {n}")]
    ExactSearchTooLarge { n: usize, limit: usize },

    #[error("trial count must be positive")]
    InvalidTrialCount,

    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns `true` if this error signals a programming defect rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
