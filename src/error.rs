//! Error taxonomy for the cut-circuit pipeline.
//!
//! Every failure mode named in the malformed-input and result-arity sections
//! of the pipeline surfaces as a `CutError` rather than a panic: the core is
//! a library, and a caller's malformed tape or a misbehaving simulator
//! should not abort the caller's process.

use thiserror::Error;

use crate::operator::Wire;

#[derive(Debug, Error)]
pub enum CutError {
    /// A measurement's return type was not `Expectation`.
    #[error("only expectation-value measurements are supported")]
    UnsupportedReturnType,

    /// An observable factor was not one of `{I, X, Y, Z}`.
    #[error("observable contains a non-Pauli factor")]
    NonPauliObservable,

    /// A fragment tape carried more than one user-supplied measurement.
    #[error("fragment has {count} user measurements, at most one is supported")]
    MultipleMeasurements { count: usize },

    /// The simulator returned a result whose length was not 1.
    #[error("simulator result has length {got}, expected 1")]
    ResultArityMismatch { got: usize },

    /// A `MeasureNode`'s outgoing edge did not land on a `PrepareNode` after
    /// cut expansion. Indicates a bug in a caller-supplied custom expansion.
    #[error("malformed cut expansion: measure node on wire {wire:?} has no paired prepare node")]
    MalformedCutExpansion { wire: Wire },

    /// A flat result sequence did not match the expected configuration count
    /// for a fragment.
    #[error("fragment {fragment} expected {expected} results, got {got}")]
    ShapeMismatch {
        fragment: usize,
        expected: usize,
        got: usize,
    },

    /// An einsum equation referenced a symbol whose per-axis dimension was
    /// inconsistent across tensors.
    #[error("einsum symbol '{symbol}' has inconsistent dimension: {a} vs {b}")]
    InconsistentAxisDimension { symbol: char, a: usize, b: usize },
}
