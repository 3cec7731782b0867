//! Operator model: tagged operator variants, wires, Pauli observables, and
//! the default wire-cut expansion.

pub mod expansion;
pub mod node;
pub mod pauli;
pub mod wire;

pub use expansion::{simple_expansion, simple_prepare_terms, CHANGE_OF_BASIS_4};
pub use node::{
    Measurement, MeasureNode, MeasureNodeInner, Operator, PrepareNode, PrepareNodeInner,
    PrepareTerm, ReturnType, WireCutOp,
};
pub use pauli::{Observable, Pauli};
pub use wire::Wire;
