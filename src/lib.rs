//! quantic-cut: a circuit-cutting transform for quantum circuits.
//!
//! Lifts a linear tape into a directed graph, expands explicit wire cuts
//! into matched measure/prepare node pairs, fragments the graph into
//! independently executable subcircuits, lowers each fragment back to a
//! tape, expands every fragment into its full basis-preparation and
//! Pauli-measurement configuration batch, and — once a caller's own
//! simulator has executed that batch — reassembles the results via tensor
//! contraction into the expectation value the uncut circuit would have
//! produced.
//!
//! ## Modules
//!
//! - [`error`] - the `CutError` taxonomy returned throughout the pipeline
//! - [`gates`] - the fixed gate set this pipeline moves around
//! - [`operator`] - the tagged operator model: gates, measurements, wire
//!   cuts, and the synthetic measure/prepare node pair a cut expands into
//! - [`tape`] - the linear operation sequence the pipeline reads and writes
//! - [`graph`] - tape-to-graph lifting, wire-cut expansion, fragmenting, and
//!   graph-to-tape lowering
//! - [`configuration`] - per-fragment Cartesian-product configuration
//!   expansion
//! - [`tensor`] - the dense tensor type backing per-fragment assembly
//! - [`contract`] - named-axis contraction of fragment tensors to a scalar
//! - [`oracle`] - the automatic cut-placement contract a caller may supply
//! - [`simulator`] - the simulator contract this pipeline dispatches to
//! - [`transform`] - the top-level `cut_circuit` pipeline entry point

pub mod configuration;
pub mod contract;
pub mod error;
pub mod gates;
pub mod graph;
pub mod operator;
pub mod oracle;
pub mod simulator;
pub mod tape;
pub mod tensor;
pub mod transform;

pub use error::CutError;
pub use tape::Tape;
pub use transform::{cut_circuit, Postprocessor};
