//! Circuit graph: tape↔graph conversion, wire-cut expansion, fragmenting,
//! and graph-to-tape lowering.

pub mod circuit_graph;
pub mod cut_expansion;
pub mod fragment;

pub use circuit_graph::{CircuitGraph, GraphNode, Order};
pub use cut_expansion::expand_wire_cuts;
pub use fragment::{fragment_graph, lower_to_tape, CommEdge, CommunicationGraph};
