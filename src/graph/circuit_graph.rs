//! Tape↔graph conversion: lifting a linear tape into a directed multigraph
//! that preserves per-wire temporal order, and the `Order` key used
//! to linearise it back.

use std::cmp::Ordering;
use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::operator::{Measurement, Observable, Operator, Wire};
use crate::tape::Tape;

/// A sort key recovering the topological linearisation of a circuit graph.
/// Cut expansion inserts a `PrepareNode` at `order(cut) + 0.5`, placing it
/// immediately after its paired `MeasureNode` without renumbering anything
/// else.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Order(pub f64);

impl Eq for Order {}
impl PartialOrd for Order {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Order {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Clone, Debug)]
pub struct GraphNode {
    pub op: Operator,
    pub order: Order,
}

/// A directed multigraph whose nodes are operators carrying an `order`
/// attribute and whose edges carry a `wire` label: an edge `u ->_w v` means
/// `v` is the next operator on wire `w` after `u`. A `StableDiGraph` is used
/// rather than `petgraph::graph::Graph` because cut expansion and
/// fragmenting both remove nodes/edges out of index order, and a plain
/// `Graph` would silently reuse and shuffle indices on removal.
#[derive(Clone, Debug, Default)]
pub struct CircuitGraph {
    pub graph: StableDiGraph<GraphNode, Wire>,
}

impl CircuitGraph {
    pub fn new() -> Self {
        CircuitGraph {
            graph: StableDiGraph::new(),
        }
    }

    /// Lifts a linear tape into a graph: each operation becomes a
    /// node ordered by its position; tensor-product measurements are split
    /// into one independent node per Pauli factor, each attached to the
    /// latest node on its own wire.
    pub fn lift(tape: &Tape) -> Self {
        let mut cg = CircuitGraph::new();
        let mut latest: HashMap<Wire, NodeIndex> = HashMap::new();
        let mut order = 0.0f64;

        for op in &tape.operations {
            let node = cg.graph.add_node(GraphNode {
                op: op.clone(),
                order: Order(order),
            });
            order += 1.0;
            for wire in op.wires() {
                if let Some(&parent) = latest.get(&wire) {
                    cg.graph.add_edge(parent, node, wire);
                }
                latest.insert(wire, node);
            }
        }

        for m in &tape.measurements {
            let factors = m.observable.factors();
            if factors.len() > 1 {
                for (wire, pauli) in factors {
                    let split = Measurement {
                        observable: Observable::Single { wire, pauli },
                        return_type: m.return_type.clone(),
                    };
                    let node = cg.graph.add_node(GraphNode {
                        op: Operator::Measurement(split),
                        order: Order(order),
                    });
                    order += 1.0;
                    if let Some(&parent) = latest.get(&wire) {
                        cg.graph.add_edge(parent, node, wire);
                    }
                }
            } else {
                let node = cg.graph.add_node(GraphNode {
                    op: Operator::Measurement(m.clone()),
                    order: Order(order),
                });
                order += 1.0;
                for wire in m.wires() {
                    if let Some(&parent) = latest.get(&wire) {
                        cg.graph.add_edge(parent, node, wire);
                    }
                }
            }
        }

        tracing::debug!(
            nodes = cg.graph.node_count(),
            edges = cg.graph.edge_count(),
            "lifted tape into circuit graph"
        );
        cg
    }

    /// The predecessor on each wire incident to `node`, keyed by wire.
    pub fn predecessors_by_wire(&self, node: NodeIndex) -> HashMap<Wire, NodeIndex> {
        let mut out = HashMap::new();
        for edge in self.graph.edges_directed(node, Direction::Incoming) {
            out.insert(*edge.weight(), edge.source());
        }
        out
    }

    /// The successor on each wire incident to `node`, keyed by wire.
    pub fn successors_by_wire(&self, node: NodeIndex) -> HashMap<Wire, NodeIndex> {
        let mut out = HashMap::new();
        for edge in self.graph.edges_directed(node, Direction::Outgoing) {
            out.insert(*edge.weight(), edge.target());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::core::Gate;
    use crate::operator::Pauli;

    #[test]
    fn lift_chains_gates_on_shared_wire() {
        let w0 = Wire::new(0);
        let w1 = Wire::new(1);
        let tape = Tape::capture(|rec| {
            rec.apply(Operator::Gate(Gate::H(w0)));
            rec.apply(Operator::Gate(Gate::CX(w0, w1)));
            rec.measure(Measurement::expval(Observable::Tensor(vec![
                (w0, Pauli::Z),
                (w1, Pauli::Z),
            ])));
        });
        let cg = CircuitGraph::lift(&tape);
        // H, CX, and two split Z measurements.
        assert_eq!(cg.graph.node_count(), 4);
        assert_eq!(cg.graph.edge_count(), 3);
    }

    #[test]
    fn lift_preserves_per_wire_chain_order() {
        let w0 = Wire::new(0);
        let tape = Tape::capture(|rec| {
            rec.apply(Operator::Gate(Gate::H(w0)));
            rec.apply(Operator::Gate(Gate::X(w0)));
            rec.measure(Measurement::expval(Observable::Single {
                wire: w0,
                pauli: Pauli::Z,
            }));
        });
        let cg = CircuitGraph::lift(&tape);
        assert_eq!(cg.graph.node_count(), 3);
        assert_eq!(cg.graph.edge_count(), 2);
    }

    #[test]
    fn lift_splits_three_factor_tensor_measurement_into_independent_nodes() {
        let w0 = Wire::new(0);
        let w1 = Wire::new(1);
        let w2 = Wire::new(2);
        let tape = Tape::capture(|rec| {
            rec.apply(Operator::Gate(Gate::H(w0)));
            rec.apply(Operator::Gate(Gate::H(w1)));
            rec.apply(Operator::Gate(Gate::H(w2)));
            rec.measure(Measurement::expval(Observable::Tensor(vec![
                (w0, Pauli::X),
                (w1, Pauli::Y),
                (w2, Pauli::Z),
            ])));
        });
        let cg = CircuitGraph::lift(&tape);

        let measurement_nodes: Vec<_> = cg
            .graph
            .node_indices()
            .filter(|&n| matches!(cg.graph[n].op, Operator::Measurement(_)))
            .collect();
        assert_eq!(measurement_nodes.len(), 3);

        // Each split node keeps a single Pauli factor bound to its own wire;
        // the original tensor-product identity is gone, per the Design Notes.
        let mut seen: Vec<(Wire, Pauli)> = measurement_nodes
            .iter()
            .map(|&n| match &cg.graph[n].op {
                Operator::Measurement(m) => m.observable.factors()[0],
                _ => unreachable!(),
            })
            .collect();
        seen.sort_by_key(|(w, _)| *w);
        assert_eq!(seen, vec![(w0, Pauli::X), (w1, Pauli::Y), (w2, Pauli::Z)]);
    }
}
