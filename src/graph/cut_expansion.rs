//! Wire-cut expansion: replaces each explicit `WireCut` node with a
//! matched measure→prepare pair per wire, splicing in the cut's
//! predecessors and successors.

use crate::graph::circuit_graph::{CircuitGraph, GraphNode, Order};
use crate::operator::{simple_expansion, Operator, Wire};

/// Replaces every `WireCut` node in `graph` with its measure→prepare
/// expansion, in place. Uses the node's own custom expansion when present,
/// otherwise [`simple_expansion`].
pub fn expand_wire_cuts(graph: &mut CircuitGraph) {
    let cut_nodes: Vec<_> = graph
        .graph
        .node_indices()
        .filter(|&n| graph.graph[n].op.is_wire_cut())
        .collect();

    for node in cut_nodes {
        let order = graph.graph[node].order;
        let predecessors = graph.predecessors_by_wire(node);
        let successors = graph.successors_by_wire(node);

        let (wires, expansion): (
            Vec<Wire>,
            Box<dyn Fn(Wire) -> (crate::operator::MeasureNode, crate::operator::PrepareNode)>,
        ) = match &graph.graph[node].op {
            Operator::WireCut(cut) => {
                let wires = cut.wires.clone();
                let expansion: Box<dyn Fn(Wire) -> _> = match cut.custom_expansion.clone() {
                    Some(f) => Box::new(move |w| f(w)),
                    None => Box::new(simple_expansion),
                };
                (wires, expansion)
            }
            _ => unreachable!("cut_nodes filtered to WireCut operators"),
        };

        graph.graph.remove_node(node);

        for wire in wires {
            let (measure, prepare) = expansion(wire);

            let measure_idx = graph.graph.add_node(GraphNode {
                op: Operator::Measure(measure, wire),
                order,
            });
            let prepare_idx = graph.graph.add_node(GraphNode {
                op: Operator::Prepare(prepare, wire),
                order: Order(order.0 + 0.5),
            });
            graph.graph.add_edge(measure_idx, prepare_idx, wire);

            if let Some(&pred) = predecessors.get(&wire) {
                graph.graph.add_edge(pred, measure_idx, wire);
            }
            if let Some(&succ) = successors.get(&wire) {
                graph.graph.add_edge(prepare_idx, succ, wire);
            }
        }
    }

    tracing::debug!(
        nodes = graph.graph.node_count(),
        "expanded wire cuts"
    );
}
