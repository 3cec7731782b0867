//! Fragmenter and graph-to-tape lowering.
//!
//! Cut edges (`MeasureNode -> PrepareNode`) are removed to reveal weakly
//! connected components; each component becomes a fragment subgraph, and a
//! `CommunicationGraph` quotient records which fragment produces which
//! fragment's input.

use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex as CommNodeIndex};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use petgraph::Directed;

use crate::error::CutError;
use crate::graph::circuit_graph::{CircuitGraph, GraphNode, Order};
use crate::operator::{MeasureNode, Operator, PrepareNode, Wire};
use crate::tape::Tape;

/// An edge of the communication graph: the pair of synthetic nodes this cut
/// joins. Parallel edges between the same fragment pair are expected when
/// more than one cut crosses the same fragment boundary.
#[derive(Clone, Debug)]
pub struct CommEdge {
    pub pair: (MeasureNode, PrepareNode),
}

/// A quotient multigraph whose nodes are fragment indices `0..F` and whose
/// edges carry the cut they represent.
pub type CommunicationGraph = Graph<usize, CommEdge, Directed>;

/// Fragments a cut-expanded graph into weakly connected subgraphs plus the
/// communication graph describing the cuts between them.
pub fn fragment_graph(
    graph: &CircuitGraph,
) -> Result<(Vec<CircuitGraph>, CommunicationGraph), CutError> {
    let mut residual = graph.graph.clone();
    let mut cut_edges = Vec::new();

    let edge_ids: Vec<_> = residual.edge_indices().collect();
    for edge_id in edge_ids {
        let (src, dst) = residual.edge_endpoints(edge_id).unwrap();
        if residual[src].op.is_measure_node() {
            if !residual[dst].op.is_prepare_node() {
                let wire = residual[src].op.wires()[0];
                return Err(CutError::MalformedCutExpansion { wire });
            }
            cut_edges.push((src, dst));
        }
    }
    for &(src, dst) in &cut_edges {
        residual.remove_edge(residual.find_edge(src, dst).unwrap());
    }

    // Weakly connected components via union-find over the residual edges,
    // following petgraph's own `connected_components` strategy but keeping
    // the per-node partition rather than only a count.
    let bound = residual.node_bound();
    let mut uf = UnionFind::new(bound);
    for edge in residual.edge_references() {
        uf.union(residual.to_index(edge.source()), residual.to_index(edge.target()));
    }

    let node_indices: Vec<NodeIndex> = residual.node_indices().collect();
    let mut root_to_fragment: HashMap<usize, usize> = HashMap::new();
    let mut fragment_nodes: Vec<Vec<NodeIndex>> = Vec::new();
    for &n in &node_indices {
        let root = uf.find(residual.to_index(n));
        let fragment = *root_to_fragment.entry(root).or_insert_with(|| {
            fragment_nodes.push(Vec::new());
            fragment_nodes.len() - 1
        });
        fragment_nodes[fragment].push(n);
    }

    let fragments: Vec<CircuitGraph> = fragment_nodes
        .iter()
        .map(|nodes| build_fragment(&residual, nodes))
        .collect();

    let mut comm = CommunicationGraph::new();
    for i in 0..fragments.len() {
        comm.add_node(i);
    }
    let comm_node = |f: usize| -> CommNodeIndex { CommNodeIndex::new(f) };

    for (measure_idx, prepare_idx) in cut_edges {
        let measure_root = uf.find(residual.to_index(measure_idx));
        let prepare_root = uf.find(residual.to_index(prepare_idx));
        let start_fragment = root_to_fragment[&measure_root];
        let end_fragment = root_to_fragment[&prepare_root];

        let measure_node = match &graph.graph[measure_idx].op {
            Operator::Measure(m, _) => m.clone(),
            _ => unreachable!(),
        };
        let prepare_node = match &graph.graph[prepare_idx].op {
            Operator::Prepare(p, _) => p.clone(),
            _ => unreachable!(),
        };

        comm.add_edge(
            comm_node(start_fragment),
            comm_node(end_fragment),
            CommEdge {
                pair: (measure_node, prepare_node),
            },
        );
    }

    tracing::debug!(
        fragments = fragments.len(),
        cuts = comm.edge_count(),
        "fragmented circuit graph"
    );

    Ok((fragments, comm))
}

fn build_fragment(residual: &StableDiGraph<GraphNode, Wire>, nodes: &[NodeIndex]) -> CircuitGraph {
    let mut fragment = StableDiGraph::new();
    let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::new();

    for &old in nodes {
        let new = fragment.add_node(residual[old].clone());
        remap.insert(old, new);
    }
    for &old in nodes {
        for edge in residual.edges_directed(old, petgraph::Direction::Outgoing) {
            if let Some(&new_target) = remap.get(&edge.target()) {
                fragment.add_edge(remap[&old], new_target, *edge.weight());
            }
        }
    }

    CircuitGraph { graph: fragment }
}

/// Lowers a fragment subgraph back into a tape: topologically
/// linearises by `order`, remapping wires through a table that is updated
/// to a fresh wire label whenever a `MeasureNode` is emitted — everything
/// after a measurement on wire `w` within this fragment takes place on a
/// disjoint logical wire, since the paired prepare node lives in a
/// different fragment.
pub fn lower_to_tape(fragment: &CircuitGraph) -> Tape {
    let mut wires: std::collections::BTreeSet<Wire> = std::collections::BTreeSet::new();
    for idx in fragment.graph.node_indices() {
        wires.extend(fragment.graph[idx].op.wires());
    }

    let mut ordered: Vec<(Order, NodeIndex)> = fragment
        .graph
        .node_indices()
        .map(|idx| (fragment.graph[idx].order, idx))
        .collect();
    ordered.sort_by_key(|(order, _)| *order);

    let mut wire_map: HashMap<Wire, Wire> = wires.iter().map(|&w| (w, w)).collect();
    let mut tape = Tape::new();

    for (_, idx) in ordered {
        let op = &fragment.graph[idx].op;
        let remapped = remap_operator(op, &wire_map);

        match remapped {
            Operator::Measurement(m) => tape.measurements.push(m),
            other => tape.operations.push(other),
        }

        if let Operator::Measure(_, original_wire) = op {
            let fresh = find_fresh_wire(&wires);
            wires.insert(fresh);
            wire_map.insert(*original_wire, fresh);
        }
    }

    tape
}

fn remap_operator(op: &Operator, wire_map: &HashMap<Wire, Wire>) -> Operator {
    let remap = |w: Wire| -> Wire { *wire_map.get(&w).unwrap_or(&w) };
    match op {
        Operator::Gate(g) => Operator::Gate(remap_gate(g, &remap)),
        Operator::Measurement(m) => {
            let factors = m
                .observable
                .factors()
                .into_iter()
                .map(|(w, p)| (remap(w), p))
                .collect::<Vec<_>>();
            let observable = crate::operator::Observable::from_factors(factors)
                .expect("measurement always has at least one factor");
            Operator::Measurement(crate::operator::Measurement {
                observable,
                return_type: m.return_type.clone(),
            })
        }
        Operator::WireCut(_) => unreachable!("wire cuts are expanded before lowering"),
        Operator::Measure(node, w) => Operator::Measure(node.clone(), remap(*w)),
        Operator::Prepare(node, w) => Operator::Prepare(node.clone(), remap(*w)),
    }
}

fn remap_gate(gate: &crate::gates::core::Gate, remap: &impl Fn(Wire) -> Wire) -> crate::gates::core::Gate {
    use crate::gates::core::Gate;
    match gate {
        Gate::X(w) => Gate::X(remap(*w)),
        Gate::Y(w) => Gate::Y(remap(*w)),
        Gate::Z(w) => Gate::Z(remap(*w)),
        Gate::H(w) => Gate::H(remap(*w)),
        Gate::S(w) => Gate::S(remap(*w)),
        Gate::Sdg(w) => Gate::Sdg(remap(*w)),
        Gate::RX(w, t) => Gate::RX(remap(*w), *t),
        Gate::RY(w, t) => Gate::RY(remap(*w), *t),
        Gate::RZ(w, t) => Gate::RZ(remap(*w), *t),
        Gate::CX(c, t) => Gate::CX(remap(*c), remap(*t)),
        Gate::CZ(c, t) => Gate::CZ(remap(*c), remap(*t)),
        Gate::SWAP(a, b) => Gate::SWAP(remap(*a), remap(*b)),
        Gate::Unitary { name, wires } => Gate::Unitary {
            name: name.clone(),
            wires: wires.iter().map(|&w| remap(w)).collect(),
        },
    }
}

/// The smallest non-negative wire label not already present in `wires`.
fn find_fresh_wire(wires: &std::collections::BTreeSet<Wire>) -> Wire {
    let mut candidate = 0u64;
    while wires.contains(&Wire::new(candidate)) {
        candidate += 1;
    }
    Wire::new(candidate)
}
