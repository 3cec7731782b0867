//! Named-axis (einsum-style) contraction of per-fragment tensors into the
//! recovered scalar expectation value.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::error::CutError;
use crate::graph::CommunicationGraph;
use crate::operator::{MeasureNode, PrepareNode};
use crate::tensor::Tensor;

/// Pluggable contraction strategy. Communication graphs arising from
/// circuit cutting are small, so this pipeline only needs a correct
/// brute-force backend; a caller is free to swap in an optimised one.
pub trait EinsumBackend {
    fn contract(&self, inputs: &[(Vec<char>, Tensor)], output: &[char]) -> Result<Tensor, CutError>;
}

/// Enumerates every combination of summed symbol values and accumulates the
/// product into the output tensor.
#[derive(Debug, Default)]
pub struct NaiveEinsumBackend;

impl EinsumBackend for NaiveEinsumBackend {
    fn contract(&self, inputs: &[(Vec<char>, Tensor)], output: &[char]) -> Result<Tensor, CutError> {
        let mut dims: HashMap<char, usize> = HashMap::new();
        for (symbols, tensor) in inputs {
            for (&sym, &dim) in symbols.iter().zip(tensor.shape.iter()) {
                match dims.get(&sym) {
                    Some(&existing) if existing != dim => {
                        return Err(CutError::InconsistentAxisDimension {
                            symbol: sym,
                            a: existing,
                            b: dim,
                        });
                    }
                    _ => {
                        dims.insert(sym, dim);
                    }
                }
            }
        }

        let mut all_symbols: Vec<char> = dims.keys().copied().collect();
        all_symbols.sort();
        let summed_symbols: Vec<char> = all_symbols
            .into_iter()
            .filter(|s| !output.contains(s))
            .collect();

        let out_dims: Vec<usize> = output.iter().map(|s| dims[s]).collect();
        let sum_dims: Vec<usize> = summed_symbols.iter().map(|s| dims[s]).collect();

        let out_combinations = cartesian(&out_dims);
        let sum_combinations = cartesian(&sum_dims);

        let mut out_data = vec![0.0; out_combinations.len()];

        for (out_flat, out_values) in out_combinations.iter().enumerate() {
            let mut assignment: HashMap<char, usize> = HashMap::new();
            for (&sym, &val) in output.iter().zip(out_values.iter()) {
                assignment.insert(sym, val);
            }

            let mut total = 0.0;
            for sum_values in &sum_combinations {
                for (&sym, &val) in summed_symbols.iter().zip(sum_values.iter()) {
                    assignment.insert(sym, val);
                }
                let mut product = 1.0;
                for (symbols, tensor) in inputs {
                    let idx: Vec<usize> = symbols.iter().map(|s| assignment[s]).collect();
                    product *= tensor.get(&idx);
                }
                total += product;
            }
            out_data[out_flat] = total;
        }

        Ok(Tensor {
            shape: out_dims,
            data: out_data,
        })
    }
}

fn cartesian(dims: &[usize]) -> Vec<Vec<usize>> {
    let mut out = vec![Vec::new()];
    for &d in dims {
        let mut next = Vec::with_capacity(out.len() * d.max(1));
        for combo in &out {
            for v in 0..d {
                let mut c = combo.clone();
                c.push(v);
                next.push(c);
            }
        }
        out = next;
    }
    out
}

fn symbol_for_index(i: usize) -> char {
    char::from_u32('a' as u32 + i as u32).unwrap_or('?')
}

fn measure_key(node: &MeasureNode) -> usize {
    Arc::as_ptr(&node.0) as usize
}

fn prepare_key(node: &PrepareNode) -> usize {
    Arc::as_ptr(&node.0) as usize
}

/// Assigns one symbol per cut (per communication-graph edge) and returns,
/// for each fragment in order, the axis-aligned symbol list matching
/// [`crate::tensor::assemble`]'s shape (prepare axes, then measure axes).
pub fn build_equation(
    comm: &CommunicationGraph,
    prepares_per_fragment: &[Vec<PrepareNode>],
    measures_per_fragment: &[Vec<MeasureNode>],
) -> Vec<Vec<char>> {
    let mut symbol_for_measure: HashMap<usize, char> = HashMap::new();
    let mut symbol_for_prepare: HashMap<usize, char> = HashMap::new();

    for (i, edge) in comm.edge_references().enumerate() {
        let symbol = symbol_for_index(i);
        let pair = &edge.weight().pair;
        symbol_for_measure.insert(measure_key(&pair.0), symbol);
        symbol_for_prepare.insert(prepare_key(&pair.1), symbol);
    }

    prepares_per_fragment
        .iter()
        .zip(measures_per_fragment.iter())
        .map(|(prepares, measures)| {
            let mut symbols: Vec<char> = prepares
                .iter()
                .map(|p| symbol_for_prepare[&prepare_key(p)])
                .collect();
            symbols.extend(measures.iter().map(|m| symbol_for_measure[&measure_key(m)]));
            symbols
        })
        .collect()
}

/// Contracts every fragment tensor down to the recovered scalar. With no
/// cuts at all, `inputs` holds a single rank-0 tensor and this returns its
/// sole entry directly.
pub fn contract(inputs: &[(Vec<char>, Tensor)], backend: &dyn EinsumBackend) -> Result<f64, CutError> {
    let result = backend.contract(inputs, &[])?;
    Ok(result.data[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contracting_two_matching_vectors_sums_their_product() {
        let a = Tensor::from_flat(vec![2], vec![1.0, 2.0]).unwrap();
        let b = Tensor::from_flat(vec![2], vec![3.0, 4.0]).unwrap();
        let inputs = vec![(vec!['x'], a), (vec!['x'], b)];
        let result = contract(&inputs, &NaiveEinsumBackend).unwrap();
        assert_eq!(result, 1.0 * 3.0 + 2.0 * 4.0);
    }

    #[test]
    fn no_shared_symbols_multiplies_independent_scalars() {
        let a = Tensor::from_flat(vec![], vec![2.0]).unwrap();
        let b = Tensor::from_flat(vec![], vec![3.0]).unwrap();
        let inputs = vec![(vec![], a), (vec![], b)];
        let result = contract(&inputs, &NaiveEinsumBackend).unwrap();
        assert_eq!(result, 6.0);
    }

    #[test]
    fn inconsistent_axis_dimension_is_reported() {
        let a = Tensor::from_flat(vec![2], vec![1.0, 2.0]).unwrap();
        let b = Tensor::from_flat(vec![3], vec![1.0, 2.0, 3.0]).unwrap();
        let inputs = vec![(vec!['x'], a), (vec!['x'], b)];
        assert!(matches!(
            NaiveEinsumBackend.contract(&inputs, &[]),
            Err(CutError::InconsistentAxisDimension { symbol: 'x', .. })
        ));
    }
}
