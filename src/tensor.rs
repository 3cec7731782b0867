//! Dense row-major tensor backing per-fragment configuration results.
//!
//! Every tensor this pipeline builds is reshaped once from a flat result
//! vector and then contracted one axis at a time against a small
//! change-of-basis matrix, so a flat `Vec<f64>` plus a shape is all that's
//! needed — no n-dimensional slicing or broadcasting is ever required.

use crate::error::CutError;
use crate::operator::{MeasureNode, PrepareNode};

#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl Tensor {
    pub fn from_flat(shape: Vec<usize>, data: Vec<f64>) -> Result<Tensor, CutError> {
        let expected: usize = shape.iter().product::<usize>().max(1);
        if data.len() != expected {
            return Err(CutError::ShapeMismatch {
                fragment: 0,
                expected,
                got: data.len(),
            });
        }
        Ok(Tensor { shape, data })
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn get(&self, idx: &[usize]) -> f64 {
        self.data[ravel(idx, &self.shape)]
    }

    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.data {
            *v *= factor;
        }
    }

    /// Contracts `axis` (of the tensor's current dimension) against `matrix`,
    /// an `out_dim x in_dim` row-major matrix, replacing that axis with one
    /// of dimension `matrix.len()`.
    pub fn contract_axis(&self, axis: usize, matrix: &[Vec<f64>]) -> Tensor {
        let in_dim = self.shape[axis];
        let out_dim = matrix.len();
        debug_assert!(matrix.iter().all(|row| row.len() == in_dim));

        let mut new_shape = self.shape.clone();
        new_shape[axis] = out_dim;
        let new_len: usize = new_shape.iter().product::<usize>().max(1);
        let mut new_data = vec![0.0; new_len];

        for flat_out in 0..new_len {
            let mut idx = unravel(flat_out, &new_shape);
            let out_i = idx[axis];
            let mut acc = 0.0;
            for j in 0..in_dim {
                idx[axis] = j;
                acc += matrix[out_i][j] * self.get(&idx);
            }
            new_data[flat_out] = acc;
        }

        Tensor {
            shape: new_shape,
            data: new_data,
        }
    }
}

fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut idx = vec![0; shape.len()];
    for i in (0..shape.len()).rev() {
        idx[i] = flat % shape[i];
        flat /= shape[i];
    }
    idx
}

fn ravel(idx: &[usize], shape: &[usize]) -> usize {
    let mut flat = 0;
    for (i, &s) in shape.iter().enumerate() {
        flat = flat * s + idx[i];
    }
    flat
}

/// Builds a fragment's tensor from its flat, already-ordered configuration
/// results (prepare-tuples outermost, measure-tuples innermost, matching
/// [`crate::configuration::expand_fragment`]'s enumeration order), scales by
/// `2^{-(n_p+n_m)/2}`, then contracts each prepare axis against its node's
/// own change-of-basis matrix.
pub fn assemble(
    flat_results: &[f64],
    prepares: &[PrepareNode],
    measures: &[MeasureNode],
) -> Result<Tensor, CutError> {
    let mut shape: Vec<usize> = prepares.iter().map(|p| p.0.terms.len()).collect();
    shape.extend(measures.iter().map(|m| m.0.terms.len()));

    let mut tensor = Tensor::from_flat(shape, flat_results.to_vec())?;

    let scale = 2f64.powf(-((prepares.len() + measures.len()) as f64) / 2.0);
    tensor.scale(scale);

    for (axis, prepare) in prepares.iter().enumerate() {
        tensor = tensor.contract_axis(axis, &prepare.0.change_of_basis);
    }

    Ok(tensor)
}
