//! The simulator contract this pipeline dispatches configuration tapes to.
//!
//! This crate performs no simulation of its own in non-test code: gate-level
//! execution is an out-of-scope collaborator the caller supplies. The
//! `StatevectorSimulator` below exists only so this crate's own test suite
//! can verify the pipeline end to end; it is not the production simulator.

use crate::error::CutError;
use crate::tape::Tape;

/// One configuration's simulator result: supports a length query and
/// indexing, mirroring the source's result object. The core requires
/// `len() == 1` (a single scalar expectation value per configuration); any
/// other length is a hard error, reported via [`CutError::ResultArityMismatch`].
pub trait SimResult {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn get(&self, index: usize) -> f64;
}

impl SimResult for Vec<f64> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn get(&self, index: usize) -> f64 {
        self[index]
    }
}

impl SimResult for [f64; 1] {
    fn len(&self) -> usize {
        1
    }
    fn get(&self, index: usize) -> f64 {
        self[index]
    }
}

/// Executes a batch of configuration tapes, returning one result object per
/// tape in the same order. The core makes no assumption about how those
/// results become available, only that the returned sequence has the same
/// length and order as `tapes`.
pub trait Simulator {
    fn run(&self, tapes: &[Tape]) -> Result<Vec<Box<dyn SimResult>>, CutError>;
}

/// Validates every result's arity and extracts its sole scalar, per the
/// simulator contract: `len(result) == 1` for every configuration, any other
/// length a hard error.
pub fn extract_scalars(results: &[Box<dyn SimResult>]) -> Result<Vec<f64>, CutError> {
    results
        .iter()
        .map(|r| {
            if r.len() != 1 {
                return Err(CutError::ResultArityMismatch { got: r.len() });
            }
            Ok(r.get(0))
        })
        .collect()
}

#[cfg(test)]
pub use test_support::StatevectorSimulator;
