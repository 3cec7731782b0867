//! The default "simple" wire-cut expansion: a measure node with terms
//! `{I, X, Y, Z}` paired with a prepare node with terms `{|0⟩, |1⟩, |+⟩, |+i⟩}`.

use crate::gates::core::Gate;
use crate::operator::node::{MeasureNode, PrepareNode, PrepareTerm};
use crate::operator::pauli::Pauli;
use crate::operator::wire::Wire;

/// The fixed 4x4 integer change-of-basis matrix converting the four simple
/// basis-state preparations into Pauli-basis coefficients.
pub const CHANGE_OF_BASIS_4: [[f64; 4]; 4] = [
    [1.0, 1.0, 0.0, 0.0],
    [-1.0, -1.0, 2.0, 0.0],
    [-1.0, -1.0, 0.0, 2.0],
    [1.0, -1.0, 0.0, 0.0],
];

fn change_of_basis_4_rows() -> Vec<Vec<f64>> {
    CHANGE_OF_BASIS_4.iter().map(|row| row.to_vec()).collect()
}

/// Prepares `|0⟩` on a freshly produced wire. Realised as a no-op: per the
/// Open Question this pipeline resolves (see `DESIGN.md`), the `Simulator`
/// contract is responsible for handing every wire a fresh `|0⟩` state, so no
/// explicit reset gate is emitted here.
fn prep_zero(_wire: Wire) -> Vec<Gate> {
    Vec::new()
}

fn prep_one(wire: Wire) -> Vec<Gate> {
    vec![Gate::X(wire)]
}

fn prep_plus(wire: Wire) -> Vec<Gate> {
    vec![Gate::H(wire)]
}

fn prep_iplus(wire: Wire) -> Vec<Gate> {
    vec![Gate::H(wire), Gate::S(wire)]
}

/// Builds the four standard preparation terms, in the order the change-of-basis
/// matrix expects: `|0⟩, |1⟩, |+⟩, |+i⟩`.
pub fn simple_prepare_terms() -> Vec<PrepareTerm> {
    vec![
        PrepareTerm::new("|0>", prep_zero),
        PrepareTerm::new("|1>", prep_one),
        PrepareTerm::new("|+>", prep_plus),
        PrepareTerm::new("|+i>", prep_iplus),
    ]
}

/// Builds the `(MeasureNode, PrepareNode)` pair for a simple cut, the
/// default expansion used when a `WireCut` carries no custom expansion. The
/// wire argument is accepted (and ignored) so this function has the same
/// shape as a custom expansion callback, which may need the wire to build
/// wire-specific gate sequences.
pub fn simple_expansion(_wire: Wire) -> (MeasureNode, PrepareNode) {
    let measure = MeasureNode::new(Pauli::ALL.to_vec());
    let prepare = PrepareNode::new(simple_prepare_terms(), change_of_basis_4_rows());
    (measure, prepare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_expansion_has_four_terms_each_side() {
        let (m, p) = simple_expansion(Wire::new(0));
        assert_eq!(m.0.terms.len(), 4);
        assert_eq!(p.0.terms.len(), 4);
        assert_eq!(p.0.change_of_basis.len(), 4);
    }
}
