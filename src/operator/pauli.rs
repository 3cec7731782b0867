//! Pauli observables.

use crate::error::CutError;
use crate::operator::Wire;

/// A single-qubit Pauli operator, admitting the identity so that a
/// `MeasureNode`'s "simple" term set (`{I, X, Y, Z}`) can be represented
/// uniformly, matching the admitted set `{I, X, Y, Z}` used throughout
/// prepare/measure term sets and observable validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];
}

/// An observable: a single Pauli on one wire, or a tensor product of Paulis
/// across distinct wires. Constructed already sorted by wire index wherever
/// the pipeline builds one — a combined tensor product is always reordered
/// by wire before emission.
#[derive(Clone, Debug, PartialEq)]
pub enum Observable {
    Single { wire: Wire, pauli: Pauli },
    Tensor(Vec<(Wire, Pauli)>),
}

impl Observable {
    /// The per-wire Pauli factors, in wire order.
    pub fn factors(&self) -> Vec<(Wire, Pauli)> {
        match self {
            Observable::Single { wire, pauli } => vec![(*wire, *pauli)],
            Observable::Tensor(factors) => {
                let mut f = factors.clone();
                f.sort_by_key(|(w, _)| *w);
                f
            }
        }
    }

    pub fn wires(&self) -> Vec<Wire> {
        self.factors().into_iter().map(|(w, _)| w).collect()
    }

    /// Builds the observable over a set of (wire, pauli) factors, tensoring
    /// factors together and reordering by wire. Returns a single-factor
    /// observable unchanged; collapses to `None` if `factors` is empty.
    pub fn from_factors(mut factors: Vec<(Wire, Pauli)>) -> Option<Observable> {
        if factors.is_empty() {
            return None;
        }
        factors.sort_by_key(|(w, _)| *w);
        if factors.len() == 1 {
            let (wire, pauli) = factors[0];
            Some(Observable::Single { wire, pauli })
        } else {
            Some(Observable::Tensor(factors))
        }
    }

    /// True if every factor is `Pauli::I` (an identity observable).
    pub fn is_identity_only(&self) -> bool {
        self.factors().iter().all(|(_, p)| *p == Pauli::I)
    }

    /// Parses a tensor observable from named single-letter factors, the
    /// validation a caller sitting at the true external boundary (a
    /// front-end parsing a user-supplied circuit description) would run
    /// before handing this crate an `Observable` at all. Rejects any label
    /// outside `{I, X, Y, Z}`.
    pub fn try_from_named_factors(factors: &[(Wire, &str)]) -> Result<Observable, CutError> {
        let parsed = factors
            .iter()
            .map(|&(wire, label)| {
                let pauli = match label {
                    "I" => Pauli::I,
                    "X" => Pauli::X,
                    "Y" => Pauli::Y,
                    "Z" => Pauli::Z,
                    _ => return Err(CutError::NonPauliObservable),
                };
                Ok((wire, pauli))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Observable::from_factors(parsed).ok_or(CutError::NonPauliObservable)
    }
}
