//! Core quantum gate definitions.
//!
//! A [`Gate`] is a unitary acting on an ordered list of wires. The fixed
//! variants cover the gates the cut-circuit pipeline itself emits (the
//! Pauli basis-change sequences used by prepare/measure nodes); [`Gate::Unitary`]
//! is the escape hatch for an arbitrary caller-supplied unitary the pipeline
//! only ever moves around, never inspects.

use num_complex::Complex64;

use crate::operator::Wire;

pub type Complex = Complex64;

#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    X(Wire),
    Y(Wire),
    Z(Wire),
    H(Wire),
    S(Wire),
    Sdg(Wire),
    RX(Wire, f64),
    RY(Wire, f64),
    RZ(Wire, f64),
    CX(Wire, Wire),
    CZ(Wire, Wire),
    SWAP(Wire, Wire),
    /// An arbitrary named unitary on an ordered list of wires, opaque to
    /// this crate beyond its wire list.
    Unitary { name: String, wires: Vec<Wire> },
}

impl Gate {
    /// The ordered list of wires this gate acts on.
    pub fn wires(&self) -> Vec<Wire> {
        match self {
            Gate::X(w) | Gate::Y(w) | Gate::Z(w) | Gate::H(w) | Gate::S(w) | Gate::Sdg(w) => {
                vec![*w]
            }
            Gate::RX(w, _) | Gate::RY(w, _) | Gate::RZ(w, _) => vec![*w],
            Gate::CX(c, t) | Gate::CZ(c, t) | Gate::SWAP(c, t) => vec![*c, *t],
            Gate::Unitary { wires, .. } => wires.clone(),
        }
    }
}
