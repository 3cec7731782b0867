//! The tagged operator model: gates, terminal measurements, explicit wire
//! cuts, and the synthetic measure/prepare pair a cut expands into.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::gates::core::Gate;
use crate::operator::pauli::{Observable, Pauli};
use crate::operator::wire::Wire;

/// The return type a [`Measurement`] is bound to. This pipeline recognises
/// only `Expectation`; any other kind is accepted structurally (so a caller
/// can build one) but is rejected with [`crate::error::CutError::UnsupportedReturnType`]
/// the moment the pipeline tries to expand it into a configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnType {
    Expectation,
    Other(&'static str),
}

/// A terminal measurement bound to an observable and a return type.
#[derive(Clone, Debug)]
pub struct Measurement {
    pub observable: Observable,
    pub return_type: ReturnType,
}

impl Measurement {
    pub fn expval(observable: Observable) -> Self {
        Measurement {
            observable,
            return_type: ReturnType::Expectation,
        }
    }

    pub fn wires(&self) -> Vec<Wire> {
        self.observable.wires()
    }
}

/// An explicit marker instructing the transform to sever the named wires at
/// this point. Carries an optional custom expansion; when absent the
/// pipeline uses [`crate::operator::expansion::simple_expansion`].
#[derive(Clone)]
pub struct WireCutOp {
    pub wires: Vec<Wire>,
    pub custom_expansion: Option<Arc<dyn Fn(Wire) -> (MeasureNode, PrepareNode) + Send + Sync>>,
}

impl fmt::Debug for WireCutOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireCutOp")
            .field("wires", &self.wires)
            .field("custom_expansion", &self.custom_expansion.is_some())
            .finish()
    }
}

impl WireCutOp {
    pub fn new(wires: Vec<Wire>) -> Self {
        WireCutOp {
            wires,
            custom_expansion: None,
        }
    }

    pub fn with_expansion(
        wires: Vec<Wire>,
        expansion: Arc<dyn Fn(Wire) -> (MeasureNode, PrepareNode) + Send + Sync>,
    ) -> Self {
        WireCutOp {
            wires,
            custom_expansion: Some(expansion),
        }
    }
}

/// One basis-state preparation term: a label (for diagnostics) and the gate
/// sequence it realises on a freshly produced wire. Modelled as a callable
/// rather than a closed enum so a custom expansion can supply its own term
/// set of any cardinality.
#[derive(Clone)]
pub struct PrepareTerm {
    pub label: &'static str,
    pub apply: Arc<dyn Fn(Wire) -> Vec<Gate> + Send + Sync>,
}

impl fmt::Debug for PrepareTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrepareTerm({})", self.label)
    }
}

impl PrepareTerm {
    pub fn new(label: &'static str, apply: impl Fn(Wire) -> Vec<Gate> + Send + Sync + 'static) -> Self {
        PrepareTerm {
            label,
            apply: Arc::new(apply),
        }
    }
}

/// The payload shared by every handle to the same synthetic measure node.
/// Carries only the Pauli terms this location may be measured in — *not* a
/// wire: the wire a measure node acts on is contextual (it can change as a
/// fragment is lowered to a tape), so it travels alongside the
/// handle in [`Operator::Measure`] rather than living inside the identity
/// payload itself.
#[derive(Debug)]
pub struct MeasureNodeInner {
    pub terms: Vec<Pauli>,
}

/// A synthetic terminal marking one side of a cut. Two separately
/// constructed nodes for the same cut must never compare equal — identity,
/// not value, is the join key between fragment tapes and communication-graph
/// edges, so equality here is reference equality over the shared `Arc`.
#[derive(Clone, Debug)]
pub struct MeasureNode(pub Arc<MeasureNodeInner>);

impl MeasureNode {
    pub fn new(terms: Vec<Pauli>) -> Self {
        MeasureNode(Arc::new(MeasureNodeInner { terms }))
    }
}

impl PartialEq for MeasureNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for MeasureNode {}
impl Hash for MeasureNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state)
    }
}

/// The payload shared by every handle to the same synthetic prepare node.
/// `change_of_basis` is an `n x n` matrix, `n = terms.len()`, applied along
/// this node's prepare axis by the tensor assembler — carried on the
/// node itself, not hard-coded to the simple 4x4 case, so a custom expansion
/// with a different term cardinality supplies its own matrix. Like
/// [`MeasureNodeInner`], no wire is stored: it is contextual.
#[derive(Debug)]
pub struct PrepareNodeInner {
    pub terms: Vec<PrepareTerm>,
    pub change_of_basis: Vec<Vec<f64>>,
}

/// A synthetic initial marking the other side of a cut. See [`MeasureNode`]
/// for the identity discipline this type shares.
#[derive(Clone, Debug)]
pub struct PrepareNode(pub Arc<PrepareNodeInner>);

impl PrepareNode {
    pub fn new(terms: Vec<PrepareTerm>, change_of_basis: Vec<Vec<f64>>) -> Self {
        PrepareNode(Arc::new(PrepareNodeInner {
            terms,
            change_of_basis,
        }))
    }
}

impl PartialEq for PrepareNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for PrepareNode {}
impl Hash for PrepareNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state)
    }
}

/// A tagged operator node, as carried by a [`crate::tape::Tape`] and by the
/// circuit graph. `Measure`/`Prepare` pair the stable identity handle with
/// the wire this particular instance acts on — the handle never changes,
/// but the wire can, as a fragment is lowered to a tape.
#[derive(Clone, Debug)]
pub enum Operator {
    Gate(Gate),
    Measurement(Measurement),
    WireCut(WireCutOp),
    Measure(MeasureNode, Wire),
    Prepare(PrepareNode, Wire),
}

impl Operator {
    /// The ordered list of wires this operator acts on. Synthetic nodes act
    /// on exactly one wire.
    pub fn wires(&self) -> Vec<Wire> {
        match self {
            Operator::Gate(g) => g.wires(),
            Operator::Measurement(m) => m.wires(),
            Operator::WireCut(c) => c.wires.clone(),
            Operator::Measure(_, w) => vec![*w],
            Operator::Prepare(_, w) => vec![*w],
        }
    }

    pub fn is_measure_node(&self) -> bool {
        matches!(self, Operator::Measure(..))
    }

    pub fn is_prepare_node(&self) -> bool {
        matches!(self, Operator::Prepare(..))
    }

    pub fn is_wire_cut(&self) -> bool {
        matches!(self, Operator::WireCut(_))
    }
}
