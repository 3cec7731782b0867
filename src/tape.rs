//! A linear tape of operations and terminal measurements — the unit the
//! simulator consumes and the unit the graph lifting step produces from.

use std::collections::BTreeSet;

use crate::operator::{Measurement, Operator, Wire};

/// A linear sequence of operations followed by terminal measurements.
#[derive(Clone, Debug, Default)]
pub struct Tape {
    pub operations: Vec<Operator>,
    pub measurements: Vec<Measurement>,
}

impl Tape {
    pub fn new() -> Self {
        Tape::default()
    }

    /// The set of wires touched by any operation or measurement on this tape.
    pub fn wires(&self) -> BTreeSet<Wire> {
        let mut wires = BTreeSet::new();
        for op in &self.operations {
            wires.extend(op.wires());
        }
        for m in &self.measurements {
            wires.extend(m.wires());
        }
        wires
    }

    /// Records operations applied within `f` onto a fresh tape. Mirrors the
    /// source's `QuantumTape` context-manager capture region.
    pub fn capture<F: FnOnce(&mut Recorder)>(f: F) -> Tape {
        let mut tape = Tape::new();
        {
            let mut recorder = Recorder {
                tape: &mut tape,
                suppressed: false,
            };
            f(&mut recorder);
        }
        tape
    }
}

/// A scoped recording context. Operations and measurements applied through a
/// `Recorder` are appended to its tape unless recording has been suppressed
/// via [`Recorder::without_recording`] — used when computing a derived
/// observable (e.g. a running cut-term tensor product) without
/// emitting it as a tape operation.
pub struct Recorder<'a> {
    tape: &'a mut Tape,
    suppressed: bool,
}

impl<'a> Recorder<'a> {
    pub fn apply(&mut self, op: Operator) {
        if !self.suppressed {
            self.tape.operations.push(op);
        }
    }

    pub fn measure(&mut self, m: Measurement) {
        if !self.suppressed {
            self.tape.measurements.push(m);
        }
    }

    /// Runs `f` with recording suppressed, then restores the prior state.
    pub fn without_recording<F: FnOnce(&mut Recorder)>(&mut self, f: F) {
        let prev = self.suppressed;
        self.suppressed = true;
        f(self);
        self.suppressed = prev;
    }
}
