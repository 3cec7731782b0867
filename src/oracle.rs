//! Automatic cut-placement oracle contract.
//!
//! Choosing *where* to cut is out of scope for this crate's own algorithm —
//! no built-in placement heuristic ships here. This module defines the
//! contract a caller's oracle implements, plus a small named registry so a
//! caller can select one by string key instead of wiring up a trait object
//! by hand.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CutError;
use crate::graph::CircuitGraph;
use crate::operator::WireCutOp;

/// Tunables an [`AutoCutOracle`] implementation may use. `extra` carries any
/// oracle-specific knob this contract doesn't name directly.
#[derive(Clone, Debug, Default)]
pub struct OracleConfig {
    pub max_wires: Option<usize>,
    pub max_gates: Option<usize>,
    pub num_partitions: Option<usize>,
    pub extra: HashMap<String, String>,
}

/// A pluggable strategy for choosing where to cut a circuit graph
/// automatically, rather than relying on explicit [`WireCutOp`] markers
/// placed by the caller.
pub trait AutoCutOracle: Send + Sync {
    fn propose_cuts(&self, graph: &CircuitGraph, config: &OracleConfig) -> Result<Vec<WireCutOp>, CutError>;
}

type OracleFactory = Arc<dyn Fn() -> Arc<dyn AutoCutOracle> + Send + Sync>;

/// Resolves a named oracle by string key. Empty by default: this crate
/// ships no built-in placement heuristic, only the contract and a place to
/// register one.
#[derive(Default)]
pub struct OracleRegistry {
    factories: HashMap<String, OracleFactory>,
}

impl OracleRegistry {
    pub fn new() -> Self {
        OracleRegistry::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: OracleFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn AutoCutOracle>> {
        self.factories.get(name).map(|f| f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoOpOracle;
    impl AutoCutOracle for NoOpOracle {
        fn propose_cuts(&self, _graph: &CircuitGraph, _config: &OracleConfig) -> Result<Vec<WireCutOp>, CutError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn unregistered_name_resolves_to_none() {
        let registry = OracleRegistry::new();
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn registered_oracle_resolves_by_name() {
        let mut registry = OracleRegistry::new();
        registry.register("no-op", Arc::new(|| Arc::new(NoOpOracle) as Arc<dyn AutoCutOracle>));
        assert!(registry.resolve("no-op").is_some());
    }
}
