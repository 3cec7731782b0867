//! Wire labels.

use std::fmt;

/// An opaque, hashable label for a single qubit line. Wire equality drives
/// graph edges and measurement routing; nothing about the pipeline cares
/// what a wire "means" beyond its identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wire(pub u64);

impl Wire {
    pub fn new(id: u64) -> Self {
        Wire(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Wire {
    fn from(id: u64) -> Self {
        Wire(id)
    }
}
