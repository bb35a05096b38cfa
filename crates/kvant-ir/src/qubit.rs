//! Qubit handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle for a qubit owned by a simulator.
///
/// A handle carries no state of its own; the qubit's state lives in the
/// simulator's amplitude vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}
