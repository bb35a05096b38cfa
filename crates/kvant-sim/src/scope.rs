//! RAII guards for control and inverse scopes.
//!
//! A guard mutably borrows the simulator and dereferences to it, so all
//! operations inside the scope go through the guard. Scopes nest in strict
//! LIFO order because an inner guard borrows the outer one.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::error::SimResult;
use crate::simulator::Simulator;

/// Open control scope. Closes when dropped.
#[derive(Debug)]
pub struct ControlGuard<'a> {
    sim: &'a mut Simulator,
    depth: usize,
}

impl<'a> ControlGuard<'a> {
    pub(crate) fn new(sim: &'a mut Simulator, depth: usize) -> Self {
        Self { sim, depth }
    }
}

impl Deref for ControlGuard<'_> {
    type Target = Simulator;

    fn deref(&self) -> &Simulator {
        self.sim
    }
}

impl DerefMut for ControlGuard<'_> {
    fn deref_mut(&mut self) -> &mut Simulator {
        self.sim
    }
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.sim.close_control(self.depth);
    }
}

/// Open inverse scope.
///
/// Call [`end`](Self::end) to apply the inverses of the recorded gates.
/// Dropping the guard without `end` discards them.
#[derive(Debug)]
pub struct InverseGuard<'a> {
    sim: &'a mut Simulator,
    depth: usize,
    finished: bool,
}

impl<'a> InverseGuard<'a> {
    pub(crate) fn new(sim: &'a mut Simulator, depth: usize) -> Self {
        Self {
            sim,
            depth,
            finished: false,
        }
    }

    /// Close the scope and apply the inverse of every recorded gate, last
    /// first. If an outer inverse scope is open the inverses are recorded
    /// there instead.
    pub fn end(mut self) -> SimResult<()> {
        self.finished = true;
        trace!(depth = self.depth, "Ending inverse scope");
        self.sim.close_inverse(self.depth)
    }

    /// Number of gates recorded so far in this scope.
    pub fn recorded(&self) -> usize {
        self.sim.recorded_in(self.depth)
    }
}

impl Deref for InverseGuard<'_> {
    type Target = Simulator;

    fn deref(&self) -> &Simulator {
        self.sim
    }
}

impl DerefMut for InverseGuard<'_> {
    fn deref_mut(&mut self) -> &mut Simulator {
        self.sim
    }
}

impl Drop for InverseGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.sim.discard_inverse(self.depth);
        }
    }
}
