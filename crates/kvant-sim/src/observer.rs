//! Observer hook for circuit drawing and logging collaborators.
//!
//! Observers see operations as they execute. Commands deferred inside an
//! inverse scope are reported once, when their inverses actually run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

use kvant_ir::{Command, QubitId};

/// An executed simulator operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// A qubit was allocated in |0⟩.
    Allocate(QubitId),
    /// A qubit was freed.
    Deallocate(QubitId),
    /// A gate was applied.
    Gate(&'a Command),
    /// A qubit was measured.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
        /// The classical outcome.
        outcome: bool,
    },
}

/// Receives every executed operation.
///
/// The simulator ignores what observers do with events; an observer cannot
/// change the simulation.
pub trait Observer: Send {
    /// Called after the operation has taken effect.
    fn observe(&mut self, event: &Event<'_>);
}

/// Owned copy of an [`Event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RecordedEvent {
    /// A qubit was allocated.
    Allocate {
        /// The new qubit.
        qubit: QubitId,
    },
    /// A qubit was freed.
    Deallocate {
        /// The freed qubit.
        qubit: QubitId,
    },
    /// A gate was applied.
    Gate {
        /// The executed command.
        command: Command,
    },
    /// A qubit was measured.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
        /// The classical outcome.
        outcome: bool,
    },
}

impl From<&Event<'_>> for RecordedEvent {
    fn from(event: &Event<'_>) -> Self {
        match *event {
            Event::Allocate(qubit) => RecordedEvent::Allocate { qubit },
            Event::Deallocate(qubit) => RecordedEvent::Deallocate { qubit },
            Event::Gate(command) => RecordedEvent::Gate {
                command: command.clone(),
            },
            Event::Measure { qubit, outcome } => RecordedEvent::Measure { qubit, outcome },
        }
    }
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordedEvent::Allocate { qubit } => write!(f, "Allocate | {qubit}"),
            RecordedEvent::Deallocate { qubit } => write!(f, "Deallocate | {qubit}"),
            RecordedEvent::Gate { command } => write!(f, "{command}"),
            RecordedEvent::Measure { qubit, outcome } => {
                write!(f, "Measure | {qubit} = {}", u8::from(*outcome))
            }
        }
    }
}

/// Observer that keeps every event for later inspection.
///
/// Clones share the same log, so a clone can be handed to the simulator while
/// the caller keeps another to read from.
#[derive(Debug, Clone, Default)]
pub struct CircuitRecorder {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl CircuitRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RecordedEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Copy of all recorded events.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    /// Executed gate commands only.
    pub fn commands(&self) -> Vec<Command> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Gate { command } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// One line per event in command-printer layout.
    pub fn render(&self) -> String {
        self.lock()
            .iter()
            .map(|e| format!("{e}\n"))
            .collect()
    }

    /// Serialize the log as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.lock())
    }
}

impl Observer for CircuitRecorder {
    fn observe(&mut self, event: &Event<'_>) {
        self.lock().push(RecordedEvent::from(event));
    }
}
