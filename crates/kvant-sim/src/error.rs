//! Error types for the simulator crate.

use kvant_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors produced by simulator operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The handle was never allocated or has already been freed.
    #[error("Unknown qubit {0}")]
    UnknownQubit(QubitId),

    /// Deallocation of a qubit that is not in |0⟩.
    #[error("Qubit {qubit} is not in |0⟩ (P(1) = {probability:e}); uncompute it before deallocation")]
    InvalidState {
        /// The qubit being freed.
        qubit: QubitId,
        /// Probability of finding the qubit in |1⟩.
        probability: f64,
    },

    /// Gate arity does not match the number of targets supplied.
    #[error("Gate '{gate}' acts on {expected} qubits, got {got} targets")]
    DimensionMismatch {
        /// Name of the gate.
        gate: String,
        /// Number of qubits the gate's matrix acts on.
        expected: u32,
        /// Number of targets supplied.
        got: u32,
    },

    /// A qubit appears more than once among targets and controls.
    #[error("Qubit {0} appears more than once in the same operation")]
    DuplicateQubit(QubitId),

    /// A non-unitary operation was issued while an inverse scope is open.
    #[error("Cannot {0} inside an inverse scope")]
    NonUnitaryInInverse(&'static str),

    /// Forced collapse onto an outcome that cannot occur.
    #[error("Outcome has probability {probability:e}; cannot collapse onto it")]
    ImpossibleOutcome {
        /// Probability of the requested outcome.
        probability: f64,
    },

    /// Qubit and value slices of different length.
    #[error("Got {qubits} qubits but {values} values")]
    LengthMismatch {
        /// Number of qubits supplied.
        qubits: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// An amplitude lookup did not name every live qubit.
    #[error("Basis state names {given} qubits but {live} are live")]
    IncompleteBasisState {
        /// Number of qubits named.
        given: usize,
        /// Number of live qubits.
        live: usize,
    },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command construction failed.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;
