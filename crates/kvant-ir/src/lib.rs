//! Kvant Gate Representation
//!
//! This crate provides the value types shared by the Kvant simulator and its
//! clients: qubit handles, the closed set of supported gates, their unitary
//! matrices, and commands binding a gate to concrete qubits.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] handles issued by a simulator
//! - **Gates**: [`Gate`], a closed enumeration (H, X, Y, Z, S, T, rotations, CX, CZ, SWAP)
//! - **Matrices**: [`Unitary2x2`], [`Unitary4x4`] and [`GateMatrix`]
//! - **Commands**: [`Command`] combining a gate with targets and controls
//! - **Inversion**: [`inverse_gate`] and [`Command::inverse`] for uncomputation
//!
//! # Example
//!
//! ```rust
//! use kvant_ir::{Command, Gate, QubitId};
//!
//! let rz = Command::gate(Gate::Rz(1.21), [QubitId(0)]).unwrap();
//! assert_eq!(rz.to_string(), "Rz(1.21) | q0");
//!
//! // Rz(θ)† = Rz(-θ)
//! assert_eq!(rz.inverse().gate, Gate::Rz(-1.21));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CZ` | 2 | Controlled-Z |
//! | `Swap` | 2 | SWAP gate |

pub mod command;
pub mod error;
pub mod gate;
pub mod inverse;
pub mod matrix;
pub mod qubit;

pub use command::Command;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use inverse::{inverse_gate, is_self_inverse};
pub use matrix::{GateMatrix, Unitary2x2, Unitary4x4};
pub use qubit::QubitId;
