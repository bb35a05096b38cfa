//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::matrix::{GateMatrix, Unitary2x2, Unitary4x4};

/// Gates the simulator knows how to apply.
///
/// A gate is an immutable descriptor; it carries its angle (if any) and
/// nothing else, so the same value can be applied any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // Single-qubit Pauli gates
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis: diag(e^{-iθ/2}, e^{iθ/2}).
    Rz(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT). The first target is the control wire.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X => "X",
            Gate::Y => "Y",
            Gate::Z => "Z",
            Gate::H => "H",
            Gate::S => "S",
            Gate::Sdg => "Sdag",
            Gate::T => "T",
            Gate::Tdg => "Tdag",
            Gate::Rx(_) => "Rx",
            Gate::Ry(_) => "Ry",
            Gate::Rz(_) => "Rz",
            Gate::CX => "CX",
            Gate::CZ => "CZ",
            Gate::Swap => "Swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::H
            | Gate::S
            | Gate::Sdg
            | Gate::T
            | Gate::Tdg
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_) => 1,

            Gate::CX | Gate::CZ | Gate::Swap => 2,
        }
    }

    /// The rotation angle, for parameterised gates.
    pub fn angle(&self) -> Option<f64> {
        match self {
            Gate::Rx(theta) | Gate::Ry(theta) | Gate::Rz(theta) => Some(*theta),
            _ => None,
        }
    }

    /// The unitary matrix of this gate.
    pub fn matrix(&self) -> GateMatrix {
        match self {
            Gate::X => GateMatrix::Single(Unitary2x2::x()),
            Gate::Y => GateMatrix::Single(Unitary2x2::y()),
            Gate::Z => GateMatrix::Single(Unitary2x2::z()),
            Gate::H => GateMatrix::Single(Unitary2x2::h()),
            Gate::S => GateMatrix::Single(Unitary2x2::phase(PI / 2.0)),
            Gate::Sdg => GateMatrix::Single(Unitary2x2::phase(-PI / 2.0)),
            Gate::T => GateMatrix::Single(Unitary2x2::phase(PI / 4.0)),
            Gate::Tdg => GateMatrix::Single(Unitary2x2::phase(-PI / 4.0)),
            Gate::Rx(theta) => GateMatrix::Single(Unitary2x2::rx(*theta)),
            Gate::Ry(theta) => GateMatrix::Single(Unitary2x2::ry(*theta)),
            Gate::Rz(theta) => GateMatrix::Single(Unitary2x2::rz(*theta)),
            Gate::CX => GateMatrix::Two(Unitary4x4::cx()),
            Gate::CZ => GateMatrix::Two(Unitary4x4::cz()),
            Gate::Swap => GateMatrix::Two(Unitary4x4::swap()),
        }
    }

    /// True if the gate's matrix is diagonal in the computational basis.
    ///
    /// Diagonal gates never change measurement probabilities, so they leave
    /// a measured qubit classical.
    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            Gate::Z | Gate::S | Gate::Sdg | Gate::T | Gate::Tdg | Gate::Rz(_) | Gate::CZ
        )
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.angle() {
            Some(theta) => write!(f, "{}({theta})", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::EPSILON;

    #[test]
    fn test_gate_properties() {
        assert_eq!(Gate::H.num_qubits(), 1);
        assert_eq!(Gate::Rz(0.5).num_qubits(), 1);
        assert_eq!(Gate::CX.num_qubits(), 2);
        assert_eq!(Gate::Swap.num_qubits(), 2);

        assert_eq!(Gate::H.angle(), None);
        assert_eq!(Gate::Rz(0.5).angle(), Some(0.5));
    }

    #[test]
    fn test_matrix_arity_matches_num_qubits() {
        let gates = [
            Gate::X,
            Gate::Y,
            Gate::Z,
            Gate::H,
            Gate::S,
            Gate::Sdg,
            Gate::T,
            Gate::Tdg,
            Gate::Rx(0.3),
            Gate::Ry(0.3),
            Gate::Rz(0.3),
            Gate::CX,
            Gate::CZ,
            Gate::Swap,
        ];
        for gate in gates {
            assert_eq!(gate.matrix().num_qubits(), gate.num_qubits(), "{gate}");
        }
    }

    #[test]
    fn test_s_and_t_matrices() {
        let GateMatrix::Single(s) = Gate::S.matrix() else {
            panic!("Expected single-qubit matrix");
        };
        let GateMatrix::Single(t) = Gate::T.matrix() else {
            panic!("Expected single-qubit matrix");
        };
        assert!((t * t).approx_eq(&s, EPSILON));
    }

    #[test]
    fn test_diagonal_flag_agrees_with_matrix() {
        for gate in [Gate::Z, Gate::S, Gate::T, Gate::Rz(1.0)] {
            let GateMatrix::Single(m) = gate.matrix() else {
                panic!("Expected single-qubit matrix");
            };
            assert!(gate.is_diagonal());
            assert!(m.is_diagonal());
        }
        assert!(!Gate::H.is_diagonal());
        assert!(!Gate::X.is_diagonal());
        assert!(!Gate::CX.is_diagonal());
    }

    #[test]
    fn test_display() {
        assert_eq!(Gate::H.to_string(), "H");
        assert_eq!(Gate::Rz(1.21).to_string(), "Rz(1.21)");
        assert_eq!(Gate::Sdg.to_string(), "Sdag");
    }
}
