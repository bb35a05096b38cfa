//! Gate inversion utilities.

use crate::command::Command;
use crate::gate::Gate;

/// Compute the inverse of a gate.
///
/// For unitary gates U, this returns U† (U-dagger).
///
/// # Examples
///
/// - H† = H (Hadamard is self-inverse)
/// - X† = X (Pauli gates are self-inverse)
/// - S† = Sdg
/// - T† = Tdg
/// - Rz(θ)† = Rz(-θ)
pub fn inverse_gate(gate: &Gate) -> Gate {
    match gate {
        // Self-inverse gates (Hermitian)
        Gate::X => Gate::X,
        Gate::Y => Gate::Y,
        Gate::Z => Gate::Z,
        Gate::H => Gate::H,
        Gate::CX => Gate::CX,
        Gate::CZ => Gate::CZ,
        Gate::Swap => Gate::Swap,

        // S and T gates
        Gate::S => Gate::Sdg,
        Gate::Sdg => Gate::S,
        Gate::T => Gate::Tdg,
        Gate::Tdg => Gate::T,

        // Rotation gates: negate the angle
        Gate::Rx(theta) => Gate::Rx(-theta),
        Gate::Ry(theta) => Gate::Ry(-theta),
        Gate::Rz(theta) => Gate::Rz(-theta),
    }
}

/// Check if a gate is self-inverse (Hermitian).
pub fn is_self_inverse(gate: &Gate) -> bool {
    matches!(
        gate,
        Gate::X | Gate::Y | Gate::Z | Gate::H | Gate::CX | Gate::CZ | Gate::Swap
    )
}

impl Gate {
    /// The conjugate transpose of this gate.
    pub fn inverse(&self) -> Gate {
        inverse_gate(self)
    }
}

impl Command {
    /// The inverse command: same operands, inverted gate.
    pub fn inverse(&self) -> Command {
        Command {
            gate: self.gate.inverse(),
            targets: self.targets.clone(),
            controls: self.controls.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::EPSILON;
    use crate::qubit::QubitId;
    use std::f64::consts::PI;

    const ALL_GATES: [Gate; 14] = [
        Gate::X,
        Gate::Y,
        Gate::Z,
        Gate::H,
        Gate::S,
        Gate::Sdg,
        Gate::T,
        Gate::Tdg,
        Gate::Rx(0.7),
        Gate::Ry(-1.3),
        Gate::Rz(1.21),
        Gate::CX,
        Gate::CZ,
        Gate::Swap,
    ];

    #[test]
    fn test_self_inverse_gates() {
        assert!(is_self_inverse(&Gate::H));
        assert!(is_self_inverse(&Gate::X));
        assert!(is_self_inverse(&Gate::CX));

        assert!(!is_self_inverse(&Gate::S));
        assert!(!is_self_inverse(&Gate::T));
        assert!(!is_self_inverse(&Gate::Rz(0.1)));
    }

    #[test]
    fn test_inverse_s() {
        assert_eq!(inverse_gate(&Gate::S), Gate::Sdg);
        assert_eq!(inverse_gate(&Gate::Sdg), Gate::S);
    }

    #[test]
    fn test_inverse_rz() {
        let rz_inv = inverse_gate(&Gate::Rz(PI / 4.0));
        let Gate::Rz(theta) = rz_inv else {
            panic!("Expected Rz gate");
        };
        assert!((theta + PI / 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_inverse_matches_matrix_dagger() {
        for gate in ALL_GATES {
            let expected = gate.matrix().dagger();
            let got = gate.inverse().matrix();
            assert!(got.approx_eq(&expected, EPSILON), "{gate}");
        }
    }

    #[test]
    fn test_inverse_is_involution() {
        for gate in ALL_GATES {
            assert_eq!(gate.inverse().inverse(), gate);
        }
    }

    #[test]
    fn test_inverse_command_keeps_operands() {
        let cmd = Command::new(Gate::T, [QubitId(1)], [QubitId(0)]).unwrap();
        let inv = cmd.inverse();
        assert_eq!(inv.gate, Gate::Tdg);
        assert_eq!(inv.targets, cmd.targets);
        assert_eq!(inv.controls, cmd.controls);
    }
}
