//! Commands: a gate bound to its target and control qubits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::QubitId;

/// A gate applied to concrete qubits.
///
/// `targets` are the gate's own operands (for `CX` the first one is the
/// control wire baked into the gate). `controls` are additional qubits that
/// must all be 1 for the gate to act.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The gate.
    pub gate: Gate,
    /// Qubits the gate's matrix acts on, in order.
    pub targets: Vec<QubitId>,
    /// Extra control qubits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<QubitId>,
}

impl Command {
    /// Create a validated command.
    ///
    /// Fails if the number of targets does not match the gate's arity or if a
    /// qubit appears more than once across targets and controls.
    pub fn new(
        gate: Gate,
        targets: impl IntoIterator<Item = QubitId>,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let command = Self {
            gate,
            targets: targets.into_iter().collect(),
            controls: controls.into_iter().collect(),
        };
        command.validate()?;
        Ok(command)
    }

    /// Create an uncontrolled command.
    pub fn gate(gate: Gate, targets: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        Self::new(gate, targets, std::iter::empty())
    }

    /// Check arity and operand uniqueness.
    pub fn validate(&self) -> IrResult<()> {
        let got = self.targets.len() as u32;
        if got != self.gate.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.gate.name().to_string(),
                expected: self.gate.num_qubits(),
                got,
            });
        }

        let mut seen: Vec<QubitId> = Vec::with_capacity(self.targets.len() + self.controls.len());
        for &qubit in self.qubits() {
            if seen.contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(self.gate.name().to_string()),
                });
            }
            seen.push(qubit);
        }
        Ok(())
    }

    /// Add controls, skipping any already present.
    #[must_use]
    pub fn with_controls(mut self, controls: impl IntoIterator<Item = QubitId>) -> Self {
        for qubit in controls {
            if !self.controls.contains(&qubit) {
                self.controls.push(qubit);
            }
        }
        self
    }

    /// Every qubit the command touches: targets first, then controls.
    pub fn qubits(&self) -> impl Iterator<Item = &QubitId> {
        self.targets.iter().chain(self.controls.iter())
    }

    /// Check if this is a controlled command.
    pub fn is_controlled(&self) -> bool {
        !self.controls.is_empty()
    }
}

fn write_qubits(f: &mut fmt::Formatter<'_>, qubits: &[QubitId]) -> fmt::Result {
    if let [single] = qubits {
        return write!(f, "{single}");
    }
    f.write_str("( ")?;
    for (i, q) in qubits.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{q}")?;
    }
    f.write_str(" )")
}

/// Command-printer layout: `H | q0`, `CX | ( q0, q1 )`, `C(X) | ( q1, q2 )`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.controls.is_empty() {
            write!(f, "{} | ", self.gate)?;
            write_qubits(f, &self.targets)
        } else {
            let prefix = "C".repeat(self.controls.len());
            write!(f, "{prefix}({}) | ", self.gate)?;
            let all: Vec<QubitId> = self
                .controls
                .iter()
                .chain(self.targets.iter())
                .copied()
                .collect();
            write_qubits(f, &all)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_creation() {
        let cmd = Command::gate(Gate::H, [QubitId(0)]).unwrap();
        assert_eq!(cmd.targets, vec![QubitId(0)]);
        assert!(!cmd.is_controlled());

        let cmd = Command::new(Gate::X, [QubitId(2)], [QubitId(1)]).unwrap();
        assert!(cmd.is_controlled());
        assert_eq!(cmd.qubits().count(), 2);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = Command::gate(Gate::CX, [QubitId(0)]).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_operands() {
        let err = Command::gate(Gate::CX, [QubitId(0), QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(0), .. }));

        let err = Command::new(Gate::X, [QubitId(1)], [QubitId(1)]).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_with_controls_deduplicates() {
        let cmd = Command::new(Gate::X, [QubitId(2)], [QubitId(0)])
            .unwrap()
            .with_controls([QubitId(0), QubitId(1)]);
        assert_eq!(cmd.controls, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_display() {
        let h = Command::gate(Gate::H, [QubitId(0)]).unwrap();
        assert_eq!(h.to_string(), "H | q0");

        let cx = Command::gate(Gate::CX, [QubitId(0), QubitId(1)]).unwrap();
        assert_eq!(cx.to_string(), "CX | ( q0, q1 )");

        let cz = Command::new(Gate::Z, [QubitId(2)], [QubitId(0)]).unwrap();
        assert_eq!(cz.to_string(), "C(Z) | ( q0, q2 )");

        let rz = Command::gate(Gate::Rz(1.21), [QubitId(3)]).unwrap();
        assert_eq!(rz.to_string(), "Rz(1.21) | q3");
    }

    #[test]
    fn test_serde_omits_empty_controls() {
        let cmd = Command::gate(Gate::H, [QubitId(0)]).unwrap();
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(!json.contains("controls"));

        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
