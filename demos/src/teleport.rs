//! Quantum teleportation on the Kvant simulator.
//!
//! Alice holds a qubit in the state `Rz(angle) H |0⟩` and shares a Bell pair
//! with Bob. After her Bell-basis measurement Bob applies the corrections
//! conditioned on her two bits. Running the state preparation backwards on
//! Bob's qubit must then leave it in |0⟩, which deallocation verifies.

use serde::Serialize;
use tracing::{debug, warn};

use kvant_sim::{CircuitRecorder, QubitId, SimResult, Simulator, SimulatorConfig};

/// Default preparation angle.
pub const DEFAULT_ANGLE: f64 = 1.21;

/// Classical bits Alice sends to Bob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TeleportOutcome {
    /// Measurement of the teleported qubit.
    pub m0: bool,
    /// Measurement of Alice's half of the Bell pair.
    pub m1: bool,
}

impl TeleportOutcome {
    /// Index into a 2x2 outcome table.
    pub fn index(self) -> (usize, usize) {
        (usize::from(self.m0), usize::from(self.m1))
    }
}

/// Allocate two qubits and entangle them into (|00⟩ + |11⟩)/√2.
///
/// On failure both qubits are released again.
pub fn create_bell_pair(sim: &mut Simulator) -> SimResult<(QubitId, QubitId)> {
    let b1 = sim.allocate();
    let b2 = sim.allocate();
    let entangled = sim.h(b1).and_then(|()| sim.cx(b1, b2));
    if let Err(e) = entangled {
        release(sim, &[b1, b2]);
        return Err(e);
    }
    Ok((b1, b2))
}

/// Free every qubit in `qubits` that is still live.
///
/// A qubit that cannot be freed directly is measured first, which always
/// makes it releasable. Used to clean up after a failed protocol run.
pub fn release(sim: &mut Simulator, qubits: &[QubitId]) {
    for &q in qubits {
        if !sim.is_live(q) || sim.deallocate(q).is_ok() {
            continue;
        }
        if let Err(e) = sim.measure(q).and_then(|_| sim.deallocate(q)) {
            warn!(qubit = %q, error = %e, "Could not release qubit");
        }
    }
}

/// Prepare `Rz(angle) H |0⟩` on `q`.
pub fn create_state(sim: &mut Simulator, q: QubitId, angle: f64) -> SimResult<()> {
    sim.h(q)?;
    sim.rz(angle, q)
}

/// Undo [`create_state`], returning `q` to |0⟩.
pub fn uncompute_state(sim: &mut Simulator, q: QubitId, angle: f64) -> SimResult<()> {
    sim.with_inverse(|sim| create_state(sim, q, angle))
}

/// Teleport the state of `psi` onto `b2` using the pair `(b1, b2)`.
pub fn teleport(
    sim: &mut Simulator,
    psi: QubitId,
    b1: QubitId,
    b2: QubitId,
) -> SimResult<TeleportOutcome> {
    sim.cx(psi, b1)?;
    sim.h(psi)?;
    let m0 = sim.measure(psi)?;
    let m1 = sim.measure(b1)?;

    sim.with_control(&[b1], |sim| sim.x(b2))?;
    sim.with_control(&[psi], |sim| sim.z(b2))?;
    Ok(TeleportOutcome { m0, m1 })
}

/// Run the full protocol once and free every qubit it used.
///
/// Fails with [`SimError::InvalidState`](kvant_sim::SimError::InvalidState)
/// if Bob's qubit does not return to |0⟩ after uncomputation. The trial's
/// qubits are released on every path, so a failed trial leaves the
/// simulator as it found it.
pub fn run_trial(sim: &mut Simulator, angle: f64) -> SimResult<TeleportOutcome> {
    let (b1, b2) = create_bell_pair(sim)?;
    let psi = sim.allocate();

    let result = teleport_and_verify(sim, psi, b1, b2, angle);
    if result.is_err() {
        release(sim, &[b2, psi, b1]);
    }
    result
}

fn teleport_and_verify(
    sim: &mut Simulator,
    psi: QubitId,
    b1: QubitId,
    b2: QubitId,
    angle: f64,
) -> SimResult<TeleportOutcome> {
    create_state(sim, psi, angle)?;

    let outcome = teleport(sim, psi, b1, b2)?;
    debug!(m0 = outcome.m0, m1 = outcome.m1, "Teleported");

    uncompute_state(sim, b2, angle)?;
    sim.deallocate(b2)?;
    sim.deallocate(psi)?;
    sim.deallocate(b1)?;
    Ok(outcome)
}

/// Run one trial on a fresh simulator and return the executed circuit.
pub fn record_trial(
    config: SimulatorConfig,
    angle: f64,
) -> SimResult<(TeleportOutcome, CircuitRecorder)> {
    let recorder = CircuitRecorder::new();
    let mut sim = Simulator::with_config(config)?;
    sim.add_observer(Box::new(recorder.clone()));
    let outcome = run_trial(&mut sim, angle)?;
    Ok((outcome, recorder))
}

/// Aggregated results of repeated trials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrialSummary {
    /// Number of trials attempted.
    pub trials: u64,
    /// `counts[m0][m1]` is how often each outcome occurred.
    pub counts: [[u64; 2]; 2],
    /// Trials where uncomputation did not restore |0⟩.
    pub failures: u64,
}

impl TrialSummary {
    /// Record one trial result.
    pub fn record(&mut self, result: &SimResult<TeleportOutcome>) {
        self.trials += 1;
        match result {
            Ok(outcome) => {
                let (i, j) = outcome.index();
                self.counts[i][j] += 1;
            }
            Err(_) => self.failures += 1,
        }
    }

    /// True if every trial succeeded and all four outcomes occurred.
    pub fn all_outcomes_verified(&self) -> bool {
        self.failures == 0 && self.counts.iter().flatten().all(|&n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_pair_correlated() {
        let mut sim = Simulator::seeded(4);
        let (b1, b2) = create_bell_pair(&mut sim).unwrap();
        let p = sim.probability_of(&[b1, b2], &[true, true]).unwrap();
        assert!((p - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_create_uncompute_round_trip() {
        let mut sim = Simulator::seeded(4);
        let q = sim.allocate();
        create_state(&mut sim, q, 0.7).unwrap();
        uncompute_state(&mut sim, q, 0.7).unwrap();
        sim.deallocate(q).unwrap();
    }

    #[test]
    fn test_release_frees_entangled_qubits() {
        let mut sim = Simulator::seeded(4);
        let (b1, b2) = create_bell_pair(&mut sim).unwrap();
        let extra = sim.allocate();
        sim.deallocate(extra).unwrap();

        release(&mut sim, &[b1, b2, extra]);
        assert_eq!(sim.num_qubits(), 0);
        assert!((sim.norm_sqr() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = TrialSummary::default();
        summary.record(&Ok(TeleportOutcome { m0: true, m1: false }));
        assert_eq!(summary.counts[1][0], 1);
        assert!(!summary.all_outcomes_verified());
    }
}
