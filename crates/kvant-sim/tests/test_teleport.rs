//! End-to-end teleportation with uncompute-and-free verification.

use kvant_sim::{QubitId, SimResult, Simulator};

/// Prepare an arbitrary single-qubit state from |0⟩.
fn prepare(sim: &mut Simulator, q: QubitId) -> SimResult<()> {
    sim.ry(0.83, q)?;
    sim.rz(1.21, q)?;
    sim.t(q)
}

/// Teleport a prepared state and return the two classical bits.
fn teleport_once(sim: &mut Simulator) -> SimResult<(bool, bool)> {
    let psi = sim.allocate();
    let b1 = sim.allocate();
    let b2 = sim.allocate();

    sim.h(b1)?;
    sim.cx(b1, b2)?;
    prepare(sim, psi)?;

    sim.cx(psi, b1)?;
    sim.h(psi)?;
    let m0 = sim.measure(psi)?;
    let m1 = sim.measure(b1)?;

    if m1 {
        sim.x(b2)?;
    }
    if m0 {
        sim.z(b2)?;
    }

    // b2 now holds the prepared state; undoing the preparation must give |0⟩.
    sim.with_inverse(|sim| prepare(sim, b2))?;
    sim.deallocate(b2)?;
    sim.deallocate(psi)?;
    sim.deallocate(b1)?;
    Ok((m0, m1))
}

#[test]
fn teleport_all_outcomes() {
    let mut sim = Simulator::seeded(31);
    let mut seen = [[false; 2]; 2];
    for _ in 0..64 {
        let (m0, m1) = teleport_once(&mut sim).unwrap();
        seen[usize::from(m0)][usize::from(m1)] = true;
        assert_eq!(sim.num_qubits(), 0);
    }
    assert!(seen.iter().flatten().all(|&s| s), "outcomes seen: {seen:?}");
}

#[test]
fn teleport_without_correction_fails_to_free() {
    // Skipping the corrections leaves b2 in the wrong state for some outcome.
    let mut sim = Simulator::seeded(31);
    let mut failures = 0;
    for _ in 0..64 {
        let psi = sim.allocate();
        let b1 = sim.allocate();
        let b2 = sim.allocate();
        sim.h(b1).unwrap();
        sim.cx(b1, b2).unwrap();
        prepare(&mut sim, psi).unwrap();
        sim.cx(psi, b1).unwrap();
        sim.h(psi).unwrap();
        sim.measure(psi).unwrap();
        sim.measure(b1).unwrap();

        sim.with_inverse(|sim| prepare(sim, b2)).unwrap();
        if sim.deallocate(b2).is_err() {
            failures += 1;
            sim.measure(b2).unwrap();
            sim.deallocate(b2).unwrap();
        }
        sim.deallocate(psi).unwrap();
        sim.deallocate(b1).unwrap();
    }
    assert!(failures > 0);
    assert_eq!(sim.num_qubits(), 0);
}
