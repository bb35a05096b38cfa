//! The simulator: owns the amplitude store and every piece of simulation state.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, trace, warn};

use kvant_ir::{Command, Gate, IrError, QubitId};

use crate::config::SimulatorConfig;
use crate::error::{SimError, SimResult};
use crate::observer::{Event, Observer};
use crate::registry::QubitRegistry;
use crate::scope::{ControlGuard, InverseGuard};
use crate::statevector::Statevector;

/// Copy of the full state for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Live qubits; `qubits[k]` is bit `k` of an amplitude index.
    pub qubits: Vec<QubitId>,
    /// The amplitudes, indexed little-endian over `qubits`.
    pub amplitudes: Vec<Complex64>,
}

/// State-vector simulator.
///
/// Every operation takes `&mut self`, so a simulator has exactly one writer
/// at a time. Independent simulators share nothing.
pub struct Simulator {
    /// Joint state of all live qubits.
    state: Statevector,
    /// Handle bookkeeping.
    registry: QubitRegistry,
    /// Tolerances and seed.
    config: SimulatorConfig,
    /// Source of measurement randomness.
    rng: StdRng,
    /// One frame of extra controls per open control scope.
    control_stack: Vec<Vec<QubitId>>,
    /// One command log per open inverse scope.
    inverse_stack: Vec<Vec<Command>>,
    /// Notified after every executed operation.
    observers: Vec<Box<dyn Observer>>,
}

impl Simulator {
    /// Create a simulator with default settings and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::build(SimulatorConfig::default())
    }

    /// Create a simulator with a fixed RNG seed.
    pub fn seeded(seed: u64) -> Self {
        Self::build(SimulatorConfig::default().with_seed(seed))
    }

    /// Create a simulator from a configuration.
    ///
    /// Fails with [`SimError::Config`] if the configuration does not pass
    /// [`SimulatorConfig::validate`].
    pub fn with_config(config: SimulatorConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(seed = ?config.seed, "Creating simulator");
        Self {
            state: Statevector::new(0),
            registry: QubitRegistry::new(),
            config,
            rng,
            control_stack: Vec::new(),
            inverse_stack: Vec::new(),
            observers: Vec::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Register an observer.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    fn notify(&mut self, event: &Event<'_>) {
        for observer in &mut self.observers {
            observer.observe(event);
        }
    }

    // =========================================================================
    // Qubit lifecycle
    // =========================================================================

    /// Allocate a qubit in |0⟩.
    pub fn allocate(&mut self) -> QubitId {
        let position = self.state.push_qubit();
        let (qubit, registered) = self.registry.allocate();
        debug_assert_eq!(position, registered);
        trace!(%qubit, position, "Allocated qubit");
        self.notify(&Event::Allocate(qubit));
        qubit
    }

    /// Allocate `n` qubits.
    pub fn allocate_register(&mut self, n: usize) -> Vec<QubitId> {
        (0..n).map(|_| self.allocate()).collect()
    }

    /// Free a qubit.
    ///
    /// A qubit that was measured (and not disturbed since) can always be
    /// freed: its bit is dropped on the measured value. Any other qubit must
    /// be in |0⟩, otherwise this fails with [`SimError::InvalidState`] and the
    /// simulator is left unchanged.
    #[instrument(skip(self))]
    pub fn deallocate(&mut self, qubit: QubitId) -> SimResult<()> {
        if !self.inverse_stack.is_empty() {
            return Err(SimError::NonUnitaryInInverse("deallocate"));
        }
        let position = self.registry.position(qubit)?;

        let keep = match self.registry.classical_value(qubit) {
            Some(value) => value,
            None => {
                let probability = self.state.probability_one(position);
                if probability > self.config.dealloc_tolerance {
                    warn!(%qubit, probability, "Refusing to deallocate qubit not in |0⟩");
                    return Err(SimError::InvalidState {
                        qubit,
                        probability,
                    });
                }
                false
            }
        };

        self.state.remove_qubit(position, keep);
        self.registry.remove(qubit)?;
        debug!(%qubit, position, "Deallocated qubit");
        self.notify(&Event::Deallocate(qubit));
        Ok(())
    }

    /// Free several qubits, stopping at the first failure.
    pub fn deallocate_register(&mut self, qubits: &[QubitId]) -> SimResult<()> {
        qubits.iter().try_for_each(|&q| self.deallocate(q))
    }

    // =========================================================================
    // Gate application
    // =========================================================================

    /// Apply a gate to `targets`, conditioned on every qubit in `controls`
    /// and in all open control scopes being 1.
    ///
    /// Inside an inverse scope the command is recorded instead of executed.
    pub fn apply(&mut self, gate: Gate, targets: &[QubitId], controls: &[QubitId]) -> SimResult<()> {
        let command = self.build_command(gate, targets, controls)?;
        self.dispatch(command)
    }

    /// Apply a prepared command, adding the controls of open control scopes.
    pub fn apply_command(&mut self, command: &Command) -> SimResult<()> {
        self.apply(command.gate, &command.targets, &command.controls)
    }

    fn build_command(
        &self,
        gate: Gate,
        targets: &[QubitId],
        controls: &[QubitId],
    ) -> SimResult<Command> {
        let got = targets.len() as u32;
        if got != gate.num_qubits() {
            return Err(SimError::DimensionMismatch {
                gate: gate.name().to_string(),
                expected: gate.num_qubits(),
                got,
            });
        }

        let mut command = Command {
            gate,
            targets: targets.to_vec(),
            controls: Vec::new(),
        }
        .with_controls(controls.iter().copied());
        for frame in &self.control_stack {
            command = command.with_controls(frame.iter().copied());
        }

        match command.validate() {
            Ok(()) => {}
            Err(IrError::DuplicateQubit { qubit, .. }) => {
                return Err(SimError::DuplicateQubit(qubit));
            }
            Err(e) => return Err(e.into()),
        }

        for &qubit in command.qubits() {
            self.registry.position(qubit)?;
        }
        Ok(command)
    }

    /// Record into the innermost inverse scope, or execute.
    pub(crate) fn dispatch(&mut self, command: Command) -> SimResult<()> {
        let depth = self.inverse_stack.len();
        if let Some(frame) = self.inverse_stack.last_mut() {
            trace!(%command, depth, "Recording for inverse");
            frame.push(command);
            return Ok(());
        }
        self.execute(&command)
    }

    fn execute(&mut self, command: &Command) -> SimResult<()> {
        let positions = self.registry.positions(&command.targets)?;
        let ctrl_mask = self.registry.mask(&command.controls)?;
        self.state
            .apply_matrix(&command.gate.matrix(), &positions, ctrl_mask);
        trace!(%command, "Applied");

        self.refresh_classical(command, &positions);
        self.notify(&Event::Gate(command));
        Ok(())
    }

    /// Drop cached outcomes of targets the gate moved out of their basis state.
    fn refresh_classical(&mut self, command: &Command, positions: &[usize]) {
        if command.gate.is_diagonal() {
            return;
        }
        for (&qubit, &position) in command.targets.iter().zip(positions) {
            if let Some(value) = self.registry.classical_value(qubit) {
                let p1 = self.state.probability_one(position);
                let p = if value { p1 } else { 1.0 - p1 };
                if p < 1.0 - self.config.tolerance {
                    trace!(%qubit, "Qubit no longer classical");
                    self.registry.clear_classical(qubit);
                }
            }
        }
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::H, &[qubit], &[])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::X, &[qubit], &[])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::Y, &[qubit], &[])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::Z, &[qubit], &[])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::S, &[qubit], &[])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::T, &[qubit], &[])
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::Rx(theta), &[qubit], &[])
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::Ry(theta), &[qubit], &[])
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> SimResult<()> {
        self.apply(Gate::Rz(theta), &[qubit], &[])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> SimResult<()> {
        self.apply(Gate::CX, &[control, target], &[])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> SimResult<()> {
        self.apply(Gate::CZ, &[control, target], &[])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> SimResult<()> {
        self.apply(Gate::Swap, &[q1, q2], &[])
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    /// Open a control scope: until the guard drops, every gate issued through
    /// it is additionally controlled on `controls`.
    pub fn control(&mut self, controls: &[QubitId]) -> SimResult<ControlGuard<'_>> {
        for &qubit in controls {
            self.registry.position(qubit)?;
        }
        self.control_stack.push(controls.to_vec());
        let depth = self.control_stack.len() - 1;
        trace!(?controls, depth, "Opened control scope");
        Ok(ControlGuard::new(self, depth))
    }

    /// Run `body` with every gate additionally controlled on `controls`.
    pub fn with_control<R>(
        &mut self,
        controls: &[QubitId],
        body: impl FnOnce(&mut Simulator) -> SimResult<R>,
    ) -> SimResult<R> {
        let mut guard = self.control(controls)?;
        body(&mut *guard)
    }

    pub(crate) fn close_control(&mut self, depth: usize) {
        self.control_stack.truncate(depth);
        trace!(depth, "Closed control scope");
    }

    /// Open an inverse scope: gates issued through the guard are recorded and
    /// applied as their inverses, in reverse order, by [`InverseGuard::end`].
    pub fn inverse(&mut self) -> InverseGuard<'_> {
        self.inverse_stack.push(Vec::new());
        let depth = self.inverse_stack.len() - 1;
        trace!(depth, "Opened inverse scope");
        InverseGuard::new(self, depth)
    }

    /// Run `body`, then apply the inverse of every gate it issued.
    ///
    /// If `body` fails nothing it issued is applied.
    pub fn with_inverse<R>(
        &mut self,
        body: impl FnOnce(&mut Simulator) -> SimResult<R>,
    ) -> SimResult<R> {
        let mut guard = self.inverse();
        let value = body(&mut *guard)?;
        guard.end()?;
        Ok(value)
    }

    pub(crate) fn close_inverse(&mut self, depth: usize) -> SimResult<()> {
        let commands = self
            .inverse_stack
            .split_off(depth)
            .into_iter()
            .next()
            .unwrap_or_default();
        debug!(depth, ops = commands.len(), "Replaying inverse scope");
        for command in commands.iter().rev() {
            self.dispatch(command.inverse())?;
        }
        Ok(())
    }

    pub(crate) fn discard_inverse(&mut self, depth: usize) {
        let dropped: usize = self
            .inverse_stack
            .split_off(depth)
            .iter()
            .map(Vec::len)
            .sum();
        warn!(depth, dropped, "Inverse scope dropped without end(); discarding recorded gates");
    }

    pub(crate) fn recorded_in(&self, depth: usize) -> usize {
        self.inverse_stack.get(depth).map_or(0, Vec::len)
    }

    /// Number of open inverse scopes.
    pub fn inverse_depth(&self) -> usize {
        self.inverse_stack.len()
    }

    /// Controls contributed by open control scopes, outermost first.
    pub fn active_controls(&self) -> Vec<QubitId> {
        let mut out: Vec<QubitId> = Vec::new();
        for &qubit in self.control_stack.iter().flatten() {
            if !out.contains(&qubit) {
                out.push(qubit);
            }
        }
        out
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit in the computational basis.
    ///
    /// A qubit whose cached outcome is still valid returns it without
    /// resampling. Probabilities within `tolerance` of 0 or 1 are resolved
    /// without drawing a random number.
    #[instrument(skip(self))]
    pub fn measure(&mut self, qubit: QubitId) -> SimResult<bool> {
        if !self.inverse_stack.is_empty() {
            return Err(SimError::NonUnitaryInInverse("measure"));
        }
        let position = self.registry.position(qubit)?;

        let outcome = match self.registry.classical_value(qubit) {
            Some(value) => value,
            None => {
                let p1 = self.state.probability_one(position);
                let outcome = if p1 <= self.config.tolerance {
                    false
                } else if p1 >= 1.0 - self.config.tolerance {
                    true
                } else {
                    self.rng.r#gen::<f64>() < p1
                };
                let p = if outcome { p1 } else { 1.0 - p1 };
                let mask = 1 << position;
                self.state
                    .project(mask, if outcome { mask } else { 0 }, p)?;
                self.registry.set_classical(qubit, outcome);
                debug!(%qubit, p1, outcome, "Measured qubit");
                outcome
            }
        };

        self.notify(&Event::Measure { qubit, outcome });
        Ok(outcome)
    }

    /// Measure several qubits in order.
    pub fn measure_register(&mut self, qubits: &[QubitId]) -> SimResult<Vec<bool>> {
        qubits.iter().map(|&q| self.measure(q)).collect()
    }

    /// Force the outcome `values` on `qubits`, as if they had been measured.
    ///
    /// Observers see one `Measure` event per qubit.
    ///
    /// Fails with [`SimError::ImpossibleOutcome`] if the outcome has
    /// probability within `tolerance` of zero.
    #[instrument(skip(self))]
    pub fn collapse(&mut self, qubits: &[QubitId], values: &[bool]) -> SimResult<()> {
        if !self.inverse_stack.is_empty() {
            return Err(SimError::NonUnitaryInInverse("collapse"));
        }
        let (mask, value) = self.basis_mask(qubits, values)?;
        let probability = self.state.probability(mask, value);
        if probability <= self.config.tolerance {
            return Err(SimError::ImpossibleOutcome { probability });
        }
        self.state.project(mask, value, probability)?;
        for (&qubit, &outcome) in qubits.iter().zip(values) {
            self.registry.set_classical(qubit, outcome);
        }
        debug!(probability, "Collapsed state");
        for (&qubit, &outcome) in qubits.iter().zip(values) {
            self.notify(&Event::Measure { qubit, outcome });
        }
        Ok(())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of live qubits.
    pub fn num_qubits(&self) -> usize {
        self.registry.len()
    }

    /// Live qubits in bit-position order.
    pub fn qubits(&self) -> &[QubitId] {
        self.registry.qubits()
    }

    /// Check whether a handle refers to a live qubit.
    pub fn is_live(&self, qubit: QubitId) -> bool {
        self.registry.contains(qubit)
    }

    /// Cached measurement outcome, if the qubit is still in that basis state.
    pub fn classical_value(&self, qubit: QubitId) -> SimResult<Option<bool>> {
        self.registry.position(qubit)?;
        Ok(self.registry.classical_value(qubit))
    }

    /// Probability that measuring `qubit` yields `value`.
    pub fn probability(&self, qubit: QubitId, value: bool) -> SimResult<f64> {
        self.probability_of(&[qubit], &[value])
    }

    /// Probability that measuring `qubits` yields `values`.
    pub fn probability_of(&self, qubits: &[QubitId], values: &[bool]) -> SimResult<f64> {
        let (mask, value) = self.basis_mask(qubits, values)?;
        Ok(self.state.probability(mask, value))
    }

    /// Amplitude of the basis state assigning `values` to `qubits`.
    ///
    /// `qubits` must name every live qubit, in any order.
    pub fn amplitude(&self, qubits: &[QubitId], values: &[bool]) -> SimResult<Complex64> {
        if qubits.len() != self.num_qubits() {
            return Err(SimError::IncompleteBasisState {
                given: qubits.len(),
                live: self.num_qubits(),
            });
        }
        let (_, index) = self.basis_mask(qubits, values)?;
        Ok(self.state.amplitudes()[index])
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            qubits: self.registry.qubits().to_vec(),
            amplitudes: self.state.amplitudes().to_vec(),
        }
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.state.norm_sqr()
    }

    /// Synchronisation point. Operations already take effect when issued.
    pub fn flush(&mut self) {}

    fn basis_mask(&self, qubits: &[QubitId], values: &[bool]) -> SimResult<(usize, usize)> {
        if qubits.len() != values.len() {
            return Err(SimError::LengthMismatch {
                qubits: qubits.len(),
                values: values.len(),
            });
        }
        let mut mask = 0usize;
        let mut value = 0usize;
        for (&qubit, &bit) in qubits.iter().zip(values) {
            let flag = 1 << self.registry.position(qubit)?;
            if mask & flag != 0 {
                return Err(SimError::DuplicateQubit(qubit));
            }
            mask |= flag;
            if bit {
                value |= flag;
            }
        }
        Ok((mask, value))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("qubits", &self.registry.qubits())
            .field("config", &self.config)
            .field("control_depth", &self.control_stack.len())
            .field("inverse_depth", &self.inverse_stack.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
