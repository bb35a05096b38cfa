//! Kvant State-Vector Simulator
//!
//! An exact simulator for dynamically allocated qubits. Qubits are allocated
//! and freed one at a time, gates apply immediately, and measurement collapses
//! the joint state. Scoped control and scoped inversion make compute and
//! uncompute patterns (Bennett-style cleanup of ancillae) direct to write.
//!
//! # Features
//!
//! - **Dynamic width**: the amplitude vector grows on allocate and shrinks on deallocate
//! - **Safe deallocation**: a qubit not in a known basis state cannot be freed
//! - **Control scopes**: [`Simulator::with_control`] adds controls to every gate inside
//! - **Inverse scopes**: [`Simulator::with_inverse`] applies the adjoint of a block
//! - **Reproducible**: a seeded RNG gives identical measurement sequences
//! - **Observers**: [`Observer`] sees every executed operation
//!
//! # Memory
//!
//! | Qubits | Amplitudes |
//! |--------|------------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//!
//! # Example
//!
//! ```rust
//! use kvant_sim::{SimResult, Simulator};
//!
//! fn main() -> SimResult<()> {
//!     let mut sim = Simulator::seeded(42);
//!     let a = sim.allocate();
//!     let b = sim.allocate();
//!
//!     sim.h(a)?;
//!     sim.cx(a, b)?;
//!     assert_eq!(sim.measure(a)?, sim.measure(b)?);
//!
//!     // Measured qubits can be freed whatever their outcome.
//!     sim.deallocate(a)?;
//!     sim.deallocate(b)?;
//!     Ok(())
//! }
//! ```
//!
//! Uncomputing an ancilla:
//!
//! ```rust
//! use kvant_sim::{SimResult, Simulator};
//!
//! fn main() -> SimResult<()> {
//!     let mut sim = Simulator::seeded(1);
//!     let q = sim.allocate();
//!
//!     let prepare = |sim: &mut Simulator| -> SimResult<()> {
//!         sim.h(q)?;
//!         sim.t(q)?;
//!         sim.rx(0.3, q)
//!     };
//!     prepare(&mut sim)?;
//!     sim.with_inverse(prepare)?;
//!
//!     sim.deallocate(q)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod observer;
pub mod registry;
pub mod scope;
pub mod simulator;
pub mod statevector;

pub use config::SimulatorConfig;
pub use error::{SimError, SimResult};
pub use observer::{CircuitRecorder, Event, Observer, RecordedEvent};
pub use scope::{ControlGuard, InverseGuard};
pub use simulator::{Simulator, StateSnapshot};
pub use statevector::Statevector;

pub use kvant_ir::{Command, Gate, QubitId};
