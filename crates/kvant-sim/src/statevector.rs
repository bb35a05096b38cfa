//! Statevector amplitude store and gate kernels.
//!
//! Bit position `k` of an amplitude index holds the state of the qubit at
//! position `k` in the registry. Positions are appended on allocation, so a
//! new qubit is always the most significant bit.

use num_complex::Complex64;

use kvant_ir::{GateMatrix, Unitary2x2, Unitary4x4};

use crate::error::{SimError, SimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// A statevector representing a quantum state.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// With zero qubits the vector holds the single scalar amplitude 1.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The raw amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    // =========================================================================
    // Qubit lifecycle
    // =========================================================================

    /// Tensor a new |0⟩ qubit onto the state and return its bit position.
    pub fn push_qubit(&mut self) -> usize {
        let position = self.num_qubits;
        let len = self.amplitudes.len();
        self.amplitudes.resize(len * 2, ZERO);
        self.num_qubits += 1;
        position
    }

    /// Drop bit `position`, keeping the slice where that bit equals `value`.
    ///
    /// The kept slice is renormalised. Bits above `position` shift down by one.
    pub fn remove_qubit(&mut self, position: usize, value: bool) {
        let mask = 1 << position;
        let low = mask - 1;
        let keep = if value { mask } else { 0 };
        let new_len = self.amplitudes.len() / 2;

        let mut reduced = Vec::with_capacity(new_len);
        for j in 0..new_len {
            let i = ((j & !low) << 1) | keep | (j & low);
            reduced.push(self.amplitudes[i]);
        }

        self.amplitudes = reduced;
        self.num_qubits -= 1;
        self.renormalize();
    }

    /// Rescale to unit norm. A zero vector is left untouched.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    /// Apply a gate matrix to the given bit positions.
    ///
    /// Indices where any bit of `ctrl_mask` is 0 are left unchanged.
    /// `positions.len()` must match the matrix arity.
    pub fn apply_matrix(&mut self, matrix: &GateMatrix, positions: &[usize], ctrl_mask: usize) {
        match matrix {
            GateMatrix::Single(m) if m.is_diagonal() => {
                self.apply_diagonal(positions[0], ctrl_mask, m.data[0], m.data[3]);
            }
            GateMatrix::Single(m) => self.apply_single(positions[0], ctrl_mask, m),
            GateMatrix::Two(m) => self.apply_two(positions[0], positions[1], ctrl_mask, m),
        }
    }

    /// Apply a 2x2 unitary to each amplitude pair differing only in `target`.
    pub fn apply_single(&mut self, target: usize, ctrl_mask: usize, m: &Unitary2x2) {
        let mask = 1 << target;
        let [a, b, c, d] = m.data;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & ctrl_mask == ctrl_mask {
                let j = i | mask;
                let x = self.amplitudes[i];
                let y = self.amplitudes[j];
                self.amplitudes[i] = a * x + b * y;
                self.amplitudes[j] = c * x + d * y;
            }
        }
    }

    /// Multiply each amplitude by `d0` or `d1` depending on bit `target`.
    fn apply_diagonal(&mut self, target: usize, ctrl_mask: usize, d0: Complex64, d1: Complex64) {
        let mask = 1 << target;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & ctrl_mask == ctrl_mask {
                *amp *= if i & mask == 0 { d0 } else { d1 };
            }
        }
    }

    /// Apply a 4x4 unitary to each amplitude quad spanned by `t0` and `t1`.
    ///
    /// `t0` is the most significant bit of the matrix basis index.
    pub fn apply_two(&mut self, t0: usize, t1: usize, ctrl_mask: usize, m: &Unitary4x4) {
        let m0 = 1 << t0;
        let m1 = 1 << t1;
        let both = m0 | m1;
        for i in 0..self.amplitudes.len() {
            if i & both == 0 && i & ctrl_mask == ctrl_mask {
                let idx = [i, i | m1, i | m0, i | both];
                let v = idx.map(|k| self.amplitudes[k]);
                for (row, &k) in idx.iter().enumerate() {
                    self.amplitudes[k] = (0..4).map(|col| m.get(row, col) * v[col]).sum();
                }
            }
        }
    }

    // =========================================================================
    // Probabilities and collapse
    // =========================================================================

    /// Probability that bit `position` reads 1.
    pub fn probability_one(&self, position: usize) -> f64 {
        let mask = 1 << position;
        self.probability(mask, mask)
    }

    /// Probability that the bits selected by `mask` equal `value`.
    pub fn probability(&self, mask: usize, value: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == value)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Zero every amplitude inconsistent with `value` on `mask` and divide
    /// the rest by `sqrt(probability)`.
    ///
    /// `probability` must be the result of [`Statevector::probability`] for the
    /// same mask and value. A zero or non-finite probability fails with
    /// [`SimError::ImpossibleOutcome`] and leaves the state untouched.
    pub fn project(&mut self, mask: usize, value: usize, probability: f64) -> SimResult<()> {
        if !(probability.is_finite() && probability > 0.0) {
            return Err(SimError::ImpossibleOutcome { probability });
        }
        let scale = 1.0 / probability.sqrt();
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == value {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
        Ok(())
    }
}
