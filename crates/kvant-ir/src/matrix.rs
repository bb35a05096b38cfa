//! Dense unitary matrices for one- and two-qubit gates.
//!
//! Matrices are stored row-major. For two-qubit matrices the basis index is
//! `(b0 << 1) | b1`, where `b0` is the state of the first target.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub const fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Create a diagonal matrix.
    pub const fn diagonal(a: Complex64, d: Complex64) -> Self {
        Self::new(a, ZERO, ZERO, d)
    }

    /// Create the identity matrix.
    pub const fn identity() -> Self {
        Self::diagonal(ONE, ONE)
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        Self::new(s, s, s, -s)
    }

    /// Create a Pauli-X matrix.
    pub const fn x() -> Self {
        Self::new(ZERO, ONE, ONE, ZERO)
    }

    /// Create a Pauli-Y matrix.
    pub const fn y() -> Self {
        Self::new(ZERO, Complex64::new(0.0, -1.0), Complex64::new(0.0, 1.0), ZERO)
    }

    /// Create a Pauli-Z matrix.
    pub const fn z() -> Self {
        Self::diagonal(ONE, Complex64::new(-1.0, 0.0))
    }

    /// Create a phase matrix diag(1, e^{iλ}); S and T are special cases.
    pub fn phase(lambda: f64) -> Self {
        Self::diagonal(ONE, Complex64::from_polar(1.0, lambda))
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix diag(e^{-iθ/2}, e^{iθ/2}).
    pub fn rz(theta: f64) -> Self {
        Self::diagonal(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// True if the off-diagonal entries vanish.
    pub fn is_diagonal(&self) -> bool {
        self.data[1].norm() < EPSILON && self.data[2].norm() < EPSILON
    }

    /// Element-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < tol)
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}

/// A 4x4 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary4x4 {
    /// The matrix elements in row-major order.
    pub data: [Complex64; 16],
}

impl Unitary4x4 {
    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::permutation([0, 1, 2, 3])
    }

    /// Create a permutation matrix mapping basis state `i` to `perm[i]`.
    pub fn permutation(perm: [usize; 4]) -> Self {
        let mut data = [ZERO; 16];
        for (col, &row) in perm.iter().enumerate() {
            data[row * 4 + col] = ONE;
        }
        Self { data }
    }

    /// CNOT with the first target as control.
    pub fn cx() -> Self {
        Self::permutation([0, 1, 3, 2])
    }

    /// Controlled-Z.
    pub fn cz() -> Self {
        let mut m = Self::identity();
        m.data[15] = Complex64::new(-1.0, 0.0);
        m
    }

    /// SWAP.
    pub fn swap() -> Self {
        Self::permutation([0, 2, 1, 3])
    }

    /// Element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * 4 + col]
    }

    /// Multiply this matrix by another: self * other.
    pub fn mul(&self, other: &Self) -> Self {
        let mut data = [ZERO; 16];
        for row in 0..4 {
            for col in 0..4 {
                data[row * 4 + col] = (0..4).map(|k| self.get(row, k) * other.get(k, col)).sum();
            }
        }
        Self { data }
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        let mut data = [ZERO; 16];
        for row in 0..4 {
            for col in 0..4 {
                data[row * 4 + col] = self.get(col, row).conj();
            }
        }
        Self { data }
    }

    /// Element-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).norm() < tol)
    }
}

impl Default for Unitary4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Unitary4x4::mul(&self, &rhs)
    }
}

/// The matrix of a gate, sized by its arity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateMatrix {
    /// Single-qubit unitary.
    Single(Unitary2x2),
    /// Two-qubit unitary.
    Two(Unitary4x4),
}

impl GateMatrix {
    /// Number of qubits the matrix acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateMatrix::Single(_) => 1,
            GateMatrix::Two(_) => 2,
        }
    }

    /// Conjugate transpose.
    pub fn dagger(&self) -> Self {
        match self {
            GateMatrix::Single(m) => GateMatrix::Single(m.dagger()),
            GateMatrix::Two(m) => GateMatrix::Two(m.dagger()),
        }
    }

    /// Element-wise comparison within `tol`. Matrices of different arity never match.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        match (self, other) {
            (GateMatrix::Single(a), GateMatrix::Single(b)) => a.approx_eq(b, tol),
            (GateMatrix::Two(a), GateMatrix::Two(b)) => a.approx_eq(b, tol),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_hadamard_squared() {
        let h = Unitary2x2::h();
        assert!((h * h).approx_eq(&Unitary2x2::identity(), EPSILON));
    }

    #[test]
    fn test_pauli_squared() {
        let i = Unitary2x2::identity();
        for p in [Unitary2x2::x(), Unitary2x2::y(), Unitary2x2::z()] {
            assert!((p * p).approx_eq(&i, EPSILON));
        }
    }

    #[test]
    fn test_rz_convention() {
        let theta = 1.21;
        let rz = Unitary2x2::rz(theta);
        assert!(rz.is_diagonal());
        assert!((rz.data[0] - Complex64::from_polar(1.0, -theta / 2.0)).norm() < EPSILON);
        assert!((rz.data[3] - Complex64::from_polar(1.0, theta / 2.0)).norm() < EPSILON);

        // Rz(θ)† = Rz(-θ), exactly, with no extra global phase.
        assert!(rz.dagger().approx_eq(&Unitary2x2::rz(-theta), EPSILON));
    }

    #[test]
    fn test_phase_quarter_turn_is_s() {
        let s = Unitary2x2::phase(PI / 2.0);
        assert!((s.data[3] - Complex64::new(0.0, 1.0)).norm() < EPSILON);
        assert!((s * s).approx_eq(&Unitary2x2::z(), EPSILON));
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let rx = Unitary2x2::rx(PI);
        let minus_i = Complex64::new(0.0, -1.0);
        assert!((rx.data[1] - minus_i).norm() < EPSILON);
        assert!((rx.data[2] - minus_i).norm() < EPSILON);
        assert!(rx.data[0].norm() < EPSILON);
    }

    #[test]
    fn test_cx_layout() {
        let cx = Unitary4x4::cx();
        // |10⟩ -> |11⟩ and |11⟩ -> |10⟩
        assert_eq!(cx.get(3, 2), ONE);
        assert_eq!(cx.get(2, 3), ONE);
        assert_eq!(cx.get(0, 0), ONE);
        assert_eq!(cx.get(1, 1), ONE);
        assert_eq!(cx.get(2, 2), ZERO);
    }

    #[test]
    fn test_two_qubit_self_inverse() {
        let id = Unitary4x4::identity();
        for m in [Unitary4x4::cx(), Unitary4x4::cz(), Unitary4x4::swap()] {
            assert!((m * m).approx_eq(&id, EPSILON));
            assert!(m.dagger().approx_eq(&m, EPSILON));
        }
    }

    #[test]
    fn test_gate_matrix_arity() {
        assert_eq!(GateMatrix::Single(Unitary2x2::h()).num_qubits(), 1);
        assert_eq!(GateMatrix::Two(Unitary4x4::cx()).num_qubits(), 2);
        assert!(
            !GateMatrix::Single(Unitary2x2::identity())
                .approx_eq(&GateMatrix::Two(Unitary4x4::identity()), EPSILON)
        );
    }
}
