//! Qubit handle to bit-position bookkeeping.

use rustc_hash::FxHashMap;

use kvant_ir::QubitId;

use crate::error::{SimError, SimResult};

/// Maps live qubit handles to bit positions of the amplitude vector.
///
/// The map is a bijection between live handles and `0..len()`. Handles are
/// issued from a monotonically increasing counter and never reused, so a
/// freed handle stays unknown.
#[derive(Debug, Default)]
pub struct QubitRegistry {
    /// Handle -> bit position.
    positions: FxHashMap<QubitId, usize>,
    /// Bit position -> handle.
    order: Vec<QubitId>,
    /// Cached measurement outcomes of qubits still in that basis state.
    classical: FxHashMap<QubitId, bool>,
    /// Counter for generating qubit IDs.
    next_id: u32,
}

impl QubitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live qubits.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no qubit is live.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live handles in bit-position order.
    pub fn qubits(&self) -> &[QubitId] {
        &self.order
    }

    /// Check whether a handle is live.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.positions.contains_key(&qubit)
    }

    /// Issue a new handle at the next bit position.
    pub fn allocate(&mut self) -> (QubitId, usize) {
        let id = QubitId(self.next_id);
        self.next_id += 1;
        let position = self.order.len();
        self.order.push(id);
        self.positions.insert(id, position);
        (id, position)
    }

    /// Retire a handle and shift every higher position down by one.
    ///
    /// Returns the position the handle occupied.
    pub fn remove(&mut self, qubit: QubitId) -> SimResult<usize> {
        let position = self
            .positions
            .remove(&qubit)
            .ok_or(SimError::UnknownQubit(qubit))?;
        self.order.remove(position);
        for (pos, id) in self.order.iter().enumerate().skip(position) {
            self.positions.insert(*id, pos);
        }
        self.classical.remove(&qubit);
        Ok(position)
    }

    /// Bit position of a live handle.
    pub fn position(&self, qubit: QubitId) -> SimResult<usize> {
        self.positions
            .get(&qubit)
            .copied()
            .ok_or(SimError::UnknownQubit(qubit))
    }

    /// Bit positions of several handles, in order.
    pub fn positions(&self, qubits: &[QubitId]) -> SimResult<Vec<usize>> {
        qubits.iter().map(|&q| self.position(q)).collect()
    }

    /// Bit mask with one bit set per handle.
    pub fn mask(&self, qubits: &[QubitId]) -> SimResult<usize> {
        qubits
            .iter()
            .try_fold(0usize, |mask, &q| Ok(mask | (1 << self.position(q)?)))
    }

    /// Cached classical value, if the qubit was measured and not disturbed since.
    pub fn classical_value(&self, qubit: QubitId) -> Option<bool> {
        self.classical.get(&qubit).copied()
    }

    /// Record a measurement outcome.
    pub fn set_classical(&mut self, qubit: QubitId, value: bool) {
        self.classical.insert(qubit, value);
    }

    /// Forget a cached outcome.
    pub fn clear_classical(&mut self, qubit: QubitId) {
        self.classical.remove(&qubit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_sequential() {
        let mut reg = QubitRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.allocate(), (QubitId(0), 0));
        assert_eq!(reg.allocate(), (QubitId(1), 1));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut reg = QubitRegistry::new();
        let (a, _) = reg.allocate();
        let (b, _) = reg.allocate();
        let (c, _) = reg.allocate();

        assert_eq!(reg.remove(a).unwrap(), 0);
        assert_eq!(reg.position(b).unwrap(), 0);
        assert_eq!(reg.position(c).unwrap(), 1);
        assert_eq!(reg.qubits(), &[b, c]);
    }

    #[test]
    fn test_handles_not_reused() {
        let mut reg = QubitRegistry::new();
        let (a, _) = reg.allocate();
        reg.remove(a).unwrap();
        let (b, pos) = reg.allocate();
        assert_ne!(a, b);
        assert_eq!(pos, 0);
        assert!(matches!(reg.position(a), Err(SimError::UnknownQubit(q)) if q == a));
    }

    #[test]
    fn test_remove_unknown() {
        let mut reg = QubitRegistry::new();
        assert!(matches!(
            reg.remove(QubitId(7)),
            Err(SimError::UnknownQubit(QubitId(7)))
        ));
    }

    #[test]
    fn test_mask() {
        let mut reg = QubitRegistry::new();
        let (a, _) = reg.allocate();
        let (_, _) = reg.allocate();
        let (c, _) = reg.allocate();
        assert_eq!(reg.mask(&[a, c]).unwrap(), 0b101);
        assert_eq!(reg.mask(&[]).unwrap(), 0);
        assert!(reg.mask(&[QubitId(42)]).is_err());
    }

    #[test]
    fn test_classical_cache_cleared_on_remove() {
        let mut reg = QubitRegistry::new();
        let (a, _) = reg.allocate();
        reg.set_classical(a, true);
        assert_eq!(reg.classical_value(a), Some(true));
        reg.remove(a).unwrap();
        assert_eq!(reg.classical_value(a), None);
    }
}
