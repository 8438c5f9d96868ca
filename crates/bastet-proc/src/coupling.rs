//! Qubit coupling maps.
//!
//! A coupling map lists the ordered qubit pairs a two-qubit instruction can
//! be applied to. Edges are directed; the ring and grid constructors emit
//! both directions of every physical link.

use serde::{Deserialize, Serialize};

use crate::error::{ProcError, ProcResult};

/// A validated list of directed coupling edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingMap {
    edges: Vec<(u32, u32)>,
}

impl CouplingMap {
    /// Every ordered pair of distinct qubits.
    pub fn all_to_all(n_qubits: u32) -> Self {
        let mut edges = Vec::new();
        for a in 0..n_qubits {
            for b in 0..n_qubits {
                if a != b {
                    edges.push((a, b));
                }
            }
        }
        Self { edges }
    }

    /// Qubits on a ring, each coupled to both neighbors, both directions.
    pub fn circular(n_qubits: u32) -> Self {
        let mut edges = Vec::new();
        for i in 0..n_qubits {
            let j = (i + 1) % n_qubits;
            edges.push((i, j));
            edges.push((j, i));
        }
        Self { edges }
    }

    /// Qubits on a rows × cols grid, nearest neighbors coupled both ways.
    pub fn rectangular(rows: u32, cols: u32) -> Self {
        let idx = |r: u32, c: u32| r * cols + c;
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let here = idx(r, c);
                if r + 1 < rows {
                    edges.push((here, idx(r + 1, c)));
                    edges.push((idx(r + 1, c), here));
                }
                if c + 1 < cols {
                    edges.push((here, idx(r, c + 1)));
                    edges.push((idx(r, c + 1), here));
                }
            }
        }
        Self { edges }
    }

    /// Validate a caller-supplied edge list against a qubit count.
    ///
    /// Rejects self-loops and out-of-range indices.
    pub fn from_edges(n_qubits: u32, edges: Vec<(u32, u32)>) -> ProcResult<Self> {
        let map = Self { edges };
        map.validate(n_qubits)?;
        Ok(map)
    }

    /// Re-check this map against a qubit count.
    pub fn validate(&self, n_qubits: u32) -> ProcResult<()> {
        for &(a, b) in &self.edges {
            if a == b || a >= n_qubits || b >= n_qubits {
                return Err(ProcError::InvalidCoupling { a, b, n_qubits });
            }
        }
        Ok(())
    }

    /// The directed edges.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// True iff `(a, b)` is a coupled pair, in that order.
    pub fn contains(&self, a: u32, b: u32) -> bool {
        self.edges.iter().any(|&e| e == (a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_to_all_has_ordered_pairs() {
        let map = CouplingMap::all_to_all(3);
        assert_eq!(map.edges().len(), 6);
        assert!(map.contains(0, 1));
        assert!(map.contains(1, 0));
        assert!(!map.contains(1, 1));
    }

    #[test]
    fn circular_wraps_around() {
        let map = CouplingMap::circular(4);
        assert!(map.contains(3, 0));
        assert!(map.contains(0, 3));
        assert!(!map.contains(0, 2));
    }

    #[test]
    fn rectangular_couples_neighbors_only() {
        // 0 1 2
        // 3 4 5
        let map = CouplingMap::rectangular(2, 3);
        assert!(map.contains(0, 1));
        assert!(map.contains(1, 4));
        assert!(map.contains(4, 1));
        assert!(!map.contains(0, 4));
        assert!(!map.contains(0, 5));
    }

    #[test]
    fn from_edges_rejects_bad_pairs() {
        assert!(CouplingMap::from_edges(2, vec![(0, 0)]).is_err());
        assert!(CouplingMap::from_edges(2, vec![(0, 2)]).is_err());
        assert!(CouplingMap::from_edges(2, vec![(2, 0)]).is_err());
        assert!(CouplingMap::from_edges(2, vec![(0, 1)]).is_ok());
    }
}
