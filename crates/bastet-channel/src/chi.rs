//! The diagonal chi-matrix representation of a Pauli channel.
//!
//! The quantum process tomography chi matrix of a Pauli channel is diagonal
//! in the Pauli basis, so the full `4ⁿ × 4ⁿ` matrix is carried as its
//! diagonal of length `4ⁿ`. Entry 0 is the no-error probability; the whole
//! diagonal sums to 1 for any valid channel.

use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, ChannelResult};
use crate::pauli::{PauliErrorMap, index_to_label, label_to_index, validated_width};

/// The diagonal of a quantum process tomography chi matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiDiagonal {
    diag: Vec<f64>,
    n_qubits: usize,
}

impl ChiDiagonal {
    /// Build a chi diagonal from a sparse Pauli error map.
    ///
    /// The no-error probability is computed by difference; an explicit
    /// identity entry (`"I"`, `"II"`, ...) in the input is ignored and
    /// recomputed. Fails on an empty map, malformed labels, probabilities
    /// outside [0, 1], or explicit probabilities summing above 1.
    pub fn from_pauli_errors(errors: &PauliErrorMap) -> ChannelResult<Self> {
        let n_qubits = validated_width(errors)?;
        let mut diag = vec![0.0; 4usize.pow(n_qubits as u32)];
        for (label, &prob) in errors {
            let idx = label_to_index(label)?;
            if idx != 0 {
                diag[idx] = prob;
            }
        }
        let explicit: f64 = diag[1..].iter().sum();
        if explicit > 1.0 {
            return Err(ChannelError::ExcessiveTotalProbability { total: explicit });
        }
        diag[0] = 1.0 - explicit;
        Ok(Self { diag, n_qubits })
    }

    /// Wrap a raw diagonal, inferring the qubit count from its length.
    pub fn from_diag(diag: Vec<f64>) -> ChannelResult<Self> {
        let len = diag.len();
        let n_qubits = (len.max(1).ilog2() / 2) as usize;
        if 4usize.pow(n_qubits as u32) != len {
            return Err(ChannelError::InvalidDiagonalLength { len });
        }
        Ok(Self { diag, n_qubits })
    }

    /// Recover the sparse Pauli error map: every non-zero diagonal entry,
    /// including the identity term when it is non-zero.
    pub fn to_pauli_errors(&self) -> PauliErrorMap {
        let mut out = PauliErrorMap::new();
        for (idx, &prob) in self.diag.iter().enumerate() {
            if prob != 0.0 {
                out.insert(index_to_label(self.n_qubits, idx), prob);
            }
        }
        out
    }

    /// The diagonal entries, indexed in base 4 (qubit 0 least significant).
    pub fn diag(&self) -> &[f64] {
        &self.diag
    }

    /// Number of qubits the channel acts on.
    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    /// Sum of the diagonal. 1 (within floating tolerance) for any channel
    /// built from a valid error map.
    pub fn sum(&self) -> f64 {
        self.diag.iter().sum()
    }
}
