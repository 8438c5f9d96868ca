//! Error types for the channel-algebra crate.

use thiserror::Error;

/// Errors produced by Pauli-channel conversions and algebra.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ChannelError {
    /// An empty error map carries no qubit-count information.
    #[error("an empty Pauli error map cannot be converted (at least one entry is needed to determine the number of qubits)")]
    EmptyErrorMap,

    /// A label contains a character outside the {I, X, Y, Z} alphabet.
    #[error("unrecognized Pauli label \"{label}\"")]
    InvalidLabel {
        /// The offending label.
        label: String,
    },

    /// A label's length disagrees with the qubit count set by the first label.
    #[error("Pauli label \"{label}\" has width {} but the map describes {expected} qubit(s)", .label.len())]
    LabelWidthMismatch {
        /// The offending label.
        label: String,
        /// Width implied by the rest of the map.
        expected: usize,
    },

    /// A probability is outside [0, 1].
    #[error("probability {value} for Pauli label \"{label}\" is outside [0, 1]")]
    InvalidProbability {
        /// The offending label.
        label: String,
        /// The offending probability.
        value: f64,
    },

    /// Explicit probabilities sum above 1, leaving a negative identity term.
    #[error("Pauli error probabilities sum to {total}, above 1")]
    ExcessiveTotalProbability {
        /// Sum of the explicit probabilities.
        total: f64,
    },

    /// A multi-qubit map was passed where a single-qubit channel is required.
    #[error("Pauli label \"{label}\" is not a single-qubit label")]
    NotSingleQubit {
        /// The offending label.
        label: String,
    },

    /// A raw diagonal whose length is not a power of 4.
    #[error("chi diagonal of length {len} does not correspond to a whole number of qubits")]
    InvalidDiagonalLength {
        /// The offending length.
        len: usize,
    },
}

/// Result type for channel-algebra operations.
pub type ChannelResult<T> = Result<T, ChannelError>;
