//! Bastet Pauli error-channel algebra
//!
//! This crate provides the noise-channel arithmetic underpinning the Bastet
//! processor models. Every noisy operation on a cat-qubit processor is
//! described as a Pauli channel: a probabilistic mixture of {I, X, Y, Z}ⁿ
//! operators. Two equivalent representations are supported:
//!
//! - a sparse [`PauliErrorMap`] from Pauli-string labels (`"X"`, `"IZ"`,
//!   `"XZX"`, ...) to probabilities, with the no-error case implicit, and
//! - a dense [`ChiDiagonal`], the diagonal of the quantum process tomography
//!   chi matrix in the Pauli basis, indexed in base 4 with qubit 0 as the
//!   least-significant digit.
//!
//! # Operations
//!
//! - [`compose_1q`] — sequential composition of two single-qubit channels,
//!   derived from the Pauli group multiplication table (X·Y = Z and cyclic).
//! - [`tensor`] — combination of independent channels on disjoint qubits.
//! - [`flip_probabilities`] — the closed-form map from linearized flip rates
//!   `r·t` to bounded probabilities, saturating at 1/2.
//!
//! # Example
//!
//! ```rust
//! use bastet_channel::{ChiDiagonal, PauliErrorMap};
//!
//! let mut errors = PauliErrorMap::new();
//! errors.insert("X".into(), 0.3);
//! errors.insert("Z".into(), 0.4);
//!
//! let chi = ChiDiagonal::from_pauli_errors(&errors).unwrap();
//! // Identity probability is computed by difference.
//! assert!((chi.diag()[0] - 0.3).abs() < 1e-12);
//! ```

pub mod algebra;
pub mod chi;
pub mod error;
pub mod pauli;

pub use algebra::{compose_1q, flip_probabilities, flip_probabilities_batch, tensor};
pub use chi::ChiDiagonal;
pub use error::{ChannelError, ChannelResult};
pub use pauli::{Pauli, PauliErrorMap, index_to_label, label_to_index};
