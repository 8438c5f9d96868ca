//! Pauli labels and their base-4 indexing.
//!
//! A Pauli string over n qubits is written as an n-character label from the
//! alphabet {I, X, Y, Z}, qubit 0 rightmost. The label doubles as a base-4
//! integer with digits I=0, X=1, Y=2, Z=3, which is how chi-matrix diagonals
//! are indexed: `"IX"` → 1, `"XI"` → 4, `"ZY"` → 14.

use std::collections::BTreeMap;

use crate::error::{ChannelError, ChannelResult};

/// A sparse Pauli error channel: label → probability.
///
/// Labels are uniform-width strings over {I, X, Y, Z}. The no-error case is
/// implicit: its probability is 1 minus the sum of the explicit entries.
/// A `BTreeMap` keeps iteration deterministic.
pub type PauliErrorMap = BTreeMap<String, f64>;

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    /// Identity.
    I,
    /// Pauli-X (bit flip).
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z (phase flip).
    Z,
}

impl Pauli {
    /// The base-4 digit of this operator.
    pub fn digit(self) -> usize {
        match self {
            Pauli::I => 0,
            Pauli::X => 1,
            Pauli::Y => 2,
            Pauli::Z => 3,
        }
    }

    /// Operator for a base-4 digit. Panics if `digit > 3`.
    pub fn from_digit(digit: usize) -> Self {
        match digit {
            0 => Pauli::I,
            1 => Pauli::X,
            2 => Pauli::Y,
            3 => Pauli::Z,
            _ => unreachable!("base-4 digit out of range: {digit}"),
        }
    }

    /// Parse a label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// The label character of this operator.
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// Convert a Pauli label into its chi-diagonal index.
///
/// Qubit 0 is the rightmost character, i.e. the least-significant base-4
/// digit: `label_to_index("XI") == 4`.
pub fn label_to_index(label: &str) -> ChannelResult<usize> {
    let mut index = 0usize;
    for c in label.chars() {
        let p = Pauli::from_char(c).ok_or_else(|| ChannelError::InvalidLabel {
            label: label.to_string(),
        })?;
        index = index * 4 + p.digit();
    }
    Ok(index)
}

/// Convert a chi-diagonal index back into an n-qubit Pauli label.
pub fn index_to_label(n_qubits: usize, index: usize) -> String {
    let mut label = String::with_capacity(n_qubits);
    for i in (0..n_qubits).rev() {
        let digit = (index >> (2 * i)) & 0b11;
        label.push(Pauli::from_digit(digit).to_char());
    }
    label
}

/// Validate a Pauli error map and return its qubit count.
///
/// Checks that the map is non-empty, that every label is a uniform-width
/// string over {I, X, Y, Z}, and that every probability lies in [0, 1].
/// The sum constraint (≤ 1) is enforced where the identity term is actually
/// computed, in [`crate::ChiDiagonal::from_pauli_errors`].
pub(crate) fn validated_width(errors: &PauliErrorMap) -> ChannelResult<usize> {
    let Some(first) = errors.keys().next() else {
        return Err(ChannelError::EmptyErrorMap);
    };
    let width = first.len();
    for (label, &prob) in errors {
        if label.len() != width {
            return Err(ChannelError::LabelWidthMismatch {
                label: label.clone(),
                expected: width,
            });
        }
        if label.chars().any(|c| Pauli::from_char(c).is_none()) {
            return Err(ChannelError::InvalidLabel {
                label: label.clone(),
            });
        }
        if !(0.0..=1.0).contains(&prob) {
            return Err(ChannelError::InvalidProbability {
                label: label.clone(),
                value: prob,
            });
        }
    }
    Ok(width)
}
