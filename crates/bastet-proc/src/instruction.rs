//! Value types crossing the processor contract.

use bastet_channel::ChiDiagonal;
use serde::{Deserialize, Serialize};

use crate::error::{ProcError, ProcResult};

/// One operation type a processor supports.
///
/// The combination `(name, qubits)` completely identifies the instruction
/// within a processor. `qubits == None` means the instruction applies
/// uniformly to any qubit combination (all-to-all connectivity); such
/// processors declare a fixed total qubit count instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionSpec {
    /// Instruction name (`"x"`, `"cx"`, `"delay"`, `"mz"`, ...).
    pub name: String,
    /// The qubit tuple this declaration is bound to, or `None` for
    /// all-to-all.
    pub qubits: Option<Vec<u32>>,
    /// Ordered names of the free parameters the instruction accepts.
    pub params: Vec<String>,
    /// Readout assignment errors of a measurement instruction, when they are
    /// independent of the instruction parameters. Parameter-dependent
    /// readout errors on [`AppliedInstruction`] take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout_errors: Option<ReadoutError>,
}

impl InstructionSpec {
    /// Declare an instruction bound to an explicit qubit tuple.
    pub fn bound(
        name: impl Into<String>,
        qubits: impl Into<Vec<u32>>,
        params: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            name: name.into(),
            qubits: Some(qubits.into()),
            params: params.into_iter().map(String::from).collect(),
            readout_errors: None,
        }
    }

    /// Declare an all-to-all instruction.
    pub fn all_to_all(
        name: impl Into<String>,
        params: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            name: name.into(),
            qubits: None,
            params: params.into_iter().map(String::from).collect(),
            readout_errors: None,
        }
    }
}

/// Readout assignment errors of a measurement instruction.
///
/// `[P(read 1 | state 0), P(read 0 | state 1)]` in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ReadoutError {
    /// Probability of reading 1 when the qubit was in state 0.
    pub p_read1_given_0: f64,
    /// Probability of reading 0 when the qubit was in state 1.
    pub p_read0_given_1: f64,
}

impl ReadoutError {
    /// Validate both probabilities into [0, 1].
    pub fn new(p_read1_given_0: f64, p_read0_given_1: f64) -> ProcResult<Self> {
        for p in [p_read1_given_0, p_read0_given_1] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ProcError::InvalidParameter {
                    reason: format!("readout error probability {p} is outside [0, 1]"),
                });
            }
        }
        Ok(Self {
            p_read1_given_0,
            p_read0_given_1,
        })
    }
}

impl TryFrom<[f64; 2]> for ReadoutError {
    type Error = String;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        ReadoutError::new(pair[0], pair[1]).map_err(|e| e.to_string())
    }
}

impl From<ReadoutError> for [f64; 2] {
    fn from(r: ReadoutError) -> Self {
        [r.p_read1_given_0, r.p_read0_given_1]
    }
}

/// The behavior of an instruction evaluated with concrete parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedInstruction {
    /// Duration in seconds. Non-negative and finite.
    pub duration: f64,
    /// Quantum noise as a chi-matrix diagonal; `None` means exactly
    /// noiseless.
    pub quantum_errors: Option<ChiDiagonal>,
    /// Parameter-dependent readout errors. Take precedence over the static
    /// errors declared on [`InstructionSpec`].
    pub readout_errors: Option<ReadoutError>,
}
