//! Serialized representation of a processor behavior grid.
//!
//! A grid file is a JSON document holding, per instruction, a list of
//! simulated sample points: the free-parameter values, the resulting
//! duration, and optionally the Pauli-probability vector. Interpolators are
//! built over these points by [`crate::processor::InterpolatedProcessor`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GridResult;

/// Information about the processor model, for debugging purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorMetadata {
    /// Version of the serialization schema.
    pub schema_version: String,
    /// When the grid was generated.
    pub generated_at: String,
    /// Name of the processor model.
    pub name: String,
}

/// One simulated observation: noise and duration at given parameter values.
///
/// Only Pauli channels are representable, not general chi matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationPoint {
    /// The probabilities of Pauli errors: the diagonal of the chi matrix,
    /// indexed with the first qubit to the right (one qubit: I, X, Y, Z;
    /// two qubits: II, IX, IY, IZ, XI, ...). Sums to one. Absent when the
    /// simulation recorded no noise data for this point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pauli_probabilities: Option<Vec<f64>>,
    /// Duration of the instruction, in seconds.
    pub duration: f64,
    /// The free-parameter values this observation is valid for, keyed by the
    /// names in [`SerializedInstruction::free_params`].
    pub params: BTreeMap<String, f64>,
}

/// The serialized representation of one instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedInstruction {
    /// Instruction name: x, z, rz, mx, mz, delay, p0, p+, ...
    pub name: String,
    /// The qubit tuples this model applies to. A list of lists so that
    /// multi-qubit instructions fit: an x gate on qubits 1, 3 reads
    /// `[[1], [3]]`; a cx on pairs 1-2 and 3-4 reads `[[1, 2], [3, 4]]`.
    pub qubits: Vec<Vec<u32>>,
    /// Names of the parameters the grid spans, in lookup order.
    pub free_params: Vec<String>,
    /// Parameters fixed during the generating simulation. Debugging only.
    #[serde(default)]
    pub fixed_params: BTreeMap<String, f64>,
    /// The simulated sample points.
    pub interpolation_points: Vec<InterpolationPoint>,
    /// Readout assignment errors `[P(1|0), P(0|1)]` of a measurement
    /// instruction, assumed independent of the free parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout_errors: Option<[f64; 2]>,
}

/// A processor behavior grid serialized in a static file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedProcessor {
    /// Model provenance.
    pub metadata: ProcessorMetadata,
    /// One entry per instruction.
    pub instructions: Vec<SerializedInstruction>,
}

impl SerializedProcessor {
    /// Parse a grid document from JSON text.
    pub fn from_json(text: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a grid file (whole-file UTF-8 read).
    pub fn from_path(path: impl AsRef<Path>) -> GridResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
