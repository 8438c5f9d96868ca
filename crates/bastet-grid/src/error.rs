//! Error types for grid loading and interpolation.

use thiserror::Error;

/// Errors raised while loading a serialized grid or interpolating over it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GridError {
    /// The grid file could not be read.
    #[error("cannot read grid file: {0}")]
    Io(#[from] std::io::Error),

    /// The grid document is not valid JSON or does not match the schema.
    #[error("cannot parse grid document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two declarations share one (instruction, qubit tuple) combination.
    #[error("an instruction already exists in the serialized processor model for the combination (instruction = {name}, qubits = {qubits:?})")]
    DuplicateInstruction {
        /// Instruction name.
        name: String,
        /// The qubit tuple declared twice.
        qubits: Vec<u32>,
    },

    /// An instruction carries no sample points at all.
    #[error("instruction '{name}' has no interpolation points")]
    NoPoints {
        /// Instruction name.
        name: String,
    },

    /// An instruction declares no qubit tuples. Grid-backed processors are
    /// fixed-qubit; an unbound declaration would mix connectivity
    /// conventions.
    #[error("instruction '{name}' declares no qubit tuples")]
    UnboundInstruction {
        /// Instruction name.
        name: String,
    },

    /// A sample point lacks a value for a declared free parameter.
    #[error("a sample point of instruction '{name}' has no value for free parameter '{param}'")]
    MissingParamValue {
        /// Instruction name.
        name: String,
        /// The absent parameter.
        param: String,
    },

    /// Sample vectors of one instruction disagree in length.
    #[error("instruction '{name}' mixes Pauli vectors of different lengths ({lengths:?})")]
    RaggedSamples {
        /// Instruction name.
        name: String,
        /// The lengths observed.
        lengths: Vec<usize>,
    },

    /// Too few sample points for the interpolation form.
    #[error("instruction '{name}' needs at least {needed} sample points over {n_params} parameter(s), got {got}")]
    TooFewPoints {
        /// Instruction name.
        name: String,
        /// Minimum number of points.
        needed: usize,
        /// Points available.
        got: usize,
        /// Number of free parameters.
        n_params: usize,
    },

    /// More free parameters than the interpolation engine supports.
    #[error("instruction '{name}' declares {n_params} free parameters; at most 2 are supported")]
    UnsupportedDimension {
        /// Instruction name.
        name: String,
        /// Declared free-parameter count.
        n_params: usize,
    },

    /// The query lies outside the convex hull of the sampled points (or the
    /// interpolation produced NaN).
    #[error("could not interpolate requested point {point:?} because it is out of the convex hull (instruction \"{name}\")")]
    OutOfHull {
        /// Instruction name.
        name: String,
        /// The query point, in raw (unstandardized) coordinates.
        point: Vec<f64>,
    },

    /// The query's parameter count disagrees with the instruction's.
    #[error("instruction '{name}' takes {expected} parameter(s), got {got:?}")]
    WrongArity {
        /// Instruction name.
        name: String,
        /// Declared free-parameter count.
        expected: usize,
        /// The query parameters.
        got: Vec<f64>,
    },

    /// A declared readout-error pair is invalid.
    #[error("instruction '{name}' declares invalid readout errors: {reason}")]
    InvalidReadout {
        /// Instruction name.
        name: String,
        /// What was wrong.
        reason: String,
    },
}

/// Result type for grid operations.
pub type GridResult<T> = Result<T, GridError>;
