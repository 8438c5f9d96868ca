//! Error types for processor descriptions.

use bastet_channel::ChannelError;
use thiserror::Error;

/// Errors raised by processor construction and instruction lookup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcError {
    /// A physical parameter is outside its validated range.
    #[error("invalid processor parameter: {reason}")]
    InvalidParameter {
        /// What was wrong.
        reason: String,
    },

    /// A coupling map references invalid qubit pairs.
    #[error("coupling map contains an invalid pair ({a}, {b}) for a processor with {n_qubits} qubits")]
    InvalidCoupling {
        /// First qubit of the offending pair.
        a: u32,
        /// Second qubit of the offending pair.
        b: u32,
        /// Number of qubits on the processor.
        n_qubits: u32,
    },

    /// The (name, qubits) combination is not declared by this processor.
    #[error("unknown instruction '{name}' on qubits {qubits:?}")]
    UnknownInstruction {
        /// Requested instruction name.
        name: String,
        /// Requested qubit tuple.
        qubits: Vec<u32>,
    },

    /// The number of parameters does not match the instruction's arity.
    #[error("instruction '{name}' expects {expected} parameter(s), got {got:?}")]
    ParamCountMismatch {
        /// Instruction name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// The parameters that were supplied.
        got: Vec<f64>,
    },

    /// Processor parameters produced error probabilities outside [0, 1].
    #[error("processor parameters ({params}) led to inconsistent error probabilities for instruction '{name}': {source}")]
    InconsistentErrorProbabilities {
        /// Instruction name.
        name: String,
        /// Human-readable dump of the processor parameters.
        params: String,
        /// The underlying channel error.
        source: ChannelError,
    },

    /// A user-supplied duration/noise model failed or returned invalid data.
    #[error("custom model for gate '{gate}' failed: {reason}")]
    CustomModel {
        /// Gate the model belongs to.
        gate: String,
        /// What went wrong.
        reason: String,
    },

    /// Fixed-qubit and all-to-all instruction conventions were mixed.
    #[error("processor mixes all-to-all and fixed-qubit instruction declarations (instruction '{name}')")]
    MixedConnectivity {
        /// The instruction that disagrees with the rest of the processor.
        name: String,
    },

    /// A lookup parameter lies outside the sampled interpolation region.
    #[error("cannot interpolate point {point:?} for instruction '{name}': outside the sampled parameter region")]
    OutOfDomain {
        /// Instruction name.
        name: String,
        /// The query point that could not be interpolated.
        point: Vec<f64>,
    },

    /// Channel-algebra failure outside the probability-consistency path.
    #[error("channel algebra error: {0}")]
    Channel(#[from] ChannelError),
}

/// Result type for processor operations.
pub type ProcResult<T> = Result<T, ProcError>;
