//! The processor contract.
//!
//! A [`Processor`] describes the behavior of a quantum processing unit at
//! the gate level: which instructions exist, how long each takes, and the
//! quantum error channel it applies. The contract is finer-grained than a
//! gate-set table because noise and duration may depend continuously on the
//! instruction parameters (a rotation angle, a delay duration).
//!
//! Implementations are pure once constructed: `apply_instruction` is
//! referentially transparent and safe to call concurrently.

use crate::error::{ProcError, ProcResult};
use crate::instruction::{AppliedInstruction, InstructionSpec};

/// Gate-level description of a quantum processor.
pub trait Processor {
    /// All instructions available on the processor.
    ///
    /// Finite, and stable across calls: iterating twice yields the same
    /// declarations. An instruction available on multiple qubit tuples is
    /// listed once per tuple.
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_>;

    /// Duration and noise of one instruction evaluated with concrete
    /// parameters.
    ///
    /// Fails when `(name, qubits)` is not declared by the processor or when
    /// `params` does not match the instruction's arity; the error names the
    /// offending combination.
    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction>;

    /// The clock cycle in seconds.
    ///
    /// Durations reported by the processor are not rounded to clock-cycle
    /// multiples; clipping is up to the caller (typically a scheduler).
    fn clock_cycle(&self) -> f64;

    /// True iff instructions are declared without qubit tuples and the
    /// processor carries a fixed total qubit count instead.
    fn all_to_all_connectivity(&self) -> bool;
}

/// Check that every declaration follows one connectivity convention.
///
/// All-to-all processors must declare every instruction with `qubits ==
/// None`; fixed-qubit processors must bind every instruction to an explicit
/// tuple. A mixed set is a construction error, not something to tolerate at
/// lookup time. Processor constructors run this over their own declarations;
/// consumers building a noise-model view of a third-party [`Processor`]
/// should do the same.
pub fn check_connectivity_convention(
    specs: impl IntoIterator<Item = InstructionSpec>,
    all_to_all: bool,
) -> ProcResult<()> {
    for spec in specs {
        if spec.qubits.is_none() != all_to_all {
            return Err(ProcError::MixedConnectivity { name: spec.name });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_check_accepts_uniform_sets() {
        let bound = vec![
            InstructionSpec::bound("x", [0], []),
            InstructionSpec::bound("cx", [0, 1], []),
        ];
        assert!(check_connectivity_convention(bound, false).is_ok());

        let free = vec![InstructionSpec::all_to_all("x", [])];
        assert!(check_connectivity_convention(free, true).is_ok());
    }

    #[test]
    fn convention_check_rejects_mixed_sets() {
        let mixed = vec![
            InstructionSpec::bound("x", [0], []),
            InstructionSpec::all_to_all("cx", []),
        ];
        let err = check_connectivity_convention(mixed, false).unwrap_err();
        assert!(matches!(err, ProcError::MixedConnectivity { name } if name == "cx"));
    }
}
