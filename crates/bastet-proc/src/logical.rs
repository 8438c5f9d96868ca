//! Logical cat-qubit processor.
//!
//! Each logical qubit is a linear repetition code of `distance` physical cat
//! qubits. The code corrects phase flips; bit flips are already suppressed
//! by the physical error correction built into the cat qubits themselves.
//! Connectivity is all-to-all.
//!
//! A discrete gate lasts one error-correction cycle of `d` syndrome
//! measurement rounds, `5d/κ₂` in total. Idle periods are modeled by
//! composing one per-cycle error channel per elapsed cycle; the result is a
//! valid channel even for durations shorter than one cycle.

use bastet_channel::{ChiDiagonal, PauliErrorMap, compose_1q, flip_probabilities, tensor};
use tracing::debug;

use crate::error::{ProcError, ProcResult};
use crate::instruction::{AppliedInstruction, InstructionSpec};
use crate::processor::{Processor, check_connectivity_convention};

const ONE_QUBIT_GATES: [&str; 11] = [
    "x", "z", "p0", "p1", "p+", "p-", "mx", "mz", "t", "tdg", "h",
];

/// Message produced when the noiseless configuration is given non-canonical
/// physical parameters.
const NOISELESS_PARAMS_MSG: &str = "the noiseless logical processor uses the canonical \
     parameter set; only n_qubits and clock_cycle may differ from the defaults";

/// Construction parameters for [`LogicalCatProcessor`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalCatConfig {
    /// Number of logical qubits.
    pub n_qubits: u32,
    /// Repetition-code distance; odd, at least 3. Also the number of
    /// physical cat qubits per logical qubit.
    pub distance: u32,
    /// One-photon dissipation rate of the physical memories, in Hz.
    pub kappa_1: f64,
    /// Two-photon dissipation rate of the physical memories, in Hz.
    pub kappa_2: f64,
    /// Mean photon number n̄ of the physical memories.
    pub average_nb_photons: f64,
    /// Clock cycle in seconds.
    pub clock_cycle: f64,
}

impl Default for LogicalCatConfig {
    fn default() -> Self {
        Self {
            n_qubits: 5,
            distance: 11,
            kappa_1: 100.0,
            kappa_2: 10_000_000.0,
            average_nb_photons: 16.0,
            clock_cycle: 1e-9,
        }
    }
}

/// A processor of repetition-code logical qubits built from cat qubits.
#[derive(Debug, Clone)]
pub struct LogicalCatProcessor {
    n_qubits: u32,
    distance: u32,
    kappa_1: f64,
    kappa_2: f64,
    average_nb_photons: f64,
    clock_cycle: f64,
    noiseless: bool,
}

impl LogicalCatProcessor {
    /// Build a noisy processor, validating the physical parameters.
    pub fn new(config: LogicalCatConfig) -> ProcResult<Self> {
        Self::build(config, false)
    }

    /// Build the noiseless twin: identical instructions and durations, no
    /// error channels.
    ///
    /// The noiseless mode is a single canonical configuration, not a flag on
    /// arbitrary parameters: every physical parameter (`distance`,
    /// `kappa_1`, `kappa_2`, `average_nb_photons`) must keep its default
    /// value. Only `n_qubits` and `clock_cycle` may be overridden.
    pub fn noiseless(config: LogicalCatConfig) -> ProcResult<Self> {
        let canonical = LogicalCatConfig {
            n_qubits: config.n_qubits,
            clock_cycle: config.clock_cycle,
            ..LogicalCatConfig::default()
        };
        if config != canonical {
            return Err(ProcError::InvalidParameter {
                reason: NOISELESS_PARAMS_MSG.to_string(),
            });
        }
        Self::build(config, true)
    }

    fn build(config: LogicalCatConfig, noiseless: bool) -> ProcResult<Self> {
        if config.distance % 2 != 1 || config.distance < 3 {
            return Err(ProcError::InvalidParameter {
                reason: format!(
                    "the distance of the linear repetition code should be an odd number >= 3, got {}",
                    config.distance
                ),
            });
        }
        if config.average_nb_photons < 4.0 {
            return Err(ProcError::InvalidParameter {
                reason: format!(
                    "the average number of photons should be at least 4.0, got {}",
                    config.average_nb_photons
                ),
            });
        }
        if config.kappa_1 < 10.0 {
            return Err(ProcError::InvalidParameter {
                reason: format!(
                    "the one-photon dissipation rate kappa_1 (Hz) should be at least 10, got {}",
                    config.kappa_1
                ),
            });
        }
        let ratio = config.kappa_1 / config.kappa_2;
        if !(1e-7..=1e-1).contains(&ratio) {
            return Err(ProcError::InvalidParameter {
                reason: format!(
                    "the ratio kappa_1 / kappa_2 should be between 1e-7 and 1e-1, got {ratio}"
                ),
            });
        }
        debug!(
            n_qubits = config.n_qubits,
            distance = config.distance,
            kappa_1 = config.kappa_1,
            kappa_2 = config.kappa_2,
            average_nb_photons = config.average_nb_photons,
            noiseless,
            "constructed logical cat processor"
        );
        let proc = Self {
            n_qubits: config.n_qubits,
            distance: config.distance,
            kappa_1: config.kappa_1,
            kappa_2: config.kappa_2,
            average_nb_photons: config.average_nb_photons,
            clock_cycle: config.clock_cycle,
            noiseless,
        };
        check_connectivity_convention(proc.all_instructions(), true)?;
        Ok(proc)
    }

    /// Number of logical qubits.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Repetition-code distance.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Duration of one error-correction cycle (also the duration of every
    /// discrete gate): `d` measurement rounds of `5/κ₂` each.
    ///
    /// [AB-SHOR] <https://arxiv.org/pdf/2302.06639v1.pdf>, p. 4.
    pub fn cycle_time(&self) -> f64 {
        5.0 * f64::from(self.distance) / self.kappa_2
    }

    fn known_instruction(&self, name: &str, qubits: &[u32]) -> bool {
        let arity_ok = match name {
            "cx" => qubits.len() == 2,
            "ccx" => qubits.len() == 3,
            "delay" => qubits.len() == 1,
            _ if ONE_QUBIT_GATES.contains(&name) => qubits.len() == 1,
            _ => return false,
        };
        arity_ok && qubits.iter().all(|&q| q < self.n_qubits)
    }

    fn to_chi(&self, name: &str, errors: &PauliErrorMap) -> ProcResult<ChiDiagonal> {
        ChiDiagonal::from_pauli_errors(errors).map_err(|source| {
            ProcError::InconsistentErrorProbabilities {
                name: name.to_string(),
                params: format!(
                    "distance={}, average_nb_photons={}, kappa_1={}, kappa_2={}",
                    self.distance, self.average_nb_photons, self.kappa_1, self.kappa_2
                ),
                source,
            }
        })
    }

    /// Per-cycle logical error of a single logical qubit.
    ///
    /// [AB-SHOR] <https://arxiv.org/pdf/2302.06639v1.pdf>, Eq. 3, p. 25.
    /// Both flip probabilities are `d` times the per-measurement-cycle error
    /// at first order.
    fn one_qubit_error(&self) -> PauliErrorMap {
        let d = f64::from(self.distance);
        let nbar = self.average_nb_photons;
        let px = (d - 1.0) * d * (-2.0 * nbar).exp();
        let pz = 5.6e-2
            * d
            * (nbar.powf(0.86) * self.kappa_1 / self.kappa_2 / 1.3e-2)
                .powf(0.5 * (d + 1.0));
        let [x, y, z] = flip_probabilities([px, 0.0, pz]);
        [("X", x), ("Y", y), ("Z", z)]
            .into_iter()
            .map(|(label, prob)| (label.to_string(), prob))
            .collect()
    }

    /// Idle error over `t` seconds: one composed per-cycle channel per full
    /// error-correction cycle.
    ///
    /// The accumulator starts from an explicit zero map rather than an empty
    /// one, so the channel keeps its single-qubit width even when `t` is
    /// shorter than a cycle.
    fn idle_error(&self, t: f64) -> ProcResult<PauliErrorMap> {
        let cycles = (t / self.cycle_time()).floor() as u64;
        let cycle_error = self.one_qubit_error();
        let mut error: PauliErrorMap =
            [("X".to_string(), 0.0), ("Z".to_string(), 0.0)].into_iter().collect();
        for _ in 0..cycles {
            error = compose_1q(&error, &cycle_error)?;
        }
        Ok(error)
    }
}

impl Processor for LogicalCatProcessor {
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_> {
        let head = std::iter::once(InstructionSpec::all_to_all("delay", ["duration"]));
        let one_qubit = ONE_QUBIT_GATES
            .into_iter()
            .map(|name| InstructionSpec::all_to_all(name, []));
        let multi = ["cx", "ccx"]
            .into_iter()
            .map(|name| InstructionSpec::all_to_all(name, []));
        Box::new(head.chain(one_qubit).chain(multi))
    }

    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction> {
        if !self.known_instruction(name, qubits) {
            return Err(ProcError::UnknownInstruction {
                name: name.to_string(),
                qubits: qubits.to_vec(),
            });
        }
        let expected = usize::from(name == "delay");
        if params.len() != expected {
            return Err(ProcError::ParamCountMismatch {
                name: name.to_string(),
                expected,
                got: params.to_vec(),
            });
        }
        let (duration, errors) = match name {
            "delay" => {
                let t = params[0];
                if t < 0.0 || t.is_nan() {
                    return Err(ProcError::InvalidParameter {
                        reason: format!("delay duration must be non-negative, got {t}"),
                    });
                }
                (t, self.idle_error(t)?)
            }
            "cx" => {
                let single = self.one_qubit_error();
                (self.cycle_time(), tensor(&single, &single)?)
            }
            "ccx" => {
                let single = self.one_qubit_error();
                let two = tensor(&single, &single)?;
                (self.cycle_time(), tensor(&two, &single)?)
            }
            _ => (self.cycle_time(), self.one_qubit_error()),
        };
        if self.noiseless {
            return Ok(AppliedInstruction {
                duration,
                quantum_errors: None,
                readout_errors: None,
            });
        }
        let quantum_errors = self.to_chi(name, &errors)?;
        Ok(AppliedInstruction {
            duration,
            quantum_errors: Some(quantum_errors),
            readout_errors: None,
        })
    }

    fn clock_cycle(&self) -> f64 {
        self.clock_cycle
    }

    fn all_to_all_connectivity(&self) -> bool {
        true
    }
}
