//! Physical cat-qubit processor.
//!
//! Every qubit is a directly addressed physical cat qubit. All qubits share
//! the same physical properties, entirely controlled by three quantities:
//!
//! - `kappa_1` (Hz), the one-photon dissipation rate of the memory,
//! - `kappa_2` (Hz), the two-photon dissipation rate of the memory,
//! - `alpha` (unitless), the amplitude of the cat state; the mean photon
//!   number is n̄ = |α|².
//!
//! On a chip, κ₁ and κ₂ are fixed by the architecture; α is tunable by the
//! operator. Gate times and error models follow published references, cited
//! next to each formula. Two prefactors (the idle bit-flip 1.1e-3 and the
//! cx bit-flip 2631) are calibrated against reference data rather than
//! derived; tests pin them as golden values.

use bastet_channel::{ChiDiagonal, PauliErrorMap, flip_probabilities};
use tracing::debug;

use crate::coupling::CouplingMap;
use crate::error::{ProcError, ProcResult};
use crate::instruction::{AppliedInstruction, InstructionSpec};
use crate::processor::{Processor, check_connectivity_convention};

const ONE_QUBIT_GATES: [&str; 8] = ["x", "z", "p0", "p1", "p+", "p-", "mx", "mz"];

/// Construction parameters for [`PhysicalCatProcessor`].
#[derive(Debug, Clone)]
pub struct PhysicalCatConfig {
    /// Number of qubits.
    pub n_qubits: u32,
    /// One-photon dissipation rate in Hz.
    pub kappa_1: f64,
    /// Two-photon dissipation rate in Hz.
    pub kappa_2: f64,
    /// Cat-state amplitude.
    pub alpha: f64,
    /// Clock cycle in seconds.
    pub clock_cycle: f64,
    /// Coupling map for two-qubit gates; `None` means all-to-all.
    pub coupling_map: Option<CouplingMap>,
}

impl Default for PhysicalCatConfig {
    fn default() -> Self {
        Self {
            n_qubits: 5,
            kappa_1: 100.0,
            kappa_2: 10_000_000.0,
            alpha: 4.0,
            clock_cycle: 1e-9,
            coupling_map: None,
        }
    }
}

/// A processor made of physical cat qubits.
#[derive(Debug, Clone)]
pub struct PhysicalCatProcessor {
    n_qubits: u32,
    kappa_1: f64,
    kappa_2: f64,
    alpha: f64,
    clock_cycle: f64,
    coupling_map: CouplingMap,
}

impl PhysicalCatProcessor {
    /// Build a processor, validating the physical parameters and the
    /// coupling map.
    pub fn new(config: PhysicalCatConfig) -> ProcResult<Self> {
        if config.alpha < 2.0 {
            return Err(ProcError::InvalidParameter {
                reason: format!(
                    "the amplitude alpha should be at least 2.0, got {}",
                    config.alpha
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
        let coupling_map = match config.coupling_map {
            Some(map) => {
                map.validate(config.n_qubits)?;
                map
            }
            None => CouplingMap::all_to_all(config.n_qubits),
        };
        debug!(
            n_qubits = config.n_qubits,
            kappa_1 = config.kappa_1,
            kappa_2 = config.kappa_2,
            alpha = config.alpha,
            "constructed physical cat processor"
        );
        let proc = Self {
            n_qubits: config.n_qubits,
            kappa_1: config.kappa_1,
            kappa_2: config.kappa_2,
            alpha: config.alpha,
            clock_cycle: config.clock_cycle,
            coupling_map,
        };
        check_connectivity_convention(proc.all_instructions(), false)?;
        Ok(proc)
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// The validated coupling map.
    pub fn coupling_map(&self) -> &CouplingMap {
        &self.coupling_map
    }

    fn check_lookup(&self, name: &str, qubits: &[u32]) -> ProcResult<()> {
        let known = match name {
            "cx" => {
                qubits.len() == 2 && self.coupling_map.contains(qubits[0], qubits[1])
            }
            "delay" | "rz" => qubits.len() == 1 && qubits[0] < self.n_qubits,
            _ if ONE_QUBIT_GATES.contains(&name) => {
                qubits.len() == 1 && qubits[0] < self.n_qubits
            }
            _ => false,
        };
        if known {
            Ok(())
        } else {
            Err(ProcError::UnknownInstruction {
                name: name.to_string(),
                qubits: qubits.to_vec(),
            })
        }
    }

    fn expect_params(&self, name: &str, params: &[f64], expected: usize) -> ProcResult<()> {
        if params.len() == expected {
            Ok(())
        } else {
            Err(ProcError::ParamCountMismatch {
                name: name.to_string(),
                expected,
                got: params.to_vec(),
            })
        }
    }

    fn to_chi(&self, name: &str, errors: &PauliErrorMap) -> ProcResult<ChiDiagonal> {
        ChiDiagonal::from_pauli_errors(errors).map_err(|source| {
            ProcError::InconsistentErrorProbabilities {
                name: name.to_string(),
                params: format!(
                    "alpha={}, kappa_1={}, kappa_2={}",
                    self.alpha, self.kappa_1, self.kappa_2
                ),
                source,
            }
        })
    }
}

impl Processor for PhysicalCatProcessor {
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_> {
        let per_qubit = (0..self.n_qubits).flat_map(|q| {
            let mut specs = vec![
                InstructionSpec::bound("delay", [q], ["duration"]),
                InstructionSpec::bound("rz", [q], ["angle"]),
            ];
            specs.extend(
                ONE_QUBIT_GATES
                    .into_iter()
                    .map(|name| InstructionSpec::bound(name, [q], [])),
            );
            specs
        });
        let cx = self
            .coupling_map
            .edges()
            .iter()
            .map(|&(a, b)| InstructionSpec::bound("cx", [a, b], []));
        Box::new(per_qubit.chain(cx))
    }

    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction> {
        self.check_lookup(name, qubits)?;
        let expected = match name {
            "delay" | "rz" => 1,
            _ => 0,
        };
        self.expect_params(name, params, expected)?;
        let (duration, errors) = match name {
            "mx" => mx_error(self.kappa_1, self.kappa_2, self.alpha),
            "mz" => mz_error(self.alpha),
            "delay" => {
                let t = params[0];
                if t < 0.0 || t.is_nan() {
                    return Err(ProcError::InvalidParameter {
                        reason: format!("delay duration must be non-negative, got {t}"),
                    });
                }
                (t, idle_error(self.kappa_1, self.alpha, t))
            }
            "p+" | "p-" => prep_plus_error(self.kappa_1, self.kappa_2, self.alpha),
            "p0" | "p1" => prep_0_error(self.kappa_2, self.alpha),
            "x" => x_error(self.kappa_1, self.kappa_2, self.alpha),
            "rz" => rz_error(self.kappa_1, self.kappa_2, self.alpha, params[0]),
            "z" => rz_error(self.kappa_1, self.kappa_2, self.alpha, std::f64::consts::PI),
            "cx" => cx_error(self.kappa_1, self.kappa_2, self.alpha),
            _ => unreachable!("lookup check admits only known names"),
        };
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
        false
    }
}

fn pauli_map(entries: &[(&str, f64)]) -> PauliErrorMap {
    entries
        .iter()
        .map(|(label, prob)| (label.to_string(), *prob))
        .collect()
}

/// Idle (memory) error over a duration `t`.
///
/// [LES-HOUCHES] <https://arxiv.org/pdf/2203.03222.pdf>
/// The prefactor 1.1e-3 matches the α² = 8 point of the blue curve in
/// Fig. 7, p. 29: the total bit-flip probability (pX + pY) must be 1e-11
/// for α² = 8, κ₁/κ₂ = 1e-2, t = 1/κ₂.
fn idle_error(k1: f64, alpha: f64, t: f64) -> PauliErrorMap {
    let nbar = alpha.abs().powi(2);
    let bit_flip = 0.5 * 1.1e-3 * nbar * k1 * (-2.0 * nbar).exp() * t;
    let phase_flip = k1 * nbar * t;
    let [x, y, z] = flip_probabilities([bit_flip, bit_flip, phase_flip]);
    pauli_map(&[("X", x), ("Y", y), ("Z", z)])
}

/// |+⟩ / |−⟩ preparation.
///
/// [AB-SHOR] <https://arxiv.org/pdf/2302.06639v1.pdf>, p. 25.
fn prep_plus_error(k1: f64, k2: f64, alpha: f64) -> (f64, PauliErrorMap) {
    let t = 1.0 / k2;
    (t, pauli_map(&[("Z", alpha.abs().powi(2) * k1 * t)]))
}

/// |0⟩ / |1⟩ preparation.
///
/// [AWS-2022] <https://arxiv.org/pdf/2012.04108.pdf>, Table II, p. 17.
fn prep_0_error(k2: f64, alpha: f64) -> (f64, PauliErrorMap) {
    let nbar = alpha.abs().powi(2);
    let t = 0.1 / k2 / nbar;
    (t, pauli_map(&[("X", 0.39 * (-4.0 * nbar).exp())]))
}

fn x_error(k1: f64, k2: f64, alpha: f64) -> (f64, PauliErrorMap) {
    let t = 1.0 / k2;
    (t, idle_error(k1, alpha, t))
}

/// X-basis measurement.
///
/// [AB-SHOR] <https://arxiv.org/pdf/2302.06639v1.pdf>, p. 25.
fn mx_error(k1: f64, k2: f64, alpha: f64) -> (f64, PauliErrorMap) {
    let t = 1.0 / k2;
    (t, pauli_map(&[("Z", alpha.abs().powi(2) * k1 * t)]))
}

/// Z-basis measurement.
///
/// [AWS-2022] <https://arxiv.org/pdf/2012.04108.pdf>, Eq. 38, p. 18.
fn mz_error(alpha: f64) -> (f64, PauliErrorMap) {
    let t = 850e-9;
    let nbar = alpha.abs().powi(2);
    (t, pauli_map(&[("X", (-1.5 - 0.9 * nbar).exp())]))
}

/// Z rotation by `theta`.
///
/// [JEREMIE] <https://hal.science/tel-03509305/document>, p. 65.
/// (The thesis formula has an error: it should read |θ|, not √θ.)
fn rz_error(k1: f64, k2: f64, alpha: f64, theta: f64) -> (f64, PauliErrorMap) {
    let alpha_n = alpha.abs();
    let t = 0.25 * theta.abs() / (alpha_n.powi(3) * (k1 * k2).sqrt());
    let rate_z = theta.abs() / (2.0 * alpha_n) * (k1 / k2).sqrt();
    let [x, y, z] = flip_probabilities([0.0, 0.0, rate_z]);
    (t, pauli_map(&[("X", x), ("Y", y), ("Z", z)]))
}

/// CNOT between two cat qubits.
///
/// [AB-SHOR] <https://arxiv.org/pdf/2302.06639v1.pdf>, p. 25.
/// The prefactor 2631 makes the total bit-flip probability equal to
/// 0.5·e^(−2α²) at α² = 19, κ₁/κ₂ = 1e-5, matching Eq. D8, p. 26.
fn cx_error(k1: f64, k2: f64, alpha: f64) -> (f64, PauliErrorMap) {
    let nbar = alpha.abs().powi(2);
    let t = 1.0 / k2;
    let zi_error = nbar * k1 * t + std::f64::consts::PI.powi(2) / 64.0 / nbar / k2 / t;
    let zz_error = 0.5 * nbar * k1 * t;
    let xi_error = 2631.0 * nbar * k1 * (-2.0 * nbar).exp() * t / 6.0;
    // Dropped: two orders of magnitude below the X-family terms.
    let iy_error = 0.0;
    let errors = pauli_map(&[
        ("IZ", zi_error),
        ("ZZ", zz_error),
        ("ZI", zz_error),
        ("IX", xi_error),
        ("XX", xi_error),
        ("XI", xi_error),
        ("IY", xi_error),
        ("XY", xi_error),
        ("XZ", xi_error),
        ("YI", iy_error),
        ("YY", iy_error),
        ("YX", iy_error),
        ("ZX", iy_error),
        ("ZY", iy_error),
        ("YZ", iy_error),
    ]);
    (t, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        assert_eq!(proc.n_qubits(), 5);
        assert!(!proc.all_to_all_connectivity());
    }

    #[test]
    fn zero_duration_delay_is_noise_free() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        let applied = proc.apply_instruction("delay", &[0], &[0.0]).unwrap();
        assert_eq!(applied.duration, 0.0);
        let chi = applied.quantum_errors.unwrap();
        assert_eq!(chi.diag()[0], 1.0);
        assert_eq!(&chi.diag()[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn z_is_rz_of_pi() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        let z = proc.apply_instruction("z", &[0], &[]).unwrap();
        let rz = proc
            .apply_instruction("rz", &[0], &[std::f64::consts::PI])
            .unwrap();
        assert_eq!(z.duration, rz.duration);
        assert_eq!(z.quantum_errors, rz.quantum_errors);
    }

    #[test]
    fn unknown_instruction_reports_name_and_qubits() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        let err = proc.apply_instruction("h", &[0], &[]).unwrap_err();
        assert!(matches!(err, ProcError::UnknownInstruction { .. }));
        // cx outside the coupling map is unknown too.
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig {
            n_qubits: 3,
            coupling_map: Some(CouplingMap::from_edges(3, vec![(0, 1)]).unwrap()),
            ..PhysicalCatConfig::default()
        })
        .unwrap();
        assert!(proc.apply_instruction("cx", &[0, 1], &[]).is_ok());
        assert!(proc.apply_instruction("cx", &[1, 2], &[]).is_err());
    }

    #[test]
    fn delay_requires_exactly_one_param() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        let err = proc.apply_instruction("delay", &[0], &[]).unwrap_err();
        assert!(matches!(err, ProcError::ParamCountMismatch { expected: 1, .. }));
    }

    #[test]
    fn instruction_listing_is_stable() {
        let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
        let first: Vec<_> = proc.all_instructions().collect();
        let second: Vec<_> = proc.all_instructions().collect();
        assert_eq!(first, second);
        // 10 single-qubit declarations per qubit plus one cx per edge.
        assert_eq!(first.len(), 5 * 10 + proc.coupling_map().edges().len());
    }
}
