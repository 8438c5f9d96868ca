//! Processors backed by interpolated sample grids.

use std::sync::Arc;

use bastet_channel::ChiDiagonal;
use bastet_proc::{AppliedInstruction, InstructionSpec, ProcError, ProcResult, Processor, ReadoutError};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::interpolate::{Field, Interpolator};
use crate::model::SerializedProcessor;

/// The free parameter the cat-specialized processor injects itself.
const PHOTON_NUMBER_PARAM: &str = "nbar";

#[derive(Debug)]
struct Entry {
    free_params: Vec<String>,
    readout: Option<ReadoutError>,
    pauli: Option<Arc<Interpolator>>,
    duration: Arc<Interpolator>,
}

/// A processor description built from a serialized grid of simulated
/// behavior samples.
#[derive(Debug)]
pub struct InterpolatedProcessor {
    clock_cycle: f64,
    entries: FxHashMap<(String, Vec<u32>), Entry>,
    // Declaration order, for a stable all_instructions listing.
    order: Vec<(String, Vec<u32>)>,
}

impl InterpolatedProcessor {
    /// Build interpolators for every instruction of a serialized processor.
    ///
    /// Fails on duplicate (instruction, qubit tuple) combinations and on
    /// grids too sparse or too high-dimensional to interpolate.
    pub fn new(serialized: &SerializedProcessor, clock_cycle: f64) -> GridResult<Self> {
        let mut entries = FxHashMap::default();
        let mut order = Vec::new();
        for instr in &serialized.instructions {
            if instr.qubits.is_empty() {
                return Err(GridError::UnboundInstruction {
                    name: instr.name.clone(),
                });
            }
            let pauli = Interpolator::build(instr, Field::Pauli)?.map(Arc::new);
            let duration = Arc::new(
                Interpolator::build(instr, Field::Duration)?
                    .expect("every sample point carries a duration"),
            );
            let readout = match instr.readout_errors {
                Some([p10, p01]) => Some(ReadoutError::new(p10, p01).map_err(|e| {
                    GridError::InvalidReadout {
                        name: instr.name.clone(),
                        reason: e.to_string(),
                    }
                })?),
                None => None,
            };
            for qubits in &instr.qubits {
                let key = (instr.name.clone(), qubits.clone());
                if entries.contains_key(&key) {
                    return Err(GridError::DuplicateInstruction {
                        name: instr.name.clone(),
                        qubits: qubits.clone(),
                    });
                }
                order.push(key.clone());
                entries.insert(
                    key,
                    Entry {
                        free_params: instr.free_params.clone(),
                        readout,
                        pauli: pauli.clone(),
                        duration: Arc::clone(&duration),
                    },
                );
            }
        }
        debug!(
            processor = %serialized.metadata.name,
            n_instructions = order.len(),
            "built interpolated processor"
        );
        Ok(Self {
            clock_cycle,
            entries,
            order,
        })
    }

    /// The free-parameter names of one declared instruction.
    pub fn free_params(&self, name: &str, qubits: &[u32]) -> Option<&[String]> {
        self.entries
            .get(&(name.to_string(), qubits.to_vec()))
            .map(|e| e.free_params.as_slice())
    }

    fn spec_for(&self, key: &(String, Vec<u32>)) -> InstructionSpec {
        let entry = &self.entries[key];
        InstructionSpec {
            name: key.0.clone(),
            qubits: Some(key.1.clone()),
            params: entry.free_params.clone(),
            readout_errors: entry.readout,
        }
    }
}

fn into_proc_error(e: GridError) -> ProcError {
    match e {
        GridError::OutOfHull { name, point } => ProcError::OutOfDomain { name, point },
        other => ProcError::InvalidParameter {
            reason: other.to_string(),
        },
    }
}

impl Processor for InterpolatedProcessor {
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_> {
        Box::new(self.order.iter().map(|key| self.spec_for(key)))
    }

    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction> {
        let key = (name.to_string(), qubits.to_vec());
        let Some(entry) = self.entries.get(&key) else {
            return Err(ProcError::UnknownInstruction {
                name: name.to_string(),
                qubits: qubits.to_vec(),
            });
        };
        if params.len() != entry.free_params.len() {
            return Err(ProcError::ParamCountMismatch {
                name: name.to_string(),
                expected: entry.free_params.len(),
                got: params.to_vec(),
            });
        }
        let duration = entry.duration.query(params).map_err(into_proc_error)?[0];
        let quantum_errors = match &entry.pauli {
            Some(interp) => {
                let diag = interp.query(params).map_err(into_proc_error)?;
                Some(ChiDiagonal::from_diag(diag)?)
            }
            None => None,
        };
        Ok(AppliedInstruction {
            duration,
            quantum_errors,
            readout_errors: entry.readout,
        })
    }

    fn clock_cycle(&self) -> f64 {
        self.clock_cycle
    }

    fn all_to_all_connectivity(&self) -> bool {
        false
    }
}

/// A grid-backed processor tailored to cat qubits: the photon number
/// `n̄ = |α|²` is injected into every lookup, so callers only supply the
/// remaining free parameters.
pub struct CatInterpolatedProcessor {
    inner: InterpolatedProcessor,
    alpha: f64,
}

impl CatInterpolatedProcessor {
    /// Build the cat-specialized processor for a given cat amplitude.
    pub fn new(
        serialized: &SerializedProcessor,
        clock_cycle: f64,
        alpha: f64,
    ) -> GridResult<Self> {
        Ok(Self {
            inner: InterpolatedProcessor::new(serialized, clock_cycle)?,
            alpha,
        })
    }

    /// The injected mean photon number.
    pub fn average_nb_photons(&self) -> f64 {
        self.alpha.abs().powi(2)
    }
}

impl Processor for CatInterpolatedProcessor {
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_> {
        Box::new(self.inner.all_instructions().map(|mut spec| {
            spec.params.retain(|p| p != PHOTON_NUMBER_PARAM);
            spec
        }))
    }

    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction> {
        let Some(free_params) = self.inner.free_params(name, qubits) else {
            return Err(ProcError::UnknownInstruction {
                name: name.to_string(),
                qubits: qubits.to_vec(),
            });
        };
        let expected = free_params
            .iter()
            .filter(|p| *p != PHOTON_NUMBER_PARAM)
            .count();
        if params.len() != expected {
            return Err(ProcError::ParamCountMismatch {
                name: name.to_string(),
                expected,
                got: params.to_vec(),
            });
        }
        // Splice the photon number in while preserving the grid's order.
        let mut supplied = params.iter();
        let full: Vec<f64> = free_params
            .iter()
            .map(|p| {
                if p == PHOTON_NUMBER_PARAM {
                    self.average_nb_photons()
                } else {
                    *supplied.next().expect("arity checked above")
                }
            })
            .collect();
        self.inner.apply_instruction(name, qubits, &full)
    }

    fn clock_cycle(&self) -> f64 {
        self.inner.clock_cycle()
    }

    fn all_to_all_connectivity(&self) -> bool {
        false
    }
}
