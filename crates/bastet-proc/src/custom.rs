//! Custom (pluggable) processor descriptions.
//!
//! A [`CustomProcessor`] is driven entirely by user-supplied closures: one
//! noise function and one time function per gate, with optional defaults
//! covering the single-qubit gate set. Model outputs are validated on every
//! call (probabilities within [0, 1] and summing to at most 1, durations
//! finite and non-negative); any closure failure or invalid output is
//! wrapped into a single error kind naming the gate.
//!
//! Evaluations are memoized per gate in a bounded LRU cache keyed by the
//! exact bit patterns of the gate parameters plus a fingerprint of the
//! backend parameters. The cache is shared mutable state behind a mutex:
//! concurrent first-time evaluations of the same key may duplicate work but
//! cannot corrupt the cache.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use bastet_channel::{ChiDiagonal, PauliErrorMap};
use rustc_hash::{FxHashMap, FxHasher};
use tracing::debug;

use crate::cache::{BoundedCache, CacheStats};
use crate::error::{ProcError, ProcResult};
use crate::instruction::{AppliedInstruction, InstructionSpec};
use crate::processor::{Processor, check_connectivity_convention};

const ONE_QUBIT_GATES: [&str; 13] = [
    "x", "z", "p0", "p1", "p+", "p-", "mx", "mz", "t", "tdg", "h", "s", "sdg",
];

const MODEL_CACHE_CAPACITY: usize = 128;

/// A user-supplied noise function: gate parameters and backend parameters in,
/// single-qubit Pauli error probabilities out.
pub type NoiseFn =
    Arc<dyn Fn(&[f64], &BackendParameters) -> Result<PauliErrorMap, String> + Send + Sync>;

/// A user-supplied duration function, in seconds.
pub type TimeFn = Arc<dyn Fn(&[f64], &BackendParameters) -> Result<f64, String> + Send + Sync>;

/// A user-supplied backend-parameter validator.
pub type ParamValidator = Arc<dyn Fn(&BackendParameters) -> bool + Send + Sync>;

/// The backend-wide parameters handed to every model invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendParameters {
    /// Number of qubits.
    pub n_qubits: u32,
    /// Clock cycle in seconds.
    pub clock_cycle: f64,
    /// Free-form named parameters (photon number, dissipation rates, ...).
    pub extra: BTreeMap<String, f64>,
}

impl BackendParameters {
    /// Parameters with the given qubit count and a 1 ns clock cycle.
    pub fn new(n_qubits: u32) -> Self {
        Self {
            n_qubits,
            clock_cycle: 1e-9,
            extra: BTreeMap::new(),
        }
    }

    /// Add a named parameter.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: f64) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// A stable hash of every field, used in memoization keys.
    fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.n_qubits.hash(&mut hasher);
        self.clock_cycle.to_bits().hash(&mut hasher);
        for (key, value) in &self.extra {
            key.hash(&mut hasher);
            value.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// One memoized model closure (noise or time).
struct Memoized<T: Clone> {
    gate: String,
    cache: Mutex<BoundedCache<Vec<u64>, T>>,
}

impl<T: Clone> Memoized<T> {
    fn new(gate: &str) -> Self {
        Self {
            gate: gate.to_string(),
            cache: Mutex::new(BoundedCache::new(MODEL_CACHE_CAPACITY)),
        }
    }

    fn key(params: &[f64], backend_fp: u64) -> Vec<u64> {
        let mut key: Vec<u64> = params.iter().map(|p| p.to_bits()).collect();
        key.push(backend_fp);
        key
    }

    /// Fetch from the cache or evaluate `f`, caching the result.
    ///
    /// The closure runs outside the lock; two racing first evaluations of
    /// one key both compute and the second insert wins.
    fn apply(
        &self,
        params: &[f64],
        backend_fp: u64,
        f: impl FnOnce() -> Result<T, String>,
    ) -> ProcResult<T> {
        let key = Self::key(params, backend_fp);
        if let Some(value) = self.cache.lock().expect("model cache poisoned").get(&key) {
            return Ok(value);
        }
        let value = f().map_err(|reason| ProcError::CustomModel {
            gate: self.gate.clone(),
            reason,
        })?;
        self.cache
            .lock()
            .expect("model cache poisoned")
            .insert(key, value.clone());
        Ok(value)
    }

    fn stats(&self) -> CacheStats {
        self.cache.lock().expect("model cache poisoned").stats()
    }
}

/// The models resolved for one gate: explicit entry, default fallback, or
/// absent (which only fails if the gate is actually applied).
struct GateModels {
    noise_fn: Option<NoiseFn>,
    time_fn: Option<TimeFn>,
    noise_memo: Memoized<PauliErrorMap>,
    time_memo: Memoized<f64>,
}

/// Builder for [`CustomProcessor`].
pub struct CustomProcessorBuilder {
    name: String,
    backend: BackendParameters,
    noise_models: FxHashMap<String, NoiseFn>,
    time_models: FxHashMap<String, TimeFn>,
    default_1q_noise: Option<NoiseFn>,
    default_1q_time: Option<TimeFn>,
    validator: Option<ParamValidator>,
}

impl CustomProcessorBuilder {
    /// Start a builder from backend parameters.
    pub fn new(backend: BackendParameters) -> Self {
        Self {
            name: "CustomProcessor".to_string(),
            backend,
            noise_models: FxHashMap::default(),
            time_models: FxHashMap::default(),
            default_1q_noise: None,
            default_1q_time: None,
            validator: None,
        }
    }

    /// Name reported in error messages.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Register a noise model for one gate.
    #[must_use]
    pub fn noise_model(
        mut self,
        gate: impl Into<String>,
        f: impl Fn(&[f64], &BackendParameters) -> Result<PauliErrorMap, String>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.noise_models.insert(gate.into(), Arc::new(f));
        self
    }

    /// Register a time model for one gate.
    #[must_use]
    pub fn time_model(
        mut self,
        gate: impl Into<String>,
        f: impl Fn(&[f64], &BackendParameters) -> Result<f64, String> + Send + Sync + 'static,
    ) -> Self {
        self.time_models.insert(gate.into(), Arc::new(f));
        self
    }

    /// Fallback noise model for single-qubit gates without an explicit entry.
    #[must_use]
    pub fn default_1q_noise_model(
        mut self,
        f: impl Fn(&[f64], &BackendParameters) -> Result<PauliErrorMap, String>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.default_1q_noise = Some(Arc::new(f));
        self
    }

    /// Fallback time model for single-qubit gates without an explicit entry.
    #[must_use]
    pub fn default_1q_time_model(
        mut self,
        f: impl Fn(&[f64], &BackendParameters) -> Result<f64, String> + Send + Sync + 'static,
    ) -> Self {
        self.default_1q_time = Some(Arc::new(f));
        self
    }

    /// Reject unacceptable backend parameters at build time.
    #[must_use]
    pub fn validate_parameters(
        mut self,
        f: impl Fn(&BackendParameters) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(f));
        self
    }

    /// Validate and build the processor.
    pub fn build(self) -> ProcResult<CustomProcessor> {
        if self.backend.n_qubits == 0 {
            return Err(ProcError::InvalidParameter {
                reason: format!("backend parameters for {} must declare at least one qubit", self.name),
            });
        }
        if let Some(validator) = &self.validator {
            if !validator(&self.backend) {
                return Err(ProcError::InvalidParameter {
                    reason: format!("invalid backend parameters provided for {}", self.name),
                });
            }
        }
        let mut models = FxHashMap::default();
        for gate in Self::supported_gates() {
            let is_1q = ONE_QUBIT_GATES.contains(&gate);
            let noise_fn = self
                .noise_models
                .get(gate)
                .cloned()
                .or_else(|| is_1q.then(|| self.default_1q_noise.clone()).flatten());
            let time_fn = self
                .time_models
                .get(gate)
                .cloned()
                .or_else(|| is_1q.then(|| self.default_1q_time.clone()).flatten());
            models.insert(
                gate.to_string(),
                GateModels {
                    noise_fn,
                    time_fn,
                    noise_memo: Memoized::new(gate),
                    time_memo: Memoized::new(gate),
                },
            );
        }
        debug!(name = %self.name, n_qubits = self.backend.n_qubits, "constructed custom processor");
        let proc = CustomProcessor {
            name: self.name,
            backend_fp: self.backend.fingerprint(),
            backend: self.backend,
            models,
        };
        check_connectivity_convention(proc.all_instructions(), true)?;
        Ok(proc)
    }

    fn supported_gates() -> impl Iterator<Item = &'static str> {
        ["delay"]
            .into_iter()
            .chain(ONE_QUBIT_GATES)
            .chain(["cx"])
    }
}

/// A processor description driven by user-supplied models.
pub struct CustomProcessor {
    name: String,
    backend: BackendParameters,
    backend_fp: u64,
    models: FxHashMap<String, GateModels>,
}

impl std::fmt::Debug for CustomProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomProcessor")
            .field("name", &self.name)
            .field("backend", &self.backend)
            .field("backend_fp", &self.backend_fp)
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CustomProcessor {
    /// Start building a processor.
    pub fn builder(backend: BackendParameters) -> CustomProcessorBuilder {
        CustomProcessorBuilder::new(backend)
    }

    /// Processor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> u32 {
        self.backend.n_qubits
    }

    /// The backend parameters handed to every model invocation.
    pub fn backend_parameters(&self) -> &BackendParameters {
        &self.backend
    }

    /// Cache counters of a gate's noise model, if the gate exists.
    pub fn noise_cache_stats(&self, gate: &str) -> Option<CacheStats> {
        self.models.get(gate).map(|m| m.noise_memo.stats())
    }

    /// Cache counters of a gate's time model, if the gate exists.
    pub fn time_cache_stats(&self, gate: &str) -> Option<CacheStats> {
        self.models.get(gate).map(|m| m.time_memo.stats())
    }

    fn validate_noise(&self, gate: &str, errors: &PauliErrorMap) -> ProcResult<()> {
        let mut total = 0.0;
        for (label, &prob) in errors {
            if !(0.0..=1.0).contains(&prob) {
                return Err(ProcError::CustomModel {
                    gate: gate.to_string(),
                    reason: format!("noise probability {prob} for '{label}' is outside [0, 1]"),
                });
            }
            total += prob;
        }
        if total > 1.0 {
            return Err(ProcError::CustomModel {
                gate: gate.to_string(),
                reason: format!("total noise probability {total} exceeds 1"),
            });
        }
        Ok(())
    }

    fn validate_duration(&self, gate: &str, duration: f64) -> ProcResult<()> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(ProcError::CustomModel {
                gate: gate.to_string(),
                reason: format!("duration {duration} is negative or not finite"),
            });
        }
        Ok(())
    }
}

impl Processor for CustomProcessor {
    fn all_instructions(&self) -> Box<dyn Iterator<Item = InstructionSpec> + '_> {
        let head = std::iter::once(InstructionSpec::all_to_all("delay", ["duration"]));
        let one_qubit = ONE_QUBIT_GATES
            .into_iter()
            .map(|name| InstructionSpec::all_to_all(name, []));
        let cx = std::iter::once(InstructionSpec::all_to_all("cx", []));
        Box::new(head.chain(one_qubit).chain(cx))
    }

    fn apply_instruction(
        &self,
        name: &str,
        qubits: &[u32],
        params: &[f64],
    ) -> ProcResult<AppliedInstruction> {
        let arity = match name {
            "cx" => 2,
            "delay" => 1,
            _ if ONE_QUBIT_GATES.contains(&name) => 1,
            _ => {
                return Err(ProcError::UnknownInstruction {
                    name: name.to_string(),
                    qubits: qubits.to_vec(),
                });
            }
        };
        if qubits.len() != arity || qubits.iter().any(|&q| q >= self.backend.n_qubits) {
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

        let models = self.models.get(name).expect("arity check admits known gates");
        let time_fn = models.time_fn.as_ref().ok_or_else(|| ProcError::CustomModel {
            gate: name.to_string(),
            reason: format!("no time model found (processor {})", self.name),
        })?;
        let noise_fn = models.noise_fn.as_ref().ok_or_else(|| ProcError::CustomModel {
            gate: name.to_string(),
            reason: format!("no noise model found (processor {})", self.name),
        })?;

        let duration = models
            .time_memo
            .apply(params, self.backend_fp, || time_fn(params, &self.backend))?;
        self.validate_duration(name, duration)?;

        let errors = models
            .noise_memo
            .apply(params, self.backend_fp, || noise_fn(params, &self.backend))?;
        self.validate_noise(name, &errors)?;

        let quantum_errors = ChiDiagonal::from_pauli_errors(&errors).map_err(|source| {
            ProcError::InconsistentErrorProbabilities {
                name: name.to_string(),
                params: format!("processor {}", self.name),
                source,
            }
        })?;
        Ok(AppliedInstruction {
            duration,
            quantum_errors: Some(quantum_errors),
            readout_errors: None,
        })
    }

    fn clock_cycle(&self) -> f64 {
        self.backend.clock_cycle
    }

    fn all_to_all_connectivity(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_noise(x: f64) -> impl Fn(&[f64], &BackendParameters) -> Result<PauliErrorMap, String> {
        move |_, _| {
            Ok([("X".to_string(), x), ("Y".to_string(), x), ("Z".to_string(), x)]
                .into_iter()
                .collect())
        }
    }

    #[test]
    fn builder_rejects_failing_validator() {
        let err = CustomProcessor::builder(BackendParameters::new(2))
            .name("TestProcessor")
            .validate_parameters(|b| b.extra.contains_key("kappa_1"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("TestProcessor"));
    }

    #[test]
    fn builder_accepts_passing_validator() {
        let proc = CustomProcessor::builder(
            BackendParameters::new(40).with_extra("kappa_1", 100.0),
        )
        .name("TestProcessor")
        .validate_parameters(|b| b.n_qubits > 0 && b.extra.contains_key("kappa_1"))
        .build()
        .unwrap();
        assert_eq!(proc.name(), "TestProcessor");
        assert_eq!(proc.n_qubits(), 40);
    }

    #[test]
    fn missing_noise_model_names_the_gate() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", flat_noise(0.0))
            .time_model("x", |_, _| Ok(0.0))
            .time_model("z", |_, _| Ok(0.0))
            .build()
            .unwrap();
        let err = proc.apply_instruction("z", &[0], &[]).unwrap_err();
        match err {
            ProcError::CustomModel { gate, reason } => {
                assert_eq!(gate, "z");
                assert!(reason.contains("no noise model"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_models_cover_single_qubit_gates() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", flat_noise(0.02))
            .time_model("x", |_, _| Ok(1e-7))
            .default_1q_noise_model(flat_noise(0.01))
            .default_1q_time_model(|_, _| Ok(2e-7))
            .build()
            .unwrap();
        // h falls back to the defaults; x uses the explicit entries.
        let h = proc.apply_instruction("h", &[0], &[]).unwrap();
        assert_eq!(h.duration, 2e-7);
        let x = proc.apply_instruction("x", &[0], &[]).unwrap();
        assert_eq!(x.duration, 1e-7);
    }

    #[test]
    fn memoization_reuses_results() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            move |_: &[f64], _: &BackendParameters| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(1e-7)
            }
        };
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", flat_noise(0.0))
            .time_model("x", counted)
            .build()
            .unwrap();
        proc.apply_instruction("x", &[0], &[]).unwrap();
        proc.apply_instruction("x", &[0], &[]).unwrap();
        proc.apply_instruction("x", &[1], &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = proc.time_cache_stats("x").unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn out_of_range_noise_is_wrapped() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", flat_noise(0.7))
            .time_model("x", |_, _| Ok(0.0))
            .build()
            .unwrap();
        // 3 × 0.7 sums above 1.
        let err = proc.apply_instruction("x", &[0], &[]).unwrap_err();
        assert!(matches!(err, ProcError::CustomModel { gate, .. } if gate == "x"));
    }

    #[test]
    fn negative_duration_is_wrapped() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", flat_noise(0.0))
            .time_model("x", |_, _| Ok(-1.0))
            .build()
            .unwrap();
        let err = proc.apply_instruction("x", &[0], &[]).unwrap_err();
        assert!(matches!(err, ProcError::CustomModel { gate, .. } if gate == "x"));
    }

    #[test]
    fn closure_error_is_wrapped() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("x", |_, _| Err("angle out of range".to_string()))
            .time_model("x", |_, _| Ok(0.0))
            .build()
            .unwrap();
        let err = proc.apply_instruction("x", &[0], &[]).unwrap_err();
        match err {
            ProcError::CustomModel { gate, reason } => {
                assert_eq!(gate, "x");
                assert!(reason.contains("angle out of range"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn delay_passes_duration_through_params() {
        let proc = CustomProcessor::builder(BackendParameters::new(2))
            .noise_model("delay", |params, _| {
                let t = params[0];
                Ok([("Z".to_string(), (1e3 * t).min(1.0))].into_iter().collect())
            })
            .time_model("delay", |params, _| Ok(params[0]))
            .build()
            .unwrap();
        let applied = proc.apply_instruction("delay", &[0], &[1e-4]).unwrap();
        assert_eq!(applied.duration, 1e-4);
        let chi = applied.quantum_errors.unwrap();
        assert!((chi.diag()[3] - 0.1).abs() < 1e-12);
    }
}
