//! Bastet processor descriptions
//!
//! This crate defines the gate-level contract of a quantum processor (which
//! instructions it supports, how long each takes, and what quantum noise it
//! introduces) together with three concrete families of cat-qubit
//! processors:
//!
//! - [`PhysicalCatProcessor`] — directly addressed physical cat qubits,
//!   driven by closed-form formulas in the dissipation rates κ₁, κ₂ and the
//!   cat amplitude α.
//! - [`LogicalCatProcessor`] — repetition-code logical qubits built from
//!   physical cat qubits, composing per-cycle error channels.
//! - [`CustomProcessor`] — a pluggable description driven by user-supplied
//!   duration/noise functions, memoized and strictly validated.
//!
//! The contract is deliberately framework-agnostic: a compiler consumes
//! [`Processor::all_instructions`] once to build its gate-set view, then
//! calls [`Processor::apply_instruction`] per concrete gate occurrence
//! during noise-insertion and duration-lookup passes.
//!
//! # Example
//!
//! ```rust
//! use bastet_proc::{PhysicalCatConfig, PhysicalCatProcessor, Processor};
//!
//! let proc = PhysicalCatProcessor::new(PhysicalCatConfig::default()).unwrap();
//! let applied = proc.apply_instruction("x", &[0], &[]).unwrap();
//! assert!(applied.duration > 0.0);
//! assert!(applied.quantum_errors.is_some());
//! ```

pub mod cache;
pub mod coupling;
pub mod custom;
pub mod error;
pub mod instruction;
pub mod logical;
pub mod physical;
pub mod processor;

pub use cache::CacheStats;
pub use coupling::CouplingMap;
pub use custom::{BackendParameters, CustomProcessor, CustomProcessorBuilder, NoiseFn, TimeFn};
pub use error::{ProcError, ProcResult};
pub use instruction::{AppliedInstruction, InstructionSpec, ReadoutError};
pub use logical::{LogicalCatConfig, LogicalCatProcessor};
pub use physical::{PhysicalCatConfig, PhysicalCatProcessor};
pub use processor::{Processor, check_connectivity_convention};
