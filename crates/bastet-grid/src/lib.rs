//! Bastet grid-interpolated processor models
//!
//! Some processor behavior is not available in closed form: it comes out of
//! physical simulations run over a grid of parameter values. This crate
//! loads such grids from their serialized JSON representation and builds
//! continuous estimators over them, usable at parameter values that were
//! never simulated.
//!
//! Per instruction, two independent interpolators are built, one for the
//! duration and one for the Pauli-probability vector:
//!
//! - zero free parameters → a constant,
//! - one free parameter → 1-D piecewise-linear interpolation,
//! - two free parameters → Delaunay-triangulated linear interpolation.
//!
//! Parameters are standardized (mean 0, deviation 1) before interpolating so
//! that photon numbers and nanosecond durations do not skew each other.
//! Queries outside the convex hull of the sampled points are never
//! extrapolated: they fail with a dedicated error carrying the offending
//! point.
//!
//! [`InterpolatedProcessor`] serves the grids as-is;
//! [`CatInterpolatedProcessor`] additionally injects the photon number
//! `n̄ = |α|²` into every lookup so callers only supply the remaining
//! parameters.

pub mod error;
pub mod interpolate;
pub mod model;
pub mod processor;

pub use error::{GridError, GridResult};
pub use interpolate::{Field, Interpolator};
pub use model::{
    InterpolationPoint, ProcessorMetadata, SerializedInstruction, SerializedProcessor,
};
pub use processor::{CatInterpolatedProcessor, InterpolatedProcessor};
