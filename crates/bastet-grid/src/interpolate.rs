//! Interpolators over serialized sample grids.
//!
//! One interpolator estimates one field (duration or Pauli vector) of one
//! instruction as a function of its free parameters. The form depends on
//! the parameter count:
//!
//! - 0 → constant (the single sample's value, input ignored),
//! - 1 → piecewise-linear over the sorted samples,
//! - 2 → barycentric-linear inside a Delaunay triangulation of the samples.
//!
//! Parameter columns are standardized (subtract mean, divide by standard
//! deviation, zero deviations replaced by 1) before triangulating or
//! querying: a photon number around 10 and a duration around 1e-7 would
//! otherwise skew the triangulation beyond use.
//!
//! Queries outside the sampled range or convex hull fail with
//! [`GridError::OutOfHull`]; so does any NaN leaking out of the arithmetic.

use delaunator::{Point, triangulate};
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::model::SerializedInstruction;

/// Barycentric coordinates this far below zero still count as inside, so
/// hull-boundary and vertex queries do not fall out of every triangle.
const HULL_EPS: f64 = 1e-9;

/// Which field of the sample points an interpolator estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The Pauli-probability vector (chi diagonal).
    Pauli,
    /// The instruction duration.
    Duration,
}

#[derive(Debug, Clone)]
enum Form {
    /// Zero free parameters: a fixed value vector.
    Constant(Vec<f64>),
    /// One free parameter: samples sorted by standardized coordinate.
    Linear1D {
        xs: Vec<f64>,
        values: Vec<Vec<f64>>,
    },
    /// Two free parameters: Delaunay triangulation in standardized space.
    Simplex2D {
        points: Vec<[f64; 2]>,
        values: Vec<Vec<f64>>,
        triangles: Vec<[usize; 3]>,
    },
}

/// A continuous estimator of one instruction field over its free parameters.
#[derive(Debug, Clone)]
pub struct Interpolator {
    instruction: String,
    n_params: usize,
    mean: Vec<f64>,
    std: Vec<f64>,
    form: Form,
}

impl Interpolator {
    /// Build an interpolator for one field of a serialized instruction.
    ///
    /// Returns `Ok(None)` when the field is absent from the samples (an
    /// instruction with no recorded noise data), which callers surface as a
    /// noiseless instruction.
    pub fn build(instruction: &SerializedInstruction, field: Field) -> GridResult<Option<Self>> {
        let name = &instruction.name;
        let n_params = instruction.free_params.len();
        if instruction.interpolation_points.is_empty() {
            return Err(GridError::NoPoints { name: name.clone() });
        }
        if n_params > 2 {
            return Err(GridError::UnsupportedDimension {
                name: name.clone(),
                n_params,
            });
        }

        if n_params == 0 {
            let point = &instruction.interpolation_points[0];
            let constant = match field {
                Field::Duration => vec![point.duration],
                Field::Pauli => match &point.pauli_probabilities {
                    Some(probs) => probs.clone(),
                    None => return Ok(None),
                },
            };
            return Ok(Some(Self {
                instruction: name.clone(),
                n_params,
                mean: vec![],
                std: vec![],
                form: Form::Constant(constant),
            }));
        }

        // Sample matrix: one row per point carrying a value for the field.
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut values: Vec<Vec<f64>> = Vec::new();
        for point in &instruction.interpolation_points {
            let value = match field {
                Field::Duration => vec![point.duration],
                Field::Pauli => match &point.pauli_probabilities {
                    Some(probs) => probs.clone(),
                    None => continue,
                },
            };
            let mut row = Vec::with_capacity(n_params);
            for param in &instruction.free_params {
                let v = point.params.get(param).copied().ok_or_else(|| {
                    GridError::MissingParamValue {
                        name: name.clone(),
                        param: param.clone(),
                    }
                })?;
                row.push(v);
            }
            rows.push(row);
            values.push(value);
        }
        if rows.is_empty() {
            return Ok(None);
        }
        let value_len = values[0].len();
        if values.iter().any(|v| v.len() != value_len) {
            let mut lengths: Vec<usize> = values.iter().map(Vec::len).collect();
            lengths.sort_unstable();
            lengths.dedup();
            return Err(GridError::RaggedSamples {
                name: name.clone(),
                lengths,
            });
        }
        let needed = n_params + 1;
        if rows.len() < needed {
            return Err(GridError::TooFewPoints {
                name: name.clone(),
                needed,
                got: rows.len(),
                n_params,
            });
        }

        let params = Array2::from_shape_fn((rows.len(), n_params), |(i, j)| rows[i][j]);
        let mean: Array1<f64> = params
            .mean_axis(Axis(0))
            .expect("sample matrix is non-empty");
        let mut std: Array1<f64> = params.std_axis(Axis(0), 0.0);
        std.mapv_inplace(|s| if s == 0.0 { 1.0 } else { s });
        let rescaled = (&params - &mean) / &std;

        let form = if n_params == 1 {
            let mut indexed: Vec<(f64, usize)> = rescaled
                .column(0)
                .iter()
                .copied()
                .enumerate()
                .map(|(i, x)| (x, i))
                .collect();
            indexed.sort_by(|a, b| a.0.total_cmp(&b.0));
            Form::Linear1D {
                xs: indexed.iter().map(|&(x, _)| x).collect(),
                values: indexed.iter().map(|&(_, i)| values[i].clone()).collect(),
            }
        } else {
            let sites: Vec<Point> = rescaled
                .rows()
                .into_iter()
                .map(|row| Point {
                    x: row[0],
                    y: row[1],
                })
                .collect();
            let triangulation = triangulate(&sites);
            let triangles: Vec<[usize; 3]> = triangulation
                .triangles
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect();
            debug!(
                instruction = %name,
                n_points = sites.len(),
                n_triangles = triangles.len(),
                "triangulated sample grid"
            );
            Form::Simplex2D {
                points: rescaled
                    .rows()
                    .into_iter()
                    .map(|row| [row[0], row[1]])
                    .collect(),
                values,
                triangles,
            }
        };

        Ok(Some(Self {
            instruction: name.clone(),
            n_params,
            mean: mean.to_vec(),
            std: std.to_vec(),
            form,
        }))
    }

    /// Number of free parameters a query must supply.
    pub fn n_params(&self) -> usize {
        self.n_params
    }

    /// Estimate the field at a parameter vector.
    pub fn query(&self, params: &[f64]) -> GridResult<Vec<f64>> {
        if let Form::Constant(value) = &self.form {
            return Ok(value.clone());
        }
        if params.len() != self.n_params {
            return Err(GridError::WrongArity {
                name: self.instruction.clone(),
                expected: self.n_params,
                got: params.to_vec(),
            });
        }
        let scaled: Vec<f64> = params
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(&p, (&m, &s))| (p - m) / s)
            .collect();
        let out = match &self.form {
            Form::Constant(_) => unreachable!("handled above"),
            Form::Linear1D { xs, values } => self.query_1d(xs, values, scaled[0], params)?,
            Form::Simplex2D {
                points,
                values,
                triangles,
            } => self.query_2d(points, values, triangles, [scaled[0], scaled[1]], params)?,
        };
        if out.iter().any(|v| v.is_nan()) {
            return Err(self.out_of_hull(params));
        }
        Ok(out)
    }

    fn out_of_hull(&self, params: &[f64]) -> GridError {
        GridError::OutOfHull {
            name: self.instruction.clone(),
            point: params.to_vec(),
        }
    }

    fn query_1d(
        &self,
        xs: &[f64],
        values: &[Vec<f64>],
        x: f64,
        raw: &[f64],
    ) -> GridResult<Vec<f64>> {
        let last = xs.len() - 1;
        if x < xs[0] || x > xs[last] || x.is_nan() {
            return Err(self.out_of_hull(raw));
        }
        // Right-most segment containing x.
        let hi = xs.partition_point(|&v| v < x).clamp(1, last);
        let lo = hi - 1;
        let span = xs[hi] - xs[lo];
        let t = if span == 0.0 { 0.0 } else { (x - xs[lo]) / span };
        Ok(values[lo]
            .iter()
            .zip(&values[hi])
            .map(|(&a, &b)| a + t * (b - a))
            .collect())
    }

    fn query_2d(
        &self,
        points: &[[f64; 2]],
        values: &[Vec<f64>],
        triangles: &[[usize; 3]],
        p: [f64; 2],
        raw: &[f64],
    ) -> GridResult<Vec<f64>> {
        for &[ia, ib, ic] in triangles {
            let a = points[ia];
            let b = points[ib];
            let c = points[ic];
            let denom = (b[1] - c[1]) * (a[0] - c[0]) + (c[0] - b[0]) * (a[1] - c[1]);
            if denom == 0.0 {
                continue;
            }
            let l1 = ((b[1] - c[1]) * (p[0] - c[0]) + (c[0] - b[0]) * (p[1] - c[1])) / denom;
            let l2 = ((c[1] - a[1]) * (p[0] - c[0]) + (a[0] - c[0]) * (p[1] - c[1])) / denom;
            let l3 = 1.0 - l1 - l2;
            if l1 >= -HULL_EPS && l2 >= -HULL_EPS && l3 >= -HULL_EPS {
                let width = values[ia].len();
                let mut out = vec![0.0; width];
                for k in 0..width {
                    out[k] = l1 * values[ia][k] + l2 * values[ib][k] + l3 * values[ic][k];
                }
                return Ok(out);
            }
        }
        Err(self.out_of_hull(raw))
    }
}
