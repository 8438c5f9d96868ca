//! Channel composition, tensor products, and the saturating flip formula.
//!
//! # Sequential composition
//!
//! Pauli errors combine through the group multiplication table: X then Y is
//! equivalent to Z, X then Z to Y, and every operator is self-inverse. For
//! two single-qubit channels a, b applied in sequence this gives
//!
//!   c[P] = a[I]·b[P] + b[I]·a[P] + a[P⁺¹]·b[P⁺²] + a[P⁺²]·b[P⁺¹]
//!
//! with P⁺ᵏ the cyclic roll of (X, Y, Z) and `a[I] = 1 − Σa`.
//!
//! # Saturating flips
//!
//! A flip channel driven at constant rates rX, rY, rZ satisfies a system of
//! first-order linear ODEs in pX(t), pY(t), pZ(t) (again because X then Y is
//! Z, etc). Solving it:
//!
//!   pX(t) = 0.25·(1 + e^(−2(rY+rZ)t) − e^(−2(rX+rZ)t) − e^(−2(rX+rY)t))
//!
//! and cyclic for pY, pZ. A single large rate drives its probability to 1/2,
//! not 1; simultaneous large rates share the saturation.

use crate::chi::ChiDiagonal;
use crate::error::{ChannelError, ChannelResult};
use crate::pauli::{PauliErrorMap, validated_width};

/// The chi diagonal of a single-qubit map, with the empty map read as the
/// identity channel.
fn chi4(errors: &PauliErrorMap) -> ChannelResult<[f64; 4]> {
    if errors.is_empty() {
        return Ok([1.0, 0.0, 0.0, 0.0]);
    }
    let width = validated_width(errors)?;
    if width != 1 {
        let label = errors.keys().next().expect("non-empty map").clone();
        return Err(ChannelError::NotSingleQubit { label });
    }
    let chi = ChiDiagonal::from_pauli_errors(errors)?;
    let d = chi.diag();
    Ok([d[0], d[1], d[2], d[3]])
}

/// Compose two single-qubit Pauli channels applied in sequence (a then b).
///
/// The empty map is the identity channel, so `compose_1q(&{}, &b) == b` and
/// `compose_1q(&a, &{}) == a`. The output always carries explicit X, Y, Z
/// entries (possibly zero).
pub fn compose_1q(a: &PauliErrorMap, b: &PauliErrorMap) -> ChannelResult<PauliErrorMap> {
    let a = chi4(a)?;
    let b = chi4(b)?;
    let mut out = PauliErrorMap::new();
    for (i, label) in ["X", "Y", "Z"].into_iter().enumerate() {
        let p1 = (i + 1) % 3;
        let p2 = (i + 2) % 3;
        let prob = a[1 + i] * b[0]
            + b[1 + i] * a[0]
            + a[1 + p1] * b[1 + p2]
            + a[1 + p2] * b[1 + p1];
        out.insert(label.to_string(), prob);
    }
    Ok(out)
}

/// Tensor two independent Pauli channels acting on disjoint qubit sets.
///
/// `a` covers the low qubits (rightmost label characters), `b` the high
/// qubits: tensoring `{X}` with `{YZ}` yields entries on `IIX`, `YZI`, and
/// `YZX`. Each input's implicit identity term is expanded against the
/// other's explicit terms, then the explicit×explicit cross product is
/// added. Both inputs must be non-empty (an empty map has no width).
pub fn tensor(a: &PauliErrorMap, b: &PauliErrorMap) -> ChannelResult<PauliErrorMap> {
    let width_a = validated_width(a)?;
    let width_b = validated_width(b)?;
    let id_a: f64 = 1.0 - a.values().sum::<f64>();
    let id_b: f64 = 1.0 - b.values().sum::<f64>();
    let id_str_a = "I".repeat(width_a);
    let id_str_b = "I".repeat(width_b);
    let mut out = PauliErrorMap::new();
    for (b_label, &b_prob) in b {
        out.insert(format!("{b_label}{id_str_a}"), id_a * b_prob);
    }
    for (a_label, &a_prob) in a {
        out.insert(format!("{id_str_b}{a_label}"), id_b * a_prob);
    }
    for (a_label, &a_prob) in a {
        for (b_label, &b_prob) in b {
            out.insert(format!("{b_label}{a_label}"), a_prob * b_prob);
        }
    }
    Ok(out)
}

/// Bounded flip probabilities from linearized rates `[rX, rY, rZ]` (each a
/// rate·time product).
///
/// Exactly 0 at rate 0; saturates at 1/2 as a single rate grows without
/// bound, at 1/4 when all three do. Output is clipped to [0, 1].
pub fn flip_probabilities(rates: [f64; 3]) -> [f64; 3] {
    let exps = [
        (-2.0 * (rates[1] + rates[2])).exp(),
        (-2.0 * (rates[2] + rates[0])).exp(),
        (-2.0 * (rates[0] + rates[1])).exp(),
    ];
    let mut out = [0.0; 3];
    for i in 0..3 {
        let p = 0.25 * (1.0 + exps[i] - exps[(i + 1) % 3] - exps[(i + 2) % 3]);
        out[i] = p.clamp(0.0, 1.0);
    }
    out
}

/// Batched [`flip_probabilities`]: one row of rates per independent sample.
pub fn flip_probabilities_batch(rates: &[[f64; 3]]) -> Vec<[f64; 3]> {
    rates.iter().map(|&row| flip_probabilities(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> PauliErrorMap {
        entries
            .iter()
            .map(|(label, prob)| (label.to_string(), *prob))
            .collect()
    }

    #[test]
    fn compose_x_then_z() {
        let computed = compose_1q(&map(&[("X", 0.2)]), &map(&[("Z", 0.6)])).unwrap();
        assert!((computed["X"] - 0.2 * (1.0 - 0.6)).abs() < 1e-12);
        assert!((computed["Y"] - 0.2 * 0.6).abs() < 1e-12);
        assert!((computed["Z"] - 0.6 * (1.0 - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn compose_empty_is_identity() {
        let b = map(&[("X", 0.1), ("Y", 0.05), ("Z", 0.3)]);
        let left = compose_1q(&PauliErrorMap::new(), &b).unwrap();
        let right = compose_1q(&b, &PauliErrorMap::new()).unwrap();
        for label in ["X", "Y", "Z"] {
            assert!((left[label] - b[label]).abs() < 1e-12);
            assert!((right[label] - b[label]).abs() < 1e-12);
        }
    }

    #[test]
    fn compose_rejects_multi_qubit_maps() {
        assert!(matches!(
            compose_1q(&map(&[("XZ", 0.1)]), &PauliErrorMap::new()),
            Err(ChannelError::NotSingleQubit { .. })
        ));
    }

    #[test]
    fn compose_is_associative() {
        let a = map(&[("X", 0.1)]);
        let b = map(&[("Y", 0.2)]);
        let c = map(&[("Z", 0.3)]);
        let left = compose_1q(&compose_1q(&a, &b).unwrap(), &c).unwrap();
        let right = compose_1q(&a, &compose_1q(&b, &c).unwrap()).unwrap();
        for label in ["X", "Y", "Z"] {
            assert!((left[label] - right[label]).abs() < 1e-12);
        }
    }

    #[test]
    fn tensor_expands_identities() {
        let computed = tensor(&map(&[("X", 0.2)]), &map(&[("YZ", 0.6)])).unwrap();
        assert_eq!(computed.len(), 3);
        assert!((computed["IIX"] - 0.2 * (1.0 - 0.6)).abs() < 1e-12);
        assert!((computed["YZX"] - 0.2 * 0.6).abs() < 1e-12);
        assert!((computed["YZI"] - (1.0 - 0.2) * 0.6).abs() < 1e-12);
    }

    #[test]
    fn tensor_label_widths_add() {
        let computed = tensor(&map(&[("XZ", 0.1)]), &map(&[("Y", 0.2)])).unwrap();
        for label in computed.keys() {
            assert_eq!(label.len(), 3);
        }
    }

    #[test]
    fn tensor_rejects_empty_inputs() {
        assert!(matches!(
            tensor(&PauliErrorMap::new(), &map(&[("X", 0.1)])),
            Err(ChannelError::EmptyErrorMap)
        ));
    }

    #[test]
    fn flip_single_large_rate_saturates_at_half() {
        for idx in 0..3 {
            let mut rates = [0.0; 3];
            rates[idx] = 1e10;
            let probs = flip_probabilities(rates);
            for (i, p) in probs.into_iter().enumerate() {
                if i == idx {
                    assert!((p - 0.5).abs() < 1e-12);
                } else {
                    assert_eq!(p, 0.0);
                }
            }
        }
    }

    #[test]
    fn flip_zero_rates_give_exact_zero() {
        assert_eq!(flip_probabilities([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn flip_all_large_rates_saturate_at_quarter() {
        let probs = flip_probabilities([1e10, 1e10, 1e10]);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn flip_small_rates_stay_linear() {
        let rates = [1e-12, 1e-13, 1e-14];
        let probs = flip_probabilities(rates);
        // Absolute tolerance: the four-term cancellation leaves rounding
        // noise of a few 1e-16 around values this small.
        for i in 0..3 {
            assert!((probs[i] - rates[i]).abs() < 1e-13);
        }
    }

    #[test]
    fn flip_batch_matches_rows() {
        let rows = [[1e10, 0.0, 0.0], [0.0, 1e10, 0.0]];
        let out = flip_probabilities_batch(&rows);
        assert!((out[0][0] - 0.5).abs() < 1e-12);
        assert_eq!(out[0][1], 0.0);
        assert!((out[1][1] - 0.5).abs() < 1e-12);
        assert_eq!(out[1][0], 0.0);
    }

    #[test]
    fn flip_monotone_approach_to_half() {
        let mut last = 0.0;
        for exp in 0..12 {
            let p = flip_probabilities([10f64.powi(exp - 6), 0.0, 0.0])[0];
            assert!(p >= last);
            assert!(p <= 0.5);
            last = p;
        }
    }
}
