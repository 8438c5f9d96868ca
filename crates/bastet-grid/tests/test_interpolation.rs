//! Tests for the interpolation engine over serialized fixtures.

use bastet_grid::{Field, GridError, Interpolator, SerializedInstruction, SerializedProcessor};

fn load_instruction(file: &str) -> SerializedInstruction {
    let path = format!("{}/tests/data/{file}", env!("CARGO_MANIFEST_DIR"));
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn load_processor(file: &str) -> SerializedProcessor {
    let path = format!("{}/tests/data/{file}", env!("CARGO_MANIFEST_DIR"));
    SerializedProcessor::from_path(path).unwrap()
}

#[test]
fn pauli_interpolation_1d() {
    let instr = load_instruction("1d_instruction.json");
    let interp = Interpolator::build(&instr, Field::Pauli).unwrap().unwrap();

    // One of the points in the simulated data.
    let at_sample = interp.query(&[4.0]).unwrap();
    let expected = [0.92, 0.05, 0.0, 0.03];
    for (got, want) in at_sample.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }

    // Point within the interval.
    let between = interp.query(&[5.0]).unwrap();
    let expected = [0.865, 0.075, 0.01, 0.05];
    for (got, want) in between.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12);
    }

    // Point out of the interval.
    assert!(matches!(
        interp.query(&[7.0]),
        Err(GridError::OutOfHull { .. })
    ));
}

#[test]
fn duration_interpolation_1d() {
    let instr = load_instruction("1d_instruction.json");
    let interp = Interpolator::build(&instr, Field::Duration)
        .unwrap()
        .unwrap();

    assert!((interp.query(&[4.0]).unwrap()[0] - 1e-4).abs() < 1e-16);
    assert!((interp.query(&[5.0]).unwrap()[0] - 5.5e-5).abs() < 1e-12);
    assert!(matches!(
        interp.query(&[7.0]),
        Err(GridError::OutOfHull { .. })
    ));
}

#[test]
fn pauli_interpolation_2d() {
    let instr = load_instruction("2d_instruction.json");
    let interp = Interpolator::build(&instr, Field::Pauli).unwrap().unwrap();

    // One query at a simulated point, one inside the convex hull.
    for query in [[6.0, 1.57], [5.0, 1.3]] {
        let probs = interp.query(&query).unwrap();
        assert_eq!(probs.len(), 4);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    // Out of the convex hull.
    let err = interp.query(&[42.0, 42.0]).unwrap_err();
    match err {
        GridError::OutOfHull { name, point } => {
            assert_eq!(name, "rz");
            assert_eq!(point, vec![42.0, 42.0]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duration_interpolation_2d() {
    let instr = load_instruction("2d_instruction.json");
    let interp = Interpolator::build(&instr, Field::Duration)
        .unwrap()
        .unwrap();

    for query in [[6.0, 1.57], [5.0, 1.3]] {
        let d = interp.query(&query).unwrap();
        assert_eq!(d.len(), 1);
        assert!(d[0] > 0.0);
    }
    // Exact at a sampled vertex.
    assert!((interp.query(&[6.0, 1.57]).unwrap()[0] - 2e-7).abs() < 1e-16);

    assert!(matches!(
        interp.query(&[42.0, 42.0]),
        Err(GridError::OutOfHull { .. })
    ));
}

#[test]
fn duplicate_instruction_pairs_are_rejected() {
    use bastet_grid::InterpolatedProcessor;
    let ser = load_processor("duplicate_instructions.json");
    let err = InterpolatedProcessor::new(&ser, 1e-9).unwrap_err();
    assert!(matches!(err, GridError::DuplicateInstruction { .. }));
}
