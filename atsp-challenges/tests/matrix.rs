use atsp_challenges::{CostMatrix, SolverError};

fn triangle() -> CostMatrix {
    CostMatrix::new(vec![
        vec![0.0, 1.0, 2.0],
        vec![1.0, 0.0, 3.0],
        vec![2.0, 3.0, 0.0],
    ])
    .unwrap()
}

#[test]
fn test_cost_lookup() {
    let matrix = triangle();
    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.cost(1, 2), Ok(3.0));
    assert_eq!(matrix.cost(2, 0), Ok(2.0));
    assert_eq!(matrix.cost(0, 0), Ok(0.0));
}

#[test]
fn test_cost_out_of_range() {
    let matrix = triangle();
    assert_eq!(
        matrix.cost(3, 0),
        Err(SolverError::OutOfRange { index: 3, size: 3 })
    );
    assert_eq!(
        matrix.cost(0, 7),
        Err(SolverError::OutOfRange { index: 7, size: 3 })
    );
}

#[test]
fn test_rejects_malformed_matrices() {
    let not_square = CostMatrix::new(vec![vec![0.0, 1.0], vec![1.0]]);
    assert!(matches!(not_square, Err(SolverError::InvalidMatrix { .. })));

    let too_small = CostMatrix::new(vec![vec![0.0]]);
    assert!(matches!(too_small, Err(SolverError::InvalidMatrix { .. })));

    let negative = CostMatrix::new(vec![vec![0.0, -1.0], vec![1.0, 0.0]]);
    assert!(matches!(negative, Err(SolverError::InvalidMatrix { .. })));

    let nan = CostMatrix::new(vec![vec![0.0, f64::NAN], vec![1.0, 0.0]]);
    assert!(matches!(nan, Err(SolverError::InvalidMatrix { .. })));

    let inf = CostMatrix::new(vec![vec![0.0, 1.0], vec![f64::INFINITY, 0.0]]);
    assert!(matches!(inf, Err(SolverError::InvalidMatrix { .. })));
}

#[test]
fn test_diagonal_is_ignored() {
    let matrix = CostMatrix::new(vec![vec![5.0, 1.0], vec![2.0, 9.0]]).unwrap();
    assert_eq!(matrix.c(0, 0), 0.0);
    assert_eq!(matrix.c(1, 1), 0.0);
}

#[test]
fn test_asymmetry_detection() {
    assert!(!triangle().is_asymmetric());
    assert_eq!(triangle().asymmetry_ratio(), 0.0);

    let skewed = CostMatrix::new(vec![
        vec![0.0, 1.0, 2.0],
        vec![100.0, 0.0, 3.0],
        vec![2.0, 3.0, 0.0],
    ])
    .unwrap();
    assert!(skewed.is_asymmetric());
    assert!(skewed.asymmetry_ratio() > 0.3);

    let almost = CostMatrix::new(vec![vec![0.0, 1.0], vec![1.0 + 1e-12, 0.0]]).unwrap();
    assert!(!almost.is_asymmetric());
}

#[test]
fn test_route_cost_wraps_around() {
    let matrix = triangle();
    assert_eq!(matrix.route_cost(&[0, 1, 2]), 6.0);
    assert_eq!(matrix.route_cost(&[2, 1, 0]), 6.0);
}

#[test]
fn test_serde_validates() {
    let json = serde_json::to_string(&triangle()).unwrap();
    let back: CostMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, triangle());

    let bad: Result<CostMatrix, _> = serde_json::from_str("[[0.0, -2.0], [1.0, 0.0]]");
    assert!(bad.is_err());
}
