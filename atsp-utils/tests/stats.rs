use atsp_utils::{coefficient_of_variation, mean, median, population_std, skewness};

#[test]
fn test_mean_and_std() {
    assert_eq!(mean(&[]), 0.0);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    assert!((population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.0).abs() < 1e-12);
    assert_eq!(population_std(&[3.0]), 0.0);
}

#[test]
fn test_coefficient_of_variation() {
    assert_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]), 0.0);
    assert_eq!(coefficient_of_variation(&[0.0, 0.0]), 0.0);
    let cv = coefficient_of_variation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert!((cv - 0.4).abs() < 1e-12);
}

#[test]
fn test_skewness_sign() {
    assert_eq!(skewness(&[1.0, 1.0, 1.0]), 0.0);
    assert!(skewness(&[1.0, 1.0, 1.0, 1.0, 10.0]) > 0.0);
    assert!(skewness(&[-10.0, 1.0, 1.0, 1.0, 1.0]) < 0.0);
    assert!(skewness(&[1.0, 2.0, 3.0]).abs() < 1e-12);
}

#[test]
fn test_median() {
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
}
