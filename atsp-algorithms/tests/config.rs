use atsp_algorithms::config::default_ensemble_size;
use atsp_algorithms::{Budget, ManualClock, SolverConfig};
use atsp_challenges::SolverError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_initialize_overlays_defaults() {
    let config = SolverConfig::initialize(&None).unwrap();
    assert_eq!(config, SolverConfig::default());

    let hyperparameters = json!({
        "si_threshold": 0.9,
        "ensemble_size": 6,
        "enable_fast_path": false
    });
    let config = SolverConfig::initialize(&hyperparameters.as_object().cloned()).unwrap();
    assert_eq!(config.si_threshold, 0.9);
    assert_eq!(config.no_threshold, 0.2);
    assert_eq!(config.ensemble_size, Some(6));
    assert!(!config.enable_fast_path);
    assert_eq!(config.ensemble_size_for(1000), 6);
}

#[test]
fn test_initialize_rejects_bad_parameters() {
    let unknown = json!({ "temperature": 1.0 });
    assert!(matches!(
        SolverConfig::initialize(&unknown.as_object().cloned()),
        Err(SolverError::InvalidConfig { .. })
    ));
    let mistyped = json!({ "max_checkpoints": "many" });
    assert!(matches!(
        SolverConfig::initialize(&mistyped.as_object().cloned()),
        Err(SolverError::InvalidConfig { .. })
    ));
    let inverted = json!({ "si_threshold": 0.1, "no_threshold": 0.3 });
    assert!(matches!(
        SolverConfig::initialize(&inverted.as_object().cloned()),
        Err(SolverError::InvalidConfig { .. })
    ));
}

#[test]
fn test_validate_limits() {
    let invalid = [
        SolverConfig {
            si_threshold: 1.5,
            ..SolverConfig::default()
        },
        SolverConfig {
            no_threshold: -0.1,
            ..SolverConfig::default()
        },
        SolverConfig {
            time_budget: f64::INFINITY,
            ..SolverConfig::default()
        },
        SolverConfig {
            max_checkpoints: 0,
            ..SolverConfig::default()
        },
        SolverConfig {
            candidate_list_size: 0,
            ..SolverConfig::default()
        },
        SolverConfig {
            ensemble_size: Some(0),
            ..SolverConfig::default()
        },
    ];
    for config in invalid {
        assert!(config.validate().is_err(), "{:?}", config);
    }
    let equal = SolverConfig {
        si_threshold: 0.5,
        no_threshold: 0.5,
        ..SolverConfig::default()
    };
    assert!(equal.validate().is_ok());
}

#[test]
fn test_ensemble_size_grows_with_instance() {
    assert_eq!(default_ensemble_size(10), 1);
    assert_eq!(default_ensemble_size(20), 4);
    assert_eq!(default_ensemble_size(499), 8);
    assert_eq!(default_ensemble_size(5000), 12);
    assert_eq!(SolverConfig::default().ensemble_size_for(50), 4);
}

#[test]
fn test_budget_children_never_outlive_parent() {
    let clock = Arc::new(ManualClock::new());
    let budget = Budget::new(clock.clone(), Duration::from_secs(10));
    let child = budget.child(Duration::from_secs(60));
    assert_eq!(child.limit(), Duration::from_secs(10));

    clock.advance(Duration::from_secs(4));
    let half = budget.slice(0.5);
    assert_eq!(half.limit(), Duration::from_secs(3));
    assert_eq!(budget.remaining(), Duration::from_secs(6));
    assert_eq!(budget.elapsed(), Duration::from_secs(4));
    assert!(!budget.is_expired());

    clock.advance(Duration::from_secs(6));
    assert!(budget.is_expired());
    assert!(half.is_expired());
    assert_eq!(budget.remaining(), Duration::ZERO);
}

#[test]
fn test_huge_budget_saturates() {
    let config = SolverConfig {
        time_budget: 1e20,
        ..SolverConfig::default()
    };
    assert!(config.validate().is_ok());

    let clock = Arc::new(ManualClock::new());
    let budget = Budget::from_secs(clock.clone(), 1e20);
    assert_eq!(budget.limit(), Duration::MAX);
    assert_eq!(budget.share(1.0), Duration::MAX);
    assert!(budget.slice(0.5).limit() > Duration::from_secs(1 << 40));
    assert_eq!(budget.child(Duration::from_secs(5)).limit(), Duration::from_secs(5));

    clock.advance(Duration::from_secs(3600));
    assert!(!budget.is_expired());
    assert_eq!(Budget::from_secs(clock, f64::MAX).limit(), Duration::MAX);
}
