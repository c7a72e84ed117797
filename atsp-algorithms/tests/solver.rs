use atsp_algorithms::confidence::{analyze, ConfidenceScore, InstanceFeatures, Structure};
use atsp_algorithms::decision::{classify, decide};
use atsp_algorithms::{
    solve, solve_instance, solve_rows, solve_with_strategy, ManualClock, Problem, SiNoSolver,
    SolverConfig, StrategyKind, Verdict,
};
use atsp_challenges::{verify_route, CostMatrix, Instance, SolverError};
use std::sync::Arc;
use std::time::Instant;

fn frozen(config: SolverConfig) -> SiNoSolver {
    SiNoSolver::with_clock(config, Arc::new(ManualClock::new())).unwrap()
}

fn quick() -> SolverConfig {
    SolverConfig {
        time_budget: 0.5,
        ..SolverConfig::default()
    }
}

#[test]
fn test_returned_tours_are_permutations() {
    for (seed, n) in [(1, 3), (2, 4), (3, 7), (4, 25), (5, 60), (6, 130)] {
        let instance = Instance::generate_random_asymmetric(seed, n, 0.5).unwrap();
        let report = solve(instance.matrix.clone(), &quick()).unwrap();
        verify_route(&report.tour, n).unwrap();
        assert!((instance.matrix.route_cost(&report.tour) - report.cost).abs() < 1e-6);

        let geometric = Instance::generate_random_euclidean(seed, n).unwrap();
        let report = frozen(quick()).solve(geometric).unwrap();
        verify_route(&report.tour, n).unwrap();
    }
}

#[test]
fn test_triangle_costs_six() {
    let report = solve_rows(
        vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ],
        &quick(),
    )
    .unwrap();
    assert_eq!(report.cost, 6.0);
    assert_eq!(report.gap, Some(0.0));
}

#[test]
fn test_asymmetric_penalty_scenario() {
    let mut rows = vec![vec![5.0; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    rows[0][1] = 1.0;
    rows[1][0] = 100.0;
    let report = solve_rows(rows, &quick()).unwrap();
    assert_eq!(report.cost, 16.0);
    let tour = &report.tour;
    for k in 0..4 {
        assert!(!(tour[k] == 1 && tour[(k + 1) % 4] == 0));
    }
}

#[test]
fn test_circle_takes_the_fast_path() {
    let instance = Instance::generate_circle(50, 100.0).unwrap();
    let report = frozen(SolverConfig::default()).solve(instance).unwrap();

    let decision = report.decision.clone().unwrap();
    assert_eq!(decision.verdict, Verdict::No);
    assert_eq!(decision.fast_path, Some(Structure::Circle));
    assert!(report.confidence.as_ref().unwrap().value >= 0.95);
    assert!(report.gap.unwrap() < 1e-9);

    let tour = &report.tour;
    let step = (tour[1] + 50 - tour[0]) % 50;
    assert!(step == 1 || step == 49);
    for k in 0..50 {
        assert_eq!((tour[k] + step) % 50, tour[(k + 1) % 50]);
    }
}

#[test]
fn test_grid_takes_the_fast_path() {
    let instance = Instance::generate_grid(6, 5, 1.0).unwrap();
    let report = frozen(SolverConfig::default()).solve(instance).unwrap();
    assert_eq!(report.decision.unwrap().fast_path, Some(Structure::Grid));
    assert!((report.cost - 30.0).abs() < 1e-9);
}

#[test]
fn test_fast_path_can_be_disabled() {
    let instance = Instance::generate_circle(20, 10.0).unwrap();
    let config = SolverConfig {
        enable_fast_path: false,
        ..quick()
    };
    let report = frozen(config).solve(instance).unwrap();
    let decision = report.decision.unwrap();
    assert_eq!(decision.fast_path, None);
    assert_eq!(decision.verdict, Verdict::Si);
    verify_route(&report.tour, 20).unwrap();
}

#[test]
fn test_fixed_seed_is_deterministic() {
    let config = SolverConfig {
        seed: 42,
        time_budget: 5.0,
        ..SolverConfig::default()
    };
    for instance in [
        Instance::generate_random_euclidean(13, 60).unwrap(),
        Instance::generate_random_asymmetric(13, 45, 0.8).unwrap(),
    ] {
        let a = frozen(config.clone()).solve(instance.clone()).unwrap();
        let b = frozen(config.clone()).solve(instance.clone()).unwrap();
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.cost, b.cost);
        assert_eq!(a.decision, b.decision);

        for kind in [StrategyKind::MultiStart, StrategyKind::Quantum] {
            let a = frozen(config.clone()).solve_with_strategy(instance.clone(), kind).unwrap();
            let b = frozen(config.clone()).solve_with_strategy(instance.clone(), kind).unwrap();
            assert_eq!(a.tour, b.tour);
            assert_eq!(a.runs, b.runs);
        }
    }
}

#[test]
fn test_tiny_budget_returns_quickly() {
    let instance = Instance::generate_random_euclidean(99, 200).unwrap();
    let config = SolverConfig {
        time_budget: 0.0,
        ..SolverConfig::default()
    };
    let started = Instant::now();
    let report = solve_instance(instance, &config).unwrap();
    verify_route(&report.tour, 200).unwrap();
    assert!(started.elapsed().as_secs_f64() < 1.0);

    let clock = Arc::new(ManualClock::new());
    let solver = SiNoSolver::with_clock(config, clock).unwrap();
    let report = solver
        .solve(Instance::generate_random_asymmetric(5, 150, 0.3).unwrap())
        .unwrap();
    verify_route(&report.tour, 150).unwrap();
}

#[test]
fn test_huge_budget_still_solves() {
    let config = SolverConfig {
        time_budget: 1e20,
        ..SolverConfig::default()
    };
    let report = solve_rows(
        vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ],
        &config,
    )
    .unwrap();
    assert_eq!(report.cost, 6.0);

    let instance = Instance::generate_random_euclidean(8, 20).unwrap();
    let report = solve_with_strategy(instance, &config, StrategyKind::MultiStart).unwrap();
    verify_route(&report.tour, 20).unwrap();
}

#[test]
fn test_every_strategy_solves() {
    let instance = Instance::generate_random_asymmetric(31, 35, 0.4).unwrap();
    for kind in StrategyKind::ALL {
        let report = solve_with_strategy(instance.clone(), &quick(), kind).unwrap();
        verify_route(&report.tour, 35).unwrap();
        assert_eq!(report.strategy, Some(kind));
        assert!(report.decision.is_none());
        assert!(report.lower_bound.unwrap() <= report.cost + 1e-9);
    }
}

#[test]
fn test_two_nodes_short_circuit() {
    let report = solve_rows(vec![vec![0.0, 2.0], vec![3.0, 0.0]], &quick()).unwrap();
    assert_eq!(report.tour, vec![0, 1]);
    assert_eq!(report.cost, 5.0);
    assert_eq!(report.algorithm, "trivial");
}

#[test]
fn test_invalid_input_fails_before_solving() {
    assert!(matches!(
        solve_rows(vec![vec![0.0, 1.0], vec![1.0]], &quick()),
        Err(SolverError::InvalidMatrix { .. })
    ));
    assert!(matches!(
        solve_rows(vec![vec![0.0, -1.0], vec![1.0, 0.0]], &quick()),
        Err(SolverError::InvalidMatrix { .. })
    ));
    assert!(matches!(
        solve_rows(vec![vec![0.0, f64::NAN], vec![1.0, 0.0]], &quick()),
        Err(SolverError::InvalidMatrix { .. })
    ));
    assert!(matches!(
        solve_rows(vec![vec![0.0]], &quick()),
        Err(SolverError::InvalidMatrix { .. })
    ));

    let matrix = CostMatrix::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
    let inverted = SolverConfig {
        si_threshold: 0.1,
        no_threshold: 0.9,
        ..SolverConfig::default()
    };
    assert!(matches!(
        solve(matrix.clone(), &inverted),
        Err(SolverError::InvalidConfig { .. })
    ));
    let negative = SolverConfig {
        time_budget: -1.0,
        ..SolverConfig::default()
    };
    assert!(matches!(
        solve(matrix, &negative),
        Err(SolverError::InvalidConfig { .. })
    ));
}

#[test]
fn test_decision_boundaries_are_inclusive() {
    assert_eq!(classify(0.8, 0.8, 0.2).unwrap(), Verdict::Si);
    assert_eq!(classify(0.8 - 1e-9, 0.8, 0.2).unwrap(), Verdict::Sino);
    assert_eq!(classify(0.2, 0.8, 0.2).unwrap(), Verdict::No);
    assert_eq!(classify(0.2 + 1e-9, 0.8, 0.2).unwrap(), Verdict::Sino);
    assert_eq!(classify(0.5, 0.8, 0.2).unwrap(), Verdict::Sino);
    assert_eq!(classify(1.0, 0.8, 0.2).unwrap(), Verdict::Si);
    assert_eq!(classify(0.0, 0.8, 0.2).unwrap(), Verdict::No);
    assert_eq!(classify(0.5, 0.5, 0.5).unwrap(), Verdict::Si);
    assert!(matches!(
        classify(0.5, 0.2, 0.8),
        Err(SolverError::InvalidConfig { .. })
    ));
}

#[test]
fn test_decide_uses_configured_thresholds() {
    let score = |value: f64| ConfidenceScore {
        value,
        features: InstanceFeatures {
            num_nodes: 10,
            asymmetry_ratio: 0.0,
            cost_cv: 0.3,
            cost_skewness: 0.0,
            regularity: None,
        },
    };
    let config = SolverConfig {
        si_threshold: 0.6,
        no_threshold: 0.4,
        ..SolverConfig::default()
    };
    assert_eq!(decide(&score(0.6), &config).unwrap().verdict, Verdict::Si);
    assert_eq!(decide(&score(0.4), &config).unwrap().verdict, Verdict::No);
    let middle = decide(&score(0.5), &config).unwrap();
    assert_eq!(middle.verdict, Verdict::Sino);
    assert_eq!(middle.si_threshold, 0.6);
    assert_eq!(middle.fast_path, None);
}

#[test]
fn test_confidence_without_coordinates_is_mid_range() {
    let instance = Instance::generate_random_asymmetric(2, 80, 0.3).unwrap();
    let problem = Problem::new(instance, 10);
    let score = analyze(&problem);
    assert!(score.features.regularity.is_none());
    assert!(score.value > 0.2 && score.value < 0.8);
    assert!(score.structure().is_none());

    let small = Problem::new(Instance::generate_random_euclidean(2, 10).unwrap(), 10);
    let large = Problem::new(Instance::generate_random_euclidean(2, 400).unwrap(), 10);
    assert!(analyze(&small).value > analyze(&large).value);
}
