use atsp_algorithms::bandit::{
    reward, ArmStats, AsymmetryClass, BanditConfig, BanditSnapshot, BanditState, BanditStore,
    BucketKey, JsonFileStore, MemoryStore, SizeClass, ThompsonSelector,
};
use atsp_algorithms::{ManualClock, SiNoSolver, SolverConfig, StrategyKind};
use atsp_challenges::{verify_route, Instance};
use std::sync::Arc;
use std::time::Duration;

fn key() -> BucketKey {
    BucketKey::new(SizeClass::Small, AsymmetryClass::NearlySymmetric)
}

fn quiet() -> BanditConfig {
    BanditConfig {
        duel_rate: 0.0,
        seed: 7,
        ..BanditConfig::default()
    }
}

#[test]
fn test_selection_converges_to_the_rewarded_arm() {
    let selector = ThompsonSelector::open(MemoryStore::new(), quiet());
    let mut picks = Vec::new();
    for _ in 0..400 {
        let arm = selector.select(key());
        let r = if arm == StrategyKind::Insertion { 0.9 } else { 0.2 };
        selector.record(key(), arm, r);
        picks.push(arm);
    }
    let count = |window: &[StrategyKind]| {
        window
            .iter()
            .filter(|&&a| a == StrategyKind::Insertion)
            .count()
    };
    let early = count(&picks[..100]);
    let late = count(&picks[300..]);
    assert!(late > early, "early {} late {}", early, late);
    assert!(late >= 60, "late {}", late);

    let summary = selector.summary();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].bucket, key());
    assert_eq!(summary[0].arms[0].0, StrategyKind::Insertion);
}

#[test]
fn test_arm_updates_are_fractional() {
    let mut stats = ArmStats::default();
    assert_eq!(stats.win_rate(), 0.5);
    stats.update(0.75);
    assert_eq!(stats.alpha, 1.75);
    assert_eq!(stats.beta, 1.25);
    assert_eq!(stats.pulls, 1);
    stats.update(7.0);
    assert_eq!(stats.alpha, 2.75);
    stats.update(f64::NAN);
    assert_eq!(stats.beta, 2.25);
    assert_eq!(stats.pulls, 3);
}

#[test]
fn test_reward_combines_gap_and_time() {
    let budget = Duration::from_secs(10);
    assert_eq!(reward(0.0, Duration::ZERO, budget), 1.0);
    assert!((reward(0.0, budget, budget) - 0.8).abs() < 1e-12);
    assert!((reward(0.25, Duration::ZERO, budget) - 0.5).abs() < 1e-12);
    assert_eq!(reward(0.6, Duration::ZERO, budget), 0.0);
    assert_eq!(reward(f64::INFINITY, Duration::ZERO, budget), 0.0);
    assert!((reward(0.0, Duration::from_secs(100), budget) - 0.8).abs() < 1e-12);
}

#[test]
fn test_bucket_keys() {
    assert_eq!(key().to_string(), "small_nearly_symmetric");
    let parsed: BucketKey = "large_highly_asymmetric".parse().unwrap();
    assert_eq!(
        parsed,
        BucketKey::new(SizeClass::Large, AsymmetryClass::HighlyAsymmetric)
    );
    assert!("huge_symmetric".parse::<BucketKey>().is_err());
    assert_eq!(SizeClass::of(49), SizeClass::Small);
    assert_eq!(SizeClass::of(50), SizeClass::Medium);
    assert_eq!(SizeClass::of(100), SizeClass::Large);
    assert_eq!(AsymmetryClass::of(0.05), AsymmetryClass::NearlySymmetric);
    assert_eq!(AsymmetryClass::of(0.1), AsymmetryClass::ModeratelyAsymmetric);
    assert_eq!(AsymmetryClass::of(0.3), AsymmetryClass::HighlyAsymmetric);

    let symmetric = Instance::generate_random_euclidean(1, 20).unwrap();
    assert_eq!(BucketKey::of(&symmetric.matrix), key());
}

#[test]
fn test_concurrent_updates_are_not_lost() {
    let state = BanditState::new();
    std::thread::scope(|s| {
        for t in 0..8 {
            let state = &state;
            s.spawn(move || {
                for _ in 0..100 {
                    let arm = StrategyKind::ALL[t % 2];
                    state.update(key(), arm, 1.0);
                }
            });
        }
    });
    let basic = state.arm(key(), StrategyKind::Basic);
    let insertion = state.arm(key(), StrategyKind::Insertion);
    assert_eq!(basic.pulls + insertion.pulls, 800);
    assert_eq!(basic.pulls, 400);
    assert_eq!(basic.alpha, 401.0);
}

#[test]
fn test_json_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("bandit.json");

    let selector = ThompsonSelector::open(JsonFileStore::new(&path), quiet());
    assert!(selector.summary().is_empty());
    selector.record(key(), StrategyKind::Super, 0.6);
    selector.record(key(), StrategyKind::Super, 0.4);
    selector.close().unwrap();
    assert!(path.exists());

    let reopened = ThompsonSelector::open(JsonFileStore::new(&path), quiet());
    let stats = reopened.state().arm(key(), StrategyKind::Super);
    assert_eq!(stats.pulls, 2);
    assert!((stats.alpha - 2.0).abs() < 1e-12);
    assert!((stats.beta - 2.0).abs() < 1e-12);

    let snapshot = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(snapshot, reopened.state().snapshot());
}

#[test]
fn test_corrupted_store_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bandit.json");
    std::fs::write(&path, "{ not json").unwrap();
    let selector = ThompsonSelector::open(JsonFileStore::new(&path), quiet());
    assert_eq!(selector.state().snapshot(), BanditSnapshot::default());
    assert_eq!(selector.state().arm(key(), StrategyKind::Basic), ArmStats::default());
}

#[test]
fn test_injected_state_is_shared() {
    let state = Arc::new(BanditState::new());
    let a = ThompsonSelector::with_state(state.clone(), MemoryStore::new(), quiet());
    let b = ThompsonSelector::with_state(state.clone(), MemoryStore::new(), quiet());
    a.record(key(), StrategyKind::Quantum, 1.0);
    b.record(key(), StrategyKind::Quantum, 0.0);
    assert_eq!(state.arm(key(), StrategyKind::Quantum).pulls, 2);

    let store = MemoryStore::new();
    let c = ThompsonSelector::with_state(state, store, quiet());
    c.flush().unwrap();
}

#[test]
fn test_bandit_solve_updates_its_bucket() {
    let solver = SiNoSolver::with_clock(
        SolverConfig {
            time_budget: 1.0,
            ..SolverConfig::default()
        },
        Arc::new(ManualClock::new()),
    )
    .unwrap();
    let config = BanditConfig {
        arms: vec![StrategyKind::Basic, StrategyKind::Insertion],
        ..quiet()
    };
    let selector = ThompsonSelector::open(MemoryStore::new(), config);
    let instance = Instance::generate_random_euclidean(3, 30).unwrap();
    for _ in 0..3 {
        let report = selector.solve(&solver, instance.clone()).unwrap();
        verify_route(&report.tour, 30).unwrap();
        assert_eq!(report.bandit_bucket, Some(key()));
        assert!(matches!(
            report.strategy,
            Some(StrategyKind::Basic | StrategyKind::Insertion)
        ));
    }
    let summary = selector.summary();
    let pulls: u64 = summary[0].arms.iter().map(|(_, s)| s.pulls).sum();
    assert_eq!(pulls, 3);
}

#[test]
fn test_duels_update_both_arms() {
    let solver =
        SiNoSolver::with_clock(SolverConfig::default(), Arc::new(ManualClock::new())).unwrap();
    let config = BanditConfig {
        duel_rate: 1.0,
        arms: vec![StrategyKind::Basic, StrategyKind::Insertion],
        seed: 1,
    };
    let selector = ThompsonSelector::open(MemoryStore::new(), config);
    let report = selector
        .solve(&solver, Instance::generate_random_euclidean(8, 25).unwrap())
        .unwrap();
    verify_route(&report.tour, 25).unwrap();
    let basic = selector.state().arm(key(), StrategyKind::Basic);
    let insertion = selector.state().arm(key(), StrategyKind::Insertion);
    assert_eq!(basic.pulls, 1);
    assert_eq!(insertion.pulls, 1);
}
