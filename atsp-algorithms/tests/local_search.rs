use atsp_algorithms::construction::Construction;
use atsp_algorithms::local_search::{
    double_bridge, iterated_local_search, random_restart, LocalSearch, SearchParams,
};
use atsp_algorithms::{Budget, ManualClock, Problem, SystemClock};
use atsp_challenges::{verify_route, CostMatrix, Instance};
use rand::{rngs::SmallRng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

fn frozen_budget() -> Budget {
    Budget::new(Arc::new(ManualClock::new()), Duration::from_secs(60))
}

fn penalty_matrix() -> CostMatrix {
    let mut rows = vec![vec![5.0; 4]; 4];
    for (i, row) in rows.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    rows[0][1] = 1.0;
    rows[1][0] = 100.0;
    CostMatrix::new(rows).unwrap()
}

#[test]
fn test_asymmetric_penalty_edge_is_avoided() {
    let problem = Problem::new(Instance::from_matrix(penalty_matrix()), 3);
    // worst possible start: the tour that pays 1 -> 0
    let mut ls = LocalSearch::new(&problem, vec![0, 2, 3, 1]);
    assert_eq!(ls.cost(), 115.0);
    ls.optimize(&frozen_budget(), &SearchParams::full(4));
    let route = ls.route().to_vec();
    verify_route(&route, 4).unwrap();
    assert_eq!(ls.cost(), 16.0);
    for k in 0..4 {
        assert!(!(route[k] == 1 && route[(k + 1) % 4] == 0));
    }
}

#[test]
fn test_local_search_never_worsens() {
    let instance = Instance::generate_random_asymmetric(21, 80, 0.6).unwrap();
    let problem = Problem::new(instance, 8);
    let budget = frozen_budget();
    for construction in Construction::ALL {
        let initial = construction.build(&problem, 0);
        let initial_cost = problem.route_cost(&initial);
        let mut ls = LocalSearch::new(&problem, initial);
        ls.optimize(&budget, &SearchParams::full(80));
        verify_route(ls.route(), 80).unwrap();
        assert!(ls.cost() <= initial_cost + 1e-9);
        assert!((ls.cost() - problem.route_cost(ls.route())).abs() < 1e-6);
    }
}

#[test]
fn test_two_opt_uncrosses_a_square() {
    let instance =
        Instance::from_points(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (5.0, -1.0)])
            .unwrap();
    let problem = Problem::new(instance, 4);
    let mut ls = LocalSearch::new(&problem, vec![0, 2, 1, 4, 3]);
    let before = ls.cost();
    ls.optimize(&frozen_budget(), &SearchParams::light());
    assert!(ls.cost() < before);
    assert!(ls.nb_moves > 0);
}

#[test]
fn test_iterated_local_search_keeps_best() {
    let problem = Problem::new(Instance::generate_random_euclidean(4, 60).unwrap(), 10);
    let mut rng = SmallRng::seed_from_u64(0);
    let initial = random_restart(60, &mut rng);
    let initial_cost = problem.route_cost(&initial);
    let outcome = iterated_local_search(
        &problem,
        initial,
        &frozen_budget(),
        &mut rng,
        &SearchParams::full(60),
    );
    verify_route(&outcome.route, 60).unwrap();
    assert!(outcome.cost < initial_cost);
    assert!((outcome.cost - problem.route_cost(&outcome.route)).abs() < 1e-6);
    assert!(outcome.kicks <= SearchParams::full(60).max_kicks);
}

#[test]
fn test_expired_budget_still_returns_a_tour() {
    let problem = Problem::new(Instance::generate_random_euclidean(8, 200).unwrap(), 10);
    let budget = Budget::new(Arc::new(SystemClock::new()), Duration::ZERO);
    assert!(budget.is_expired());
    let mut rng = SmallRng::seed_from_u64(1);
    let initial = Construction::NearestNeighbor.build(&problem, 0);
    let params = SearchParams::full(200);
    let outcome = iterated_local_search(&problem, initial, &budget, &mut rng, &params);
    verify_route(&outcome.route, 200).unwrap();
    assert_eq!(outcome.kicks, 0);
    assert!(outcome.passes <= 1);
}

#[test]
fn test_double_bridge_is_a_permutation() {
    let mut rng = SmallRng::seed_from_u64(9);
    let route: Vec<usize> = (0..30).collect();
    for _ in 0..50 {
        let kicked = double_bridge(&route, &mut rng);
        verify_route(&kicked, 30).unwrap();
        assert_ne!(kicked, route);
        assert_eq!(kicked[0], 0);
    }
    let short = vec![2, 0, 1, 3];
    assert_eq!(double_bridge(&short, &mut rng), short);
}
