use crate::budget::Budget;
use crate::construction::Construction;
use crate::local_search::{iterated_local_search, random_restart, SearchParams};
use crate::multi_start::best_by_cost;
use crate::problem::Problem;
use crate::report::RunReport;
use crate::{run_rng, seeded_hasher, HashSet};
use atsp_challenges::canonical_route;
use logging_timer::time;
use rand::{rngs::SmallRng, Rng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// The three orthogonal biases of the complementary solver.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchBias {
    /// Every construction heuristic, each refined, best kept
    Diverse,
    /// One strong construction searched to convergence with many kicks
    Intensive,
    /// Random restarts with heavy perturbation
    Chaotic,
}

impl SearchBias {
    pub const ALL: [SearchBias; 3] = [
        SearchBias::Diverse,
        SearchBias::Intensive,
        SearchBias::Chaotic,
    ];
}

#[derive(Debug, Clone)]
pub struct ComplementaryResult {
    pub route: Vec<usize>,
    pub cost: f64,
    pub winner: SearchBias,
    /// Distinct tours, up to rotation, seen across all three runs
    pub unique_tours: usize,
    pub runs: Vec<RunReport>,
}

struct BiasOutcome {
    route: Vec<usize>,
    cost: f64,
    iterations: usize,
    observed: Vec<Vec<usize>>,
}

const CHAOTIC_MAX_RESTARTS: usize = 32;

/// Runs the three biased searches side by side, each on a third of the remaining
/// budget, and keeps the cheapest tour.
#[time]
pub fn complementary(problem: &Problem, budget: &Budget, seed: u64) -> ComplementaryResult {
    let slice = budget.share(1.0 / SearchBias::ALL.len() as f64);

    let outcomes: Vec<BiasOutcome> = SearchBias::ALL
        .par_iter()
        .enumerate()
        .map(|(index, &bias)| {
            let run_budget = budget.child(slice);
            let mut rng = run_rng(seed, 1000 + index as u64);
            match bias {
                SearchBias::Diverse => diverse(problem, &run_budget, &mut rng),
                SearchBias::Intensive => intensive(problem, &run_budget, &mut rng),
                SearchBias::Chaotic => chaotic(problem, &run_budget, &mut rng),
            }
        })
        .collect();

    let mut seen: HashSet<Vec<usize>> = HashSet::with_hasher(seeded_hasher(seed));
    let runs: Vec<RunReport> = outcomes
        .iter()
        .enumerate()
        .map(|(index, outcome)| {
            let mut own: HashSet<&[usize]> = HashSet::with_hasher(seeded_hasher(seed));
            own.extend(outcome.observed.iter().map(|t| t.as_slice()));
            seen.extend(outcome.observed.iter().cloned());
            RunReport {
                index,
                strategy: format!("{:?}", SearchBias::ALL[index]),
                cost: outcome.cost,
                unique_tours: own.len(),
                iterations: outcome.iterations,
            }
        })
        .collect();

    let (best, cost) = best_by_cost(outcomes.iter().map(|o| o.cost));
    log::debug!(
        "complementary: winner {:?} cost {:.4}, {} distinct tours",
        SearchBias::ALL[best],
        cost,
        seen.len()
    );
    ComplementaryResult {
        route: outcomes[best].route.clone(),
        cost,
        winner: SearchBias::ALL[best],
        unique_tours: seen.len(),
        runs,
    }
}

fn diverse(problem: &Problem, budget: &Budget, rng: &mut SmallRng) -> BiasOutcome {
    let n = problem.size();
    let params = SearchParams {
        max_kicks: SearchParams::full(n).max_kicks / 4,
        ..SearchParams::full(n)
    };
    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut observed = Vec::new();
    let mut iterations = 0;
    for (k, construction) in Construction::ALL.iter().enumerate() {
        let step = budget.slice(1.0 / (Construction::ALL.len() - k) as f64);
        let start = rng.gen_range(0..n);
        let initial = construction.build(problem, start);
        let outcome = iterated_local_search(problem, initial, &step, rng, &params);
        iterations += outcome.kicks;
        observed.push(canonical_route(&outcome.route));
        if best.as_ref().map_or(true, |(_, c)| outcome.cost < *c) {
            best = Some((outcome.route, outcome.cost));
        }
    }
    let (route, cost) = best.unwrap_or_else(|| {
        let route: Vec<usize> = (0..n).collect();
        let cost = problem.route_cost(&route);
        (route, cost)
    });
    BiasOutcome {
        route,
        cost,
        iterations,
        observed,
    }
}

fn intensive(problem: &Problem, budget: &Budget, rng: &mut SmallRng) -> BiasOutcome {
    let initial = Construction::Gravity.build(problem, 0);
    let outcome = iterated_local_search(
        problem,
        initial,
        budget,
        rng,
        &SearchParams::intensive(problem.size()),
    );
    BiasOutcome {
        observed: vec![canonical_route(&outcome.route)],
        route: outcome.route,
        cost: outcome.cost,
        iterations: outcome.kicks,
    }
}

fn chaotic(problem: &Problem, budget: &Budget, rng: &mut SmallRng) -> BiasOutcome {
    let n = problem.size();
    let params = SearchParams::chaotic(n);
    let mut best_route: Vec<usize> = (0..n).collect();
    let mut best_cost = f64::INFINITY;
    let mut observed = Vec::new();
    let mut iterations = 0;
    for _ in 0..CHAOTIC_MAX_RESTARTS {
        let step = budget.slice(0.25);
        let initial = random_restart(n, rng);
        let outcome = iterated_local_search(problem, initial, &step, rng, &params);
        iterations += outcome.kicks;
        observed.push(canonical_route(&outcome.route));
        if outcome.cost < best_cost {
            best_cost = outcome.cost;
            best_route = outcome.route;
        }
        if budget.is_expired() {
            break;
        }
    }
    BiasOutcome {
        route: best_route,
        cost: best_cost,
        iterations,
        observed,
    }
}
