use crate::budget::Budget;
use crate::construction::Construction;
use crate::local_search::{iterated_local_search, SearchParams};
use crate::problem::Problem;
use crate::report::RunReport;
use crate::run_rng;
use logging_timer::time;
use rand::Rng;
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub route: Vec<usize>,
    pub cost: f64,
    pub best_run: usize,
    pub runs: Vec<RunReport>,
}

struct RunOutcome {
    route: Vec<usize>,
    report: RunReport,
}

/// Independent construction + iterated local search pipelines. Run `r` builds with
/// `Construction::ALL[r % ALL.len()]` from start node 0 (run 0) or a seeded random node.
#[time]
pub fn multi_start(problem: &Problem, runs: usize, budget: &Budget, seed: u64) -> EnsembleResult {
    let n = problem.size();
    let runs = runs.max(1);
    let waves = runs.div_ceil(rayon::current_num_threads().max(1));
    let slice = budget.share(1.0 / waves as f64);
    let params = SearchParams::full(n);

    let outcomes: Vec<RunOutcome> = (0..runs)
        .into_par_iter()
        .map(|index| {
            let run_budget = budget.child(slice);
            let mut rng = run_rng(seed, index as u64);
            let start = if index == 0 { 0 } else { rng.gen_range(0..n) };
            let construction = Construction::ALL[index % Construction::ALL.len()];
            let initial = construction.build(problem, start);
            let outcome = iterated_local_search(problem, initial, &run_budget, &mut rng, &params);
            RunOutcome {
                report: RunReport {
                    index,
                    strategy: format!("{:?}", construction),
                    cost: outcome.cost,
                    unique_tours: 1,
                    iterations: outcome.kicks,
                },
                route: outcome.route,
            }
        })
        .collect();

    let (best_run, _) = best_by_cost(outcomes.iter().map(|o| o.report.cost));
    log::debug!(
        "multi-start: {} runs, best run {} cost {:.4}",
        runs,
        best_run,
        outcomes[best_run].report.cost
    );
    let cost = outcomes[best_run].report.cost;
    let route = outcomes[best_run].route.clone();
    EnsembleResult {
        route,
        cost,
        best_run,
        runs: outcomes.into_iter().map(|o| o.report).collect(),
    }
}

/// Index and value of the minimum cost; the lowest index wins ties.
pub fn best_by_cost(costs: impl IntoIterator<Item = f64>) -> (usize, f64) {
    costs
        .into_iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(bi, bc), (i, c)| {
            if c < bc {
                (i, c)
            } else {
                (bi, bc)
            }
        })
}
