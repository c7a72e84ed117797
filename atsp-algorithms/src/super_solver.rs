use crate::budget::{scale, Budget};
use crate::config::SolverConfig;
use crate::construction::Construction;
use crate::local_search::{iterated_local_search, SearchParams};
use crate::multi_start::multi_start;
use crate::problem::Problem;
use crate::quality::Quality;
use crate::report::RunReport;
use crate::run_rng;
use logging_timer::time;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Share of the budget given to the fast phase.
const FAST_SHARE: f64 = 0.3;
/// Escalation is skipped when less than this much time is left.
const ESCALATION_FLOOR: Duration = Duration::from_secs(1);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuperPhase {
    AcceptedFast,
    Escalated,
}

#[derive(Debug, Clone)]
pub struct SuperResult {
    pub route: Vec<usize>,
    pub cost: f64,
    pub initial_cost: f64,
    pub lower_bound: f64,
    pub gap: f64,
    pub quality: Quality,
    pub phase: SuperPhase,
    pub phases: usize,
    pub escalation_improved: bool,
    pub runs: Vec<RunReport>,
}

/// Fast solve, gap gate against the assignment bound, then a multi-start ensemble
/// on the remaining budget when the fast gap lies above the Good edge.
#[time]
pub fn super_solve(problem: &Problem, budget: &Budget, config: &SolverConfig) -> SuperResult {
    let n = problem.size();
    let lower_bound = problem.lower_bound();

    let fast_budget = budget.slice(FAST_SHARE);
    let mut rng = run_rng(config.seed, 0);
    let initial = if fast_budget.is_expired() {
        Construction::NearestNeighbor.build(problem, 0)
    } else {
        let (construction, route) = Construction::best(problem, 0);
        log::debug!("super solver fast phase starts from {:?}", construction);
        route
    };
    let params = SearchParams::full(n);
    let fast = iterated_local_search(problem, initial, &fast_budget, &mut rng, &params);
    let gap = problem.gap(fast.cost);
    let quality = Quality::classify(gap, n);
    log::debug!(
        "super solver fast phase: cost {:.4}, bound {:.4}, gap {:.2}%, {:?}",
        fast.cost,
        lower_bound,
        gap * 100.0,
        quality
    );

    let floor = ESCALATION_FLOOR.min(scale(budget.limit(), 0.1));
    if Quality::accepts_fast(gap, n) || budget.remaining() < floor || budget.is_expired() {
        return SuperResult {
            route: fast.route,
            cost: fast.cost,
            initial_cost: fast.cost,
            lower_bound,
            gap,
            quality,
            phase: SuperPhase::AcceptedFast,
            phases: 2,
            escalation_improved: false,
            runs: Vec::new(),
        };
    }

    let ensemble = multi_start(
        problem,
        config.ensemble_size_for(n),
        budget,
        config.seed.wrapping_add(1),
    );
    let escalation_improved = ensemble.cost < fast.cost;
    let (route, cost) = if escalation_improved {
        (ensemble.route, ensemble.cost)
    } else {
        (fast.route, fast.cost)
    };
    let gap = problem.gap(cost);
    log::debug!(
        "super solver escalated: {:.4} -> {:.4} (gap {:.2}%)",
        fast.cost,
        cost,
        gap * 100.0
    );
    SuperResult {
        route,
        cost,
        initial_cost: fast.cost,
        lower_bound,
        gap,
        quality: Quality::classify(gap, n),
        phase: SuperPhase::Escalated,
        phases: 3,
        escalation_improved,
        runs: ensemble.runs,
    }
}
