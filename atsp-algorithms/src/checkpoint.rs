use crate::budget::Budget;
use crate::config::SolverConfig;
use crate::construction::Construction;
use crate::local_search::{iterated_local_search, SearchParams};
use crate::problem::Problem;
use crate::run_rng;
use logging_timer::time;
use serde::{Deserialize, Serialize};

/// Relative improvement below which a round counts as a plateau.
pub const PLATEAU_TOLERANCE: f64 = 1e-4;
/// Relative improvement treated as fully uncertain when re-estimating confidence.
const IMPROVEMENT_SCALE: f64 = 0.01;

/// State after one exploration round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckpointRecord {
    pub round: usize,
    /// Seconds since exploration started
    pub elapsed: f64,
    /// Best cost so far
    pub cost: f64,
    pub confidence: f64,
    pub iterations: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    MaxCheckpoints,
    Plateau,
    Confident,
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct ExplorationResult {
    pub route: Vec<usize>,
    pub cost: f64,
    pub rounds: Vec<CheckpointRecord>,
    pub stop: StopReason,
}

/// Confidence moves halfway towards how settled the last round looked: no
/// improvement means fully settled, an improvement of `IMPROVEMENT_SCALE` or more means
/// not at all.
pub fn reestimate_confidence(previous: f64, relative_improvement: f64) -> f64 {
    let settled = 1.0 - (relative_improvement.max(0.0) / IMPROVEMENT_SCALE).min(1.0);
    (0.5 * previous + 0.5 * settled).clamp(0.0, 1.0)
}

/// Staged search for SINO decisions. Every round continues iterated local search
/// from the best tour on an equal share of what is left, then checks for a plateau
/// or for confidence reaching `si_threshold`.
#[time]
pub fn explore(
    problem: &Problem,
    budget: &Budget,
    config: &SolverConfig,
    initial_confidence: f64,
) -> ExplorationResult {
    let n = problem.size();
    let rounds_max = config.max_checkpoints;
    let full = SearchParams::full(n);
    let params = SearchParams {
        max_kicks: full.max_kicks / rounds_max + 1,
        ..full
    };

    let mut best_route = Construction::NearestNeighbor.build(problem, 0);
    let mut best_cost = problem.route_cost(&best_route);
    let mut confidence = initial_confidence;
    let mut rounds = Vec::with_capacity(rounds_max);
    let mut stop = StopReason::MaxCheckpoints;

    for round in 1..=rounds_max {
        let slice = budget.slice(1.0 / (rounds_max - round + 1) as f64);
        let mut rng = run_rng(config.seed, 2000 + round as u64);
        let outcome =
            iterated_local_search(problem, best_route.clone(), &slice, &mut rng, &params);

        let previous = best_cost;
        if round == 1 || outcome.cost < best_cost {
            best_cost = outcome.cost;
            best_route = outcome.route;
        }
        let improvement = if previous > 0.0 {
            (previous - best_cost) / previous
        } else {
            0.0
        };
        if round > 1 {
            confidence = reestimate_confidence(confidence, improvement);
        }
        rounds.push(CheckpointRecord {
            round,
            elapsed: budget.elapsed().as_secs_f64(),
            cost: best_cost,
            confidence,
            iterations: outcome.kicks,
        });

        if round == rounds_max {
            break;
        }
        if budget.is_expired() {
            stop = StopReason::BudgetExhausted;
            break;
        }
        if round > 1 && improvement < PLATEAU_TOLERANCE {
            stop = StopReason::Plateau;
            break;
        }
        if confidence >= config.si_threshold {
            stop = StopReason::Confident;
            break;
        }
    }

    log::debug!(
        "exploration stopped after {} rounds ({:?}), cost {:.4}",
        rounds.len(),
        stop,
        best_cost
    );
    ExplorationResult {
        route: best_route,
        cost: best_cost,
        rounds,
        stop,
    }
}
