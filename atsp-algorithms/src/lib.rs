use ahash::RandomState;
use rand::{rngs::SmallRng, SeedableRng};

pub fn seeded_hasher(seed: u64) -> RandomState {
    RandomState::with_seeds(
        seed,
        seed.rotate_left(16) ^ 0x9e37_79b9_7f4a_7c15,
        seed.rotate_left(32) ^ 0xbf58_476d_1ce4_e5b9,
        seed.rotate_left(48) ^ 0x94d0_49bb_1331_11eb,
    )
}
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, RandomState>;
pub(crate) type HashSet<T> = std::collections::HashSet<T, RandomState>;

/// Independent generator for one run of a solve.
pub(crate) fn run_rng(seed: u64, stream: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

pub mod bandit;
pub mod budget;
pub mod candidates;
pub mod checkpoint;
pub mod complementary;
pub mod confidence;
pub mod config;
pub mod construction;
pub mod decision;
pub mod local_search;
pub mod lower_bound;
pub mod multi_start;
pub mod problem;
pub mod quality;
pub mod report;
pub mod solver;
pub mod strategy;
pub mod super_solver;

pub use budget::{Budget, Clock, ManualClock, SystemClock};
pub use config::SolverConfig;
pub use decision::{Decision, Verdict};
pub use problem::Problem;
pub use quality::Quality;
pub use report::{RunReport, SolveReport};
pub use solver::SiNoSolver;
pub use strategy::{Strategy, StrategyKind};

use atsp_challenges::{CostMatrix, Instance, SolverResult};

/// Solves a bare cost matrix with the decision engine.
pub fn solve(matrix: CostMatrix, config: &SolverConfig) -> SolverResult<SolveReport> {
    solve_instance(Instance::from_matrix(matrix), config)
}

/// Validates `rows` as a cost matrix, then solves it.
pub fn solve_rows(rows: Vec<Vec<f64>>, config: &SolverConfig) -> SolverResult<SolveReport> {
    solve(CostMatrix::new(rows)?, config)
}

pub fn solve_instance(instance: Instance, config: &SolverConfig) -> SolverResult<SolveReport> {
    SiNoSolver::new(config.clone())?.solve(instance)
}

pub fn solve_with_strategy(
    instance: Instance,
    config: &SolverConfig,
    kind: StrategyKind,
) -> SolverResult<SolveReport> {
    SiNoSolver::new(config.clone())?.solve_with_strategy(instance, kind)
}

/// Assignment-problem lower bound on the optimal tour cost.
pub fn estimate_lower_bound(matrix: &CostMatrix) -> f64 {
    lower_bound::assignment_bound(matrix)
}
