use crate::budget::Budget;
use crate::complementary::complementary;
use crate::config::SolverConfig;
use crate::construction::Construction;
use crate::local_search::{iterated_local_search, LocalSearch, SearchParams};
use crate::multi_start::multi_start;
use crate::problem::Problem;
use crate::report::RunReport;
use crate::run_rng;
use crate::super_solver::{super_solve, SuperPhase};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a strategy reads during one solve.
pub struct SolveContext<'a> {
    pub problem: &'a Problem,
    pub config: &'a SolverConfig,
    pub budget: &'a Budget,
}

#[derive(Debug, Clone)]
pub struct StrategyOutcome {
    pub route: Vec<usize>,
    pub cost: f64,
    pub algorithm: String,
    pub runs: Vec<RunReport>,
    pub unique_tours: Option<usize>,
    pub super_phase: Option<SuperPhase>,
}

impl StrategyOutcome {
    fn single(route: Vec<usize>, cost: f64, algorithm: &str) -> Self {
        Self {
            route,
            cost,
            algorithm: algorithm.to_string(),
            runs: Vec::new(),
            unique_tours: None,
            super_phase: None,
        }
    }

    /// Keeps `route` instead when it is strictly cheaper.
    fn or_cheaper(mut self, route: Vec<usize>, cost: f64) -> Self {
        if cost < self.cost {
            self.route = route;
            self.cost = cost;
        }
        self
    }
}

pub trait Strategy {
    fn kind(&self) -> StrategyKind;

    fn construct(&self, ctx: &SolveContext, rng: &mut SmallRng) -> Vec<usize>;

    fn improve(&self, ctx: &SolveContext, route: Vec<usize>, rng: &mut SmallRng)
        -> StrategyOutcome;

    fn estimate_cost(&self, ctx: &SolveContext, route: &[usize]) -> f64 {
        ctx.problem.route_cost(route)
    }

    fn solve(&self, ctx: &SolveContext) -> StrategyOutcome {
        let mut rng = run_rng(ctx.config.seed, self.kind().stream());
        let route = self.construct(ctx, &mut rng);
        self.improve(ctx, route, &mut rng)
    }
}

/// The closed set of solving strategies the decision engine and the bandit choose from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Nearest neighbour and one light descent
    Basic,
    /// Farthest insertion and full iterated local search
    Insertion,
    MultiStart,
    /// The three-way complementary solver
    Quantum,
    /// Quality-gated escalation
    Super,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Basic,
        StrategyKind::Insertion,
        StrategyKind::MultiStart,
        StrategyKind::Quantum,
        StrategyKind::Super,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Basic => "basic",
            StrategyKind::Insertion => "insertion",
            StrategyKind::MultiStart => "multi_start",
            StrategyKind::Quantum => "quantum",
            StrategyKind::Super => "super",
        }
    }

    fn stream(self) -> u64 {
        3000 + self as u64
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Strategy for StrategyKind {
    fn kind(&self) -> StrategyKind {
        *self
    }

    fn construct(&self, ctx: &SolveContext, _rng: &mut SmallRng) -> Vec<usize> {
        match self {
            StrategyKind::Insertion => Construction::FarthestInsertion.build(ctx.problem, 0),
            _ => Construction::NearestNeighbor.build(ctx.problem, 0),
        }
    }

    fn improve(
        &self,
        ctx: &SolveContext,
        route: Vec<usize>,
        rng: &mut SmallRng,
    ) -> StrategyOutcome {
        let problem = ctx.problem;
        let n = problem.size();
        let given_cost = self.estimate_cost(ctx, &route);
        match self {
            StrategyKind::Basic => {
                let mut ls = LocalSearch::new(problem, route);
                ls.optimize(ctx.budget, &SearchParams::light());
                let cost = ls.cost();
                StrategyOutcome::single(ls.into_route(), cost, "nearest_neighbor+light_ls")
            }
            StrategyKind::Insertion => {
                let params = SearchParams::full(n);
                let outcome = iterated_local_search(problem, route, ctx.budget, rng, &params);
                StrategyOutcome::single(outcome.route, outcome.cost, "farthest_insertion+ils")
            }
            StrategyKind::MultiStart => {
                let result = multi_start(
                    problem,
                    ctx.config.ensemble_size_for(n),
                    ctx.budget,
                    ctx.config.seed,
                );
                StrategyOutcome {
                    route: result.route,
                    cost: result.cost,
                    algorithm: "multi_start".to_string(),
                    runs: result.runs,
                    unique_tours: None,
                    super_phase: None,
                }
                .or_cheaper(route, given_cost)
            }
            StrategyKind::Quantum => {
                let result = complementary(problem, ctx.budget, ctx.config.seed);
                StrategyOutcome {
                    route: result.route,
                    cost: result.cost,
                    algorithm: format!("complementary/{:?}", result.winner),
                    runs: result.runs,
                    unique_tours: Some(result.unique_tours),
                    super_phase: None,
                }
                .or_cheaper(route, given_cost)
            }
            StrategyKind::Super => {
                let result = super_solve(problem, ctx.budget, ctx.config);
                StrategyOutcome {
                    route: result.route,
                    cost: result.cost,
                    algorithm: "super".to_string(),
                    runs: result.runs,
                    unique_tours: None,
                    super_phase: Some(result.phase),
                }
                .or_cheaper(route, given_cost)
            }
        }
    }
}
