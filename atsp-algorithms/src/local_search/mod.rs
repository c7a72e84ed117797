mod or_opt;
mod perturbation;
mod three_opt;
mod two_opt;

pub use perturbation::{double_bridge, random_restart};

use crate::budget::Budget;
use crate::problem::Problem;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// A move only counts as improving when it saves more than this.
pub const IMPROVEMENT_EPSILON: f64 = 1e-7;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Enables the orientation-preserving segment swap on top of 2-opt and Or-opt
    pub three_opt: bool,
    /// Cap on improvement passes per descent
    pub max_passes: usize,
    /// Cap on double-bridge kicks after the first local optimum
    pub max_kicks: usize,
    /// Consecutive non-improving kicks before giving up
    pub stall_limit: usize,
    /// Double bridges applied per kick
    pub kick_strength: usize,
}

impl SearchParams {
    /// One descent with 2-opt and Or-opt, no kicks.
    pub fn light() -> Self {
        Self {
            three_opt: false,
            max_passes: 50,
            max_kicks: 0,
            stall_limit: 0,
            kick_strength: 1,
        }
    }

    pub fn full(num_nodes: usize) -> Self {
        Self {
            three_opt: true,
            max_passes: 1000,
            max_kicks: (50 + 2 * num_nodes).min(2000),
            stall_limit: 50.max(num_nodes / 4).min(400),
            kick_strength: 1,
        }
    }

    /// Deep search to convergence with many kicks.
    pub fn intensive(num_nodes: usize) -> Self {
        let full = Self::full(num_nodes);
        Self {
            max_kicks: full.max_kicks * 4,
            stall_limit: full.stall_limit * 4,
            ..full
        }
    }

    /// Strong kicks, short patience.
    pub fn chaotic(num_nodes: usize) -> Self {
        Self {
            kick_strength: 3,
            stall_limit: 30,
            ..Self::full(num_nodes)
        }
    }
}

/// Result of a local search or iterated local search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub route: Vec<usize>,
    pub cost: f64,
    pub passes: usize,
    pub kicks: usize,
    pub improvements: usize,
}

/// Candidate-list local search over one tour. Keeps node positions and forward and
/// backward prefix sums of edge costs so directed segment reversals price in O(1).
pub struct LocalSearch<'a> {
    problem: &'a Problem,
    route: Vec<usize>,
    pos: Vec<usize>,
    forward: Vec<f64>,  // forward[k] = cost of route[0] -> ... -> route[k]
    backward: Vec<f64>, // same path walked against its direction
    cost: f64,
    pub nb_moves: usize,
}

impl<'a> LocalSearch<'a> {
    pub fn new(problem: &'a Problem, route: Vec<usize>) -> Self {
        let n = route.len();
        let mut ls = Self {
            problem,
            route,
            pos: vec![0; n],
            forward: vec![0.0; n],
            backward: vec![0.0; n],
            cost: 0.0,
            nb_moves: 0,
        };
        ls.refresh();
        ls
    }

    pub fn route(&self) -> &[usize] {
        &self.route
    }

    pub fn into_route(self) -> Vec<usize> {
        self.route
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_route(&mut self, route: Vec<usize>) {
        self.route = route;
        self.refresh();
    }

    /// Rebuilds positions, prefix sums and the exact tour cost.
    fn refresh(&mut self) {
        let n = self.route.len();
        if n == 0 {
            self.cost = 0.0;
            return;
        }
        let matrix = self.problem.matrix();
        self.pos.resize(n, 0);
        self.forward.resize(n, 0.0);
        self.backward.resize(n, 0.0);
        self.forward[0] = 0.0;
        self.backward[0] = 0.0;
        for (k, &node) in self.route.iter().enumerate() {
            self.pos[node] = k;
            if k + 1 < n {
                let next = self.route[k + 1];
                self.forward[k + 1] = self.forward[k] + matrix.c(node, next);
                self.backward[k + 1] = self.backward[k] + matrix.c(next, node);
            }
        }
        self.cost = self.forward[n - 1] + matrix.c(self.route[n - 1], self.route[0]);
    }

    #[inline]
    fn at(&self, k: usize) -> usize {
        self.route[k % self.route.len()]
    }

    /// Runs improvement passes until one finds nothing, the pass cap is hit or the
    /// budget expires. The budget is polled at the end of each pass.
    pub fn optimize(&mut self, budget: &Budget, params: &SearchParams) -> usize {
        if self.route.len() < 4 {
            return 0;
        }
        let mut passes = 0;
        while passes < params.max_passes {
            passes += 1;
            let mut applied = self.two_opt_pass();
            applied += self.or_opt_pass();
            if params.three_opt {
                applied += self.three_opt_pass();
            }
            self.nb_moves += applied;
            if applied == 0 || budget.is_expired() {
                break;
            }
        }
        passes
    }
}

/// Descent followed by double-bridge kicks from the best tour, accepting only
/// strict improvements. Returns the best tour seen whenever it stops.
pub fn iterated_local_search(
    problem: &Problem,
    route: Vec<usize>,
    budget: &Budget,
    rng: &mut SmallRng,
    params: &SearchParams,
) -> SearchOutcome {
    let mut ls = LocalSearch::new(problem, route);
    let mut passes = ls.optimize(budget, params);
    let mut best_route = ls.route().to_vec();
    let mut best_cost = ls.cost();
    let mut kicks = 0;
    let mut stall = 0;
    let mut improvements = 0;

    while kicks < params.max_kicks && stall < params.stall_limit && !budget.is_expired() {
        kicks += 1;
        let mut kicked = best_route.clone();
        for _ in 0..params.kick_strength.max(1) {
            kicked = double_bridge(&kicked, rng);
        }
        ls.set_route(kicked);
        passes += ls.optimize(budget, params);
        if ls.cost() < best_cost - IMPROVEMENT_EPSILON {
            best_cost = ls.cost();
            best_route.copy_from_slice(ls.route());
            improvements += 1;
            stall = 0;
        } else {
            stall += 1;
        }
    }

    SearchOutcome {
        route: best_route,
        cost: best_cost,
        passes,
        kicks,
        improvements,
    }
}
