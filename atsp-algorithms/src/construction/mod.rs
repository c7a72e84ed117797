mod gravity;
mod insertion;
mod nearest_neighbor;
mod savings;
mod structured;

pub use gravity::{gravity_masses, gravity_nearest_neighbor, GRAVITY_EPSILON};
pub use insertion::{cheapest_insertion, farthest_insertion, nearest_addition};
pub use nearest_neighbor::{nearest_neighbor, nearest_neighbor_by};
pub use savings::savings;
pub use structured::{circle_order, grid_order, lattice_rows};

use crate::problem::Problem;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Construction {
    NearestNeighbor,
    Gravity,
    FarthestInsertion,
    CheapestInsertion,
    NearestAddition,
    Savings,
}

impl Construction {
    pub const ALL: [Construction; 6] = [
        Construction::NearestNeighbor,
        Construction::Gravity,
        Construction::FarthestInsertion,
        Construction::CheapestInsertion,
        Construction::NearestAddition,
        Construction::Savings,
    ];

    /// Builds a full tour. `start` is ignored by farthest insertion and savings, which
    /// always grow from node 0.
    pub fn build(self, problem: &Problem, start: usize) -> Vec<usize> {
        let n = problem.size();
        if n < 3 {
            return (0..n).collect();
        }
        let start = start % n;
        match self {
            Construction::NearestNeighbor => nearest_neighbor(problem, start),
            Construction::Gravity => gravity_nearest_neighbor(problem, start),
            Construction::FarthestInsertion => farthest_insertion(problem.matrix()),
            Construction::CheapestInsertion => cheapest_insertion(problem.matrix(), start),
            Construction::NearestAddition => nearest_addition(problem.matrix(), start),
            Construction::Savings => savings(problem),
        }
    }

    /// Runs every heuristic from `start` and keeps the cheapest tour. The earlier
    /// heuristic in `ALL` wins ties.
    pub fn best(problem: &Problem, start: usize) -> (Construction, Vec<usize>) {
        let mut best: Option<(Construction, Vec<usize>, f64)> = None;
        for construction in Construction::ALL {
            let route = construction.build(problem, start);
            let cost = problem.route_cost(&route);
            if best.as_ref().map_or(true, |(_, _, c)| cost < *c) {
                best = Some((construction, route, cost));
            }
        }
        match best {
            Some((construction, route, _)) => (construction, route),
            None => (Construction::NearestNeighbor, (0..problem.size()).collect()),
        }
    }
}
