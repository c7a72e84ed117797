use crate::error::{SolverError, SolverResult};
use crate::matrix::CostMatrix;
use serde::{Deserialize, Serialize};

/// A closed tour: a permutation of `0..n`, the last node connecting back to the first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tour {
    route: Vec<usize>,
}

impl Tour {
    pub fn new(route: Vec<usize>, size: usize) -> SolverResult<Self> {
        verify_route(&route, size)?;
        Ok(Self { route })
    }

    pub fn identity(size: usize) -> Self {
        Self {
            route: (0..size).collect(),
        }
    }

    pub fn route(&self) -> &[usize] {
        &self.route
    }

    pub fn into_route(self) -> Vec<usize> {
        self.route
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    pub fn cost(&self, matrix: &CostMatrix) -> f64 {
        matrix.route_cost(&self.route)
    }

    /// Rotation of the route that starts at node 0. Two tours describing the same
    /// directed cycle share the same canonical form.
    pub fn canonical(&self) -> Vec<usize> {
        canonical_route(&self.route)
    }
}

pub fn canonical_route(route: &[usize]) -> Vec<usize> {
    match route.iter().position(|&node| node == 0) {
        Some(start) => route[start..]
            .iter()
            .chain(route[..start].iter())
            .cloned()
            .collect(),
        None => route.to_vec(),
    }
}

pub fn verify_route(route: &[usize], size: usize) -> SolverResult<()> {
    if route.len() != size {
        return Err(SolverError::invalid_tour(format!(
            "route length ({}) does not match number of nodes ({})",
            route.len(),
            size
        )));
    }
    let mut seen = vec![false; size];
    for &node in route {
        if node >= size {
            return Err(SolverError::OutOfRange { index: node, size });
        }
        if seen[node] {
            return Err(SolverError::invalid_tour(format!(
                "route visits node {} more than once",
                node
            )));
        }
        seen[node] = true;
    }
    Ok(())
}

pub fn calc_total_cost(matrix: &CostMatrix, route: &[usize]) -> SolverResult<f64> {
    verify_route(route, matrix.size())?;
    Ok(matrix.route_cost(route))
}
