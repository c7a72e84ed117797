use crate::problem::Problem;

/// Greedy walk from `start` to the cheapest unvisited successor, ties to the lowest
/// index. Candidate lists answer most steps; a full row scan covers the rest.
pub fn nearest_neighbor(problem: &Problem, start: usize) -> Vec<usize> {
    let n = problem.size();
    let matrix = problem.matrix();
    let mut visited = vec![false; n];
    let mut route = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    route.push(current);

    while route.len() < n {
        let next = match problem
            .candidates
            .successors(current)
            .iter()
            .copied()
            .find(|&j| !visited[j])
        {
            Some(j) => j,
            None => cheapest_unvisited(n, &visited, |j| matrix.c(current, j)),
        };
        visited[next] = true;
        route.push(next);
        current = next;
    }
    route
}

/// Same walk on an arbitrary edge weight, always scanning the full row.
pub fn nearest_neighbor_by(
    n: usize,
    start: usize,
    weight: impl Fn(usize, usize) -> f64,
) -> Vec<usize> {
    let mut visited = vec![false; n];
    let mut route = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    route.push(current);

    while route.len() < n {
        let next = cheapest_unvisited(n, &visited, |j| weight(current, j));
        visited[next] = true;
        route.push(next);
        current = next;
    }
    route
}

fn cheapest_unvisited(n: usize, visited: &[bool], cost: impl Fn(usize) -> f64) -> usize {
    let mut best = usize::MAX;
    let mut best_cost = f64::INFINITY;
    for j in 0..n {
        if visited[j] {
            continue;
        }
        let c = cost(j);
        if best == usize::MAX || c < best_cost {
            best = j;
            best_cost = c;
        }
    }
    best
}
