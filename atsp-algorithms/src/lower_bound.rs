use atsp_challenges::CostMatrix;
use logging_timer::time;
use ndarray::Array2;

/// Optimal assignment of every node to a distinct successor.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub cost: f64,
    pub successor: Vec<usize>,
}

/// Assignment-problem relaxation of the tour: each node picks one successor, each node
/// is picked once, subtours allowed. Never exceeds the optimal tour cost.
#[time]
pub fn assignment_bound(matrix: &CostMatrix) -> f64 {
    let n = matrix.size();
    if n <= 2 {
        return matrix.route_cost(&(0..n).collect::<Vec<_>>());
    }
    let assignment = solve_assignment(matrix);
    log::debug!(
        "assignment bound {:.4} over {} nodes",
        assignment.cost,
        n
    );
    assignment.cost
}

/// Hungarian method with row/column potentials, O(n^3). Self-loops are priced above
/// any complete derangement so they are never chosen for n >= 2.
pub fn solve_assignment(matrix: &CostMatrix) -> Assignment {
    let n = matrix.size();
    let forbidden = (matrix.max_cost() + 1.0) * n as f64;
    let a = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            forbidden
        } else {
            matrix.c(i, j)
        }
    });

    // 1-indexed; column 0 is a virtual sentinel.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        p[0] = row;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = a[[i0 - 1, j - 1]] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if j0 == 0 || p[j0] == 0 {
                break;
            }
        }
        while j0 != 0 {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
        }
    }

    let mut successor = vec![0usize; n];
    for j in 1..=n {
        if p[j] > 0 {
            successor[p[j] - 1] = j - 1;
        }
    }
    let cost = (0..n).map(|i| a[[i, successor[i]]]).sum();
    Assignment { cost, successor }
}
