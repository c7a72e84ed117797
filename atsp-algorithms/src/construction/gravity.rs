use super::nearest_neighbor_by;
use crate::problem::Problem;
use atsp_utils::median;

pub const GRAVITY_EPSILON: f64 = 1e-6;
const MASS_NEIGHBOURS: usize = 5;

/// Per-node mass in [1, 10]. Nodes far from the centre with sparse surroundings are
/// heavy and get pulled into the tour early.
///
/// mass = (distance to centre + mean distance to the 5 nearest) * (1 - degree + 0.1)
///
/// where degree is the share of nodes closer than the node's median distance. Without
/// coordinates the distance to centre is the node's mean symmetrised cost.
pub fn gravity_masses(problem: &Problem) -> Vec<f64> {
    let n = problem.size();
    if n < 2 {
        return vec![5.0; n];
    }
    let matrix = problem.matrix();
    let dist = |i: usize, j: usize| (matrix.c(i, j) + matrix.c(j, i)) / 2.0;

    let centre_distance: Vec<f64> = match problem.coordinates() {
        Some(points) => {
            let cx = points.iter().map(|p| p.0).sum::<f64>() / n as f64;
            let cy = points.iter().map(|p| p.1).sum::<f64>() / n as f64;
            points
                .iter()
                .map(|&(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
                .collect()
        }
        None => (0..n)
            .map(|i| {
                (0..n).filter(|&j| j != i).map(|j| dist(i, j)).sum::<f64>() / (n - 1) as f64
            })
            .collect(),
    };

    let k = MASS_NEIGHBOURS.min(n - 1);
    let mut masses: Vec<f64> = (0..n)
        .map(|i| {
            let mut row: Vec<f64> = (0..n)
                .map(|j| if i == j { 0.0 } else { dist(i, j) })
                .collect();
            let threshold = median(&row);
            let degree = row.iter().filter(|&&d| d < threshold).count().saturating_sub(1);
            let degree_norm = degree as f64 / (n - 1) as f64;
            row.sort_by(|a, b| a.total_cmp(b));
            let knn = row[1..=k].iter().sum::<f64>() / k as f64;
            (centre_distance[i] + knn) * (1.0 - degree_norm + 0.1)
        })
        .collect();

    let lo = masses.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = masses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi > lo {
        for m in masses.iter_mut() {
            *m = 1.0 + 9.0 * (*m - lo) / (hi - lo);
        }
    } else {
        masses.iter_mut().for_each(|m| *m = 5.0);
    }
    masses
}

/// Nearest neighbour on `c(i, j) / (m_i * m_j + eps)`.
pub fn gravity_nearest_neighbor(problem: &Problem, start: usize) -> Vec<usize> {
    let masses = gravity_masses(problem);
    let matrix = problem.matrix();
    nearest_neighbor_by(problem.size(), start, |i, j| {
        matrix.c(i, j) / (masses[i] * masses[j] + GRAVITY_EPSILON)
    })
}
