use atsp_challenges::CostMatrix;
use std::cmp::Ordering;

/// Per-node shortlists of the `k` cheapest successors and predecessors, sorted by
/// ascending cost with ties broken by lowest index.
#[derive(Debug, Clone)]
pub struct CandidateList {
    k: usize,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl CandidateList {
    pub fn build(matrix: &CostMatrix, k: usize) -> Self {
        let n = matrix.size();
        let k = k.min(n.saturating_sub(1));
        let successors = (0..n)
            .map(|i| nearest(n, i, k, |j| matrix.c(i, j)))
            .collect();
        let predecessors = (0..n)
            .map(|j| nearest(n, j, k, |i| matrix.c(i, j)))
            .collect();
        Self {
            k,
            successors,
            predecessors,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Nodes `j` with the cheapest `c(i, j)`.
    #[inline]
    pub fn successors(&self, i: usize) -> &[usize] {
        &self.successors[i]
    }

    /// Nodes `i` with the cheapest `c(i, j)`.
    #[inline]
    pub fn predecessors(&self, j: usize) -> &[usize] {
        &self.predecessors[j]
    }
}

fn nearest(n: usize, node: usize, k: usize, cost: impl Fn(usize) -> f64) -> Vec<usize> {
    let mut prox: Vec<(f64, usize)> = (0..n)
        .filter(|&other| other != node)
        .map(|other| (cost(other), other))
        .collect();
    let cmp = |a: &(f64, usize), b: &(f64, usize)| -> Ordering {
        a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
    };
    if k < prox.len() {
        prox.select_nth_unstable_by(k, cmp);
        prox.truncate(k);
    }
    prox.sort_by(cmp);
    prox.into_iter().map(|(_, other)| other).collect()
}
