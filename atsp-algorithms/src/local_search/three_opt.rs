use super::{LocalSearch, IMPROVEMENT_EPSILON};

impl<'a> LocalSearch<'a> {
    /// Swaps the adjacent blocks `route[i + 1..=j]` and `route[j + 1..=k]`. No segment is
    /// reversed, so only the three boundary edges change.
    fn segment_swap_delta(&self, i: usize, j: usize, k: usize) -> f64 {
        let matrix = self.problem.matrix();
        let (a, b) = (self.route[i], self.route[i + 1]);
        let (c, d) = (self.route[j], self.route[j + 1]);
        let (e, f) = (self.route[k], self.at(k + 1));
        matrix.c(a, d) + matrix.c(e, b) + matrix.c(c, f)
            - matrix.c(a, b)
            - matrix.c(c, d)
            - matrix.c(e, f)
    }

    /// New edge `a -> d` from the successor lists of `a`, new edge `e -> b` from the
    /// predecessor lists of `b`.
    pub(super) fn three_opt_pass(&mut self) -> usize {
        let problem = self.problem;
        let n = self.route.len();
        let mut applied = 0;

        'outer: for i in 0..n.saturating_sub(2) {
            let a = self.route[i];
            let b = self.route[i + 1];
            for &d in problem.candidates.successors(a) {
                let jp1 = self.pos[d];
                if jp1 < i + 2 {
                    continue;
                }
                let j = jp1 - 1;
                for &e in problem.candidates.predecessors(b) {
                    let k = self.pos[e];
                    if k <= j {
                        continue;
                    }
                    if self.segment_swap_delta(i, j, k) < -IMPROVEMENT_EPSILON {
                        self.route[i + 1..=k].rotate_left(j - i);
                        self.refresh();
                        applied += 1;
                        continue 'outer;
                    }
                }
            }
        }
        applied
    }
}
