use super::{LocalSearch, IMPROVEMENT_EPSILON};

impl<'a> LocalSearch<'a> {
    /// Change in tour cost from reversing `route[i + 1..=j]`. Every edge inside the
    /// segment flips direction, so it is re-priced from the prefix sums.
    fn two_opt_delta(&self, i: usize, j: usize) -> f64 {
        let matrix = self.problem.matrix();
        let (a, b) = (self.route[i], self.route[i + 1]);
        let (c, d) = (self.route[j], self.at(j + 1));
        let inside_forward = self.forward[j] - self.forward[i + 1];
        let inside_backward = self.backward[j] - self.backward[i + 1];
        matrix.c(a, c) + matrix.c(b, d) + inside_backward
            - matrix.c(a, b)
            - matrix.c(c, d)
            - inside_forward
    }

    fn try_two_opt(&mut self, i: usize, j: usize) -> bool {
        if j <= i + 1 || j >= self.route.len() {
            return false;
        }
        if self.two_opt_delta(i, j) < -IMPROVEMENT_EPSILON {
            self.route[i + 1..=j].reverse();
            self.refresh();
            true
        } else {
            false
        }
    }

    /// One sweep of candidate 2-opt: new edge `a -> c` from the successor lists,
    /// then new edge `b -> d` from the predecessor lists.
    pub(super) fn two_opt_pass(&mut self) -> usize {
        let problem = self.problem;
        let n = self.route.len();
        let mut applied = 0;

        for i in 0..n - 1 {
            let a = self.route[i];
            for &c in problem.candidates.successors(a) {
                let j = self.pos[c];
                if j > i + 1 && self.try_two_opt(i, j) {
                    applied += 1;
                }
            }
        }

        for q in 0..n {
            let d = self.route[q];
            let j = if q == 0 { n - 1 } else { q - 1 };
            for &b in problem.candidates.predecessors(d) {
                let p = self.pos[b];
                if p >= 1 && p < j && self.try_two_opt(p - 1, j) {
                    applied += 1;
                }
            }
        }
        applied
    }
}
