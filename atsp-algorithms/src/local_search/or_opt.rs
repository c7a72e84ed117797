use super::{LocalSearch, IMPROVEMENT_EPSILON};

const MAX_SEGMENT: usize = 3;

impl<'a> LocalSearch<'a> {
    /// Moves `route[s..s + len]` between `x` and its successor when that is strictly
    /// cheaper. The segment keeps its orientation.
    fn try_or_opt(&mut self, s: usize, len: usize) -> bool {
        let problem = self.problem;
        let matrix = problem.matrix();
        let n = self.route.len();
        let first = self.route[s];
        let last = self.route[s + len - 1];
        let prev = self.at(s + n - 1);
        let next = self.at(s + len);
        let removal_gain = matrix.c(prev, first) + matrix.c(last, next) - matrix.c(prev, next);
        let inside = |node: usize| (s..s + len).contains(&self.pos[node]);

        let mut target = None;
        let edges = problem
            .candidates
            .predecessors(first)
            .iter()
            .map(|&x| (x, self.at(self.pos[x] + 1)))
            .chain(
                problem
                    .candidates
                    .successors(last)
                    .iter()
                    .map(|&y| (self.at(self.pos[y] + n - 1), y)),
            );
        for (x, y) in edges {
            if inside(x) || inside(y) || x == prev {
                continue;
            }
            let delta = matrix.c(x, first) + matrix.c(last, y) - matrix.c(x, y) - removal_gain;
            if delta < -IMPROVEMENT_EPSILON {
                target = Some(x);
                break;
            }
        }

        let Some(x) = target else {
            return false;
        };
        let segment: Vec<usize> = self.route.drain(s..s + len).collect();
        let at = match self.route.iter().position(|&v| v == x) {
            Some(k) => k + 1,
            None => {
                // unreachable for a valid tour; restore and bail
                self.route.splice(s..s, segment);
                self.refresh();
                return false;
            }
        };
        self.route.splice(at..at, segment);
        self.refresh();
        true
    }

    pub(super) fn or_opt_pass(&mut self) -> usize {
        let n = self.route.len();
        let mut applied = 0;
        for len in 1..=MAX_SEGMENT {
            if n < len + 3 {
                break;
            }
            for s in 0..=n - len {
                if self.try_or_opt(s, len) {
                    applied += 1;
                }
            }
        }
        applied
    }
}
