use crate::candidates::CandidateList;
use crate::lower_bound::assignment_bound;
use atsp_challenges::{CostMatrix, Instance};
use once_cell::sync::OnceCell;

/// Read-only solving context shared by every run of a solve: the instance, its
/// candidate lists and the lazily computed lower bound.
pub struct Problem {
    pub instance: Instance,
    pub candidates: CandidateList,
    lower_bound: OnceCell<f64>,
}

impl Problem {
    pub fn new(instance: Instance, candidate_list_size: usize) -> Self {
        let candidates = CandidateList::build(&instance.matrix, candidate_list_size);
        Self {
            instance,
            candidates,
            lower_bound: OnceCell::new(),
        }
    }

    #[inline]
    pub fn matrix(&self) -> &CostMatrix {
        &self.instance.matrix
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.instance.matrix.size()
    }

    pub fn coordinates(&self) -> Option<&[(f64, f64)]> {
        self.instance.coordinates.as_deref()
    }

    #[inline]
    pub fn route_cost(&self, route: &[usize]) -> f64 {
        self.instance.matrix.route_cost(route)
    }

    pub fn lower_bound(&self) -> f64 {
        *self
            .lower_bound
            .get_or_init(|| assignment_bound(&self.instance.matrix))
    }

    pub fn cached_lower_bound(&self) -> Option<f64> {
        self.lower_bound.get().copied()
    }

    /// Relative excess of `cost` over the lower bound.
    pub fn gap(&self, cost: f64) -> f64 {
        relative_gap(cost, self.lower_bound())
    }
}

pub fn relative_gap(cost: f64, lower_bound: f64) -> f64 {
    if lower_bound > 0.0 {
        ((cost - lower_bound) / lower_bound).max(0.0)
    } else if cost > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
