use serde::{Deserialize, Serialize};

/// Gap band of a tour against the lower bound.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

/// Upper gap edges (exclusive) of Excellent, Good and Acceptable. Small instances
/// have looser bounds so they get looser bands.
pub fn quality_edges(num_nodes: usize) -> [f64; 3] {
    if num_nodes < 50 {
        [0.05, 0.10, 0.15]
    } else {
        [0.02, 0.05, 0.10]
    }
}

impl Quality {
    pub fn classify(gap: f64, num_nodes: usize) -> Self {
        let [excellent, good, acceptable] = quality_edges(num_nodes);
        if gap < excellent {
            Quality::Excellent
        } else if gap < good {
            Quality::Good
        } else if gap < acceptable {
            Quality::Acceptable
        } else {
            Quality::Poor
        }
    }

    /// Gate of the super solver's fast phase: the gap may sit on the Good edge itself.
    pub fn accepts_fast(gap: f64, num_nodes: usize) -> bool {
        gap <= quality_edges(num_nodes)[1]
    }
}
