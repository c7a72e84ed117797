use crate::budget::Budget;
use crate::config::SolverConfig;
use crate::confidence::{ConfidenceScore, Structure};
use crate::construction::{circle_order, grid_order, Construction};
use crate::local_search::{LocalSearch, SearchParams};
use crate::problem::Problem;
use atsp_challenges::{SolverError, SolverResult};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    #[serde(rename = "SI")]
    Si,
    #[serde(rename = "SINO")]
    Sino,
    #[serde(rename = "NO")]
    No,
}

/// Outcome of the decision engine with the inputs that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,
    pub confidence: f64,
    pub si_threshold: f64,
    pub no_threshold: f64,
    /// Set when a detected layout bypasses general search
    pub fast_path: Option<Structure>,
}

/// Both boundaries are inclusive: `si` wins at `confidence == si_threshold`, `no` at
/// `confidence == no_threshold`.
pub fn classify(confidence: f64, si_threshold: f64, no_threshold: f64) -> SolverResult<Verdict> {
    if si_threshold < no_threshold {
        return Err(SolverError::invalid_config(format!(
            "si_threshold ({}) must not be below no_threshold ({})",
            si_threshold, no_threshold
        )));
    }
    Ok(if confidence >= si_threshold {
        Verdict::Si
    } else if confidence <= no_threshold {
        Verdict::No
    } else {
        Verdict::Sino
    })
}

pub fn decide(score: &ConfidenceScore, config: &SolverConfig) -> SolverResult<Decision> {
    let mut verdict = classify(score.value, config.si_threshold, config.no_threshold)?;
    let fast_path = score.structure().filter(|_| config.enable_fast_path);
    if fast_path.is_some() {
        verdict = Verdict::No;
    }
    log::debug!(
        "decision {:?} at confidence {:.3} (si {:.2}, no {:.2}, fast path {:?})",
        verdict,
        score.value,
        config.si_threshold,
        config.no_threshold,
        fast_path
    );
    Ok(Decision {
        verdict,
        confidence: score.value,
        si_threshold: config.si_threshold,
        no_threshold: config.no_threshold,
        fast_path,
    })
}

/// Closed-form tour for a detected layout, polished by one light descent. Falls back
/// to nearest neighbour when the layout cannot be ordered.
pub fn fast_path_tour(
    problem: &Problem,
    structure: Structure,
    budget: &Budget,
) -> (Vec<usize>, f64) {
    let ordered = problem.coordinates().and_then(|points| match structure {
        Structure::Circle => Some(circle_order(points)),
        Structure::Grid => grid_order(points),
        Structure::Irregular => None,
    });
    let initial = ordered.unwrap_or_else(|| Construction::NearestNeighbor.build(problem, 0));
    let mut ls = LocalSearch::new(problem, initial);
    ls.optimize(budget, &SearchParams::light());
    let cost = ls.cost();
    (ls.into_route(), cost)
}
