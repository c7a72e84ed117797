use crate::construction::lattice_rows;
use crate::problem::Problem;
use atsp_utils::{coefficient_of_variation, mean, skewness};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const CIRCLE_RADIAL_CV: f64 = 0.01;
const CIRCLE_ANGULAR_CV: f64 = 0.05;
const GRID_SPACING_CV: f64 = 0.01;
const STRUCTURED_FLOOR: f64 = 0.95;
/// Regularity term when no coordinates are available.
const UNKNOWN_REGULARITY: f64 = 0.5;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    Circle,
    Grid,
    Irregular,
}

/// Shape statistics of the coordinates, when the instance has them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Regularity {
    /// Variation of the distances to the centroid
    pub radial_cv: f64,
    /// Variation of the angular gaps between consecutive points around the centroid
    pub angular_cv: f64,
    pub structure: Structure,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstanceFeatures {
    pub num_nodes: usize,
    pub asymmetry_ratio: f64,
    pub cost_cv: f64,
    pub cost_skewness: f64,
    pub regularity: Option<Regularity>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfidenceScore {
    pub value: f64,
    pub features: InstanceFeatures,
}

impl ConfidenceScore {
    /// Circle or grid layout, if one was detected.
    pub fn structure(&self) -> Option<Structure> {
        match self.features.regularity.as_ref().map(|r| r.structure) {
            Some(Structure::Irregular) | None => None,
            structure => structure,
        }
    }
}

/// Scores how easy an instance looks: `0.4 * regularity + 0.3 * size + 0.3 * dispersion`.
/// Small, regular instances with tight cost distributions score high.
pub fn analyze(problem: &Problem) -> ConfidenceScore {
    let matrix = problem.matrix();
    let n = problem.size();
    let costs: Vec<f64> = matrix.off_diagonal().collect();
    let cost_cv = coefficient_of_variation(&costs);
    let cost_skewness = skewness(&costs);
    let regularity = problem.coordinates().map(regularity);

    let regularity_term = match &regularity {
        None => UNKNOWN_REGULARITY,
        Some(r) if r.structure != Structure::Irregular => 1.0,
        Some(r) => 1.0 - (0.5 * (r.radial_cv + r.angular_cv)).min(1.0),
    };
    let size_term = 1.0 / (1.0 + n as f64 / 100.0);
    let dispersion_term = (1.0 - 0.5 * cost_cv - 0.1 * cost_skewness.abs()).clamp(0.0, 1.0);

    let mut value =
        (0.4 * regularity_term + 0.3 * size_term + 0.3 * dispersion_term).clamp(0.0, 1.0);
    if matches!(
        regularity.as_ref().map(|r| r.structure),
        Some(Structure::Circle | Structure::Grid)
    ) {
        value = value.max(STRUCTURED_FLOOR);
    }

    let score = ConfidenceScore {
        value,
        features: InstanceFeatures {
            num_nodes: n,
            asymmetry_ratio: matrix.asymmetry_ratio(),
            cost_cv,
            cost_skewness,
            regularity,
        },
    };
    log::debug!(
        "confidence {:.3} (n={}, cv={:.3}, structure={:?})",
        score.value,
        n,
        cost_cv,
        score.structure()
    );
    score
}

pub fn regularity(points: &[(f64, f64)]) -> Regularity {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
    let radii: Vec<f64> = points
        .iter()
        .map(|&(x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
        .collect();

    let mut angles: Vec<f64> = points.iter().map(|&(x, y)| (y - cy).atan2(x - cx)).collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    let mut gaps: Vec<f64> = angles.windows(2).map(|w| w[1] - w[0]).collect();
    if let (Some(first), Some(last)) = (angles.first(), angles.last()) {
        gaps.push(TAU - (last - first));
    }

    let radial_cv = coefficient_of_variation(&radii);
    let angular_cv = coefficient_of_variation(&gaps);
    let circular = points.len() >= 5
        && mean(&radii) > 0.0
        && radial_cv < CIRCLE_RADIAL_CV
        && angular_cv < CIRCLE_ANGULAR_CV;
    let structure = if circular {
        Structure::Circle
    } else if is_grid(points) {
        Structure::Grid
    } else {
        Structure::Irregular
    };
    Regularity {
        radial_cv,
        angular_cv,
        structure,
    }
}

fn is_grid(points: &[(f64, f64)]) -> bool {
    let Some(rows) = lattice_rows(points) else {
        return false;
    };
    let xs: Vec<f64> = rows[0].windows(2).map(|w| points[w[1]].0 - points[w[0]].0).collect();
    let ys: Vec<f64> = rows.windows(2).map(|w| points[w[1][0]].1 - points[w[0][0]].1).collect();
    coefficient_of_variation(&xs) < GRID_SPACING_CV
        && coefficient_of_variation(&ys) < GRID_SPACING_CV
}
