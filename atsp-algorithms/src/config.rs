use atsp_challenges::{SolverError, SolverResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Confidence at or above which the decision engine answers SI
    /// Keep in [0, 1] and not below `no_threshold`
    pub si_threshold: f64,

    /// Confidence at or below which the decision engine answers NO
    pub no_threshold: f64,

    /// Maximum number of staged rounds explored on a SINO decision
    pub max_checkpoints: usize,

    /// Wall-clock budget for the whole solve, in seconds
    pub time_budget: f64,

    /// Number of nearest neighbours kept per node for local search moves
    /// Clamped to n - 1
    pub candidate_list_size: usize,

    /// Number of independent multi-start runs. `None` picks a size from the number of nodes
    pub ensemble_size: Option<usize>,

    /// Allows circle and grid layouts to bypass general search
    pub enable_fast_path: bool,

    /// Seed for every random choice made during the solve
    pub seed: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            si_threshold: 0.80,
            no_threshold: 0.20,
            max_checkpoints: 5,
            time_budget: 10.0,
            candidate_list_size: 10,
            ensemble_size: None,
            enable_fast_path: true,
            seed: 0,
        }
    }
}

impl SolverConfig {
    /// Overlays `hyperparameters` on the defaults and validates the result.
    pub fn initialize(hyperparameters: &Option<Map<String, Value>>) -> SolverResult<Self> {
        let mut merged = serde_json::to_value(Self::default())
            .map_err(|e| SolverError::invalid_config(e.to_string()))?;
        if let (Value::Object(obj), Some(map)) = (&mut merged, hyperparameters) {
            for (k, v) in map {
                if !obj.contains_key(k) {
                    return Err(SolverError::invalid_config(format!(
                        "unknown parameter '{}'",
                        k
                    )));
                }
                obj.insert(k.clone(), v.clone());
            }
        }
        let config: Self = serde_json::from_value(merged)
            .map_err(|e| SolverError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SolverResult<()> {
        for (name, value) in [
            ("si_threshold", self.si_threshold),
            ("no_threshold", self.no_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SolverError::invalid_config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.si_threshold < self.no_threshold {
            return Err(SolverError::invalid_config(format!(
                "si_threshold ({}) must not be below no_threshold ({})",
                self.si_threshold, self.no_threshold
            )));
        }
        if !self.time_budget.is_finite() || self.time_budget < 0.0 {
            return Err(SolverError::invalid_config(format!(
                "time_budget must be a non-negative number of seconds, got {}",
                self.time_budget
            )));
        }
        if self.max_checkpoints == 0 {
            return Err(SolverError::invalid_config("max_checkpoints must be positive"));
        }
        if self.candidate_list_size == 0 {
            return Err(SolverError::invalid_config(
                "candidate_list_size must be positive",
            ));
        }
        if self.ensemble_size == Some(0) {
            return Err(SolverError::invalid_config("ensemble_size must be positive"));
        }
        Ok(())
    }

    pub fn ensemble_size_for(&self, num_nodes: usize) -> usize {
        self.ensemble_size
            .unwrap_or_else(|| default_ensemble_size(num_nodes))
    }
}

/// Larger instances have more distinct local optima worth sampling.
pub fn default_ensemble_size(num_nodes: usize) -> usize {
    if num_nodes < 20 {
        1
    } else if num_nodes < 100 {
        4
    } else if num_nodes < 500 {
        8
    } else {
        12
    }
}
