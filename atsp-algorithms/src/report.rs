use crate::bandit::BucketKey;
use crate::checkpoint::CheckpointRecord;
use crate::confidence::ConfidenceScore;
use crate::decision::Decision;
use crate::quality::Quality;
use crate::strategy::StrategyKind;
use crate::super_solver::SuperPhase;
use serde::{Deserialize, Serialize};

/// Diagnostics of one ensemble run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunReport {
    pub index: usize,
    pub strategy: String,
    pub cost: f64,
    pub unique_tours: usize,
    pub iterations: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SolveReport {
    pub tour: Vec<usize>,
    pub cost: f64,
    pub decision: Option<Decision>,
    pub confidence: Option<ConfidenceScore>,
    pub lower_bound: Option<f64>,
    pub gap: Option<f64>,
    pub quality: Option<Quality>,
    /// Strategy dispatched, when the tour came from one
    pub strategy: Option<StrategyKind>,
    /// Name of the routine that produced the tour
    pub algorithm: String,
    pub wall_time: f64,
    pub runs: Vec<RunReport>,
    pub unique_tours: Option<usize>,
    pub checkpoints: Vec<CheckpointRecord>,
    pub super_phase: Option<SuperPhase>,
    pub bandit_bucket: Option<BucketKey>,
}

impl SolveReport {
    pub fn new(tour: Vec<usize>, cost: f64, algorithm: impl Into<String>) -> Self {
        Self {
            tour,
            cost,
            decision: None,
            confidence: None,
            lower_bound: None,
            gap: None,
            quality: None,
            strategy: None,
            algorithm: algorithm.into(),
            wall_time: 0.0,
            runs: Vec::new(),
            unique_tours: None,
            checkpoints: Vec::new(),
            super_phase: None,
            bandit_bucket: None,
        }
    }
}
