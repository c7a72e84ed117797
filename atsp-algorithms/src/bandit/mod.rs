mod state;
mod store;

pub use state::{
    ArmStats, ArmTable, AsymmetryClass, BanditSnapshot, BanditState, BucketKey, SizeClass,
};
pub use store::{BanditStore, JsonFileStore, MemoryStore};

use crate::budget::Budget;
use crate::problem::Problem;
use crate::report::SolveReport;
use crate::solver::{trivial_report, SiNoSolver};
use crate::strategy::StrategyKind;
use atsp_challenges::{Instance, SolverResult};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Gap at which the quality part of the reward reaches zero.
const REWARD_GAP_SCALE: f64 = 0.5;
/// Largest share of the reward lost to a slow solve.
const REWARD_TIME_WEIGHT: f64 = 0.2;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BanditConfig {
    /// Probability of also running a second arm and keeping the cheaper tour
    pub duel_rate: f64,
    pub arms: Vec<StrategyKind>,
    pub seed: u64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            duel_rate: 0.1,
            arms: StrategyKind::ALL.to_vec(),
            seed: 0,
        }
    }
}

/// Per-bucket arms ordered by win rate, best first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub bucket: BucketKey,
    pub arms: Vec<(StrategyKind, ArmStats)>,
}

/// Realized reward in [0, 1]: `clamp(1 - gap / 0.5) * (1 - 0.2 * min(1, elapsed / budget))`.
pub fn reward(gap: f64, elapsed: Duration, budget: Duration) -> f64 {
    let quality = if gap.is_finite() {
        (1.0 - gap / REWARD_GAP_SCALE).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let used = if budget.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / budget.as_secs_f64()).min(1.0)
    };
    quality * (1.0 - REWARD_TIME_WEIGHT * used)
}

/// Thompson sampling over strategies, one Beta posterior per (bucket, strategy).
pub struct ThompsonSelector<S: BanditStore> {
    state: Arc<BanditState>,
    store: S,
    arms: Vec<StrategyKind>,
    duel_rate: f64,
    rng: Mutex<SmallRng>,
}

impl<S: BanditStore> ThompsonSelector<S> {
    /// Loads the stored statistics. A store that fails to load starts from fresh priors.
    pub fn open(store: S, config: BanditConfig) -> Self {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("bandit state could not be loaded, starting fresh: {:#}", e);
                BanditSnapshot::default()
            }
        };
        Self::with_state(Arc::new(BanditState::from_snapshot(snapshot)), store, config)
    }

    pub fn with_state(state: Arc<BanditState>, store: S, config: BanditConfig) -> Self {
        let arms = if config.arms.is_empty() {
            StrategyKind::ALL.to_vec()
        } else {
            config.arms
        };
        Self {
            state,
            store,
            arms,
            duel_rate: config.duel_rate.clamp(0.0, 1.0),
            rng: Mutex::new(SmallRng::seed_from_u64(config.seed)),
        }
    }

    pub fn state(&self) -> &Arc<BanditState> {
        &self.state
    }

    pub fn arms(&self) -> &[StrategyKind] {
        &self.arms
    }

    /// Draws one sample per arm from its posterior and returns the highest; the
    /// earlier arm wins ties.
    pub fn select(&self, key: BucketKey) -> StrategyKind {
        let table = self.state.with_bucket(key, |arms| arms.clone());
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut best = self.arms[0];
        let mut best_sample = f64::NEG_INFINITY;
        for &arm in &self.arms {
            let stats = table.get(&arm).cloned().unwrap_or_default();
            let sample = match Beta::new(stats.alpha, stats.beta) {
                Ok(beta) => beta.sample(&mut *rng),
                Err(_) => stats.win_rate(),
            };
            if sample > best_sample {
                best = arm;
                best_sample = sample;
            }
        }
        best
    }

    pub fn record(&self, key: BucketKey, arm: StrategyKind, reward: f64) {
        self.state.update(key, arm, reward);
    }

    /// Picks a strategy for the instance's bucket, runs it, and feeds the realized
    /// reward back. Now and then a second arm duels the first on a split budget.
    pub fn solve(&self, solver: &SiNoSolver, instance: Instance) -> SolverResult<SolveReport> {
        if instance.size() <= 2 {
            return Ok(trivial_report(&instance));
        }
        let problem = solver.problem(instance);
        let key = BucketKey::of(problem.matrix());
        let arm = self.select(key);
        let rival = self.rival(arm);

        let budget = solver.budget();
        let mut report = match rival {
            None => self.pull(solver, &problem, &budget, key, arm),
            Some(rival) => {
                let first = budget.slice(0.5);
                let primary = self.pull(solver, &problem, &first, key, arm);
                let second = budget.slice(1.0);
                let challenger = self.pull(solver, &problem, &second, key, rival);
                log::debug!(
                    "bandit duel in {}: {} {:.4} vs {} {:.4}",
                    key,
                    arm,
                    primary.cost,
                    rival,
                    challenger.cost
                );
                if challenger.cost < primary.cost {
                    challenger
                } else {
                    primary
                }
            }
        };
        report.bandit_bucket = Some(key);
        solver.finish(&problem, &budget, report)
    }

    fn rival(&self, arm: StrategyKind) -> Option<StrategyKind> {
        if self.arms.len() < 2 || self.duel_rate <= 0.0 {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if !rng.gen_bool(self.duel_rate) {
            return None;
        }
        let others: Vec<StrategyKind> =
            self.arms.iter().copied().filter(|&a| a != arm).collect();
        Some(others[rng.gen_range(0..others.len())])
    }

    fn pull(
        &self,
        solver: &SiNoSolver,
        problem: &Problem,
        budget: &Budget,
        key: BucketKey,
        arm: StrategyKind,
    ) -> SolveReport {
        let report = solver.run_strategy(problem, budget, arm);
        let r = reward(problem.gap(report.cost), budget.elapsed(), budget.limit());
        self.record(key, arm, r);
        log::debug!(
            "bandit {} pulled {}: cost {:.4}, reward {:.3}",
            key,
            arm,
            report.cost,
            r
        );
        report
    }

    pub fn summary(&self) -> Vec<BucketSummary> {
        self.state
            .snapshot()
            .buckets
            .into_iter()
            .map(|(bucket, table)| {
                let mut arms: Vec<(StrategyKind, ArmStats)> = table.into_iter().collect();
                arms.sort_by(|a, b| {
                    b.1.win_rate()
                        .total_cmp(&a.1.win_rate())
                        .then(a.0.cmp(&b.0))
                });
                BucketSummary { bucket, arms }
            })
            .collect()
    }

    /// Saves the current statistics to the store.
    pub fn flush(&self) -> anyhow::Result<()> {
        self.store.save(&self.state.snapshot()).map_err(|e| {
            log::warn!("bandit state could not be saved: {:#}", e);
            e
        })
    }

    pub fn close(self) -> anyhow::Result<()> {
        self.flush()
    }
}
