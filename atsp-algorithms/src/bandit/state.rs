use crate::strategy::StrategyKind;
use crate::HashMap;
use atsp_challenges::{CostMatrix, SolverError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Beta posterior over the reward of one strategy in one bucket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArmStats {
    pub alpha: f64,
    pub beta: f64,
    pub pulls: u64,
    pub total_reward: f64,
}

impl Default for ArmStats {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            pulls: 0,
            total_reward: 0.0,
        }
    }
}

impl ArmStats {
    /// Fractional Bernoulli update with a reward in [0, 1].
    pub fn update(&mut self, reward: f64) {
        let r = if reward.is_finite() { reward.clamp(0.0, 1.0) } else { 0.0 };
        self.alpha += r;
        self.beta += 1.0 - r;
        self.pulls += 1;
        self.total_reward += r;
    }

    pub fn win_rate(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    pub fn mean_reward(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_reward / self.pulls as f64
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AsymmetryClass {
    NearlySymmetric,
    ModeratelyAsymmetric,
    HighlyAsymmetric,
}

impl SizeClass {
    pub fn of(num_nodes: usize) -> Self {
        if num_nodes < 50 {
            SizeClass::Small
        } else if num_nodes < 100 {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    fn name(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

impl AsymmetryClass {
    pub fn of(ratio: f64) -> Self {
        if ratio < 0.1 {
            AsymmetryClass::NearlySymmetric
        } else if ratio < 0.3 {
            AsymmetryClass::ModeratelyAsymmetric
        } else {
            AsymmetryClass::HighlyAsymmetric
        }
    }

    fn name(self) -> &'static str {
        match self {
            AsymmetryClass::NearlySymmetric => "nearly_symmetric",
            AsymmetryClass::ModeratelyAsymmetric => "moderately_asymmetric",
            AsymmetryClass::HighlyAsymmetric => "highly_asymmetric",
        }
    }
}

/// Feature bucket of an instance, rendered as `"{size}_{asymmetry}"`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct BucketKey {
    pub size: SizeClass,
    pub asymmetry: AsymmetryClass,
}

impl BucketKey {
    pub fn new(size: SizeClass, asymmetry: AsymmetryClass) -> Self {
        Self { size, asymmetry }
    }

    pub fn of(matrix: &CostMatrix) -> Self {
        Self::new(
            SizeClass::of(matrix.size()),
            AsymmetryClass::of(matrix.asymmetry_ratio()),
        )
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.size.name(), self.asymmetry.name())
    }
}

impl FromStr for BucketKey {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, asymmetry) = s
            .split_once('_')
            .ok_or_else(|| SolverError::invalid_config(format!("malformed bucket key '{}'", s)))?;
        let size = [SizeClass::Small, SizeClass::Medium, SizeClass::Large]
            .into_iter()
            .find(|c| c.name() == size);
        let asymmetry = [
            AsymmetryClass::NearlySymmetric,
            AsymmetryClass::ModeratelyAsymmetric,
            AsymmetryClass::HighlyAsymmetric,
        ]
        .into_iter()
        .find(|c| c.name() == asymmetry);
        match (size, asymmetry) {
            (Some(size), Some(asymmetry)) => Ok(Self::new(size, asymmetry)),
            _ => Err(SolverError::invalid_config(format!("unknown bucket key '{}'", s))),
        }
    }
}

impl From<BucketKey> for String {
    fn from(key: BucketKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for BucketKey {
    type Error = SolverError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

pub type ArmTable = BTreeMap<StrategyKind, ArmStats>;

/// Plain-data copy of the bandit state, as exchanged with a store.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BanditSnapshot {
    pub buckets: BTreeMap<BucketKey, ArmTable>,
}

/// Process-wide bandit statistics. Readers share the bucket map; each bucket has its
/// own lock so updates to one bucket never block another.
#[derive(Default)]
pub struct BanditState {
    buckets: RwLock<HashMap<BucketKey, Arc<Mutex<ArmTable>>>>,
}

impl BanditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BanditSnapshot) -> Self {
        let buckets = snapshot
            .buckets
            .into_iter()
            .map(|(key, arms)| (key, Arc::new(Mutex::new(arms))))
            .collect();
        Self {
            buckets: RwLock::new(buckets),
        }
    }

    pub fn snapshot(&self) -> BanditSnapshot {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        BanditSnapshot {
            buckets: buckets
                .iter()
                .map(|(key, arms)| {
                    let arms = arms.lock().unwrap_or_else(PoisonError::into_inner);
                    (*key, arms.clone())
                })
                .collect(),
        }
    }

    pub fn bucket(&self, key: BucketKey) -> Arc<Mutex<ArmTable>> {
        if let Some(arms) = self
            .buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return arms.clone();
        }
        self.buckets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_default()
            .clone()
    }

    /// Runs `f` with the bucket's lock held.
    pub fn with_bucket<T>(&self, key: BucketKey, f: impl FnOnce(&mut ArmTable) -> T) -> T {
        let bucket = self.bucket(key);
        let mut arms = bucket.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut arms)
    }

    pub fn update(&self, key: BucketKey, arm: StrategyKind, reward: f64) {
        self.with_bucket(key, |arms| arms.entry(arm).or_default().update(reward));
    }

    pub fn arm(&self, key: BucketKey, arm: StrategyKind) -> ArmStats {
        self.with_bucket(key, |arms| arms.get(&arm).cloned().unwrap_or_default())
    }
}
