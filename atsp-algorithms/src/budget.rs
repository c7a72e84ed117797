use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// Source of monotonic time for search budgets.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Lets tests drive deadlines without sleeping.
#[derive(Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.nanos.store(at.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Cooperative time budget passed down through every search phase. Phases poll
/// `is_expired` at the end of each pass and return their best tour so far once it fires.
#[derive(Clone)]
pub struct Budget {
    clock: Arc<dyn Clock>,
    start: Duration,
    deadline: Duration,
}

impl Budget {
    pub fn new(clock: Arc<dyn Clock>, limit: Duration) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            deadline: start.saturating_add(limit),
        }
    }

    /// Budgets too long for a `Duration` saturate at `Duration::MAX`.
    pub fn from_secs(clock: Arc<dyn Clock>, secs: f64) -> Self {
        let limit = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        Self::new(clock, limit)
    }

    pub fn is_expired(&self) -> bool {
        self.clock.now() >= self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_sub(self.start)
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_sub(self.clock.now())
    }

    pub fn limit(&self) -> Duration {
        self.deadline.saturating_sub(self.start)
    }

    /// Nested budget of at most `limit`, starting now and never outliving `self`.
    pub fn child(&self, limit: Duration) -> Budget {
        let start = self.clock.now();
        Budget {
            clock: self.clock.clone(),
            start,
            deadline: start.saturating_add(limit).min(self.deadline),
        }
    }

    /// `fraction` of the time left.
    pub fn share(&self, fraction: f64) -> Duration {
        scale(self.remaining(), fraction.clamp(0.0, 1.0))
    }

    /// Nested budget holding `fraction` of what is left.
    pub fn slice(&self, fraction: f64) -> Budget {
        self.child(self.share(fraction))
    }
}

/// `duration * factor`, saturating at `Duration::MAX`.
pub fn scale(duration: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor.max(0.0))
        .unwrap_or(Duration::MAX)
}
