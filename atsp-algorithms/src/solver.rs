use crate::budget::{Budget, Clock, SystemClock};
use crate::checkpoint::explore;
use crate::confidence::analyze;
use crate::config::SolverConfig;
use crate::decision::{decide, fast_path_tour, Verdict};
use crate::problem::{relative_gap, Problem};
use crate::quality::Quality;
use crate::report::SolveReport;
use crate::strategy::{SolveContext, Strategy, StrategyKind};
use atsp_challenges::{verify_route, Instance, SolverResult};
use logging_timer::time;
use std::sync::Arc;

/// Reports skip the assignment bound above this size unless a phase already computed it.
pub const REPORT_BOUND_LIMIT: usize = 1000;

/// Confidence-driven solver: analyze, decide SI / SINO / NO, dispatch.
pub struct SiNoSolver {
    config: SolverConfig,
    clock: Arc<dyn Clock>,
}

impl SiNoSolver {
    pub fn new(config: SolverConfig) -> SolverResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: SolverConfig, clock: Arc<dyn Clock>) -> SolverResult<Self> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn budget(&self) -> Budget {
        Budget::from_secs(self.clock.clone(), self.config.time_budget)
    }

    pub fn problem(&self, instance: Instance) -> Problem {
        Problem::new(instance, self.config.candidate_list_size)
    }

    #[time]
    pub fn solve(&self, instance: Instance) -> SolverResult<SolveReport> {
        let budget = self.budget();
        if instance.size() <= 2 {
            return Ok(trivial_report(&instance));
        }
        let problem = self.problem(instance);
        let score = analyze(&problem);
        let decision = decide(&score, &self.config)?;

        let mut report = match (decision.verdict, decision.fast_path) {
            (Verdict::No, Some(structure)) => {
                let (route, cost) = fast_path_tour(&problem, structure, &budget);
                SolveReport::new(route, cost, format!("fast_path/{:?}", structure))
            }
            (Verdict::No, None) => self.run_strategy(&problem, &budget, StrategyKind::Basic),
            (Verdict::Si, _) => self.run_strategy(&problem, &budget, StrategyKind::Super),
            (Verdict::Sino, _) => {
                let exploration = explore(&problem, &budget, &self.config, score.value);
                let mut report = SolveReport::new(
                    exploration.route,
                    exploration.cost,
                    "checkpoint_exploration",
                );
                report.checkpoints = exploration.rounds;
                report
            }
        };
        report.decision = Some(decision);
        report.confidence = Some(score);
        self.finish(&problem, &budget, report)
    }

    /// Runs one strategy directly, bypassing the decision engine.
    pub fn solve_with_strategy(
        &self,
        instance: Instance,
        kind: StrategyKind,
    ) -> SolverResult<SolveReport> {
        let budget = self.budget();
        if instance.size() <= 2 {
            return Ok(trivial_report(&instance));
        }
        let problem = self.problem(instance);
        let report = self.run_strategy(&problem, &budget, kind);
        self.finish(&problem, &budget, report)
    }

    pub(crate) fn run_strategy(
        &self,
        problem: &Problem,
        budget: &Budget,
        kind: StrategyKind,
    ) -> SolveReport {
        let ctx = SolveContext {
            problem,
            config: &self.config,
            budget,
        };
        let outcome = kind.solve(&ctx);
        let mut report = SolveReport::new(outcome.route, outcome.cost, outcome.algorithm);
        report.strategy = Some(kind);
        report.runs = outcome.runs;
        report.unique_tours = outcome.unique_tours;
        report.super_phase = outcome.super_phase;
        report
    }

    /// Fills in bound, gap, quality and wall time, and re-checks the tour.
    pub(crate) fn finish(
        &self,
        problem: &Problem,
        budget: &Budget,
        mut report: SolveReport,
    ) -> SolverResult<SolveReport> {
        verify_route(&report.tour, problem.size())?;
        report.cost = problem.route_cost(&report.tour);
        let n = problem.size();
        let lower_bound = if n <= REPORT_BOUND_LIMIT {
            Some(problem.lower_bound())
        } else {
            problem.cached_lower_bound()
        };
        if let Some(lower_bound) = lower_bound {
            let gap = relative_gap(report.cost, lower_bound);
            report.lower_bound = Some(lower_bound);
            report.gap = Some(gap);
            report.quality = Some(Quality::classify(gap, n));
        }
        report.wall_time = budget.elapsed().as_secs_f64();
        log::info!(
            "solved {} nodes with {}: cost {:.4}, gap {}, {:.3}s",
            n,
            report.algorithm,
            report.cost,
            report
                .gap
                .map_or_else(|| "n/a".to_string(), |g| format!("{:.2}%", g * 100.0)),
            report.wall_time
        );
        Ok(report)
    }
}

/// N <= 2 has a single tour up to rotation.
pub fn trivial_report(instance: &Instance) -> SolveReport {
    let route: Vec<usize> = (0..instance.size()).collect();
    let cost = instance.matrix.route_cost(&route);
    let mut report = SolveReport::new(route, cost, "trivial");
    report.lower_bound = Some(cost);
    report.gap = Some(0.0);
    report.quality = Some(Quality::Excellent);
    report
}
