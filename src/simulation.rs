use log::info;

use crate::scheduler::{AdaptiveConfig, AdaptiveScheduler};
use crate::{Mode, SchedulingError, SimulationReport, Strategy, TaskSet, TaskStats, TimeStep};

/// Runs a fresh scheduler over `taskset` for `steps` time units.
pub fn simulate(
    taskset: &TaskSet,
    mode: Mode,
    config: AdaptiveConfig,
    steps: TimeStep,
) -> Result<SimulationReport, SchedulingError> {
    let mut scheduler = AdaptiveScheduler::new(taskset.instantiate(), mode, config)?;

    let timeline: Vec<_> = (0..steps).map(|_| scheduler.step()).collect();

    let report = SimulationReport {
        initial_mode: mode,
        final_mode: scheduler.mode(),
        switched_at: scheduler.switched_at(),
        timeline,
        misses: scheduler.history().flags().to_vec(),
        tasks: scheduler.tasks().iter().map(TaskStats::from).collect(),
        utilisation: taskset.utilisation(),
    };
    info!(
        "simulated {} steps: completed={} missed={} final mode {}",
        steps,
        report.total_completed(),
        report.total_missed(),
        report.final_mode
    );
    Ok(report)
}

/// Runs `strategy` on its own copy of the task set. Non-adaptive strategies
/// keep the window of `config` but never reach the threshold.
pub fn simulate_strategy(
    taskset: &TaskSet,
    strategy: Strategy,
    config: AdaptiveConfig,
    steps: TimeStep,
) -> Result<SimulationReport, SchedulingError> {
    let config = if strategy.adapts() {
        config
    } else {
        AdaptiveConfig {
            switch_threshold: usize::MAX,
            ..config
        }
    };
    simulate(taskset, strategy.initial_mode(), config, steps)
}

/// Runs every strategy on independent copies of the task set.
pub fn compare(
    taskset: &TaskSet,
    config: AdaptiveConfig,
    steps: TimeStep,
) -> Result<Vec<(Strategy, SimulationReport)>, SchedulingError> {
    Strategy::ALL
        .iter()
        .map(|&strategy| simulate_strategy(taskset, strategy, config, steps).map(|report| (strategy, report)))
        .collect()
}
