//! Top-level invocation entry points (`spec.md` §5).
//!
//! `run_single_schedule` and `run_multi_schedule` are the two operations
//! the HTTP surface (`server.rs`) and any other caller drive. Both are
//! `async fn`s that dispatch the actual (CPU-bound, synchronous) solver
//! work via `tokio::task::spawn_blocking`, the same split the teacher's
//! `async fn solve_handler` makes around its synchronous `solver::solve`
//! call — generalized here to also bound the call with a caller-supplied
//! wall-clock cap via `tokio::time::timeout`.

use log::{info, warn};
use tokio::time::{timeout, Duration};

use crate::allocate::allocate;
use crate::domain::{FairnessHistory, Schedule, Snapshot};
use crate::error::{EngineError, EngineResult};
use crate::metrics::{calculate_metrics, OptimizationMetrics};
use crate::pareto::{run_pareto_sweep, ScheduleOption};
use crate::solver::{solve, SolveStatus};
use crate::validate::validate;

pub struct SingleScheduleResult {
    pub schedule: Schedule,
    pub metrics: OptimizationMetrics,
    pub fairness_history: FairnessHistory,
    pub optimization_time_s: f64,
}

pub struct MultiScheduleResult {
    pub options: Vec<ScheduleOption>,
    pub fairness_history: FairnessHistory,
}

/// Runs the allocator then the scheduler once, under `history`'s prior
/// state, and returns the resulting schedule plus the fairness history
/// updated with this run's satisfaction scores.
pub async fn run_single_schedule(
    snapshot: Snapshot,
    history: FairnessHistory,
) -> EngineResult<SingleScheduleResult> {
    let time_budget = Duration::from_secs(snapshot.config().max_optimization_time_s);
    match timeout(time_budget, run_single_schedule_inner(snapshot, history)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("single-schedule invocation exceeded its time budget with no feasible solution");
            Err(EngineError::SolverTimeout)
        }
    }
}

async fn run_single_schedule_inner(
    snapshot: Snapshot,
    history: FairnessHistory,
) -> EngineResult<SingleScheduleResult> {
    let (schedule, metrics, fairness_history, optimization_time_s) =
        tokio::task::spawn_blocking(move || -> EngineResult<_> {
            let config = snapshot.config();
            let validated = validate(&snapshot)?;
            let (bindings, fairness_history) = allocate(&validated, &config, history, snapshot.seed);
            let outcome = solve(&validated, &config, &bindings)?;

            info!(
                "single schedule built with {} assignments ({} elective bindings)",
                outcome.assignments.len(),
                bindings.total_allocations()
            );

            let schedule = Schedule {
                id: format!("{}-{}", snapshot.institute_id, snapshot.semester),
                institute_id: snapshot.institute_id.clone(),
                semester: snapshot.semester,
                assignments: outcome.assignments,
                created_at: String::new(),
                is_optimized: outcome.status == SolveStatus::Optimal,
                optimization_score: outcome.objective_value,
            };
            let metrics = calculate_metrics(&schedule, &snapshot, &bindings);
            Ok((schedule, metrics, fairness_history, outcome.optimization_time_s))
        })
        .await
        .map_err(|e| EngineError::Internal(format!("solver task panicked: {e}")))??;

    Ok(SingleScheduleResult {
        schedule,
        metrics,
        fairness_history,
        optimization_time_s,
    })
}

/// Runs the allocator once, then sweeps the fixed weight-profile roster
/// (`pareto.rs`) for up to `snapshot.num_options` schedules. The sweep
/// owns its own per-strategy deadline and already tolerates individual
/// strategy timeouts and failures, returning whatever variants finished
/// in time; this function only turns a wholly-empty sweep into an error
/// (`spec.md` §7: zero completed variants is fatal, one or more is not).
pub async fn run_multi_schedule(
    snapshot: Snapshot,
    history: FairnessHistory,
) -> EngineResult<MultiScheduleResult> {
    let config = snapshot.config();
    let max_solutions = snapshot.num_options.unwrap_or(5).max(1) as usize;

    let validated_snapshot = snapshot.clone();
    let (bindings, fairness_history) = tokio::task::spawn_blocking(move || -> EngineResult<_> {
        let validated = validate(&validated_snapshot)?;
        Ok(allocate(&validated, &config, history, validated_snapshot.seed))
    })
    .await
    .map_err(|e| EngineError::Internal(format!("allocator task panicked: {e}")))??;

    let options = run_pareto_sweep(snapshot, config, bindings, max_solutions).await?;
    if options.is_empty() {
        return Err(EngineError::InfeasibleHard(
            "no Pareto strategy produced a feasible schedule".to_string(),
        ));
    }
    Ok(MultiScheduleResult { options, fairness_history })
}
