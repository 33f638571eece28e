//! HTTP surface (`spec.md` §6).
//!
//! Two routes, following the teacher's `server.rs` shape exactly: parse
//! the request body, call into the engine, map the result to a JSON
//! response or a JSON error body. `EngineError` variants map to distinct
//! status codes instead of the teacher's blanket `BAD_REQUEST`, since this
//! domain's error taxonomy is closed and callers branch on `error_class`.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::domain::{Assignment, FairnessHistory, Snapshot};
use crate::error::EngineError;
use crate::orchestrate::{run_multi_schedule, run_single_schedule, SingleScheduleResult};
use crate::pareto::ScheduleOption;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleScheduleRequest {
    pub snapshot: Snapshot,
    #[serde(default)]
    pub fairness_history: FairnessHistorySnapshot,
}

/// Wire shape for a caller-supplied fairness history: student id -> the
/// bounded ring of past satisfaction scores, oldest first.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FairnessHistorySnapshot {
    #[serde(default)]
    pub scores: std::collections::HashMap<String, Vec<f64>>,
}

/// Flat single-schedule result shape (`spec.md` §6): the caller-facing
/// contract reports scalar metrics and the assignment list directly
/// rather than nesting a `Schedule`/`OptimizationMetrics` pair.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleScheduleResponse {
    pub success: bool,
    pub schedule_id: String,
    pub institute_id: String,
    pub semester: u32,
    pub total_assignments: usize,
    pub assignments: Vec<Assignment>,
    pub optimization_time_s: f64,
    pub student_satisfaction: f64,
    pub faculty_workload_balance: f64,
    pub room_utilization: f64,
    pub elective_allocation_rate: f64,
    pub constraint_violations: u32,
    pub is_feasible: bool,
}

impl From<SingleScheduleResult> for SingleScheduleResponse {
    fn from(result: SingleScheduleResult) -> Self {
        SingleScheduleResponse {
            success: true,
            schedule_id: result.schedule.id,
            institute_id: result.schedule.institute_id,
            semester: result.schedule.semester,
            total_assignments: result.metrics.total_assignments,
            assignments: result.schedule.assignments,
            optimization_time_s: result.optimization_time_s,
            student_satisfaction: result.metrics.student_satisfaction,
            faculty_workload_balance: result.metrics.faculty_workload_balance,
            room_utilization: result.metrics.room_utilization,
            elective_allocation_rate: result.metrics.elective_allocation_rate,
            constraint_violations: result.metrics.constraint_violations,
            is_feasible: result.metrics.is_feasible,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoOption {
    pub option_id: u32,
    pub name: String,
    pub description: String,
    pub metrics: ParetoMetrics,
    pub assignments_count: usize,
    pub is_feasible: bool,
    pub quality_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoMetrics {
    pub student_satisfaction: f64,
    pub faculty_workload_balance: f64,
    pub room_utilization: f64,
    pub elective_allocation_rate: f64,
    pub constraint_violations: u32,
    pub optimization_time_s: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoResponse {
    pub total_options: usize,
    pub schedules: Vec<ParetoOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error_class: String,
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn map_error(err: EngineError) -> ApiError {
    let status = match &err {
        EngineError::EmptyDomain(_)
        | EngineError::UnteachableCourse(_)
        | EngineError::UnhousableCourse(_)
        | EngineError::PrereqCycle(_)
        | EngineError::OutOfRange(_)
        | EngineError::InfeasibleHard(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::SolverTimeout => StatusCode::GATEWAY_TIMEOUT,
        EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorBody {
        success: false,
        error_class: err.error_class().to_string(),
        error: err.to_string(),
    };
    (status, Json(body))
}

async fn solve_handler(Json(req): Json<SingleScheduleRequest>) -> Result<Json<SingleScheduleResponse>, ApiError> {
    let history = into_fairness_history(req.fairness_history);
    match run_single_schedule(req.snapshot, history).await {
        Ok(result) => Ok(Json(result.into())),
        Err(e) => Err(map_error(e)),
    }
}

async fn solve_pareto_handler(Json(req): Json<SingleScheduleRequest>) -> Result<Json<ParetoResponse>, ApiError> {
    let history = into_fairness_history(req.fairness_history);
    match run_multi_schedule(req.snapshot, history).await {
        Ok(result) => Ok(Json(ParetoResponse {
            total_options: result.options.len(),
            schedules: result.options.into_iter().map(to_pareto_option).collect(),
        })),
        Err(e) => Err(map_error(e)),
    }
}

fn to_pareto_option(option: ScheduleOption) -> ParetoOption {
    ParetoOption {
        option_id: option.option_id,
        name: option.strategy.name().to_string(),
        description: option.strategy.description().to_string(),
        assignments_count: option.schedule.assignments.len(),
        is_feasible: option.metrics.is_feasible,
        quality_score: option.quality_score,
        metrics: ParetoMetrics {
            student_satisfaction: option.metrics.student_satisfaction,
            faculty_workload_balance: option.metrics.faculty_workload_balance,
            room_utilization: option.metrics.room_utilization,
            elective_allocation_rate: option.metrics.elective_allocation_rate,
            constraint_violations: option.metrics.constraint_violations,
            optimization_time_s: option.optimization_time_s,
        },
    }
}

fn into_fairness_history(snapshot: FairnessHistorySnapshot) -> FairnessHistory {
    let mut history = FairnessHistory::new();
    let max_len = snapshot.scores.values().map(Vec::len).max().unwrap_or(0);
    for i in 0..max_len {
        let mut round = std::collections::HashMap::new();
        for (student_id, scores) in &snapshot.scores {
            if let Some(&score) = scores.get(i) {
                round.insert(student_id.clone(), score);
            }
        }
        history = crate::domain::update_history(history, &round);
    }
    history
}

pub async fn run_server() {
    let app = Router::new()
        .route("/v1/schedule/solve", post(solve_handler))
        .route("/v1/schedule/solve/pareto", post(solve_pareto_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.unwrap();
    log::info!("server running at http://{}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
