//! Error taxonomy for the timetable engine.
//!
//! Every fatal condition named in the spec (§7) gets one variant here.
//! `error_class()` renders the stable machine-readable tag that the JSON
//! error result (`spec.md` §6) exposes to callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("empty input domain: {0}")]
    EmptyDomain(String),

    #[error("course {0} has no eligible faculty")]
    UnteachableCourse(String),

    #[error("course {0} has no suitable room")]
    UnhousableCourse(String),

    #[error("prerequisite cycle detected involving course {0}")]
    PrereqCycle(String),

    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("solver reported infeasible under hard constraints: {0}")]
    InfeasibleHard(String),

    #[error("solver exceeded its time budget with no feasible solution")]
    SolverTimeout,

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl EngineError {
    /// The stable tag surfaced in `{success=false, error_class, error}` results.
    pub fn error_class(&self) -> &'static str {
        match self {
            EngineError::EmptyDomain(_) => "EmptyDomain",
            EngineError::UnteachableCourse(_) => "UnteachableCourse",
            EngineError::UnhousableCourse(_) => "UnhousableCourse",
            EngineError::PrereqCycle(_) => "PrereqCycle",
            EngineError::OutOfRange(_) => "OutOfRange",
            EngineError::InfeasibleHard(_) => "InfeasibleHard",
            EngineError::SolverTimeout => "SolverTimeout",
            EngineError::Internal(_) => "Internal",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
