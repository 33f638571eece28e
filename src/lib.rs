//! University weekly timetable engine: a constraint-satisfaction
//! scheduler, a priority-based elective allocator, and a multi-objective
//! Pareto sweep over a fixed set of weight profiles, following the
//! teacher's `good_lp`/HiGHs ILP style (`solver.rs`) generalized to this
//! domain's four-subsystem pipeline.

pub mod allocate;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod interfaces;
pub mod metrics;
pub mod orchestrate;
pub mod pareto;
pub mod server;
pub mod solver;
pub mod validate;
pub mod variables;

#[cfg(test)]
pub mod test_support;

pub use error::{EngineError, EngineResult};
pub use orchestrate::{run_multi_schedule, run_single_schedule, MultiScheduleResult, SingleScheduleResult};
