//! Collaborator interfaces (`spec.md` §6).
//!
//! `save_schedule` / `load_institute_data` / the FairnessHistory store are
//! named in the spec as out-of-scope collaborators — persistence is
//! explicitly not this crate's job. These traits exist so a caller can
//! wire in whatever storage it has without the engine core depending on
//! it; there is no concrete implementation here.

use async_trait::async_trait;

use crate::domain::{FairnessHistory, Schedule, Snapshot};
use crate::error::EngineResult;

#[async_trait]
pub trait SnapshotLoader: Send + Sync {
    async fn load_snapshot(&self, institute_id: &str, semester: u32) -> EngineResult<Snapshot>;
}

#[async_trait]
pub trait ScheduleSink: Send + Sync {
    async fn save_schedule(&self, schedule: &Schedule) -> EngineResult<()>;
}

#[async_trait]
pub trait FairnessStore: Send + Sync {
    async fn load_history(&self, institute_id: &str) -> EngineResult<FairnessHistory>;
    async fn save_history(&self, institute_id: &str, history: &FairnessHistory) -> EngineResult<()>;
}
