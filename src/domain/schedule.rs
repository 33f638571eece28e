use serde::{Deserialize, Serialize};

use super::assignment::Assignment;
use super::ids::InstituteId;

/// The complete, feasible set of Assignments returned by one invocation
/// under one objective profile (Glossary: "Schedule").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub institute_id: InstituteId,
    pub semester: u32,
    pub assignments: Vec<Assignment>,
    /// Wall-clock creation instant, ISO-8601 formatted by the caller that
    /// stamps it; the engine core never calls `Utc::now()` itself so that
    /// invocations stay reproducible given a fixed snapshot and seed.
    pub created_at: String,
    pub is_optimized: bool,
    pub optimization_score: f64,
}

impl Schedule {
    pub fn assignments_for_course(&self, course_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.course_id == course_id)
            .collect()
    }

    pub fn assignments_for_faculty(&self, faculty_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.faculty_id == faculty_id)
            .collect()
    }

    pub fn assignments_for_room(&self, room_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.room_id == room_id)
            .collect()
    }
}
