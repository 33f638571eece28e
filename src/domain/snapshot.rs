use serde::{Deserialize, Serialize};

use super::config::OptimizationConfig;
use super::course::Course;
use super::faculty::Faculty;
use super::ids::{DepartmentId, InstituteId, SectionId, StudentId};
use super::room::Room;
use super::student::Student;
use super::time_slot::TimeSlot;

/// The immutable input bundle for one invocation (Glossary: "Snapshot").
/// Ingested once by the orchestrator; every downstream component borrows
/// an immutable view of it (§3 "Ownership & lifecycle").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub institute_id: InstituteId,
    pub semester: u32,
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub faculty: Vec<Faculty>,
    pub rooms: Vec<Room>,
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub config: Option<OptimizationConfig>,
    #[serde(default)]
    pub num_options: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Snapshot {
    pub fn config(&self) -> OptimizationConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Carried from the original's `models.py` for the metrics evaluator's
/// per-department breakdowns (§4.7); unreferenced by the solver or
/// allocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub core_courses: Vec<String>,
    #[serde(default)]
    pub elective_courses: Vec<String>,
}

/// Carried from the original's `models.py`; a student's `section` field
/// (§3) already identifies this grouping for scheduling purposes, so
/// `Section` itself is descriptive metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub department_id: DepartmentId,
    pub semester: u32,
    #[serde(default)]
    pub student_ids: Vec<StudentId>,
    #[serde(default = "default_max_students")]
    pub max_students: u32,
}

fn default_max_students() -> u32 {
    60
}
