use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ids::CourseId;

/// Course type, per §3. Determines room suitability (§4.1) and which
/// objective terms a course contributes to (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Theory,
    Lab,
    Project,
    Elective,
    Interdisciplinary,
}

/// Subjective course difficulty. Carried from the original dataclass for
/// completeness; no constraint or objective term reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub course_code: String,
    pub course_type: CourseType,
    pub department: String,
    pub semester: u32,
    pub credits: u32,
    pub hours_per_week: u32,
    #[serde(default = "default_max_students_per_section")]
    pub max_students_per_section: u32,
    #[serde(default = "default_max_sections")]
    pub max_sections: u32,
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    #[serde(default)]
    pub prerequisites: HashSet<CourseId>,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub elective_capacity: u32,
    #[serde(default = "default_true")]
    pub is_nep_compliant: bool,
}

fn default_max_students_per_section() -> u32 {
    60
}

fn default_max_sections() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Course {
    pub fn is_interdisciplinary(&self) -> bool {
        self.course_type == CourseType::Interdisciplinary
    }
}
