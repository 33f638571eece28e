use serde::{Deserialize, Serialize};

use super::ids::{CourseId, FacultyId, RoomId, SectionId, SlotId};

/// A concrete placement of one course into one weekly slot with one
/// faculty and one room (Glossary: "Assignment").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub course_id: CourseId,
    pub faculty_id: FacultyId,
    pub room_id: RoomId,
    pub time_slot_id: SlotId,
    #[serde(default)]
    pub section_id: SectionId,
    #[serde(default)]
    pub student_count: u32,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub priority_score: f64,
}
