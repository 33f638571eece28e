use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::course::{Course, CourseType};
use super::ids::{RoomId, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Lecture,
    Lab,
    Seminar,
    Auditorium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub room_type: RoomType,
    pub capacity: u32,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub floor: i32,
    /// Slots the room is available at. An empty set means "no declared
    /// restriction" (available at every slot), matching the Python
    /// original's `available_slots: List[int] = field(default_factory=list)`.
    #[serde(default)]
    pub available_slots: HashSet<SlotId>,
    #[serde(default = "default_true")]
    pub is_accessible: bool,
}

fn default_true() -> bool {
    true
}

impl Room {
    pub fn can_accommodate(&self, student_count: u32) -> bool {
        student_count <= self.capacity
    }

    pub fn is_available_at(&self, slot: &str) -> bool {
        self.available_slots.is_empty() || self.available_slots.contains(slot)
    }

    /// Suitability rule from §4.1: a lab course requires a lab room; a
    /// theory course must not land in a lab room; every other pairing is
    /// fine as long as capacity suffices.
    pub fn is_suitable_for(&self, course: &Course) -> bool {
        match course.course_type {
            CourseType::Lab if self.room_type != RoomType::Lab => false,
            CourseType::Theory if self.room_type == RoomType::Lab => false,
            _ => self.capacity >= course.max_students_per_section,
        }
    }
}
