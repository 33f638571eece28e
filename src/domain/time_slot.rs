use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::ids::SlotId;

/// A single weekly time slot. `day` is 1..6 (Monday..Saturday), `period`
/// is 1..P within that day, matching `TimeSlot` in
/// `original_source/src/ml/data/models.py`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: SlotId,
    pub day: u8,
    pub period: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_break: bool,
    #[serde(default)]
    pub is_lunch: bool,
}

impl TimeSlot {
    pub fn is_teaching_slot(&self) -> bool {
        !self.is_break && !self.is_lunch
    }

    /// Two slots overlap only if they fall on the same day and their wall
    /// clock ranges intersect, mirroring `TimeSlot.overlaps_with`.
    pub fn overlaps_with(&self, other: &TimeSlot) -> bool {
        if self.day != other.day {
            return false;
        }
        !(self.end_time <= other.start_time || other.end_time <= self.start_time)
    }
}
