use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::ids::{CourseId, FacultyId, SlotId};

/// A faculty member, per §3. `availability` maps day -> set of slot ids
/// they can teach at, mirroring `Faculty.availability: Dict[int, List[int]]`
/// in `original_source/src/ml/data/models.py`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub teachable_courses: HashSet<CourseId>,
    #[serde(default)]
    pub availability: HashMap<u32, HashSet<SlotId>>,
    #[serde(default = "default_max_hours_per_day")]
    pub max_hours_per_day: u32,
    #[serde(default = "default_max_hours_per_week")]
    pub max_hours_per_week: u32,
    #[serde(default = "default_workload_weight")]
    pub workload_balance_weight: f64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_max_hours_per_day() -> u32 {
    6
}

fn default_max_hours_per_week() -> u32 {
    30
}

fn default_workload_weight() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Faculty {
    pub fn can_teach(&self, course_id: &str) -> bool {
        self.teachable_courses.contains(course_id)
    }

    /// Whether this faculty member can be scheduled at `slot`, considering
    /// the per-day availability map. An empty `availability` means the
    /// faculty member declared no constraints and is available everywhere,
    /// matching `Faculty.is_available_at_slot` which only returns `false`
    /// when the slot is absent from every day's list.
    pub fn is_available_at(&self, slot: &str) -> bool {
        if !self.is_available {
            return false;
        }
        if self.availability.is_empty() {
            return true;
        }
        self.availability.values().any(|slots| slots.contains(slot))
    }
}
