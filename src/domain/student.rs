use serde::{Deserialize, Serialize};

use super::ids::{CourseId, StudentId};

/// Default ceiling on preference rank (`P_max` in the glossary).
pub const DEFAULT_P_MAX: u32 = 5;

/// A single ranked elective preference. `preference_score` is the
/// `rank_weight` from §4.3/Glossary, computed eagerly so callers never
/// have to recompute it: `max(0, P_max + 1 - priority) / P_max`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPreference {
    pub course_id: CourseId,
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference_score: Option<f64>,
}

impl StudentPreference {
    pub fn rank_weight(&self, p_max: u32) -> f64 {
        if let Some(score) = self.preference_score {
            return score;
        }
        rank_weight(self.priority, p_max)
    }
}

/// `rank_weight(p) = max(0, (P_max + 1 - p)) / P_max`, per §4.3/Glossary.
pub fn rank_weight(priority: u32, p_max: u32) -> f64 {
    if p_max == 0 {
        return 0.0;
    }
    let numerator = (p_max as i64 + 1 - priority as i64).max(0);
    numerator as f64 / p_max as f64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    #[serde(default)]
    pub name: String,
    /// The original dataclass's redundant `student_id` field, kept under a
    /// name that does not collide with the primary `id`.
    #[serde(default)]
    pub student_number: String,
    pub department: String,
    pub semester: u32,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub preferences: Vec<StudentPreference>,
    #[serde(default = "default_max_courses")]
    pub max_courses: u32,
    /// Populated post-allocation (§3: "Holds a mutable satisfaction score").
    #[serde(default)]
    pub satisfaction_score: f64,
}

fn default_max_courses() -> u32 {
    8
}

impl Student {
    pub fn preference_for(&self, course_id: &str) -> Option<&StudentPreference> {
        self.preferences.iter().find(|p| p.course_id == course_id)
    }

    /// Preferences ranked 1..k must have unique, contiguous priorities
    /// starting at 1 (§3 invariant).
    pub fn has_contiguous_priorities(&self) -> bool {
        if self.preferences.is_empty() {
            return true;
        }
        let mut priorities: Vec<u32> = self.preferences.iter().map(|p| p.priority).collect();
        priorities.sort_unstable();
        priorities
            .iter()
            .enumerate()
            .all(|(i, &p)| p == (i as u32) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_weight_matches_glossary_examples() {
        assert!((rank_weight(1, 5) - 1.0).abs() < 1e-9);
        assert!((rank_weight(5, 5) - 0.2).abs() < 1e-9);
        assert!((rank_weight(3, 5) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn contiguous_priorities_detects_gaps() {
        let mut student = Student {
            id: "s1".into(),
            name: String::new(),
            student_number: String::new(),
            department: "CS".into(),
            semester: 1,
            section: "A".into(),
            preferences: vec![
                StudentPreference {
                    course_id: "c1".into(),
                    priority: 1,
                    preference_score: None,
                },
                StudentPreference {
                    course_id: "c2".into(),
                    priority: 3,
                    preference_score: None,
                },
            ],
            max_courses: 8,
            satisfaction_score: 0.0,
        };
        assert!(!student.has_contiguous_priorities());
        student.preferences[1].priority = 2;
        assert!(student.has_contiguous_priorities());
    }
}
