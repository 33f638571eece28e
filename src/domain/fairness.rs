use std::collections::HashMap;
use std::collections::VecDeque;

use super::ids::StudentId;

/// Ring-buffer length cap for per-student history, per §3.
pub const HISTORY_CAPACITY: usize = 5;

/// Process-wide (but never globally mutable — see `spec.md` §9) mapping
/// from student id to a bounded ring of past satisfaction scores. Owned
/// by the caller across invocations; the engine only ever reads it at
/// entry and returns an updated value at exit via [`update_history`].
#[derive(Debug, Clone, Default)]
pub struct FairnessHistory {
    entries: HashMap<StudentId, VecDeque<f64>>,
}

impl FairnessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scores_for(&self, student_id: &str) -> &[f64] {
        self.entries
            .get(student_id)
            .map(|ring| ring.as_slices().0)
            .unwrap_or(&[])
    }

    /// Mean of a student's stored history, or `0.5` if absent — the
    /// neutral prior from §4.6 step 1.
    pub fn historical_satisfaction(&self, student_id: &str) -> f64 {
        match self.entries.get(student_id) {
            Some(ring) if !ring.is_empty() => ring.iter().sum::<f64>() / ring.len() as f64,
            _ => 0.5,
        }
    }

    fn push(&mut self, student_id: &str, score: f64) {
        let ring = self
            .entries
            .entry(student_id.to_string())
            .or_insert_with(VecDeque::new);
        ring.push_back(score);
        while ring.len() > HISTORY_CAPACITY {
            ring.pop_front();
        }
    }
}

/// Pure update function: append each student's new satisfaction score to
/// the history and return the updated structure, trimming to
/// [`HISTORY_CAPACITY`] entries (§4.6 step 4, §9's "no global singletons"
/// re-architecture, §5's "pure function ... does not own the container").
pub fn update_history(
    mut history: FairnessHistory,
    new_scores: &HashMap<StudentId, f64>,
) -> FairnessHistory {
    for (student_id, score) in new_scores {
        history.push(student_id, *score);
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_neutral_prior() {
        let history = FairnessHistory::new();
        assert_eq!(history.historical_satisfaction("nobody"), 0.5);
    }

    #[test]
    fn ring_is_capped_and_fifo() {
        let mut history = FairnessHistory::new();
        let mut scores = HashMap::new();
        for i in 0..8 {
            scores.insert("s1".to_string(), i as f64 / 10.0);
            history = update_history(history, &scores);
        }
        assert_eq!(history.scores_for("s1").len(), HISTORY_CAPACITY);
        // the earliest three pushes (0.0, 0.1, 0.2) should have fallen off
        assert!(history.scores_for("s1").iter().all(|&s| s >= 0.3));
    }
}
