//! Metrics and fairness evaluator (`spec.md` §4.7).
//!
//! Grounded on `original_source/src/ml/evaluation/metrics.py`'s
//! `MetricsCalculator`, one function per original method. The room
//! utilization divisor uses the snapshot's actual teaching-slot count
//! rather than the original's hardcoded `40`, since this crate already
//! carries that count on every [`Snapshot`] it evaluates.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::allocate::AllocationResult;
use crate::domain::{Faculty, Room, Schedule, Snapshot, Student, TimeSlot};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationMetrics {
    pub total_assignments: usize,
    pub is_feasible: bool,
    pub student_satisfaction: f64,
    pub faculty_workload_balance: f64,
    pub room_utilization: f64,
    pub elective_allocation_rate: f64,
    pub constraint_violations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMetrics {
    pub student_count: usize,
    pub course_count: usize,
    pub assignment_count: usize,
    pub satisfaction_score: f64,
    pub elective_assignments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub overall_metrics: OptimizationMetrics,
    pub department_breakdown: HashMap<String, DepartmentMetrics>,
    pub time_slot_utilization: HashMap<String, u32>,
    pub recommendations: Vec<String>,
}

pub fn calculate_metrics(
    schedule: &Schedule,
    snapshot: &Snapshot,
    bindings: &AllocationResult,
) -> OptimizationMetrics {
    info!("calculating optimization metrics");
    let metrics = OptimizationMetrics {
        total_assignments: schedule.assignments.len(),
        is_feasible: true,
        student_satisfaction: calculate_student_satisfaction(&snapshot.students, bindings),
        faculty_workload_balance: calculate_faculty_workload_balance(&snapshot.faculty, schedule),
        room_utilization: calculate_room_utilization(&snapshot.rooms, schedule, snapshot.time_slots.len()),
        elective_allocation_rate: calculate_elective_allocation_rate(&snapshot.students, bindings),
        constraint_violations: count_constraint_violations(schedule),
    };
    info!(
        "metrics calculated: satisfaction={:.3}, workload_balance={:.3}, room_utilization={:.3}",
        metrics.student_satisfaction, metrics.faculty_workload_balance, metrics.room_utilization
    );
    metrics
}

/// Mean of the allocator's own per-student satisfaction scores
/// (`AllocationResult::satisfaction`, `allocate.rs`'s `compute_satisfaction`)
/// rather than a re-derivation from the schedule's course-level
/// assignments: a course appearing in a student's preference list and
/// also appearing somewhere in the schedule does not mean *that student*
/// was allocated it (`spec.md` §8 Concrete Scenario 2 — students sharing
/// an identical preference list must still get distinct, rank-specific
/// satisfaction scores).
fn calculate_student_satisfaction(students: &[Student], bindings: &AllocationResult) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    let total: f64 = students
        .iter()
        .map(|s| bindings.satisfaction.get(&s.id).copied().unwrap_or(0.0))
        .sum();
    total / students.len() as f64
}

/// `1 - std_dev / mean` balance score, matching the original's variance
/// computation over per-faculty assignment counts.
fn calculate_faculty_workload_balance(faculty: &[Faculty], schedule: &Schedule) -> f64 {
    if faculty.is_empty() {
        return 0.0;
    }
    let workloads: Vec<f64> = faculty
        .iter()
        .map(|f| schedule.assignments_for_faculty(&f.id).len() as f64)
        .collect();
    let avg_workload = workloads.iter().sum::<f64>() / workloads.len() as f64;
    if avg_workload == 0.0 {
        return 1.0;
    }
    let variance = workloads.iter().map(|w| (w - avg_workload).powi(2)).sum::<f64>() / workloads.len() as f64;
    let std_dev = variance.sqrt();
    (1.0 - std_dev / avg_workload).max(0.0)
}

fn calculate_room_utilization(rooms: &[Room], schedule: &Schedule, teaching_slot_count: usize) -> f64 {
    if rooms.is_empty() || teaching_slot_count == 0 {
        return 0.0;
    }
    let total: f64 = rooms
        .iter()
        .map(|r| {
            let used = schedule.assignments_for_room(&r.id).len() as f64;
            (used / teaching_slot_count as f64).min(1.0)
        })
        .sum();
    total / rooms.len() as f64
}

/// `(Σ students of successful allocations) / (Σ students of preference
/// count)` per `spec.md` §4.7, read straight from the allocator's own
/// bindings rather than re-derived from the schedule (see
/// `calculate_student_satisfaction`'s doc comment for why that
/// re-derivation over-counts).
fn calculate_elective_allocation_rate(students: &[Student], bindings: &AllocationResult) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    let mut total_requests = 0usize;
    let mut successful = 0usize;
    for student in students {
        total_requests += student.preferences.len();
        successful += bindings.allocations.get(&student.id).map(Vec::len).unwrap_or(0);
    }
    if total_requests == 0 {
        0.0
    } else {
        successful as f64 / total_requests as f64
    }
}

/// Counts double-booked (faculty, slot) and (room, slot) pairs.
fn count_constraint_violations(schedule: &Schedule) -> u32 {
    let mut violations = 0u32;
    let mut faculty_slots: HashMap<(&str, &str), ()> = HashMap::new();
    for a in &schedule.assignments {
        if faculty_slots.insert((a.faculty_id.as_str(), a.time_slot_id.as_str()), ()).is_some() {
            violations += 1;
        }
    }
    let mut room_slots: HashMap<(&str, &str), ()> = HashMap::new();
    for a in &schedule.assignments {
        if room_slots.insert((a.room_id.as_str(), a.time_slot_id.as_str()), ()).is_some() {
            violations += 1;
        }
    }
    violations
}

pub fn calculate_department_metrics(
    schedule: &Schedule,
    snapshot: &Snapshot,
    bindings: &AllocationResult,
) -> HashMap<String, DepartmentMetrics> {
    let mut dept_students: HashMap<String, Vec<&Student>> = HashMap::new();
    for student in &snapshot.students {
        dept_students.entry(student.department.clone()).or_default().push(student);
    }

    let mut result = HashMap::new();
    for (dept, students) in dept_students {
        let dept_courses = snapshot.courses.iter().filter(|c| c.department == dept).count();
        let dept_assignments: Vec<&crate::domain::Assignment> = schedule
            .assignments
            .iter()
            .filter(|a| a.section_id.to_lowercase().contains(&dept.to_lowercase()))
            .collect();
        let owned_students: Vec<Student> = students.iter().map(|s| (*s).clone()).collect();
        let satisfaction = calculate_student_satisfaction(&owned_students, bindings);
        result.insert(
            dept.clone(),
            DepartmentMetrics {
                student_count: students.len(),
                course_count: dept_courses,
                assignment_count: dept_assignments.len(),
                satisfaction_score: satisfaction,
                elective_assignments: dept_assignments.iter().filter(|a| a.is_elective).count(),
            },
        );
    }
    result
}

pub fn calculate_time_slot_utilization(schedule: &Schedule, time_slots: &[TimeSlot]) -> HashMap<String, u32> {
    let mut utilization: HashMap<String, u32> = time_slots.iter().map(|t| (t.id.clone(), 0)).collect();
    for a in &schedule.assignments {
        if let Some(count) = utilization.get_mut(&a.time_slot_id) {
            *count += 1;
        }
    }
    utilization
}

pub fn generate_optimization_report(
    metrics: OptimizationMetrics,
    department_breakdown: HashMap<String, DepartmentMetrics>,
    time_slot_utilization: HashMap<String, u32>,
) -> OptimizationReport {
    let recommendations = generate_recommendations(&metrics);
    OptimizationReport {
        overall_metrics: metrics,
        department_breakdown,
        time_slot_utilization,
        recommendations,
    }
}

fn generate_recommendations(metrics: &OptimizationMetrics) -> Vec<String> {
    let mut recommendations = Vec::new();
    if metrics.student_satisfaction < 0.7 {
        recommendations.push("Consider increasing elective course capacity to improve student satisfaction".to_string());
    }
    if metrics.faculty_workload_balance < 0.6 {
        recommendations.push("Faculty workload is imbalanced - consider redistributing assignments".to_string());
    }
    if metrics.room_utilization < 0.5 {
        recommendations.push("Room utilization is low - consider consolidating classes or adding more courses".to_string());
    }
    if metrics.elective_allocation_rate < 0.8 {
        recommendations.push("Elective allocation rate is low - consider adding more elective options".to_string());
    }
    if metrics.constraint_violations > 0 {
        recommendations.push(format!(
            "Found {} constraint violations - review schedule",
            metrics.constraint_violations
        ));
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Assignment;
    use crate::test_support::trivial_snapshot;
    use assert_float_eq::assert_float_absolute_eq;

    fn schedule_with(assignments: Vec<Assignment>) -> Schedule {
        Schedule {
            id: "sched1".into(),
            institute_id: "inst1".into(),
            semester: 1,
            assignments,
            created_at: "2026-01-01T00:00:00Z".into(),
            is_optimized: true,
            optimization_score: 0.0,
        }
    }

    #[test]
    fn perfect_balance_when_no_faculty_assigned() {
        let snapshot = trivial_snapshot();
        let schedule = schedule_with(Vec::new());
        let balance = calculate_faculty_workload_balance(&snapshot.faculty, &schedule);
        assert_float_absolute_eq!(balance, 1.0, 1e-9);
    }

    #[test]
    fn room_utilization_uses_actual_slot_count_not_forty() {
        let snapshot = trivial_snapshot();
        let schedule = schedule_with(vec![Assignment {
            course_id: "c1".into(),
            faculty_id: "f1".into(),
            room_id: "r1".into(),
            time_slot_id: "t1".into(),
            section_id: String::new(),
            student_count: 10,
            is_elective: false,
            priority_score: 0.0,
        }]);
        let utilization = calculate_room_utilization(&snapshot.rooms, &schedule, snapshot.time_slots.len());
        // trivial_snapshot has 2 teaching slots, 1 used -> 0.5, not 1/40.
        assert_float_absolute_eq!(utilization, 0.5, 1e-9);
    }

    #[test]
    fn double_booked_faculty_counts_as_violation() {
        let assignments = vec![
            Assignment {
                course_id: "c1".into(),
                faculty_id: "f1".into(),
                room_id: "r1".into(),
                time_slot_id: "t1".into(),
                section_id: String::new(),
                student_count: 10,
                is_elective: false,
                priority_score: 0.0,
            },
            Assignment {
                course_id: "c2".into(),
                faculty_id: "f1".into(),
                room_id: "r2".into(),
                time_slot_id: "t1".into(),
                section_id: String::new(),
                student_count: 10,
                is_elective: false,
                priority_score: 0.0,
            },
        ];
        let schedule = schedule_with(assignments);
        assert_eq!(count_constraint_violations(&schedule), 1);
    }

    /// Regression for `spec.md` §8 Concrete Scenario 2: two students who
    /// share the exact same preference list must still score
    /// rank-specific satisfaction from their own allocator bindings, not a
    /// blanket credit for every scheduled course that merely appears
    /// somewhere in their preference list.
    #[test]
    fn satisfaction_follows_allocator_bindings_not_shared_preference_lists() {
        let mut snapshot = trivial_snapshot();
        snapshot.students = vec![
            {
                let mut s = snapshot.students[0].clone();
                s.id = "s1".into();
                s.preferences = vec![
                    crate::domain::StudentPreference {
                        course_id: "CS304".into(),
                        priority: 1,
                        preference_score: None,
                    },
                    crate::domain::StudentPreference {
                        course_id: "CS305".into(),
                        priority: 2,
                        preference_score: None,
                    },
                ];
                s
            },
            {
                let mut s = snapshot.students[0].clone();
                s.id = "s2".into();
                s.preferences = vec![
                    crate::domain::StudentPreference {
                        course_id: "CS304".into(),
                        priority: 1,
                        preference_score: None,
                    },
                    crate::domain::StudentPreference {
                        course_id: "CS305".into(),
                        priority: 2,
                        preference_score: None,
                    },
                ];
                s
            },
        ];

        // Both CS304 and CS305 get scheduled (the schedule alone can't
        // distinguish who was allocated which), but the allocator only
        // ever bound s1 to CS304 (rank 1) and s2 to CS305 (rank 2).
        let schedule = schedule_with(vec![
            Assignment {
                course_id: "CS304".into(),
                faculty_id: "f1".into(),
                room_id: "r1".into(),
                time_slot_id: "t1".into(),
                section_id: String::new(),
                student_count: 1,
                is_elective: true,
                priority_score: 0.0,
            },
            Assignment {
                course_id: "CS305".into(),
                faculty_id: "f1".into(),
                room_id: "r1".into(),
                time_slot_id: "t2".into(),
                section_id: String::new(),
                student_count: 1,
                is_elective: true,
                priority_score: 0.0,
            },
        ]);

        let mut bindings = crate::allocate::AllocationResult::default();
        bindings.allocations.insert("s1".into(), vec!["CS304".into()]);
        bindings.allocations.insert("s2".into(), vec!["CS305".into()]);
        bindings.satisfaction.insert("s1".into(), 1.0);
        bindings.satisfaction.insert("s2".into(), 0.8);

        let metrics = calculate_metrics(&schedule, &snapshot, &bindings);
        assert_float_absolute_eq!(metrics.student_satisfaction, 0.9, 1e-9);
        assert_float_absolute_eq!(metrics.elective_allocation_rate, 1.0, 1e-9);
    }
}
