//! Variable builder (`spec.md` §4.2).
//!
//! Enumerates the sparse boolean decision space the scheduler reasons
//! over, restricted to the feasible triples/tuples implied by the
//! validator's indices — never the naive cartesian product (`spec.md` §9,
//! "decision-variable explosion"). Mirrors the teacher's
//! `assignment_vars_map: HashMap<(CourseId, RoomId, Timeslot), Variable>`
//! pattern in `solver.rs`, generalized to the 4-tuple this domain needs.

use std::collections::HashMap;

use good_lp::{variable, ProblemVariables, Variable};

use crate::domain::{CourseId, FacultyId, RoomId, SlotId, StudentId};
use crate::validate::ValidatedSnapshot;

pub type AssignKey = (FacultyId, CourseId, RoomId, SlotId);
pub type ElectiveKey = (StudentId, CourseId);

/// The full decision-variable space for one solver session, plus the
/// auxiliary variables the soft-constraint/objective builder (§4.3) and
/// hard-constraint encoder (§4.4) need.
pub struct DecisionVariables {
    pub problem: ProblemVariables,
    /// `assign[f,c,r,t]`.
    pub assign: HashMap<AssignKey, Variable>,
    /// `elective_assign[s,c]`, one per (student, elective course) pair
    /// that appears in the student's preference list.
    pub elective_assign: HashMap<ElectiveKey, Variable>,
    /// `course_scheduled[c]` auxiliary indicator.
    pub course_scheduled: HashMap<CourseId, Variable>,
    /// Per-faculty weekly workload count (aux integer variable).
    pub faculty_workload: HashMap<FacultyId, Variable>,
    /// Per-room utilization count (aux integer variable).
    pub room_utilization: HashMap<RoomId, Variable>,
    /// Mean faculty workload (continuous, linked by `mean * |F| = sum(workload)`).
    pub workload_mean: Variable,
    /// Per-faculty absolute deviation from the mean workload (continuous, >= 0),
    /// whose sum stands in for the variance term in §4.3 — the standard
    /// linear-program encoding of mean absolute deviation.
    pub workload_deviation: HashMap<FacultyId, Variable>,
    /// Per-student satisfaction score in [0, 1] (aux continuous variable).
    pub student_satisfaction: HashMap<StudentId, Variable>,
}

pub fn build(validated: &ValidatedSnapshot) -> DecisionVariables {
    let snapshot = validated.snapshot;
    let mut problem = ProblemVariables::new();

    let mut assign: HashMap<AssignKey, Variable> = HashMap::new();
    for course in &snapshot.courses {
        let faculty_ids = validated
            .teachable_by
            .get(&course.id)
            .cloned()
            .unwrap_or_default();
        let room_ids = validated
            .housed_by
            .get(&course.id)
            .cloned()
            .unwrap_or_default();
        for faculty in &snapshot.faculty {
            if !faculty_ids.contains(&faculty.id) {
                continue;
            }
            for room in &snapshot.rooms {
                if !room_ids.contains(&room.id) {
                    continue;
                }
                for slot in &snapshot.time_slots {
                    if !slot.is_teaching_slot() {
                        continue;
                    }
                    if !faculty.is_available_at(&slot.id) || !room.is_available_at(&slot.id) {
                        continue;
                    }
                    let key = (faculty.id.clone(), course.id.clone(), room.id.clone(), slot.id.clone());
                    assign.insert(key, problem.add(variable().binary()));
                }
            }
        }
    }

    let mut elective_assign: HashMap<ElectiveKey, Variable> = HashMap::new();
    for student in &snapshot.students {
        for pref in &student.preferences {
            if let Some(course) = snapshot.courses.iter().find(|c| c.id == pref.course_id) {
                if course.is_elective {
                    let key = (student.id.clone(), course.id.clone());
                    elective_assign
                        .entry(key)
                        .or_insert_with(|| problem.add(variable().binary()));
                }
            }
        }
    }

    let course_scheduled: HashMap<CourseId, Variable> = snapshot
        .courses
        .iter()
        .map(|c| (c.id.clone(), problem.add(variable().binary())))
        .collect();

    let max_week_bound = (snapshot.time_slots.len() as f64).max(1.0);
    let faculty_workload: HashMap<FacultyId, Variable> = snapshot
        .faculty
        .iter()
        .map(|f| {
            (
                f.id.clone(),
                problem.add(variable().integer().min(0).max(max_week_bound)),
            )
        })
        .collect();

    let room_utilization: HashMap<RoomId, Variable> = snapshot
        .rooms
        .iter()
        .map(|r| {
            (
                r.id.clone(),
                problem.add(variable().integer().min(0).max(max_week_bound)),
            )
        })
        .collect();

    let workload_mean = problem.add(variable().min(0.0).max(max_week_bound));

    let workload_deviation: HashMap<FacultyId, Variable> = snapshot
        .faculty
        .iter()
        .map(|f| (f.id.clone(), problem.add(variable().min(0.0))))
        .collect();

    let student_satisfaction: HashMap<StudentId, Variable> = snapshot
        .students
        .iter()
        .map(|s| (s.id.clone(), problem.add(variable().min(0.0).max(1.0))))
        .collect();

    DecisionVariables {
        problem,
        assign,
        elective_assign,
        course_scheduled,
        faculty_workload,
        room_utilization,
        workload_mean,
        workload_deviation,
        student_satisfaction,
    }
}
