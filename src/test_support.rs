//! Fixture builders shared by unit tests across modules. Not compiled into
//! the library outside `#[cfg(test)]` (see `lib.rs`).

use std::collections::HashSet;

use chrono::NaiveTime;

use crate::domain::{
    Course, CourseType, Faculty, Room, RoomType, Snapshot, Student, StudentPreference, TimeSlot,
};

fn slot(id: &str, day: u8, period: u8, start_hour: u32) -> TimeSlot {
    TimeSlot {
        id: id.to_string(),
        day,
        period,
        start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(start_hour + 1, 0, 0).unwrap(),
        is_break: false,
        is_lunch: false,
    }
}

/// One faculty, one required course, one room, two teaching slots, one
/// student with no elective preferences — the smallest snapshot that
/// clears every validator check in `spec.md` §4.1.
pub fn trivial_snapshot() -> Snapshot {
    let course = Course {
        id: "c1".into(),
        name: "Intro to Everything".into(),
        course_code: "CS101".into(),
        course_type: CourseType::Theory,
        department: "CS".into(),
        semester: 1,
        credits: 3,
        hours_per_week: 3,
        max_students_per_section: 50,
        max_sections: 1,
        difficulty: Default::default(),
        prerequisites: HashSet::new(),
        is_elective: false,
        elective_capacity: 0,
        is_nep_compliant: true,
    };
    let faculty = Faculty {
        id: "f1".into(),
        name: "Dr. Ada".into(),
        department: "CS".into(),
        designation: "Professor".into(),
        teachable_courses: ["c1".to_string()].into_iter().collect(),
        availability: Default::default(),
        max_hours_per_day: 6,
        max_hours_per_week: 30,
        workload_balance_weight: 1.0,
        is_available: true,
    };
    let room = Room {
        id: "r1".into(),
        name: "Hall A".into(),
        room_type: RoomType::Lecture,
        capacity: 60,
        building: "Main".into(),
        floor: 1,
        available_slots: HashSet::new(),
        is_accessible: true,
    };
    let student = Student {
        id: "s1".into(),
        name: "Grace".into(),
        student_number: "2024001".into(),
        department: "CS".into(),
        semester: 1,
        section: "A".into(),
        preferences: Vec::new(),
        max_courses: 8,
        satisfaction_score: 0.0,
    };

    Snapshot {
        institute_id: "inst1".into(),
        semester: 1,
        students: vec![student],
        courses: vec![course],
        faculty: vec![faculty],
        rooms: vec![room],
        time_slots: vec![slot("t1", 1, 1, 9), slot("t2", 1, 2, 10)],
        departments: Vec::new(),
        config: None,
        num_options: None,
        seed: None,
    }
}

/// Two required courses, one faculty member eligible to teach both, one
/// room, but only a single teaching slot — there is no way to place both
/// required courses without double-booking the faculty in that slot.
/// Exercises the faculty non-overlap family's infeasibility path.
pub fn faculty_conflict_snapshot() -> Snapshot {
    let course = |id: &str, code: &str| Course {
        id: id.to_string(),
        name: id.to_string(),
        course_code: code.to_string(),
        course_type: CourseType::Theory,
        department: "CS".into(),
        semester: 1,
        credits: 3,
        hours_per_week: 3,
        max_students_per_section: 50,
        max_sections: 1,
        difficulty: Default::default(),
        prerequisites: HashSet::new(),
        is_elective: false,
        elective_capacity: 0,
        is_nep_compliant: true,
    };
    let faculty = Faculty {
        id: "f1".into(),
        name: "Dr. Ada".into(),
        department: "CS".into(),
        designation: "Professor".into(),
        teachable_courses: ["c1", "c2"].into_iter().map(String::from).collect(),
        availability: Default::default(),
        max_hours_per_day: 6,
        max_hours_per_week: 30,
        workload_balance_weight: 1.0,
        is_available: true,
    };
    let room = Room {
        id: "r1".into(),
        name: "Hall A".into(),
        room_type: RoomType::Lecture,
        capacity: 60,
        building: "Main".into(),
        floor: 1,
        available_slots: HashSet::new(),
        is_accessible: true,
    };
    let student = Student {
        id: "s1".into(),
        name: "Grace".into(),
        student_number: "2024001".into(),
        department: "CS".into(),
        semester: 1,
        section: "A".into(),
        preferences: Vec::new(),
        max_courses: 8,
        satisfaction_score: 0.0,
    };

    Snapshot {
        institute_id: "inst1".into(),
        semester: 1,
        students: vec![student],
        courses: vec![course("c1", "CS101"), course("c2", "CS102")],
        faculty: vec![faculty],
        rooms: vec![room],
        time_slots: vec![slot("t1", 1, 1, 9)],
        departments: Vec::new(),
        config: None,
        num_options: None,
        seed: None,
    }
}

/// Three electives (two with capacity 1, one with capacity 5) and five
/// students whose preferences contend for the scarce seats, used to
/// exercise the round-based allocator in `allocate.rs`.
pub fn elective_ranking_snapshot() -> Snapshot {
    let elective = |id: &str, capacity: u32| Course {
        id: id.to_string(),
        name: id.to_string(),
        course_code: id.to_string(),
        course_type: CourseType::Elective,
        department: "CS".into(),
        semester: 3,
        credits: 3,
        hours_per_week: 3,
        max_students_per_section: 60,
        max_sections: 1,
        difficulty: Default::default(),
        prerequisites: HashSet::new(),
        is_elective: true,
        elective_capacity: capacity,
        is_nep_compliant: true,
    };
    let courses = vec![
        elective("CS304", 1),
        elective("CS305", 1),
        elective("CS306", 5),
    ];

    let faculty = Faculty {
        id: "f1".into(),
        name: "Dr. Turing".into(),
        department: "CS".into(),
        designation: "Professor".into(),
        teachable_courses: ["CS304", "CS305", "CS306"]
            .into_iter()
            .map(String::from)
            .collect(),
        availability: Default::default(),
        max_hours_per_day: 6,
        max_hours_per_week: 30,
        workload_balance_weight: 1.0,
        is_available: true,
    };
    let room = Room {
        id: "r1".into(),
        name: "Hall A".into(),
        room_type: RoomType::Lecture,
        capacity: 60,
        building: "Main".into(),
        floor: 1,
        available_slots: HashSet::new(),
        is_accessible: true,
    };

    let pref = |course_id: &str, priority: u32| StudentPreference {
        course_id: course_id.to_string(),
        priority,
        preference_score: None,
    };

    let student = |id: &str, preferences: Vec<StudentPreference>| Student {
        id: id.to_string(),
        name: id.to_string(),
        student_number: id.to_string(),
        department: "CS".into(),
        semester: 3,
        section: "A".into(),
        preferences,
        max_courses: 8,
        satisfaction_score: 0.0,
    };

    let students = vec![
        student("s1", vec![pref("CS304", 1)]),
        student("s2", vec![pref("CS304", 1), pref("CS306", 2)]),
        student("s3", vec![pref("CS305", 1)]),
        student("s4", vec![pref("CS305", 1), pref("CS306", 2)]),
        student("s5", vec![pref("CS306", 1)]),
    ];

    Snapshot {
        institute_id: "inst1".into(),
        semester: 3,
        students,
        courses,
        faculty: vec![faculty],
        rooms: vec![room],
        time_slots: vec![slot("t1", 1, 1, 9), slot("t2", 1, 2, 10), slot("t3", 2, 1, 9)],
        departments: Vec::new(),
        config: None,
        num_options: None,
        seed: None,
    }
}
