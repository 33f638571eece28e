//! Value types for students, courses, faculty, rooms, time slots,
//! assignments and schedules, plus their invariants (`spec.md` §3).

pub mod assignment;
pub mod config;
pub mod course;
pub mod fairness;
pub mod faculty;
pub mod ids;
pub mod room;
pub mod schedule;
pub mod snapshot;
pub mod student;
pub mod time_slot;

pub use assignment::Assignment;
pub use config::{OptimizationConfig, WeightProfile};
pub use course::{Course, CourseType, DifficultyLevel};
pub use fairness::{update_history, FairnessHistory};
pub use faculty::Faculty;
pub use ids::*;
pub use room::{Room, RoomType};
pub use schedule::Schedule;
pub use snapshot::{Department, Section, Snapshot};
pub use student::{rank_weight, Student, StudentPreference, DEFAULT_P_MAX};
pub use time_slot::TimeSlot;
