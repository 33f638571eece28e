//! Opaque identifier aliases.
//!
//! The spec treats every identifier as an opaque string (§6). Using plain
//! `String` aliases (rather than newtypes) mirrors the teacher's
//! `pub type RoomId = u32;` convention in `data.rs` — a thin alias, not a
//! wrapper type, so callers can build snapshots from JSON without a
//! custom `Deserialize` impl per id kind.

pub type StudentId = String;
pub type CourseId = String;
pub type FacultyId = String;
pub type RoomId = String;
pub type SlotId = String;
pub type InstituteId = String;
pub type DepartmentId = String;
pub type SectionId = String;
