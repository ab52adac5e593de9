//! Domain model for instructors, courses and enrollments.
//!
//! # Responsibility
//! - Define the records persisted by the store and the inputs that create
//!   or change them.
//! - Own field-level rules (required text, positive duration, email shape).
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - Relationships are plain ids; there is no in-memory object graph.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod course;
pub mod enrollment;
pub mod instructor;
pub mod validation;

/// Store-assigned identifier of an instructor row.
pub type InstructorId = i64;
/// Store-assigned identifier of a course row.
pub type CourseId = i64;
/// Store-assigned identifier of an enrollment row.
pub type EnrollmentId = i64;

/// The three persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Instructor,
    Course,
    Enrollment,
}

impl EntityKind {
    /// Lowercase singular name used in messages and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instructor => "instructor",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::Instructor => "instructors",
            Self::Course => "courses",
            Self::Enrollment => "enrollments",
        }
    }

    /// Maps a backing table name back to its entity.
    pub fn from_table(table: &str) -> Option<Self> {
        match table {
            "instructors" => Some(Self::Instructor),
            "courses" => Some(Self::Course),
            "enrollments" => Some(Self::Enrollment),
            _ => None,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
