//! Enrollment records.
//!
//! # Invariants
//! - `student_name` is trimmed and non-blank.
//! - `course_id` pointed at an existing course when the row was written.
//! - `enrollment_date` is stored with second precision.

use super::validation::{require_text, trim_text, ConstraintViolation};
use super::{CourseId, EnrollmentId, EntityKind, InstructorId};
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Storage format of `enrollments.enrollment_date`.
pub const ENROLLMENT_DATE_STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persisted enrollment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_name: String,
    pub student_email: Option<String>,
    pub enrollment_date: NaiveDateTime,
    pub course_id: CourseId,
    /// Instructor of record; inherited from the course when not given.
    pub instructor_id: Option<InstructorId>,
}

impl Enrollment {
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        require_text(EntityKind::Enrollment, "student_name", &self.student_name)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: EnrollmentPatch) {
        if let Some(student_name) = patch.student_name {
            self.student_name = student_name;
        }
        if let Some(student_email) = patch.student_email {
            self.student_email = student_email;
        }
        if let Some(enrollment_date) = patch.enrollment_date {
            self.enrollment_date = enrollment_date;
        }
    }
}

/// Fully resolved enrollment row, ready to insert.
///
/// Course existence, instructor fallback and date defaulting are decided by
/// the service before this value is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student_name: String,
    pub student_email: Option<String>,
    pub enrollment_date: NaiveDateTime,
    pub course_id: CourseId,
    pub instructor_id: Option<InstructorId>,
}

impl NewEnrollment {
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        require_text(EntityKind::Enrollment, "student_name", &self.student_name)
    }
}

/// Partial enrollment update. For `student_email`, `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrollmentPatch {
    pub student_name: Option<String>,
    pub student_email: Option<Option<String>>,
    pub enrollment_date: Option<NaiveDateTime>,
}

impl EnrollmentPatch {
    pub fn is_empty(&self) -> bool {
        self.student_name.is_none()
            && self.student_email.is_none()
            && self.enrollment_date.is_none()
    }

    pub fn normalized(self) -> Self {
        Self {
            student_name: self.student_name.map(trim_text),
            ..self
        }
    }
}

/// Current local time truncated to the stored precision.
pub fn enrollment_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Midnight of a calendar date, as stored for date-only input.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

pub(crate) fn format_enrollment_date(value: &NaiveDateTime) -> String {
    value.format(ENROLLMENT_DATE_STORAGE_FORMAT).to_string()
}

pub(crate) fn parse_stored_enrollment_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, ENROLLMENT_DATE_STORAGE_FORMAT).ok()
}
