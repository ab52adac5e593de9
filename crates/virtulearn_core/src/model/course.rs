//! Course records.
//!
//! # Invariants
//! - `title` is trimmed, non-blank and unique across courses.
//! - `duration` is a positive number of hours.
//! - `instructor_id` is a non-owning link; `None` means unassigned.

use super::validation::{require_positive, require_text, trim_text, ConstraintViolation};
use super::{CourseId, EntityKind, InstructorId};
use serde::{Deserialize, Serialize};

/// Persisted course row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    /// Length in hours.
    pub duration: i64,
    pub instructor_id: Option<InstructorId>,
}

impl Course {
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        validate_fields(&self.title, self.duration)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: CoursePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(instructor_id) = patch.instructor_id {
            self.instructor_id = instructor_id;
        }
    }
}

/// Fields for a new course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub title: String,
    pub duration: i64,
    /// Requested owner. An id with no matching instructor is dropped on
    /// create rather than rejected.
    pub instructor_id: Option<InstructorId>,
}

impl NewCourse {
    pub fn new(title: impl Into<String>, duration: i64) -> Self {
        Self {
            title: title.into(),
            duration,
            instructor_id: None,
        }
    }

    pub fn with_instructor(mut self, instructor_id: InstructorId) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            title: trim_text(self.title),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        validate_fields(&self.title, self.duration)
    }
}

/// Partial course update. For `instructor_id`, `Some(None)` unassigns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub duration: Option<i64>,
    pub instructor_id: Option<Option<InstructorId>>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.duration.is_none() && self.instructor_id.is_none()
    }

    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(trim_text),
            ..self
        }
    }
}

fn validate_fields(title: &str, duration: i64) -> Result<(), ConstraintViolation> {
    require_text(EntityKind::Course, "title", title)?;
    require_positive(EntityKind::Course, "duration", duration)?;
    Ok(())
}
