//! Core use-case services.
//!
//! # Responsibility
//! - Run every operation in exactly one storage session.
//! - Apply the soft-fallback policies (unknown instructor, unparsable date)
//!   and report them as warnings next to the result.
//! - Keep CLI callers decoupled from SQL and transaction handling.

use crate::model::InstructorId;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub mod course_service;
pub mod enrollment_service;
pub mod instructor_service;
pub mod report_service;

/// Non-fatal degradation applied while creating a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum OperationWarning {
    /// Requested instructor does not exist; the record was stored unlinked.
    UnknownInstructorDropped { instructor_id: InstructorId },
    /// Enrollment date was not `YYYY-MM-DD`; the current time was used.
    UnparsableEnrollmentDate { input: String },
}

impl OperationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownInstructorDropped { .. } => "unknown_instructor_dropped",
            Self::UnparsableEnrollmentDate { .. } => "unparsable_enrollment_date",
        }
    }
}

impl Display for OperationWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownInstructorDropped { instructor_id } => write!(
                f,
                "instructor {instructor_id} does not exist; saved without an instructor"
            ),
            Self::UnparsableEnrollmentDate { input } => write!(
                f,
                "enrollment date `{input}` is not YYYY-MM-DD; used the current date and time"
            ),
        }
    }
}

/// A newly created record plus any fallbacks applied on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created<T> {
    pub record: T,
    pub warnings: Vec<OperationWarning>,
}

impl<T> Created<T> {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
