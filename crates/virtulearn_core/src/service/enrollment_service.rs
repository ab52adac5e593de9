//! Enrollment use-case service.
//!
//! # Responsibility
//! - Enroll students into existing courses, resolving the instructor of
//!   record and the enrollment date.
//! - Read, update and delete enrollments.
//!
//! # Invariants
//! - The course must exist at creation time; otherwise nothing is written.
//! - Explicit unknown instructor id: stored without an instructor, warning.
//! - No instructor id: the course's current instructor is inherited.
//! - Date input other than `YYYY-MM-DD`: current time, warning. Blank or
//!   absent input: current time, no warning.

use super::{Created, OperationWarning};
use crate::db::{with_read_session, with_session};
use crate::model::enrollment::{
    enrollment_now, start_of_day, Enrollment, EnrollmentPatch, NewEnrollment,
};
use crate::model::validation::{normalize_email, parse_date, require_text, trim_text};
use crate::model::{CourseId, EnrollmentId, EntityKind, InstructorId};
use crate::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use crate::repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
use crate::repo::instructor_repo::{InstructorRepository, SqliteInstructorRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDateTime;
use log::warn;
use rusqlite::Connection;

/// Raw enrollment input as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub student_name: String,
    pub student_email: Option<String>,
    pub course_id: CourseId,
    /// Explicit instructor of record; `None` inherits the course's instructor.
    pub instructor_id: Option<InstructorId>,
    /// `YYYY-MM-DD`; anything else falls back to now.
    pub enrollment_date: Option<String>,
}

impl EnrollmentRequest {
    pub fn new(student_name: impl Into<String>, course_id: CourseId) -> Self {
        Self {
            student_name: student_name.into(),
            student_email: None,
            course_id,
            instructor_id: None,
            enrollment_date: None,
        }
    }
}

/// Enrollment service over a borrowed storage handle.
pub struct EnrollmentService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EnrollmentService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Enrolls a student.
    ///
    /// # Contract
    /// - Unknown course: `NotFound` for the course, nothing persisted.
    /// - Blank student name: `ConstraintViolation`.
    /// - Malformed student email: `Validation`.
    /// - Instructor and date fallbacks are reported as warnings.
    pub fn enroll(&self, request: EnrollmentRequest) -> RepoResult<Created<Enrollment>> {
        let student_name = trim_text(request.student_name);
        require_text(EntityKind::Enrollment, "student_name", &student_name)?;
        let student_email = normalize_email("student_email", request.student_email.as_deref())?;

        let mut warnings = Vec::new();
        let enrollment_date = resolve_enrollment_date(request.enrollment_date.as_deref(), &mut warnings);

        with_session(self.conn, "enrollment_create", |conn| {
            let courses = SqliteCourseRepository::try_new(conn)?;
            let instructors = SqliteInstructorRepository::try_new(conn)?;
            let enrollments = SqliteEnrollmentRepository::try_new(conn)?;

            let course = courses
                .get_course(request.course_id)?
                .ok_or(RepoError::NotFound {
                    entity: EntityKind::Course,
                    id: request.course_id,
                })?;

            let instructor_id = match request.instructor_id {
                Some(instructor_id) if instructors.instructor_exists(instructor_id)? => {
                    Some(instructor_id)
                }
                Some(instructor_id) => {
                    warn!(
                        "event=enrollment_create module=service status=degraded warning=unknown_instructor_dropped instructor_id={instructor_id}"
                    );
                    warnings.push(OperationWarning::UnknownInstructorDropped { instructor_id });
                    None
                }
                None => course.instructor_id,
            };

            let new_enrollment = NewEnrollment {
                student_name,
                student_email,
                enrollment_date,
                course_id: course.id,
                instructor_id,
            };
            let id = enrollments.create_enrollment(&new_enrollment)?;
            let record = enrollments.get_enrollment(id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("created enrollment {id} missing in read-back"))
            })?;
            Ok(Created { record, warnings })
        })
    }

    pub fn get(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>> {
        with_read_session(self.conn, "enrollment_get", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.get_enrollment(id)
        })
    }

    pub fn list(&self) -> RepoResult<Vec<Enrollment>> {
        with_read_session(self.conn, "enrollment_list", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.list_enrollments()
        })
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<Vec<Enrollment>> {
        with_read_session(self.conn, "enrollment_find_by_email", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.find_enrollments_by_email(email)
        })
    }

    /// Applies `patch` and returns the updated row.
    pub fn update(&self, id: EnrollmentId, patch: EnrollmentPatch) -> RepoResult<Enrollment> {
        let patch = patch.normalized();
        let patch = EnrollmentPatch {
            student_email: match patch.student_email {
                Some(email) => Some(normalize_email("student_email", email.as_deref())?),
                None => None,
            },
            ..patch
        };

        with_session(self.conn, "enrollment_update", |conn| {
            let repo = SqliteEnrollmentRepository::try_new(conn)?;
            let mut enrollment = repo.get_enrollment(id)?.ok_or(RepoError::NotFound {
                entity: EntityKind::Enrollment,
                id,
            })?;
            enrollment.apply(patch);
            repo.update_enrollment(&enrollment)?;
            Ok(enrollment)
        })
    }

    pub fn delete(&self, id: EnrollmentId) -> RepoResult<()> {
        with_session(self.conn, "enrollment_delete", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.delete_enrollment(id)
        })
    }

    pub fn count(&self) -> RepoResult<u64> {
        with_read_session(self.conn, "enrollment_count", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.count_enrollments()
        })
    }
}

fn resolve_enrollment_date(
    raw: Option<&str>,
    warnings: &mut Vec<OperationWarning>,
) -> NaiveDateTime {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return enrollment_now();
    };
    match parse_date("enrollment_date", raw) {
        Ok(date) => start_of_day(date),
        Err(_) => {
            warn!("event=enrollment_create module=service status=degraded warning=unparsable_enrollment_date");
            warnings.push(OperationWarning::UnparsableEnrollmentDate {
                input: raw.to_string(),
            });
            enrollment_now()
        }
    }
}
