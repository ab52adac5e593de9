//! Instructor use-case service.
//!
//! # Responsibility
//! - Create, read, update and delete instructors.
//! - Navigate to the courses and enrollments an instructor owns.
//!
//! # Invariants
//! - Text is trimmed and emails are shape-checked before any storage access.
//! - Delete removes owned courses and enrollments in the same session.

use crate::db::{with_read_session, with_session};
use crate::model::course::Course;
use crate::model::enrollment::Enrollment;
use crate::model::instructor::{Instructor, InstructorPatch, NewInstructor};
use crate::model::validation::normalize_email;
use crate::model::{EntityKind, InstructorId};
use crate::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use crate::repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
use crate::repo::instructor_repo::{InstructorRepository, SqliteInstructorRepository};
use crate::repo::{CascadeReport, RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

/// Instructor service over a borrowed storage handle.
pub struct InstructorService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> InstructorService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Adds an instructor and returns the stored row.
    ///
    /// Fails with `ConstraintViolation` on a duplicate name or email, or a
    /// blank name/expertise; with `Validation` on a malformed email.
    pub fn create(&self, request: NewInstructor) -> RepoResult<Instructor> {
        let instructor = NewInstructor {
            email: normalize_email("email", request.email.as_deref())?,
            ..request.normalized()
        };
        instructor.validate()?;

        with_session(self.conn, "instructor_create", |conn| {
            let repo = SqliteInstructorRepository::try_new(conn)?;
            let id = repo.create_instructor(&instructor)?;
            repo.get_instructor(id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("created instructor {id} missing in read-back"))
            })
        })
    }

    pub fn get(&self, id: InstructorId) -> RepoResult<Option<Instructor>> {
        with_read_session(self.conn, "instructor_get", |conn| {
            SqliteInstructorRepository::try_new(conn)?.get_instructor(id)
        })
    }

    pub fn find_by_email(&self, email: &str) -> RepoResult<Option<Instructor>> {
        with_read_session(self.conn, "instructor_find_by_email", |conn| {
            SqliteInstructorRepository::try_new(conn)?.find_instructor_by_email(email)
        })
    }

    pub fn list(&self) -> RepoResult<Vec<Instructor>> {
        with_read_session(self.conn, "instructor_list", |conn| {
            SqliteInstructorRepository::try_new(conn)?.list_instructors()
        })
    }

    /// Applies `patch` and returns the updated row.
    pub fn update(&self, id: InstructorId, patch: InstructorPatch) -> RepoResult<Instructor> {
        let patch = patch.normalized();
        let patch = InstructorPatch {
            email: match patch.email {
                Some(email) => Some(normalize_email("email", email.as_deref())?),
                None => None,
            },
            ..patch
        };

        with_session(self.conn, "instructor_update", |conn| {
            let repo = SqliteInstructorRepository::try_new(conn)?;
            let mut instructor = repo.get_instructor(id)?.ok_or(RepoError::NotFound {
                entity: EntityKind::Instructor,
                id,
            })?;
            instructor.apply(patch);
            repo.update_instructor(&instructor)?;
            Ok(instructor)
        })
    }

    /// Deletes the instructor with all owned courses and enrollments.
    pub fn delete(&self, id: InstructorId) -> RepoResult<CascadeReport> {
        let report = with_session(self.conn, "instructor_delete", |conn| {
            SqliteInstructorRepository::try_new(conn)?.delete_instructor(id)
        })?;
        info!(
            "event=instructor_delete module=service status=ok instructor_id={} courses_deleted={} enrollments_deleted={}",
            id, report.courses_deleted, report.enrollments_deleted
        );
        Ok(report)
    }

    /// Courses linked to the instructor.
    pub fn courses(&self, id: InstructorId) -> RepoResult<Vec<Course>> {
        with_read_session(self.conn, "instructor_courses", |conn| {
            SqliteCourseRepository::try_new(conn)?.list_courses_for_instructor(id)
        })
    }

    /// Enrollments that name the instructor as instructor of record.
    pub fn enrollments(&self, id: InstructorId) -> RepoResult<Vec<Enrollment>> {
        with_read_session(self.conn, "instructor_enrollments", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.list_enrollments_for_instructor(id)
        })
    }

    pub fn count(&self) -> RepoResult<u64> {
        with_read_session(self.conn, "instructor_count", |conn| {
            SqliteInstructorRepository::try_new(conn)?.count_instructors()
        })
    }
}
