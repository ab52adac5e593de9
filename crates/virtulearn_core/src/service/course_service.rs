//! Course use-case service.
//!
//! # Responsibility
//! - Create, read, update, (re)assign and delete courses.
//! - Navigate from a course to its enrollments.
//!
//! # Invariants
//! - On create, an instructor id with no matching row is dropped with a
//!   warning and the course is stored unassigned.
//! - On update/assign, an instructor id with no matching row is `NotFound`.

use super::{Created, OperationWarning};
use crate::db::{with_read_session, with_session};
use crate::model::course::{Course, CoursePatch, NewCourse};
use crate::model::enrollment::Enrollment;
use crate::model::{CourseId, EntityKind, InstructorId};
use crate::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use crate::repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
use crate::repo::instructor_repo::{InstructorRepository, SqliteInstructorRepository};
use crate::repo::{CascadeReport, RepoError, RepoResult};
use log::{info, warn};
use rusqlite::Connection;

/// Course service over a borrowed storage handle.
pub struct CourseService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> CourseService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Adds a course.
    ///
    /// # Contract
    /// - Duplicate or blank title, or non-positive duration: `ConstraintViolation`.
    /// - Unknown `instructor_id`: course is created unassigned and the
    ///   result carries `OperationWarning::UnknownInstructorDropped`.
    pub fn create(&self, request: NewCourse) -> RepoResult<Created<Course>> {
        let request = request.normalized();
        request.validate()?;

        with_session(self.conn, "course_create", |conn| {
            let instructors = SqliteInstructorRepository::try_new(conn)?;
            let courses = SqliteCourseRepository::try_new(conn)?;

            let mut course = request;
            let mut warnings = Vec::new();
            if let Some(instructor_id) = course.instructor_id {
                if !instructors.instructor_exists(instructor_id)? {
                    warn!(
                        "event=course_create module=service status=degraded warning=unknown_instructor_dropped instructor_id={instructor_id}"
                    );
                    warnings.push(OperationWarning::UnknownInstructorDropped { instructor_id });
                    course.instructor_id = None;
                }
            }

            let id = courses.create_course(&course)?;
            let record = courses.get_course(id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("created course {id} missing in read-back"))
            })?;
            Ok(Created { record, warnings })
        })
    }

    pub fn get(&self, id: CourseId) -> RepoResult<Option<Course>> {
        with_read_session(self.conn, "course_get", |conn| {
            SqliteCourseRepository::try_new(conn)?.get_course(id)
        })
    }

    /// All courses ordered by id.
    pub fn list(&self) -> RepoResult<Vec<Course>> {
        with_read_session(self.conn, "course_list", |conn| {
            SqliteCourseRepository::try_new(conn)?.list_courses()
        })
    }

    /// Applies `patch` and returns the updated row.
    pub fn update(&self, id: CourseId, patch: CoursePatch) -> RepoResult<Course> {
        let patch = patch.normalized();
        with_session(self.conn, "course_update", |conn| {
            update_in_session(conn, id, patch)
        })
    }

    /// Links the course to `instructor_id`, or unlinks it with `None`.
    pub fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<InstructorId>,
    ) -> RepoResult<Course> {
        let patch = CoursePatch {
            instructor_id: Some(instructor_id),
            ..CoursePatch::default()
        };
        with_session(self.conn, "course_assign", |conn| {
            update_in_session(conn, id, patch)
        })
    }

    /// Deletes the course and all of its enrollments.
    pub fn delete(&self, id: CourseId) -> RepoResult<CascadeReport> {
        let report = with_session(self.conn, "course_delete", |conn| {
            SqliteCourseRepository::try_new(conn)?.delete_course(id)
        })?;
        info!(
            "event=course_delete module=service status=ok course_id={} enrollments_deleted={}",
            id, report.enrollments_deleted
        );
        Ok(report)
    }

    /// Enrollments of one course.
    pub fn enrollments(&self, id: CourseId) -> RepoResult<Vec<Enrollment>> {
        with_read_session(self.conn, "course_enrollments", |conn| {
            SqliteEnrollmentRepository::try_new(conn)?.list_enrollments_for_course(id)
        })
    }

    pub fn count(&self) -> RepoResult<u64> {
        with_read_session(self.conn, "course_count", |conn| {
            SqliteCourseRepository::try_new(conn)?.count_courses()
        })
    }
}

fn update_in_session(conn: &Connection, id: CourseId, patch: CoursePatch) -> RepoResult<Course> {
    let courses = SqliteCourseRepository::try_new(conn)?;
    let mut course = courses.get_course(id)?.ok_or(RepoError::NotFound {
        entity: EntityKind::Course,
        id,
    })?;

    if let Some(Some(instructor_id)) = patch.instructor_id {
        let instructors = SqliteInstructorRepository::try_new(conn)?;
        if !instructors.instructor_exists(instructor_id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Instructor,
                id: instructor_id,
            });
        }
    }

    course.apply(patch);
    courses.update_course(&course)?;
    Ok(course)
}
