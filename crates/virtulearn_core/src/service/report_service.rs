//! Read-only derived views.
//!
//! # Invariants
//! - Each report runs in one read session and sees one consistent snapshot.
//! - Instructors without courses are reported with a count of 0.

use crate::db::with_read_session;
use crate::model::InstructorId;
use crate::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use crate::repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
use crate::repo::instructor_repo::{
    InstructorCourseCount, InstructorRepository, SqliteInstructorRepository,
};
use crate::repo::RepoResult;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeMap;

/// Course counts per instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorSummary {
    /// One entry per instructor, ordered by id.
    pub instructors: Vec<InstructorCourseCount>,
    /// Instructor name to course count.
    pub course_counts: BTreeMap<String, u32>,
}

impl InstructorSummary {
    fn from_counts(instructors: Vec<InstructorCourseCount>) -> Self {
        let course_counts = instructors
            .iter()
            .map(|entry| (entry.name.clone(), entry.course_count))
            .collect();
        Self {
            instructors,
            course_counts,
        }
    }

    pub fn course_count(&self, name: &str) -> Option<u32> {
        self.course_counts.get(name).copied()
    }
}

/// Title and duration of one course taught by an instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseOverview {
    pub title: String,
    pub duration: i64,
}

/// Row counts of the three entity tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub instructors: u64,
    pub courses: u64,
    pub enrollments: u64,
}

pub struct ReportService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> ReportService<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Every instructor with its course count.
    pub fn instructor_summary(&self) -> RepoResult<InstructorSummary> {
        with_read_session(self.conn, "report_instructor_summary", |conn| {
            let counts = SqliteInstructorRepository::try_new(conn)?.instructor_course_counts()?;
            Ok(InstructorSummary::from_counts(counts))
        })
    }

    /// Courses of one instructor as (title, duration), ordered by course id.
    ///
    /// Unknown instructors yield an empty overview.
    pub fn instructor_course_overview(
        &self,
        instructor_id: InstructorId,
    ) -> RepoResult<Vec<CourseOverview>> {
        with_read_session(self.conn, "report_course_overview", |conn| {
            let courses =
                SqliteCourseRepository::try_new(conn)?.list_courses_for_instructor(instructor_id)?;
            Ok(courses
                .into_iter()
                .map(|course| CourseOverview {
                    title: course.title,
                    duration: course.duration,
                })
                .collect())
        })
    }

    pub fn store_counts(&self) -> RepoResult<StoreCounts> {
        with_read_session(self.conn, "report_store_counts", |conn| {
            Ok(StoreCounts {
                instructors: SqliteInstructorRepository::try_new(conn)?.count_instructors()?,
                courses: SqliteCourseRepository::try_new(conn)?.count_courses()?,
                enrollments: SqliteEnrollmentRepository::try_new(conn)?.count_enrollments()?,
            })
        })
    }
}
