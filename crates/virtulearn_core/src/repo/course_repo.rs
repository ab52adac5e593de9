//! Course repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `id ASC`.
//! - `instructor_id` values written here have already been resolved by the
//!   caller; the foreign key still rejects dangling ids as a backstop.
//! - Deleting a course removes its enrollments first.

use super::{
    count_rows, ensure_connection_ready, row_exists, CascadeReport, RepoError, RepoResult,
};
use crate::model::course::{Course, NewCourse};
use crate::model::{CourseId, EntityKind, InstructorId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    title,
    duration,
    instructor_id
FROM courses";

/// Repository interface for course operations.
pub trait CourseRepository {
    fn create_course(&self, course: &NewCourse) -> RepoResult<CourseId>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    /// Courses linked to one instructor, `id ASC`. Empty for unknown ids.
    fn list_courses_for_instructor(&self, instructor_id: InstructorId) -> RepoResult<Vec<Course>>;
    fn update_course(&self, course: &Course) -> RepoResult<()>;
    /// Deletes the course and its enrollments.
    fn delete_course(&self, id: CourseId) -> RepoResult<CascadeReport>;
    fn course_exists(&self, id: CourseId) -> RepoResult<bool>;
    fn count_courses(&self) -> RepoResult<u64>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, EntityKind::Course.table())?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn create_course(&self, course: &NewCourse) -> RepoResult<CourseId> {
        course.validate()?;

        self.conn
            .execute(
                "INSERT INTO courses (title, duration, instructor_id) VALUES (?1, ?2, ?3);",
                params![course.title.as_str(), course.duration, course.instructor_id],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let course = self
            .conn
            .query_row(
                &format!("{COURSE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_course_row,
            )
            .optional()?;
        Ok(course)
    }

    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_course_row)?;
        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?);
        }
        Ok(courses)
    }

    fn list_courses_for_instructor(&self, instructor_id: InstructorId) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL}
             WHERE instructor_id = ?1
             ORDER BY id ASC;"
        ))?;
        let rows = stmt.query_map([instructor_id], parse_course_row)?;
        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?);
        }
        Ok(courses)
    }

    fn update_course(&self, course: &Course) -> RepoResult<()> {
        course.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE courses
                 SET
                    title = ?1,
                    duration = ?2,
                    instructor_id = ?3
                 WHERE id = ?4;",
                params![
                    course.title.as_str(),
                    course.duration,
                    course.instructor_id,
                    course.id,
                ],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Course,
                id: course.id,
            });
        }

        Ok(())
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<CascadeReport> {
        if !row_exists(self.conn, EntityKind::Course, id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Course,
                id,
            });
        }

        let enrollments_deleted = self
            .conn
            .execute("DELETE FROM enrollments WHERE course_id = ?1;", [id])
            .map_err(|err| RepoError::from_write(EntityKind::Enrollment, err))?;
        self.conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id])
            .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;

        Ok(CascadeReport {
            courses_deleted: 0,
            enrollments_deleted,
        })
    }

    fn course_exists(&self, id: CourseId) -> RepoResult<bool> {
        row_exists(self.conn, EntityKind::Course, id)
    }

    fn count_courses(&self) -> RepoResult<u64> {
        count_rows(self.conn, EntityKind::Course)
    }
}

fn parse_course_row(row: &Row<'_>) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get("id")?,
        title: row.get("title")?,
        duration: row.get("duration")?,
        instructor_id: row.get("instructor_id")?,
    })
}
