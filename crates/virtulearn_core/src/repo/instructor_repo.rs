//! Instructor repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `instructors` table.
//! - Cascade delete of owned courses and enrollments.
//! - Course-count aggregation used by reporting.
//!
//! # Invariants
//! - Listing order is `id ASC` (insertion order).
//! - `delete_instructor` removes enrollments, then courses, then the
//!   instructor; callers run it inside one write session so the three
//!   statements commit or roll back together.

use super::{
    count_rows, ensure_connection_ready, row_exists, CascadeReport, RepoError, RepoResult,
};
use crate::model::instructor::{Instructor, NewInstructor};
use crate::model::{EntityKind, InstructorId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

const INSTRUCTOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    expertise,
    email
FROM instructors";

/// One row of the per-instructor course count report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorCourseCount {
    pub instructor_id: InstructorId,
    pub name: String,
    pub expertise: String,
    pub course_count: u32,
}

/// Repository interface for instructor operations.
pub trait InstructorRepository {
    fn create_instructor(&self, instructor: &NewInstructor) -> RepoResult<InstructorId>;
    fn get_instructor(&self, id: InstructorId) -> RepoResult<Option<Instructor>>;
    /// Case-insensitive exact email match.
    fn find_instructor_by_email(&self, email: &str) -> RepoResult<Option<Instructor>>;
    fn list_instructors(&self) -> RepoResult<Vec<Instructor>>;
    fn update_instructor(&self, instructor: &Instructor) -> RepoResult<()>;
    /// Deletes the instructor and everything it owns.
    fn delete_instructor(&self, id: InstructorId) -> RepoResult<CascadeReport>;
    fn instructor_exists(&self, id: InstructorId) -> RepoResult<bool>;
    fn count_instructors(&self) -> RepoResult<u64>;
    /// Every instructor with its number of owned courses, zero included.
    fn instructor_course_counts(&self) -> RepoResult<Vec<InstructorCourseCount>>;
}

/// SQLite-backed instructor repository.
pub struct SqliteInstructorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInstructorRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, EntityKind::Instructor.table())?;
        Ok(Self { conn })
    }
}

impl InstructorRepository for SqliteInstructorRepository<'_> {
    fn create_instructor(&self, instructor: &NewInstructor) -> RepoResult<InstructorId> {
        instructor.validate()?;

        self.conn
            .execute(
                "INSERT INTO instructors (name, expertise, email) VALUES (?1, ?2, ?3);",
                params![
                    instructor.name.as_str(),
                    instructor.expertise.as_str(),
                    instructor.email.as_deref(),
                ],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Instructor, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_instructor(&self, id: InstructorId) -> RepoResult<Option<Instructor>> {
        let instructor = self
            .conn
            .query_row(
                &format!("{INSTRUCTOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_instructor_row,
            )
            .optional()?;
        Ok(instructor)
    }

    fn find_instructor_by_email(&self, email: &str) -> RepoResult<Option<Instructor>> {
        let instructor = self
            .conn
            .query_row(
                &format!("{INSTRUCTOR_SELECT_SQL} WHERE email = ?1 COLLATE NOCASE;"),
                [email.trim()],
                parse_instructor_row,
            )
            .optional()?;
        Ok(instructor)
    }

    fn list_instructors(&self) -> RepoResult<Vec<Instructor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INSTRUCTOR_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], parse_instructor_row)?;
        let mut instructors = Vec::new();
        for row in rows {
            instructors.push(row?);
        }
        Ok(instructors)
    }

    fn update_instructor(&self, instructor: &Instructor) -> RepoResult<()> {
        instructor.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE instructors
                 SET
                    name = ?1,
                    expertise = ?2,
                    email = ?3
                 WHERE id = ?4;",
                params![
                    instructor.name.as_str(),
                    instructor.expertise.as_str(),
                    instructor.email.as_deref(),
                    instructor.id,
                ],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Instructor, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Instructor,
                id: instructor.id,
            });
        }

        Ok(())
    }

    fn delete_instructor(&self, id: InstructorId) -> RepoResult<CascadeReport> {
        if !row_exists(self.conn, EntityKind::Instructor, id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Instructor,
                id,
            });
        }

        let enrollments_deleted = self
            .conn
            .execute(
                "DELETE FROM enrollments
                 WHERE instructor_id = ?1
                    OR course_id IN (SELECT id FROM courses WHERE instructor_id = ?1);",
                [id],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Enrollment, err))?;
        let courses_deleted = self
            .conn
            .execute("DELETE FROM courses WHERE instructor_id = ?1;", [id])
            .map_err(|err| RepoError::from_write(EntityKind::Course, err))?;
        self.conn
            .execute("DELETE FROM instructors WHERE id = ?1;", [id])
            .map_err(|err| RepoError::from_write(EntityKind::Instructor, err))?;

        Ok(CascadeReport {
            courses_deleted,
            enrollments_deleted,
        })
    }

    fn instructor_exists(&self, id: InstructorId) -> RepoResult<bool> {
        row_exists(self.conn, EntityKind::Instructor, id)
    }

    fn count_instructors(&self) -> RepoResult<u64> {
        count_rows(self.conn, EntityKind::Instructor)
    }

    fn instructor_course_counts(&self) -> RepoResult<Vec<InstructorCourseCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                i.id,
                i.name,
                i.expertise,
                COUNT(c.id) AS course_count
             FROM instructors i
             LEFT JOIN courses c ON c.instructor_id = i.id
             GROUP BY i.id, i.name, i.expertise
             ORDER BY i.id ASC;",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(InstructorCourseCount {
                instructor_id: row.get("id")?,
                name: row.get("name")?,
                expertise: row.get("expertise")?,
                course_count: row.get("course_count")?,
            })
        })?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

fn parse_instructor_row(row: &Row<'_>) -> rusqlite::Result<Instructor> {
    Ok(Instructor {
        id: row.get("id")?,
        name: row.get("name")?,
        expertise: row.get("expertise")?,
        email: row.get("email")?,
    })
}
