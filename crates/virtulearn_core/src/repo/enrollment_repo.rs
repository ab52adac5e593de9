//! Enrollment repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every listing is ordered `id ASC`.
//! - `enrollment_date` is persisted as `YYYY-MM-DD HH:MM:SS` text; rows that
//!   do not parse are reported as `InvalidData`, never silently defaulted.

use super::{count_rows, ensure_connection_ready, RepoError, RepoResult};
use crate::model::enrollment::{
    format_enrollment_date, parse_stored_enrollment_date, Enrollment, NewEnrollment,
};
use crate::model::{CourseId, EnrollmentId, EntityKind, InstructorId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ENROLLMENT_SELECT_SQL: &str = "SELECT
    id,
    student_name,
    student_email,
    enrollment_date,
    course_id,
    instructor_id
FROM enrollments";

/// Repository interface for enrollment operations.
pub trait EnrollmentRepository {
    fn create_enrollment(&self, enrollment: &NewEnrollment) -> RepoResult<EnrollmentId>;
    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>>;
    fn list_enrollments(&self) -> RepoResult<Vec<Enrollment>>;
    fn list_enrollments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Enrollment>>;
    fn list_enrollments_for_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> RepoResult<Vec<Enrollment>>;
    /// Case-insensitive exact student email match.
    fn find_enrollments_by_email(&self, email: &str) -> RepoResult<Vec<Enrollment>>;
    fn update_enrollment(&self, enrollment: &Enrollment) -> RepoResult<()>;
    fn delete_enrollment(&self, id: EnrollmentId) -> RepoResult<()>;
    fn count_enrollments(&self) -> RepoResult<u64>;
}

/// SQLite-backed enrollment repository.
pub struct SqliteEnrollmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEnrollmentRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, EntityKind::Enrollment.table())?;
        Ok(Self { conn })
    }

    fn query_enrollments(&self, filter: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Enrollment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut enrollments = Vec::new();
        while let Some(row) = rows.next()? {
            enrollments.push(parse_enrollment_row(row)?);
        }
        Ok(enrollments)
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository<'_> {
    fn create_enrollment(&self, enrollment: &NewEnrollment) -> RepoResult<EnrollmentId> {
        enrollment.validate()?;

        self.conn
            .execute(
                "INSERT INTO enrollments (
                    student_name,
                    student_email,
                    enrollment_date,
                    course_id,
                    instructor_id
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    enrollment.student_name.as_str(),
                    enrollment.student_email.as_deref(),
                    format_enrollment_date(&enrollment.enrollment_date),
                    enrollment.course_id,
                    enrollment.instructor_id,
                ],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Enrollment, err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_enrollment(&self, id: EnrollmentId) -> RepoResult<Option<Enrollment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENROLLMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_enrollment_row(row)?));
        }
        Ok(None)
    }

    fn list_enrollments(&self) -> RepoResult<Vec<Enrollment>> {
        self.query_enrollments("", Vec::new())
    }

    fn list_enrollments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Enrollment>> {
        self.query_enrollments("WHERE course_id = ?", vec![Value::Integer(course_id)])
    }

    fn list_enrollments_for_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> RepoResult<Vec<Enrollment>> {
        self.query_enrollments(
            "WHERE instructor_id = ?",
            vec![Value::Integer(instructor_id)],
        )
    }

    fn find_enrollments_by_email(&self, email: &str) -> RepoResult<Vec<Enrollment>> {
        self.query_enrollments(
            "WHERE student_email = ? COLLATE NOCASE",
            vec![Value::Text(email.trim().to_string())],
        )
    }

    fn update_enrollment(&self, enrollment: &Enrollment) -> RepoResult<()> {
        enrollment.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE enrollments
                 SET
                    student_name = ?1,
                    student_email = ?2,
                    enrollment_date = ?3,
                    course_id = ?4,
                    instructor_id = ?5
                 WHERE id = ?6;",
                params![
                    enrollment.student_name.as_str(),
                    enrollment.student_email.as_deref(),
                    format_enrollment_date(&enrollment.enrollment_date),
                    enrollment.course_id,
                    enrollment.instructor_id,
                    enrollment.id,
                ],
            )
            .map_err(|err| RepoError::from_write(EntityKind::Enrollment, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Enrollment,
                id: enrollment.id,
            });
        }

        Ok(())
    }

    fn delete_enrollment(&self, id: EnrollmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM enrollments WHERE id = ?1;", [id])
            .map_err(|err| RepoError::from_write(EntityKind::Enrollment, err))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Enrollment,
                id,
            });
        }

        Ok(())
    }

    fn count_enrollments(&self) -> RepoResult<u64> {
        count_rows(self.conn, EntityKind::Enrollment)
    }
}

fn parse_enrollment_row(row: &Row<'_>) -> RepoResult<Enrollment> {
    let id: EnrollmentId = row.get("id")?;
    let date_text: String = row.get("enrollment_date")?;
    let enrollment_date = parse_stored_enrollment_date(&date_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid enrollment_date `{date_text}` in enrollments row {id}"
        ))
    })?;

    Ok(Enrollment {
        id,
        student_name: row.get("student_name")?,
        student_email: row.get("student_email")?,
        enrollment_date,
        course_id: row.get("course_id")?,
        instructor_id: row.get("instructor_id")?,
    })
}
