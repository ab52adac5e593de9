//! Repository layer: typed SQL access per entity.
//!
//! # Responsibility
//! - Define per-entity data access contracts and their SQLite implementations.
//! - Translate SQLite constraint failures into `ConstraintViolation`s that
//!   name the entity and field.
//!
//! # Invariants
//! - Repositories never open, commit or roll back transactions; they run
//!   inside the caller's `db::Session`.
//! - Write paths validate model rules before issuing SQL.
//! - Absence on read is `Ok(None)`; absence on update/delete is `NotFound`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::validation::{ConstraintKind, ConstraintViolation, ValidationError};
use crate::model::EntityKind;
use rusqlite::{Connection, ErrorCode};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course_repo;
pub mod enrollment_repo;
pub mod instructor_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for every repository and service operation.
#[derive(Debug)]
pub enum RepoError {
    /// Referenced identifier does not exist.
    NotFound { entity: EntityKind, id: i64 },
    /// Uniqueness or required-field rule broken; the write was rolled back.
    Constraint(ConstraintViolation),
    /// Malformed input caught before reaching storage.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl RepoError {
    /// Stable machine-readable error tag.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Constraint(_) => "constraint_violation",
            Self::Validation(_) => "validation_error",
            Self::Db(_) => "storage_error",
            Self::UninitializedConnection { .. } | Self::MissingRequiredTable(_) => {
                "schema_error"
            }
            Self::InvalidData(_) => "invalid_data",
        }
    }

    /// Wraps a SQLite error raised by a write against `entity`'s table.
    ///
    /// Constraint failures whose message does not name a table (foreign
    /// keys) are attributed to `entity`.
    pub fn from_write(entity: EntityKind, err: rusqlite::Error) -> Self {
        match classify_constraint(&err, Some(entity)) {
            Some(violation) => Self::Constraint(violation),
            None => Self::Db(DbError::Sqlite(err)),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Constraint(violation) => write!(f, "constraint violation: {violation}"),
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Constraint(violation) => Some(violation),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ConstraintViolation> for RepoError {
    fn from(value: ConstraintViolation) -> Self {
        Self::Constraint(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => err.into(),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match classify_constraint(&value, None) {
            Some(violation) => Self::Constraint(violation),
            None => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Dependents removed together with a parent row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub courses_deleted: usize,
    pub enrollments_deleted: usize,
}

/// Named CHECK constraints declared by the migrations.
const CHECK_CONSTRAINTS: &[(&str, EntityKind, &str, ConstraintKind)] = &[
    (
        "instructors_name_not_blank",
        EntityKind::Instructor,
        "name",
        ConstraintKind::Required,
    ),
    (
        "instructors_expertise_not_blank",
        EntityKind::Instructor,
        "expertise",
        ConstraintKind::Required,
    ),
    (
        "courses_title_not_blank",
        EntityKind::Course,
        "title",
        ConstraintKind::Required,
    ),
    (
        "courses_duration_positive",
        EntityKind::Course,
        "duration",
        ConstraintKind::Positive,
    ),
    (
        "enrollments_student_name_not_blank",
        EntityKind::Enrollment,
        "student_name",
        ConstraintKind::Required,
    ),
];

/// Turns a SQLite constraint failure into a `ConstraintViolation`.
///
/// SQLite reports e.g. `UNIQUE constraint failed: instructors.name`,
/// `NOT NULL constraint failed: courses.title`,
/// `CHECK constraint failed: courses_duration_positive` or
/// `FOREIGN KEY constraint failed`. Returns `None` for non-constraint
/// errors, and for constraint errors whose entity cannot be determined
/// from either the message or `fallback`.
pub(crate) fn classify_constraint(
    err: &rusqlite::Error,
    fallback: Option<EntityKind>,
) -> Option<ConstraintViolation> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation {
        return None;
    }
    let message = message.as_deref().unwrap_or_default();
    let detail = message
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();

    if message.starts_with("UNIQUE") || message.starts_with("NOT NULL") {
        let kind = if message.starts_with("UNIQUE") {
            ConstraintKind::Unique
        } else {
            ConstraintKind::Required
        };
        let first_column = detail.split(',').next().unwrap_or_default().trim();
        let (entity, field) = match first_column.split_once('.') {
            Some((table, column)) => (EntityKind::from_table(table).or(fallback)?, column),
            None => (fallback?, "unknown"),
        };
        return Some(ConstraintViolation::new(entity, field, kind));
    }

    if message.starts_with("CHECK") {
        if let Some((_, entity, field, kind)) = CHECK_CONSTRAINTS
            .iter()
            .find(|(name, ..)| *name == detail)
        {
            return Some(ConstraintViolation::new(*entity, *field, *kind));
        }
        return Some(ConstraintViolation::new(
            fallback?,
            "unknown",
            ConstraintKind::Check,
        ));
    }

    if message.starts_with("FOREIGN KEY") {
        return Some(ConstraintViolation::new(
            fallback?,
            "unknown",
            ConstraintKind::ForeignKey,
        ));
    }

    Some(ConstraintViolation::new(
        fallback?,
        "unknown",
        ConstraintKind::Check,
    ))
}

/// Verifies the connection has been migrated and carries `table`.
pub(crate) fn ensure_connection_ready(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}

pub(crate) fn row_exists(conn: &Connection, entity: EntityKind, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);", entity.table()),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn count_rows(conn: &Connection, entity: EntityKind) -> RepoResult<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {};", entity.table()),
        [],
        |row| row.get(0),
    )?;
    u64::try_from(count).map_err(|_| {
        RepoError::InvalidData(format!("negative row count {count} in {}", entity.table()))
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_constraint, RepoError};
    use crate::db::open_db_in_memory;
    use crate::model::validation::ConstraintKind;
    use crate::model::EntityKind;

    #[test]
    fn readiness_failures_report_schema_error() {
        let missing = RepoError::MissingRequiredTable("courses");
        let stale = RepoError::UninitializedConnection {
            expected_version: 2,
            actual_version: 0,
        };
        assert_eq!(missing.code(), "schema_error");
        assert_eq!(stale.code(), "schema_error");
    }

    #[test]
    fn unique_failure_names_table_and_column() {
        let conn = open_db_in_memory().expect("store should open");
        conn.execute(
            "INSERT INTO instructors (name, expertise) VALUES ('Ada', 'Maths');",
            [],
        )
        .expect("first insert should succeed");
        let err = conn
            .execute(
                "INSERT INTO instructors (name, expertise) VALUES ('Ada', 'Logic');",
                [],
            )
            .expect_err("duplicate name must fail");

        let violation = classify_constraint(&err, None).expect("should classify");
        assert_eq!(violation.entity, EntityKind::Instructor);
        assert_eq!(violation.field, "name");
        assert_eq!(violation.kind, ConstraintKind::Unique);
    }

    #[test]
    fn named_check_failure_maps_to_field() {
        let conn = open_db_in_memory().expect("store should open");
        let err = conn
            .execute(
                "INSERT INTO courses (title, duration) VALUES ('Rust', 0);",
                [],
            )
            .expect_err("zero duration must fail");

        let violation = classify_constraint(&err, None).expect("should classify");
        assert_eq!(violation.entity, EntityKind::Course);
        assert_eq!(violation.field, "duration");
        assert_eq!(violation.kind, ConstraintKind::Positive);
    }

    #[test]
    fn foreign_key_failure_uses_fallback_entity() {
        let conn = open_db_in_memory().expect("store should open");
        let err = conn
            .execute(
                "INSERT INTO enrollments (student_name, enrollment_date, course_id)
                 VALUES ('Grace', '2024-01-01 00:00:00', 42);",
                [],
            )
            .expect_err("missing course must fail");

        assert!(classify_constraint(&err, None).is_none());
        let mapped = RepoError::from_write(EntityKind::Enrollment, err);
        match mapped {
            RepoError::Constraint(violation) => {
                assert_eq!(violation.entity, EntityKind::Enrollment);
                assert_eq!(violation.kind, ConstraintKind::ForeignKey);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_constraint_errors_are_not_classified() {
        let conn = open_db_in_memory().expect("store should open");
        let err = conn
            .execute("INSERT INTO no_such_table (x) VALUES (1);", [])
            .expect_err("unknown table must fail");
        assert!(classify_constraint(&err, Some(EntityKind::Course)).is_none());
        assert_eq!(RepoError::from(err).code(), "storage_error");
    }
}
