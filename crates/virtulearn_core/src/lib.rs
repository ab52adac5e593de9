//! Core domain logic for Virtulearn.
//! This crate owns the schema, the referential-integrity rules and every
//! storage operation; front ends only parse input and render results.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    drop_schema, init_schema, open_db, open_db_in_memory, with_read_session, with_session,
    DbError, DbResult, Session, SessionMode,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingOptions};
pub use model::course::{Course, CoursePatch, NewCourse};
pub use model::enrollment::{Enrollment, EnrollmentPatch};
pub use model::instructor::{Instructor, InstructorPatch, NewInstructor};
pub use model::validation::{ConstraintKind, ConstraintViolation, ValidationError};
pub use model::{CourseId, EnrollmentId, EntityKind, InstructorId};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::enrollment_repo::{EnrollmentRepository, SqliteEnrollmentRepository};
pub use repo::instructor_repo::{
    InstructorCourseCount, InstructorRepository, SqliteInstructorRepository,
};
pub use repo::{CascadeReport, RepoError, RepoResult};
pub use service::course_service::CourseService;
pub use service::enrollment_service::{EnrollmentRequest, EnrollmentService};
pub use service::instructor_service::InstructorService;
pub use service::report_service::{CourseOverview, InstructorSummary, ReportService, StoreCounts};
pub use service::{Created, OperationWarning};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
