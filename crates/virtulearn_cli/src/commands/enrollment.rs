//! `virtulearn enrollment ...`

use crate::output::{enrollment_line, Renderer};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use rusqlite::Connection;
use virtulearn_core::model::enrollment::start_of_day;
use virtulearn_core::model::validation::parse_date;
use virtulearn_core::{
    CourseId, EnrollmentId, EnrollmentPatch, EnrollmentRequest, EnrollmentService, EntityKind,
    InstructorId, RepoError,
};

#[derive(Debug, Subcommand)]
pub enum EnrollmentCommand {
    /// Enroll a student in a course
    Add(AddEnrollmentArgs),
    /// List all enrollments
    List,
    /// Show one enrollment
    Get { id: EnrollmentId },
    /// Find enrollments by student email (case-insensitive)
    FindEmail { email: String },
    /// Change an enrollment's student details or date
    Update(UpdateEnrollmentArgs),
    /// Delete an enrollment
    Delete { id: EnrollmentId },
}

#[derive(Debug, Clone, Args)]
pub struct AddEnrollmentArgs {
    #[arg(long)]
    pub student_name: String,
    #[arg(long)]
    pub student_email: Option<String>,
    #[arg(long)]
    pub course_id: CourseId,
    /// Defaults to the course's instructor
    #[arg(long)]
    pub instructor_id: Option<InstructorId>,
    /// YYYY-MM-DD; defaults to now
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateEnrollmentArgs {
    pub id: EnrollmentId,
    #[arg(long)]
    pub student_name: Option<String>,
    #[arg(long, conflicts_with = "clear_email")]
    pub student_email: Option<String>,
    /// Remove the stored student email
    #[arg(long)]
    pub clear_email: bool,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
}

pub fn execute(command: EnrollmentCommand, conn: &Connection, out: &Renderer) -> Result<String> {
    match command {
        EnrollmentCommand::Add(args) => add(conn, out, args),
        EnrollmentCommand::List => list(conn, out),
        EnrollmentCommand::Get { id } => get(conn, out, id),
        EnrollmentCommand::FindEmail { email } => find_by_email(conn, out, &email),
        EnrollmentCommand::Update(args) => update(conn, out, args),
        EnrollmentCommand::Delete { id } => delete(conn, out, id),
    }
}

pub fn add(conn: &Connection, out: &Renderer, args: AddEnrollmentArgs) -> Result<String> {
    let request = EnrollmentRequest {
        student_name: args.student_name,
        student_email: args.student_email,
        course_id: args.course_id,
        instructor_id: args.instructor_id,
        enrollment_date: args.date,
    };
    let created = EnrollmentService::new(conn).enroll(request)?;
    out.created(&created, |enrollment| {
        format!("Added enrollment: {}", enrollment_line(enrollment))
    })
}

pub fn list(conn: &Connection, out: &Renderer) -> Result<String> {
    let enrollments = EnrollmentService::new(conn).list()?;
    out.list(&enrollments, "No enrollments found.", enrollment_line)
}

pub fn get(conn: &Connection, out: &Renderer, id: EnrollmentId) -> Result<String> {
    let enrollment = EnrollmentService::new(conn)
        .get(id)?
        .ok_or(RepoError::NotFound {
            entity: EntityKind::Enrollment,
            id,
        })?;
    out.render(&enrollment, enrollment_line)
}

pub fn find_by_email(conn: &Connection, out: &Renderer, email: &str) -> Result<String> {
    let enrollments = EnrollmentService::new(conn).find_by_email(email)?;
    out.list(
        &enrollments,
        "No enrollments found for that email.",
        enrollment_line,
    )
}

pub fn update(conn: &Connection, out: &Renderer, args: UpdateEnrollmentArgs) -> Result<String> {
    let enrollment_date = match args.date.as_deref() {
        Some(raw) => Some(start_of_day(
            parse_date("enrollment_date", raw).map_err(RepoError::from)?,
        )),
        None => None,
    };
    let student_email = if args.clear_email {
        Some(None)
    } else {
        args.student_email.map(Some)
    };
    let patch = EnrollmentPatch {
        student_name: args.student_name,
        student_email,
        enrollment_date,
    };
    if patch.is_empty() {
        bail!("nothing to update; pass --student-name, --student-email, --clear-email or --date");
    }
    let enrollment = EnrollmentService::new(conn).update(args.id, patch)?;
    out.render(&enrollment, |enrollment| {
        format!("Updated enrollment: {}", enrollment_line(enrollment))
    })
}

pub fn delete(conn: &Connection, out: &Renderer, id: EnrollmentId) -> Result<String> {
    EnrollmentService::new(conn).delete(id)?;
    out.render(&serde_json::json!({ "deleted": id }), |_| {
        format!("Deleted enrollment {id}")
    })
}
