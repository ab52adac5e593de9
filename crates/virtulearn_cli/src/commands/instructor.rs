//! `virtulearn instructor ...`

use crate::output::{cascade_text, course_line, enrollment_line, instructor_line, Renderer};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use rusqlite::Connection;
use virtulearn_core::{
    EntityKind, InstructorId, InstructorPatch, InstructorService, NewInstructor, RepoError,
};

#[derive(Debug, Subcommand)]
pub enum InstructorCommand {
    /// Add an instructor
    Add(AddInstructorArgs),
    /// List all instructors
    List,
    /// Show one instructor
    Get { id: InstructorId },
    /// Find an instructor by email (case-insensitive)
    FindEmail { email: String },
    /// Change an instructor's fields
    Update(UpdateInstructorArgs),
    /// Delete an instructor with its courses and enrollments
    Delete { id: InstructorId },
    /// Courses taught by an instructor
    Courses { id: InstructorId },
    /// Enrollments naming an instructor
    Enrollments { id: InstructorId },
}

#[derive(Debug, Clone, Args)]
pub struct AddInstructorArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub expertise: String,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateInstructorArgs {
    pub id: InstructorId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub expertise: Option<String>,
    #[arg(long, conflicts_with = "clear_email")]
    pub email: Option<String>,
    /// Remove the stored email
    #[arg(long)]
    pub clear_email: bool,
}

impl UpdateInstructorArgs {
    fn into_patch(self) -> InstructorPatch {
        let email = if self.clear_email {
            Some(None)
        } else {
            self.email.map(Some)
        };
        InstructorPatch {
            name: self.name,
            expertise: self.expertise,
            email,
        }
    }
}

pub fn execute(command: InstructorCommand, conn: &Connection, out: &Renderer) -> Result<String> {
    match command {
        InstructorCommand::Add(args) => add(conn, out, args),
        InstructorCommand::List => list(conn, out),
        InstructorCommand::Get { id } => get(conn, out, id),
        InstructorCommand::FindEmail { email } => find_by_email(conn, out, &email),
        InstructorCommand::Update(args) => update(conn, out, args),
        InstructorCommand::Delete { id } => delete(conn, out, id),
        InstructorCommand::Courses { id } => courses(conn, out, id),
        InstructorCommand::Enrollments { id } => enrollments(conn, out, id),
    }
}

pub fn add(conn: &Connection, out: &Renderer, args: AddInstructorArgs) -> Result<String> {
    let request = NewInstructor {
        name: args.name,
        expertise: args.expertise,
        email: args.email,
    };
    let instructor = InstructorService::new(conn).create(request)?;
    out.render(&instructor, |instructor| {
        format!("Added instructor: {}", instructor_line(instructor))
    })
}

pub fn list(conn: &Connection, out: &Renderer) -> Result<String> {
    let instructors = InstructorService::new(conn).list()?;
    out.list(&instructors, "No instructors found.", instructor_line)
}

pub fn get(conn: &Connection, out: &Renderer, id: InstructorId) -> Result<String> {
    let instructor = InstructorService::new(conn)
        .get(id)?
        .ok_or(RepoError::NotFound {
            entity: EntityKind::Instructor,
            id,
        })?;
    out.render(&instructor, instructor_line)
}

pub fn find_by_email(conn: &Connection, out: &Renderer, email: &str) -> Result<String> {
    let instructor = InstructorService::new(conn).find_by_email(email)?;
    out.render(&instructor, |instructor| match instructor {
        Some(instructor) => instructor_line(instructor),
        None => "No instructor found with that email.".to_string(),
    })
}

pub fn update(conn: &Connection, out: &Renderer, args: UpdateInstructorArgs) -> Result<String> {
    let id = args.id;
    let patch = args.into_patch();
    if patch.is_empty() {
        bail!("nothing to update; pass --name, --expertise, --email or --clear-email");
    }
    let instructor = InstructorService::new(conn).update(id, patch)?;
    out.render(&instructor, |instructor| {
        format!("Updated instructor: {}", instructor_line(instructor))
    })
}

pub fn delete(conn: &Connection, out: &Renderer, id: InstructorId) -> Result<String> {
    let report = InstructorService::new(conn).delete(id)?;
    out.render(&report, |report| cascade_text("instructor", id, report))
}

pub fn courses(conn: &Connection, out: &Renderer, id: InstructorId) -> Result<String> {
    let courses = InstructorService::new(conn).courses(id)?;
    out.list(&courses, "No courses found for this instructor.", course_line)
}

pub fn enrollments(conn: &Connection, out: &Renderer, id: InstructorId) -> Result<String> {
    let enrollments = InstructorService::new(conn).enrollments(id)?;
    out.list(
        &enrollments,
        "No enrollments found for this instructor.",
        enrollment_line,
    )
}
