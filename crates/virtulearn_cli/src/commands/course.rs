//! `virtulearn course ...`

use crate::output::{cascade_text, course_line, enrollment_line, Renderer};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use rusqlite::Connection;
use virtulearn_core::model::validation::parse_duration;
use virtulearn_core::{
    CourseId, CoursePatch, CourseService, EntityKind, InstructorId, NewCourse, RepoError,
};

#[derive(Debug, Subcommand)]
pub enum CourseCommand {
    /// Add a course
    Add(AddCourseArgs),
    /// List all courses
    List,
    /// Show one course
    Get { id: CourseId },
    /// Change a course's title or duration
    Update(UpdateCourseArgs),
    /// Link a course to an instructor, or unlink it
    Assign(AssignCourseArgs),
    /// Delete a course with its enrollments
    Delete { id: CourseId },
    /// Enrollments of a course
    Enrollments { id: CourseId },
}

#[derive(Debug, Clone, Args)]
pub struct AddCourseArgs {
    #[arg(long)]
    pub title: String,
    /// Whole hours, greater than zero
    #[arg(long, allow_hyphen_values = true)]
    pub duration: String,
    #[arg(long)]
    pub instructor_id: Option<InstructorId>,
}

#[derive(Debug, Clone, Args)]
pub struct UpdateCourseArgs {
    pub id: CourseId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["instructor_id", "unassign"])))]
pub struct AssignCourseArgs {
    pub id: CourseId,
    #[arg(long)]
    pub instructor_id: Option<InstructorId>,
    /// Remove the instructor link
    #[arg(long)]
    pub unassign: bool,
}

pub fn execute(command: CourseCommand, conn: &Connection, out: &Renderer) -> Result<String> {
    match command {
        CourseCommand::Add(args) => add(conn, out, args),
        CourseCommand::List => list(conn, out),
        CourseCommand::Get { id } => get(conn, out, id),
        CourseCommand::Update(args) => update(conn, out, args),
        CourseCommand::Assign(args) => assign(conn, out, args),
        CourseCommand::Delete { id } => delete(conn, out, id),
        CourseCommand::Enrollments { id } => enrollments(conn, out, id),
    }
}

pub fn add(conn: &Connection, out: &Renderer, args: AddCourseArgs) -> Result<String> {
    let request = NewCourse {
        title: args.title,
        duration: parse_duration(&args.duration).map_err(RepoError::from)?,
        instructor_id: args.instructor_id,
    };
    let created = CourseService::new(conn).create(request)?;
    out.created(&created, |course| format!("Added course: {}", course_line(course)))
}

pub fn list(conn: &Connection, out: &Renderer) -> Result<String> {
    let courses = CourseService::new(conn).list()?;
    out.list(&courses, "No courses found.", course_line)
}

pub fn get(conn: &Connection, out: &Renderer, id: CourseId) -> Result<String> {
    let course = CourseService::new(conn)
        .get(id)?
        .ok_or(RepoError::NotFound {
            entity: EntityKind::Course,
            id,
        })?;
    out.render(&course, course_line)
}

pub fn update(conn: &Connection, out: &Renderer, args: UpdateCourseArgs) -> Result<String> {
    let duration = match args.duration.as_deref() {
        Some(raw) => Some(parse_duration(raw).map_err(RepoError::from)?),
        None => None,
    };
    let patch = CoursePatch {
        title: args.title,
        duration,
        instructor_id: None,
    };
    if patch.is_empty() {
        bail!("nothing to update; pass --title or --duration");
    }
    let course = CourseService::new(conn).update(args.id, patch)?;
    out.render(&course, |course| format!("Updated course: {}", course_line(course)))
}

pub fn assign(conn: &Connection, out: &Renderer, args: AssignCourseArgs) -> Result<String> {
    let instructor_id = if args.unassign {
        None
    } else {
        args.instructor_id
    };
    let course = CourseService::new(conn).assign_instructor(args.id, instructor_id)?;
    out.render(&course, |course| match course.instructor_id {
        Some(instructor_id) => format!("Course {} assigned to instructor {instructor_id}", course.id),
        None => format!("Course {} has no instructor", course.id),
    })
}

pub fn delete(conn: &Connection, out: &Renderer, id: CourseId) -> Result<String> {
    let report = CourseService::new(conn).delete(id)?;
    out.render(&report, |report| cascade_text("course", id, report))
}

pub fn enrollments(conn: &Connection, out: &Renderer, id: CourseId) -> Result<String> {
    let enrollments = CourseService::new(conn).enrollments(id)?;
    out.list(
        &enrollments,
        "No enrollments found for this course.",
        enrollment_line,
    )
}
