//! Interactive menu driven by `dialoguer` prompts.
//!
//! Each menu entry gathers raw input, then calls the same command function
//! as the non-interactive subcommand. A failing action prints its error and
//! returns to the menu.

use crate::commands::{admin, course, enrollment, instructor, report};
use crate::output::Renderer;
use crate::render_error;
use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use rusqlite::Connection;
use virtulearn_core::model::validation::parse_integer;
use virtulearn_core::RepoError;

const CLEAR_MARKER: &str = "-";

const MAIN_ITEMS: &[&str] = &[
    "Manage Instructors",
    "Manage Courses",
    "Manage Enrollments",
    "Instructor Summary",
    "Drop All Tables (DANGEROUS)",
    "Exit",
];

const INSTRUCTOR_ITEMS: &[&str] = &[
    "Add Instructor",
    "List All Instructors",
    "Find Instructor by ID",
    "Find Instructor by Email",
    "Update Instructor",
    "Delete Instructor",
    "List Instructor's Courses",
    "List Instructor's Enrollments",
    "Back to Main Menu",
];

const COURSE_ITEMS: &[&str] = &[
    "Add Course",
    "List All Courses",
    "Find Course by ID",
    "Delete Course",
    "Assign Course to Instructor",
    "List Course Enrollments",
    "Back to Main Menu",
];

const ENROLLMENT_ITEMS: &[&str] = &[
    "Add Enrollment",
    "List All Enrollments",
    "Find Enrollment by ID",
    "Find Enrollments by Email",
    "Delete Enrollment",
    "Back to Main Menu",
];

pub fn run(conn: &mut Connection, out: &Renderer) -> Result<()> {
    loop {
        match select("Main Menu", MAIN_ITEMS)? {
            0 => instructor_menu(conn, out)?,
            1 => course_menu(conn, out)?,
            2 => enrollment_menu(conn, out)?,
            3 => show(report::execute(report::ReportCommand::Summary, conn, out)),
            4 => show(admin::drop(
                conn,
                out,
                admin::DropArgs::default(),
                &mut confirm,
            )),
            _ => {
                println!("Exiting Virtulearn. Goodbye!");
                return Ok(());
            }
        }
    }
}

fn instructor_menu(conn: &Connection, out: &Renderer) -> Result<()> {
    loop {
        let outcome = match select("Manage Instructors", INSTRUCTOR_ITEMS)? {
            0 => instructor::add(
                conn,
                out,
                instructor::AddInstructorArgs {
                    name: text("Name")?,
                    expertise: text("Expertise")?,
                    email: optional_text("Email (optional)")?,
                },
            ),
            1 => instructor::list(conn, out),
            2 => prompt_id("Instructor ID").and_then(|id| instructor::get(conn, out, id)),
            3 => instructor::find_by_email(conn, out, &text("Email")?),
            4 => prompt_id("Instructor ID").and_then(|id| {
                let name = optional_text("New name (blank keeps current)")?;
                let expertise = optional_text("New expertise (blank keeps current)")?;
                let (email, clear_email) = email_edit(optional_text(
                    "New email (blank keeps current, - clears)",
                )?);
                instructor::update(
                    conn,
                    out,
                    instructor::UpdateInstructorArgs {
                        id,
                        name,
                        expertise,
                        email,
                        clear_email,
                    },
                )
            }),
            5 => prompt_id("Instructor ID").and_then(|id| instructor::delete(conn, out, id)),
            6 => prompt_id("Instructor ID").and_then(|id| instructor::courses(conn, out, id)),
            7 => prompt_id("Instructor ID").and_then(|id| instructor::enrollments(conn, out, id)),
            _ => return Ok(()),
        };
        show(outcome);
    }
}

fn course_menu(conn: &Connection, out: &Renderer) -> Result<()> {
    loop {
        let outcome = match select("Manage Courses", COURSE_ITEMS)? {
            0 => course::add(
                conn,
                out,
                course::AddCourseArgs {
                    title: text("Title")?,
                    duration: text("Duration (hours)")?,
                    instructor_id: optional_id("Instructor ID (optional)")?,
                },
            ),
            1 => course::list(conn, out),
            2 => prompt_id("Course ID").and_then(|id| course::get(conn, out, id)),
            3 => prompt_id("Course ID").and_then(|id| course::delete(conn, out, id)),
            4 => prompt_id("Course ID").and_then(|id| {
                let instructor_id = optional_id("Instructor ID (blank unassigns)")?;
                course::assign(
                    conn,
                    out,
                    course::AssignCourseArgs {
                        id,
                        instructor_id,
                        unassign: instructor_id.is_none(),
                    },
                )
            }),
            5 => prompt_id("Course ID").and_then(|id| course::enrollments(conn, out, id)),
            _ => return Ok(()),
        };
        show(outcome);
    }
}

fn enrollment_menu(conn: &Connection, out: &Renderer) -> Result<()> {
    loop {
        let outcome = match select("Manage Enrollments", ENROLLMENT_ITEMS)? {
            0 => prompt_id("Course ID").and_then(|course_id| {
                enrollment::add(
                    conn,
                    out,
                    enrollment::AddEnrollmentArgs {
                        student_name: text("Student name")?,
                        student_email: optional_text("Student email (optional)")?,
                        course_id,
                        instructor_id: optional_id("Instructor ID (optional)")?,
                        date: optional_text("Enrollment date YYYY-MM-DD (blank for now)")?,
                    },
                )
            }),
            1 => enrollment::list(conn, out),
            2 => prompt_id("Enrollment ID").and_then(|id| enrollment::get(conn, out, id)),
            3 => enrollment::find_by_email(conn, out, &text("Student email")?),
            4 => prompt_id("Enrollment ID").and_then(|id| enrollment::delete(conn, out, id)),
            _ => return Ok(()),
        };
        show(outcome);
    }
}

fn show(outcome: Result<String>) {
    match outcome {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("{}", render_error(&err)),
    }
}

fn select(title: &str, items: &[&str]) -> Result<usize> {
    println!();
    Ok(Select::new()
        .with_prompt(format!("--- {title} ---"))
        .items(items)
        .default(0)
        .interact()?)
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn text(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

fn optional_text(prompt: &str) -> Result<Option<String>> {
    let value = text(prompt)?;
    Ok(blank_to_none(value))
}

fn prompt_id(prompt: &str) -> Result<i64> {
    let raw = text(prompt)?;
    Ok(parse_integer("id", &raw).map_err(RepoError::from)?)
}

fn optional_id(prompt: &str) -> Result<Option<i64>> {
    match optional_text(prompt)? {
        Some(raw) => Ok(Some(parse_integer("id", &raw).map_err(RepoError::from)?)),
        None => Ok(None),
    }
}

fn blank_to_none(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Splits an email edit into a new value or a clear request (`-`).
fn email_edit(value: Option<String>) -> (Option<String>, bool) {
    match value {
        Some(raw) if raw.trim() == CLEAR_MARKER => (None, true),
        other => (other, false),
    }
}
