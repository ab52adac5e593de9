//! Subcommand definitions and dispatch.
//!
//! Every command runs against an already opened, migrated connection and
//! returns its rendered output. No command prints directly except the
//! interactive menu.

use crate::output::Renderer;
use anyhow::Result;
use clap::Subcommand;
use rusqlite::Connection;

pub mod admin;
pub mod course;
pub mod enrollment;
pub mod instructor;
pub mod report;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the tables if they do not exist
    Init,
    /// Drop all tables (destructive)
    Drop(admin::DropArgs),
    /// Show row counts and store location
    Status,
    /// Manage instructors
    #[command(subcommand)]
    Instructor(instructor::InstructorCommand),
    /// Manage courses
    #[command(subcommand)]
    Course(course::CourseCommand),
    /// Manage enrollments
    #[command(subcommand)]
    Enrollment(enrollment::EnrollmentCommand),
    /// Derived reports
    #[command(subcommand)]
    Report(report::ReportCommand),
    /// Interactive menu
    Menu,
}

/// Runs a non-interactive command.
///
/// `confirm` is asked before destructive actions that were not pre-approved.
pub fn execute(
    command: Command,
    conn: &mut Connection,
    out: &Renderer,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<String> {
    match command {
        Command::Init => admin::init(conn, out),
        Command::Drop(args) => admin::drop(conn, out, args, confirm),
        Command::Status => admin::status(conn, out),
        Command::Instructor(command) => instructor::execute(command, conn, out),
        Command::Course(command) => course::execute(command, conn, out),
        Command::Enrollment(command) => enrollment::execute(command, conn, out),
        Command::Report(command) => report::execute(command, conn, out),
        Command::Menu => anyhow::bail!("the interactive menu needs a terminal session"),
    }
}

/// Parses `virtulearn <args>` and runs it against `conn` with text output.
#[cfg(test)]
pub(crate) fn run_for_test(conn: &mut Connection, args: &[&str]) -> Result<String> {
    use clap::Parser;

    let cli = crate::Cli::try_parse_from(std::iter::once("virtulearn").chain(args.iter().copied()))?;
    let out = Renderer::new(cli.global.json);
    execute(cli.command, conn, &out, &mut |_| Ok(false))
}
