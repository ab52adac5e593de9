//! `virtulearn report ...`

use crate::output::{overview_line, summary_text, Renderer};
use anyhow::Result;
use clap::Subcommand;
use rusqlite::Connection;
use virtulearn_core::{InstructorId, ReportService};

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Course count per instructor
    Summary,
    /// Title and duration of each course an instructor teaches
    Overview { instructor_id: InstructorId },
}

pub fn execute(command: ReportCommand, conn: &Connection, out: &Renderer) -> Result<String> {
    let service = ReportService::new(conn);
    match command {
        ReportCommand::Summary => {
            let summary = service.instructor_summary()?;
            out.render(&summary, summary_text)
        }
        ReportCommand::Overview { instructor_id } => {
            let overview = service.instructor_course_overview(instructor_id)?;
            out.list(
                &overview,
                &format!("No courses found for instructor ID {instructor_id}."),
                overview_line,
            )
        }
    }
}
