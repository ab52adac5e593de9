//! Schema lifecycle and store status.

use crate::output::{counts_text, Renderer};
use anyhow::Result;
use clap::Args;
use log::warn;
use rusqlite::Connection;
use serde::Serialize;
use virtulearn_core::db::migrations::current_user_version;
use virtulearn_core::{drop_schema, init_schema, ReportService, StoreCounts};

#[derive(Debug, Clone, Default, Args)]
pub struct DropArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct SchemaOutcome {
    action: &'static str,
    done: bool,
}

#[derive(Debug, Serialize)]
struct Status {
    schema_version: u32,
    #[serde(flatten)]
    counts: StoreCounts,
}

pub fn init(conn: &mut Connection, out: &Renderer) -> Result<String> {
    init_schema(conn)?;
    out.render(
        &SchemaOutcome {
            action: "init",
            done: true,
        },
        |_| "Database initialized.".to_string(),
    )
}

/// Drops every table once confirmed, then recreates an empty schema.
pub fn drop(
    conn: &mut Connection,
    out: &Renderer,
    args: DropArgs,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<String> {
    let approved = args.yes || confirm("Drop all tables? This deletes every record.")?;
    if !approved {
        return out.render(
            &SchemaOutcome {
                action: "drop",
                done: false,
            },
            |_| "Drop cancelled.".to_string(),
        );
    }

    drop_schema(conn)?;
    warn!("event=cli_drop module=cli status=ok");
    init_schema(conn)?;
    out.render(
        &SchemaOutcome {
            action: "drop",
            done: true,
        },
        |_| "All tables dropped and recreated empty.".to_string(),
    )
}

pub fn status(conn: &mut Connection, out: &Renderer) -> Result<String> {
    let status = Status {
        schema_version: current_user_version(conn)?,
        counts: ReportService::new(conn).store_counts()?,
    };
    out.render(&status, |status| {
        format!(
            "Schema version: {}\n{}",
            status.schema_version,
            counts_text(&status.counts)
        )
    })
}

#[cfg(test)]
mod tests {
    use crate::commands::run_for_test;
    use virtulearn_core::{open_db_in_memory, InstructorService, NewInstructor};

    #[test]
    fn drop_without_approval_keeps_data() {
        let mut conn = open_db_in_memory().unwrap();
        InstructorService::new(&conn)
            .create(NewInstructor::new("Ada", "Math"))
            .unwrap();

        let text = run_for_test(&mut conn, &["drop"]).unwrap();

        assert_eq!(text, "Drop cancelled.");
        assert_eq!(InstructorService::new(&conn).count().unwrap(), 1);
    }

    #[test]
    fn drop_with_yes_empties_the_store() {
        let mut conn = open_db_in_memory().unwrap();
        InstructorService::new(&conn)
            .create(NewInstructor::new("Ada", "Math"))
            .unwrap();

        run_for_test(&mut conn, &["drop", "--yes"]).unwrap();

        assert_eq!(InstructorService::new(&conn).count().unwrap(), 0);
    }

    #[test]
    fn status_reports_counts() {
        let mut conn = open_db_in_memory().unwrap();
        InstructorService::new(&conn)
            .create(NewInstructor::new("Ada", "Math"))
            .unwrap();

        let text = run_for_test(&mut conn, &["status"]).unwrap();
        assert!(text.contains("Instructors: 1"));
        assert!(text.contains("Courses: 0"));

        let json = run_for_test(&mut conn, &["status", "--json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["instructors"], 1);
        assert_eq!(value["schema_version"], 2);
    }
}
