//! `virtulearn` command-line entry point.
//!
//! # Responsibility
//! - Resolve settings, start logging and open the store.
//! - Dispatch one subcommand, or run the interactive menu.
//! - Print results to stdout and `error[<code>]: <message>` to stderr.
//!
//! # Invariants
//! - The schema is initialized on every start before any command runs.
//! - Any failure exits with status 1.

use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use log::{error, info, warn};
use virtulearn_core::{init_logging, open_db, DbError, LoggingOptions, RepoError, ValidationError};

mod commands;
mod config;
mod menu;
mod output;

use commands::Command;
use config::{AppConfig, GlobalArgs};
use output::Renderer;

#[derive(Debug, Parser)]
#[command(name = "virtulearn")]
#[command(about = "Manage instructors, courses and enrollments", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("event=cli_exit module=cli status=error error_code={}", error_code(&err));
        eprintln!("{}", render_error(&err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(&cli.global)?;

    let logging = LoggingOptions::new(config.log_level.as_str(), config.log_dir.as_path())
        .with_echo_warnings(config.log_stderr);
    if let Err(message) = init_logging(&logging) {
        eprintln!("warning: logging disabled: {message}");
    }

    config.ensure_db_parent()?;
    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open store `{}`", config.db_path.display()))?;
    info!("event=cli_start module=cli status=ok json={}", config.json);

    let out = Renderer::new(config.json);
    match cli.command {
        Command::Menu => menu::run(&mut conn, &out),
        command => {
            let text = commands::execute(command, &mut conn, &out, &mut |prompt| {
                Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
            })?;
            println!("{text}");
            Ok(())
        }
    }
}

/// Stable tag for the outermost known error in the chain.
pub(crate) fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(repo_err) = cause.downcast_ref::<RepoError>() {
            return repo_err.code();
        }
        if cause.downcast_ref::<ValidationError>().is_some() {
            return "validation_error";
        }
        if cause.downcast_ref::<DbError>().is_some() {
            return "storage_error";
        }
    }
    warn!("event=cli_error module=cli status=unclassified");
    "cli_error"
}

/// `error[<code>]: <message>` with the full cause chain.
pub(crate) fn render_error(err: &anyhow::Error) -> String {
    format!("error[{}]: {err:#}", error_code(err))
}

#[cfg(test)]
mod tests {
    use super::{render_error, Cli};
    use crate::commands::Command;
    use anyhow::anyhow;
    use clap::Parser;
    use virtulearn_core::{EntityKind, RepoError};

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "virtulearn",
            "instructor",
            "list",
            "--json",
            "--db",
            "/tmp/v.db",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert_eq!(cli.global.db.unwrap().to_str(), Some("/tmp/v.db"));
        assert!(matches!(cli.command, Command::Instructor(_)));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["virtulearn"]).is_err());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["virtulearn", "teach"]).is_err());
    }

    #[test]
    fn repo_errors_render_with_their_code() {
        let err = anyhow::Error::from(RepoError::NotFound {
            entity: EntityKind::Course,
            id: 7,
        });
        assert_eq!(render_error(&err), "error[not_found]: course not found: 7");
    }

    #[test]
    fn context_does_not_hide_the_code() {
        let err = anyhow::Error::from(RepoError::NotFound {
            entity: EntityKind::Instructor,
            id: 1,
        })
        .context("while deleting");
        assert!(render_error(&err).starts_with("error[not_found]: while deleting"));
    }

    #[test]
    fn plain_errors_use_cli_code() {
        assert!(render_error(&anyhow!("nothing to update")).starts_with("error[cli_error]"));
    }
}
