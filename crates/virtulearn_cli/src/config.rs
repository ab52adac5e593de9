//! Runtime settings for the `virtulearn` binary.
//!
//! Precedence per setting: command-line flag, then environment variable
//! (both handled by clap), then the platform default resolved here.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "virtulearn";
const DB_FILE_NAME: &str = "courses.db";
const LOG_DIR_NAME: &str = "logs";

/// Options accepted before any subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// SQLite store file
    #[arg(long, env = "VIRTULEARN_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, env = "VIRTULEARN_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "VIRTULEARN_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Also print logged warnings and errors to stderr
    #[arg(long, global = true)]
    pub log_stderr: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub log_stderr: bool,
    pub json: bool,
}

impl AppConfig {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        Self::resolve_with(args, dirs::data_dir())
    }

    fn resolve_with(args: &GlobalArgs, data_dir: Option<PathBuf>) -> Result<Self> {
        let app_dir = || {
            data_dir
                .as_ref()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| anyhow!("could not determine the user data directory; pass --db and --log-dir"))
        };

        let db_path = match &args.db {
            Some(path) => path.clone(),
            None => app_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match &args.log_dir {
            Some(path) => absolutize(path)?,
            None => app_dir()?.join(LOG_DIR_NAME),
        };
        let log_level = args
            .log_level
            .clone()
            .unwrap_or_else(|| virtulearn_core::default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
            log_stderr: args.log_stderr,
            json: args.json,
        })
    }

    /// Creates the store's parent directory when it is missing.
    pub fn ensure_db_parent(&self) -> Result<()> {
        match self.db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display())),
            _ => Ok(()),
        }
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Ok(cwd.join(path))
}
