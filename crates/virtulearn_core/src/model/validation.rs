//! Field rules shared by all entities.
//!
//! Two failure families live here:
//! - `ValidationError`: raw input that cannot be turned into a field value
//!   at all (not an integer, not an email, not a date).
//! - `ConstraintViolation`: a well-formed value that breaks a store rule
//!   (blank required text, non-positive duration, duplicate unique value).

use super::EntityKind;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// `YYYY-MM-DD`, the only accepted calendar date input format.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Malformed raw input, rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is not a base-10 integer.
    NotAnInteger { field: &'static str, value: String },
    /// Value does not look like `local@domain.tld`.
    InvalidEmail { field: &'static str, value: String },
    /// Value is not a `YYYY-MM-DD` calendar date.
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotAnInteger { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidDate { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnInteger { field, value } => {
                write!(f, "{field} must be an integer, got `{value}`")
            }
            Self::InvalidEmail { field, value } => {
                write!(f, "{field} must be an email address, got `{value}`")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be a YYYY-MM-DD date, got `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Which store rule a value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Value collides with an existing row.
    Unique,
    /// Required value is missing or blank.
    Required,
    /// Integer value must be greater than zero.
    Positive,
    /// Referenced row does not exist.
    ForeignKey,
    /// Any other CHECK rule.
    Check,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Required => "required",
            Self::Positive => "positive",
            Self::ForeignKey => "foreign_key",
            Self::Check => "check",
        }
    }
}

/// A uniqueness or required-field rule broken by a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub entity: EntityKind,
    /// Column name, or `unknown` when the store did not report one.
    pub field: String,
    pub kind: ConstraintKind,
}

impl ConstraintViolation {
    pub fn new(entity: EntityKind, field: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            entity,
            field: field.into(),
            kind,
        }
    }
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self {
            entity,
            field,
            kind,
        } = self;
        match kind {
            ConstraintKind::Unique => write!(f, "{entity} {field} must be unique"),
            ConstraintKind::Required => write!(f, "{entity} {field} is required"),
            ConstraintKind::Positive => {
                write!(f, "{entity} {field} must be a positive integer")
            }
            ConstraintKind::ForeignKey => {
                write!(f, "{entity} {field} references a missing record")
            }
            ConstraintKind::Check => write!(f, "{entity} {field} failed a check constraint"),
        }
    }
}

impl Error for ConstraintViolation {}

/// Rejects empty or whitespace-only required text.
pub fn require_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ConstraintViolation> {
    if value.trim().is_empty() {
        return Err(ConstraintViolation::new(
            entity,
            field,
            ConstraintKind::Required,
        ));
    }
    Ok(())
}

/// Strips surrounding whitespace, reusing the buffer when nothing changes.
pub fn trim_text(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Rejects zero and negative values.
pub fn require_positive(
    entity: EntityKind,
    field: &'static str,
    value: i64,
) -> Result<(), ConstraintViolation> {
    if value <= 0 {
        return Err(ConstraintViolation::new(
            entity,
            field,
            ConstraintKind::Positive,
        ));
    }
    Ok(())
}

/// Parses an integer input such as a duration or an id.
pub fn parse_integer(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw.to_string(),
        })
}

/// Parses a course duration in hours.
///
/// Only the integer shape is checked here; positivity is a store rule and is
/// reported as a `ConstraintViolation` on write.
pub fn parse_duration(raw: &str) -> Result<i64, ValidationError> {
    parse_integer("duration", raw)
}

/// Trims an optional email; blank input means "no email".
pub fn normalize_email(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::InvalidEmail {
            field,
            value: value.to_string(),
        });
    }
    Ok(Some(value.to_string()))
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        }
    })
}
