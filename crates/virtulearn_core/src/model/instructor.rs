//! Instructor records.
//!
//! # Invariants
//! - `name` is trimmed, non-blank and unique across instructors.
//! - `expertise` is non-blank.
//! - `email`, when present, is unique (case-insensitive).

use super::validation::{require_text, trim_text, ConstraintViolation};
use super::{EntityKind, InstructorId};
use serde::{Deserialize, Serialize};

/// Persisted instructor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    /// Subject area the instructor teaches.
    pub expertise: String,
    pub email: Option<String>,
}

impl Instructor {
    /// Checks the field rules that do not need the store.
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        validate_fields(&self.name, &self.expertise)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: InstructorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(expertise) = patch.expertise {
            self.expertise = expertise;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

/// Fields for a new instructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewInstructor {
    pub name: String,
    pub expertise: String,
    pub email: Option<String>,
}

impl NewInstructor {
    pub fn new(name: impl Into<String>, expertise: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expertise: expertise.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Trims text fields so uniqueness compares what users see.
    pub fn normalized(self) -> Self {
        Self {
            name: trim_text(self.name),
            expertise: trim_text(self.expertise),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        validate_fields(&self.name, &self.expertise)
    }
}

/// Partial instructor update. `None` leaves a field unchanged; for `email`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstructorPatch {
    pub name: Option<String>,
    pub expertise: Option<String>,
    pub email: Option<Option<String>>,
}

impl InstructorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.expertise.is_none() && self.email.is_none()
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(trim_text),
            expertise: self.expertise.map(trim_text),
            ..self
        }
    }
}

fn validate_fields(name: &str, expertise: &str) -> Result<(), ConstraintViolation> {
    require_text(EntityKind::Instructor, "name", name)?;
    require_text(EntityKind::Instructor, "expertise", expertise)?;
    Ok(())
}
