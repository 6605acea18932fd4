// ABOUTME: Field-scoped validation of a parsed session tree
// Collects every violation in one pass instead of stopping at the first

use serde::Serialize;
use std::fmt;

use super::layout::{Layout, Split};
use super::session::SessionSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `windows[2].panes[0].split`.
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// First error reported for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field)
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        writeln!(f, "validation errors:")?;
        for err in &self.0 {
            writeln!(f, "  - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Check a session tree and return every violation found.
pub fn validate(spec: &SessionSpec) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if spec.session.name.is_empty() {
        errors.push("session.name", "session name is required");
    }

    if spec.windows.is_empty() {
        errors.push("windows", "at least one window is required");
    }

    for (i, window) in spec.windows.iter().enumerate() {
        if window.name.is_empty() {
            errors.push(format!("windows[{}].name", i), "window name is required");
        }

        if !window.layout.is_empty() && window.layout.parse::<Layout>().is_err() {
            errors.push(
                format!("windows[{}].layout", i),
                format!(
                    "invalid layout '{}', must be one of: {}",
                    window.layout,
                    Layout::names()
                ),
            );
        }

        if window.panes.is_empty() {
            errors.push(
                format!("windows[{}].panes", i),
                "at least one pane is required",
            );
        }

        for (j, pane) in window.panes.iter().enumerate() {
            if !pane.split.is_empty() && pane.split.parse::<Split>().is_err() {
                errors.push(
                    format!("windows[{}].panes[{}].split", i, j),
                    format!(
                        "invalid split '{}', must be one of: {}",
                        pane.split,
                        Split::names()
                    ),
                );
            }
        }
    }

    errors
}

impl SessionSpec {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let errors = validate(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
