//! Submission form validation.
//!
//! The stores accept any draft; these checks belong to the form layer and
//! run before a draft is built. All violations are collected rather than
//! stopping at the first.

use std::fmt;

use thiserror::Error;

use crate::feedback::{Category, FeedbackDraft};
use crate::identity::Identity;

/// Minimum title length in characters.
pub const TITLE_MIN: usize = 5;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;

/// Minimum description length in characters.
pub const DESCRIPTION_MIN: usize = 20;

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors of a rejected form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid submission: {}", join(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|e| e.field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw input of the feedback submission form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub is_anonymous: bool,
}

impl FeedbackForm {
    /// Check the form and, if it passes, build a pending draft for `author`.
    pub fn validate(&self, author: &Identity) -> Result<FeedbackDraft, ValidationErrors> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if title_len < TITLE_MIN {
            errors.push(FieldError {
                field: "title",
                message: format!("Title must be at least {TITLE_MIN} characters"),
            });
        } else if title_len > TITLE_MAX {
            errors.push(FieldError {
                field: "title",
                message: format!("Title must be at most {TITLE_MAX} characters"),
            });
        }

        if self.description.chars().count() < DESCRIPTION_MIN {
            errors.push(FieldError {
                field: "description",
                message: format!("Description must be at least {DESCRIPTION_MIN} characters"),
            });
        }

        let Some(category) = self.category else {
            errors.push(FieldError {
                field: "category",
                message: "Please select a category".to_owned(),
            });
            return Err(ValidationErrors(errors));
        };

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(FeedbackDraft::from_author(
            author,
            self.title.clone(),
            self.description.clone(),
            category,
            self.is_anonymous,
        ))
    }
}

/// Reject blank comment text.
pub fn validate_comment_text(text: &str) -> Result<(), ValidationErrors> {
    if text.trim().is_empty() {
        return Err(ValidationErrors(vec![FieldError {
            field: "text",
            message: "Please enter a comment before submitting".to_owned(),
        }]));
    }
    Ok(())
}
