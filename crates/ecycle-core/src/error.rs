use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// A form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FeedbackField {
    Message,
    Email,
    Rating,
}

impl FeedbackField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Email => "email",
            Self::Rating => "rating",
        }
    }

    /// User-facing prompt shown next to the offending field.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Message => "please enter your feedback message",
            Self::Email => "please enter your email address",
            Self::Rating => "rating must be between 1 and 5",
        }
    }
}

impl fmt::Display for FeedbackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection of a feedback draft before any record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .field.hint())]
pub struct ValidationError {
    pub field: FeedbackField,
}

impl ValidationError {
    pub fn new(field: FeedbackField) -> Self {
        Self { field }
    }
}
