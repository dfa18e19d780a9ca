use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{FeedbackField, ValidationError};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum FeedbackKind {
    #[default]
    Suggestion,
    BugReport,
    Compliment,
    FeatureRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum FeedbackCategory {
    #[default]
    General,
    Ui,
    Performance,
    Locations,
    Rewards,
    Scheduling,
}

/// Lifecycle tag. Records are always created as `New`; only the remote store
/// moves them forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum FeedbackStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

/// What the feedback form hands over on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct FeedbackDraft {
    pub kind: FeedbackKind,
    pub message: String,
    pub rating: u8,
    pub contact_email: String,
    pub category: FeedbackCategory,
}

impl Default for FeedbackDraft {
    fn default() -> Self {
        Self {
            kind: FeedbackKind::Suggestion,
            message: String::new(),
            rating: MAX_RATING,
            contact_email: String::new(),
            category: FeedbackCategory::General,
        }
    }
}

impl FeedbackDraft {
    /// Check required fields in form order: message, then email, then rating.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::new(FeedbackField::Message));
        }
        if self.contact_email.trim().is_empty() {
            return Err(ValidationError::new(FeedbackField::Email));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::new(FeedbackField::Rating));
        }
        Ok(())
    }
}

/// A single feedback submission as stored in the `feedback` collection.
///
/// Field names on the wire follow the hosted CMS collection schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FeedbackRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "feedbackType")]
    pub kind: FeedbackKind,
    #[serde(rename = "feedbackMessage")]
    pub message: String,
    pub rating: u8,
    #[serde(rename = "userEmail")]
    pub contact_email: String,
    #[serde(rename = "submittedDate")]
    pub submitted_at: jiff::Timestamp,
    #[serde(default)]
    pub status: FeedbackStatus,
    #[serde(default)]
    pub category: FeedbackCategory,
}

impl FeedbackRecord {
    /// Validate `draft` and stamp it with a fresh id, `submitted_at` and `New` status.
    pub fn from_draft(draft: FeedbackDraft, now: jiff::Timestamp) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            message: draft.message,
            rating: draft.rating,
            contact_email: draft.contact_email,
            submitted_at: now,
            status: FeedbackStatus::New,
            category: draft.category,
        })
    }

    /// Copy of this record as it is written during a flush: same id,
    /// `submitted_at` moved to the flush time, status back to `New`.
    pub fn restamped(&self, now: jiff::Timestamp) -> Self {
        Self {
            submitted_at: now,
            status: FeedbackStatus::New,
            ..self.clone()
        }
    }
}
