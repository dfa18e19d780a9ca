use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use tracing::info;

/// How long a banner stays on screen.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short-lived banner message for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: Timestamp,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            posted_at: Timestamp::now(),
        }
    }
}

/// Holds the most recent notice until it expires. A new notice replaces the old one.
pub struct NoticeBoard {
    ttl: SignedDuration,
    current: Mutex<Option<Notice>>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            current: Mutex::new(None),
        }
    }

    pub fn post(&self, notice: Notice) {
        info!(notice.level = ?notice.level, notice.message = %notice.message, "notice posted");
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice);
    }

    /// The live notice, if any.
    pub fn current(&self) -> Option<Notice> {
        self.current_at(Timestamp::now())
    }

    pub fn current_at(&self, now: Timestamp) -> Option<Notice> {
        let mut slot = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = slot
            .as_ref()
            .is_some_and(|notice| now.duration_since(notice.posted_at) >= self.ttl);
        if expired {
            *slot = None;
        }
        slot.clone()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
