//! Remote store key/path conventions.
//!
//! Pure string functions, no AWS SDK dependency. These define the canonical
//! layout of collection objects in the ecycle bucket.

use uuid::Uuid;

/// Collection holding submitted feedback records.
pub const FEEDBACK: &str = "feedback";

pub fn collection_prefix(collection: &str) -> String {
    format!("{collection}/")
}

pub fn record(collection: &str, id: Uuid) -> String {
    format!("{collection}/{id}.json")
}

pub fn feedback(id: Uuid) -> String {
    record(FEEDBACK, id)
}
