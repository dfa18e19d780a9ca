//! ecycle-core
//!
//! Pure domain types for the feedback pipeline and remote store key conventions.
//! No I/O and no AWS SDK dependency. This is the shared vocabulary of the ecycle system.

pub mod error;
pub mod models;
pub mod store_keys;
