//! ecycle-feedback
//!
//! Offline-capable feedback submission: a connectivity monitor, the pending
//! queue that buffers submissions while offline, and the flush that drains it
//! to the remote store once the connection comes back.

pub mod connectivity;
pub mod error;
pub mod notice;
pub mod queue;
