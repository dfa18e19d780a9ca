//! ecycle-storage
//!
//! Remote store adapter. The queue only sees [`store::RemoteStore`]; the S3
//! backend is a thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod store;
