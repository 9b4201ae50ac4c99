//! Artifact storage
//!
//! Two interchangeable publishers behind one trait: S3-compatible object
//! storage (presigned URLs) and a local directory (path URLs).

mod publisher;
mod s3_client;
mod types;

#[cfg(test)]
pub use publisher::MockPublisher;
pub use publisher::{LocalPublisher, Publisher, LOCAL_FILES_ROUTE};
pub use s3_client::{S3Publisher, PDF_CONTENT_TYPE};
pub use types::*;
