//! Error taxonomy of the core.
//!
//! Only two kinds exist: the knowledge base could not be built at startup, or an external
//! capability failed during a query. The latter never reaches the caller of
//! [`ResponseRouter::answer`](crate::ResponseRouter::answer); it only selects a fallback branch.

use std::path::PathBuf;
use std::time::Duration;

/// The record source was missing, unreadable or malformed. Construction fails as a whole.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseUnavailable {
    #[error("knowledge base file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("knowledge base {} is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("record {row} has an empty `{field}` field")]
    EmptyField { row: usize, field: &'static str },
}

/// An augmentation or transfer-judgment call did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityFailure {
    #[error("capability request failed: {0}")]
    Request(String),

    #[error("capability returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("capability returned an unusable response: {0}")]
    InvalidResponse(String),

    #[error("capability timed out after {0:?}")]
    Timeout(Duration),

    #[error("capability unavailable: {0}")]
    Unavailable(String),
}
