//! Core types for conversational page monitoring.
//!
//! This module defines the outcome classification result and the candidate
//! message record produced by the extractor. Candidate messages are ephemeral:
//! they are constructed fresh on every extraction pass and never persisted.

use chrono::{DateTime, Utc};
use ego_tree::NodeId;
use serde::{Deserialize, Serialize};

/// Classification of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The turn signals that the task succeeded.
    Success,
    /// The turn signals that the task failed.
    Error,
    /// The turn carries no completion signal.
    None,
}

impl Outcome {
    /// Returns true for outcomes that trigger a notification.
    #[must_use]
    pub fn is_actionable(self) -> bool {
        !matches!(self, Outcome::None)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
            Outcome::None => "none",
        };
        f.write_str(label)
    }
}

/// A text fragment extracted from the page, judged likely to be a
/// conversational turn.
///
/// `node` is an opaque handle into the snapshot the message was extracted
/// from; it is not owned and must not be dereferenced after the snapshot is
/// dropped. Ordering and deduplication rely on `position` and `text` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMessage {
    /// Handle of the node the text came from.
    pub node: NodeId,

    /// Depth-first traversal index within the snapshot, used as the
    /// document-position ordering key.
    pub position: usize,

    /// Trimmed flattened text content of the node.
    pub text: String,

    /// When this candidate was observed.
    pub observed_at: DateTime<Utc>,
}
