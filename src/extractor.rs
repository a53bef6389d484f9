//! Candidate message extraction from a document snapshot.
//!
//! The page does not tag its conversational turns, so extraction is a
//! prioritized sweep: specific structural queries first (semantic role
//! markers, prose/markdown class heuristics), then conversation containers,
//! then progressively broader fallbacks ending in a bare `div` scan. Every
//! matched node is trimmed, filtered through [`crate::filter`], bounded in
//! length, and deduplicated by exact text so two containers wrapping the same
//! turn count once.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, trace};

use crate::dom::DomSnapshot;
use crate::filter::is_conversational;
use crate::types::CandidateMessage;

/// Candidates must be strictly longer than this, in characters.
pub const MIN_CANDIDATE_CHARS: usize = 50;

/// Candidates must be strictly shorter than this, in characters.
pub const MAX_CANDIDATE_CHARS: usize = 10_000;

/// Structural queries in priority order: specific first, broad fallback last.
///
/// Entries that the selector engine cannot parse are skipped at scan time, so
/// the list can carry host-specific queries without breaking extraction.
const MESSAGE_SELECTORS: &[&str] = &[
    r#"[data-role="assistant"]"#,
    r#"[role="assistant"]"#,
    r#"div[class*="prose"]"#,
    r#"div[class*="markdown"]"#,
    r#"[class*="conversation"]"#,
    r#"[class*="chat-message"]"#,
    r#"[data-testid*="chat"]"#,
    r#"[data-testid*="message"]"#,
    r#"div:has(p):not([class*="sidebar"]):not([class*="header"]):not([class*="footer"])"#,
    "main div",
    "article div",
    "div",
];

/// Extracts candidate conversational messages from document snapshots.
#[derive(Debug, Default)]
pub struct MessageExtractor;

impl MessageExtractor {
    /// Creates an extractor with the built-in selector list.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scans a snapshot and returns candidate messages ordered by document
    /// position, ascending.
    ///
    /// Pure with respect to engine state: repeated calls on the same snapshot
    /// return the same candidates (timestamps aside).
    #[must_use]
    pub fn extract(&self, snapshot: &DomSnapshot) -> Vec<CandidateMessage> {
        let mut seen_texts: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();
        let observed_at = Utc::now();

        for selector in MESSAGE_SELECTORS {
            let nodes = match snapshot.query(selector) {
                Ok(nodes) => nodes,
                Err(e) => {
                    trace!(selector, error = %e, "Skipping unsupported selector");
                    continue;
                }
            };

            for node in nodes {
                let text = node.text.trim();
                let chars = text.chars().count();
                if chars <= MIN_CANDIDATE_CHARS || chars >= MAX_CANDIDATE_CHARS {
                    continue;
                }
                if !is_conversational(text) {
                    continue;
                }
                if seen_texts.contains(text) {
                    continue;
                }

                seen_texts.insert(text.to_string());
                candidates.push(CandidateMessage {
                    node: node.id,
                    position: node.position,
                    text: text.to_string(),
                    observed_at,
                });
            }
        }

        // Stable sort keeps selector-priority order for equal positions.
        candidates.sort_by_key(|candidate| candidate.position);

        debug!(count = candidates.len(), "Extraction pass complete");
        candidates
    }
}
