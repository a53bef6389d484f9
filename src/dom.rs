//! Document tree access for the monitoring engine.
//!
//! The engine never talks to a live browser. It operates on [`DomSnapshot`]s:
//! immutable parses of the page HTML taken at check time. A snapshot exposes
//! the three capabilities the engine needs from a document tree: structural
//! queries by CSS selector, flattened text content per node, and a
//! document-position ordering between nodes (the depth-first traversal index).
//!
//! [`DomSource`] abstracts where snapshots come from. The daemon uses
//! [`FileDomSource`] over a page-snapshot file that an external renderer keeps
//! rewriting; tests inject stub sources with canned HTML.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ego_tree::NodeId;
use scraper::{Html, Selector};
use thiserror::Error;

/// Errors from document tree access.
#[derive(Error, Debug)]
pub enum DomError {
    /// A structural query string could not be parsed as a CSS selector.
    #[error("invalid selector `{selector}`: {message}")]
    Selector {
        /// The offending selector.
        selector: String,
        /// Parser diagnostic.
        message: String,
    },

    /// Failed to read the page source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A node matched by a structural query.
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Opaque handle into the snapshot's tree.
    pub id: NodeId,

    /// Depth-first traversal index; earlier in the document means smaller.
    pub position: usize,

    /// Flattened text content, untrimmed.
    pub text: String,
}

/// An immutable parse of the page at a point in time.
pub struct DomSnapshot {
    doc: Html,
    positions: HashMap<NodeId, usize>,
}

impl DomSnapshot {
    /// Parses an HTML document into a snapshot.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let positions = doc
            .tree
            .root()
            .descendants()
            .enumerate()
            .map(|(index, node)| (node.id(), index))
            .collect();

        Self { doc, positions }
    }

    /// Runs a structural query, returning matched nodes in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Selector`] if the selector does not parse. Callers
    /// scanning an ordered selector list are expected to skip such queries
    /// and continue with the next one.
    pub fn query(&self, selector: &str) -> Result<Vec<DomNode>, DomError> {
        let parsed = Selector::parse(selector).map_err(|e| DomError::Selector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;

        Ok(self
            .doc
            .select(&parsed)
            .map(|element| DomNode {
                id: element.id(),
                position: self.position_of(element.id()),
                text: element.text().collect(),
            })
            .collect())
    }

    /// Returns the document-position index of a node handle.
    ///
    /// Handles not present in this snapshot sort last.
    #[must_use]
    pub fn position_of(&self, id: NodeId) -> usize {
        self.positions.get(&id).copied().unwrap_or(usize::MAX)
    }

    /// Total number of nodes in the snapshot.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }
}

impl std::fmt::Debug for DomSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomSnapshot")
            .field("node_count", &self.positions.len())
            .finish()
    }
}

/// Source of document snapshots for the check routine.
pub trait DomSource {
    /// Produces a fresh snapshot of the current document.
    fn snapshot(&self) -> Result<DomSnapshot, DomError>;
}

/// Snapshot source backed by an HTML file on disk.
///
/// The file is read and parsed on every call; the engine's debounce and poll
/// cadence bound how often that happens.
#[derive(Debug, Clone)]
pub struct FileDomSource {
    path: PathBuf,
}

impl FileDomSource {
    /// Creates a source reading from the given path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DomSource for FileDomSource {
    fn snapshot(&self) -> Result<DomSnapshot, DomError> {
        let html = fs::read_to_string(&self.path)?;
        Ok(DomSnapshot::parse(&html))
    }
}
