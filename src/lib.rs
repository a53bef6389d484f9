//! Turnchime - conversation outcome monitor.
//!
//! This crate watches a continuously re-rendered snapshot of a conversational
//! build page, extracts the assistant's messages from the document tree, and
//! classifies newly appeared messages as a success or an error so a listener
//! can play the matching chime.
//!
//! # Overview
//!
//! A renderer keeps an HTML snapshot file of the page up to date. The
//! [`watcher`] turns rewrites of that file into mutation signals, the
//! [`observer`] debounces them (with a periodic poll as a fallback) and runs
//! the check pipeline: snapshot the document ([`dom`]), extract candidate
//! messages ([`extractor`] and [`filter`]), compare the count against the
//! session's high-water mark ([`session`]), classify the newest messages
//! ([`classifier`]), and hand an actionable outcome to the [`notifier`].
//!
//! At most one notification is emitted per detected message-count increase.
//!
//! # Modules
//!
//! - [`types`]: Outcome and candidate message types
//! - [`dom`]: Document snapshot parsing and selector queries
//! - [`filter`]: Conversational-text heuristics
//! - [`classifier`]: Ordered pattern tables for outcome classification
//! - [`extractor`]: Candidate message extraction
//! - [`session`]: Per-page monitoring state and the check pipeline
//! - [`observer`]: Debounce and poll loop driving the session
//! - [`watcher`]: File system watcher for the page snapshot and settings
//! - [`settings`]: User settings and their JSON file provider
//! - [`notifier`]: Notification sinks
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for engine operations

pub mod classifier;
pub mod config;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod notifier;
pub mod observer;
pub mod session;
pub mod settings;
pub mod types;
pub mod watcher;

pub use classifier::classify;
pub use config::{Config, ConfigError};
pub use dom::{DomError, DomSnapshot, DomSource, FileDomSource};
pub use error::{MonitorError, Result};
pub use extractor::MessageExtractor;
pub use filter::is_conversational;
pub use notifier::{HttpNotifier, NotificationSink, NotifierError};
pub use observer::{ChangeObserver, PageSignal};
pub use session::{classify_page_url, MonitorSession, PageKind};
pub use settings::{FileSettingsProvider, Settings, SettingsError, SettingsProvider};
pub use types::{CandidateMessage, Outcome};
pub use watcher::{PageWatcher, WatcherError};
