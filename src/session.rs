//! Monitoring session state and the per-check pipeline.
//!
//! A [`MonitorSession`] owns everything one watched page needs: whether
//! monitoring is active, the high-water message count, the page exclusion
//! verdict, and the current settings snapshot. Each check runs the full
//! pipeline (snapshot, extract, compare counts, classify, notify) and is
//! idempotent on an unchanged page: notifications fire only when the
//! candidate count strictly exceeds the count recorded at the last firing.

use tracing::{debug, info, warn};
use url::Url;

use crate::dom::DomSource;
use crate::extractor::MessageExtractor;
use crate::notifier::NotificationSink;
use crate::settings::{Settings, SettingsProvider};
use crate::types::Outcome;

/// How many of the newest candidates are inspected for an outcome per check.
pub const RECENT_WINDOW: usize = 3;

/// Coarse classification of the watched page's URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A workspace page where conversations happen. Monitored.
    Project,
    /// The bare site root. Never monitored.
    Landing,
    /// Anything else, including unparseable URLs. Monitored.
    Unknown,
}

/// Classifies a page URL into a [`PageKind`].
///
/// Workspace paths are recognized by the `/~/`, `/edit/`, and `/project/`
/// segments. A URL with an empty or root path is the landing page and is
/// excluded from monitoring. Unparseable URLs fall through to [`PageKind::Unknown`]
/// so a malformed configuration degrades to monitoring rather than silence.
#[must_use]
pub fn classify_page_url(page_url: &str) -> PageKind {
    let Ok(url) = Url::parse(page_url) else {
        return PageKind::Unknown;
    };

    let path = url.path();
    if path.contains("/~/") || path.contains("/edit/") || path.contains("/project/") {
        return PageKind::Project;
    }
    if path.is_empty() || path == "/" {
        return PageKind::Landing;
    }
    PageKind::Unknown
}

/// State for one monitored page.
#[derive(Debug)]
pub struct MonitorSession {
    is_monitoring: bool,
    last_message_count: usize,
    is_excluded_page: bool,
    settings: Settings,
    extractor: MessageExtractor,
}

impl MonitorSession {
    /// Creates an idle session for the given page URL.
    ///
    /// The exclusion verdict is fixed at construction: in-page navigation
    /// restarts the session rather than mutating it.
    #[must_use]
    pub fn new(page_url: &str) -> Self {
        let kind = classify_page_url(page_url);
        let is_excluded_page = kind == PageKind::Landing;
        if is_excluded_page {
            info!(page_url, "Landing page detected, monitoring disabled");
        } else {
            debug!(page_url, ?kind, "Session created");
        }

        Self {
            is_monitoring: false,
            last_message_count: 0,
            is_excluded_page,
            settings: Settings::default(),
            extractor: MessageExtractor::new(),
        }
    }

    /// Whether the session is actively monitoring.
    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.is_monitoring
    }

    /// Whether the page is excluded from monitoring entirely.
    #[must_use]
    pub fn is_excluded_page(&self) -> bool {
        self.is_excluded_page
    }

    /// High-water candidate count from the last notification-producing check.
    #[must_use]
    pub fn last_message_count(&self) -> usize {
        self.last_message_count
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Activates monitoring and loads settings. No-op on an excluded page.
    pub fn start<P: SettingsProvider>(&mut self, provider: &P) {
        if self.is_excluded_page {
            debug!("Start ignored on excluded page");
            return;
        }
        self.refresh_settings(provider);
        self.is_monitoring = true;
        info!("Monitoring started");
    }

    /// Deactivates monitoring. Counts are retained for a later restart.
    pub fn stop(&mut self) {
        self.is_monitoring = false;
        info!("Monitoring stopped");
    }

    /// Reloads settings from the provider, keeping the previous snapshot if
    /// the reload fails.
    pub fn refresh_settings<P: SettingsProvider>(&mut self, provider: &P) {
        match provider.get() {
            Ok(settings) => {
                self.settings = settings.normalized();
                debug!("Settings refreshed");
            }
            Err(e) => {
                warn!(error = %e, "Settings reload failed, keeping previous settings");
            }
        }
    }

    /// Runs one full check against the page.
    ///
    /// At most one notification is emitted per call, and only when the
    /// candidate count has strictly increased since the last firing. The
    /// high-water count advances only on an increase, so a page that sheds
    /// and re-renders messages cannot re-trigger on old content.
    pub async fn run_check<S, N>(&mut self, source: &S, sink: &N)
    where
        S: DomSource,
        N: NotificationSink,
    {
        if self.is_excluded_page || !self.is_monitoring {
            return;
        }

        // The parsed snapshot is not Sync; scope it so only the owned
        // candidate list crosses the await below.
        let candidates = {
            let snapshot = match source.snapshot() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(error = %e, "Snapshot failed, skipping check");
                    return;
                }
            };
            self.extractor.extract(&snapshot)
        };

        let count = candidates.len();
        if count <= self.last_message_count {
            debug!(
                count,
                last = self.last_message_count,
                "No new messages"
            );
            return;
        }

        info!(
            count,
            last = self.last_message_count,
            "Message count increased"
        );

        // Walk the newest messages in document order; the first actionable
        // outcome wins. Error precedence lives inside classify, per message.
        let window_start = count.saturating_sub(RECENT_WINDOW);
        let outcome = candidates[window_start..]
            .iter()
            .map(|candidate| crate::classifier::classify(&candidate.text))
            .find(|outcome| outcome.is_actionable())
            .unwrap_or(Outcome::None);

        // The sink always gets the settings snapshot alongside the outcome;
        // whether to actually play audio is the collaborator's call.
        if outcome.is_actionable() {
            if let Err(e) = sink.notify(outcome, &self.settings).await {
                warn!(error = %e, %outcome, "Notification delivery failed");
            }
        } else {
            debug!(%outcome, "No actionable outcome in recent messages");
        }

        self.last_message_count = count;
    }
}
