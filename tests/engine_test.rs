//! Integration tests for the end-to-end check pipeline.
//!
//! These tests drive a [`MonitorSession`] through full checks against an
//! in-memory page source, verifying the one-notification-per-increase
//! contract as the page grows, stalls, and grows again.

use std::sync::Mutex;

use async_trait::async_trait;
use turnchime::dom::{DomError, DomSnapshot, DomSource};
use turnchime::notifier::{NotificationSink, NotifierError};
use turnchime::session::MonitorSession;
use turnchime::settings::{Settings, SettingsError, SettingsProvider};
use turnchime::types::Outcome;

// =============================================================================
// Test Helpers
// =============================================================================

/// Page source backed by a mutable HTML string.
struct StubSource {
    html: Mutex<String>,
}

impl StubSource {
    fn new(body: &str) -> Self {
        Self {
            html: Mutex::new(format!("<html><body>{body}</body></html>")),
        }
    }

    fn set_body(&self, body: &str) {
        *self.html.lock().unwrap() = format!("<html><body>{body}</body></html>");
    }
}

impl DomSource for StubSource {
    fn snapshot(&self) -> Result<DomSnapshot, DomError> {
        Ok(DomSnapshot::parse(&self.html.lock().unwrap()))
    }
}

/// Settings provider returning a fixed snapshot.
struct StaticProvider(Settings);

impl SettingsProvider for StaticProvider {
    fn get(&self) -> Result<Settings, SettingsError> {
        Ok(self.0.clone())
    }
}

/// Sink recording every delivered outcome.
#[derive(Default)]
struct RecordingSink {
    outcomes: Mutex<Vec<Outcome>>,
}

impl RecordingSink {
    fn delivered(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, outcome: Outcome, _settings: &Settings) -> Result<(), NotifierError> {
        self.outcomes.lock().unwrap().push(outcome);
        Ok(())
    }
}

/// Builds a page body of `n` neutral messages, each long and conversational
/// enough to survive extraction, each with a distinct number.
fn neutral_messages(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "<div>Let me walk you through step {i} of how the project handles \
                 routing between the editor and the preview pane.</div>"
            )
        })
        .collect()
}

const SUCCESS_MSG: &str =
    "I've created the login page and deployed it successfully to the site.";
const ERROR_MSG: &str =
    "I've hit a missing import in the build. Should we try to fix this problem?";

fn started_session() -> MonitorSession {
    let mut session = MonitorSession::new("https://example.com/project/my-app");
    session.start(&StaticProvider(Settings::default()));
    session
}

// =============================================================================
// Pipeline Tests
// =============================================================================

/// A growing page notifies once per count increase and stays silent when the
/// count holds.
#[tokio::test]
async fn growth_stall_growth_notifies_exactly_twice() {
    let source = StubSource::new(&neutral_messages(5));
    let sink = RecordingSink::default();
    let mut session = started_session();

    // Baseline: five neutral messages, no outcome.
    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 5);
    assert!(sink.delivered().is_empty());

    // Grow 5 -> 7 with a success as the second-to-last message.
    let body = format!(
        "{}<div>{SUCCESS_MSG}</div>\
         <div>Let me also show the updated preview of the project dashboard pane.</div>",
        neutral_messages(5)
    );
    source.set_body(&body);
    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 7);
    assert_eq!(sink.delivered(), vec![Outcome::Success]);

    // Unchanged page: no second notification.
    session.run_check(&source, &sink).await;
    assert_eq!(sink.delivered().len(), 1);

    // Grow 7 -> 9 with an error among the newcomers.
    let body = format!(
        "{body}<div>{ERROR_MSG}</div>\
         <div>Let me know if you want the project to retry the build once more.</div>"
    );
    source.set_body(&body);
    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 9);
    assert_eq!(sink.delivered(), vec![Outcome::Success, Outcome::Error]);
}

/// Checks are idempotent: rerunning against an unchanged page is a no-op.
#[tokio::test]
async fn redundant_checks_are_noops() {
    let source = StubSource::new(&format!("<div>{SUCCESS_MSG}</div>"));
    let sink = RecordingSink::default();
    let mut session = started_session();

    for _ in 0..10 {
        session.run_check(&source, &sink).await;
    }

    assert_eq!(sink.delivered(), vec![Outcome::Success]);
    assert_eq!(session.last_message_count(), 1);
}

/// The high-water count never decreases, even when the page sheds messages.
#[tokio::test]
async fn count_is_monotone_across_page_rerenders() {
    let source = StubSource::new(&neutral_messages(6));
    let sink = RecordingSink::default();
    let mut session = started_session();

    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 6);

    source.set_body(&neutral_messages(2));
    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 6);

    // Growing back to the old count is still not an increase.
    source.set_body(&format!("{}<div>{SUCCESS_MSG}</div>", neutral_messages(5)));
    session.run_check(&source, &sink).await;
    assert_eq!(session.last_message_count(), 6);
    assert!(sink.delivered().is_empty());
}

/// A landing-page session never extracts or notifies.
#[tokio::test]
async fn landing_page_is_never_monitored() {
    let source = StubSource::new(&format!("<div>{SUCCESS_MSG}</div>"));
    let sink = RecordingSink::default();
    let mut session = MonitorSession::new("https://example.com/");
    session.start(&StaticProvider(Settings::default()));

    session.run_check(&source, &sink).await;

    assert!(sink.delivered().is_empty());
    assert_eq!(session.last_message_count(), 0);
}

/// An unreadable snapshot is logged and skipped without advancing state.
#[tokio::test]
async fn failed_snapshot_leaves_state_untouched() {
    struct BrokenSource;

    impl DomSource for BrokenSource {
        fn snapshot(&self) -> Result<DomSnapshot, DomError> {
            Err(DomError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "snapshot missing",
            )))
        }
    }

    let sink = RecordingSink::default();
    let mut session = started_session();

    session.run_check(&BrokenSource, &sink).await;

    assert!(sink.delivered().is_empty());
    assert_eq!(session.last_message_count(), 0);
    assert!(session.is_monitoring());
}
