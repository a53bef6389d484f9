//! Page change observation loop.
//!
//! The observer multiplexes three wake sources onto one [`MonitorSession`]:
//! mutation signals from the page watcher (debounced so a burst of renders
//! collapses into a single check), settings-change signals, and a periodic
//! poll that catches anything the mutation stream misses. Checks never
//! overlap: the loop is a single task that awaits each check to completion.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::{debug, info, trace};

use crate::dom::DomSource;
use crate::notifier::NotificationSink;
use crate::session::MonitorSession;
use crate::settings::SettingsProvider;

/// Mutations adding at most this many bytes are ignored by the debouncer.
pub const MUTATION_TEXT_THRESHOLD: usize = 50;

/// Default quiet period after a significant mutation before a check runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default interval for the fallback poll.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// A change signal delivered to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSignal {
    /// The page content changed, growing by roughly `added_bytes`.
    Mutated {
        /// Bytes added to the page since the previous signal.
        added_bytes: usize,
    },
    /// The settings file changed and should be reloaded.
    SettingsChanged,
}

/// Drives a [`MonitorSession`] from a stream of [`PageSignal`]s.
pub struct ChangeObserver<S, P, N> {
    session: MonitorSession,
    source: S,
    provider: P,
    sink: N,
    signals: mpsc::Receiver<PageSignal>,
    debounce: Duration,
    poll_interval: Duration,
}

impl<S, P, N> ChangeObserver<S, P, N>
where
    S: DomSource,
    P: SettingsProvider,
    N: NotificationSink,
{
    /// Creates an observer over the given session and wake sources.
    pub fn new(
        session: MonitorSession,
        source: S,
        provider: P,
        sink: N,
        signals: mpsc::Receiver<PageSignal>,
        debounce: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session,
            source,
            provider,
            sink,
            signals,
            debounce,
            poll_interval,
        }
    }

    /// Runs the observation loop until the signal channel closes.
    pub async fn run(mut self) {
        self.session.start(&self.provider);
        info!(
            debounce_ms = self.debounce.as_millis() as u64,
            poll_secs = self.poll_interval.as_secs(),
            "Observer running"
        );

        // First poll fires one interval after startup, not immediately.
        let mut poll = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        let mut pending_check: Option<Instant> = None;

        loop {
            tokio::select! {
                signal = self.signals.recv() => {
                    match signal {
                        Some(PageSignal::Mutated { added_bytes }) => {
                            if added_bytes <= MUTATION_TEXT_THRESHOLD {
                                trace!(added_bytes, "Mutation below threshold, ignored");
                            } else if pending_check.is_none() {
                                // Later mutations in a burst ride the same
                                // deadline instead of extending it.
                                pending_check = Some(Instant::now() + self.debounce);
                                debug!(added_bytes, "Mutation observed, check scheduled");
                            } else {
                                trace!(added_bytes, "Mutation folded into pending check");
                            }
                        }
                        Some(PageSignal::SettingsChanged) => {
                            self.session.refresh_settings(&self.provider);
                        }
                        None => {
                            info!("Signal channel closed, observer stopping");
                            break;
                        }
                    }
                }
                () = sleep_until(pending_check.unwrap_or_else(Instant::now)),
                    if pending_check.is_some() =>
                {
                    pending_check = None;
                    self.session.run_check(&self.source, &self.sink).await;
                }
                _ = poll.tick() => {
                    trace!("Poll tick");
                    self.session.run_check(&self.source, &self.sink).await;
                }
            }
        }
    }
}
