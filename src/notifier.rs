//! Notification delivery.
//!
//! The engine hands each actionable outcome to a [`NotificationSink`]. The
//! production sink is [`HttpNotifier`], which POSTs the outcome and the
//! current settings snapshot to a configured endpoint. Delivery is
//! fire-and-forget: a failed send is logged by the caller and never retried,
//! since the next message will produce a fresh notification anyway.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::settings::Settings;
use crate::types::Outcome;

/// Timeout for a single notification request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    /// The HTTP request failed to complete.
    #[error("Notification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Notification endpoint returned status {status}")]
    Server {
        /// HTTP status code from the endpoint.
        status: u16,
    },
}

/// Destination for classified outcomes.
#[async_trait]
pub trait NotificationSink {
    /// Delivers one outcome together with the settings in effect.
    async fn notify(&self, outcome: Outcome, settings: &Settings) -> Result<(), NotifierError>;
}

/// HTTP notification sink.
///
/// Without an endpoint it degrades to logging, which keeps the engine fully
/// functional when no listener is configured.
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl HttpNotifier {
    /// Creates a notifier for the given endpoint, or a log-only notifier if
    /// `endpoint` is `None`.
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoint }
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn notify(&self, outcome: Outcome, settings: &Settings) -> Result<(), NotifierError> {
        let Some(endpoint) = &self.endpoint else {
            info!(%outcome, "Notification (no endpoint configured)");
            return Ok(());
        };

        let payload = json!({
            "outcome": outcome,
            "settings": settings,
        });

        let response = self.client.post(endpoint).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Server {
                status: status.as_u16(),
            });
        }

        debug!(%outcome, status = status.as_u16(), "Notification delivered");
        Ok(())
    }
}
