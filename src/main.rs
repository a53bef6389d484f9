//! Turnchime - conversation outcome monitor.
//!
//! This binary watches a rendered page snapshot for new assistant messages
//! and notifies a configured endpoint when a message classifies as a build
//! success or error.
//!
//! # Commands
//!
//! - `turnchime run`: Start the monitoring daemon
//! - `turnchime scan`: Run one extraction pass over the page snapshot
//! - `turnchime classify`: Classify a single message text
//!
//! # Environment Variables
//!
//! See the [`turnchime::config`] module for available configuration options.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use turnchime::classifier::classify;
use turnchime::config::Config;
use turnchime::dom::{DomSource, FileDomSource};
use turnchime::extractor::MessageExtractor;
use turnchime::notifier::HttpNotifier;
use turnchime::observer::ChangeObserver;
use turnchime::session::MonitorSession;
use turnchime::settings::FileSettingsProvider;
use turnchime::watcher::PageWatcher;

/// Capacity of the page signal channel.
const SIGNAL_CHANNEL_CAPACITY: usize = 64;

/// Turnchime - conversation outcome monitor.
///
/// Watches a rendered page snapshot for new assistant messages and
/// notifies a configured endpoint on build success or error.
#[derive(Parser, Debug)]
#[command(name = "turnchime")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    TURNCHIME_PAGE_FILE           Page snapshot HTML file (required for 'run')
    TURNCHIME_PAGE_URL            URL of the watched page (required for 'run')
    TURNCHIME_SETTINGS_PATH       Settings file (default: ~/.turnchime/settings.json)
    TURNCHIME_NOTIFY_URL          Notification endpoint (default: log only)
    TURNCHIME_DEBOUNCE_MS         Mutation debounce in ms (default: 500)
    TURNCHIME_POLL_INTERVAL_SECS  Fallback poll interval (default: 3)

EXAMPLES:
    # Start the daemon
    export TURNCHIME_PAGE_FILE=/srv/page.html
    export TURNCHIME_PAGE_URL=https://example.com/project/my-app
    turnchime run

    # One-shot extraction pass against a snapshot file
    turnchime scan /srv/page.html

    # Classify a message text
    turnchime classify \"I've created the login page successfully.\"
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the monitoring daemon.
    ///
    /// Watches the page snapshot file and forwards classified outcomes to
    /// the notification endpoint. Requires TURNCHIME_PAGE_FILE and
    /// TURNCHIME_PAGE_URL environment variables.
    Run,

    /// Run one extraction pass over a page snapshot and print the candidates.
    Scan {
        /// Path to the snapshot HTML file.
        page: PathBuf,
    },

    /// Classify a single message text and print the outcome.
    ///
    /// Reads the text from the argument, or from stdin when omitted.
    Classify {
        /// Message text to classify.
        text: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { page } => run_scan(&page),
        Command::Classify { text } => run_classify(text),
        Command::Run => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;

            runtime.block_on(run_daemon())
        }
    }
}

/// Runs one extraction pass and prints the candidate messages.
fn run_scan(page: &PathBuf) -> Result<()> {
    init_logging();

    let source = FileDomSource::new(page.clone());
    let snapshot = source
        .snapshot()
        .with_context(|| format!("Failed to read page snapshot at {}", page.display()))?;

    let candidates = MessageExtractor::new().extract(&snapshot);
    if candidates.is_empty() {
        println!("No candidate messages found");
        return Ok(());
    }

    for candidate in &candidates {
        let outcome = classify(&candidate.text);
        let preview: String = candidate.text.chars().take(80).collect();
        println!("[{outcome}] #{} {preview}", candidate.position);
    }
    println!("{} candidate message(s)", candidates.len());
    Ok(())
}

/// Classifies one text from the argument or stdin and prints the outcome.
fn run_classify(text: Option<String>) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    println!("{}", classify(&text));
    Ok(())
}

/// Runs the monitoring daemon until a shutdown signal arrives.
async fn run_daemon() -> Result<()> {
    init_logging();

    info!("Starting Turnchime");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        page_file = %config.page_file.display(),
        page_url = %config.page_url,
        settings = %config.settings_path.display(),
        "Configuration loaded"
    );

    let session = MonitorSession::new(&config.page_url);
    let source = FileDomSource::new(config.page_file.clone());
    let provider = FileSettingsProvider::new(config.settings_path.clone());
    let sink = HttpNotifier::new(config.notify_url.clone());

    let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);
    let watcher = PageWatcher::spawn(&config.page_file, &config.settings_path, signal_tx)
        .context("Failed to start page watcher")?;

    let observer = ChangeObserver::new(
        session,
        source,
        provider,
        sink,
        signal_rx,
        config.debounce,
        config.poll_interval,
    );

    tokio::select! {
        () = observer.run() => {
            info!("Observer stopped");
        }
        () = wait_for_shutdown() => {
            info!("Shutdown signal received");
        }
    }

    info!("Shutting down...");
    watcher.shutdown().await;
    info!("Turnchime stopped");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
