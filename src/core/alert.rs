/// Error reporting for fetch failures
///
/// The dashboard never surfaces a fetch error to its caller: every
/// failure is handed to an injected sink and the affected panel keeps
/// its last-known value.

use colored::Colorize;
use tokio::sync::mpsc::UnboundedSender;

/// Fire-and-forget error sink. Implementations must never block or fail.
pub trait AlertSink: Send + Sync {
    fn error(&self, err: anyhow::Error);
}

/// Forwards alerts to the TUI, shown in the footer status line
pub struct ChannelAlertSink {
    tx: UnboundedSender<String>,
}

impl ChannelAlertSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl AlertSink for ChannelAlertSink {
    fn error(&self, err: anyhow::Error) {
        // Receiver may already be gone during shutdown
        let _ = self.tx.send(format!("{:#}", err));
    }
}

/// Prints alerts to stderr, for one-shot CLI runs
pub struct StderrAlertSink;

impl AlertSink for StderrAlertSink {
    fn error(&self, err: anyhow::Error) {
        eprintln!("{} {:#}", "✗".red(), err);
    }
}
