//! Ctrl+C handling for interactive commands

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Interrupt signal shared with a command loop.
///
/// Once triggered it stays triggered, so a loop that was busy when Ctrl+C
/// arrived still sees it on the next `wait`.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    shutdown: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Mark shutdown and wake any waiter
    pub fn trigger(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Resolve once shutdown was requested
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_shutdown() {
                return;
            }
            notified.await;
        }
    }

    /// Trigger on Ctrl+C
    pub fn setup(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::debug!("received interrupt");
                    signal.trigger();
                }
                Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl+C"),
            }
        });
    }
}
