use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use eyre::Result;
use tokio::{signal, sync::broadcast};

/// Represents different shutdown reasons
#[derive(Debug, Clone)]
pub enum ShutdownReason {
    /// Graceful shutdown requested (SIGTERM, SIGINT)
    Graceful,
    /// Shutdown channel lost; treat as immediate
    Force,
}

/// Manages OS-signal driven shutdown for the binary.
///
/// The serve task itself is stopped through `ServerHandle::stop`; this type
/// only translates signals into a broadcast the main loop can wait on.
pub struct GracefulShutdown {
    shutdown_tx: broadcast::Sender<ShutdownReason>,
    shutdown_initiated: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);
        Self {
            shutdown_tx,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a receiver for shutdown signals
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.shutdown_tx.subscribe()
    }

    /// Check if shutdown has been initiated
    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    /// Manually trigger shutdown (used by tests and embedders)
    pub fn trigger_shutdown(&self, reason: ShutdownReason) -> Result<()> {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            tracing::info!("shutdown triggered: {:?}", reason);
            let _ = self.shutdown_tx.send(reason);
        }
        Ok(())
    }

    /// Listen for SIGTERM / SIGINT and broadcast the shutdown reason.
    pub async fn run_signal_handler(&self) -> Result<()> {
        tracing::info!("signal handler started, listening for SIGTERM and SIGINT");

        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("received SIGINT, initiating graceful shutdown");
            }
            _ = wait_for_sigterm() => {
                tracing::info!("received SIGTERM, initiating graceful shutdown");
            }
        }

        self.trigger_shutdown(ShutdownReason::Graceful)
    }

    /// Wait indefinitely for a shutdown signal.
    pub async fn wait_for_shutdown_signal(&self) -> ShutdownReason {
        let mut receiver = self.subscribe();
        match receiver.recv().await {
            Ok(reason) => reason,
            Err(_) => {
                tracing::warn!("shutdown channel closed unexpectedly");
                ShutdownReason::Force
            }
        }
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!("failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    // On non-Unix systems, we only have Ctrl+C
    std::future::pending::<()>().await;
}
