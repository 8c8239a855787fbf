//! Graceful shutdown trigger for the plugin server.

use std::future::Future;
use std::io;

/// Resolves once `signal` fires. If the signal handler could not be
/// installed, logs it and never resolves, so the server keeps running.
pub async fn on_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::warn!(error = %e, "signal handler unavailable, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}
