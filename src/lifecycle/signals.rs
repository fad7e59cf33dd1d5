//! OS signal handling.
//!
//! # Responsibilities
//! - SIGHUP interrupts the broker loop, which is rebuilt in place
//! - SIGINT and SIGTERM trigger shutdown

use std::sync::Arc;

use tokio::sync::Notify;

use crate::lifecycle::Shutdown;

/// Translate signals into broker interruptions and shutdown until the
/// first shutdown signal.
#[cfg(unix)]
pub async fn listen(shutdown: Arc<Shutdown>, interrupt: Arc<Notify>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            _ = hangup.recv() => {
                tracing::info!("SIGHUP received, rebuilding broker loop");
                interrupt.notify_one();
            }
            _ = interrupt_signal.recv() => {
                shutdown.trigger("SIGINT");
                return Ok(());
            }
            _ = terminate.recv() => {
                shutdown.trigger("SIGTERM");
                return Ok(());
            }
        }
    }
}

#[cfg(not(unix))]
pub async fn listen(shutdown: Arc<Shutdown>, _interrupt: Arc<Notify>) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    shutdown.trigger("ctrl-c");
    Ok(())
}
