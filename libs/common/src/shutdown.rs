//! Graceful shutdown
//!
//! Services stop on SIGINT or SIGTERM (Ctrl+C only off Unix). An in-process
//! trigger can end the wait the same way, which is how tests and embedding
//! callers stop a server.

use std::fmt;
use std::future::Future;
use tracing::{info, warn};

/// What ended the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Requested,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Requested => "shutdown request",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Future for `axum::serve(..).with_graceful_shutdown(..)`
///
/// ```ignore
/// axum::serve(listener, app)
///     .with_graceful_shutdown(common::shutdown::wait_for_shutdown())
///     .await?;
/// ```
pub async fn wait_for_shutdown() {
    shutdown_requested(std::future::pending()).await;
}

/// Resolve on the first OS signal, or when `trigger` completes
pub async fn shutdown_requested<F>(trigger: F) -> ShutdownSignal
where
    F: Future<Output = ()>,
{
    let signal = tokio::select! {
        signal = os_signal() => signal,
        () = trigger => ShutdownSignal::Requested,
    };
    info!("{} received, draining open connections", signal);
    signal
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl+C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn os_signal() -> ShutdownSignal {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => {
                warn!("SIGTERM handler unavailable ({}), only Ctrl+C stops the service", e);
                std::future::pending::<()>().await;
            },
        }
    };

    tokio::select! {
        () = interrupt() => ShutdownSignal::Interrupt,
        () = terminate => ShutdownSignal::Terminate,
    }
}

#[cfg(not(unix))]
async fn os_signal() -> ShutdownSignal {
    interrupt().await;
    ShutdownSignal::Interrupt
}
