//! Shutdown coordination between OS signals, the server and listings.
//!
//! A signal stops the server from accepting connections. Listings that are
//! still paging through the bucket once the grace period has elapsed are
//! cancelled through the shared [`CancellationToken`]: they stop requesting
//! pages and answer 503, which lets the server drain.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;
use tokio_util::sync::CancellationToken;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Resolves once the process should stop accepting connections.
///
/// That is on SIGTERM, Ctrl+C, or when `listings` is cancelled elsewhere.
/// In-flight listings are cancelled `grace` later.
pub async fn shutdown_signal(listings: CancellationToken, grace: Duration) {
    tokio::select! {
        signal = os_signal() => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                signal,
                "Shutdown signal received"
            );
        }
        () = listings.cancelled() => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                "Listings cancelled, shutting down"
            );
        }
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        grace_secs = grace.as_secs(),
        "Draining in-flight listings"
    );

    tokio::spawn(cancel_after(listings, grace));
}

/// Cancels `listings` once `grace` elapses, unless it already was.
async fn cancel_after(listings: CancellationToken, grace: Duration) {
    tokio::select! {
        () = listings.cancelled() => {}
        () = tokio::time::sleep(grace) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                grace_secs = grace.as_secs(),
                "Grace period elapsed, cancelling in-flight listings"
            );
            listings.cancel();
        }
    }
}

/// Waits for the first termination signal and returns its name.
async fn os_signal() -> &'static str {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %e,
                    "Failed to install Ctrl+C handler"
                );
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %e,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_when_listings_are_cancelled() {
        let listings = CancellationToken::new();
        listings.cancel();

        tokio::time::timeout(
            Duration::from_secs(5),
            shutdown_signal(listings.clone(), Duration::ZERO),
        )
        .await
        .expect("shutdown should resolve");
    }

    #[tokio::test]
    async fn grace_period_cancels_listings() {
        let listings = CancellationToken::new();

        cancel_after(listings.clone(), Duration::from_millis(10)).await;
        assert!(listings.is_cancelled());
    }

    #[tokio::test]
    async fn listings_still_running_until_grace_elapses() {
        let listings = CancellationToken::new();
        let deadline = tokio::spawn(cancel_after(listings.clone(), Duration::from_secs(60)));

        tokio::task::yield_now().await;
        assert!(!listings.is_cancelled());

        listings.cancel();
        tokio::time::timeout(Duration::from_secs(5), deadline)
            .await
            .expect("deadline task should stop")
            .expect("deadline task should not panic");
    }
}
