//! Bounded event waits.
//!
//! A wait resolves with the first matching event, or fails when its deadline
//! passes or the shutdown signal fires. Nothing is retried.

use std::fmt::Display;
use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::{ContractError, Result};

/// Process-wide cancellation signal.
#[derive(Clone)]
pub struct Shutdown {
    sender: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    /// Subscribe before starting a wait; a signal sent earlier is not seen.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Cancel every wait.
    pub fn trigger(&self) {
        // Ignore send errors (no waiters)
        let _ = self.sender.send(());
    }

    /// Trigger on Ctrl-C.
    pub fn trigger_on_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received, cancelling");
                shutdown.trigger();
            }
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for the first item of `stream` accepted by `matches`.
///
/// Items that fail to decode are logged and skipped.
///
/// # Errors
///
/// - [`ContractError::Timeout`] when `timeout` elapses first
/// - [`ContractError::Cancelled`] when the shutdown signal fires first
/// - [`ContractError::StreamClosed`] when the stream ends first
pub async fn wait_for_event<S, T, E, F>(
    stream: S,
    what: &str,
    matches: F,
    timeout: Duration,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<T>
where
    S: Stream<Item = std::result::Result<T, E>>,
    E: Display,
    F: Fn(&T) -> bool,
{
    futures::pin_mut!(stream);
    let deadline = Instant::now() + timeout;
    tracing::info!(what, timeout_secs = timeout.as_secs(), "waiting for event");

    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(Ok(event)) if matches(&event) => return Ok(event),
                Some(Ok(_)) => tracing::debug!(what, "ignoring unrelated event"),
                Some(Err(e)) => tracing::warn!(what, error = %e, "skipping undecodable event"),
                None => return Err(ContractError::StreamClosed),
            },
            _ = tokio::time::sleep_until(deadline) => {
                return Err(ContractError::Timeout {
                    what: what.to_string(),
                    secs: timeout.as_secs(),
                });
            }
            _ = shutdown.recv() => return Err(ContractError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    type Item = std::result::Result<u64, String>;

    #[tokio::test]
    async fn test_first_matching_event() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let events = stream::iter(vec![Ok(1), Err("bad log".to_string()), Ok(4), Ok(6)]);

        let found = wait_for_event(events, "even", |n: &u64| n % 2 == 0, Duration::from_secs(5), &mut rx)
            .await
            .expect("event");
        assert_eq!(found, 4);
    }

    #[tokio::test]
    async fn test_timeout() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let events = stream::pending::<Item>();

        let err = wait_for_event(events, "NftMinted", |_| true, Duration::from_millis(50), &mut rx)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Timeout { ref what, .. } if what == "NftMinted"));
    }

    #[tokio::test]
    async fn test_cancelled() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        let err = wait_for_event(stream::pending::<Item>(), "NftMinted", |_| true, Duration::from_secs(30), &mut rx)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Cancelled));
    }

    #[tokio::test]
    async fn test_stream_closed() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        let events = stream::iter(vec![Ok::<u64, String>(1)]);

        let err = wait_for_event(events, "even", |n: &u64| n % 2 == 0, Duration::from_secs(5), &mut rx)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::StreamClosed));
    }
}
