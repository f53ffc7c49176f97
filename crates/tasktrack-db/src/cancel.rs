//! Caller-driven cancellation for repository calls.
//!
//! Dropping a pending sqlx future abandons the statement; these helpers turn
//! that into an explicit [`Error::Cancelled`] so callers never mistake an
//! abandoned call for one that ran.

use std::future::Future;
use std::time::Duration;

use crate::{Error, Result};

/// Run `op` unless `signal` completes first, in which case `op` is dropped
/// and `Error::Cancelled` is returned.
pub async fn cancellable<T, F, S>(op: F, signal: S) -> Result<T>
where
    F: Future<Output = Result<T>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = signal => {
            tracing::debug!("repository call cancelled");
            Err(Error::Cancelled)
        }
        result = op => result,
    }
}

/// Cancel `op` if it has not finished within `deadline`.
pub async fn with_deadline<T, F>(op: F, deadline: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    cancellable(op, tokio::time::sleep(deadline)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready, task};

    #[tokio::test]
    async fn test_completed_operation_passes_through() {
        let result = cancellable(async { Ok(42) }, std::future::pending()).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_operation_error_passes_through() {
        let result: Result<()> = cancellable(
            async { Err(Error::Query("syntax error".to_string())) },
            std::future::pending(),
        )
        .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Query);
    }

    #[tokio::test]
    async fn test_signal_cancels_pending_operation() {
        let result: Result<()> = cancellable(std::future::pending(), async {}).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_waits_until_signal_fires() {
        let (tx, rx) = oneshot::channel::<()>();
        let mut call = task::spawn(cancellable(
            std::future::pending::<Result<()>>(),
            async {
                let _ = rx.await;
            },
        ));

        assert_pending!(call.poll());
        tx.send(()).unwrap();
        assert!(call.is_woken());

        let result = assert_ready!(call.poll());
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expires() {
        let result: Result<()> =
            with_deadline(std::future::pending(), Duration::from_secs(30)).await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_not_reached() {
        let result = with_deadline(
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok("done")
            },
            Duration::from_secs(30),
        )
        .await;
        assert_eq!(result.unwrap(), "done");
    }
}
