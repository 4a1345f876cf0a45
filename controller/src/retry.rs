use std::future::Future;

use skiff::Result;

/// Run a read-modify-write against the store, re-running the closure when
/// the write loses an optimistic-concurrency race. `retries` bounds the
/// number of re-attempts; any other error, or a conflict past the budget,
/// is returned as-is.
pub async fn retry_on_conflict<T, F, Fut>(retries: usize, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Err(err) if err.is_conflict() && attempt < retries => {
                attempt += 1;
                tracing::debug!(attempt, "conflict, retrying: {err}");
            }
            ret => return ret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiff::Error;
    use skiff::kube::core::ErrorResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn conflict() -> Error {
        Error::Kube(skiff::kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "object has been modified".to_string(),
            reason: "Conflict".to_string(),
            code: 409,
        }))
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let result = retry_on_conflict(1, || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retries_conflict_within_budget() {
        let calls = AtomicUsize::new(0);
        let result = retry_on_conflict(1, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(conflict())
                } else {
                    Ok("reconciled")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "reconciled");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_conflict_past_budget_is_returned() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = retry_on_conflict(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(conflict()) }
        })
        .await;
        assert!(result.unwrap_err().is_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = retry_on_conflict(3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::ObjectMetaMissing("name")) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
