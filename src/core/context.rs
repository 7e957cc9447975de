//! Per-call cancellation and deadline handling.
//!
//! Every inbound request gets a [`CallContext`]. Tools forward it to anything
//! that suspends (today only the weather client), which races its work
//! against the context via [`CallContext::run`].

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal and optional deadline for a single request.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context with no deadline that is only cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Tie this context to an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token that cancels this call.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel the call.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the call was cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drive `future` to completion unless the call is cancelled or times out
    /// first, in which case the future is dropped and `None` is returned.
    pub async fn run<F>(&self, future: F) -> Option<F::Output>
    where
        F: Future,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            _ = deadline => None,
            output = future => Some(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = CallContext::with_timeout(Duration::from_secs(5));
        assert_eq!(ctx.run(async { 42 }).await, Some(42));
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_cancelled_before_start() {
        let ctx = CallContext::new();
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.run(async { 42 }).await, None);
    }

    #[tokio::test]
    async fn test_run_cancelled_while_pending() {
        let ctx = CallContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = ctx.run(tokio::time::sleep(Duration::from_secs(30))).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_run_deadline_elapsed() {
        let ctx = CallContext::with_timeout(Duration::from_millis(20));
        let result = ctx.run(tokio::time::sleep(Duration::from_secs(30))).await;
        assert!(result.is_none());
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_external_token_cancels() {
        let token = CancellationToken::new();
        let ctx = CallContext::new().with_cancellation(token.clone());
        drop(token.drop_guard());
        assert!(ctx.is_cancelled());
    }
}
