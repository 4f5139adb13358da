//! Settle delays with cancellation at every wait boundary.
//!
//! The host repaints asynchronously after an action, so every scroll or
//! selection step waits before the next read. Each wait races the caller's
//! cancellation token, and `checkpoint` is called before each action.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::types::ExtractionError;

#[derive(Debug, Clone)]
pub struct Pacer {
    cancel: CancellationToken,
}

impl Pacer {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// A pacer that can never be cancelled.
    pub fn uncancellable() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail fast if the caller has cancelled.
    pub fn checkpoint(&self) -> Result<(), ExtractionError> {
        if self.cancel.is_cancelled() {
            Err(ExtractionError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Wait for the host to settle, or return early on cancellation.
    pub async fn settle(&self, delay: Duration) -> Result<(), ExtractionError> {
        self.checkpoint()?;
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ExtractionError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
