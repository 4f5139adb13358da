//! Hosting-service state for extractions.
//!
//! The host creates an `ExtractionSession` when its service starts and
//! calls `stop` on teardown. At most one extraction runs at a time; a
//! trigger arriving while one is in flight is rejected with `Busy` rather
//! than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::engine::ScreenTextExtractor;
use crate::node::{Clipboard, ScreenSource};
use crate::types::{ExtractionError, ExtractionOutcome};

pub struct ExtractionSession<S, C> {
    extractor: ScreenTextExtractor<S, C>,
    shutdown: CancellationToken,
    in_flight: AtomicBool,
    current: Mutex<Option<CancellationToken>>,
}

/// Releases the in-flight flag when an extraction ends, however it ends.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    current: &'a Mutex<Option<CancellationToken>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *lock(self.current) = None;
        self.flag.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<S, C> ExtractionSession<S, C>
where
    S: ScreenSource,
    C: Clipboard,
{
    pub fn start(extractor: ScreenTextExtractor<S, C>) -> Self {
        info!("Extraction session started");
        Self {
            extractor,
            shutdown: CancellationToken::new(),
            in_flight: AtomicBool::new(false),
            current: Mutex::new(None),
        }
    }

    /// Tear the session down, cancelling any in-flight extraction.
    pub fn stop(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        info!("Extraction session stopping");
        self.shutdown.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Abort the in-flight extraction, keeping the session running.
    ///
    /// Returns `false` when nothing was running.
    pub fn cancel_current(&self) -> bool {
        match lock(&self.current).as_ref() {
            Some(token) => {
                debug!("Cancelling in-flight extraction");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Run one extraction.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::NotRunning` - the session was stopped
    /// - `ExtractionError::Busy` - another extraction is in flight
    pub async fn run(&self) -> Result<ExtractionOutcome, ExtractionError> {
        if !self.is_running() {
            return Err(ExtractionError::NotRunning);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Extraction requested while another is in flight");
            return Err(ExtractionError::Busy);
        }

        let cancel = self.shutdown.child_token();
        *lock(&self.current) = Some(cancel.clone());
        let _guard = InFlightGuard {
            flag: &self.in_flight,
            current: &self.current,
        };

        Ok(self.extractor.extract_full_screen_text(&cancel).await)
    }
}
