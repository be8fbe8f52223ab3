// SPDX-License-Identifier: MPL-2.0
//! Single-slot background runner for filter and export jobs.
//!
//! Only one job may run at a time: [`TaskSlot::submit`] fails with
//! [`Error::Busy`] while another job holds the slot. Jobs receive a
//! [`CancelFlag`] and check it between stages.

use crate::error::{Error, Result};
use crate::media::{FilterKind, RasterImage};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Shared cancellation request.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns [`Error::Cancelled`] once cancellation was requested.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// At most one background job in flight.
#[derive(Debug, Clone)]
pub struct TaskSlot {
    permits: Arc<Semaphore>,
}

impl Default for TaskSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSlot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }

    /// Runs `job` on tokio's blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if a job is already running.
    pub fn submit<T, F>(&self, job: F) -> Result<PendingTask<T>>
    where
        T: Send + 'static,
        F: FnOnce(&CancelFlag) -> Result<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .try_acquire_owned()
            .map_err(|_| Error::Busy)?;
        let cancel = CancelFlag::default();
        let flag = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            flag.check()?;
            job(&flag)
        });
        Ok(PendingTask { cancel, handle })
    }
}

/// Handle to a submitted job. Await it for the job's result.
#[derive(Debug)]
pub struct PendingTask<T> {
    cancel: CancelFlag,
    handle: JoinHandle<Result<T>>,
}

impl<T> PendingTask<T> {
    /// Asks the job to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T> Future for PendingTask<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::Cancelled),
            Err(e) => Err(Error::Resource(format!("background task failed: {e}"))),
        })
    }
}

// =============================================================================
// Filter job
// =============================================================================

/// A filter applied off-thread to an owned copy of the working raster.
#[derive(Debug, Clone)]
pub struct FilterJob {
    source: RasterImage,
    kind: FilterKind,
    generation: u64,
}

/// Output of a [`FilterJob`], ready for `EditSession::commit_filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredImage {
    pub kind: FilterKind,
    pub image: RasterImage,
    /// Session generation `image` was derived from.
    pub generation: u64,
}

impl FilterJob {
    /// `generation` identifies the session state `source` was copied from.
    #[must_use]
    pub fn new(source: RasterImage, kind: FilterKind, generation: u64) -> Self {
        Self {
            source,
            kind,
            generation,
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if `cancel` fires before the result is
    /// produced.
    pub fn run(self, cancel: &CancelFlag) -> Result<FilteredImage> {
        cancel.check()?;
        let image = self.kind.apply(&self.source);
        cancel.check()?;
        Ok(FilteredImage {
            kind: self.kind,
            image,
            generation: self.generation,
        })
    }
}
