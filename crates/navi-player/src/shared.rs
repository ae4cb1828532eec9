//! Mutex-guarded queue handle shared by request handlers and the fill worker.

use std::sync::Arc;

use navi_core::{MediaQueue, Offset, QueueSnapshot, QueueState, Result, Track};
use parking_lot::Mutex;

/// Cloneable handle to one [`MediaQueue`].
///
/// Every method takes the lock for exactly one engine operation, so calls
/// from different tasks never interleave inside an operation. Use
/// [`with`](Self::with) when several operations must happen as one.
#[derive(Debug, Clone, Default)]
pub struct SharedQueue {
    inner: Arc<Mutex<MediaQueue>>,
}

impl SharedQueue {
    pub fn new(queue: MediaQueue) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    ///
    /// Must not be called from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut MediaQueue) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn add(&self, track: Track) -> Result<()> {
        self.inner.lock().add(track)
    }

    pub fn shuffle(&self) {
        self.inner.lock().shuffle();
    }

    #[allow(clippy::should_implement_trait)] // Not implementing Iterator
    pub fn next(&self) -> Result<Track> {
        self.inner.lock().next().cloned()
    }

    pub fn previous(&self) -> Result<Track> {
        self.inner.lock().previous().cloned()
    }

    pub fn peek_next_buffered(&self) -> Result<Track> {
        self.inner
            .lock()
            .peek_next_buffered()
            .map(Arc::unwrap_or_clone)
    }

    pub fn set_offset(&self, offset: Offset) {
        self.inner.lock().set_offset(offset);
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn sync(&self) {
        self.inner.lock().sync();
    }

    pub fn count_pending(&self) -> usize {
        self.inner.lock().count_pending()
    }

    pub fn count_history(&self) -> usize {
        self.inner.lock().count_history()
    }

    pub fn count_buffer(&self) -> usize {
        self.inner.lock().count_buffer()
    }

    pub fn current(&self) -> Option<Track> {
        self.inner.lock().current().cloned()
    }

    pub fn state(&self) -> QueueState {
        self.inner.lock().state()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.inner.lock().snapshot()
    }
}
