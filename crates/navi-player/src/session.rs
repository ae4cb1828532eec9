//! A playback session: one queue, one fill supervisor, one catalog.
//!
//! Each method handles one request from the voice front end or one event
//! from the playback device and returns what the device should do next.

use std::sync::Arc;

use navi_core::controller;
use navi_core::{
    resolve_track, Card, Catalog, Error, MediaQueue, Offset, PlaybackResponse, QueueSnapshot,
    Result, Track,
};
use tracing::{debug, error, info, warn};

use crate::fill::FillJob;
use crate::shared::SharedQueue;
use crate::supervisor::JobSupervisor;

/// Number of tracks resolved before answering a play request.
pub const DEFAULT_HEAD_SIZE: usize = 2;

/// Options for [`Session::play`].
#[derive(Debug, Clone, Default)]
pub struct PlayRequest {
    /// Shuffle the tracks resolved up front.
    pub shuffle: bool,
    /// Text spoken before playback starts.
    pub speech: Option<String>,
    /// Card shown on devices with a screen.
    pub card: Option<Card>,
}

pub struct Session<C> {
    catalog: Arc<C>,
    queue: SharedQueue,
    jobs: JobSupervisor,
    head_size: usize,
}

impl<C: Catalog> Session<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_queue(catalog, MediaQueue::new())
    }

    pub fn with_queue(catalog: Arc<C>, queue: MediaQueue) -> Self {
        Self {
            catalog,
            queue: SharedQueue::new(queue),
            jobs: JobSupervisor::new(),
            head_size: DEFAULT_HEAD_SIZE,
        }
    }

    /// Resolve `head_size` tracks before answering; at least one.
    #[must_use]
    pub fn with_head_size(mut self, head_size: usize) -> Self {
        self.head_size = head_size.max(1);
        self
    }

    pub const fn queue(&self) -> &SharedQueue {
        &self.queue
    }

    pub const fn jobs(&self) -> &JobSupervisor {
        &self.jobs
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Replace the queue with `ids` and start playing the first track.
    ///
    /// Only the head of the list is resolved before returning; the rest is
    /// appended by a background fill job. A running fill job is replaced
    /// only once the head has resolved.
    pub async fn play(&self, ids: Vec<String>, request: PlayRequest) -> Result<PlaybackResponse> {
        if ids.is_empty() {
            return Err(Error::QueueEmpty);
        }

        let (head, tail) = ids.split_at(self.head_size.min(ids.len()));
        let mut tracks = Vec::with_capacity(head.len());
        for id in head {
            let track = resolve_track(self.catalog.as_ref(), id)
                .await
                .map_err(|e| Error::resolution(id.clone(), e))?;
            tracks.push(track);
        }

        let job = (!tail.is_empty())
            .then(|| FillJob::new(self.catalog.clone(), self.queue.clone(), tail.to_vec()));

        // Reseeding happens after the old fill job has stopped and before the
        // new one starts, under the supervisor lock.
        let seed = || {
            self.queue.with(|queue| -> Result<Track> {
                queue.clear();
                for track in tracks {
                    queue.add(track)?;
                }
                if request.shuffle {
                    queue.shuffle();
                }
                queue.next().cloned()
            })
        };
        let track = self.jobs.replace(seed, job).await?;

        Ok(controller::play(&track, request.speech, request.card))
    }

    /// The device wants the next stream pre-buffered.
    pub fn playback_nearly_finished(&self) -> Result<PlaybackResponse> {
        info!("Queuing next track");
        let track = self.queue.peek_next_buffered()?;
        Ok(controller::enqueue(&track))
    }

    /// The device finished the current track on its own.
    pub async fn playback_finished(&self) -> Result<Track> {
        if let Some(current) = self.queue.current() {
            if let Err(e) = self.catalog.scrobble(&current.id).await {
                warn!("Failed to scrobble track {}: {e}", current.id);
            }
        }
        self.queue.next()
    }

    /// The device stopped; remember where so playback can resume.
    pub fn playback_stopped(&self, offset: Offset) {
        self.queue.set_offset(offset);
        debug!("Stored track offset of {} ms", offset.as_millis());
        info!("Playback stopped");
    }

    /// The device could not play the current track; move past it.
    pub fn playback_failed(&self, reason: &str) -> Result<PlaybackResponse> {
        let failed = self.queue.current().map(|t| t.id).unwrap_or_default();
        error!("Playback failed for track {failed}: {reason}");
        self.skip_next()
    }

    /// Skip to the next track, from its beginning.
    pub fn skip_next(&self) -> Result<PlaybackResponse> {
        let track = self.queue.with(|queue| -> Result<Track> {
            queue.next()?;
            queue.set_offset(Offset::ZERO);
            queue.current().cloned().ok_or(Error::QueueEmpty)
        })?;
        Ok(controller::play(&track, None, None))
    }

    /// Go back to the previous track, from its beginning.
    pub fn skip_previous(&self) -> Result<PlaybackResponse> {
        let track = self.queue.with(|queue| -> Result<Track> {
            queue.previous()?;
            queue.set_offset(Offset::ZERO);
            queue.current().cloned().ok_or(Error::HistoryEmpty)
        })?;
        Ok(controller::play(&track, None, None))
    }

    /// Stop playback. The buffer is resynced so the next prefetch reflects
    /// the settled queue.
    pub fn pause(&self) -> PlaybackResponse {
        self.queue.sync();
        controller::stop()
    }

    /// Resume the paused track, or start the next pending one.
    pub fn resume(&self) -> Result<PlaybackResponse> {
        let track = self.queue.with(|queue| -> Result<Track> {
            if let Some(current) = queue.current().filter(|t| !t.offset.is_zero()) {
                info!(
                    "Resuming {} at {}",
                    current.display_name(),
                    current.offset.format()
                );
                return Ok(current.clone());
            }
            if queue.count_pending() > 0 {
                info!("No paused track, getting next track from queue");
                return queue.next().cloned();
            }
            Err(Error::QueueEmpty)
        })?;
        Ok(controller::play(&track, None, None))
    }

    /// Shuffle the upcoming tracks.
    pub fn shuffle(&self) {
        self.queue.with(|queue| {
            queue.shuffle();
            queue.sync();
        });
    }

    pub fn current_track(&self) -> Option<Track> {
        self.queue.current()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.queue.snapshot()
    }
}
