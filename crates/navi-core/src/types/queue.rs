//! Queue engine: pending tracks, history, prefetch buffer and the current track.
//!
//! The device may ask for the next stream before it has finished the current
//! one, and may never play it if the user intervenes. Those speculative reads
//! are answered from `buffer`, a snapshot of `pending` taken at the last
//! [`MediaQueue::sync`], so the real queue position is never disturbed.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Offset, Track};
use crate::error::{Error, Result};

/// Whether a track is loaded as the current track.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueState {
    /// Nothing has been played yet.
    #[default]
    Idle,
    /// A current track is set.
    Playing,
}

/// The playback queue engine.
///
/// Tracks are shared behind `Arc` so that [`sync`](Self::sync) is a cheap
/// structural copy. Any later mutation of a shared track (offset, relinking)
/// copies it first, which keeps the buffer snapshot untouched.
#[derive(Debug, Clone, Default)]
pub struct MediaQueue {
    /// Tracks still to be played, front is next.
    pending: VecDeque<Arc<Track>>,
    /// Tracks already played, most recent at the back.
    history: VecDeque<Arc<Track>>,
    /// Snapshot of `pending` for prefetch queries.
    buffer: VecDeque<Arc<Track>>,
    /// The current track, `None` while idle.
    current: Option<Arc<Track>>,
    /// Maximum number of history entries to retain.
    history_limit: Option<usize>,
}

impl MediaQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` tracks in the history; older entries are dropped.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self.trim_history();
        self
    }

    /// Append a track to the pending queue.
    ///
    /// When the queue already holds tracks, the new track's `previous_id` is
    /// set to the id of the current tail.
    pub fn add(&mut self, mut track: Track) -> Result<()> {
        if track.id.is_empty() {
            return Err(Error::InvalidTrack(format!(
                "track '{}' has an empty id",
                track.title
            )));
        }

        if let Some(tail) = self.pending.back() {
            track.previous_id = Some(tail.id.clone());
        }

        self.pending.push_back(Arc::new(track));
        debug!("Added track, {} tracks pending", self.pending.len());
        Ok(())
    }

    /// Randomly reorder the pending queue and rebuild the `previous_id` chain.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Like [`shuffle`](Self::shuffle), with a caller-provided RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pending.make_contiguous().shuffle(rng);

        let mut previous: Option<String> = None;
        for track in &mut self.pending {
            if track.previous_id != previous {
                Arc::make_mut(track).previous_id = previous.clone();
            }
            previous = Some(track.id.clone());
        }

        debug!("Shuffled {} pending tracks", self.pending.len());
    }

    /// Advance to the next track.
    ///
    /// The outgoing current track, if any, is pushed onto the history. Fails
    /// with [`Error::QueueEmpty`] without changing anything when there is no
    /// pending track.
    #[allow(clippy::should_implement_trait)] // Not implementing Iterator
    pub fn next(&mut self) -> Result<&Track> {
        let next = self.pending.pop_front().ok_or(Error::QueueEmpty)?;

        if let Some(outgoing) = self.current.take() {
            self.push_history(outgoing);
        }
        self.sync();

        debug!("Advanced to track {}", next.id);
        Ok(&**self.current.insert(next))
    }

    /// Step back to the most recently played track.
    ///
    /// The current track, if any, returns to the front of the pending queue.
    /// Fails with [`Error::HistoryEmpty`] without changing anything when the
    /// history is empty.
    pub fn previous(&mut self) -> Result<&Track> {
        let previous = self.history.pop_back().ok_or(Error::HistoryEmpty)?;

        if let Some(current) = self.current.take() {
            self.push_pending_front(current);
        }
        self.sync();

        debug!("Returned to track {}", previous.id);
        Ok(&**self.current.insert(previous))
    }

    /// Pop the next track from the prefetch buffer.
    ///
    /// Never touches the pending queue, history or current track.
    pub fn peek_next_buffered(&mut self) -> Result<Arc<Track>> {
        let track = self.buffer.pop_front().ok_or(Error::BufferEmpty)?;
        debug!("Prefetching track {}, {} left in buffer", track.id, self.buffer.len());
        Ok(track)
    }

    /// Record where playback of the current track stopped.
    pub fn set_offset(&mut self, offset: Offset) {
        match &mut self.current {
            Some(current) => Arc::make_mut(current).offset = offset,
            None => debug!("No current track, ignoring offset {}", offset.as_millis()),
        }
    }

    /// Empty the pending queue, history and buffer. The current track stays.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.history.clear();
        self.buffer.clear();
        debug!("Cleared queue");
    }

    /// Make the prefetch buffer a copy of the pending queue.
    pub fn sync(&mut self) {
        self.buffer.clone_from(&self.pending);
    }

    /// Number of tracks still to be played.
    pub fn count_pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of tracks already played.
    pub fn count_history(&self) -> usize {
        self.history.len()
    }

    /// Number of tracks left in the prefetch buffer.
    pub fn count_buffer(&self) -> usize {
        self.buffer.len()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_deref()
    }

    pub const fn state(&self) -> QueueState {
        if self.current.is_some() {
            QueueState::Playing
        } else {
            QueueState::Idle
        }
    }

    /// Pending tracks, in play order. For inspection only.
    pub fn pending(&self) -> impl Iterator<Item = &Track> {
        self.pending.iter().map(|track| &**track)
    }

    /// Played tracks, oldest first. For inspection only.
    pub fn history(&self) -> impl Iterator<Item = &Track> {
        self.history.iter().map(|track| &**track)
    }

    /// Prefetch buffer contents. For inspection only.
    pub fn buffer(&self) -> impl Iterator<Item = &Track> {
        self.buffer.iter().map(|track| &**track)
    }

    /// Owned copy of the whole queue, for diagnostics.
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            state: self.state(),
            current: self.current().cloned(),
            pending: self.pending().cloned().collect(),
            history: self.history().cloned().collect(),
            buffer: self.buffer().cloned().collect(),
        }
    }

    fn push_history(&mut self, track: Arc<Track>) {
        self.history.push_back(track);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    /// Put a track back at the front, relinking the track behind it.
    fn push_pending_front(&mut self, track: Arc<Track>) {
        if let Some(second) = self.pending.front_mut() {
            if second.previous_id.as_deref() != Some(track.id.as_str()) {
                Arc::make_mut(second).previous_id = Some(track.id.clone());
            }
        }
        self.pending.push_front(track);
    }
}

/// Read-only view of a [`MediaQueue`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub state: QueueState,
    pub current: Option<Track>,
    pub pending: Vec<Track>,
    pub history: Vec<Track>,
    pub buffer: Vec<Track>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_track(id: &str) -> Track {
        Track::new(id, format!("Track {id}"))
    }

    fn ids<'a>(tracks: impl Iterator<Item = &'a Track>) -> Vec<String> {
        tracks.map(|t| t.id.clone()).collect()
    }

    fn assert_chain(queue: &MediaQueue) {
        let pending: Vec<&Track> = queue.pending().collect();
        for pair in pending.windows(2) {
            assert_eq!(pair[1].previous_id.as_deref(), Some(pair[0].id.as_str()));
        }
    }

    fn queue_of(names: &[&str]) -> MediaQueue {
        let mut queue = MediaQueue::new();
        for name in names {
            queue.add(make_track(name)).unwrap();
        }
        queue
    }

    #[test]
    fn test_add_links_previous_ids() {
        let queue = queue_of(&["A", "B", "C"]);

        let pending: Vec<&Track> = queue.pending().collect();
        assert_eq!(ids(queue.pending()), ["A", "B", "C"]);
        assert!(pending[0].previous_id.is_none());
        assert_eq!(pending[1].previous_id.as_deref(), Some("A"));
        assert_eq!(pending[2].previous_id.as_deref(), Some("B"));
    }

    #[test]
    fn test_add_rejects_empty_id() {
        let mut queue = MediaQueue::new();
        let err = queue.add(Track::new("", "Nameless")).unwrap_err();
        assert!(matches!(err, Error::InvalidTrack(_)));
        assert_eq!(queue.count_pending(), 0);
    }

    #[test]
    fn test_add_keeps_given_previous_id_on_empty_queue() {
        let mut queue = MediaQueue::new();
        queue.add(make_track("A").with_previous_id("Z")).unwrap();
        assert_eq!(queue.pending().next().unwrap().previous_id.as_deref(), Some("Z"));
    }

    #[test]
    fn test_next_previous_scenario() {
        let mut queue = queue_of(&["A", "B", "C"]);
        assert_eq!(queue.state(), QueueState::Idle);

        assert_eq!(queue.next().unwrap().id, "A");
        assert_eq!(queue.state(), QueueState::Playing);
        assert_eq!(ids(queue.pending()), ["B", "C"]);
        assert_eq!(queue.count_history(), 0);

        assert_eq!(queue.next().unwrap().id, "B");
        assert_eq!(ids(queue.history()), ["A"]);
        assert_eq!(ids(queue.pending()), ["C"]);

        assert_eq!(queue.previous().unwrap().id, "A");
        assert_eq!(ids(queue.pending()), ["B", "C"]);
        assert_eq!(queue.count_history(), 0);
        assert_chain(&queue);
    }

    #[test]
    fn test_next_on_single_track_then_empty() {
        let mut queue = queue_of(&["A"]);
        assert_eq!(queue.next().unwrap().id, "A");
        assert_eq!(queue.count_history(), 0);

        assert!(matches!(queue.next(), Err(Error::QueueEmpty)));
        // A failed advance leaves everything in place.
        assert_eq!(queue.current().unwrap().id, "A");
        assert_eq!(queue.count_history(), 0);
    }

    #[test]
    fn test_previous_when_idle_fails() {
        let mut queue = queue_of(&["A"]);
        assert!(matches!(queue.previous(), Err(Error::HistoryEmpty)));
        assert_eq!(queue.state(), QueueState::Idle);
        assert_eq!(queue.count_pending(), 1);
    }

    #[test]
    fn test_next_then_previous_round_trips() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        queue.next().unwrap();
        queue.next().unwrap();

        let before_current = queue.current().unwrap().clone();
        let before_front = queue.pending().next().unwrap().clone();

        queue.next().unwrap();
        queue.previous().unwrap();

        let current = queue.current().unwrap();
        let front = queue.pending().next().unwrap();
        assert_eq!(current.id, before_current.id);
        assert_eq!(current.previous_id, before_current.previous_id);
        assert_eq!(front.id, before_front.id);
        assert_eq!(front.previous_id, before_front.previous_id);
        assert_chain(&queue);
    }

    #[test]
    fn test_previous_relinks_after_shuffle() {
        let mut queue = queue_of(&["A", "B", "C", "D"]);
        queue.next().unwrap();
        queue.next().unwrap();
        queue.shuffle_with(&mut StdRng::seed_from_u64(7));
        queue.previous().unwrap();

        assert_eq!(queue.pending().next().unwrap().id, "B");
        assert_chain(&queue);
    }

    #[test]
    fn test_peek_next_buffered_does_not_move_playback() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.next().unwrap();

        let peeked = queue.peek_next_buffered().unwrap();
        assert_eq!(peeked.id, "B");
        assert_eq!(peeked.previous_id.as_deref(), Some("A"));
        assert_eq!(queue.count_pending(), 2);
        assert_eq!(queue.count_history(), 0);
        assert_eq!(queue.current().unwrap().id, "A");
        assert_eq!(queue.count_buffer(), 1);

        assert_eq!(queue.peek_next_buffered().unwrap().id, "C");
        assert!(matches!(queue.peek_next_buffered(), Err(Error::BufferEmpty)));
        assert_eq!(queue.count_pending(), 2);
    }

    #[test]
    fn test_buffer_lags_until_sync() {
        let mut queue = queue_of(&["A", "B"]);
        queue.next().unwrap();
        assert_eq!(ids(queue.buffer()), ["B"]);

        queue.add(make_track("C")).unwrap();
        assert_eq!(ids(queue.buffer()), ["B"]);

        queue.sync();
        assert_eq!(ids(queue.buffer()), ids(queue.pending()));
    }

    #[test]
    fn test_shuffle_leaves_buffer_snapshot_untouched() {
        let mut queue = queue_of(&["A", "B", "C", "D", "E"]);
        queue.sync();
        let buffered: Vec<(String, Option<String>)> = queue
            .buffer()
            .map(|t| (t.id.clone(), t.previous_id.clone()))
            .collect();

        queue.shuffle_with(&mut StdRng::seed_from_u64(42));

        let after: Vec<(String, Option<String>)> = queue
            .buffer()
            .map(|t| (t.id.clone(), t.previous_id.clone()))
            .collect();
        assert_eq!(buffered, after);
        assert_chain(&queue);
        assert!(queue.pending().next().unwrap().previous_id.is_none());
    }

    #[test]
    fn test_set_offset_and_clear_keep_current() {
        let mut queue = queue_of(&["A", "B"]);
        queue.set_offset(Offset::from_millis(10));
        assert!(queue.current().is_none());

        queue.next().unwrap();
        queue.set_offset(Offset::from_millis(42_000));
        assert_eq!(queue.current().unwrap().offset.as_millis(), 42_000);

        queue.clear();
        assert_eq!(queue.count_pending(), 0);
        assert_eq!(queue.count_history(), 0);
        assert_eq!(queue.count_buffer(), 0);
        assert_eq!(queue.current().unwrap().id, "A");
        assert_eq!(queue.state(), QueueState::Playing);
    }

    #[test]
    fn test_history_limit() {
        let mut queue = queue_of(&["A", "B", "C", "D"]).with_history_limit(2);
        for _ in 0..4 {
            queue.next().unwrap();
        }
        assert_eq!(ids(queue.history()), ["B", "C"]);
    }

    #[test]
    fn test_snapshot() {
        let mut queue = queue_of(&["A", "B", "C"]);
        queue.next().unwrap();
        let snapshot = queue.snapshot();

        assert_eq!(snapshot.state, QueueState::Playing);
        assert_eq!(snapshot.current.unwrap().id, "A");
        assert_eq!(snapshot.pending.len(), 2);
        assert_eq!(snapshot.buffer.len(), 2);
        assert!(snapshot.history.is_empty());
    }

    proptest! {
        #[test]
        fn prop_add_maintains_chain(names in proptest::collection::vec("[a-z0-9]{1,6}", 0..40)) {
            let mut queue = MediaQueue::new();
            for name in &names {
                queue.add(make_track(name)).unwrap();
            }
            let pending: Vec<&Track> = queue.pending().collect();
            for pair in pending.windows(2) {
                prop_assert_eq!(pair[1].previous_id.as_deref(), Some(pair[0].id.as_str()));
            }
        }

        #[test]
        fn prop_shuffle_preserves_tracks_and_chain(
            names in proptest::collection::vec("[a-z0-9]{1,6}", 1..40),
            played in 0usize..5,
            seed in any::<u64>(),
        ) {
            let mut queue = MediaQueue::new();
            for name in &names {
                queue.add(make_track(name)).unwrap();
            }
            for _ in 0..played.min(names.len() - 1) {
                queue.next().unwrap();
            }
            queue.add(make_track("late")).unwrap();

            let current = queue.current().map(|t| t.id.clone());
            let history = ids(queue.history());
            let buffer = ids(queue.buffer());
            let mut before = ids(queue.pending());

            queue.shuffle_with(&mut StdRng::seed_from_u64(seed));

            let mut after = ids(queue.pending());
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
            prop_assert_eq!(queue.current().map(|t| t.id.clone()), current);
            prop_assert_eq!(ids(queue.history()), history);
            prop_assert_eq!(ids(queue.buffer()), buffer);

            let pending: Vec<&Track> = queue.pending().collect();
            prop_assert!(pending[0].previous_id.is_none());
            for pair in pending.windows(2) {
                prop_assert_eq!(pair[1].previous_id.as_deref(), Some(pair[0].id.as_str()));
            }
        }

        #[test]
        fn prop_peek_never_moves_playback(names in proptest::collection::vec("[a-z]{1,4}", 1..20), peeks in 0usize..25) {
            let mut queue = MediaQueue::new();
            for name in &names {
                queue.add(make_track(name)).unwrap();
            }
            queue.next().unwrap();
            let pending = queue.count_pending();
            let current = queue.current().unwrap().id.clone();

            for _ in 0..peeks {
                let _ = queue.peek_next_buffered();
            }

            prop_assert_eq!(queue.count_pending(), pending);
            prop_assert_eq!(queue.count_history(), 0);
            prop_assert_eq!(&queue.current().unwrap().id, &current);
        }
    }
}
