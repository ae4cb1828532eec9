//! In-memory catalog used by the tests in this crate.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use navi_core::{Catalog, Error, Result, TrackMetadata};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    songs: HashMap<String, TrackMetadata>,
    failing: HashSet<String>,
    delay: Duration,
    slow: HashMap<String, Duration>,
    pub scrobbled: Mutex<Vec<String>>,
}

impl MemoryCatalog {
    /// A catalog knowing every id in `ids`.
    pub fn with_songs(ids: &[&str]) -> Self {
        let songs = ids
            .iter()
            .map(|id| {
                let mut metadata = TrackMetadata::new(*id, format!("Song {id}"));
                metadata.artist = "Artist".into();
                ((*id).to_string(), metadata)
            })
            .collect();

        Self {
            songs,
            ..Self::default()
        }
    }

    /// Every resolution waits this long first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolving `id` takes `delay` instead of the common delay.
    pub fn slow(mut self, id: &str, delay: Duration) -> Self {
        self.slow.insert(id.to_string(), delay);
        self
    }

    /// Resolving `id` fails with a network error.
    pub fn failing(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }
}

impl Catalog for MemoryCatalog {
    async fn resolve(&self, track_id: &str) -> Result<TrackMetadata> {
        let delay = self.slow.get(track_id).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(track_id) {
            return Err(Error::Network(format!("connection reset resolving {track_id}")));
        }
        self.songs
            .get(track_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("song {track_id}")))
    }

    fn stream_uri(&self, track_id: &str) -> Result<String> {
        Ok(format!("http://catalog.test/rest/stream?id={track_id}"))
    }

    async fn scrobble(&self, track_id: &str) -> Result<()> {
        self.scrobbled.lock().push(track_id.to_string());
        Ok(())
    }
}

pub fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}
