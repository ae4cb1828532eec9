//! Subsonic server as a track catalog.

use navi_core::{Catalog, Result, TrackMetadata};

use crate::SubsonicClient;

impl Catalog for SubsonicClient {
    async fn resolve(&self, track_id: &str) -> Result<TrackMetadata> {
        self.get_song(track_id).await
    }

    fn stream_uri(&self, track_id: &str) -> Result<String> {
        Self::stream_uri(self, track_id)
    }

    async fn scrobble(&self, track_id: &str) -> Result<()> {
        Self::scrobble(self, track_id).await
    }
}
