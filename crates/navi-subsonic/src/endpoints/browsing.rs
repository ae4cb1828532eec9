//! Browsing endpoints.

use navi_core::{Error, Result, TrackMetadata};
use tracing::debug;

use crate::types::Song;
use crate::SubsonicClient;

impl SubsonicClient {
    /// Get details about a song.
    ///
    /// Responses are cached, so resolving the same song twice in a session
    /// costs one request.
    pub async fn get_song(&self, id: &str) -> Result<TrackMetadata> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("song id is empty".into()));
        }

        debug!("Looking up song {id}");
        let song: Song = self.get_cached("getSong", &[("id", id)]).await?.take("song")?;
        Ok(song.into())
    }
}
