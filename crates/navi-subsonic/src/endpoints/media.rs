//! Media retrieval endpoints.

use navi_core::Result;

use crate::SubsonicClient;

impl SubsonicClient {
    /// Build the streaming URI for a song.
    ///
    /// The URI carries its own auth token so the playback device can fetch
    /// it directly. No request is made.
    pub fn stream_uri(&self, id: &str) -> Result<String> {
        self.endpoint_url("stream", &[("id", id)]).map(String::from)
    }
}
