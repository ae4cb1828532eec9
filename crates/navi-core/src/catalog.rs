//! Boundary to the music catalog that resolves track ids.

use std::future::Future;

use crate::error::Result;
use crate::types::{Track, TrackMetadata};

/// A source of track metadata and stream URIs.
///
/// Implementations perform network I/O; the queue engine never calls them
/// directly.
pub trait Catalog: Send + Sync + 'static {
    /// Look up metadata for a song. Fails with `Error::NotFound` for unknown ids.
    fn resolve(&self, track_id: &str) -> impl Future<Output = Result<TrackMetadata>> + Send;

    /// Build the streaming URI for a song. Does not make a network request.
    fn stream_uri(&self, track_id: &str) -> Result<String>;

    /// Report that a song finished playing.
    fn scrobble(&self, _track_id: &str) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Resolve a song into a playable [`Track`] with no offset and no predecessor.
pub async fn resolve_track<C: Catalog + ?Sized>(catalog: &C, track_id: &str) -> Result<Track> {
    let metadata = catalog.resolve(track_id).await?;
    let uri = catalog.stream_uri(track_id)?;
    Ok(Track::from_metadata(metadata, uri))
}
