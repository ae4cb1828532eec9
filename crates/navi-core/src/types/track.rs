//! Track type representing a single playable song.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{Duration, Offset};

/// Catalog metadata for a song, as returned by a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackMetadata {
    /// Catalog song ID.
    pub id: String,
    /// Song title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Artist ID.
    pub artist_id: String,
    /// Album name.
    pub album: String,
    /// Album ID.
    pub album_id: String,
    /// Position on the album.
    pub track_no: u32,
    /// Release year.
    pub year: u32,
    /// Genre name.
    pub genre: String,
    /// Track length.
    pub duration: Duration,
    /// Bit rate in kbps.
    pub bitrate: u32,
}

impl TrackMetadata {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A single playable track.
///
/// Two tracks are equal when their ids are equal. The queue engine is the
/// only writer of `offset` and `previous_id` once a track has been queued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    /// Catalog song ID. Never empty for a queued track.
    pub id: String,
    /// Song title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Artist ID.
    pub artist_id: String,
    /// Album name.
    pub album: String,
    /// Album ID.
    pub album_id: String,
    /// Position on the album.
    pub track_no: u32,
    /// Release year.
    pub year: u32,
    /// Genre name.
    pub genre: String,
    /// Track length.
    pub duration: Duration,
    /// Bit rate in kbps.
    pub bitrate: u32,
    /// Streaming URI, including authentication.
    pub uri: String,
    /// Where playback should start.
    pub offset: Offset,
    /// Id of the track expected to play immediately before this one.
    pub previous_id: Option<String>,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Build a track from resolved catalog metadata and its stream URI.
    pub fn from_metadata(metadata: TrackMetadata, uri: impl Into<String>) -> Self {
        Self {
            id: metadata.id,
            title: metadata.title,
            artist: metadata.artist,
            artist_id: metadata.artist_id,
            album: metadata.album,
            album_id: metadata.album_id,
            track_no: metadata.track_no,
            year: metadata.year,
            genre: metadata.genre,
            duration: metadata.duration,
            bitrate: metadata.bitrate,
            uri: uri.into(),
            offset: Offset::ZERO,
            previous_id: None,
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_previous_id(mut self, previous_id: impl Into<String>) -> Self {
        self.previous_id = Some(previous_id.into());
        self
    }

    /// `"title by artist"`, or just the title when the artist is unknown.
    pub fn display_name(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} by {}", self.title, self.artist)
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
