//! Subsonic response envelope and payload types.

use navi_core::{Duration, Error, Result, TrackMetadata};
use serde::Deserialize;

/// Error code the server uses for a missing entity.
pub const CODE_NOT_FOUND: u32 = 70;

#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "subsonic-response")]
    pub response: ResponseBody,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    /// Parse a raw response body, turning a `failed` status into an error.
    pub fn parse(bytes: &[u8]) -> Result<ResponseBody> {
        let envelope: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::ParseError(format!("Invalid response envelope: {e}")))?;
        envelope.response.into_result()
    }
}

impl ResponseBody {
    fn into_result(self) -> Result<Self> {
        if self.status == "ok" {
            return Ok(self);
        }

        let (code, message) = self.error.map_or((0, None), |e| (e.code, e.message));
        let message = message.unwrap_or_else(|| "Unknown error".to_string());
        if code == CODE_NOT_FOUND {
            return Err(Error::NotFound(message));
        }
        Err(Error::Api { code, message })
    }

    /// Take the payload stored under `key`.
    pub fn take<T: serde::de::DeserializeOwned>(mut self, key: &str) -> Result<T> {
        let value = self
            .data
            .remove(key)
            .ok_or_else(|| Error::ParseError(format!("Response has no '{key}' element")))?;
        serde_json::from_value(value)
            .map_err(|e| Error::ParseError(format!("Invalid '{key}' element: {e}")))
    }
}

/// A song as returned by `getSong`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub album_id: Option<String>,
    #[serde(default)]
    pub track: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub genre: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub bit_rate: Option<u32>,
}

impl From<Song> for TrackMetadata {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist: song.artist.unwrap_or_default(),
            artist_id: song.artist_id.unwrap_or_default(),
            album: song.album.unwrap_or_default(),
            album_id: song.album_id.unwrap_or_default(),
            track_no: song.track.unwrap_or_default(),
            year: song.year.unwrap_or_default(),
            genre: song.genre.unwrap_or_default(),
            duration: Duration::from_seconds(song.duration.unwrap_or_default()),
            bitrate: song.bit_rate.unwrap_or_default(),
        }
    }
}

/// Kind of entity to star or unstar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StarTarget {
    #[default]
    Song,
    Album,
    Artist,
}

impl StarTarget {
    /// Query parameter carrying the entity id.
    pub const fn param(self) -> &'static str {
        match self {
            Self::Song => "id",
            Self::Album => "albumId",
            Self::Artist => "artistId",
        }
    }
}
