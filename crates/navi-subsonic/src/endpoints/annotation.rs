//! Media annotation endpoints.

use chrono::Utc;
use navi_core::Result;
use tracing::debug;

use crate::types::StarTarget;
use crate::SubsonicClient;

impl SubsonicClient {
    /// Register a play of `id`, timestamped now.
    pub async fn scrobble(&self, id: &str) -> Result<()> {
        let time = Utc::now().timestamp_millis().to_string();
        debug!("Scrobbling song {id} at {time}");
        self.get(
            "scrobble",
            &[("id", id), ("time", time.as_str()), ("submission", "true")],
        )
        .await?;
        Ok(())
    }

    /// Add a star to a song, album or artist.
    pub async fn star(&self, target: StarTarget, id: &str) -> Result<()> {
        debug!("Starring {target:?} {id}");
        self.get("star", &[(target.param(), id)]).await?;
        Ok(())
    }

    /// Remove a star from a song, album or artist.
    pub async fn unstar(&self, target: StarTarget, id: &str) -> Result<()> {
        debug!("Unstarring {target:?} {id}");
        self.get("unstar", &[(target.param(), id)]).await?;
        Ok(())
    }
}
