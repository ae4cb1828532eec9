//! System endpoints.

use navi_core::Result;
use tracing::{error, info};

use crate::SubsonicClient;

impl SubsonicClient {
    /// Check that the server is reachable and accepts our credentials.
    pub async fn ping(&self) -> Result<()> {
        match self.get("ping", &[]).await {
            Ok(body) => {
                info!(
                    "Connected to {} (API {})",
                    self.config().server_url,
                    body.version.as_deref().unwrap_or("unknown")
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to connect to {}: {e}", self.config().server_url);
                Err(e)
            }
        }
    }
}
