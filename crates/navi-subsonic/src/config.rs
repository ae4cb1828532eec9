//! Connection settings for a Subsonic compatible server.

use navi_core::{Error, HttpError, Result};
use url::Url;

/// API path used by Navidrome.
pub const DEFAULT_API_PATH: &str = "/rest";

/// Protocol version sent with every request.
pub const DEFAULT_API_VERSION: &str = "1.16.1";

/// Client name sent with every request.
pub const CLIENT_NAME: &str = "AskNavidrome";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Scheme and host, e.g. `https://music.example.com`.
    pub server_url: String,
    pub port: u16,
    /// Path to the API below the host, e.g. `/rest`.
    pub api_path: String,
    pub api_version: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    pub fn new(
        server_url: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            port,
            api_path: DEFAULT_API_PATH.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user: user.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// `{server_url}:{port}{api_path}`, without a trailing slash.
    pub fn base_url(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        let path = self.api_path.trim_end_matches('/');
        if path.is_empty() || path.starts_with('/') {
            format!("{server}:{}{path}", self.port)
        } else {
            format!("{server}:{}/{path}", self.port)
        }
    }

    /// Check that the settings form a usable URL.
    pub fn validate(&self) -> Result<Url> {
        if self.user.is_empty() {
            return Err(Error::InvalidArgument("user name is empty".into()));
        }

        let base = self.base_url();
        let url = Url::parse(&base)
            .map_err(|e| Error::Http(HttpError::InvalidUrl(format!("{base}: {e}"))))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Http(HttpError::InvalidUrl(format!(
                "{base}: unsupported scheme {}",
                url.scheme()
            ))));
        }
        Ok(url)
    }
}
