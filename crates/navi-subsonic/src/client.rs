//! Subsonic API client implementation.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use md5::Md5;
use navi_core::{Error, HttpError, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use url::Url;

use crate::config::{ConnectionConfig, CLIENT_NAME};
use crate::types::{ResponseBody, ResponseEnvelope};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum number of attempts for a failed request.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BASE_RETRY_DELAY_MS: u64 = 500;

/// Length of the random salt mixed into the auth token.
const SALT_LEN: usize = 16;

/// Cache entry with expiration.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: std::time::Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: std::time::Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        std::time::Instant::now() >= self.expires_at
    }
}

/// Client for a Subsonic compatible server such as Navidrome.
///
/// Every request authenticates with a fresh salted token, so the password
/// never travels in clear.
#[derive(Clone)]
pub struct SubsonicClient {
    http: reqwest::Client,
    config: Arc<ConnectionConfig>,
    /// `config.base_url()`, computed once.
    base_url: String,
    /// Raw `ok` responses of cacheable endpoints.
    cache: Arc<DashMap<String, CacheEntry<Vec<u8>>>>,
    cache_ttl: Duration,
}

impl SubsonicClient {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(CLIENT_NAME)
            .timeout(DEFAULT_TIMEOUT)
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            config: Arc::new(config),
            cache: Arc::new(DashMap::new()),
            cache_ttl: Duration::from_secs(600),
        })
    }

    /// Set the cache TTL for song lookups.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Build an authenticated URL for `endpoint`. Makes no request.
    pub(crate) fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let salt = generate_salt();
        let token = md5_hex(&format!("{}{salt}", self.config.password));

        let raw = format!("{}/{endpoint}.view", self.base_url);
        let mut url = Url::parse(&raw)
            .map_err(|e| Error::Http(HttpError::InvalidUrl(format!("{raw}: {e}"))))?;

        url.query_pairs_mut()
            .append_pair("u", &self.config.user)
            .append_pair("t", &token)
            .append_pair("s", &salt)
            .append_pair("v", &self.config.api_version)
            .append_pair("c", CLIENT_NAME)
            .append_pair("f", "json")
            .extend_pairs(params);

        Ok(url)
    }

    /// Call `endpoint` and unwrap the response envelope.
    pub(crate) async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<ResponseBody> {
        let bytes = self.fetch(endpoint, params).await?;
        ResponseEnvelope::parse(&bytes)
    }

    /// Like [`get`](Self::get), answering repeated calls from the cache.
    pub(crate) async fn get_cached(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ResponseBody> {
        let cache_key = self.cache_key(endpoint, params);

        if let Some(cached) = self.cached(&cache_key) {
            debug!("Cache hit for {endpoint}");
            return ResponseEnvelope::parse(&cached);
        }

        let bytes = self.fetch(endpoint, params).await?;
        let body = ResponseEnvelope::parse(&bytes)?;
        self.set_cached(cache_key, bytes);
        Ok(body)
    }

    /// Make the request with retries. Only transport failures are retried.
    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(BASE_RETRY_DELAY_MS * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!("Retry attempt {attempt} for {endpoint} after {delay:?}");
            }

            // A new salt for every attempt.
            let url = self.endpoint_url(endpoint, params)?;
            match self.do_request(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!("Request to {endpoint} failed (attempt {attempt}): {e}");

                    if !e.is_retryable() {
                        return Err(e);
                    }

                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Network("Request failed".to_string())))
    }

    async fn do_request(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Http(HttpError::Timeout)
            } else if e.is_connect() {
                Error::Http(HttpError::ConnectionFailed(e.to_string()))
            } else {
                Error::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Http(HttpError::StatusError {
                status: status.as_u16(),
                message,
            }));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))
    }

    /// Auth parameters are left out: they change with every request.
    fn cache_key(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.base_url.as_bytes());
        hasher.update(endpoint.as_bytes());
        for (key, value) in params {
            hasher.update(b"&");
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn cached(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.cache.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.cache.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn set_cached(&self, key: String, value: Vec<u8>) {
        self.cache.insert(key, CacheEntry::new(value, self.cache_ttl));

        if self.cache.len() > 500 {
            self.cache.retain(|_, entry| !entry.is_expired());
        }
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get the number of cached entries.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for SubsonicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsonicClient")
            .field("base_url", &self.base_url)
            .field("user", &self.config.user)
            .field("cache_size", &self.cache.len())
            .finish_non_exhaustive()
    }
}

pub(crate) fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Random lowercase alphanumeric salt.
fn generate_salt() -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..SALT_LEN)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn client() -> SubsonicClient {
        SubsonicClient::new(ConnectionConfig::new(
            "http://nas.local",
            4533,
            "alice",
            "s3cret pw",
        ))
        .unwrap()
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.cache_size(), 0);
        assert_eq!(client.config().user, "alice");
    }

    #[test]
    fn test_client_rejects_bad_config() {
        let config = ConnectionConfig::new("ftp://nas.local", 21, "alice", "pw");
        assert!(SubsonicClient::new(config).is_err());
    }

    #[test]
    fn test_endpoint_url_structure() {
        let url = client().endpoint_url("getSong", &[("id", "a b&c")]).unwrap();
        assert_eq!(url.host_str(), Some("nas.local"));
        assert_eq!(url.port(), Some(4533));
        assert_eq!(url.path(), "/rest/getSong.view");

        let params = query(&url);
        assert_eq!(params["u"], "alice");
        assert_eq!(params["v"], "1.16.1");
        assert_eq!(params["c"], "AskNavidrome");
        assert_eq!(params["f"], "json");
        assert_eq!(params["id"], "a b&c");
        assert!(!params.contains_key("p"));
    }

    #[test]
    fn test_token_is_md5_of_password_and_salt() {
        let url = client().endpoint_url("ping", &[]).unwrap();
        let params = query(&url);
        let salt = &params["s"];
        assert_eq!(params["t"], md5_hex(&format!("s3cret pw{salt}")));
    }

    #[test]
    fn test_salt_changes_per_url() {
        let client = client();
        let first = query(&client.endpoint_url("ping", &[]).unwrap());
        let second = query(&client.endpoint_url("ping", &[]).unwrap());
        assert_ne!(first["s"], second["s"]);
    }

    #[test]
    fn test_md5_hex() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_generate_salt() {
        for _ in 0..10 {
            let salt = generate_salt();
            assert_eq!(salt.len(), SALT_LEN);
            assert!(salt.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_cache_key_ignores_auth() {
        let client = client();
        let key1 = client.cache_key("getSong", &[("id", "1")]);
        let key2 = client.cache_key("getSong", &[("id", "2")]);
        let key3 = client.cache_key("getSong", &[("id", "1")]);

        assert_ne!(key1, key2);
        assert_eq!(key1, key3);
    }

    #[test]
    fn test_cache_expiry() {
        let client = client().with_cache_ttl(Duration::ZERO);
        client.set_cached("k".into(), b"{}".to_vec());
        assert_eq!(client.cache_size(), 1);
        assert!(client.cached("k").is_none());
        assert_eq!(client.cache_size(), 0);

        let client = client.with_cache_ttl(Duration::from_secs(60));
        client.set_cached("k".into(), b"{}".to_vec());
        assert_eq!(client.cached("k").as_deref(), Some(&b"{}"[..]));
        client.clear_cache();
        assert_eq!(client.cache_size(), 0);
    }
}
