//! Tool configuration: credential, default collection and service endpoint.

use std::fmt;
use std::time::Duration;

use crate::error::{GestellError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GESTELL_API_KEY";
/// Environment variable holding the default collection id.
pub const COLLECTION_ID_ENV: &str = "GESTELL_COLLECTION_ID";
/// Environment variable overriding the service base URL.
pub const API_URL_ENV: &str = "GESTELL_API_URL";

pub const DEFAULT_BASE_URL: &str = "https://platform.gestell.ai";

/// Immutable per-tool configuration captured at construction.
#[derive(Clone)]
pub struct GestellConfig {
    pub api_key: String,
    pub collection_id: String,
    pub base_url: String,
    /// Overall request timeout. `None` keeps the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for GestellConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestellConfig")
            .field("api_key", &"<redacted>")
            .field("collection_id", &self.collection_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// 引数が空でなければ引数、なければ環境変数（空文字は未設定扱い）
fn explicit_or_env(explicit: Option<String>, var: &str) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

impl GestellConfig {
    /// Build a configuration; explicit arguments take precedence over the environment.
    ///
    /// Fails when the API key or the default collection id is missing from both.
    pub fn new(api_key: Option<String>, collection_id: Option<String>) -> Result<Self> {
        let api_key = explicit_or_env(api_key, API_KEY_ENV).ok_or(GestellError::MissingApiKey)?;
        let collection_id =
            explicit_or_env(collection_id, COLLECTION_ID_ENV).ok_or(GestellError::MissingCollectionId)?;
        let base_url = explicit_or_env(None, API_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            collection_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        })
    }

    /// Configuration taken entirely from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win() {
        let c = GestellConfig::new(Some("key".into()), Some("coll".into())).unwrap();
        assert_eq!(c.api_key, "key");
        assert_eq!(c.collection_id, "coll");
    }

    #[test]
    fn debug_redacts_key() {
        let c = GestellConfig::new(Some("super-secret".into()), Some("coll".into())).unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let c = GestellConfig::new(Some("k".into()), Some("c".into()))
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(c.base_url, "http://localhost:8080");
    }
}
