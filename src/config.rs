//! Configuration manager for tazza.
//!
//! Everything comes from the environment: the hosted store endpoint and
//! access key, plus the listening port and a display name. Missing store
//! credentials are not fatal here; they surface as a distinct unconfigured
//! state once the store is built.

use std::env;
use std::sync::Arc;

use axum::extract::FromRef;
use url::Url;

use crate::AppState;

pub const STORE_URL: &str = "STORE_URL";
pub const STORE_KEY: &str = "STORE_KEY";

const DEFAULT_PORT: u16 = 1111;
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing `{0}` environment variable")]
    MissingVar(&'static str),

    #[error("store endpoint is not a valid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Hosted store credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Normalized endpoint URL.
    pub url: String,
    /// Access key sent with every request.
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Configuration {
    /// Instance name shown on the public status page.
    pub name: String,
    pub port: u16,
    pub version: &'static str,
    /// Store credentials, or why they are unusable.
    pub store: Result<StoreConfig, ConfigError>,
}

impl Configuration {
    /// Read the whole configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            name: env::var("SERVER_NAME")
                .unwrap_or_else(|_| env!("CARGO_CRATE_NAME").to_owned()),
            port: port_from(env::var("PORT").ok()),
            version: VERSION,
            store: store_from(
                env::var(STORE_URL).ok(),
                env::var(STORE_KEY).ok(),
            ),
        }
    }
}

fn port_from(value: Option<String>) -> u16 {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(%raw, "invalid `PORT` value, using default");
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

fn store_from(
    url: Option<String>,
    key: Option<String>,
) -> Result<StoreConfig, ConfigError> {
    let url = url.ok_or(ConfigError::MissingVar(STORE_URL))?;
    let key = key.ok_or(ConfigError::MissingVar(STORE_KEY))?;

    Ok(StoreConfig {
        url: normalize_url(&url)?,
        key,
    })
}

/// Normalizes a URL string by ensuring it starts with a valid scheme
/// (`http` or `https`).
fn normalize_url(url: &str) -> Result<String, url::ParseError> {
    let url_with_scheme =
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };

    let parsed_url = Url::parse(&url_with_scheme)?;
    Ok(parsed_url.to_string())
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}
