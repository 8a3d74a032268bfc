use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub genius_api_key: String,
    pub request_timeout: Duration,
    pub max_concurrency: usize,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();

    let spotify_client_id =
        std::env::var("SPOTIPY_CLIENT_ID").context("SPOTIPY_CLIENT_ID must be set")?;
    let spotify_client_secret =
        std::env::var("SPOTIPY_CLIENT_SECRET").context("SPOTIPY_CLIENT_SECRET must be set")?;
    let genius_api_key = std::env::var("GENIUS_API_KEY").context("GENIUS_API_KEY must be set")?;

    let timeout_secs = parse_optional("REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let max_concurrency = parse_optional("MAX_CONCURRENCY")?.unwrap_or(DEFAULT_MAX_CONCURRENCY);

    Ok(Config {
        spotify_client_id,
        spotify_client_secret,
        genius_api_key,
        request_timeout: Duration::from_secs(timeout_secs),
        max_concurrency: max_concurrency.max(1),
    })
}

fn parse_optional<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} is not a valid number: '{value}'")),
        Err(_) => Ok(None),
    }
}
