use super::{LyricsProvider, read_body};
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::models::LyricsHit;
use serde::Deserialize;
use tracing::debug;
use ureq::Agent;
use urlencoding::encode;

const API_URL: &str = "https://api.genius.com";
const SITE_URL: &str = "https://genius.com";

/// Genius search API plus plain page retrieval for the lyric pages
pub struct GeniusClient {
    agent: Agent,
    api_key: String,
}

impl GeniusClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();

        GeniusClient {
            agent,
            api_key: config.genius_api_key.clone(),
        }
    }
}

impl LyricsProvider for GeniusClient {
    fn search(&self, query: &str) -> Result<Vec<LyricsHit>, CollaboratorError> {
        let url = format!("{API_URL}/search?q={}", encode(query));
        debug!("Searching Genius for '{query}'");

        let body = read_body(
            self.agent
                .get(&url)
                .set("Authorization", &format!("Bearer {}", self.api_key))
                .call(),
        )?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        Ok(parsed
            .response
            .hits
            .into_iter()
            .map(|hit| hit.result.into())
            .collect())
    }

    fn fetch_page(&self, url: &str) -> Result<String, CollaboratorError> {
        debug!("Fetching lyrics page {url}");
        read_body(self.agent.get(url).call())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    result: SongResult,
}

#[derive(Debug, Deserialize)]
struct SongResult {
    #[serde(default)]
    title: String,
    path: String,
    primary_artist: PrimaryArtist,
}

#[derive(Debug, Deserialize)]
struct PrimaryArtist {
    name: String,
}

impl From<SongResult> for LyricsHit {
    fn from(result: SongResult) -> Self {
        LyricsHit {
            title: result.title,
            artist_name: result.primary_artist.name,
            url: format!("{SITE_URL}{}", result.path),
        }
    }
}
