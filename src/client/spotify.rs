use super::{CatalogService, read_body};
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::models::{CatalogAlbum, CatalogArtist, CatalogTrack};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use ureq::Agent;
use urlencoding::encode;

const API_URL: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const TOP_TRACKS_MARKET: &str = "US";
// Refresh a little before the token actually expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Spotify Web API client using the client-credentials flow.
///
/// Built once by the caller and shared by every analysis run; only the
/// access token is cached here.
pub struct SpotifyClient {
    agent: Agent,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.request_timeout)
            .build();

        SpotifyClient {
            agent,
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, requesting a new one when needed
    fn access_token(&self) -> Result<String, CollaboratorError> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| CollaboratorError::Auth("token cache poisoned".to_string()))?;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Spotify access token");
        let credentials = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let body = read_body(
            self.agent
                .post(TOKEN_URL)
                .set("Authorization", &format!("Basic {credentials}"))
                .send_form(&[("grant_type", "client_credentials")]),
        )
        .map_err(|e| CollaboratorError::Auth(e.to_string()))?;

        let response: TokenResponse = serde_json::from_str(&body)?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = response.access_token;

        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    /// Authenticated GET against the Web API, decoded into `T`
    fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, CollaboratorError> {
        let token = self.access_token()?;
        let url = format!("{API_URL}{path_and_query}");
        debug!("GET {url}");

        let body = read_body(
            self.agent
                .get(&url)
                .set("Authorization", &format!("Bearer {token}"))
                .call(),
        )?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogService for SpotifyClient {
    fn search_track(
        &self,
        name: &str,
        artist: &str,
    ) -> Result<Option<CatalogTrack>, CollaboratorError> {
        let query = format!("track:{name} artist:{artist}");
        let response: SearchResponse =
            self.get(&format!("/search?q={}&type=track&limit=1", encode(&query)))?;

        Ok(response
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(CatalogTrack::from))
    }

    fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CollaboratorError> {
        let query = format!("artist:{name}");
        let response: SearchResponse =
            self.get(&format!("/search?q={}&type=artist&limit=1", encode(&query)))?;

        Ok(response
            .artists
            .and_then(|page| page.items.into_iter().next())
            .map(CatalogArtist::from))
    }

    fn related_artists(&self, artist_id: &str) -> Result<Vec<CatalogArtist>, CollaboratorError> {
        let response: RelatedArtistsResponse =
            self.get(&format!("/artists/{}/related-artists", encode(artist_id)))?;
        Ok(response.artists.into_iter().map(CatalogArtist::from).collect())
    }

    fn top_tracks(&self, artist_id: &str) -> Result<Vec<CatalogTrack>, CollaboratorError> {
        let response: TopTracksResponse = self.get(&format!(
            "/artists/{}/top-tracks?market={TOP_TRACKS_MARKET}",
            encode(artist_id)
        ))?;
        Ok(response.tracks.into_iter().map(CatalogTrack::from).collect())
    }

    fn albums(&self, artist_id: &str) -> Result<Vec<CatalogAlbum>, CollaboratorError> {
        let response: Page<SpotifyAlbum> = self.get(&format!(
            "/artists/{}/albums?include_groups=album",
            encode(artist_id)
        ))?;
        Ok(response.items.into_iter().map(CatalogAlbum::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<Page<SpotifyTrack>>,
    artists: Option<Page<SpotifyArtist>>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RelatedArtistsResponse {
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    album: Option<AlbumRef>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    #[serde(default)]
    images: Vec<Image>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

fn first_image(images: Vec<Image>) -> Option<String> {
    images.into_iter().next().map(|image| image.url)
}

fn first_artist(artists: Vec<ArtistRef>) -> Option<String> {
    artists.into_iter().next().map(|artist| artist.name)
}

impl From<SpotifyArtist> for CatalogArtist {
    fn from(artist: SpotifyArtist) -> Self {
        CatalogArtist {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            image_url: first_image(artist.images),
            url: artist.external_urls.spotify,
        }
    }
}

impl From<SpotifyTrack> for CatalogTrack {
    fn from(track: SpotifyTrack) -> Self {
        CatalogTrack {
            name: track.name,
            artist: first_artist(track.artists),
            album_art: track.album.and_then(|album| first_image(album.images)),
            url: track.external_urls.spotify,
        }
    }
}

impl From<SpotifyAlbum> for CatalogAlbum {
    fn from(album: SpotifyAlbum) -> Self {
        CatalogAlbum {
            name: album.name,
            artist: first_artist(album.artists),
            cover_art: first_image(album.images),
            url: album.external_urls.spotify,
        }
    }
}
