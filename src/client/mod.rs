//! Contracts for the external services the analysis consumes, plus their
//! HTTP implementations.

pub mod genius;
pub mod spotify;

pub use genius::GeniusClient;
pub use spotify::SpotifyClient;

use crate::error::CollaboratorError;
use crate::models::{CatalogAlbum, CatalogArtist, CatalogTrack, LyricsHit};

/// Music catalog: identity lookups and related-entity edges
#[cfg_attr(test, mockall::automock)]
pub trait CatalogService: Send + Sync {
    fn search_track(&self, name: &str, artist: &str)
    -> Result<Option<CatalogTrack>, CollaboratorError>;

    fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CollaboratorError>;

    fn related_artists(&self, artist_id: &str) -> Result<Vec<CatalogArtist>, CollaboratorError>;

    fn top_tracks(&self, artist_id: &str) -> Result<Vec<CatalogTrack>, CollaboratorError>;

    fn albums(&self, artist_id: &str) -> Result<Vec<CatalogAlbum>, CollaboratorError>;
}

/// Lyrics provider: full-text search and page retrieval
#[cfg_attr(test, mockall::automock)]
pub trait LyricsProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<LyricsHit>, CollaboratorError>;

    /// Raw HTML of a lyric page
    fn fetch_page(&self, url: &str) -> Result<String, CollaboratorError>;
}

/// Read a response body as text, mapping transport errors
pub(crate) fn read_body(
    request: Result<ureq::Response, ureq::Error>,
) -> Result<String, CollaboratorError> {
    let response = request?;
    Ok(response.into_string()?)
}
