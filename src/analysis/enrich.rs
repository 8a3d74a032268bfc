use super::fallback::attempt;
use crate::client::CatalogService;
use crate::models::CatalogArtist;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Display metadata attached to a top track or artist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogMetadata {
    pub image: Option<String>,
    pub url: Option<String>,
}

/// Resolves artist names to catalog artists, remembering every outcome for
/// the lifetime of one run so the enricher and the recommendation passes
/// share a single lookup per name
pub struct ArtistResolver<'a> {
    catalog: &'a dyn CatalogService,
    resolved: Mutex<HashMap<String, Option<CatalogArtist>>>,
}

impl<'a> ArtistResolver<'a> {
    pub fn new(catalog: &'a dyn CatalogService) -> Self {
        Self {
            catalog,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &'a dyn CatalogService {
        self.catalog
    }

    /// Catalog artist for `name`; misses and failures both come back as `None`
    pub fn resolve(&self, name: &str) -> Option<CatalogArtist> {
        if let Some(known) = self.cached(name) {
            return known;
        }

        let artist = attempt(format!("Catalog search for artist '{name}'"), None, || {
            self.catalog.search_artist(name)
        });
        if artist.is_none() {
            debug!("No catalog artist for '{name}'");
        }

        if let Ok(mut resolved) = self.resolved.lock() {
            resolved.insert(name.to_string(), artist.clone());
        }
        artist
    }

    fn cached(&self, name: &str) -> Option<Option<CatalogArtist>> {
        self.resolved
            .lock()
            .ok()
            .and_then(|resolved| resolved.get(name).cloned())
    }
}

/// Art and link for a top track, searched by track and artist name
pub fn enrich_track(catalog: &dyn CatalogService, track: &str, artist: &str) -> CatalogMetadata {
    let found = attempt(
        format!("Catalog search for track '{track}' by '{artist}'"),
        None,
        || catalog.search_track(track, artist),
    );

    found
        .map(|t| CatalogMetadata {
            image: t.album_art,
            url: t.url,
        })
        .unwrap_or_default()
}

/// Image and link for a top artist
pub fn enrich_artist(resolver: &ArtistResolver, artist: &str) -> CatalogMetadata {
    resolver
        .resolve(artist)
        .map(|a| CatalogMetadata {
            image: a.image_url,
            url: a.url,
        })
        .unwrap_or_default()
}
