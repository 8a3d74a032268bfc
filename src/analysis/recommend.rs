use super::enrich::ArtistResolver;
use super::fallback::attempt_or_default;
use super::workers::fan_out;
use crate::models::{CatalogAlbum, CatalogArtist, CatalogTrack};
use rayon::ThreadPool;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedArtist {
    pub name: String,
    pub image: Option<String>,
    pub spotify_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedSong {
    pub name: String,
    pub artist: Option<String>,
    pub album_art: Option<String>,
    pub spotify_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedAlbum {
    pub name: String,
    pub artist: Option<String>,
    pub cover_art: Option<String>,
    pub spotify_url: Option<String>,
}

/// Names the user already knows, per recommendation kind
#[derive(Debug, Clone, Default)]
pub struct UserHistory {
    pub top_artists: HashSet<String>,
    pub tracks: HashSet<String>,
    /// Empty when the export carries no album names
    pub albums: HashSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub artists: Vec<RecommendedArtist>,
    pub songs: Vec<RecommendedSong>,
    pub albums: Vec<RecommendedAlbum>,
    pub genres: BTreeMap<String, usize>,
}

/// Expand the seed artists into artist, song and album recommendations plus
/// a genre distribution.
///
/// Seeds are visited in ranking order, so when a list is truncated to `cap`
/// the higher-ranked seeds win. A seed the catalog cannot resolve is skipped
/// by every pass; a failing pass for one seed contributes nothing.
pub fn build_recommendations(
    resolver: &ArtistResolver,
    pool: &ThreadPool,
    seeds: &[String],
    history: &UserHistory,
    cap: usize,
) -> Recommendations {
    let catalog = resolver.catalog();
    let resolved: Vec<CatalogArtist> = fan_out(pool, seeds, |name| resolver.resolve(name))
        .into_iter()
        .flatten()
        .collect();

    let related = fan_out(pool, &resolved, |seed| {
        attempt_or_default(format!("Related artists for '{}'", seed.name), || {
            catalog.related_artists(&seed.id)
        })
    });
    let top_tracks = fan_out(pool, &resolved, |seed| {
        attempt_or_default(format!("Top tracks for '{}'", seed.name), || {
            catalog.top_tracks(&seed.id)
        })
    });
    let albums = fan_out(pool, &resolved, |seed| {
        attempt_or_default(format!("Albums for '{}'", seed.name), || {
            catalog.albums(&seed.id)
        })
    });

    let recommendations = Recommendations {
        artists: collect_unique(related, |a| &a.name, &history.top_artists, cap)
            .into_iter()
            .map(RecommendedArtist::from)
            .collect(),
        songs: collect_unique(top_tracks, |t| &t.name, &history.tracks, cap)
            .into_iter()
            .map(RecommendedSong::from)
            .collect(),
        albums: collect_unique(albums, |a| &a.name, &history.albums, cap)
            .into_iter()
            .map(RecommendedAlbum::from)
            .collect(),
        genres: genre_distribution(&resolved),
    };

    info!(
        "Recommendations from {} of {} seeds: {} artists, {} songs, {} albums, {} genres",
        resolved.len(),
        seeds.len(),
        recommendations.artists.len(),
        recommendations.songs.len(),
        recommendations.albums.len(),
        recommendations.genres.len()
    );
    recommendations
}

/// Flatten per-seed candidates in seed order, dropping excluded names and
/// repeats (first occurrence wins), keeping at most `cap`
fn collect_unique<T>(
    per_seed: Vec<Vec<T>>,
    name: impl Fn(&T) -> &String,
    excluded: &HashSet<String>,
    cap: usize,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for candidate in per_seed.into_iter().flatten() {
        if kept.len() >= cap {
            break;
        }
        let candidate_name = name(&candidate);
        if excluded.contains(candidate_name) || !seen.insert(candidate_name.clone()) {
            continue;
        }
        kept.push(candidate);
    }
    kept
}

/// How often each genre tag occurs across the resolved seed artists
pub fn genre_distribution(artists: &[CatalogArtist]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for genre in artists.iter().flat_map(|a| &a.genres) {
        *distribution.entry(genre.clone()).or_insert(0) += 1;
    }
    distribution
}

impl From<CatalogArtist> for RecommendedArtist {
    fn from(artist: CatalogArtist) -> Self {
        Self {
            name: artist.name,
            image: artist.image_url,
            spotify_url: artist.url,
        }
    }
}

impl From<CatalogTrack> for RecommendedSong {
    fn from(track: CatalogTrack) -> Self {
        Self {
            name: track.name,
            artist: track.artist,
            album_art: track.album_art,
            spotify_url: track.url,
        }
    }
}

impl From<CatalogAlbum> for RecommendedAlbum {
    fn from(album: CatalogAlbum) -> Self {
        Self {
            name: album.name,
            artist: album.artist,
            cover_art: album.cover_art,
            spotify_url: album.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::workers::build_pool;
    use crate::client::MockCatalogService;
    use crate::error::CollaboratorError;

    fn artist(id: &str, name: &str, genres: &[&str]) -> CatalogArtist {
        CatalogArtist {
            id: id.to_string(),
            name: name.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    fn track(name: &str) -> CatalogTrack {
        CatalogTrack {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn album(name: &str) -> CatalogAlbum {
        CatalogAlbum {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn names(set: &[&str]) -> HashSet<String> {
        set.iter().map(|s| s.to_string()).collect()
    }

    fn seeds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collect_unique_dedupes_excludes_and_caps() {
        let per_seed = vec![
            vec!["a".to_string(), "mine".to_string(), "b".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ];
        let kept = collect_unique(per_seed, |s| s, &names(&["mine"]), 3);
        assert_eq!(kept, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_genre_distribution_counts_duplicates_across_artists() {
        let artists = vec![
            artist("1", "X", &["rock", "indie"]),
            artist("2", "Y", &["rock"]),
            artist("3", "Z", &[]),
        ];
        let distribution = genre_distribution(&artists);
        assert_eq!(distribution["rock"], 2);
        assert_eq!(distribution["indie"], 1);
        assert_eq!(distribution.len(), 2);
    }

    #[test]
    fn test_builds_all_four_facets() {
        let mut catalog = MockCatalogService::new();
        catalog.expect_search_artist().returning(|name| match name {
            "X" => Ok(Some(artist("x", "X", &["rock", "indie"]))),
            "Y" => Ok(Some(artist("y", "Y", &["rock"]))),
            _ => Ok(None),
        });
        catalog.expect_related_artists().returning(|id| match id {
            "x" => Ok(vec![artist("r1", "R1", &[]), artist("y", "Y", &[])]),
            _ => Ok(vec![artist("r1", "R1", &[]), artist("r2", "R2", &[])]),
        });
        catalog.expect_top_tracks().returning(|id| match id {
            "x" => Ok(vec![track("Known"), track("New X")]),
            _ => Ok(vec![track("New Y")]),
        });
        catalog
            .expect_albums()
            .returning(|_| Ok(vec![album("Owned"), album("Fresh")]));

        let resolver = ArtistResolver::new(&catalog);
        let pool = build_pool(2).unwrap();
        let history = UserHistory {
            top_artists: names(&["X", "Y", "Unknown"]),
            tracks: names(&["Known"]),
            albums: names(&["Owned"]),
        };

        let recs = build_recommendations(
            &resolver,
            &pool,
            &seeds(&["X", "Y", "Unknown"]),
            &history,
            6,
        );

        let artist_names: Vec<_> = recs.artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(artist_names, vec!["R1", "R2"]);
        let song_names: Vec<_> = recs.songs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(song_names, vec!["New X", "New Y"]);
        let album_names: Vec<_> = recs.albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(album_names, vec!["Fresh"]);
        assert_eq!(recs.genres["rock"], 2);
        assert_eq!(recs.genres["indie"], 1);
    }

    #[test]
    fn test_earlier_seeds_win_the_cap() {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_search_artist()
            .returning(|name| Ok(Some(artist(&name.to_lowercase(), name, &[]))));
        catalog.expect_related_artists().returning(|id| {
            Ok((0..5)
                .map(|i| artist(&format!("{id}{i}"), &format!("{id}-{i}"), &[]))
                .collect())
        });
        catalog.expect_top_tracks().returning(|_| Ok(vec![]));
        catalog.expect_albums().returning(|_| Ok(vec![]));

        let resolver = ArtistResolver::new(&catalog);
        let pool = build_pool(4).unwrap();
        let recs = build_recommendations(
            &resolver,
            &pool,
            &seeds(&["A", "B", "C"]),
            &UserHistory::default(),
            6,
        );

        let artist_names: Vec<_> = recs.artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(artist_names, vec!["a-0", "a-1", "a-2", "a-3", "a-4", "b-0"]);
    }

    #[test]
    fn test_failing_pass_leaves_other_passes_intact() {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_search_artist()
            .returning(|_| Ok(Some(artist("x", "X", &["jazz"]))));
        catalog
            .expect_related_artists()
            .returning(|_| Err(CollaboratorError::Status(404)));
        catalog
            .expect_top_tracks()
            .returning(|_| Ok(vec![track("Tune")]));
        catalog
            .expect_albums()
            .returning(|_| Err(CollaboratorError::Transport("timed out".to_string())));

        let resolver = ArtistResolver::new(&catalog);
        let pool = build_pool(2).unwrap();
        let recs =
            build_recommendations(&resolver, &pool, &seeds(&["X"]), &UserHistory::default(), 6);

        assert!(recs.artists.is_empty());
        assert!(recs.albums.is_empty());
        assert_eq!(recs.songs.len(), 1);
        assert_eq!(recs.genres["jazz"], 1);
    }

    #[test]
    fn test_unresolvable_seeds_produce_nothing() {
        let mut catalog = MockCatalogService::new();
        catalog
            .expect_search_artist()
            .returning(|_| Err(CollaboratorError::Transport("unreachable".to_string())));
        catalog.expect_related_artists().never();
        catalog.expect_top_tracks().never();
        catalog.expect_albums().never();

        let resolver = ArtistResolver::new(&catalog);
        let pool = build_pool(2).unwrap();
        let recs = build_recommendations(
            &resolver,
            &pool,
            &seeds(&["X", "Y"]),
            &UserHistory::default(),
            6,
        );

        assert_eq!(recs, Recommendations::default());
    }
}
