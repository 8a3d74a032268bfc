use super::fallback::attempt_or_default;
use crate::client::LyricsProvider;
use crate::models::LyricsHit;
use scraper::{Html, Selector};
use tracing::{debug, info};

// Current lyric pages split the text over several container blocks
const PRIMARY_SELECTOR: &str =
    r#"div[data-lyrics-container="true"], div[class^="Lyrics__Container"]"#;
const FALLBACK_SELECTOR: &str = "div.lyrics";

/// A search query and whether its hits must match the requested artist
#[derive(Debug, Clone, PartialEq)]
struct LyricsQuery {
    text: String,
    check_artist: bool,
}

/// Queries tried in order: track with artist, then the track alone.
///
/// The track-only query accepts any hit without checking the artist; that
/// favours finding some lyrics over finding the right ones.
fn lyrics_queries(track: &str, artist: &str) -> [LyricsQuery; 2] {
    [
        LyricsQuery {
            text: format!("{track} {artist}"),
            check_artist: true,
        },
        LyricsQuery {
            text: track.to_string(),
            check_artist: false,
        },
    ]
}

/// Case-insensitive containment in either direction
pub fn artist_matches(requested: &str, hit_artist: &str) -> bool {
    let requested = requested.to_lowercase();
    let hit_artist = hit_artist.to_lowercase();
    hit_artist.contains(&requested) || requested.contains(&hit_artist)
}

/// Find lyrics for a track. Every provider failure is logged and treated as
/// "no lyrics" for that attempt.
pub fn resolve_lyrics(provider: &dyn LyricsProvider, track: &str, artist: &str) -> Option<String> {
    for query in lyrics_queries(track, artist) {
        let hits: Vec<LyricsHit> = attempt_or_default(
            format!("Searching lyrics for '{track}' by '{artist}'"),
            || provider.search(&query.text),
        );

        for hit in hits {
            if query.check_artist && !artist_matches(artist, &hit.artist_name) {
                continue;
            }
            debug!("Trying lyrics page {} ({} by {})", hit.url, hit.title, hit.artist_name);

            let page = attempt_or_default(
                format!("Scraping lyrics for '{track}' by '{artist}'"),
                || provider.fetch_page(&hit.url).map(Some),
            );
            if let Some(lyrics) = page.as_deref().and_then(extract_lyrics) {
                return Some(lyrics);
            }
        }
    }

    info!("Lyrics not found for '{track}' by '{artist}'");
    None
}

/// Pull lyric text out of a lyric page, trying the primary container
/// selector first and the legacy block second
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    [PRIMARY_SELECTOR, FALLBACK_SELECTOR]
        .into_iter()
        .filter_map(|selector| Selector::parse(selector).ok())
        .find_map(|selector| {
            let lines: Vec<&str> = document
                .select(&selector)
                .flat_map(|element| element.text())
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        })
}
