use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One record of a streaming history export, exactly as it appears on disk.
///
/// Fields stay untyped here: `None` means the key is absent, `Some(Value::Null)`
/// means it is present but null. Typing happens during normalization so a
/// single odd value never rejects the document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "trackName", default, deserialize_with = "present")]
    pub track_name: Option<Value>,
    #[serde(rename = "artistName", default, deserialize_with = "present")]
    pub artist_name: Option<Value>,
    #[serde(rename = "albumName", default, deserialize_with = "present")]
    pub album_name: Option<Value>,
    #[serde(rename = "endTime", default, deserialize_with = "present")]
    pub end_time: Option<Value>,
    #[serde(rename = "msPlayed", default, deserialize_with = "present")]
    pub ms_played: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A validated play event. Track and artist are always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamingEvent {
    pub track_name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    pub end_time: Option<NaiveDateTime>,
    pub ms_played: Option<u64>,
}

impl StreamingEvent {
    #[cfg(test)]
    pub fn new(track_name: &str, artist_name: &str) -> Self {
        Self {
            track_name: track_name.to_string(),
            artist_name: artist_name.to_string(),
            album_name: None,
            end_time: None,
            ms_played: None,
        }
    }

    /// `YYYY-MM` of the event, when it carries a timestamp
    pub fn month(&self) -> Option<String> {
        self.end_time.map(|t| t.format("%Y-%m").to_string())
    }

    /// `YYYY` of the event, when it carries a timestamp
    pub fn year(&self) -> Option<String> {
        self.end_time.map(|t| t.format("%Y").to_string())
    }
}

/// Name with its occurrence count inside one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountedEntity {
    pub name: String,
    pub count: usize,
}

/// Artist as reported by the catalog service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

/// Track as reported by the catalog service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTrack {
    pub name: String,
    pub artist: Option<String>,
    pub album_art: Option<String>,
    pub url: Option<String>,
}

/// Album as reported by the catalog service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogAlbum {
    pub name: String,
    pub artist: Option<String>,
    pub cover_art: Option<String>,
    pub url: Option<String>,
}

/// One search result from the lyrics provider
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsHit {
    pub title: String,
    pub artist_name: String,
    pub url: String,
}
