use super::duration::ListeningMinutes;
use super::enrich::CatalogMetadata;
use super::recommend::{Recommendations, RecommendedAlbum, RecommendedArtist, RecommendedSong};
use super::sentiment::SentimentLabel;
use crate::models::CountedEntity;
use serde::Serialize;
use std::collections::BTreeMap;

/// A top track with its catalog metadata and lyric sentiment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub name: String,
    pub artist: String,
    pub count: usize,
    pub album_art: Option<String>,
    pub spotify_url: Option<String>,
    pub sentiment: f64,
}

impl TrackSummary {
    pub fn new(
        entity: &CountedEntity,
        artist: &str,
        metadata: CatalogMetadata,
        sentiment: f64,
    ) -> Self {
        Self {
            name: entity.name.clone(),
            artist: artist.to_string(),
            count: entity.count,
            album_art: metadata.image,
            spotify_url: metadata.url,
            sentiment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistSummary {
    pub name: String,
    pub count: usize,
    pub image: Option<String>,
    pub spotify_url: Option<String>,
}

impl ArtistSummary {
    pub fn new(entity: &CountedEntity, metadata: CatalogMetadata) -> Self {
        Self {
            name: entity.name.clone(),
            count: entity.count,
            image: metadata.image,
            spotify_url: metadata.url,
        }
    }
}

/// Ranked lists per period label
pub type PeriodTable = BTreeMap<String, Vec<CountedEntity>>;

/// Top tracks and artists per month and per year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTables {
    pub tracks_by_month: PeriodTable,
    pub tracks_by_year: PeriodTable,
    pub artists_by_month: PeriodTable,
    pub artists_by_year: PeriodTable,
}

/// The complete listening report. Every field is always present; missing
/// data shows up as nulls, zeros and empty collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub top_tracks: Vec<TrackSummary>,
    pub top_artists: Vec<ArtistSummary>,
    pub sentiment: SentimentLabel,
    pub sentiment_scores: Vec<f64>,
    pub recommendations: Vec<RecommendedArtist>,
    pub recommended_songs: Vec<RecommendedSong>,
    pub recommended_albums: Vec<RecommendedAlbum>,
    pub genre_distribution: BTreeMap<String, usize>,
    pub listening_activity: BTreeMap<String, usize>,
    pub top_tracks_by_month: PeriodTable,
    pub top_tracks_by_year: PeriodTable,
    pub top_artists_by_month: PeriodTable,
    pub top_artists_by_year: PeriodTable,
    pub monthly_streaming_minutes: BTreeMap<String, f64>,
    pub average_daily_streaming_minutes: BTreeMap<String, f64>,
}

/// Compose the report from the outputs of every stage
pub fn assemble(
    top_tracks: Vec<TrackSummary>,
    top_artists: Vec<ArtistSummary>,
    recommendations: Recommendations,
    listening_activity: BTreeMap<String, usize>,
    periods: PeriodTables,
    minutes: ListeningMinutes,
) -> AnalysisReport {
    let sentiment_scores: Vec<f64> = top_tracks.iter().map(|t| t.sentiment).collect();

    AnalysisReport {
        sentiment: SentimentLabel::from_scores(&sentiment_scores),
        sentiment_scores,
        top_tracks,
        top_artists,
        recommendations: recommendations.artists,
        recommended_songs: recommendations.songs,
        recommended_albums: recommendations.albums,
        genre_distribution: recommendations.genres,
        listening_activity,
        top_tracks_by_month: periods.tracks_by_month,
        top_tracks_by_year: periods.tracks_by_year,
        top_artists_by_month: periods.artists_by_month,
        top_artists_by_year: periods.artists_by_year,
        monthly_streaming_minutes: minutes.monthly,
        average_daily_streaming_minutes: minutes.average_daily,
    }
}
