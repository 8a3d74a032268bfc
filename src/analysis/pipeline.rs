use super::aggregate::{
    Field, Grouping, distinct_names, first_artist_for_track, listening_activity, top_n_by_period,
    top_n_global,
};
use super::duration::listening_minutes;
use super::enrich::{ArtistResolver, enrich_artist, enrich_track};
use super::lyrics::resolve_lyrics;
use super::normalize::parse_history;
use super::recommend::{UserHistory, build_recommendations};
use super::report::{AnalysisReport, ArtistSummary, PeriodTables, TrackSummary, assemble};
use super::sentiment::{SentimentScorer, score_lyrics};
use super::workers::{build_pool, fan_out};
use crate::client::{CatalogService, LyricsProvider};
use crate::error::AnalysisError;
use crate::models::{CountedEntity, StreamingEvent};
use tracing::info;

/// External services a run talks to. The caller owns them and may reuse
/// them across runs.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub catalog: &'a dyn CatalogService,
    pub lyrics: &'a dyn LyricsProvider,
    pub sentiment: &'a dyn SentimentScorer,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Length of every ranked list (global and per period)
    pub top_n: usize,
    /// Maximum entries per recommendation list
    pub recommendation_cap: usize,
    /// Upper bound on concurrent collaborator calls
    pub max_concurrency: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            recommendation_cap: 6,
            max_concurrency: 4,
        }
    }
}

/// Runs the full analysis over one history file.
///
/// Holds no state between runs: the worker pool and the artist lookup cache
/// are created inside each run and dropped with it.
pub struct Analyzer<'a> {
    collaborators: Collaborators<'a>,
    settings: AnalysisSettings,
}

impl<'a> Analyzer<'a> {
    pub fn new(collaborators: Collaborators<'a>, settings: AnalysisSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    /// Decode a raw history document and analyze it
    pub fn analyze_json(&self, json: &str) -> Result<AnalysisReport, AnalysisError> {
        let events = parse_history(json)?;
        self.analyze(&events)
    }

    pub fn analyze(&self, events: &[StreamingEvent]) -> Result<AnalysisReport, AnalysisError> {
        let n = self.settings.top_n;
        let pool = build_pool(self.settings.max_concurrency)?;
        info!(
            "Analyzing {} events with {} workers",
            events.len(),
            pool.current_num_threads()
        );

        let ranked_tracks: Vec<(CountedEntity, String)> = top_n_global(events, Field::Track, n)
            .into_iter()
            .map(|track| {
                let artist = first_artist_for_track(events, &track.name)
                    .unwrap_or_default()
                    .to_string();
                (track, artist)
            })
            .collect();
        let ranked_artists = top_n_global(events, Field::Artist, n);

        let top_tracks = fan_out(&pool, &ranked_tracks, |(track, artist)| {
            self.summarize_track(track, artist)
        });

        let resolver = ArtistResolver::new(self.collaborators.catalog);
        let top_artists = fan_out(&pool, &ranked_artists, |artist| {
            ArtistSummary::new(artist, enrich_artist(&resolver, &artist.name))
        });

        let seeds: Vec<String> = ranked_artists.iter().map(|a| a.name.clone()).collect();
        let history = UserHistory {
            top_artists: seeds.iter().cloned().collect(),
            tracks: distinct_names(events, Field::Track),
            albums: distinct_names(events, Field::Album),
        };
        let recommendations = build_recommendations(
            &resolver,
            &pool,
            &seeds,
            &history,
            self.settings.recommendation_cap,
        );

        let periods = PeriodTables {
            tracks_by_month: top_n_by_period(events, Field::Track, Grouping::Month, n),
            tracks_by_year: top_n_by_period(events, Field::Track, Grouping::Year, n),
            artists_by_month: top_n_by_period(events, Field::Artist, Grouping::Month, n),
            artists_by_year: top_n_by_period(events, Field::Artist, Grouping::Year, n),
        };

        let report = assemble(
            top_tracks,
            top_artists,
            recommendations,
            listening_activity(events),
            periods,
            listening_minutes(events),
        );
        info!("Report assembled, overall sentiment: {:?}", report.sentiment);
        Ok(report)
    }

    fn summarize_track(&self, track: &CountedEntity, artist: &str) -> TrackSummary {
        let metadata = enrich_track(self.collaborators.catalog, &track.name, artist);

        let lyrics = resolve_lyrics(self.collaborators.lyrics, &track.name, artist);
        let sentiment = score_lyrics(self.collaborators.sentiment, lyrics.as_deref());
        match lyrics {
            Some(_) => info!("Sentiment for '{}' by '{}': {sentiment:.3}", track.name, artist),
            None => info!("No lyrics for '{}' by '{}', sentiment set to 0", track.name, artist),
        }

        TrackSummary::new(track, artist, metadata, sentiment)
    }
}
