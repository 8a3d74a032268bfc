use crate::error::AnalysisError;
use crate::models::{RawRecord, StreamingEvent};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{info, warn};

/// Decode a streaming history document into validated events.
///
/// The document must be a JSON array of objects. It is rejected as a whole
/// when the `trackName` or `artistName` key appears on no record at all;
/// individual records that lack either name are skipped. Optional fields with
/// an unexpected type are dropped from that record only.
pub fn parse_history(json: &str) -> Result<Vec<StreamingEvent>, AnalysisError> {
    let records: Vec<RawRecord> =
        serde_json::from_str(json).map_err(|e| AnalysisError::InvalidFormat(e.to_string()))?;
    normalize_records(records)
}

pub fn normalize_records(records: Vec<RawRecord>) -> Result<Vec<StreamingEvent>, AnalysisError> {
    if !records.iter().any(|r| r.track_name.is_some()) {
        return Err(AnalysisError::InvalidFormat(
            "no record has a trackName field".to_string(),
        ));
    }
    if !records.iter().any(|r| r.artist_name.is_some()) {
        return Err(AnalysisError::InvalidFormat(
            "no record has an artistName field".to_string(),
        ));
    }

    let total = records.len();
    let mut skipped = 0;
    let mut bad_timestamps = 0;
    let mut bad_durations = 0;
    let mut bad_albums = 0;
    let mut events = Vec::with_capacity(total);

    for record in records {
        let (Some(track_name), Some(artist_name)) =
            (text(record.track_name.as_ref()), text(record.artist_name.as_ref()))
        else {
            skipped += 1;
            continue;
        };

        let end_time = record.end_time.as_ref().and_then(|raw| {
            let parsed = raw.as_str().and_then(parse_end_time);
            if parsed.is_none() && !raw.is_null() {
                bad_timestamps += 1;
            }
            parsed
        });

        let ms_played = record.ms_played.as_ref().and_then(|raw| {
            let parsed = duration_ms(raw);
            if parsed.is_none() && !raw.is_null() {
                bad_durations += 1;
            }
            parsed
        });

        let album_name = record.album_name.as_ref().and_then(|raw| {
            let parsed = text(Some(raw));
            if parsed.is_none() && !matches!(raw, Value::Null | Value::String(_)) {
                bad_albums += 1;
            }
            parsed
        });

        events.push(StreamingEvent {
            track_name,
            artist_name,
            album_name,
            end_time,
            ms_played,
        });
    }

    if skipped > 0 {
        warn!("Skipped {skipped} records without a track or artist name");
    }
    if bad_timestamps > 0 {
        warn!(
            "{bad_timestamps} records have an unreadable endTime; excluded from time features"
        );
    }
    if bad_durations > 0 {
        warn!(
            "{bad_durations} records have an unreadable msPlayed; excluded from duration features"
        );
    }
    if bad_albums > 0 {
        warn!(
            "{bad_albums} records have an unreadable albumName; excluded from album rankings"
        );
    }
    info!("Normalized {} of {} records", events.len(), total);

    Ok(events)
}

/// Non-blank text from a string or number value
fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// Non-negative milliseconds. Whole floats such as `60000.0` are accepted.
fn duration_ms(value: &Value) -> Option<u64> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    value
        .as_f64()
        .filter(|ms| ms.is_finite() && *ms >= 0.0 && *ms <= u64::MAX as f64)
        .map(|ms| ms.round() as u64)
}

/// Parse an `endTime` value. Offsets are kept as the listener's local time.
pub fn parse_end_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    // Spotify account exports use "2023-01-05 13:45"
    const FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
