use crate::models::StreamingEvent;
use chrono::NaiveDate;
use std::collections::BTreeMap;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Listening time per month
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListeningMinutes {
    /// Total minutes per `YYYY-MM`
    pub monthly: BTreeMap<String, f64>,
    /// Mean of the daily totals over the days that have activity in the month
    pub average_daily: BTreeMap<String, f64>,
}

/// Only events carrying both a timestamp and a play duration contribute
pub fn listening_minutes(events: &[StreamingEvent]) -> ListeningMinutes {
    let mut daily: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for event in events {
        let (Some(end_time), Some(ms)) = (event.end_time, event.ms_played) else {
            continue;
        };
        let month = end_time.format("%Y-%m").to_string();
        *daily
            .entry(month)
            .or_default()
            .entry(end_time.date())
            .or_insert(0.0) += ms as f64 / MS_PER_MINUTE;
    }

    let mut minutes = ListeningMinutes::default();
    for (month, days) in daily {
        let total: f64 = days.values().sum();
        minutes.average_daily.insert(month.clone(), total / days.len() as f64);
        minutes.monthly.insert(month, total);
    }
    minutes
}
