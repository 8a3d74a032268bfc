use crate::models::{CountedEntity, StreamingEvent};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Event attribute that gets counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Track,
    Artist,
    Album,
}

impl Field {
    fn value(self, event: &StreamingEvent) -> Option<&str> {
        match self {
            Field::Track => Some(&event.track_name),
            Field::Artist => Some(&event.artist_name),
            Field::Album => event.album_name.as_deref(),
        }
    }
}

/// Partition dimension used before counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Global,
    Month,
    Year,
}

/// Partition an event belongs to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AggregationKey {
    Global,
    Month(String),
    Year(String),
}

impl AggregationKey {
    /// Key of `event` under `grouping`; events without a timestamp have no
    /// month or year key
    pub fn of(event: &StreamingEvent, grouping: Grouping) -> Option<Self> {
        match grouping {
            Grouping::Global => Some(AggregationKey::Global),
            Grouping::Month => event.month().map(AggregationKey::Month),
            Grouping::Year => event.year().map(AggregationKey::Year),
        }
    }

    /// Period label used in the report
    pub fn label(&self) -> &str {
        match self {
            AggregationKey::Global => "all",
            AggregationKey::Month(month) => month,
            AggregationKey::Year(year) => year,
        }
    }
}

/// Occurrence counter that remembers first-seen order
#[derive(Debug, Default)]
struct Tally<'a> {
    index: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, name: &'a str) {
        match self.index.get(name) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(name, self.counts.len());
                self.counts.push((name, 1));
            }
        }
    }

    /// `n` most frequent names; the sort is stable so ties keep first-seen order
    fn most_common(mut self, n: usize) -> Vec<CountedEntity> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(n)
            .map(|(name, count)| CountedEntity {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}

/// Count `field` within each partition of `grouping` and keep the `n` most
/// frequent entries per partition
pub fn top_n(
    events: &[StreamingEvent],
    field: Field,
    grouping: Grouping,
    n: usize,
) -> BTreeMap<AggregationKey, Vec<CountedEntity>> {
    let mut partitions: BTreeMap<AggregationKey, Tally> = BTreeMap::new();

    for event in events {
        let (Some(key), Some(value)) = (AggregationKey::of(event, grouping), field.value(event))
        else {
            continue;
        };
        partitions.entry(key).or_default().add(value);
    }

    partitions
        .into_iter()
        .map(|(key, tally)| (key, tally.most_common(n)))
        .collect()
}

/// Top `n` over the whole history
pub fn top_n_global(events: &[StreamingEvent], field: Field, n: usize) -> Vec<CountedEntity> {
    top_n(events, field, Grouping::Global, n)
        .remove(&AggregationKey::Global)
        .unwrap_or_default()
}

/// Top `n` per period, keyed by the period label
pub fn top_n_by_period(
    events: &[StreamingEvent],
    field: Field,
    grouping: Grouping,
    n: usize,
) -> BTreeMap<String, Vec<CountedEntity>> {
    top_n(events, field, grouping, n)
        .into_iter()
        .map(|(key, ranked)| (key.label().to_string(), ranked))
        .collect()
}

/// Number of timestamped events per month
pub fn listening_activity(events: &[StreamingEvent]) -> BTreeMap<String, usize> {
    let mut activity = BTreeMap::new();
    for month in events.iter().filter_map(StreamingEvent::month) {
        *activity.entry(month).or_insert(0) += 1;
    }
    activity
}

/// Artist of the first event that played `track`
pub fn first_artist_for_track<'a>(events: &'a [StreamingEvent], track: &str) -> Option<&'a str> {
    events
        .iter()
        .find(|e| e.track_name == track)
        .map(|e| e.artist_name.as_str())
}

/// Every distinct value of `field` in the history
pub fn distinct_names(events: &[StreamingEvent], field: Field) -> HashSet<String> {
    events
        .iter()
        .filter_map(|e| field.value(e))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize::parse_end_time;

    fn event(track: &str, artist: &str, end_time: Option<&str>) -> StreamingEvent {
        StreamingEvent {
            end_time: end_time.and_then(parse_end_time),
            ..StreamingEvent::new(track, artist)
        }
    }

    #[test]
    fn test_top_n_sorted_with_stable_ties() {
        let events = vec![
            event("B", "X", None),
            event("A", "X", None),
            event("C", "Y", None),
            event("A", "X", None),
            event("C", "Y", None),
            event("D", "Z", None),
        ];
        let ranked = top_n_global(&events, Field::Track, 3);
        let names: Vec<_> = ranked.iter().map(|e| (e.name.as_str(), e.count)).collect();

        // A and C tie on 2; A was seen first. B beats D on first-seen order.
        assert_eq!(names, vec![("A", 2), ("C", 2), ("B", 1)]);
    }

    #[test]
    fn test_top_n_empty_input() {
        assert!(top_n(&[], Field::Artist, Grouping::Month, 5).is_empty());
        assert!(top_n_global(&[], Field::Artist, 5).is_empty());
    }

    #[test]
    fn test_top_n_by_month_and_year() {
        let events = vec![
            event("A", "X", Some("2022-12-31 23:00")),
            event("A", "X", Some("2023-01-01 10:00")),
            event("B", "Y", Some("2023-01-02 10:00")),
            event("B", "Y", Some("2023-01-03 10:00")),
            event("C", "Z", None),
        ];

        let by_month = top_n_by_period(&events, Field::Track, Grouping::Month, 5);
        assert_eq!(by_month.keys().collect::<Vec<_>>(), vec!["2022-12", "2023-01"]);
        assert_eq!(by_month["2023-01"][0].name, "B");
        assert_eq!(by_month["2023-01"][0].count, 2);

        let by_year = top_n_by_period(&events, Field::Artist, Grouping::Year, 1);
        assert_eq!(by_year["2023"].len(), 1);
        assert_eq!(by_year["2023"][0].name, "Y");
        assert_eq!(by_year["2022"][0].name, "X");
    }

    #[test]
    fn test_album_field_skips_missing_albums() {
        let mut with_album = event("A", "X", None);
        with_album.album_name = Some("Alb".to_string());
        let events = vec![with_album, event("B", "X", None)];

        let ranked = top_n_global(&events, Field::Album, 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(distinct_names(&events, Field::Album).len(), 1);
    }

    #[test]
    fn test_listening_activity_counts_timestamped_events() {
        let events = vec![
            event("A", "X", Some("2023-01-01 10:00")),
            event("A", "X", Some("2023-01-09 10:00")),
            event("A", "X", Some("2023-02-01 10:00")),
            event("A", "X", None),
        ];
        let activity = listening_activity(&events);
        assert_eq!(activity["2023-01"], 2);
        assert_eq!(activity["2023-02"], 1);
        assert_eq!(activity.len(), 2);
    }

    #[test]
    fn test_first_artist_for_track() {
        let events = vec![event("A", "X", None), event("A", "Y", None)];
        assert_eq!(first_artist_for_track(&events, "A"), Some("X"));
        assert_eq!(first_artist_for_track(&events, "Z"), None);
    }
}
