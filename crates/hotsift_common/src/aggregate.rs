//! Frequency aggregation of log matches.
//!
//! Folds matches into `tag -> time bucket -> count`. Counters only go up.
//! An aggregator that saw nothing yields `None`, never an empty map, so a
//! report can leave the section out.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::search::{LogMatch, SearchExpression};

/// Size of the time buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day: `YYYY-MM-DD`
    #[default]
    Date,
    /// One bucket per minute: `YYYY-MM-DD_HH:MM`
    Minute,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Date => "date",
            Granularity::Minute => "minute",
        }
    }

    /// Bucket key for a match
    pub fn key(&self, date: &str, time: Option<&str>) -> String {
        match (self, time) {
            (Granularity::Minute, Some(t)) => {
                let hh_mm = t.get(..5).unwrap_or(t);
                format!("{}_{}", date, hh_mm)
            }
            _ => date.to_string(),
        }
    }
}

/// Sorted occurrence histogram per tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregate(BTreeMap<String, BTreeMap<String, u64>>);

impl Aggregate {
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, tag: &str) -> Option<&BTreeMap<String, u64>> {
        self.0.get(tag)
    }

    /// Sum of all buckets of a tag
    pub fn total(&self, tag: &str) -> u64 {
        self.0.get(tag).map(|b| b.values().sum()).unwrap_or(0)
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, u64>> {
        self.0
    }
}

/// Per-run aggregation state
#[derive(Debug, Default)]
pub struct FrequencyAggregator {
    granularity: Granularity,
    counts: HashMap<String, HashMap<String, u64>>,
}

impl FrequencyAggregator {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            counts: HashMap::new(),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn fold(&mut self, m: &LogMatch) {
        let key = self.granularity.key(&m.date, m.time.as_deref());
        *self
            .counts
            .entry(m.tag.clone())
            .or_default()
            .entry(key)
            .or_insert(0) += 1;
    }

    pub fn fold_all<'a, I>(&mut self, matches: I)
    where
        I: IntoIterator<Item = &'a LogMatch>,
    {
        for m in matches {
            self.fold(m);
        }
    }

    /// Sorted view of the counts so far; `None` if nothing was folded.
    /// Does not consume or reset the counters.
    pub fn summary(&self) -> Option<Aggregate> {
        if self.counts.is_empty() {
            return None;
        }

        let sorted = self
            .counts
            .iter()
            .map(|(tag, buckets)| {
                let buckets: BTreeMap<String, u64> =
                    buckets.iter().map(|(k, v)| (k.clone(), *v)).collect();
                (tag.clone(), buckets)
            })
            .collect();

        Some(Aggregate(sorted))
    }

    pub fn finish(self) -> Option<Aggregate> {
        self.summary()
    }
}

/// Scan lines with one expression and aggregate whatever matched
pub fn aggregate_lines<I, S>(
    expr: &SearchExpression,
    lines: I,
    granularity: Granularity,
) -> Option<Aggregate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut aggregator = FrequencyAggregator::new(granularity);
    let mut matched = 0usize;
    let mut skipped = 0usize;

    for line in lines {
        match expr.match_line(line.as_ref()) {
            Some(m) => {
                aggregator.fold(&m);
                matched += 1;
            }
            None => skipped += 1,
        }
    }

    debug!(
        "{}: {} lines matched, {} skipped ({} buckets)",
        expr.name(),
        matched,
        skipped,
        granularity.as_str()
    );

    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(tag: &str, date: &str, time: Option<&str>) -> LogMatch {
        LogMatch {
            tag: tag.to_string(),
            date: date.to_string(),
            time: time.map(str::to_string),
            value: "GET".to_string(),
        }
    }

    #[test]
    fn test_empty_is_none() {
        let agg = FrequencyAggregator::new(Granularity::Date);
        assert!(agg.summary().is_none());
        assert!(agg.finish().is_none());
    }

    #[test]
    fn test_minute_vs_date_buckets() {
        let matches = [
            m("apache_common", "2023-01-01", Some("10:15:00")),
            m("apache_common", "2023-01-01", Some("10:16:00")),
        ];

        let mut fine = FrequencyAggregator::new(Granularity::Minute);
        fine.fold_all(&matches);
        let fine = fine.finish().unwrap();
        let buckets = fine.get("apache_common").unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.get("2023-01-01_10:15"), Some(&1));
        assert_eq!(buckets.get("2023-01-01_10:16"), Some(&1));

        let mut coarse = FrequencyAggregator::new(Granularity::Date);
        coarse.fold_all(&matches);
        let coarse = coarse.finish().unwrap();
        assert_eq!(coarse.get("apache_common").unwrap().get("2023-01-01"), Some(&2));
    }

    #[test]
    fn test_seconds_and_millis_dropped() {
        assert_eq!(
            Granularity::Minute.key("2023-01-01", Some("07:41:09.021")),
            "2023-01-01_07:41"
        );
        assert_eq!(Granularity::Minute.key("2023-01-01", None), "2023-01-01");
        assert_eq!(Granularity::Date.key("2023-01-01", Some("07:41")), "2023-01-01");
    }

    #[test]
    fn test_keys_sorted_and_summary_repeatable() {
        let mut agg = FrequencyAggregator::new(Granularity::Date);
        for date in ["2023-01-03", "2023-01-01", "2023-01-02", "2023-01-01"] {
            agg.fold(&m("Ex", date, None));
        }

        let first = agg.summary().unwrap();
        let second = agg.summary().unwrap();
        assert_eq!(first, second);

        let keys: Vec<&String> = first.get("Ex").unwrap().keys().collect();
        assert_eq!(keys, ["2023-01-01", "2023-01-02", "2023-01-03"]);
        assert_eq!(first.total("Ex"), 4);
        assert_eq!(first.total("missing"), 0);
    }

    #[test]
    fn test_tags_grouped_separately() {
        let mut agg = FrequencyAggregator::new(Granularity::Date);
        agg.fold(&m("b", "2023-01-01", None));
        agg.fold(&m("a", "2023-01-01", None));
        let summary = agg.finish().unwrap();
        let tags: Vec<&str> = summary.tags().collect();
        assert_eq!(tags, ["a", "b"]);
        assert!(summary.get("a").unwrap().values().all(|c| *c > 0));
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut agg = FrequencyAggregator::new(Granularity::Date);
        agg.fold(&m("apache_common", "2023-01-01", None));
        let json = serde_json::to_value(agg.finish().unwrap()).unwrap();
        assert_eq!(json["apache_common"]["2023-01-01"], 1);
    }
}
