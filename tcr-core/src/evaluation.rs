//! Per-query trigger evaluation types.
//!
//! An [`Evaluation`] is built fresh for every (country, speed, distance,
//! start year) query and never mutated. Either the query matched no records
//! at all ([`Evaluation::NoData`]), or it carries the year-filtered records
//! for the country, each flagged for the exact threshold pair requested.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The four scalar inputs supplied by the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerQuery {
    pub country_id: i32,
    /// Wind speed threshold in knots.
    pub speed: i32,
    /// Distance threshold in kilometres.
    pub distance: i32,
    pub start_year: i32,
}

/// One threshold record for the queried country, enriched with the storm's
/// index entry and flagged for the queried threshold pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedRecord {
    pub sid: String,
    pub name: String,
    pub year: i32,
    pub label: String,
    pub speed: i32,
    pub distance: i32,
    pub triggered: bool,
}

/// Inclusive range of years observed in an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub first: i32,
    pub last: i32,
}

impl YearSpan {
    /// Number of calendar years covered, counting both ends.
    pub fn years(&self) -> i32 {
        self.last - self.first + 1
    }
}

/// A storm that triggered for the queried threshold pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredStorm {
    pub sid: String,
    pub name: String,
    pub year: i32,
    pub label: String,
}

/// Non-empty set of evaluated records, most recent year first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvaluation {
    pub query: TriggerQuery,
    records: Vec<EvaluatedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evaluation {
    /// Unknown country, or no records on or after the start year.
    NoData { query: TriggerQuery },
    Records(TriggerEvaluation),
}

impl Evaluation {
    /// Wrap evaluated records, falling back to [`Evaluation::NoData`] when empty.
    ///
    /// Records are expected in display order (most recent year first).
    pub fn from_records(query: TriggerQuery, records: Vec<EvaluatedRecord>) -> Self {
        if records.is_empty() {
            Evaluation::NoData { query }
        } else {
            Evaluation::Records(TriggerEvaluation { query, records })
        }
    }

    pub fn query(&self) -> &TriggerQuery {
        match self {
            Evaluation::NoData { query } => query,
            Evaluation::Records(evaluation) => &evaluation.query,
        }
    }

    pub fn records(&self) -> &[EvaluatedRecord] {
        match self {
            Evaluation::NoData { .. } => &[],
            Evaluation::Records(evaluation) => evaluation.records(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Evaluation::NoData { .. })
    }

    pub fn triggered_storms(&self) -> Vec<TriggeredStorm> {
        match self {
            Evaluation::NoData { .. } => Vec::new(),
            Evaluation::Records(evaluation) => evaluation.triggered_storms(),
        }
    }
}

impl TriggerEvaluation {
    pub fn records(&self) -> &[EvaluatedRecord] {
        &self.records
    }

    /// Years spanned by the country's records in the window, regardless of
    /// threshold outcome.
    pub fn year_span(&self) -> Option<YearSpan> {
        let first = self.records.iter().map(|r| r.year).min()?;
        let last = self.records.iter().map(|r| r.year).max()?;
        Some(YearSpan { first, last })
    }

    /// One flag per storm: true if any of its records triggered.
    pub fn storm_flags(&self) -> BTreeMap<&str, bool> {
        let mut flags: BTreeMap<&str, bool> = BTreeMap::new();
        for record in &self.records {
            let flag = flags.entry(record.sid.as_str()).or_insert(false);
            *flag |= record.triggered;
        }
        flags
    }

    /// Distinct triggered storms, in record order (most recent year first).
    pub fn triggered_storms(&self) -> Vec<TriggeredStorm> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.triggered && seen.insert(r.sid.as_str()))
            .map(|r| TriggeredStorm {
                sid: r.sid.clone(),
                name: r.name.clone(),
                year: r.year,
                label: r.label.clone(),
            })
            .collect()
    }

    pub fn triggered_count(&self) -> usize {
        self.storm_flags().values().filter(|&&t| t).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> TriggerQuery {
        TriggerQuery {
            country_id: 83,
            speed: 100,
            distance: 250,
            start_year: 1980,
        }
    }

    fn record(sid: &str, year: i32, triggered: bool) -> EvaluatedRecord {
        EvaluatedRecord {
            sid: sid.to_string(),
            name: format!("Storm{}", sid),
            year,
            label: format!("Storm{} {}", sid, year),
            speed: 100,
            distance: if triggered { 250 } else { 300 },
            triggered,
        }
    }

    #[test]
    fn empty_records_become_no_data() {
        let evaluation = Evaluation::from_records(query(), Vec::new());
        assert!(evaluation.is_empty());
        assert!(evaluation.records().is_empty());
        assert!(evaluation.triggered_storms().is_empty());
        assert_eq!(evaluation.query().country_id, 83);
    }

    #[test]
    fn year_span_covers_all_records() {
        let records = vec![record("C", 2022, false), record("B", 2001, true), record("A", 1980, false)];
        let Evaluation::Records(evaluation) = Evaluation::from_records(query(), records) else {
            panic!("expected records");
        };
        let span = evaluation.year_span().unwrap();
        assert_eq!(span, YearSpan { first: 1980, last: 2022 });
        assert_eq!(span.years(), 43);
    }

    #[test]
    fn single_year_span_is_one_year() {
        let span = YearSpan { first: 2016, last: 2016 };
        assert_eq!(span.years(), 1);
    }

    #[test]
    fn storm_flags_collapse_with_or() {
        let records = vec![record("A", 2016, false), record("A", 2016, true), record("B", 2010, false)];
        let Evaluation::Records(evaluation) = Evaluation::from_records(query(), records) else {
            panic!("expected records");
        };
        let flags = evaluation.storm_flags();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags["A"], true);
        assert_eq!(flags["B"], false);
        assert_eq!(evaluation.triggered_count(), 1);
    }

    #[test]
    fn triggered_storms_are_distinct_and_ordered() {
        let records = vec![
            record("C", 2020, true),
            record("C", 2020, true),
            record("B", 2010, false),
            record("A", 2005, true),
        ];
        let evaluation = Evaluation::from_records(query(), records);
        let storms = evaluation.triggered_storms();
        let sids: Vec<&str> = storms.iter().map(|s| s.sid.as_str()).collect();
        assert_eq!(sids, vec!["C", "A"]);
        assert_eq!(storms[0].label, "StormC 2020");
    }
}
