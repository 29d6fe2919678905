//! Historical impact records (EM-DAT style) and their trigger status.

use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Losses attributed to one storm in one country.
///
/// `sid` is `None` when the loss event could not be matched to a tracked storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub sid: Option<String>,
    pub country_id: i32,
    pub year: i32,
    /// Event name from the impact source, used to label unmatched events.
    pub event_name: Option<String>,
    /// Total damage in thousands of US dollars.
    pub damage: Option<f64>,
    pub deaths: Option<f64>,
    pub affected: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ImpactRow {
    #[serde(default, deserialize_with = "non_blank")]
    sid: Option<String>,
    adm0_code: i32,
    year: i32,
    #[serde(default, deserialize_with = "non_blank")]
    event_name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_damage: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_deaths: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_affected: Option<f64>,
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan")))
}

impl ImpactRecord {
    /// Parse an impact CSV with headers
    /// `sid,adm0_code,year,event_name,total_damage,total_deaths,total_affected`.
    ///
    /// Blank loss figures are recorded as missing; a blank `sid` marks an
    /// event that was never matched to a track.
    pub fn parse_csv(csv_data: &str) -> anyhow::Result<Vec<ImpactRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut records = Vec::new();
        for (i, result) in rdr.deserialize::<ImpactRow>().enumerate() {
            let row = result.with_context(|| format!("malformed impact row at line {}", i + 2))?;
            records.push(ImpactRecord {
                sid: row.sid,
                country_id: row.adm0_code,
                year: row.year,
                event_name: row.event_name,
                damage: row.total_damage.filter(|v| v.is_finite()),
                deaths: row.total_deaths.filter(|v| v.is_finite()),
                affected: row.total_affected.filter(|v| v.is_finite()),
            });
        }
        Ok(records)
    }
}

/// Which loss figure to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactMetric {
    Deaths,
    Damage,
    Affected,
}

impl ImpactMetric {
    pub const ALL: [ImpactMetric; 3] = [ImpactMetric::Deaths, ImpactMetric::Damage, ImpactMetric::Affected];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactMetric::Deaths => "deaths",
            ImpactMetric::Damage => "damage",
            ImpactMetric::Affected => "affected",
        }
    }

    /// Axis label for charts.
    pub fn label(&self) -> &'static str {
        match self {
            ImpactMetric::Deaths => "Total Deaths",
            ImpactMetric::Damage => "Total Damage ('000 US$)",
            ImpactMetric::Affected => "Total Affected",
        }
    }

    pub fn value(&self, record: &ImpactRecord) -> Option<f64> {
        match self {
            ImpactMetric::Deaths => record.deaths,
            ImpactMetric::Damage => record.damage,
            ImpactMetric::Affected => record.affected,
        }
    }
}

impl fmt::Display for ImpactMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactMetric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deaths" => Ok(ImpactMetric::Deaths),
            "damage" => Ok(ImpactMetric::Damage),
            "affected" => Ok(ImpactMetric::Affected),
            other => anyhow::bail!("unknown impact metric '{}' (expected deaths, damage or affected)", other),
        }
    }
}

/// Trigger status of a storm in the impact view.
///
/// `NoTrackData` is kept distinct from `NotTriggered`: the former means the
/// loss event has no matching track at all, so the thresholds say nothing
/// about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    Triggered,
    NotTriggered,
    NoTrackData,
}

impl TriggerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TriggerStatus::Triggered => "Triggered",
            TriggerStatus::NotTriggered => "Not triggered",
            TriggerStatus::NoTrackData => "No track data",
        }
    }
}

/// An impact record after the left join against the cyclone index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedImpact {
    pub record: ImpactRecord,
    /// "Name Year" label of the matched cyclone, `None` when unmatched.
    pub cyclone_label: Option<String>,
}

impl MatchedImpact {
    pub fn is_matched(&self) -> bool {
        self.record.sid.is_some() && self.cyclone_label.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPACTS_CSV: &str = "\
sid,adm0_code,year,event_name,total_damage,total_deaths,total_affected
2016041S14170,83,2016,Winston,1400000,44,540400
,83,2012,Evan,,,
2020092S09155,262,2020,Harold,,4,nan
";

    #[test]
    fn parses_blank_sid_and_missing_values() {
        let records = ImpactRecord::parse_csv(IMPACTS_CSV).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sid.as_deref(), Some("2016041S14170"));
        assert_eq!(records[0].deaths, Some(44.0));
        assert_eq!(records[1].sid, None);
        assert_eq!(records[1].event_name.as_deref(), Some("Evan"));
        assert_eq!(records[1].damage, None);
        assert_eq!(records[2].damage, None);
        assert_eq!(records[2].deaths, Some(4.0));
        assert_eq!(records[2].affected, None);
    }

    #[test]
    fn metric_selects_field() {
        let records = ImpactRecord::parse_csv(IMPACTS_CSV).unwrap();
        assert_eq!(ImpactMetric::Damage.value(&records[0]), Some(1_400_000.0));
        assert_eq!(ImpactMetric::Affected.value(&records[0]), Some(540_400.0));
        assert_eq!(ImpactMetric::Deaths.value(&records[1]), None);
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("Deaths".parse::<ImpactMetric>().unwrap(), ImpactMetric::Deaths);
        assert_eq!(" damage ".parse::<ImpactMetric>().unwrap(), ImpactMetric::Damage);
        assert!("injuries".parse::<ImpactMetric>().is_err());
        for m in ImpactMetric::ALL {
            assert_eq!(m.as_str().parse::<ImpactMetric>().unwrap(), m);
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TriggerStatus::NoTrackData).unwrap();
        assert_eq!(json, "\"no_track_data\"");
    }
}
