//! Precomputed threshold-exceedance records and the threshold grid they
//! were computed on.
//!
//! The upstream pipeline evaluates every storm against every country on a
//! fixed grid of (wind speed, distance) pairs. Only those exact pairs can be
//! queried; there is no interpolation between grid points.

use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Rejections raised when a caller asks for thresholds the grid does not hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("threshold pair ({speed} kt, {distance} km) is not on the precomputed grid")]
    OffGrid { speed: i32, distance: i32 },
}

/// One storm/country/threshold-pair outcome from the upstream pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRecord {
    pub sid: String,
    pub country_id: i32,
    /// Wind speed threshold in knots.
    pub speed: i32,
    /// Distance threshold in kilometres.
    pub distance: i32,
    /// Whether the storm was within `distance` while at or above `speed`.
    pub exceeded: bool,
}

#[derive(Debug, Deserialize)]
struct ThresholdRow {
    sid: String,
    adm0_code: i32,
    speed_thresh: i32,
    distance_thresh: i32,
    #[serde(default = "default_triggered", deserialize_with = "deserialize_flag")]
    triggered: bool,
}

// Upstream files that omit the column list only the exceeding rows.
fn default_triggered() -> bool {
    true
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "t" | "yes" => Ok(true),
        "false" | "0" | "f" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean '{}'",
            other
        ))),
    }
}

impl ThresholdRecord {
    /// Parse a threshold CSV with headers
    /// `sid,adm0_code,speed_thresh,distance_thresh,triggered`.
    ///
    /// The `triggered` column is optional and defaults to `true`.
    pub fn parse_csv(csv_data: &str) -> anyhow::Result<Vec<ThresholdRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut records = Vec::new();
        for (i, result) in rdr.deserialize::<ThresholdRow>().enumerate() {
            let row = result.with_context(|| format!("malformed threshold row at line {}", i + 2))?;
            if row.sid.is_empty() {
                anyhow::bail!("threshold row at line {} is missing a storm identifier", i + 2);
            }
            records.push(ThresholdRecord {
                sid: row.sid,
                country_id: row.adm0_code,
                speed: row.speed_thresh,
                distance: row.distance_thresh,
                exceeded: row.triggered,
            });
        }
        Ok(records)
    }

    /// True when this row records an exceedance for exactly `(speed, distance)`.
    pub fn triggers(&self, speed: i32, distance: i32) -> bool {
        self.exceeded && self.speed == speed && self.distance == distance
    }
}

/// The discrete set of speed and distance thresholds available for querying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdGrid {
    speeds: Vec<i32>,
    distances: Vec<i32>,
}

impl Default for ThresholdGrid {
    /// 0-185 kt in 5 kt steps, 0-500 km in 50 km steps.
    fn default() -> Self {
        ThresholdGrid::stepped((0, 185, 5), (0, 500, 50))
    }
}

impl ThresholdGrid {
    pub fn new(mut speeds: Vec<i32>, mut distances: Vec<i32>) -> Self {
        speeds.sort_unstable();
        speeds.dedup();
        distances.sort_unstable();
        distances.dedup();
        ThresholdGrid { speeds, distances }
    }

    /// Build a regular grid from `(min, max, step)` triples for speed and distance.
    pub fn stepped(speed: (i32, i32, i32), distance: (i32, i32, i32)) -> Self {
        let range = |(min, max, step): (i32, i32, i32)| -> Vec<i32> {
            let step = step.max(1) as usize;
            (min..=max).step_by(step).collect()
        };
        ThresholdGrid::new(range(speed), range(distance))
    }

    pub fn speeds(&self) -> &[i32] {
        &self.speeds
    }

    pub fn distances(&self) -> &[i32] {
        &self.distances
    }

    pub fn contains(&self, speed: i32, distance: i32) -> bool {
        self.speeds.binary_search(&speed).is_ok() && self.distances.binary_search(&distance).is_ok()
    }

    /// Reject a threshold pair that is not on the grid.
    pub fn validate(&self, speed: i32, distance: i32) -> Result<(), ThresholdError> {
        if self.contains(speed, distance) {
            Ok(())
        } else {
            Err(ThresholdError::OffGrid { speed, distance })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_threshold_rows() {
        let csv = "\
sid,adm0_code,speed_thresh,distance_thresh,triggered
2016041S14170,83,100,250,True
2016041S14170,83,150,0,false
2020092S09155,262,50,100,1
";
        let records = ThresholdRecord::parse_csv(csv).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].country_id, 83);
        assert!(records[0].exceeded);
        assert!(!records[1].exceeded);
        assert!(records[2].exceeded);
    }

    #[test]
    fn triggered_column_is_optional() {
        let csv = "sid,adm0_code,speed_thresh,distance_thresh\nA,83,100,250\n";
        let records = ThresholdRecord::parse_csv(csv).unwrap();
        assert!(records[0].exceeded);
    }

    #[test]
    fn rejects_garbage_flag() {
        let csv = "sid,adm0_code,speed_thresh,distance_thresh,triggered\nA,83,100,250,maybe\n";
        assert!(ThresholdRecord::parse_csv(csv).is_err());
    }

    #[test]
    fn triggers_requires_both_dimensions() {
        let r = ThresholdRecord {
            sid: "A".into(),
            country_id: 83,
            speed: 100,
            distance: 250,
            exceeded: true,
        };
        assert!(r.triggers(100, 250));
        assert!(!r.triggers(100, 200));
        assert!(!r.triggers(90, 250));

        let not_exceeded = ThresholdRecord { exceeded: false, ..r };
        assert!(!not_exceeded.triggers(100, 250));
    }

    #[test]
    fn default_grid_bounds() {
        let grid = ThresholdGrid::default();
        assert_eq!(grid.speeds().first(), Some(&0));
        assert_eq!(grid.speeds().last(), Some(&185));
        assert_eq!(grid.distances().len(), 11);
        assert!(grid.contains(100, 250));
        assert!(grid.contains(185, 0));
        assert!(!grid.contains(101, 250));
        assert!(!grid.contains(100, 260));
    }

    #[test]
    fn validate_reports_off_grid_pair() {
        let grid = ThresholdGrid::new(vec![50, 100], vec![100, 250]);
        assert!(grid.validate(100, 250).is_ok());
        assert_eq!(
            grid.validate(75, 250),
            Err(ThresholdError::OffGrid {
                speed: 75,
                distance: 250
            })
        );
    }
}
