use anyhow::Context;
use chrono::{Datelike, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

/// Canonical timestamp format used for storage and serialization.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp formats accepted in the `time` column of a track CSV.
const ACCEPTED_TIME_FORMATS: [&str; 3] = [TIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A single observation of a storm.
///
/// All rows sharing a `sid` belong to the same physical storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormTrack {
    /// IBTrACS storm identifier, stable for the storm's lifetime.
    pub sid: String,
    pub time: NaiveDateTime,
    pub lat: f64,
    pub lon: f64,
    /// Maximum sustained wind in knots as reported by the WMO agency.
    pub wind: Option<f64>,
    /// Raw storm name, usually upper case (e.g. "WINSTON").
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct StormTrackRow {
    sid: String,
    time: String,
    lat: f64,
    lon: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    wmo_wind: Option<f64>,
    #[serde(default)]
    name: String,
}

impl TryFrom<StormTrackRow> for StormTrack {
    type Error = anyhow::Error;

    fn try_from(row: StormTrackRow) -> Result<Self, Self::Error> {
        if row.sid.is_empty() {
            anyhow::bail!("track row is missing a storm identifier");
        }
        Ok(StormTrack {
            time: parse_time(&row.time)?,
            sid: row.sid,
            lat: row.lat,
            lon: row.lon,
            wind: row.wmo_wind.filter(|w| w.is_finite()),
            name: row.name,
        })
    }
}

impl StormTrack {
    /// Calendar year of this observation.
    pub fn year(&self) -> i32 {
        self.time.year()
    }

    /// Parse a track CSV with headers `sid,time,lat,lon,wmo_wind,name`.
    ///
    /// `wmo_wind` may be blank or non-numeric, in which case the wind is
    /// recorded as missing. Any other malformed row fails the whole parse.
    pub fn parse_csv(csv_data: &str) -> anyhow::Result<Vec<StormTrack>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut tracks = Vec::new();
        for (i, result) in rdr.deserialize::<StormTrackRow>().enumerate() {
            // +2: one for the header, one for 1-based line numbers
            let row = result.with_context(|| format!("malformed track row at line {}", i + 2))?;
            let track = StormTrack::try_from(row)
                .with_context(|| format!("invalid track row at line {}", i + 2))?;
            tracks.push(track);
        }
        Ok(tracks)
    }
}

/// Parse a track timestamp in any of the accepted formats.
pub fn parse_time(s: &str) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();
    ACCEPTED_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .with_context(|| format!("unrecognised timestamp '{}'", s))
}

/// Format a timestamp in the canonical storage format.
pub fn format_time(time: &NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKS_CSV: &str = "\
sid,time,lat,lon,wmo_wind,name
2016041S14170,2016-02-10 18:00:00,-14.1,170.3,30,WINSTON
2016041S14170,2016-02-20 06:00:00,-17.4,179.1,155,WINSTON
2020092S09155,2020-04-01T12:00:00,-9.5,155.2,,HAROLD
";

    #[test]
    fn parses_tracks_with_missing_wind() {
        let tracks = StormTrack::parse_csv(TRACKS_CSV).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].sid, "2016041S14170");
        assert_eq!(tracks[1].wind, Some(155.0));
        assert_eq!(tracks[2].wind, None);
        assert_eq!(tracks[2].year(), 2020);
    }

    #[test]
    fn non_numeric_wind_is_missing() {
        let csv = "sid,time,lat,lon,wmo_wind,name\nA,2001-01-01 00:00:00,1.0,2.0,NaN,X\nB,2001-01-01 00:00:00,1.0,2.0, ,Y\n";
        let tracks = StormTrack::parse_csv(csv).unwrap();
        assert_eq!(tracks[0].wind, None);
        assert_eq!(tracks[1].wind, None);
    }

    #[test]
    fn rejects_bad_timestamp() {
        let csv = "sid,time,lat,lon,wmo_wind,name\nA,yesterday,1.0,2.0,30,X\n";
        let err = StormTrack::parse_csv(csv).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn rejects_missing_sid() {
        let csv = "sid,time,lat,lon,wmo_wind,name\n,2001-01-01 00:00:00,1.0,2.0,30,X\n";
        assert!(StormTrack::parse_csv(csv).is_err());
    }

    #[test]
    fn time_round_trips_through_storage_format() {
        let t = parse_time("1997-03-04 06:00").unwrap();
        assert_eq!(format_time(&t), "1997-03-04 06:00:00");
        assert_eq!(parse_time(&format_time(&t)).unwrap(), t);
    }
}
