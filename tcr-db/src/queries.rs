//! Typed query methods for retrieving cyclone data from the database.
//!
//! All queries return typed structs from [`crate::models`] or `tcr-core`
//! that can be serialized to JSON for consumption by D3.js chart components.
//!
//! # Trigger Rule
//!
//! A threshold row triggers for a query `(S, D)` only when it records an
//! exceedance for exactly that pair: `exceeded AND speed = S AND distance = D`.
//! Rows for other pairs are still part of the evaluation; they define the
//! years observed for the country.

use crate::models::{CountryDetail, CountryInfo, StormPath, TrackPoint};
use crate::Database;
use rusqlite::{params, OptionalExtension};
use tcr_core::country::CountryExtent;
use tcr_core::evaluation::{EvaluatedRecord, Evaluation, TriggerQuery};
use tcr_core::impact::{ImpactRecord, MatchedImpact};
use tcr_core::threshold::ThresholdGrid;

impl Database {
    // ───────────────────── Country Queries ─────────────────────

    /// List countries that have at least one threshold record, sorted by name.
    pub fn query_countries(&self) -> anyhow::Result<Vec<CountryInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT c.country_id, c.name
             FROM countries c
             WHERE EXISTS (SELECT 1 FROM thresholds t WHERE t.country_id = c.country_id)
             ORDER BY c.name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CountryInfo {
                    country_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[TCR Debug] query: query_countries returned {} records", rows.len());
        Ok(rows)
    }

    /// Look up one country's name, extent and outline.
    pub fn query_country(&self, country_id: i32) -> anyhow::Result<Option<CountryDetail>> {
        let conn = self.conn.borrow();
        let detail = conn
            .query_row(
                "SELECT country_id, name, min_lon, min_lat, max_lon, max_lat,
                        centroid_lon, centroid_lat, crosses_antimeridian, geometry
                 FROM countries WHERE country_id = ?1",
                params![country_id],
                |row| {
                    let bounds: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) =
                        (row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?);
                    let centroid: (Option<f64>, Option<f64>) = (row.get(6)?, row.get(7)?);
                    let extent = match (bounds, centroid) {
                        (
                            (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)),
                            (Some(centroid_lon), Some(centroid_lat)),
                        ) => Some(CountryExtent {
                            min_lon,
                            min_lat,
                            max_lon,
                            max_lat,
                            centroid_lon,
                            centroid_lat,
                            crosses_antimeridian: row.get(8)?,
                        }),
                        _ => None,
                    };
                    Ok(CountryDetail {
                        country_id: row.get(0)?,
                        name: row.get(1)?,
                        extent,
                        geometry_geojson: row.get(9)?,
                    })
                },
            )
            .optional()?;
        Ok(detail)
    }

    // ───────────────────── Threshold Queries ─────────────────────

    /// Distinct speed and distance thresholds present in the data.
    pub fn query_threshold_values(&self) -> anyhow::Result<ThresholdGrid> {
        let conn = self.conn.borrow();
        let speeds = conn
            .prepare("SELECT DISTINCT speed FROM thresholds ORDER BY speed")?
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        let distances = conn
            .prepare("SELECT DISTINCT distance FROM thresholds ORDER BY distance")?
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(ThresholdGrid::new(speeds, distances))
    }

    /// First and last storm years with threshold records for a country.
    ///
    /// Returns `None` when the country has no records.
    pub fn query_year_range(&self, country_id: i32) -> anyhow::Result<Option<(i32, i32)>> {
        let conn = self.conn.borrow();
        let (min, max): (Option<i32>, Option<i32>) = conn.query_row(
            "SELECT MIN(c.year), MAX(c.year)
             FROM thresholds t
             INNER JOIN cyclones c ON t.sid = c.sid
             WHERE t.country_id = ?1",
            params![country_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(min.zip(max))
    }

    /// Filter the threshold table to a country and year window, and flag each
    /// row for the queried threshold pair.
    ///
    /// Rows are enriched with the storm's name and year from the cyclone
    /// index; rows for storms missing from the index are left out since
    /// they have no year. The result is ordered most recent year first.
    /// An unknown country or an empty window yields [`Evaluation::NoData`].
    ///
    /// This does not check the pair against the grid; see
    /// [`query_dashboard`](Self::query_dashboard) for the checked entry point.
    pub fn evaluate_triggers(&self, query: &TriggerQuery) -> anyhow::Result<Evaluation> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT t.sid, c.name, c.year, c.label, t.speed, t.distance,
                    (t.exceeded = 1 AND t.speed = ?2 AND t.distance = ?3) AS triggered
             FROM thresholds t
             INNER JOIN cyclones c ON t.sid = c.sid
             WHERE t.country_id = ?1 AND c.year >= ?4
             ORDER BY c.year DESC, t.sid DESC, t.speed, t.distance",
        )?;
        let records = stmt
            .query_map(
                params![query.country_id, query.speed, query.distance, query.start_year],
                |row| {
                    Ok(EvaluatedRecord {
                        sid: row.get(0)?,
                        name: row.get(1)?,
                        year: row.get(2)?,
                        label: row.get(3)?,
                        speed: row.get(4)?,
                        distance: row.get(5)?,
                        triggered: row.get(6)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[TCR Debug] query: evaluate_triggers({}, {} kt, {} km, from {}) returned {} records",
            query.country_id,
            query.speed,
            query.distance,
            query.start_year,
            records.len()
        );
        Ok(Evaluation::from_records(*query, records))
    }

    // ───────────────────── Track Queries ─────────────────────

    /// Full tracks of the given storms, in the order given, each sorted by
    /// time descending. Storms without observations are skipped.
    pub fn query_storm_tracks(&self, sids: &[String]) -> anyhow::Result<Vec<StormPath>> {
        if sids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.borrow();
        let mut label_stmt = conn.prepare("SELECT label FROM cyclones WHERE sid = ?1")?;
        let mut points_stmt = conn.prepare(
            "SELECT time, lat, lon, wind FROM tracks WHERE sid = ?1 ORDER BY time DESC",
        )?;

        let mut paths = Vec::with_capacity(sids.len());
        for sid in sids {
            let points = points_stmt
                .query_map(params![sid], |row| {
                    Ok(TrackPoint {
                        time: row.get(0)?,
                        lat: row.get(1)?,
                        lon: row.get(2)?,
                        wind: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            if points.is_empty() {
                log::warn!("[TCR Debug] query: No track observations for {}", sid);
                continue;
            }
            let label: Option<String> = label_stmt
                .query_row(params![sid], |row| row.get(0))
                .optional()?;
            paths.push(StormPath {
                sid: sid.clone(),
                label: label.unwrap_or_else(|| sid.clone()),
                points,
            });
        }
        log::info!("[TCR Debug] query: query_storm_tracks returned {} storms", paths.len());
        Ok(paths)
    }

    // ───────────────────── Impact Queries ─────────────────────

    /// Impact records for a country, left-joined to the cyclone index.
    ///
    /// Records whose storm id is blank or unknown come back with no
    /// `cyclone_label`. Ordered most recent year first.
    pub fn query_impacts(&self, country_id: i32) -> anyhow::Result<Vec<MatchedImpact>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT i.sid, i.country_id, i.year, i.event_name,
                    i.damage, i.deaths, i.affected, c.label
             FROM impacts i
             LEFT JOIN cyclones c ON i.sid = c.sid
             WHERE i.country_id = ?1
             ORDER BY i.year DESC, i.id",
        )?;
        let rows = stmt
            .query_map(params![country_id], |row| {
                Ok(MatchedImpact {
                    record: ImpactRecord {
                        sid: row.get(0)?,
                        country_id: row.get(1)?,
                        year: row.get(2)?,
                        event_name: row.get(3)?,
                        damage: row.get(4)?,
                        deaths: row.get(5)?,
                        affected: row.get(6)?,
                    },
                    cyclone_label: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[TCR Debug] query: query_impacts returned {} records", rows.len());
        Ok(rows)
    }
}
