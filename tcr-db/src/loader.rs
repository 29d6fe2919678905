//! Data loading functions for populating the in-memory SQLite database.
//!
//! Each loader parses its input with the record parser from `tcr-core` and
//! inserts the rows in a single transaction. A malformed required column
//! fails the whole load; the caller is expected to refuse to start.
//!
//! # Input Formats
//!
//! - **Tracks** (CSV): `sid,time,lat,lon,wmo_wind,name`
//! - **Thresholds** (CSV): `sid,adm0_code,speed_thresh,distance_thresh[,triggered]`
//! - **Countries** (GeoJSON): `FeatureCollection` with `ADM0_CODE` / `ADM0_NAME` properties
//! - **Impacts** (CSV): `sid,adm0_code,year,event_name,total_damage,total_deaths,total_affected`

use crate::Database;
use rusqlite::{params, Connection};
use tcr_core::country::CountryBoundary;
use tcr_core::cyclone::Cyclone;
use tcr_core::impact::ImpactRecord;
use tcr_core::storm_track::{format_time, StormTrack};
use tcr_core::threshold::ThresholdRecord;

impl Database {
    /// Load storm track observations and rebuild the cyclone index.
    ///
    /// # Example CSV
    /// ```text
    /// sid,time,lat,lon,wmo_wind,name
    /// 2016041S14170,2016-02-20 06:00:00,-17.5,179.0,160,WINSTON
    /// 2016041S14170,2016-02-20 12:00:00,-17.6,178.4,,WINSTON
    /// ```
    pub fn load_tracks(&self, csv_data: &str) -> anyhow::Result<()> {
        let tracks = StormTrack::parse_csv(csv_data)?;

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO tracks (sid, time, lat, lon, wind, name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for t in &tracks {
                stmt.execute(params![t.sid, format_time(&t.time), t.lat, t.lon, t.wind, t.name])?;
            }
        }
        tx.commit()?;
        log::info!("[TCR Debug] loader: Loaded {} track observations", tracks.len());

        let cyclones = rebuild_cyclone_index(&mut conn)?;
        log::info!("[TCR Debug] loader: Rebuilt cyclone index with {} storms", cyclones);
        Ok(())
    }

    /// Load precomputed threshold-exceedance records.
    ///
    /// Rows whose threshold pair is not on the configured grid are still
    /// stored, but reported with a warning since they can never be queried.
    /// Duplicate rows for the same storm, country and pair are merged with OR.
    ///
    /// # Example CSV
    /// ```text
    /// sid,adm0_code,speed_thresh,distance_thresh,triggered
    /// 2016041S14170,83,100,250,True
    /// ```
    pub fn load_thresholds(&self, csv_data: &str) -> anyhow::Result<()> {
        let records = ThresholdRecord::parse_csv(csv_data)?;

        let mut off_grid = 0u32;
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO thresholds (sid, country_id, speed, distance, exceeded)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (sid, country_id, speed, distance)
                 DO UPDATE SET exceeded = MAX(exceeded, excluded.exceeded)",
            )?;
            for r in &records {
                if !self.config.grid.contains(r.speed, r.distance) {
                    off_grid += 1;
                }
                stmt.execute(params![r.sid, r.country_id, r.speed, r.distance, r.exceeded])?;
            }
        }
        tx.commit()?;

        if off_grid > 0 {
            log::warn!(
                "[TCR Debug] loader: {} threshold rows are off the configured grid and cannot be queried",
                off_grid
            );
        }
        log::info!("[TCR Debug] loader: Loaded {} threshold records", records.len());
        Ok(())
    }

    /// Load country boundaries from a GeoJSON `FeatureCollection`.
    ///
    /// The extent and centroid are computed once here, in whichever
    /// longitude frame keeps the country contiguous.
    pub fn load_countries(&self, geojson: &str) -> anyhow::Result<()> {
        let boundaries = CountryBoundary::parse_geojson(geojson)?;

        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO countries
                 (country_id, name, min_lon, min_lat, max_lon, max_lat,
                  centroid_lon, centroid_lat, crosses_antimeridian, geometry)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for b in &boundaries {
                let extent = b.extent();
                if extent.is_none() {
                    log::warn!("[TCR Debug] loader: Boundary for {} ({}) is empty", b.name, b.country_id);
                }
                stmt.execute(params![
                    b.country_id,
                    b.name,
                    extent.map(|e| e.min_lon),
                    extent.map(|e| e.min_lat),
                    extent.map(|e| e.max_lon),
                    extent.map(|e| e.max_lat),
                    extent.map(|e| e.centroid_lon),
                    extent.map(|e| e.centroid_lat),
                    extent.map(|e| e.crosses_antimeridian).unwrap_or(false),
                    b.geometry_geojson()?,
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[TCR Debug] loader: Loaded {} country boundaries", boundaries.len());
        Ok(())
    }

    /// Load historical impact records, replacing any loaded before.
    ///
    /// # Example CSV
    /// ```text
    /// sid,adm0_code,year,event_name,total_damage,total_deaths,total_affected
    /// 2016041S14170,83,2016,Winston,1400000,44,540400
    /// ,83,2012,Evan,,14,
    /// ```
    pub fn load_impacts(&self, csv_data: &str) -> anyhow::Result<()> {
        let records = ImpactRecord::parse_csv(csv_data)?;

        let mut unmatched = 0u32;
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM impacts", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO impacts (sid, country_id, year, event_name, damage, deaths, affected)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in &records {
                if r.sid.is_none() {
                    unmatched += 1;
                }
                stmt.execute(params![
                    r.sid,
                    r.country_id,
                    r.year,
                    r.event_name,
                    r.damage,
                    r.deaths,
                    r.affected
                ])?;
            }
        }
        tx.commit()?;
        log::info!(
            "[TCR Debug] loader: Loaded {} impact records, {} without a storm id",
            records.len(),
            unmatched
        );
        Ok(())
    }
}

/// Replace the `cyclones` table with one row per storm, taken from the
/// storm's earliest observation. Returns the number of storms indexed.
fn rebuild_cyclone_index(conn: &mut Connection) -> anyhow::Result<usize> {
    let tx = conn.transaction()?;
    let firsts: Vec<(String, String, i32)> = {
        let mut stmt = tx.prepare(
            "SELECT t.sid, t.name, CAST(substr(t.time, 1, 4) AS INTEGER)
             FROM tracks t
             WHERE t.time = (SELECT MIN(time) FROM tracks WHERE sid = t.sid)",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    tx.execute("DELETE FROM cyclones", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO cyclones (sid, name, year, label) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (sid, raw_name, year) in &firsts {
            let c = Cyclone::new(sid, raw_name, *year);
            stmt.execute(params![c.sid, c.name, c.year, c.label])?;
        }
    }
    tx.commit()?;
    Ok(firsts.len())
}
