//! SQL schema for the in-memory snapshot.
//!
//! The schema is applied as a single batch when the database is created.
//! Every table is written only by the loaders and read-only afterwards.

/// Returns the full SQL schema as a single batch string.
///
/// - `tracks` - one row per storm observation (sid, time, position, WMO wind, raw name)
/// - `cyclones` - one row per storm, rebuilt from `tracks` after each track load
/// - `thresholds` - precomputed exceedance flags per storm, country and threshold pair
/// - `countries` - boundary geometry (GeoJSON text) plus its precomputed extent
/// - `impacts` - historical losses; `sid` may be NULL for unmatched events
///
/// Track times are stored as `YYYY-MM-DD HH:MM:SS` text so they sort lexically.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS tracks (
        sid TEXT NOT NULL,
        time TEXT NOT NULL,
        lat REAL NOT NULL,
        lon REAL NOT NULL,
        wind REAL,
        name TEXT NOT NULL,
        PRIMARY KEY (sid, time)
    );

    CREATE TABLE IF NOT EXISTS cyclones (
        sid TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        year INTEGER NOT NULL,
        label TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_cyclones_year ON cyclones(year);

    CREATE TABLE IF NOT EXISTS thresholds (
        sid TEXT NOT NULL,
        country_id INTEGER NOT NULL,
        speed INTEGER NOT NULL,
        distance INTEGER NOT NULL,
        exceeded INTEGER NOT NULL,
        PRIMARY KEY (sid, country_id, speed, distance)
    );
    CREATE INDEX IF NOT EXISTS idx_thresholds_country ON thresholds(country_id);

    CREATE TABLE IF NOT EXISTS countries (
        country_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        min_lon REAL,
        min_lat REAL,
        max_lon REAL,
        max_lat REAL,
        centroid_lon REAL,
        centroid_lat REAL,
        crosses_antimeridian INTEGER NOT NULL DEFAULT 0,
        geometry TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS impacts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sid TEXT,
        country_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        event_name TEXT,
        damage REAL,
        deaths REAL,
        affected REAL
    );
    CREATE INDEX IF NOT EXISTS idx_impacts_country ON impacts(country_id);
    CREATE INDEX IF NOT EXISTS idx_impacts_sid ON impacts(sid);
    "#
}
