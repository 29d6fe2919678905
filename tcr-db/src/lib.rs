//! In-memory SQLite snapshot of tropical cyclone data.
//!
//! This crate loads the four input tables into an in-memory SQLite database
//! and exposes typed query methods consumed by the Dioxus/D3.js dashboards
//! (compiled to WASM) and by the CLI.
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in single-threaded WASM
//! - In-memory SQLite via `rusqlite`
//! - CSV/GeoJSON text loaded via `include_str!` or a runtime fetch in consuming crates
//! - Typed query methods returning serializable structs for JSON export to D3.js
//!
//! Each process holds its own snapshot. Tables are written only by the
//! `load_*` methods and read-only afterwards.
//!
//! # Usage
//!
//! ```rust
//! use tcr_core::evaluation::TriggerQuery;
//! use tcr_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_tracks("sid,time,lat,lon,wmo_wind,name\nA,2016-02-20 06:00:00,-17.5,179.0,160,WINSTON\n").unwrap();
//! db.load_thresholds("sid,adm0_code,speed_thresh,distance_thresh,triggered\nA,83,100,250,True\n").unwrap();
//!
//! let query = TriggerQuery { country_id: 83, speed: 100, distance: 250, start_year: 1980 };
//! let result = db.query_dashboard(&query).unwrap();
//! assert_eq!(result.return_period.years, Some(1.0));
//! assert_eq!(result.triggered_storms[0].label, "Winston 2016");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod dashboard;
mod error;
mod loader;
mod queries;
pub mod models;

pub use error::QueryError;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use tcr_core::config::AnalysisConfig;

/// In-memory SQLite database wrapping one snapshot of cyclone data.
///
/// This struct is cheaply cloneable (via `Rc`) and suitable for sharing
/// across Dioxus components in a single-threaded WASM environment.
///
/// # Example
///
/// ```rust
/// use tcr_db::Database;
///
/// let db = Database::new().unwrap();
/// db.load_thresholds("sid,adm0_code,speed_thresh,distance_thresh\nA,83,100,250\n").unwrap();
/// let grid = db.query_threshold_values().unwrap();
/// assert_eq!(grid.speeds(), &[100]);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
    config: AnalysisConfig,
}

impl Database {
    /// Create a new in-memory database with the full schema applied and the
    /// default [`AnalysisConfig`].
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(AnalysisConfig::default())
    }

    pub fn with_config(config: AnalysisConfig) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcr_core::threshold::ThresholdGrid;

    #[test]
    fn database_creates_successfully() {
        let db = Database::new();
        assert!(db.is_ok(), "Database should create without errors");
    }

    #[test]
    fn debug_output_skips_connection() {
        let db = Database::new().unwrap();
        let text = format!("{:?}", db);
        assert!(text.starts_with("Database"));
        assert!(text.contains("config"));
    }

    #[test]
    fn database_is_cloneable() {
        let db = Database::new().unwrap();
        let db2 = db.clone();
        // Both should reference the same underlying connection
        db.load_countries(
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"ADM0_CODE":83,"ADM0_NAME":"Fiji"},"geometry":{"type":"Polygon","coordinates":[[[177.0,-19.0],[179.0,-19.0],[179.0,-16.0],[177.0,-16.0],[177.0,-19.0]]]}}]}"#,
        )
        .unwrap();
        assert!(db2.query_country(83).unwrap().is_some(), "Clone should see same data via shared Rc");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_countries().unwrap().is_empty());
        assert!(db.query_threshold_values().unwrap().speeds().is_empty());
    }

    #[test]
    fn custom_config_is_kept() {
        let config = AnalysisConfig {
            grid: ThresholdGrid::new(vec![50], vec![100]),
            impact_floor_year: 1990,
            ..AnalysisConfig::default()
        };
        let db = Database::with_config(config.clone()).unwrap();
        assert_eq!(db.config(), &config);
    }
}
