//! Snapshot loading shared by the dashboards.
//!
//! The small tables are embedded in each app at compile time; the track
//! table is too large for that and is fetched as `tracks.csv.gz` at startup.

use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use tcr_db::Database;

/// Relative URL of the compressed track table written by `tcr-cli migrate`,
/// served next to the app.
pub const TRACKS_URL: &str = "./tracks.csv.gz";

/// Tables compiled into the app binary.
#[derive(Clone, Copy)]
pub struct EmbeddedTables {
    pub countries: &'static str,
    pub thresholds: &'static str,
    /// Only the impact dashboard needs this table.
    pub impacts: Option<&'static str>,
}

/// Build the database from the embedded tables and the fetched tracks.
///
/// Any table that fails to load fails the whole snapshot.
pub async fn load_snapshot(tables: EmbeddedTables, tracks_url: &str) -> anyhow::Result<Database> {
    let db = Database::new()?;
    db.load_countries(tables.countries)?;
    db.load_thresholds(tables.thresholds)?;
    if let Some(impacts) = tables.impacts {
        db.load_impacts(impacts)?;
    }
    let tracks = js_bridge::fetch_gz_csv(tracks_url).await?;
    db.load_tracks(&tracks)?;
    Ok(db)
}

/// Load the snapshot in the background and publish it into `state`.
///
/// The selected country falls back to the first listed one when the
/// default is not present in the data.
pub fn spawn_snapshot_load(mut state: AppState, tables: EmbeddedTables) {
    spawn(async move {
        match load_snapshot(tables, TRACKS_URL).await {
            Ok(db) => {
                match db.query_countries() {
                    Ok(countries) => {
                        let selected = *state.selected_country.peek();
                        if !countries.iter().any(|c| c.country_id == selected) {
                            if let Some(first) = countries.first() {
                                state.selected_country.set(first.country_id);
                            }
                        }
                        state.countries.set(countries);
                    }
                    Err(e) => log::error!("Failed to list countries: {}", e),
                }
                state.grid.set(db.config().grid.clone());
                state.db.set(Some(db));
            }
            Err(e) => {
                log::error!("Failed to load cyclone data: {:#}", e);
                state
                    .error_msg
                    .set(Some(format!("Failed to load cyclone data: {:#}", e)));
            }
        }
        state.loading.set(false);
    });
}

/// Keep `year_range` in step with the selected country.
///
/// Call from an effect; it subscribes to the database and country signals.
pub fn refresh_year_range(mut state: AppState) {
    let country = (state.selected_country)();
    let Some(db) = state.db.read().clone() else {
        return;
    };
    match db.query_year_range(country) {
        Ok(range) => state.year_range.set(range),
        Err(e) => log::error!("Failed to read year range for {}: {}", country, e),
    }
}
