//! Tropical Cyclones: Historical Tracks and Return Periods
//!
//! The user picks a country, a wind speed threshold, a distance threshold
//! and a start year. The dashboard shows the empirical return period of
//! storms meeting both thresholds, the list of those storms, and their
//! tracks on a map centred on the country.
//!
//! Data flow:
//! 1. `build.rs` copies `countries.geojson` and `thresholds.csv` into `OUT_DIR`.
//! 2. `include_str!` embeds them into the WASM binary.
//! 3. On mount, they are loaded into an in-memory SQLite database together
//!    with `tracks.csv.gz`, fetched from next to the app.
//! 4. Whenever a control changes, the app runs `query_dashboard()` and
//!    re-renders the summary, the storm table and the track map.

use dioxus::prelude::*;
use tcr_chart_ui::components::{
    ChartContainer, ChartHeader, CountrySelector, ErrorDisplay, LoadingSpinner,
    ReturnPeriodSummary, StartYearSelector, ThresholdSelector,
};
use tcr_chart_ui::js_bridge;
use tcr_chart_ui::snapshot::{refresh_year_range, spawn_snapshot_load, EmbeddedTables};
use tcr_chart_ui::state::AppState;
use tcr_db::models::DashboardResult;

const COUNTRIES_GEOJSON: &str = include_str!(concat!(env!("OUT_DIR"), "/countries.geojson"));
const THRESHOLDS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/thresholds.csv"));

const MAP_ID: &str = "track-map";
const TABLE_ID: &str = "triggered-storms-table";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("return-period-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);
    let mut result = use_signal(|| None::<DashboardResult>);
    let mut query_error = use_signal(|| None::<String>);

    use_effect(move || {
        spawn_snapshot_load(
            state,
            EmbeddedTables {
                countries: COUNTRIES_GEOJSON,
                thresholds: THRESHOLDS_CSV,
                impacts: None,
            },
        );
    });

    use_effect(move || refresh_year_range(state));

    // Re-run the query whenever any control changes
    use_effect(move || {
        if (state.loading)() || (state.error_msg)().is_some() {
            return;
        }
        let Some(db) = state.db.read().clone() else {
            return;
        };
        let query = state.query();

        js_bridge::init_charts();

        let dashboard = match db.query_dashboard(&query) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("[TCR Debug Rust] Query rejected: {}", e);
                query_error.set(Some(e.to_string()));
                result.set(None);
                js_bridge::destroy_chart(MAP_ID);
                js_bridge::destroy_chart(TABLE_ID);
                return;
            }
        };
        query_error.set(None);

        let rows: Vec<serde_json::Value> = dashboard
            .triggered_storms
            .iter()
            .map(|s| {
                serde_json::json!({
                    "label": s.label,
                    "year": s.year,
                    "sid": s.sid,
                })
            })
            .collect();
        let table_config = serde_json::json!({
            "title": format!("Triggered storms ({})", rows.len()),
            "emptyMessage": "No storms met both thresholds.",
            "columns": [
                { "key": "label", "label": "Storm" },
                { "key": "year", "label": "Year", "align": "right" },
                { "key": "sid", "label": "IBTrACS SID" },
            ],
        });
        js_bridge::render_data_table(
            TABLE_ID,
            &serde_json::to_string(&rows).unwrap_or_default(),
            &table_config.to_string(),
        );

        let map_data = serde_json::json!({
            "outline": dashboard.outline_geojson,
            "tracks": dashboard.tracks,
        });
        let view = &dashboard.map_view;
        let map_config = serde_json::json!({
            "center_lon": view.center_lon,
            "center_lat": view.center_lat,
            "zoom": view.zoom,
            "height": 520,
            "windMax": 160,
            "title": dashboard.country.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            "emptyMessage": "No triggered storms to draw",
        });
        js_bridge::render_track_map(MAP_ID, &map_data.to_string(), &map_config.to_string());

        result.set(Some(dashboard));
    });

    let subtitle = format!(
        "Storms with wind of at least {} kt within {} km, since {}",
        (state.speed)(),
        (state.distance)(),
        (state.start_year)()
    );

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Tropical Cyclones: Historical Tracks and Return Periods".to_string(),
                subtitle: subtitle,
            }

            if let Some(err) = (state.error_msg)() {
                ErrorDisplay { message: err }
            } else if (state.loading)() {
                LoadingSpinner {}
            } else {
                div {
                    style: "display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end; margin-bottom: 8px;",
                    CountrySelector {}
                    ThresholdSelector {}
                    StartYearSelector {}
                }

                if let Some(err) = query_error() {
                    ErrorDisplay { message: err, heading: "Query rejected".to_string() }
                }
                if let Some(dashboard) = result() {
                    ReturnPeriodSummary { result: dashboard.return_period }
                }

                div {
                    style: "display: flex; flex-wrap: wrap; gap: 16px;",
                    div {
                        style: "flex: 2 1 500px;",
                        ChartContainer {
                            id: MAP_ID.to_string(),
                            min_height: 520,
                            caption: "Points coloured by WMO maximum sustained wind (kt)".to_string(),
                        }
                    }
                    div {
                        style: "flex: 1 1 300px;",
                        ChartContainer {
                            id: TABLE_ID.to_string(),
                            min_height: 200,
                        }
                    }
                }
            }
        }
    }
}
