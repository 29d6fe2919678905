//! Tropical Cyclone Impacts by Trigger Status
//!
//! Bar chart of reported losses (deaths, people affected or damage) for a
//! country's storms, coloured by whether each storm met the selected wind
//! speed and distance thresholds. Impacts with no matching track are shown
//! in grey.

use dioxus::prelude::*;
use tcr_chart_ui::components::{
    ChartContainer, ChartHeader, CountrySelector, ErrorDisplay, LoadingSpinner, MetricSelector,
    StartYearSelector, ThresholdSelector,
};
use tcr_chart_ui::js_bridge;
use tcr_chart_ui::snapshot::{refresh_year_range, spawn_snapshot_load, EmbeddedTables};
use tcr_chart_ui::state::AppState;

const COUNTRIES_GEOJSON: &str = include_str!(concat!(env!("OUT_DIR"), "/countries.geojson"));
const THRESHOLDS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/thresholds.csv"));
const IMPACTS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/impacts.csv"));

const CHART_ID: &str = "impact-chart";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("impact-chart-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);
    let mut query_error = use_signal(|| None::<String>);
    let mut floor_year = use_signal(|| None::<i32>);

    use_effect(move || {
        spawn_snapshot_load(
            state,
            EmbeddedTables {
                countries: COUNTRIES_GEOJSON,
                thresholds: THRESHOLDS_CSV,
                impacts: Some(IMPACTS_CSV),
            },
        );
    });

    use_effect(move || refresh_year_range(state));

    use_effect(move || {
        if (state.loading)() || (state.error_msg)().is_some() {
            return;
        }
        let Some(db) = state.db.read().clone() else {
            return;
        };
        let query = state.query();
        let metric = (state.metric)();

        js_bridge::init_charts();

        let chart = match db.query_impact_chart(&query, metric) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("[TCR Debug Rust] Query rejected: {}", e);
                query_error.set(Some(e.to_string()));
                js_bridge::destroy_chart(CHART_ID);
                return;
            }
        };
        query_error.set(None);
        floor_year.set(Some(chart.start_year));

        let country = state
            .countries
            .read()
            .iter()
            .find(|c| c.country_id == query.country_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let config = serde_json::json!({
            "title": format!("{} by storm, {}", chart.metric_label, country),
            "yAxisLabel": chart.metric_label,
            "height": 480,
            "emptyMessage": format!("No {} recorded since {}", chart.metric_label.to_lowercase(), chart.start_year),
        });
        match serde_json::to_string(&chart.bars) {
            Ok(data) => js_bridge::render_impact_chart(CHART_ID, &data, &config.to_string()),
            Err(e) => log::error!("Failed to serialize impact bars: {}", e),
        }
    });

    let caption = match floor_year() {
        Some(year) if year > (state.start_year)() => format!(
            "Impact records start in {}; earlier storms are not shown.",
            year
        ),
        _ => String::new(),
    };

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",

            ChartHeader {
                title: "Tropical Cyclone Impacts by Trigger Status".to_string(),
                subtitle: format!(
                    "Storms meeting {} kt within {} km are highlighted",
                    (state.speed)(),
                    (state.distance)()
                ),
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
                    MetricSelector {}
                }

                if let Some(err) = query_error() {
                    ErrorDisplay { message: err, heading: "Query rejected".to_string() }
                }

                ChartContainer {
                    id: CHART_ID.to_string(),
                    min_height: 480,
                    caption: caption,
                }
            }
        }
    }
}
