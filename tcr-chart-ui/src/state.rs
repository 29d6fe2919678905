//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use dioxus::prelude::*;
use tcr_core::config::AnalysisConfig;
use tcr_core::evaluation::TriggerQuery;
use tcr_core::impact::ImpactMetric;
use tcr_core::threshold::ThresholdGrid;
use tcr_db::models::CountryInfo;
use tcr_db::Database;

/// GAUL code of Fiji, the country selected on first load.
pub const DEFAULT_COUNTRY_ID: i32 = 83;

/// Shared application state for both dashboards.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    /// Countries with threshold records
    pub countries: Signal<Vec<CountryInfo>>,
    pub selected_country: Signal<i32>,
    /// Wind speed threshold (kt)
    pub speed: Signal<i32>,
    /// Distance threshold (km)
    pub distance: Signal<i32>,
    pub start_year: Signal<i32>,
    /// First and last year with records for the selected country
    pub year_range: Signal<Option<(i32, i32)>>,
    /// Loss figure shown in the impact chart
    pub metric: Signal<ImpactMetric>,
    /// Threshold values offered by the selectors
    pub grid: Signal<ThresholdGrid>,
}

impl AppState {
    /// Create a new AppState with the default analysis settings.
    pub fn new() -> Self {
        let config = AnalysisConfig::default();
        Self {
            db: Signal::new(None),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            countries: Signal::new(Vec::new()),
            selected_country: Signal::new(DEFAULT_COUNTRY_ID),
            speed: Signal::new(config.default_speed),
            distance: Signal::new(config.default_distance),
            start_year: Signal::new(config.default_start_year),
            year_range: Signal::new(None),
            metric: Signal::new(ImpactMetric::Deaths),
            grid: Signal::new(config.grid),
        }
    }

    /// The query described by the current control values.
    ///
    /// Reading this inside an effect subscribes the effect to every control.
    pub fn query(&self) -> TriggerQuery {
        TriggerQuery {
            country_id: (self.selected_country)(),
            speed: (self.speed)(),
            distance: (self.distance)(),
            start_year: (self.start_year)(),
        }
    }
}
