//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be passed to D3.js as JSON
//! from the Dioxus WASM frontend, or printed by the CLI.

use serde::Serialize;
use tcr_core::country::CountryExtent;
use tcr_core::evaluation::{TriggerQuery, TriggeredStorm};
use tcr_core::impact::ImpactMetric;
use tcr_data::impacts::ImpactBar;
use tcr_data::map_view::MapView;
use tcr_data::return_period::ReturnPeriod;

/// Country entry for selection lists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryInfo {
    /// GAUL ADM0 code.
    pub country_id: i32,
    pub name: String,
}

/// A country with its stored extent and outline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryDetail {
    pub country_id: i32,
    pub name: String,
    /// `None` when the boundary geometry was empty.
    pub extent: Option<CountryExtent>,
    /// Boundary as a GeoJSON geometry object, in -180..180 longitudes.
    pub geometry_geojson: String,
}

/// One position of a storm track.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrackPoint {
    /// `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    pub lat: f64,
    pub lon: f64,
    /// WMO maximum sustained wind in knots.
    pub wind: Option<f64>,
}

/// The full track of one storm, latest position first.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StormPath {
    pub sid: String,
    pub label: String,
    pub points: Vec<TrackPoint>,
}

/// Everything the return-period dashboard renders for one query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardResult {
    pub query: TriggerQuery,
    /// `None` for an unknown country.
    pub country: Option<CountryInfo>,
    pub return_period: ReturnPeriod,
    /// Distinct triggered storms, most recent first.
    pub triggered_storms: Vec<TriggeredStorm>,
    /// Tracks of the triggered storms, longitudes in the map's frame.
    pub tracks: Vec<StormPath>,
    pub map_view: MapView,
    /// Country outline in the map's frame, as a GeoJSON geometry object.
    pub outline_geojson: Option<String>,
}

/// Impact bars for one query and metric.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImpactChart {
    pub query: TriggerQuery,
    pub metric: ImpactMetric,
    /// Axis label for the metric.
    pub metric_label: String,
    /// First year shown, after applying the impact floor.
    pub start_year: i32,
    pub bars: Vec<ImpactBar>,
}
