//! Analysis settings shared by the database layer, the CLI and the dashboards.

use crate::threshold::ThresholdGrid;
use serde::{Deserialize, Serialize};

/// Earliest year of impact records considered reliable enough to chart.
pub const IMPACT_FLOOR_YEAR: i32 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Threshold pairs the upstream table was computed on.
    pub grid: ThresholdGrid,
    /// Impact records before this year are never charted.
    pub impact_floor_year: i32,
    /// Start year offered when a dashboard first loads.
    pub default_start_year: i32,
    /// Speed threshold (kt) offered when a dashboard first loads.
    pub default_speed: i32,
    /// Distance threshold (km) offered when a dashboard first loads.
    pub default_distance: i32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid: ThresholdGrid::default(),
            impact_floor_year: IMPACT_FLOOR_YEAR,
            default_start_year: 1980,
            default_speed: 100,
            default_distance: 250,
        }
    }
}

impl AnalysisConfig {
    /// Effective first year for the impact view.
    pub fn impact_start_year(&self, requested_start_year: i32) -> i32 {
        requested_start_year.max(self.impact_floor_year)
    }
}
