//! Composite queries backing the two dashboards and the CLI.
//!
//! Each method is a pure function of its query: one evaluation, then the
//! return period, tracks and impacts derived from it.

use crate::models::{CountryInfo, DashboardResult, ImpactChart};
use crate::{Database, QueryError};
use tcr_core::country::{geometry_to_geojson, parse_geometry, shift_to_positive_frame};
use tcr_core::evaluation::TriggerQuery;
use tcr_core::impact::ImpactMetric;
use tcr_data::impacts::correlate;
use tcr_data::map_view::MapView;
use tcr_data::return_period;

impl Database {
    /// Evaluate a query and gather everything the return-period dashboard shows.
    ///
    /// Off-grid threshold pairs are rejected with [`QueryError::OffGrid`].
    /// An unknown country or empty window is a normal result with
    /// [`ReturnPeriodStatus::NoData`](tcr_data::return_period::ReturnPeriodStatus::NoData).
    pub fn query_dashboard(&self, query: &TriggerQuery) -> Result<DashboardResult, QueryError> {
        self.config.grid.validate(query.speed, query.distance)?;

        let evaluation = self.evaluate_triggers(query)?;
        let return_period = return_period::compute(&evaluation);
        let triggered_storms = evaluation.triggered_storms();

        let country = self.query_country(query.country_id)?;
        let map_view = country
            .as_ref()
            .and_then(|c| c.extent.as_ref())
            .map(MapView::from_extent)
            .unwrap_or_else(MapView::world);

        let outline_geojson = match &country {
            Some(c) if map_view.crosses_antimeridian => {
                let shifted = shift_to_positive_frame(&parse_geometry(&c.geometry_geojson)?);
                Some(geometry_to_geojson(&shifted)?)
            }
            Some(c) => Some(c.geometry_geojson.clone()),
            None => None,
        };

        let sids: Vec<String> = triggered_storms.iter().map(|s| s.sid.clone()).collect();
        let mut tracks = self.query_storm_tracks(&sids)?;
        for path in &mut tracks {
            for point in &mut path.points {
                point.lon = map_view.frame_longitude(point.lon);
            }
        }

        log::info!(
            "[TCR Debug] dashboard: {} triggered storms, return period {:?}",
            triggered_storms.len(),
            return_period.years
        );

        Ok(DashboardResult {
            query: *query,
            country: country.map(|c| CountryInfo {
                country_id: c.country_id,
                name: c.name,
            }),
            return_period,
            triggered_storms,
            tracks,
            map_view,
            outline_geojson,
        })
    }

    /// Impact bars for a query, coloured by the OR-collapsed trigger status of
    /// each storm.
    pub fn query_impact_chart(
        &self,
        query: &TriggerQuery,
        metric: ImpactMetric,
    ) -> Result<ImpactChart, QueryError> {
        self.config.grid.validate(query.speed, query.distance)?;

        let evaluation = self.evaluate_triggers(query)?;
        let impacts = self.query_impacts(query.country_id)?;
        let bars = correlate(&impacts, &evaluation, metric, &self.config);

        Ok(ImpactChart {
            query: *query,
            metric,
            metric_label: metric.label().to_string(),
            start_year: self.config.impact_start_year(query.start_year),
            bars,
        })
    }
}
