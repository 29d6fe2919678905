//! Pure computations over trigger evaluations.
//!
//! This crate turns an [`Evaluation`](tcr_core::evaluation::Evaluation) into
//! the numbers and series the dashboards display: the return-period
//! estimate, the impact bars and the map viewport.

/// Return-period arithmetic.
pub mod return_period {
    use serde::Serialize;
    use tcr_core::evaluation::{Evaluation, YearSpan};

    /// Which of the three result shapes a return period has.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReturnPeriodStatus {
        /// Unknown country, or nothing on or after the start year.
        NoData,
        /// Records exist but no storm triggered; the return period is undefined.
        NoTriggers,
        Computed,
    }

    /// Return-period estimate together with the basis it was computed on.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ReturnPeriod {
        /// Average years between triggering storms, `None` when undefined.
        pub years: Option<f64>,
        /// Distinct storms that triggered.
        pub triggered_count: usize,
        pub span: Option<YearSpan>,
        pub start_year: i32,
        pub status: ReturnPeriodStatus,
        pub description: String,
    }

    /// Compute `N / T` where `N` is the number of years spanned by the
    /// country's records in the window and `T` the number of distinct
    /// triggered storms.
    ///
    /// ```
    /// use tcr_core::evaluation::{Evaluation, TriggerQuery};
    /// use tcr_data::return_period::{compute, ReturnPeriodStatus};
    ///
    /// let query = TriggerQuery { country_id: -1, speed: 100, distance: 250, start_year: 1980 };
    /// let result = compute(&Evaluation::from_records(query, Vec::new()));
    /// assert_eq!(result.status, ReturnPeriodStatus::NoData);
    /// assert_eq!(result.years, None);
    /// ```
    pub fn compute(evaluation: &Evaluation) -> ReturnPeriod {
        let start_year = evaluation.query().start_year;
        let Evaluation::Records(evaluation) = evaluation else {
            return no_data(start_year);
        };
        let Some(span) = evaluation.year_span() else {
            return no_data(start_year);
        };
        let n = span.years();
        let t = evaluation.triggered_count();

        if t == 0 {
            return ReturnPeriod {
                years: None,
                triggered_count: 0,
                span: Some(span),
                start_year,
                status: ReturnPeriodStatus::NoTriggers,
                description: format!(
                    "No storms met the thresholds in {} {} of records ({} to {}, starting from {}), so the return period is undefined.",
                    n,
                    plural(n as usize, "year", "years"),
                    span.first,
                    span.last,
                    start_year
                ),
            };
        }

        let years = n as f64 / t as f64;
        ReturnPeriod {
            years: Some(years),
            triggered_count: t,
            span: Some(span),
            start_year,
            status: ReturnPeriodStatus::Computed,
            description: format!(
                "{} {} met the thresholds in {} {} of records ({} to {}, starting from {}): a return period of {} years.",
                t,
                plural(t, "storm", "storms"),
                n,
                plural(n as usize, "year", "years"),
                span.first,
                span.last,
                start_year,
                format_years(years)
            ),
        }
    }

    fn no_data(start_year: i32) -> ReturnPeriod {
        ReturnPeriod {
            years: None,
            triggered_count: 0,
            span: None,
            start_year,
            status: ReturnPeriodStatus::NoData,
            description: format!("No storm records for this country since {}.", start_year),
        }
    }

    /// Format a return period to one decimal place.
    pub fn format_years(years: f64) -> String {
        format!("{:.1}", years)
    }

    fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
        if n == 1 {
            one
        } else {
            many
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tcr_core::evaluation::{EvaluatedRecord, TriggerQuery};

        fn query(speed: i32, distance: i32) -> TriggerQuery {
            TriggerQuery {
                country_id: 83,
                speed,
                distance,
                start_year: 1980,
            }
        }

        fn record(sid: &str, year: i32, triggered: bool) -> EvaluatedRecord {
            EvaluatedRecord {
                sid: sid.to_string(),
                name: "Storm".to_string(),
                year,
                label: format!("Storm {}", year),
                speed: 100,
                distance: 250,
                triggered,
            }
        }

        #[test]
        fn forty_three_years_three_storms() {
            let records = vec![
                record("E", 2022, false),
                record("D", 2016, true),
                record("C", 2003, true),
                record("C", 2003, true),
                record("B", 1993, true),
                record("A", 1980, false),
            ];
            let result = compute(&Evaluation::from_records(query(100, 250), records));
            assert_eq!(result.status, ReturnPeriodStatus::Computed);
            assert_eq!(result.triggered_count, 3);
            assert_eq!(result.span.map(|s| s.years()), Some(43));
            let years = result.years.unwrap();
            assert!((years - 43.0 / 3.0).abs() < 1e-12);
            assert_eq!(format_years(years), "14.3");
            assert!(result.description.contains("14.3"));
            assert!(result.description.contains("1980"));
        }

        #[test]
        fn zero_triggers_is_undefined_not_infinite() {
            let records = vec![record("B", 2022, false), record("A", 1980, false)];
            let result = compute(&Evaluation::from_records(query(185, 0), records));
            assert_eq!(result.status, ReturnPeriodStatus::NoTriggers);
            assert_eq!(result.years, None);
            assert_eq!(result.triggered_count, 0);
            assert!(result.description.contains("43 years"));
            assert!(result.description.contains("1980"));
        }

        #[test]
        fn unknown_country_is_no_data() {
            let q = TriggerQuery {
                country_id: -1,
                ..query(100, 250)
            };
            let result = compute(&Evaluation::from_records(q, Vec::new()));
            assert_eq!(result.status, ReturnPeriodStatus::NoData);
            assert_eq!(result.years, None);
            assert_eq!(result.span, None);
            assert!(result.description.contains("1980"));
        }

        #[test]
        fn single_year_window() {
            let records = vec![record("A", 2016, true)];
            let result = compute(&Evaluation::from_records(query(100, 250), records));
            assert_eq!(result.years, Some(1.0));
            assert!(result.description.starts_with("1 storm met"));
        }

        #[test]
        fn compute_is_deterministic() {
            let records = vec![record("B", 2020, true), record("A", 2001, false)];
            let evaluation = Evaluation::from_records(query(100, 250), records);
            assert_eq!(compute(&evaluation), compute(&evaluation));
        }
    }
}

/// Joins impact records to an evaluation for the impact bar chart.
pub mod impacts {
    use serde::Serialize;
    use tcr_core::config::AnalysisConfig;
    use tcr_core::cyclone::storm_label;
    use tcr_core::evaluation::Evaluation;
    use tcr_core::impact::{ImpactMetric, MatchedImpact, TriggerStatus};

    /// One bar in the impact chart.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ImpactBar {
        pub label: String,
        pub sid: Option<String>,
        pub year: i32,
        pub value: f64,
        pub status: TriggerStatus,
    }

    /// Tag each impact record with the trigger status of its storm.
    ///
    /// Records outside the queried country, before the effective floor year,
    /// or without a positive value for `metric` are left out. A record whose
    /// storm is not in the cyclone index is kept as
    /// [`TriggerStatus::NoTrackData`]. Bars come back most recent year first.
    pub fn correlate(
        impacts: &[MatchedImpact],
        evaluation: &Evaluation,
        metric: ImpactMetric,
        config: &AnalysisConfig,
    ) -> Vec<ImpactBar> {
        let query = evaluation.query();
        let floor = config.impact_start_year(query.start_year);
        let flags = match evaluation {
            Evaluation::Records(evaluation) => evaluation.storm_flags(),
            Evaluation::NoData { .. } => Default::default(),
        };

        let mut bars: Vec<ImpactBar> = impacts
            .iter()
            .filter(|m| m.record.country_id == query.country_id && m.record.year >= floor)
            .filter_map(|m| {
                let value = metric.value(&m.record).filter(|v| *v > 0.0)?;
                let status = match (&m.record.sid, &m.cyclone_label) {
                    (Some(sid), Some(_)) => {
                        if flags.get(sid.as_str()).copied().unwrap_or(false) {
                            TriggerStatus::Triggered
                        } else {
                            TriggerStatus::NotTriggered
                        }
                    }
                    _ => TriggerStatus::NoTrackData,
                };
                let label = m.cyclone_label.clone().unwrap_or_else(|| {
                    storm_label(m.record.event_name.as_deref().unwrap_or(""), m.record.year)
                });
                Some(ImpactBar {
                    label,
                    sid: m.record.sid.clone(),
                    year: m.record.year,
                    value,
                    status,
                })
            })
            .collect();

        bars.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.label.cmp(&b.label)));
        log::debug!("Correlated {} impact bars for {}", bars.len(), metric);
        bars
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tcr_core::evaluation::{EvaluatedRecord, TriggerQuery};
        use tcr_core::impact::ImpactRecord;

        fn query(start_year: i32) -> TriggerQuery {
            TriggerQuery {
                country_id: 83,
                speed: 100,
                distance: 250,
                start_year,
            }
        }

        fn evaluated(sid: &str, year: i32, triggered: bool) -> EvaluatedRecord {
            EvaluatedRecord {
                sid: sid.to_string(),
                name: "Storm".to_string(),
                year,
                label: format!("Storm {}", year),
                speed: 100,
                distance: 250,
                triggered,
            }
        }

        fn impact(sid: Option<&str>, year: i32, deaths: Option<f64>, label: Option<&str>) -> MatchedImpact {
            MatchedImpact {
                record: ImpactRecord {
                    sid: sid.map(str::to_string),
                    country_id: 83,
                    year,
                    event_name: Some("Evan".to_string()),
                    damage: Some(10.0),
                    deaths,
                    affected: None,
                },
                cyclone_label: label.map(str::to_string),
            }
        }

        fn evaluation() -> Evaluation {
            Evaluation::from_records(
                query(1980),
                vec![
                    evaluated("W", 2016, false),
                    evaluated("W", 2016, true),
                    evaluated("H", 2020, false),
                ],
            )
        }

        #[test]
        fn statuses_follow_or_collapsed_flags() {
            let impacts = vec![
                impact(Some("W"), 2016, Some(44.0), Some("Winston 2016")),
                impact(Some("H"), 2020, Some(4.0), Some("Harold 2020")),
            ];
            let bars = correlate(&impacts, &evaluation(), ImpactMetric::Deaths, &AnalysisConfig::default());
            assert_eq!(bars.len(), 2);
            assert_eq!(bars[0].label, "Harold 2020");
            assert_eq!(bars[0].status, TriggerStatus::NotTriggered);
            assert_eq!(bars[1].label, "Winston 2016");
            assert_eq!(bars[1].status, TriggerStatus::Triggered);
        }

        #[test]
        fn blank_sid_is_no_track_data() {
            let impacts = vec![impact(None, 2012, Some(14.0), None)];
            let bars = correlate(&impacts, &evaluation(), ImpactMetric::Deaths, &AnalysisConfig::default());
            assert_eq!(bars.len(), 1);
            assert_eq!(bars[0].status, TriggerStatus::NoTrackData);
            assert_eq!(bars[0].label, "Evan 2012");
        }

        #[test]
        fn unmatched_sid_is_no_track_data() {
            let impacts = vec![impact(Some("GHOST"), 2012, Some(3.0), None)];
            let bars = correlate(&impacts, &evaluation(), ImpactMetric::Deaths, &AnalysisConfig::default());
            assert_eq!(bars[0].status, TriggerStatus::NoTrackData);
        }

        #[test]
        fn drops_zero_missing_and_pre_floor_values() {
            let impacts = vec![
                impact(Some("W"), 2016, Some(0.0), Some("Winston 2016")),
                impact(Some("H"), 2020, None, Some("Harold 2020")),
                impact(Some("K"), 1997, Some(27.0), Some("Keli 1997")),
            ];
            let bars = correlate(&impacts, &evaluation(), ImpactMetric::Deaths, &AnalysisConfig::default());
            assert!(bars.is_empty());

            // Damage is filtered independently of deaths.
            let bars = correlate(&impacts, &evaluation(), ImpactMetric::Damage, &AnalysisConfig::default());
            assert_eq!(bars.len(), 2);
        }

        #[test]
        fn later_start_year_raises_floor() {
            let impacts = vec![
                impact(Some("W"), 2016, Some(44.0), Some("Winston 2016")),
                impact(Some("H"), 2020, Some(4.0), Some("Harold 2020")),
            ];
            let evaluation = Evaluation::from_records(query(2018), vec![evaluated("H", 2020, true)]);
            let bars = correlate(&impacts, &evaluation, ImpactMetric::Deaths, &AnalysisConfig::default());
            assert_eq!(bars.len(), 1);
            assert_eq!(bars[0].status, TriggerStatus::Triggered);
        }
    }
}

/// Map viewport placement from a country extent.
pub mod map_view {
    use serde::Serialize;
    use tcr_core::country::{shift_longitude, CountryExtent};

    /// Longitude span visible at each zoom level, from zoom 20 down to zoom 1.
    pub const LON_ZOOM_RANGE: [f64; 20] = [
        0.0007, 0.0014, 0.003, 0.006, 0.012, 0.024, 0.048, 0.096, 0.192, 0.3712, 0.768, 1.536,
        3.072, 6.144, 11.8784, 23.7568, 47.5136, 98.304, 190.0544, 360.0,
    ];

    /// Padding applied to the extent before looking up a zoom.
    pub const ZOOM_MARGIN: f64 = 1.8;

    /// Centre, bounds and zoom for a country map.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct MapView {
        pub center_lon: f64,
        pub center_lat: f64,
        pub min_lon: f64,
        pub min_lat: f64,
        pub max_lon: f64,
        pub max_lat: f64,
        pub zoom: f64,
        /// Longitudes for this view are in the 0..360 frame.
        pub crosses_antimeridian: bool,
    }

    impl MapView {
        pub fn from_extent(extent: &CountryExtent) -> Self {
            MapView {
                center_lon: extent.centroid_lon,
                center_lat: extent.centroid_lat,
                min_lon: extent.min_lon,
                min_lat: extent.min_lat,
                max_lon: extent.max_lon,
                max_lat: extent.max_lat,
                zoom: plotly_zoom(extent.min_lon, extent.min_lat, extent.max_lon, extent.max_lat),
                crosses_antimeridian: extent.crosses_antimeridian,
            }
        }

        /// Whole-globe view, used when a country has no boundary.
        pub fn world() -> Self {
            MapView {
                center_lon: 0.0,
                center_lat: 0.0,
                min_lon: -180.0,
                min_lat: -90.0,
                max_lon: 180.0,
                max_lat: 90.0,
                zoom: 1.0,
                crosses_antimeridian: false,
            }
        }

        /// Express a -180..180 longitude in this view's frame.
        pub fn frame_longitude(&self, lon: f64) -> f64 {
            if self.crosses_antimeridian {
                shift_longitude(lon)
            } else {
                lon
            }
        }
    }

    /// Zoom level that fits the given bounds, rounded to two decimals.
    ///
    /// ```
    /// use tcr_data::map_view::plotly_zoom;
    ///
    /// assert_eq!(plotly_zoom(-180.0, -90.0, 180.0, 90.0), 1.0);
    /// ```
    pub fn plotly_zoom(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> f64 {
        let width_to_height = 1.0;
        let height = (max_lat - min_lat) * ZOOM_MARGIN * width_to_height;
        let width = (max_lon - min_lon) * ZOOM_MARGIN;
        let zoom = interpolate_zoom(width).min(interpolate_zoom(height));
        (zoom * 100.0).round() / 100.0
    }

    /// Piecewise-linear lookup of `span` in [`LON_ZOOM_RANGE`], clamped at
    /// both ends.
    fn interpolate_zoom(span: f64) -> f64 {
        let zoom_at = |i: usize| (20 - i) as f64;
        let last = LON_ZOOM_RANGE.len() - 1;
        if span.is_nan() || span <= LON_ZOOM_RANGE[0] {
            return zoom_at(0);
        }
        if span >= LON_ZOOM_RANGE[last] {
            return zoom_at(last);
        }
        for i in 0..last {
            let (lo, hi) = (LON_ZOOM_RANGE[i], LON_ZOOM_RANGE[i + 1]);
            if span <= hi {
                let t = (span - lo) / (hi - lo);
                return zoom_at(i) + t * (zoom_at(i + 1) - zoom_at(i));
            }
        }
        zoom_at(last)
    }

}
