//! Loads the repository fixtures end to end and runs the dashboard queries.

use tcr_core::evaluation::TriggerQuery;
use tcr_core::impact::{ImpactMetric, TriggerStatus};
use tcr_data::return_period::{format_years, ReturnPeriodStatus};
use tcr_db::Database;

const TRACKS: &str = include_str!("../../fixtures/tracks.csv");
const THRESHOLDS: &str = include_str!("../../fixtures/thresholds.csv");
const COUNTRIES: &str = include_str!("../../fixtures/countries.geojson");
const IMPACTS: &str = include_str!("../../fixtures/impacts.csv");

const FIJI: i32 = 83;

fn fixture_db() -> Database {
    let db = Database::new().unwrap();
    db.load_tracks(TRACKS).unwrap();
    db.load_thresholds(THRESHOLDS).unwrap();
    db.load_countries(COUNTRIES).unwrap();
    db.load_impacts(IMPACTS).unwrap();
    db
}

fn query(country_id: i32, speed: i32, distance: i32, start_year: i32) -> TriggerQuery {
    TriggerQuery {
        country_id,
        speed,
        distance,
        start_year,
    }
}

#[test]
fn countries_with_thresholds_are_listed() {
    let db = fixture_db();
    let names: Vec<String> = db.query_countries().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Fiji", "Tonga", "Vanuatu"]);
}

#[test]
fn fiji_return_period_since_1980() {
    let db = fixture_db();
    let result = db.query_dashboard(&query(FIJI, 100, 250, 1980)).unwrap();
    let rp = &result.return_period;
    assert_eq!(rp.status, ReturnPeriodStatus::Computed);
    assert_eq!(rp.triggered_count, 7);
    assert_eq!(rp.span.unwrap().years(), 43);
    assert_eq!(format_years(rp.years.unwrap()), "6.1");

    let labels: Vec<&str> = result.triggered_storms.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels[0], "Yasa 2020");
    assert_eq!(labels.last(), Some(&"Oscar 1983"));
}

#[test]
fn fiji_return_period_since_2000() {
    let db = fixture_db();
    let result = db.query_dashboard(&query(FIJI, 100, 250, 2000)).unwrap();
    // 2003-2022 spans 20 years with 5 triggering storms
    assert_eq!(result.return_period.years, Some(4.0));
}

#[test]
fn fiji_map_uses_shifted_frame() {
    let db = fixture_db();
    let result = db.query_dashboard(&query(FIJI, 100, 250, 1980)).unwrap();
    let view = result.map_view;
    assert!(view.crosses_antimeridian);
    assert!(view.center_lon > 177.0 && view.center_lon < 182.0);
    assert!(view.zoom > 1.0 && view.zoom < 20.0);
    assert!(result.tracks.iter().flat_map(|t| &t.points).all(|p| p.lon > 0.0));
}

#[test]
fn strictest_pair_has_no_triggers() {
    let db = fixture_db();
    let result = db.query_dashboard(&query(FIJI, 185, 0, 1980)).unwrap();
    assert_eq!(result.return_period.status, ReturnPeriodStatus::NoTriggers);
    assert_eq!(result.return_period.years, None);
    assert!(result.return_period.description.contains("1980"));
}

#[test]
fn unknown_country_is_no_data() {
    let db = fixture_db();
    let result = db.query_dashboard(&query(-1, 100, 250, 1980)).unwrap();
    assert_eq!(result.return_period.status, ReturnPeriodStatus::NoData);
}

#[test]
fn fiji_impacts_by_affected() {
    let db = fixture_db();
    let chart = db
        .query_impact_chart(&query(FIJI, 100, 250, 1980), ImpactMetric::Affected)
        .unwrap();
    assert_eq!(chart.start_year, 2000);
    assert!(chart.bars.iter().all(|b| b.year >= 2000 && b.value > 0.0));

    let evan = chart.bars.iter().find(|b| b.label == "Evan 2012").unwrap();
    assert_eq!(evan.status, TriggerStatus::NoTrackData);
    let cobra = chart.bars.iter().find(|b| b.label == "Cobra 2022").unwrap();
    assert_eq!(cobra.status, TriggerStatus::NotTriggered);
    let winston = chart.bars.iter().find(|b| b.label == "Winston 2016").unwrap();
    assert_eq!(winston.status, TriggerStatus::Triggered);
    // Harold has no affected figure for Fiji
    assert!(chart.bars.iter().all(|b| b.label != "Harold 2020"));
}
