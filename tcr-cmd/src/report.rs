//! Text and JSON reports for the query subcommands.

use crate::dataset::load_database;
use std::fmt::Write;
use std::path::Path;
use tcr_core::evaluation::TriggerQuery;
use tcr_core::impact::ImpactMetric;
use tcr_data::return_period::{format_years, ReturnPeriodStatus};
use tcr_db::models::{CountryInfo, DashboardResult, ImpactChart};

pub fn run_return_period(data_dir: &Path, query: &TriggerQuery, json: bool) -> anyhow::Result<()> {
    let db = load_database(data_dir, false)?;
    let result = db.query_dashboard(query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_return_period(&result));
    }
    Ok(())
}

pub fn run_countries(data_dir: &Path) -> anyhow::Result<()> {
    let db = load_database(data_dir, false)?;
    print!("{}", format_countries(&db.query_countries()?));
    Ok(())
}

pub fn run_impacts(
    data_dir: &Path,
    query: &TriggerQuery,
    metric: ImpactMetric,
    json: bool,
) -> anyhow::Result<()> {
    let db = load_database(data_dir, true)?;
    let chart = db.query_impact_chart(query, metric)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
    } else {
        print!("{}", format_impacts(&chart));
    }
    Ok(())
}

/// Headline, description and triggered storms, one per line.
pub fn format_return_period(result: &DashboardResult) -> String {
    let q = &result.query;
    let country = result
        .country
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("country {}", q.country_id));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} kt within {} km since {}",
        country, q.speed, q.distance, q.start_year
    );
    let rp = &result.return_period;
    let headline = match (rp.status, rp.years) {
        (ReturnPeriodStatus::Computed, Some(years)) => {
            format!("1-in-{} year event", format_years(years))
        }
        (ReturnPeriodStatus::NoTriggers, _) => "No triggering storms".to_string(),
        _ => "No data".to_string(),
    };
    let _ = writeln!(out, "{}", headline);
    let _ = writeln!(out, "{}", rp.description);

    if !result.triggered_storms.is_empty() {
        let _ = writeln!(out);
        for storm in &result.triggered_storms {
            let _ = writeln!(out, "  {:<24} {}", storm.label, storm.sid);
        }
    }
    out
}

pub fn format_countries(countries: &[CountryInfo]) -> String {
    countries
        .iter()
        .map(|c| format!("{:>6}  {}\n", c.country_id, c.name))
        .collect()
}

/// One row per impact bar with its trigger status.
pub fn format_impacts(chart: &ImpactChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} since {}", chart.metric_label, chart.start_year);
    if chart.bars.is_empty() {
        let _ = writeln!(out, "No impact records");
        return out;
    }
    for bar in &chart.bars {
        let _ = writeln!(
            out,
            "  {:<24} {:>14}  {}",
            bar.label,
            format_value(bar.value),
            bar.status.label()
        );
    }
    out
}

/// Whole numbers print without decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
