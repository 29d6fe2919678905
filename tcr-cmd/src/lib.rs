//! Command implementations for TCR CLI.
//!
//! Provides subcommands for provisioning the cyclone tables and for
//! querying return periods and impacts from them.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tcr_core::evaluation::TriggerQuery;
use tcr_core::impact::ImpactMetric;

pub mod dataset;
pub mod migrate;
pub mod report;

/// Location of the provisioned tables.
#[derive(Args, Debug, Clone)]
pub struct DataDir {
    /// Directory holding tracks, thresholds, countries and impacts
    #[arg(short = 'd', long = "data-dir", env = "TCR_DATA_DIR", default_value = "data")]
    pub path: PathBuf,
}

/// The four values that make up a trigger query.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// GAUL ADM0 code of the country
    #[arg(short = 'c', long, default_value_t = 83)]
    pub country: i32,

    /// Wind speed threshold in knots
    #[arg(short = 's', long, default_value_t = 100)]
    pub speed: i32,

    /// Distance threshold in km
    #[arg(short = 'k', long, default_value_t = 250)]
    pub distance: i32,

    /// First year of records to include
    #[arg(short = 'y', long, default_value_t = 1980)]
    pub start_year: i32,
}

impl QueryArgs {
    pub fn query(&self) -> TriggerQuery {
        TriggerQuery {
            country_id: self.country,
            speed: self.speed,
            distance: self.distance,
            start_year: self.start_year,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Copy the processed IBTrACS tables into the data directory
    Migrate {
        /// Root of the shared data store
        #[arg(long, env = "AA_DATA_DIR_NEW")]
        source_dir: PathBuf,

        #[command(flatten)]
        data: DataDir,
    },

    /// Print the return period and triggered storms for one query
    ReturnPeriod {
        #[command(flatten)]
        data: DataDir,

        #[command(flatten)]
        query: QueryArgs,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the countries that have threshold records
    Countries {
        #[command(flatten)]
        data: DataDir,
    },

    /// Print impacts coloured by trigger status for one query
    Impacts {
        #[command(flatten)]
        data: DataDir,

        #[command(flatten)]
        query: QueryArgs,

        /// deaths, damage or affected
        #[arg(short = 'm', long, default_value = "deaths")]
        metric: ImpactMetric,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate { source_dir, data } => migrate::run_migrate(&source_dir, &data.path),
        Command::ReturnPeriod { data, query, json } => {
            report::run_return_period(&data.path, &query.query(), json)
        }
        Command::Countries { data } => report::run_countries(&data.path),
        Command::Impacts {
            data,
            query,
            metric,
            json,
        } => report::run_impacts(&data.path, &query.query(), metric, json),
    }
}
