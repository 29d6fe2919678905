//! Core record types for tropical cyclone return-period analysis.
//!
//! Every input table has a typed record here, together with the parser that
//! reads it from its on-disk format:
//!
//! - [`storm_track::StormTrack`]: one observation of one storm (IBTrACS-style CSV)
//! - [`cyclone::Cyclone`]: one row per storm, derived from its first observation
//! - [`threshold::ThresholdRecord`]: precomputed "came within D km at S kt" flags
//! - [`country::CountryBoundary`]: administrative boundaries (GeoJSON)
//! - [`impact::ImpactRecord`]: historical losses per storm and country
//!
//! The transient per-query types live in [`evaluation`].

pub mod config;
pub mod country;
pub mod cyclone;
pub mod evaluation;
pub mod impact;
pub mod storm_track;
pub mod threshold;
