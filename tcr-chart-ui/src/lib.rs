//! Shared Dioxus components and D3.js bridge for the cyclone dashboards.
//!
//! This crate provides:
//! - `js_bridge`: Rust wrappers for D3.js chart functions via `js_sys::eval()`,
//!   plus the gzip CSV fetch used for the large track table
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: Reusable RSX components (selectors, summary, containers)
//! - `snapshot`: Loading the embedded tables and the fetched tracks into a `Database`

pub mod js_bridge;
pub mod state;
pub mod components;
pub mod snapshot;
