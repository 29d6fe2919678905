//! Reusable Dioxus RSX components for the cyclone dashboards.

mod chart_container;
mod chart_header;
mod country_selector;
mod error_display;
mod loading_spinner;
mod metric_selector;
mod return_period_summary;
mod start_year_selector;
mod threshold_selector;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use country_selector::CountrySelector;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use metric_selector::MetricSelector;
pub use return_period_summary::ReturnPeriodSummary;
pub use start_year_selector::StartYearSelector;
pub use threshold_selector::ThresholdSelector;
