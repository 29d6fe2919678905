//! Headline return-period figure with its basis.

use dioxus::prelude::*;
use tcr_data::return_period::{format_years, ReturnPeriod, ReturnPeriodStatus};

#[derive(Props, Clone, PartialEq)]
pub struct ReturnPeriodSummaryProps {
    pub result: ReturnPeriod,
}

/// Shows the no-data, no-trigger and computed states distinctly.
#[component]
pub fn ReturnPeriodSummary(props: ReturnPeriodSummaryProps) -> Element {
    let result = &props.result;
    let (headline, colour) = match (result.status, result.years) {
        (ReturnPeriodStatus::Computed, Some(years)) => {
            (format!("1-in-{} year event", format_years(years)), "#1565C0")
        }
        (ReturnPeriodStatus::NoTriggers, _) => ("No triggering storms".to_string(), "#6D4C41"),
        _ => ("No data".to_string(), "#757575"),
    };

    rsx! {
        div {
            style: "padding: 12px 16px; margin: 8px 0; border-left: 4px solid {colour}; background: #FAFAFA;",
            div {
                style: "font-size: 22px; font-weight: bold; color: {colour};",
                "{headline}"
            }
            p {
                style: "margin: 4px 0 0 0; font-size: 13px; color: #444;",
                "{result.description}"
            }
        }
    }
}
