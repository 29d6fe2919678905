//! Impact metric selector.

use crate::state::AppState;
use dioxus::prelude::*;
use tcr_core::impact::ImpactMetric;

#[component]
pub fn MetricSelector() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.metric)();

    let on_change = move |evt: Event<FormData>| match evt.value().parse::<ImpactMetric>() {
        Ok(metric) => state.metric.set(metric),
        Err(e) => log::warn!("{}", e),
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                style: "font-weight: bold;",
                "Impact: "
                select {
                    onchange: on_change,
                    for metric in ImpactMetric::ALL {
                        option {
                            value: metric.as_str(),
                            selected: metric == current,
                            {metric.label()}
                        }
                    }
                }
            }
        }
    }
}
