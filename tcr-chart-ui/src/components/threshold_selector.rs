//! Wind speed and distance threshold selectors.
//!
//! Only values on the threshold grid are offered, so the dashboards never
//! issue an off-grid query.

use crate::state::AppState;
use dioxus::prelude::*;

#[component]
pub fn ThresholdSelector() -> Element {
    let mut state = use_context::<AppState>();
    let grid = state.grid.read().clone();
    let speed = (state.speed)();
    let distance = (state.distance)();

    let on_speed_change = move |evt: Event<FormData>| {
        if let Ok(v) = evt.value().parse::<i32>() {
            state.speed.set(v);
        }
    };

    let on_distance_change = move |evt: Event<FormData>| {
        if let Ok(v) = evt.value().parse::<i32>() {
            state.distance.set(v);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center;",
            label {
                style: "font-weight: bold;",
                "Wind speed: "
                select {
                    onchange: on_speed_change,
                    for s in grid.speeds().iter().copied() {
                        option {
                            value: "{s}",
                            selected: s == speed,
                            "{s} kt"
                        }
                    }
                }
            }
            label {
                style: "font-weight: bold;",
                "Distance: "
                select {
                    onchange: on_distance_change,
                    for d in grid.distances().iter().copied() {
                        option {
                            value: "{d}",
                            selected: d == distance,
                            "{d} km"
                        }
                    }
                }
            }
        }
    }
}
