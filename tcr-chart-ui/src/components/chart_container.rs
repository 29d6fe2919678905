//! Chart container component with loading state.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The DOM id D3 renders into
    pub id: String,
    #[props(default = false)]
    pub loading: bool,
    #[props(default = 400)]
    pub min_height: u32,
    /// Caption shown under the chart (e.g. data source or colour key)
    #[props(default = String::new())]
    pub caption: String,
}

/// A container div for D3.js charts with a loading overlay and optional caption.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "min-height: {}px; position: relative; width: 100%;",
        props.min_height
    );

    rsx! {
        div {
            style: "{style}",
            if props.loading {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #666;",
                    "Rendering..."
                }
            }
            div {
                id: "{props.id}",
                style: "width: 100%;",
            }
            if !props.caption.is_empty() {
                p {
                    style: "margin: 4px 0 0 0; font-size: 11px; color: #777;",
                    "{props.caption}"
                }
            }
        }
    }
}
