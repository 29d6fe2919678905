//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! D3.js chart functions are split across `assets/js/*.js` and embedded at
//! compile time. They are evaluated as globals (no ES modules) and exposed
//! via `window.*`. This module serializes data and calls those globals, and
//! fetches the gzip-compressed track table.

use flate2::read::GzDecoder;
use std::io::Read;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static DATA_TABLE_JS: &str = include_str!("../assets/js/data-table.js");
static TRACK_MAP_JS: &str = include_str!("../assets/js/track-map.js");
static IMPACT_CHART_JS: &str = include_str!("../assets/js/impact-chart.js");

/// D3 bundle injected when the host page does not already provide one.
const D3_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";

/// Global functions promoted to `window.*` once the scripts are evaluated.
const CHART_FUNCTIONS: [&str; 6] = [
    "initTooltip",
    "showTooltip",
    "hideTooltip",
    "renderDataTable",
    "renderTrackMap",
    "renderImpactChart",
];

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('TCR JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Inject D3 if needed, then evaluate the chart scripts at global scope once
/// D3 is ready. Safe to call repeatedly.
pub fn init_charts() {
    let all_js = [TOOLTIP_JS, DATA_TABLE_JS, TRACK_MAP_JS, IMPACT_CHART_JS].join("\n");
    let store_js = format!(
        "if (!window.__tcrChartsReady) {{ window.__tcrChartScripts = {}; }}",
        serde_json::to_string(&all_js).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let promote: String = CHART_FUNCTIONS
        .iter()
        .map(|f| format!("if (typeof {f} !== 'undefined') window.{f} = {f};"))
        .collect::<Vec<_>>()
        .join("\n");

    let init_js = format!(
        r#"
        (function() {{
            if (window.__tcrChartsReady || window.__tcrChartsPending) return;
            window.__tcrChartsPending = true;
            if (typeof d3 === 'undefined' && !document.getElementById('tcr-d3')) {{
                var s = document.createElement('script');
                s.id = 'tcr-d3';
                s.src = '{D3_URL}';
                document.head.appendChild(s);
            }}
            var waitForD3 = setInterval(function() {{
                if (typeof d3 !== 'undefined') {{
                    clearInterval(waitForD3);
                    (0, eval)(window.__tcrChartScripts);
                    delete window.__tcrChartScripts;
                    {promote}
                    window.__tcrChartsReady = true;
                    console.log('TCR charts initialized');
                }}
            }}, 100);
        }})();
        "#
    );
    let _ = js_sys::eval(&init_js);
}

/// Call `window.<function>(container, data, config)` once the chart scripts
/// are loaded and the container exists in the DOM.
fn render_when_ready(function: &str, container_id: &str, data_json: &str, config_json: &str) {
    let escaped_data = escape_js(data_json);
    let escaped_config = escape_js(config_json);
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__tcrChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById('{container_id}')) {{
                    clearInterval(poll);
                    try {{
                        window.{function}('{container_id}', '{escaped_data}', '{escaped_config}');
                    }} catch(e) {{ console.error('[TCR] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Quote-escape JSON for embedding in a single-quoted JS string literal.
fn escape_js(json: &str) -> String {
    json.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "")
}

/// Draw the country outline and the triggered storm tracks, with points
/// coloured by wind speed.
pub fn render_track_map(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderTrackMap", container_id, data_json, config_json);
}

/// Render a sortable data table.
pub fn render_data_table(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderDataTable", container_id, data_json, config_json);
}

/// Render impact bars coloured by trigger status.
pub fn render_impact_chart(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderImpactChart", container_id, data_json, config_json);
}

/// Destroy/clean up a chart in the given container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var el = document.getElementById('{}'); if (el) el.innerHTML = '';",
        container_id
    ));
}

/// Fetch a gzip-compressed CSV relative to the page and return its text.
pub async fn fetch_gz_csv(url: &str) -> anyhow::Result<String> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("window not available"))?;
    let response_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch of {} failed: {:?}", url, e))?;
    let response: web_sys::Response = response_value
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("failed to cast fetch response"))?;
    if !response.ok() {
        anyhow::bail!("HTTP {} while fetching {}", response.status(), url);
    }

    let buffer_promise = response
        .array_buffer()
        .map_err(|e| anyhow::anyhow!("response.arrayBuffer() failed: {:?}", e))?;
    let buffer = JsFuture::from(buffer_promise)
        .await
        .map_err(|e| anyhow::anyhow!("reading {} failed: {:?}", url, e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    log::info!("[TCR Debug] fetched {} ({} compressed bytes)", url, bytes.len());
    decode_gz(&bytes)
}

/// Decompress gzip bytes into UTF-8 text.
pub fn decode_gz(bytes: &[u8]) -> anyhow::Result<String> {
    let mut text = String::new();
    GzDecoder::new(bytes).read_to_string(&mut text)?;
    Ok(text)
}
