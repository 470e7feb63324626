//! WASM bindings.
//!
//! The host page owns the frame loop: it hands trace JSON to a view, calls
//! `advance` from `requestAnimationFrame` with the elapsed milliseconds,
//! and mounts the SVG (or replays the JSON command list) it gets back.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { TourViewer } from 'optiviz';
//!
//! await init();
//! const viewer = new TourViewer();
//! viewer.load(JSON.stringify(response));
//! let last = performance.now();
//! function frame(now) {
//!     viewer.advance(now - last);
//!     last = now;
//!     document.getElementById('tour').innerHTML = viewer.render_svg();
//!     requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

// WASM-bindgen exports don't need #[must_use] - values returned to JS
#![allow(clippy::must_use_candidate)]

use wasm_bindgen::prelude::*;

use crate::config::VizConfig;
use crate::error::VizError;
use crate::schedule;
use crate::tour::TourView;
use crate::trace::Trace;

fn to_js(err: &VizError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn config_from(yaml: Option<String>) -> Result<VizConfig, JsValue> {
    yaml.map_or_else(
        || Ok(VizConfig::default()),
        |y| VizConfig::from_yaml(&y).map_err(|e| to_js(&e)),
    )
}

/// Animated tour view for the browser.
#[wasm_bindgen]
pub struct TourViewer {
    view: TourView,
}

#[wasm_bindgen]
impl TourViewer {
    /// Viewer with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            view: TourView::new(VizConfig::default()),
        }
    }

    /// Viewer with settings from YAML.
    #[wasm_bindgen]
    pub fn with_config(yaml: &str) -> Result<TourViewer, JsValue> {
        Ok(Self {
            view: TourView::new(config_from(Some(yaml.to_string()))?),
        })
    }

    /// Load an optimizer response. Restarts playback.
    #[wasm_bindgen]
    pub fn load(&mut self, trace_json: &str) -> Result<(), JsValue> {
        let trace = Trace::from_json(trace_json).map_err(|e| to_js(&e))?;
        self.view.load(trace.history, trace.best);
        Ok(())
    }

    /// Advance the animation clock.
    #[wasm_bindgen]
    pub fn advance(&mut self, elapsed_ms: f64) {
        let ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms.round() as u64
        } else {
            0
        };
        self.view.advance_by(ms);
    }

    /// Pointer entered node `node`; a negative value clears the hover.
    #[wasm_bindgen]
    pub fn hover(&mut self, node: i32) {
        self.view.hover(usize::try_from(node).ok());
    }

    /// Stop playback and show the placeholder.
    #[wasm_bindgen]
    pub fn cancel(&mut self) {
        self.view.cancel();
    }

    /// Whether playback is in progress.
    #[wasm_bindgen(getter)]
    pub fn animating(&self) -> bool {
        self.view.driver().is_animating()
    }

    /// Current frame as SVG.
    #[wasm_bindgen]
    pub fn render_svg(&mut self) -> String {
        self.view.render().to_svg()
    }

    /// Current frame as a JSON command list.
    #[wasm_bindgen]
    pub fn render_json(&mut self) -> Result<String, JsValue> {
        self.view
            .render()
            .to_json()
            .map_err(|e| to_js(&VizError::from(e)))
    }
}

impl Default for TourViewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a scheduling response as SVG.
#[wasm_bindgen]
pub fn render_schedule_svg(trace_json: &str, config_yaml: Option<String>) -> Result<String, JsValue> {
    let config = config_from(config_yaml)?;
    let trace = Trace::from_json(trace_json).map_err(|e| to_js(&e))?;
    Ok(schedule::render(&config, &trace.history, trace.best.as_ref()).to_svg())
}

/// Initialize the module: install the panic hook.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
