//! WebAssembly bindings
//!
//! The page owns the canvas, the gravity slider and the pointer events; it
//! forwards them here and draws from the batch getters every frame.

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

use crate::config::{BoundaryLayout, SimConfig};
use crate::sim::{ClickOutcome, EdgeId, Endpoint, PointerInput, Simulation, Vector2};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (module reloaded by the page) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Ball Slope starting...");
}

/// Simulation handle for the page
#[wasm_bindgen]
pub struct WasmSimulation {
    sim: Simulation,
    input: PointerInput,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// Demo defaults with a slope
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_sim(Simulation::default())
    }

    /// Build from a JSON config; fails with the parse or validation message
    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(json: &str) -> Result<WasmSimulation, JsValue> {
        let config = SimConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_sim(Simulation::new(config)))
    }

    /// Switch between the slope ("slope") and the bounded region ("quad")
    #[wasm_bindgen(js_name = "setLayout")]
    pub fn set_layout(&mut self, layout: &str) -> bool {
        let layout = match layout {
            "slope" => BoundaryLayout::Slope,
            "quad" => BoundaryLayout::Quad,
            _ => {
                log::warn!("Unknown layout {:?}", layout);
                return false;
            }
        };
        self.sim.set_layout(layout);
        true
    }

    /// Advance one frame; returns true if the ball hit an edge
    pub fn step(&mut self) -> bool {
        self.sim.tick().hit()
    }

    #[wasm_bindgen(js_name = "setGravity")]
    pub fn set_gravity(&mut self, value: f64) -> f64 {
        self.sim.set_gravity_scalar(value)
    }

    pub fn gravity(&self) -> f64 {
        self.sim.gravity()
    }

    #[wasm_bindgen(js_name = "gravityRange")]
    pub fn gravity_range(&self) -> Float64Array {
        let g = &self.sim.config().gravity;
        Float64Array::from(&[g.min, g.max][..])
    }

    #[wasm_bindgen(js_name = "frameRate")]
    pub fn frame_rate(&self) -> u32 {
        self.sim.config().frame_rate
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.input.press(&self.sim, Vector2::new(x, y))
    }

    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.input.drag(&mut self.sim, Vector2::new(x, y));
    }

    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self) {
        self.input.release();
    }

    /// Canvas click; returns true if a ball was spawned
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.input.click(&mut self.sim, Vector2::new(x, y)) == ClickOutcome::Spawned
    }

    // ========================================================================
    // Batch getters
    // ========================================================================

    /// `[x, y, radius]`, or empty when there is no ball
    pub fn ball(&self) -> Float64Array {
        match self.sim.body() {
            Some(body) => Float64Array::from(&[body.position.x, body.position.y, body.radius][..]),
            None => Float64Array::new_with_length(0),
        }
    }

    /// `[sx, sy, ex, ey]` per edge, in collision order
    pub fn edges(&self) -> Float64Array {
        let flat: Vec<f64> = self
            .sim
            .edges()
            .iter()
            .flat_map(|e| [e.start().x, e.start().y, e.end().x, e.end().y])
            .collect();
        Float64Array::from(&flat[..])
    }

    /// `[x, y, w, h]` per drag handle, in the order the boundary lists them
    pub fn handles(&self) -> Float64Array {
        let flat: Vec<f64> = self
            .sim
            .boundary()
            .handles()
            .iter()
            .filter_map(|&(edge, endpoint)| crate::sim::input::handle_rect(&self.sim, edge, endpoint))
            .flat_map(|r| [r.min.x, r.min.y, r.max.x - r.min.x, r.max.y - r.min.y])
            .collect();
        Float64Array::from(&flat[..])
    }

    /// Move a slope endpoint directly: `end = false` for the start
    #[wasm_bindgen(js_name = "setSlopeEndpoint")]
    pub fn set_slope_endpoint(&mut self, end: bool, y: f64) -> Result<f64, JsValue> {
        let endpoint = if end { Endpoint::End } else { Endpoint::Start };
        self.sim
            .set_edge_endpoint(EdgeId::Slope, endpoint, y)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl WasmSimulation {
    fn with_sim(sim: Simulation) -> Self {
        Self {
            sim,
            input: PointerInput::new(),
        }
    }
}

impl Default for WasmSimulation {
    fn default() -> Self {
        Self::new()
    }
}
