//! Orbit Graph - WASM Module
//!
//! This module provides the layout and animation core for the Orbit Graph
//! radial diagram: areas on an ellipse, projects around their area, members
//! floating around their project. It is compiled to WebAssembly and exposes
//! a JavaScript-friendly API via wasm-bindgen; the host draws the frames.
//!
//! # Architecture
//!
//! - `hierarchy`: Areas, projects, members and their ring connections
//! - `layout`: Radial placement of anchors, extents and initial poses
//! - `graph`: Generation-tagged scene built on petgraph's StableGraph
//! - `animation`: Staggered, cancellable floating chains
//! - `viewport`: Debounced resize handling
//! - `render`: Frame snapshots and style tokens for the renderer
//! - `spatial`: R-tree spatial indexing for hit testing
//! - `engine`: Native orchestrator tying the above together

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod layout;
pub mod logging;
pub mod render;
pub mod spatial;
pub mod viewport;

use config::EngineConfig;
use engine::OrbitEngine;
use error::GraphError;
use hierarchy::{Hierarchy, HierarchyPayload, MemberId};
use viewport::ResizeOutcome;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = logging::init_logging("info");
}

/// Change the console log level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    logging::init_logging(level)?;
    Ok(())
}

/// Main entry point for the layout engine.
///
/// This struct wraps the native `OrbitEngine` and provides the public API
/// exposed to JavaScript. Every time-dependent call takes `now` in
/// milliseconds, typically `performance.now()`.
#[wasm_bindgen]
pub struct OrbitGraphWasm {
    engine: OrbitEngine,
}

#[wasm_bindgen]
impl OrbitGraphWasm {
    /// Create an engine. `config` is an optional partial `EngineConfig`
    /// object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<OrbitGraphWasm, JsValue> {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        Self::with_seed(config, seed)
    }

    /// Create an engine with a fixed random seed, for reproducible layouts.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(config: JsValue, seed: u64) -> Result<OrbitGraphWasm, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(GraphError::from)?
        };
        Ok(Self {
            engine: OrbitEngine::new(config, seed)?,
        })
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    /// Load `{ areas, projects, members }` (or `users`). Takes effect on the
    /// next `tick`.
    #[wasm_bindgen(js_name = setHierarchy)]
    pub fn set_hierarchy(&mut self, payload: JsValue) -> Result<(), JsValue> {
        let payload: HierarchyPayload =
            serde_wasm_bindgen::from_value(payload).map_err(GraphError::from)?;
        self.engine.set_hierarchy(Hierarchy::from(payload))?;
        Ok(())
    }

    /// Report the drawing surface size.
    ///
    /// Returns `true` if a relayout will run on the next `tick`, `false` if
    /// the size is debounced or unchanged.
    pub fn resize(&mut self, width: f32, height: f32, now: f64) -> Result<bool, JsValue> {
        let outcome = self.engine.resize(width, height, now)?;
        Ok(outcome == ResizeOutcome::Immediate)
    }

    /// Report the window size; the page header strip is subtracted.
    #[wasm_bindgen(js_name = resizeWindow)]
    pub fn resize_window(&mut self, width: f32, height: f32, now: f64) -> Result<bool, JsValue> {
        let outcome = self.engine.resize_window(width, height, now)?;
        Ok(outcome == ResizeOutcome::Immediate)
    }

    /// Advance to `now` and return the frame snapshot as a JS object.
    pub fn tick(&mut self, now: f64) -> Result<JsValue, JsValue> {
        let frame = self.engine.tick(now)?;
        let value = serde_wasm_bindgen::to_value(&frame).map_err(GraphError::from)?;
        Ok(value)
    }

    /// Stop every animation chain and drop the layout.
    pub fn unmount(&mut self) {
        self.engine.unmount();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current layout generation.
    pub fn generation(&self) -> u32 {
        self.engine.generation().raw()
    }

    #[wasm_bindgen(js_name = memberCount)]
    pub fn member_count(&self) -> u32 {
        self.engine.scene().member_count() as u32
    }

    /// Find the member drawn nearest to a point in the last frame.
    #[wasm_bindgen(js_name = memberAt)]
    pub fn member_at(&mut self, x: f32, y: f32, max_distance: f32) -> Option<u32> {
        self.engine.member_at(x, y, max_distance).map(MemberId::raw)
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Get a zero-copy view of member pose X positions, in scene slot order.
    ///
    /// These are step targets; the frame from `tick` carries the eased
    /// positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately and do not store.
    #[wasm_bindgen(js_name = getPositionsXView)]
    pub fn get_positions_x_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.scene().positions_x()) }
    }

    /// Get a zero-copy view of member pose Y positions.
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    #[wasm_bindgen(js_name = getPositionsYView)]
    pub fn get_positions_y_view(&self) -> Float32Array {
        unsafe { Float32Array::view(self.engine.scene().positions_y()) }
    }

    #[wasm_bindgen(js_name = positionsLen)]
    pub fn positions_len(&self) -> usize {
        self.engine.scene().positions_x().len()
    }
}
