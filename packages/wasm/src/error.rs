//! Error types for the Orbit Graph engine.
//!
//! Referential gaps, empty projects and resize storms are absorbed by the
//! engine and never show up here. These variants cover the cases a caller
//! can actually act on.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::graph::{Generation, PoseHandle};

/// Result type alias for engine operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Surface size is not a finite positive rectangle.
    #[error("invalid viewport {width}x{height}: both sides must be finite and positive")]
    InvalidViewport { width: f32, height: f32 },

    /// A pose write used a handle from a superseded layout generation.
    #[error("stale pose handle {handle} (current generation {current})")]
    StaleHandle {
        handle: PoseHandle,
        current: Generation,
    },

    /// A configuration value is outside its allowed range.
    #[error("invalid config {field} = {value}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Log level string not understood by the logger.
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    /// A JS payload could not be converted to or from Rust types.
    #[error("payload conversion failed: {0}")]
    Payload(String),

    /// The visualization was torn down.
    #[error("engine has been unmounted")]
    Unmounted,
}

impl From<serde_wasm_bindgen::Error> for GraphError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::Payload(err.to_string())
    }
}

impl From<GraphError> for JsValue {
    fn from(err: GraphError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
