//! JSON-RPC 2.0 communication layer for the browser control panel.
//!
//! The viewer runs inside an iframe; the surrounding page owns the sliders
//! and colour picker and posts JSON-RPC messages over `window.postMessage`.
//! Requests carry an id and receive a response, notifications do not.
//!
//! Methods:
//! - `set_generation_params`: partial parameter patch, triggers a rebuild
//! - `set_auto_rotate`: toggle the camera auto-rotation
//! - `get_generation_params`: current parameter set
//! - `get_fps`: smoothed frame rate

pub mod web_rpc;
