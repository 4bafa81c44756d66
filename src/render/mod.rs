//! Rendering module for serializing the assembled document model.

mod json;

pub use json::{to_json, JsonFormat};
