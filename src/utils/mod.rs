//! Utility functions and data structures.
//!
//! - [`app_data`] - Configuration and index cache locations (XDG-compliant)
//! - [`progress`] - Progress bars that compile away without the `progress` feature

pub mod app_data;
pub mod progress;

pub use app_data::*;
