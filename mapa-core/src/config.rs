//! Viewer tuning constants.

use serde::{Deserialize, Serialize};

/// Configuration for viewport behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Padding around the drawing extent when a drawing is loaded.
    pub initial_padding: f64,
    /// Padding around the drawing extent when recentering.
    pub recenter_padding: f64,
    /// Scale applied per zoom step.
    pub zoom_factor: f64,
    /// Duration of the recenter animation in milliseconds.
    pub animation_duration_ms: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_padding: 50.0,
            recenter_padding: 100.0,
            zoom_factor: 1.1,
            animation_duration_ms: 300.0,
        }
    }
}
