//! Layer-based styling rules.

use serde::{Deserialize, Serialize};

/// Names that select special styling for a layer.
///
/// Matching runs against the upper-cased layer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRules {
    /// Substring marking berm layers, whose closed shapes are filled.
    pub fill_marker: String,
    /// Exact name of the legend layer.
    pub legend_layer: String,
    /// Substring marking parcel-numbering layers.
    pub numbering_marker: String,
}

impl Default for LayerRules {
    fn default() -> Self {
        Self {
            fill_marker: "LOMB".to_string(),
            legend_layer: "XLEGENDA SISTEMATIZAÇÃO".to_string(),
            numbering_marker: "NUMERAÇÕES DOS TALHÕES".to_string(),
        }
    }
}

/// How a single layer is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerClass {
    /// The legend layer: polylines and solids become filled triangles.
    pub legend: bool,
    /// Circles and ellipses are filled.
    pub fill: bool,
    /// Parcel numbering: unscaled text with a white halo.
    pub numbering: bool,
}

impl LayerRules {
    /// Classify `layer`.
    #[must_use]
    pub fn classify(&self, layer: &str) -> LayerClass {
        let upper = layer.to_uppercase();
        let legend = upper == self.legend_layer.to_uppercase();
        LayerClass {
            legend,
            fill: legend || upper.contains(&self.fill_marker.to_uppercase()),
            numbering: upper.contains(&self.numbering_marker.to_uppercase()),
        }
    }
}
