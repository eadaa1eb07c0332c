//! Actions the viewer reducer understands.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{AnimationToken, EntityStore, ZoomDirection};

/// A pointer-move delta during a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanDelta {
    /// Horizontal movement in pixels.
    pub dx_px: f64,
    /// Vertical movement in pixels (screen Y, down is positive).
    pub dy_px: f64,
    /// Container width in pixels.
    pub client_width_px: f64,
    /// Container height in pixels.
    pub client_height_px: f64,
}

/// One user or system input applied to a [`ViewerState`](crate::ViewerState).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the drawing, show every layer and fit the viewport.
    LoadEntities(Arc<EntityStore>),

    /// One wheel zoom step. Ignored while the layer overlay has focus.
    Zoom(ZoomDirection),

    /// One zoom-button step. Applies regardless of overlay focus.
    ZoomButton(ZoomDirection),

    /// Pointer pressed: start a drag gesture.
    BeginPan,

    /// Pointer moved while dragging.
    Pan(PanDelta),

    /// Pointer released.
    EndPan,

    /// Globally enable or disable drag panning.
    SetPanEnabled(bool),

    /// The layer-selection overlay gained (`true`) or lost input focus.
    SetOverlayFocus(bool),

    /// Start animating the viewport to fit the drawing.
    Recenter {
        /// Wall-clock timestamp in milliseconds.
        now_ms: f64,
    },

    /// An animation frame for the animation started under `token`.
    Frame {
        /// Token of the animation this frame was scheduled for.
        token: AnimationToken,
        /// Wall-clock timestamp in milliseconds.
        now_ms: f64,
    },

    /// Show or hide a layer.
    ToggleLayer(String),

    /// Add or remove a layer from the tabular summary selection.
    ToggleTableLayer(String),

    /// Enable or disable hiding parcel-area labels.
    SetRemoveAreaLabels(bool),
}

impl Action {
    /// Whether applying this action can move the viewport.
    #[must_use]
    pub fn affects_viewport(&self) -> bool {
        matches!(
            self,
            Self::LoadEntities(_)
                | Self::Zoom(_)
                | Self::ZoomButton(_)
                | Self::Pan(_)
                | Self::Recenter { .. }
        )
    }
}
