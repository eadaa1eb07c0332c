//! Viewer state and its reducer.
//!
//! [`ViewerState`] is an immutable snapshot; [`ViewerState::reduce`] maps a
//! snapshot and an [`Action`] to the next snapshot without side effects.
//! Time enters only through the timestamps carried by actions.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    Action, Animation, AnimationToken, Entity, EntityStore, PanDelta, Viewport, ViewerConfig,
    ZoomDirection,
};

/// The complete state of one viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    store: Arc<EntityStore>,
    viewport: Viewport,
    visible: BTreeSet<String>,
    table_layers: BTreeSet<String>,
    remove_area_labels: bool,
    panning: bool,
    pan_enabled: bool,
    overlay_focus: bool,
    generation: u64,
    animation: Option<Animation>,
    config: ViewerConfig,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewerState {
    /// An empty viewer.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            store: Arc::new(EntityStore::default()),
            viewport: Viewport::default(),
            visible: BTreeSet::new(),
            table_layers: BTreeSet::new(),
            remove_area_labels: true,
            panning: false,
            pan_enabled: true,
            overlay_focus: false,
            generation: 0,
            animation: None,
            config,
        }
    }

    /// Apply `action`, returning the next state.
    #[must_use]
    pub fn reduce(&self, action: &Action) -> Self {
        let mut next = self.clone();
        match action {
            Action::LoadEntities(store) => next.load(store),
            Action::Zoom(direction) => {
                if self.overlay_focus {
                    tracing::debug!("Zoom ignored: layer overlay owns wheel input");
                } else {
                    next.zoom(*direction);
                }
            }
            Action::ZoomButton(direction) => next.zoom(*direction),
            Action::BeginPan => {
                if self.pan_enabled && !self.panning {
                    next.panning = true;
                }
            }
            Action::Pan(delta) => next.pan(delta),
            Action::EndPan => next.panning = false,
            Action::SetPanEnabled(enabled) => {
                next.pan_enabled = *enabled;
                if !enabled {
                    next.panning = false;
                }
            }
            Action::SetOverlayFocus(focused) => next.overlay_focus = *focused,
            Action::Recenter { now_ms } => next.recenter(*now_ms),
            Action::Frame { token, now_ms } => next.frame(*token, *now_ms),
            Action::ToggleLayer(layer) => {
                if self.store.layers().contains(layer) {
                    toggle(&mut next.visible, layer);
                } else {
                    tracing::debug!("Toggle ignored for unknown layer {layer:?}");
                }
            }
            Action::ToggleTableLayer(layer) => {
                if self.store.layers().contains(layer) {
                    toggle(&mut next.table_layers, layer);
                } else {
                    tracing::debug!("Table toggle ignored for unknown layer {layer:?}");
                }
            }
            Action::SetRemoveAreaLabels(remove) => next.remove_area_labels = *remove,
        }
        next
    }

    fn load(&mut self, store: &Arc<EntityStore>) {
        self.store = Arc::clone(store);
        self.visible = store.layers().clone();
        self.table_layers.clear();
        self.panning = false;
        self.invalidate_animation();
        match store.bounds() {
            Some(bounds) => {
                self.viewport = Viewport::from_bounds(&bounds, self.config.initial_padding);
            }
            None => tracing::debug!("Drawing has no extent; viewport unchanged"),
        }
    }

    fn zoom(&mut self, direction: ZoomDirection) {
        self.invalidate_animation();
        self.viewport = self.viewport.zoomed(direction, self.config.zoom_factor);
    }

    fn pan(&mut self, delta: &PanDelta) {
        if !(self.panning && self.pan_enabled) {
            return;
        }
        self.invalidate_animation();
        self.viewport = self.viewport.panned(
            delta.dx_px,
            delta.dy_px,
            delta.client_width_px,
            delta.client_height_px,
        );
    }

    fn recenter(&mut self, now_ms: f64) {
        let Some(bounds) = self.store.bounds() else {
            return;
        };
        self.invalidate_animation();
        self.animation = Some(Animation {
            token: AnimationToken(self.generation),
            from: self.viewport,
            to: Viewport::from_bounds(&bounds, self.config.recenter_padding),
            started_at_ms: now_ms,
            duration_ms: self.config.animation_duration_ms,
        });
    }

    fn frame(&mut self, token: AnimationToken, now_ms: f64) {
        match self.animation {
            Some(anim) if anim.token == token => {
                self.viewport = anim.sample(now_ms);
                if anim.is_finished(now_ms) {
                    self.animation = None;
                }
            }
            _ => tracing::debug!("Stale animation frame {token:?} ignored"),
        }
    }

    fn invalidate_animation(&mut self) {
        self.generation += 1;
        self.animation = None;
    }

    /// The loaded drawing.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Layers currently rendered.
    #[must_use]
    pub fn visible_layers(&self) -> &BTreeSet<String> {
        &self.visible
    }

    /// Whether `layer` is rendered.
    #[must_use]
    pub fn is_layer_visible(&self, layer: &str) -> bool {
        self.visible.contains(layer)
    }

    /// Layers selected for the tabular summary.
    #[must_use]
    pub fn table_layers(&self) -> &BTreeSet<String> {
        &self.table_layers
    }

    /// Whether parcel-area labels are hidden.
    #[must_use]
    pub fn remove_area_labels(&self) -> bool {
        self.remove_area_labels
    }

    /// Whether a drag gesture is active.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Whether drag panning is enabled.
    #[must_use]
    pub fn pan_enabled(&self) -> bool {
        self.pan_enabled
    }

    /// Whether the layer overlay owns wheel input.
    #[must_use]
    pub fn overlay_focus(&self) -> bool {
        self.overlay_focus
    }

    /// The in-flight recenter animation, if any.
    #[must_use]
    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Token frames must carry to advance the in-flight animation.
    #[must_use]
    pub fn animation_token(&self) -> Option<AnimationToken> {
        self.animation.map(|a| a.token)
    }

    /// Viewer configuration.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Entities on visible layers, in drawing order.
    pub fn visible_entities(&self) -> impl Iterator<Item = &Entity> {
        self.store.visible(&self.visible)
    }
}

fn toggle(set: &mut BTreeSet<String>, layer: &str) {
    if !set.remove(layer) {
        set.insert(layer.to_string());
    }
}
