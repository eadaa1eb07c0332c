//! A headless viewer session.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use mapa_client::LayoutClient;
use mapa_core::{Action, EntityStore, ViewerConfig, ViewerState};

use crate::script::Step;

/// Interval between recenter animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Viewer state plus the container and clock the actions run against.
#[derive(Debug)]
pub struct Session {
    state: ViewerState,
    width: u32,
    height: u32,
    clock: Instant,
}

impl Session {
    /// Start a session with `store` loaded into a `width` x `height`
    /// container.
    #[must_use]
    pub fn new(store: EntityStore, config: ViewerConfig, width: u32, height: u32) -> Self {
        let state = ViewerState::new(config).reduce(&Action::LoadEntities(Arc::new(store)));
        tracing::debug!(
            "Session started: {} entities, viewport {:?}",
            state.store().len(),
            state.viewport()
        );
        Self {
            state,
            width,
            height,
            clock: Instant::now(),
        }
    }

    /// Current viewer state.
    #[must_use]
    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Container size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Apply one action.
    pub fn apply(&mut self, action: &Action) {
        self.state = self.state.reduce(action);
    }

    /// Run one scripted step, waiting out any animation it starts.
    pub async fn run(&mut self, step: &Step) {
        tracing::debug!("Step {step:?}");
        for action in step.actions(self.width, self.height, self.now_ms()) {
            self.apply(&action);
        }
        self.finish_animation().await;
    }

    /// Run every step in order.
    pub async fn run_all(&mut self, steps: &[Step]) {
        for step in steps {
            self.run(step).await;
        }
    }

    /// Feed frames to the running animation until it completes.
    pub async fn finish_animation(&mut self) {
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        let mut frames = 0u32;
        while let Some(token) = self.state.animation_token() {
            ticker.tick().await;
            let now_ms = self.now_ms();
            self.apply(&Action::Frame { token, now_ms });
            frames += 1;
        }
        if frames > 0 {
            tracing::debug!("Animation finished after {frames} frames");
        }
    }

    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }
}

/// Load a drawing: parsed documents (`.json`) are read directly, anything
/// else is uploaded to the layout service for parsing.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_drawing(path: &Path, client: &LayoutClient) -> anyhow::Result<EntityStore> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let store = EntityStore::from_json(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded {}: {} entities", path.display(), store.len());
        Ok(store)
    } else {
        client
            .upload_drawing_file(path)
            .await
            .with_context(|| format!("Failed to upload {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapa_client::ClientConfig;
    use mapa_core::{Entity, Point, ZoomDirection};

    fn store() -> EntityStore {
        EntityStore::new(vec![
            Entity::line("ESTRADAS", Point::new(0.0, 0.0), Point::new(400.0, 0.0)),
            Entity::circle("LOMBADAS", Point::new(200.0, 150.0), 10.0),
        ])
    }

    #[tokio::test]
    async fn test_recenter_runs_to_completion() {
        let config = ViewerConfig {
            animation_duration_ms: 40.0,
            ..ViewerConfig::default()
        };
        let mut session = Session::new(store(), config, 800, 600);
        session.run(&Step::Zoom(ZoomDirection::In)).await;
        session.run(&Step::Recenter).await;

        assert!(session.state().animation().is_none());
        let bounds = session.state().store().bounds().expect("bounds");
        let target = mapa_core::Viewport::from_bounds(&bounds, 100.0);
        let vp = session.state().viewport();
        assert!((vp.x - target.x).abs() < 1e-9);
        assert!((vp.w - target.w).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_pan_in_unit_container() {
        let mut session = Session::new(store(), ViewerConfig::default(), 500, 350);
        let before = session.state().viewport();
        session.run(&Step::Pan { dx: 25.0, dy: 0.0 }).await;
        let after = session.state().viewport();
        assert!(!session.state().is_panning());
        assert!((before.x - after.x - 25.0 * before.w / 500.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_json_drawing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("fazenda.json");
        std::fs::write(
            &file,
            r#"{"entidades": [{"type": "POINT", "position": [1, 2], "layer": "PONTOS"}], "layers": ["PONTOS"]}"#,
        )
        .expect("write");

        let client = LayoutClient::new(ClientConfig::default()).expect("client");
        let store = load_drawing(&file, &client).await.expect("load");
        assert_eq!(store.len(), 1);
    }
}
