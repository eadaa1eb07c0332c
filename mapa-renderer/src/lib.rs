//! # Mapa Renderer
//!
//! Maps visible drawing entities to a backend-agnostic display list and
//! renders that list to SVG markup or to a bitmap.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────────┐
//! │ ViewerState  │──▶│ SceneRenderer│──▶│      DisplayList      │
//! └──────────────┘   └──────────────┘   └───────────┬───────────┘
//!                                                   │
//!                         ┌─────────────────────────┼───────────────┐
//!                         ▼                         ▼               ▼
//!                   ┌───────────┐           ┌──────────────┐ ┌─────────────┐
//!                   │ SvgBackend│           │ RasterBackend│ │SceneCapturer│
//!                   │ (markup)  │           │ (resvg)      │ │ (export)    │
//!                   └───────────┘           └──────────────┘ └─────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod color;
pub mod display;
pub mod error;
pub mod export;
pub mod rules;
pub mod scene;

pub use backend::RenderBackend;
pub use color::resolve_color;
pub use display::{DisplayItem, DisplayList, Paint, Primitive, Style};
pub use error::{RenderError, RenderResult};
pub use export::{CaptureArtifact, CaptureConfig, SceneCapturer};
pub use rules::{LayerClass, LayerRules};
pub use scene::{SceneInput, SceneRenderer};

use mapa_core::ViewerState;

use backend::raster::{RasterBackend, RasterOptions};
use backend::svg::SvgBackend;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Backend frames are rendered with.
    pub backend: BackendType,
    /// Container width in pixels.
    pub width: u32,
    /// Container height in pixels.
    pub height: u32,
    /// Layer styling rules.
    pub rules: LayerRules,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::Svg,
            width: 800,
            height: 600,
            rules: LayerRules::default(),
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// SVG markup.
    Svg,
    /// Bitmap at container size.
    Raster,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    scene: SceneRenderer,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let backend = Self::create_backend(&config);
        Self {
            scene: SceneRenderer::new(config.rules.clone()),
            config,
            backend,
            frame_count: 0,
        }
    }

    fn create_backend(config: &RendererConfig) -> Box<dyn RenderBackend> {
        match config.backend {
            BackendType::Svg => Box::new(SvgBackend::new(config.width, config.height)),
            BackendType::Raster => Box::new(RasterBackend::new(
                config.width,
                config.height,
                RasterOptions::default(),
            )),
        }
    }

    /// Render one frame of `state`, returning the display list drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to render.
    pub fn render_frame(&mut self, state: &ViewerState) -> RenderResult<DisplayList> {
        let list = self.scene.render(&SceneInput::from(state));
        self.backend.render(&list)?;
        self.frame_count += 1;
        tracing::trace!(
            "Frame {}: {} items via {:?}",
            self.frame_count,
            list.len(),
            self.backend.backend_type()
        );
        Ok(list)
    }

    /// Encoded output of the last frame.
    ///
    /// # Errors
    ///
    /// Returns an error if no frame was rendered or encoding fails.
    pub fn encode_frame(&self) -> RenderResult<Vec<u8>> {
        self.backend.encode_frame()
    }

    /// The scene renderer in use.
    #[must_use]
    pub fn scene(&self) -> &SceneRenderer {
        &self.scene
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }
}
