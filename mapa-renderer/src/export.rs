//! Scene capture for export.
//!
//! A capture copies the display list without its overlay, serializes the
//! copy to SVG and rasterizes that markup at a fixed supersampling factor.
//! The markup in the resulting [`CaptureArtifact`] is byte-for-byte the
//! document that was rasterized.

use serde::{Deserialize, Serialize};

use crate::backend::raster::{rasterize, RasterOptions};
use crate::backend::svg::to_markup;
use crate::display::DisplayList;
use crate::error::{RenderError, RenderResult};

/// Configuration for scene capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Supersampling factor applied to the on-screen size (default: 3).
    pub scale: u32,
    /// Background color as RGBA bytes (default: transparent).
    pub background: Option<[u8; 4]>,
    /// Load system fonts so labels appear in the bitmap (default: true).
    pub load_system_fonts: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            background: None,
            load_system_fonts: true,
        }
    }
}

/// One captured view: the exported markup and its bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureArtifact {
    /// Overlay-free SVG markup at on-screen size.
    pub svg: String,
    /// PNG encoding of the supersampled bitmap.
    pub png: Vec<u8>,
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
}

/// Captures display lists.
#[derive(Debug, Clone, Default)]
pub struct SceneCapturer {
    config: CaptureConfig,
}

impl SceneCapturer {
    /// Create a capturer with the given configuration.
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Create a capturer with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Capture configuration.
    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Capture `list` as seen in a `client_width` x `client_height` pixel
    /// container.
    ///
    /// Returns `None` when no rasterization surface is available; the
    /// failure is logged, never raised.
    #[must_use]
    pub fn capture(
        &self,
        list: &DisplayList,
        client_width: u32,
        client_height: u32,
    ) -> Option<CaptureArtifact> {
        match self.try_capture(list, client_width, client_height) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::warn!("Capture failed: {e}");
                None
            }
        }
    }

    /// Capture `list`, reporting why a capture failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be rasterized or encoded.
    pub fn try_capture(
        &self,
        list: &DisplayList,
        client_width: u32,
        client_height: u32,
    ) -> RenderResult<CaptureArtifact> {
        let exported = list.without_overlay();
        let svg = to_markup(&exported, client_width, client_height);
        let options = RasterOptions {
            scale: self.config.scale,
            background: self.config.background,
            load_system_fonts: self.config.load_system_fonts,
        };
        let pixmap = rasterize(&svg, client_width, client_height, &options)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;

        tracing::debug!(
            "Captured {} items at {}x{}",
            exported.len(),
            pixmap.width(),
            pixmap.height()
        );
        Ok(CaptureArtifact {
            svg,
            png,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }
}
