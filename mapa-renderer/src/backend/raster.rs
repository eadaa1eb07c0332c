//! Raster backend built on resvg/tiny-skia.
//!
//! Display lists are serialized to SVG and rasterized, so the bitmap is
//! always produced from exactly the markup that would be exported.

use crate::display::DisplayList;
use crate::{BackendType, RenderError, RenderResult};

use super::svg::to_markup;
use super::RenderBackend;

/// Rasterization parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOptions {
    /// Integer supersampling factor applied to both dimensions.
    pub scale: u32,
    /// Background color as RGBA bytes, `None` for transparent.
    pub background: Option<[u8; 4]>,
    /// Load system fonts so text is rasterized.
    pub load_system_fonts: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            background: None,
            load_system_fonts: true,
        }
    }
}

/// Rasterize SVG markup whose root is `width` x `height` pixels into a
/// pixmap `scale` times larger on each axis.
///
/// # Errors
///
/// Returns [`RenderError::Svg`] if the markup does not parse and
/// [`RenderError::Surface`] if no pixmap of the requested size can be
/// allocated.
pub fn rasterize(
    markup: &str,
    width: u32,
    height: u32,
    options: &RasterOptions,
) -> RenderResult<tiny_skia::Pixmap> {
    let (px_w, px_h) = width
        .checked_mul(options.scale)
        .zip(height.checked_mul(options.scale))
        .ok_or_else(|| {
            RenderError::Surface(format!(
                "{width}x{height} at scale {} overflows",
                options.scale
            ))
        })?;

    let mut opt = usvg::Options::default();
    if options.load_system_fonts {
        opt.fontdb_mut().load_system_fonts();
    }
    let tree =
        usvg::Tree::from_str(markup, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h).ok_or_else(|| {
        RenderError::Surface(format!("cannot allocate a {px_w}x{px_h} pixmap"))
    })?;
    if let Some([r, g, b, a]) = options.background {
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    #[allow(clippy::cast_precision_loss)]
    let (sx, sy) = (
        px_w as f32 / tree.size().width(),
        px_h as f32 / tree.size().height(),
    );
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Renders display lists into an in-memory pixmap.
pub struct RasterBackend {
    width: u32,
    height: u32,
    options: RasterOptions,
    frame: Option<tiny_skia::Pixmap>,
}

impl RasterBackend {
    /// Create a backend for a `width` x `height` pixel container.
    #[must_use]
    pub fn new(width: u32, height: u32, options: RasterOptions) -> Self {
        Self {
            width,
            height,
            options,
            frame: None,
        }
    }

    /// The last rendered frame.
    #[must_use]
    pub fn frame(&self) -> Option<&tiny_skia::Pixmap> {
        self.frame.as_ref()
    }
}

impl RenderBackend for RasterBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Raster
    }

    fn render(&mut self, list: &DisplayList) -> RenderResult<()> {
        let markup = to_markup(list, self.width, self.height);
        self.frame = Some(rasterize(&markup, self.width, self.height, &self.options)?);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::Surface(format!(
                "invalid surface size {width}x{height}"
            )));
        }
        self.width = width;
        self.height = height;
        self.frame = None;
        tracing::debug!("Raster backend resized to {}x{}", width, height);
        Ok(())
    }

    fn encode_frame(&self) -> RenderResult<Vec<u8>> {
        self.frame
            .as_ref()
            .ok_or(RenderError::NoFrame)?
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}
