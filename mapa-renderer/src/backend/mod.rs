//! Rendering backend implementations.

pub mod raster;
pub mod svg;

use crate::display::DisplayList;
use crate::{BackendType, RenderResult};

/// Trait for rendering backends.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Render a display list.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, list: &DisplayList) -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Encode the last rendered frame (SVG markup or PNG bytes).
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was rendered yet or encoding fails.
    fn encode_frame(&self) -> RenderResult<Vec<u8>>;
}
