//! Export payload assembly.
//!
//! An [`ExportPayload`] is everything the layout service needs to lay out
//! the current view: selections, viewport, the captured markup and bitmap,
//! the visible entities and the title-block form.

use mapa_core::{Viewport, ViewerState};
use mapa_renderer::{CaptureArtifact, SceneCapturer, SceneInput, SceneRenderer};
use reqwest::multipart::{Form, Part};

use crate::error::{ClientError, ClientResult};
use crate::form::LayoutForm;

/// Extension of drawing files as named on the service side.
pub const DRAWING_EXTENSION: &str = ".dxf";

/// File part carrying the vector markup.
pub const SVG_PART: (&str, &str, &str) = ("svg", "mapa.svg", "image/svg+xml");
/// File part carrying the supersampled bitmap.
pub const PNG_PART: (&str, &str, &str) = ("mapa", "mapa.png", "image/png");
/// File part carrying the visible entity list.
pub const ENTITIES_PART: (&str, &str, &str) = (
    "entidades_visiveis",
    "entidades_visiveis.txt",
    "application/json",
);

/// `name` without a trailing `.dxf` (any case).
#[must_use]
pub fn drawing_stem(name: &str) -> &str {
    let cut = name.len().saturating_sub(DRAWING_EXTENSION.len());
    match name.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(DRAWING_EXTENSION) => &name[..cut],
        _ => name,
    }
}

/// The drawing name sent to the service: `<stem>.dxf`.
#[must_use]
pub fn drawing_name(stem: &str) -> String {
    format!("{stem}{DRAWING_EXTENSION}")
}

/// One layout submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    /// Drawing file name, `<stem>.dxf`.
    pub drawing_name: String,
    /// Layers feeding the tabular summary.
    pub table_layers: Vec<String>,
    /// Viewport at capture time.
    pub viewport: Viewport,
    /// Layers visible at capture time.
    pub visible_layers: Vec<String>,
    /// Whether parcel-area labels were hidden.
    pub remove_area_labels: bool,
    /// Overlay-free SVG markup.
    pub svg: String,
    /// PNG bitmap.
    pub png: Vec<u8>,
    /// JSON array of the visible entities.
    pub visible_entities: String,
    /// Title-block fields.
    pub form: LayoutForm,
}

impl ExportPayload {
    /// Build a payload from a viewer snapshot and its capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the visible entities cannot be serialized.
    pub fn assemble(
        state: &ViewerState,
        drawing_name: impl Into<String>,
        artifact: CaptureArtifact,
        form: LayoutForm,
    ) -> ClientResult<Self> {
        let visible_entities = state.store().visible_json(state.visible_layers())?;
        Ok(Self {
            drawing_name: drawing_name.into(),
            table_layers: state.table_layers().iter().cloned().collect(),
            viewport: state.viewport(),
            visible_layers: state.visible_layers().iter().cloned().collect(),
            remove_area_labels: state.remove_area_labels(),
            svg: artifact.svg,
            png: artifact.png,
            visible_entities,
            form,
        })
    }

    /// Render and capture `state` in a `width` x `height` container, then
    /// assemble the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Capture`] when the view cannot be rasterized.
    pub fn capture(
        state: &ViewerState,
        renderer: &SceneRenderer,
        capturer: &SceneCapturer,
        (width, height): (u32, u32),
        drawing_name: impl Into<String>,
        form: LayoutForm,
    ) -> ClientResult<Self> {
        let list = renderer.render(&SceneInput::from(state));
        let artifact = capturer
            .capture(&list, width, height)
            .ok_or(ClientError::Capture)?;
        Self::assemble(state, drawing_name, artifact, form)
    }

    /// Text fields in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error if a selection cannot be serialized.
    pub fn text_fields(&self) -> ClientResult<Vec<(&'static str, String)>> {
        let mut fields = vec![
            ("nome_arquivo", self.drawing_name.clone()),
            ("selected_layers", serde_json::to_string(&self.table_layers)?),
            ("viewBox", serde_json::to_string(&self.viewport)?),
            ("layers_visiveis", serde_json::to_string(&self.visible_layers)?),
            (
                "remover_areas_talhoes",
                if self.remove_area_labels { "1" } else { "0" }.to_string(),
            ),
        ];
        fields.extend(self.form.fields());
        Ok(fields)
    }

    /// Convert into a multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be encoded.
    pub fn into_multipart(self) -> ClientResult<Form> {
        let mut form = Form::new();
        for (name, value) in self.text_fields()? {
            form = form.text(name, value);
        }
        Ok(form
            .part(SVG_PART.0, file_part(self.svg.into_bytes(), SVG_PART)?)
            .part(PNG_PART.0, file_part(self.png, PNG_PART)?)
            .part(
                ENTITIES_PART.0,
                file_part(self.visible_entities.into_bytes(), ENTITIES_PART)?,
            ))
    }
}

fn file_part(bytes: Vec<u8>, (_, file_name, mime): (&str, &'static str, &str)) -> ClientResult<Part> {
    Ok(Part::bytes(bytes).file_name(file_name).mime_str(mime)?)
}
