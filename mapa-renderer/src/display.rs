//! Backend-agnostic display list.
//!
//! A [`DisplayList`] is the ordered sequence of styled primitives the scene
//! renderer produces. Coordinates are in render space (Y down). Both the
//! SVG serializer and the rasterizer consume the same list, so what is shown
//! and what is exported never diverge.

use mapa_core::Point;
use serde::{Deserialize, Serialize};

/// Dash pattern shared by dashed chains and the capture overlay.
pub const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    /// Nothing painted.
    None,
    /// A CSS color string.
    Color(String),
}

impl Paint {
    /// This paint as an SVG attribute value.
    #[must_use]
    pub fn as_attr(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Color(c) => c,
        }
    }
}

/// Presentation attributes of one primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Interior paint.
    pub fill: Paint,
    /// Outline paint.
    pub stroke: Paint,
    /// Outline width, `None` for the user-agent default.
    pub stroke_width: Option<f64>,
    /// Dash pattern, `None` for a solid outline.
    pub dash: Option<[f64; 2]>,
    /// Paint the stroke below the fill (text halos).
    pub stroke_below_fill: bool,
}

impl Style {
    /// A plain outline in `color`.
    #[must_use]
    pub fn stroked(color: &str) -> Self {
        Self {
            fill: Paint::None,
            stroke: Paint::Color(color.to_string()),
            stroke_width: None,
            dash: None,
            stroke_below_fill: false,
        }
    }

    /// Outline and interior both in `color`.
    #[must_use]
    pub fn solid(color: &str) -> Self {
        Self {
            fill: Paint::Color(color.to_string()),
            ..Self::stroked(color)
        }
    }

    /// Interior only.
    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self {
            stroke: Paint::None,
            ..Self::solid(color)
        }
    }

    /// Same style with the standard dash pattern.
    #[must_use]
    pub fn dashed(self) -> Self {
        Self {
            dash: Some(DASH_PATTERN),
            ..self
        }
    }
}

/// A drawing primitive in render coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Axis-aligned rectangle.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices.
        points: Vec<Point>,
    },
    /// Ellipse rotated about its center.
    Ellipse {
        /// Center.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
        /// Rotation in degrees, clockwise on screen.
        rotation_deg: f64,
    },
    /// Circular arc drawn with sweep flag 0.
    Arc {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Radius.
        radius: f64,
        /// Take the long way around.
        large_arc: bool,
    },
    /// Text anchored at `position`.
    Text {
        /// Anchor.
        position: Point,
        /// Content.
        content: String,
        /// Font size in user units.
        font_size: f64,
        /// Rotation about the anchor in degrees, clockwise on screen.
        rotation_deg: f64,
    },
}

impl Primitive {
    /// Whether this is a text primitive.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// One entry of a [`DisplayList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// What to draw.
    pub primitive: Primitive,
    /// How to draw it.
    pub style: Style,
    /// Source layer, `None` for decoration.
    pub layer: Option<String>,
    /// Capture-only decoration, dropped from exported copies.
    pub overlay: bool,
}

/// Ordered primitives plus the region they are viewed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    /// Visible region in render space: `[x, y, w, h]`.
    pub view_box: [f64; 4],
    items: Vec<DisplayItem>,
}

impl DisplayList {
    /// An empty list viewed through `view_box`.
    #[must_use]
    pub fn new(view_box: [f64; 4]) -> Self {
        Self {
            view_box,
            items: Vec::new(),
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: DisplayItem) {
        self.items.push(item);
    }

    /// Items in draw order.
    #[must_use]
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items drawn for `layer`.
    pub fn on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a DisplayItem> {
        self.items
            .iter()
            .filter(move |item| item.layer.as_deref() == Some(layer))
    }

    /// A copy with every capture-only overlay item removed.
    #[must_use]
    pub fn without_overlay(&self) -> Self {
        Self {
            view_box: self.view_box,
            items: self.items.iter().filter(|i| !i.overlay).cloned().collect(),
        }
    }
}

impl Extend<DisplayItem> for DisplayList {
    fn extend<T: IntoIterator<Item = DisplayItem>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
