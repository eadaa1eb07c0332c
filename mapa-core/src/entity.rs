//! Drawing entities - the parsed geometric records a drawing is made of.
//!
//! [`Entity`] mirrors the record shape emitted by the drawing parser: a
//! `type` tag, a layer, a color and a bag of optional geometry fields.
//! [`Entity::shape`] turns a record into a closed [`Shape`] when the fields
//! its kind requires are present; records that fail that check are simply
//! not renderable.

use serde::{Deserialize, Serialize};

/// A 2D point in model space (Y axis up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Map this point into render space, where Y grows downwards.
    #[must_use]
    pub fn to_render(self) -> Self {
        // `0.0 - y` rather than `-y` so the origin stays `+0`.
        Self {
            x: self.x,
            y: 0.0 - self.y,
        }
    }
}

/// A coordinate tuple as emitted by the parser: `[x, y]` or `[x, y, z]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coord(pub Vec<f64>);

impl Coord {
    /// The planar point, if the tuple carries at least two components.
    #[must_use]
    pub fn point(&self) -> Option<Point> {
        match self.0.as_slice() {
            [x, y, ..] => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

impl From<Point> for Coord {
    fn from(p: Point) -> Self {
        Self(vec![p.x, p.y])
    }
}

/// Entity color: an RGB triple in unit range or a CSS color string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityColor {
    /// Red, green, blue in `0.0..=1.0`.
    Rgb([f64; 3]),
    /// Named or hex color, passed through to the renderer.
    Named(String),
}

impl Default for EntityColor {
    fn default() -> Self {
        Self::Rgb([0.0, 0.0, 0.0])
    }
}

/// The kind tag of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    /// `LINE`
    Line,
    /// `CIRCLE`
    Circle,
    /// `POLYLINE`
    Polyline,
    /// `LWPOLYLINE`
    LwPolyline,
    /// `SOLID`
    Solid,
    /// `ELLIPSE`
    Ellipse,
    /// `ARC`
    Arc,
    /// `SPLINE`
    Spline,
    /// `LEADER`
    Leader,
    /// `DIMENSION`
    Dimension,
    /// `POINT`
    Point,
    /// `TEXT`
    Text,
    /// `MTEXT`
    MText,
    /// `ATTRIB`
    Attrib,
    /// `ATTDEF`
    AttDef,
    /// `HATCH` - never rendered.
    Hatch,
    /// Any tag the viewer does not know how to draw.
    Other(String),
}

impl EntityKind {
    /// The wire tag for this kind.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Line => "LINE",
            Self::Circle => "CIRCLE",
            Self::Polyline => "POLYLINE",
            Self::LwPolyline => "LWPOLYLINE",
            Self::Solid => "SOLID",
            Self::Ellipse => "ELLIPSE",
            Self::Arc => "ARC",
            Self::Spline => "SPLINE",
            Self::Leader => "LEADER",
            Self::Dimension => "DIMENSION",
            Self::Point => "POINT",
            Self::Text => "TEXT",
            Self::MText => "MTEXT",
            Self::Attrib => "ATTRIB",
            Self::AttDef => "ATTDEF",
            Self::Hatch => "HATCH",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this kind renders as a text primitive.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text | Self::MText | Self::Attrib | Self::AttDef)
    }
}

impl From<String> for EntityKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "LINE" => Self::Line,
            "CIRCLE" => Self::Circle,
            "POLYLINE" => Self::Polyline,
            "LWPOLYLINE" => Self::LwPolyline,
            "SOLID" => Self::Solid,
            "ELLIPSE" => Self::Ellipse,
            "ARC" => Self::Arc,
            "SPLINE" => Self::Spline,
            "LEADER" => Self::Leader,
            "DIMENSION" => Self::Dimension,
            "POINT" => Self::Point,
            "TEXT" => Self::Text,
            "MTEXT" => Self::MText,
            "ATTRIB" => Self::Attrib,
            "ATTDEF" => Self::AttDef,
            "HATCH" => Self::Hatch,
            _ => Self::Other(tag),
        }
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Other(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One parsed record from the source drawing.
///
/// Members the viewer does not interpret (`length`, `raw`, `pattern`, ...)
/// are kept in [`Entity::extra`] so the record serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Kind tag.
    #[serde(rename = "type")]
    pub kind: EntityKind,
    /// Layer name.
    #[serde(default)]
    pub layer: String,
    /// Ink color.
    #[serde(default)]
    pub color: EntityColor,
    /// Line start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    /// Line end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coord>,
    /// Circle, arc or ellipse center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coord>,
    /// Circle or arc radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Ordered vertices of polylines, solids and splines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Coord>>,
    /// Ellipse horizontal radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Ellipse vertical radius, or text height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Ellipse rotation, or text rotation fallback (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Arc start angle (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    /// Arc end angle (degrees).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
    /// Anchor of points and text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Coord>,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Text rotation (degrees, counter-clockwise).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Uninterpreted members, preserved for export.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Renderable geometry of an entity, one variant per drawing rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// A straight segment.
    Line {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
    },
    /// A full circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// An open vertex chain.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
    /// A filled 2D solid (at least three vertices).
    Solid {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
    /// A rotated ellipse.
    Ellipse {
        /// Center.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
        /// Rotation in degrees.
        angle: f64,
    },
    /// A circular arc.
    Arc {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
        /// Start angle in degrees.
        start_angle: f64,
        /// End angle in degrees.
        end_angle: f64,
    },
    /// Spline, leader or dimension: drawn as a dashed chain.
    Trace {
        /// Vertices in drawing order.
        points: Vec<Point>,
    },
    /// A point marker.
    Point {
        /// Location.
        position: Point,
    },
    /// A text label.
    Text {
        /// Anchor.
        position: Point,
        /// Content.
        content: &'a str,
        /// Declared text height, if any.
        height: Option<f64>,
        /// Rotation in degrees (counter-clockwise).
        rotation: f64,
    },
}

fn xy(coord: Option<&Coord>) -> Option<Point> {
    coord?.point()
}

impl Entity {
    /// Create an entity with no geometry.
    #[must_use]
    pub fn new(kind: EntityKind, layer: impl Into<String>) -> Self {
        Self {
            kind,
            layer: layer.into(),
            color: EntityColor::default(),
            start: None,
            end: None,
            center: None,
            radius: None,
            points: None,
            width: None,
            height: None,
            angle: None,
            start_angle: None,
            end_angle: None,
            position: None,
            text: None,
            rotation: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A `LINE` between two points.
    #[must_use]
    pub fn line(layer: impl Into<String>, start: Point, end: Point) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            ..Self::new(EntityKind::Line, layer)
        }
    }

    /// A `CIRCLE`.
    #[must_use]
    pub fn circle(layer: impl Into<String>, center: Point, radius: f64) -> Self {
        Self {
            center: Some(center.into()),
            radius: Some(radius),
            ..Self::new(EntityKind::Circle, layer)
        }
    }

    /// An `ARC` between two angles in degrees.
    #[must_use]
    pub fn arc(
        layer: impl Into<String>,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            start_angle: Some(start_angle),
            end_angle: Some(end_angle),
            ..Self::circle(layer, center, radius).with_kind(EntityKind::Arc)
        }
    }

    /// A `POLYLINE` through the given vertices.
    #[must_use]
    pub fn polyline(layer: impl Into<String>, points: &[Point]) -> Self {
        Self {
            points: Some(points.iter().copied().map(Coord::from).collect()),
            ..Self::new(EntityKind::Polyline, layer)
        }
    }

    /// A `TEXT` label anchored at `position`.
    #[must_use]
    pub fn text(layer: impl Into<String>, position: Point, content: impl Into<String>) -> Self {
        Self {
            position: Some(position.into()),
            text: Some(content.into()),
            ..Self::new(EntityKind::Text, layer)
        }
    }

    /// Replace the kind tag, keeping the geometry fields.
    #[must_use]
    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the color.
    #[must_use]
    pub fn with_color(mut self, color: EntityColor) -> Self {
        self.color = color;
        self
    }

    fn point_list(&self) -> Option<Vec<Point>> {
        self.points.as_ref()?.iter().map(Coord::point).collect()
    }

    /// The renderable shape, or `None` when the fields this kind requires
    /// are missing (or the kind is never drawn).
    #[must_use]
    pub fn shape(&self) -> Option<Shape<'_>> {
        match &self.kind {
            EntityKind::Line => Some(Shape::Line {
                start: xy(self.start.as_ref())?,
                end: xy(self.end.as_ref())?,
            }),
            EntityKind::Circle => Some(Shape::Circle {
                center: xy(self.center.as_ref())?,
                radius: self.radius?,
            }),
            EntityKind::Polyline | EntityKind::LwPolyline => Some(Shape::Polyline {
                points: self.point_list()?,
            }),
            EntityKind::Solid => {
                let points = self.point_list()?;
                (points.len() >= 3).then_some(Shape::Solid { points })
            }
            EntityKind::Ellipse => Some(Shape::Ellipse {
                center: xy(self.center.as_ref())?,
                rx: self.width?,
                ry: self.height?,
                angle: self.angle.unwrap_or(0.0),
            }),
            EntityKind::Arc => Some(Shape::Arc {
                center: xy(self.center.as_ref())?,
                radius: self.radius?,
                start_angle: self.start_angle?,
                end_angle: self.end_angle?,
            }),
            EntityKind::Spline | EntityKind::Leader | EntityKind::Dimension => {
                Some(Shape::Trace {
                    points: self.point_list()?,
                })
            }
            EntityKind::Point => Some(Shape::Point {
                position: xy(self.position.as_ref())?,
            }),
            EntityKind::Text | EntityKind::MText | EntityKind::Attrib | EntityKind::AttDef => {
                Some(Shape::Text {
                    position: xy(self.position.as_ref())?,
                    content: self.text.as_deref()?,
                    height: self.height,
                    rotation: self.rotation.or(self.angle).unwrap_or(0.0),
                })
            }
            EntityKind::Hatch | EntityKind::Other(_) => None,
        }
    }

    /// Points this entity contributes to the drawing extent.
    ///
    /// Fields are consulted in priority order: both line endpoints, else
    /// center ± radius, else every vertex, else the anchor position. Text
    /// extents are not measured.
    #[must_use]
    pub fn extent_points(&self) -> Vec<Point> {
        if let (Some(start), Some(end)) = (xy(self.start.as_ref()), xy(self.end.as_ref())) {
            return vec![start, end];
        }
        if let (Some(c), Some(r)) = (xy(self.center.as_ref()), self.radius) {
            return vec![Point::new(c.x - r, c.y - r), Point::new(c.x + r, c.y + r)];
        }
        if let Some(points) = &self.points {
            return points.iter().filter_map(Coord::point).collect();
        }
        xy(self.position.as_ref()).into_iter().collect()
    }
}
