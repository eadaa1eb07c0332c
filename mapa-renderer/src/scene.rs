//! Entity-to-primitive mapping.
//!
//! [`SceneRenderer::render`] walks the visible entities in drawing order and
//! emits a [`DisplayList`]:
//!
//! 1. the capture overlay (a dashed border around the viewport),
//! 2. every non-text primitive, in entity order,
//! 3. every text primitive, in entity order.

use std::collections::BTreeSet;

use mapa_core::{is_area_label, Entity, Point, Shape, ViewerState, Viewport};

use crate::color::resolve_color;
use crate::display::{DisplayItem, DisplayList, Paint, Primitive, Style};
use crate::rules::{LayerClass, LayerRules};

/// Radius of point markers, in model units.
pub const POINT_RADIUS: f64 = 2.0;
/// Font size used when a text entity declares no height.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
/// Font scale for ordinary text.
pub const TEXT_SCALE: f64 = 1.5;
/// Color of the capture overlay border.
pub const OVERLAY_COLOR: &str = "green";
/// Stroke width of the capture overlay border and of text halos.
pub const OVERLAY_STROKE_WIDTH: f64 = 2.0;

/// Everything the renderer reads from a viewer.
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    /// All entities in drawing order.
    pub entities: &'a [Entity],
    /// Layers to draw.
    pub visible: &'a BTreeSet<String>,
    /// Region to draw.
    pub viewport: Viewport,
    /// Drop parcel-area labels.
    pub remove_area_labels: bool,
}

impl<'a> From<&'a ViewerState> for SceneInput<'a> {
    fn from(state: &'a ViewerState) -> Self {
        Self {
            entities: state.store().entities(),
            visible: state.visible_layers(),
            viewport: state.viewport(),
            remove_area_labels: state.remove_area_labels(),
        }
    }
}

/// Maps entities to a display list.
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    rules: LayerRules,
}

impl SceneRenderer {
    /// Create a renderer with custom layer rules.
    #[must_use]
    pub fn new(rules: LayerRules) -> Self {
        Self { rules }
    }

    /// Layer rules in use.
    #[must_use]
    pub fn rules(&self) -> &LayerRules {
        &self.rules
    }

    /// Build the display list for `input`.
    #[must_use]
    pub fn render(&self, input: &SceneInput<'_>) -> DisplayList {
        let view_box = input.viewport.render_view_box();
        let mut list = DisplayList::new(view_box);
        list.push(overlay_border(view_box));

        let mut texts = Vec::new();
        let mut skipped = 0_usize;
        for entity in input
            .entities
            .iter()
            .filter(|e| input.visible.contains(&e.layer))
        {
            let Some(shape) = entity.shape() else {
                skipped += 1;
                continue;
            };
            let color = resolve_color(&entity.color);
            let class = self.rules.classify(&entity.layer);
            let mut emit = |primitive: Primitive, style: Style| {
                let item = DisplayItem {
                    primitive,
                    style,
                    layer: Some(entity.layer.clone()),
                    overlay: false,
                };
                if item.primitive.is_text() {
                    texts.push(item);
                } else {
                    list.push(item);
                }
            };

            match shape {
                Shape::Line { start, end } => emit(
                    Primitive::Line {
                        from: start.to_render(),
                        to: end.to_render(),
                    },
                    Style::stroked(&color),
                ),
                Shape::Circle { center, radius } => emit(
                    Primitive::Circle {
                        center: center.to_render(),
                        radius,
                    },
                    closed_style(class, &color),
                ),
                Shape::Polyline { points } | Shape::Solid { points } => {
                    if class.legend && points.len() >= 3 {
                        emit(
                            Primitive::Polygon {
                                points: points[..3].iter().map(|p| p.to_render()).collect(),
                            },
                            Style::solid(&color),
                        );
                    } else {
                        for segment in chain(&points) {
                            emit(segment, Style::stroked(&color));
                        }
                    }
                }
                Shape::Ellipse {
                    center,
                    rx,
                    ry,
                    angle,
                } => emit(
                    Primitive::Ellipse {
                        center: center.to_render(),
                        rx,
                        ry,
                        rotation_deg: angle,
                    },
                    closed_style(class, &color),
                ),
                Shape::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => emit(arc(center, radius, start_angle, end_angle), Style::stroked(&color)),
                Shape::Trace { points } => {
                    for segment in chain(&points) {
                        emit(segment, Style::stroked(&color).dashed());
                    }
                }
                Shape::Point { position } => emit(
                    Primitive::Circle {
                        center: position.to_render(),
                        radius: POINT_RADIUS,
                    },
                    Style::filled(&color),
                ),
                Shape::Text {
                    position,
                    content,
                    height,
                    rotation,
                } => {
                    if input.remove_area_labels && is_area_label(content) {
                        continue;
                    }
                    emit(
                        Primitive::Text {
                            position: position.to_render(),
                            content: content.to_string(),
                            font_size: font_size(height, class),
                            rotation_deg: 0.0 - rotation,
                        },
                        text_style(class, &color),
                    );
                }
            }
        }

        if skipped > 0 {
            tracing::debug!("{skipped} visible entities have no renderable geometry");
        }
        list.extend(texts);
        list
    }
}

fn overlay_border(view_box: [f64; 4]) -> DisplayItem {
    let [x, y, width, height] = view_box;
    DisplayItem {
        primitive: Primitive::Rect {
            x,
            y,
            width,
            height,
        },
        style: Style {
            stroke_width: Some(OVERLAY_STROKE_WIDTH),
            ..Style::stroked(OVERLAY_COLOR).dashed()
        },
        layer: None,
        overlay: true,
    }
}

fn closed_style(class: LayerClass, color: &str) -> Style {
    if class.fill {
        Style::solid(color)
    } else {
        Style::stroked(color)
    }
}

fn text_style(class: LayerClass, color: &str) -> Style {
    if class.numbering {
        Style {
            stroke: Paint::Color("white".to_string()),
            stroke_width: Some(OVERLAY_STROKE_WIDTH),
            stroke_below_fill: true,
            ..Style::filled(color)
        }
    } else {
        Style::filled(color)
    }
}

fn font_size(height: Option<f64>, class: LayerClass) -> f64 {
    let base = height
        .filter(|h| h.abs() > f64::EPSILON)
        .unwrap_or(DEFAULT_FONT_SIZE);
    if class.numbering {
        base
    } else {
        base * TEXT_SCALE
    }
}

/// Independent segments between consecutive vertices.
fn chain(points: &[Point]) -> impl Iterator<Item = Primitive> + '_ {
    points.windows(2).map(|pair| Primitive::Line {
        from: pair[0].to_render(),
        to: pair[1].to_render(),
    })
}

fn arc(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Primitive {
    let on_circle = |degrees: f64| {
        let theta = degrees.to_radians();
        Point::new(
            radius.mul_add(theta.cos(), center.x),
            radius.mul_add(theta.sin(), center.y),
        )
        .to_render()
    };
    Primitive::Arc {
        from: on_circle(start_angle),
        to: on_circle(end_angle),
        radius,
        large_arc: large_arc(start_angle, end_angle),
    }
}

/// Whether the signed span from `start` to `end` exceeds a half turn.
///
/// The remainder keeps the sign of the span, so negative spans never
/// select the large arc.
#[must_use]
pub fn large_arc(start_deg: f64, end_deg: f64) -> bool {
    (end_deg - start_deg) % 360.0 > 180.0
}
