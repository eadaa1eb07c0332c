//! SVG markup backend.

use std::fmt::Write;

use crate::display::{DisplayItem, DisplayList, Primitive, Style};
use crate::{BackendType, RenderError, RenderResult};

use super::RenderBackend;

/// CSS class marking capture-only overlay elements in the markup.
pub const OVERLAY_CLASS: &str = "capture-overlay";

/// Serialize `list` as a standalone SVG document.
///
/// `width` and `height` are the on-screen pixel size; the document's
/// `viewBox` is the list's view box.
#[must_use]
pub fn to_markup(list: &DisplayList, width: u32, height: u32) -> String {
    let [vx, vy, vw, vh] = list.view_box;
    let mut svg = String::with_capacity(256 + list.len() * 96);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"{vx} {vy} {vw} {vh}\">",
    );
    for item in list.items() {
        write_item(&mut svg, item);
    }
    svg.push_str("</svg>");
    svg
}

fn write_item(svg: &mut String, item: &DisplayItem) {
    let class = if item.overlay {
        format!(" class=\"{OVERLAY_CLASS}\"")
    } else {
        String::new()
    };
    let style = style_attrs(&item.style);

    let _ = match &item.primitive {
        Primitive::Rect {
            x,
            y,
            width,
            height,
        } => write!(
            svg,
            "<rect{class} x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\"{style}/>"
        ),
        Primitive::Line { from, to } => write!(
            svg,
            "<line{class} x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{style}/>",
            from.x, from.y, to.x, to.y
        ),
        Primitive::Circle { center, radius } => write!(
            svg,
            "<circle{class} cx=\"{}\" cy=\"{}\" r=\"{radius}\"{style}/>",
            center.x, center.y
        ),
        Primitive::Polygon { points } => {
            let pts: Vec<String> = points.iter().map(|p| format!("{},{}", p.x, p.y)).collect();
            write!(
                svg,
                "<polygon{class} points=\"{}\"{style}/>",
                pts.join(" ")
            )
        }
        Primitive::Ellipse {
            center,
            rx,
            ry,
            rotation_deg,
        } => write!(
            svg,
            "<ellipse{class} cx=\"{}\" cy=\"{}\" rx=\"{rx}\" ry=\"{ry}\"{}{style}/>",
            center.x,
            center.y,
            rotate_attr(*rotation_deg, center.x, center.y)
        ),
        Primitive::Arc {
            from,
            to,
            radius,
            large_arc,
        } => write!(
            svg,
            "<path{class} d=\"M {} {} A {radius} {radius} 0 {} 0 {} {}\"{style}/>",
            from.x,
            from.y,
            u8::from(*large_arc),
            to.x,
            to.y
        ),
        Primitive::Text {
            position,
            content,
            font_size,
            rotation_deg,
        } => write!(
            svg,
            "<text{class} x=\"{}\" y=\"{}\" font-size=\"{font_size}\"{style}{}>{}</text>",
            position.x,
            position.y,
            rotate_attr(*rotation_deg, position.x, position.y),
            escape_xml(content)
        ),
    };
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = format!(
        " fill=\"{}\" stroke=\"{}\"",
        escape_xml(style.fill.as_attr()),
        escape_xml(style.stroke.as_attr())
    );
    if let Some(width) = style.stroke_width {
        let _ = write!(attrs, " stroke-width=\"{width}\"");
    }
    if let Some([dash, gap]) = style.dash {
        let _ = write!(attrs, " stroke-dasharray=\"{dash},{gap}\"");
    }
    if style.stroke_below_fill {
        attrs.push_str(" paint-order=\"stroke fill\"");
    }
    attrs
}

/// A `transform` attribute rotating about `(cx, cy)`, empty for no rotation.
fn rotate_attr(degrees: f64, cx: f64, cy: f64) -> String {
    if degrees.abs() > f64::EPSILON {
        format!(" transform=\"rotate({degrees} {cx} {cy})\"")
    } else {
        String::new()
    }
}

/// Escape special XML characters and drop the ones XML cannot carry.
fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            // Not representable in XML 1.0, even as a character reference.
            _ => {}
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// Renders display lists to SVG markup held in memory.
pub struct SvgBackend {
    width: u32,
    height: u32,
    markup: Option<String>,
}

impl SvgBackend {
    /// Create a backend for a `width` x `height` pixel container.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            markup: None,
        }
    }

    /// Markup of the last rendered frame.
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }
}

impl RenderBackend for SvgBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Svg
    }

    fn render(&mut self, list: &DisplayList) -> RenderResult<()> {
        tracing::trace!(
            "SVG render: {} items, container {}x{}",
            list.len(),
            self.width,
            self.height
        );
        self.markup = Some(to_markup(list, self.width, self.height));
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        tracing::debug!("SVG backend resized to {}x{}", width, height);
        Ok(())
    }

    fn encode_frame(&self) -> RenderResult<Vec<u8>> {
        self.markup
            .as_ref()
            .map(|m| m.clone().into_bytes())
            .ok_or(RenderError::NoFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Paint;
    use mapa_core::Point;

    fn list_with(primitive: Primitive, style: Style) -> DisplayList {
        let mut list = DisplayList::new([0.0, -100.0, 100.0, 100.0]);
        list.push(DisplayItem {
            primitive,
            style,
            layer: Some("L".into()),
            overlay: false,
        });
        list
    }

    #[test]
    fn test_document_frame() {
        let svg = to_markup(&DisplayList::new([1.0, -20.0, 30.0, 40.0]), 800, 600);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("viewBox=\"1 -20 30 40\""));
    }

    #[test]
    fn test_overlay_carries_class() {
        let mut list = DisplayList::new([0.0, 0.0, 1.0, 1.0]);
        list.push(DisplayItem {
            primitive: Primitive::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            style: Style {
                stroke_width: Some(2.0),
                ..Style::stroked("green").dashed()
            },
            layer: None,
            overlay: true,
        });
        let svg = to_markup(&list, 10, 10);
        assert!(svg.contains("class=\"capture-overlay\""));
        assert!(svg.contains("stroke-dasharray=\"4,4\""));
        assert!(svg.contains("stroke-width=\"2\""));
        assert!(!to_markup(&list.without_overlay(), 10, 10).contains(OVERLAY_CLASS));
    }

    #[test]
    fn test_arc_path() {
        let svg = to_markup(
            &list_with(
                Primitive::Arc {
                    from: Point::new(10.0, 0.0),
                    to: Point::new(0.0, -10.0),
                    radius: 10.0,
                    large_arc: true,
                },
                Style::stroked("red"),
            ),
            10,
            10,
        );
        assert!(svg.contains("d=\"M 10 0 A 10 10 0 1 0 0 -10\""));
        assert!(svg.contains("fill=\"none\""));
    }

    #[test]
    fn test_text_escaping_and_rotation() {
        let svg = to_markup(
            &list_with(
                Primitive::Text {
                    position: Point::new(5.0, -5.0),
                    content: "A & <B>".into(),
                    font_size: 18.0,
                    rotation_deg: -30.0,
                },
                Style::filled("black"),
            ),
            10,
            10,
        );
        assert!(svg.contains(">A &amp; &lt;B&gt;</text>"));
        assert!(svg.contains("font-size=\"18\""));
        assert!(svg.contains("transform=\"rotate(-30 5 -5)\""));
    }

    #[test]
    fn test_ellipse_rotates_about_center() {
        let svg = to_markup(
            &list_with(
                Primitive::Ellipse {
                    center: Point::new(5.0, -5.0),
                    rx: 3.0,
                    ry: 1.0,
                    rotation_deg: 30.0,
                },
                Style::solid("red"),
            ),
            10,
            10,
        );
        assert!(svg.contains(
            "<ellipse cx=\"5\" cy=\"-5\" rx=\"3\" ry=\"1\" transform=\"rotate(30 5 -5)\" fill=\"red\" stroke=\"red\"/>"
        ));

        let flat = to_markup(
            &list_with(
                Primitive::Ellipse {
                    center: Point::new(0.0, 0.0),
                    rx: 2.0,
                    ry: 2.0,
                    rotation_deg: 0.0,
                },
                Style::stroked("red"),
            ),
            10,
            10,
        );
        assert!(!flat.contains("transform"));
    }

    #[test]
    fn test_invalid_xml_characters_are_dropped() {
        assert_eq!(escape_xml("Talh\u{1}o\u{b}\u{fffe}"), "Talho");
        assert_eq!(escape_xml("a\tb\nc\rd"), "a\tb\nc\rd");
        assert_eq!(escape_xml("Lote 'Ä' 😀"), "Lote &apos;Ä&apos; 😀");
    }

    #[test]
    fn test_unrotated_text_has_no_transform() {
        let svg = to_markup(
            &list_with(
                Primitive::Text {
                    position: Point::new(0.0, 0.0),
                    content: "x".into(),
                    font_size: 12.0,
                    rotation_deg: 0.0,
                },
                Style {
                    stroke: Paint::Color("white".into()),
                    stroke_width: Some(2.0),
                    stroke_below_fill: true,
                    ..Style::filled("black")
                },
            ),
            10,
            10,
        );
        assert!(!svg.contains("transform"));
        assert!(svg.contains("paint-order=\"stroke fill\""));
    }

    #[test]
    fn test_polygon_points() {
        let svg = to_markup(
            &list_with(
                Primitive::Polygon {
                    points: vec![
                        Point::new(0.0, 0.0),
                        Point::new(1.5, -2.0),
                        Point::new(3.0, 0.0),
                    ],
                },
                Style::solid("rgb(255,0,0)"),
            ),
            10,
            10,
        );
        assert!(svg.contains("points=\"0,0 1.5,-2 3,0\""));
    }

    #[test]
    fn test_backend_requires_frame() {
        let mut backend = SvgBackend::new(10, 10);
        assert!(matches!(backend.encode_frame(), Err(RenderError::NoFrame)));
        backend
            .render(&DisplayList::new([0.0, 0.0, 1.0, 1.0]))
            .expect("render");
        assert!(backend.markup().is_some());
        assert!(!backend.encode_frame().expect("frame").is_empty());
    }
}
