//! Entity color resolution.

use mapa_core::EntityColor;

/// Color substituted for white ink, which would vanish on the white sheet.
pub const WHITE_SUBSTITUTE: &str = "black";

/// Resolve an entity color to a paint string.
///
/// RGB triples in unit range become `rgb(r,g,b)` with each channel scaled
/// to 0-255. Pure white, written either way, resolves to black. Other
/// named or hex colors pass through unchanged.
#[must_use]
pub fn resolve_color(color: &EntityColor) -> String {
    match color {
        EntityColor::Rgb(channels) => {
            let [r, g, b] = channels.map(to_byte);
            if (r, g, b) == (255, 255, 255) {
                WHITE_SUBSTITUTE.to_string()
            } else {
                format!("rgb({r},{g},{b})")
            }
        }
        EntityColor::Named(name) => {
            let lower = name.to_ascii_lowercase();
            if matches!(lower.as_str(), "white" | "#fff" | "#ffffff") {
                WHITE_SUBSTITUTE.to_string()
            } else {
                name.clone()
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}
