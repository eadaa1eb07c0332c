//! Viewport rectangle and the transforms applied to it.
//!
//! The viewport is a rectangle in model space (Y up). Zoom keeps its center
//! fixed, pan converts pixel deltas to model units using the container size,
//! and [`Viewport::lerp`] drives the animated recenter.

use serde::{Deserialize, Serialize};

use crate::entity::Point;

/// Axis-aligned extent of a set of model-space points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest X.
    pub min_x: f64,
    /// Smallest Y.
    pub min_y: f64,
    /// Largest X.
    pub max_x: f64,
    /// Largest Y.
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate bounds covering a single point.
    #[must_use]
    pub fn at(p: Point) -> Self {
        Self {
            min_x: p.x,
            min_y: p.y,
            max_x: p.x,
            max_y: p.y,
        }
    }

    /// Grow to include `p`.
    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Bounds of all points, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::at(iter.next()?);
        for p in iter {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Whether `p` lies inside (edges included).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Direction of a zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    /// Shrink the visible region.
    In,
    /// Grow the visible region.
    Out,
}

impl ZoomDirection {
    /// Direction for a wheel event: scrolling down zooms out.
    #[must_use]
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            Self::Out
        } else {
            Self::In
        }
    }
}

/// The visible window into model space.
///
/// Serializes as `{x, y, w, h}`, the shape the layout service expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Left edge.
    pub x: f64,
    /// Bottom edge (model Y is up).
    pub y: f64,
    /// Width, always positive.
    pub w: f64,
    /// Height, always positive.
    pub h: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            w: 1.0,
            h: 1.0,
        }
    }
}

impl Viewport {
    /// `bounds` expanded by `padding` on every side.
    #[must_use]
    pub fn from_bounds(bounds: &Bounds, padding: f64) -> Self {
        Self {
            x: bounds.min_x - padding,
            y: bounds.min_y - padding,
            w: bounds.max_x - bounds.min_x + padding * 2.0,
            h: bounds.max_y - bounds.min_y + padding * 2.0,
        }
    }

    /// Center point in model space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether `p` is inside the rectangle (edges included).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Scale about the center by `factor` (zoom out) or `1 / factor` (zoom in).
    #[must_use]
    pub fn zoomed(&self, direction: ZoomDirection, factor: f64) -> Self {
        let f = match direction {
            ZoomDirection::In => 1.0 / factor,
            ZoomDirection::Out => factor,
        };
        let w = self.w * f;
        let h = self.h * f;
        Self {
            x: self.x - (w - self.w) / 2.0,
            y: self.y - (h - self.h) / 2.0,
            w,
            h,
        }
    }

    /// Shift by a pointer delta in pixels over a container of the given size.
    ///
    /// Screen Y grows downwards, so a downward drag moves the window up in
    /// model space. A zero-sized container leaves the viewport unchanged.
    #[must_use]
    pub fn panned(&self, dx_px: f64, dy_px: f64, client_width_px: f64, client_height_px: f64) -> Self {
        if client_width_px <= 0.0 || client_height_px <= 0.0 {
            return *self;
        }
        let dx = dx_px * (self.w / client_width_px);
        let dy = dy_px * (self.h / client_height_px);
        Self {
            x: self.x - dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Linear interpolation towards `target`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            x: mix(self.x, target.x),
            y: mix(self.y, target.y),
            w: mix(self.w, target.w),
            h: mix(self.h, target.h),
        }
    }

    /// The same rectangle in render space (Y down): `(x, -(y + h), w, h)`.
    #[must_use]
    pub fn render_view_box(&self) -> [f64; 4] {
        [self.x, 0.0 - (self.y + self.h), self.w, self.h]
    }

    /// Whether both dimensions are positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.w > 0.0 && self.h > 0.0 && self.w.is_finite() && self.h.is_finite()
    }
}
