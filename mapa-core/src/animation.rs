//! Recenter animation.

use serde::{Deserialize, Serialize};

use crate::Viewport;

/// Identifies one started animation.
///
/// Every viewport-affecting action mints a new token, so frames scheduled
/// for an older animation no longer match and are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationToken(pub u64);

/// A linear interpolation between two viewports over wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Token this animation was started under.
    pub token: AnimationToken,
    /// Viewport when the animation started.
    pub from: Viewport,
    /// Final viewport.
    pub to: Viewport,
    /// Start timestamp in milliseconds.
    pub started_at_ms: f64,
    /// Duration in milliseconds.
    pub duration_ms: f64,
}

impl Animation {
    /// Fraction of the animation elapsed at `now_ms`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// The interpolated viewport at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> Viewport {
        self.from.lerp(&self.to, self.progress(now_ms))
    }

    /// Whether the animation has reached its target at `now_ms`.
    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
