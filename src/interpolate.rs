//! Mapping from transition progress to the geometry and opacity to draw.
//!
//! Everything here is a pure function of its inputs.
//!
//! ## Missing origin
//!
//! The overlay may be opened without knowing where its trigger sits on
//! screen, or with a measurement that came back garbage (NaN, negative
//! size). In both cases the origin falls back to a zero-size rectangle at
//! the centre of the target, so the content grows out of the middle of the
//! window instead of failing.

use crate::animation::Animatable;
use crate::geometry::Rect;

/// Opacity of the overlay chrome while fully open
pub const OPEN_OPACITY: f32 = 0.8;

/// Opacity declared for the collapsed target while closed
pub const RESTING_OPACITY: f32 = 1.0;

/// A rectangle together with the opacity it should be drawn at
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub rect: Rect,
    pub opacity: f32,
}

impl Frame {
    pub const fn new(rect: Rect, opacity: f32) -> Self {
        Self { rect, opacity }
    }
}

impl Animatable for Frame {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            rect: Rect::lerp(&from.rect, &to.rect, t),
            opacity: f32::lerp(&from.opacity, &to.opacity, t),
        }
    }
}

/// The origin actually used for interpolation.
///
/// Returns `origin` when it is present and valid, otherwise a zero-size rect
/// at the centre of `target`.
pub fn resolve_origin(origin: Option<Rect>, target: &Rect) -> Rect {
    match origin {
        Some(rect) if rect.is_valid() => rect,
        _ => {
            let (cx, cy) = target.center();
            Rect::point(cx, cy)
        }
    }
}

/// Geometry and opacity at `progress`.
///
/// At 0 the result is the origin, fully transparent; at 1 it is `target`.
/// Every field in between is the linear blend
/// `origin + progress * (target - origin)`. Progress outside `[0, 1]` is
/// extrapolated, not clamped.
pub fn interpolate(progress: f32, origin: Option<Rect>, target: Frame) -> Frame {
    let from = Frame::new(resolve_origin(origin, &target.rect), 0.0);
    Frame::lerp(&from, &target, progress)
}
