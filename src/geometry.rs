//! Scalar geometry helpers shared by the orbit engine and debris simulator.

use bevy::math::Vec2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector of `v`, or `fallback` when `v` is too short to normalize.
#[inline]
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// `v` rotated +90° (`(x, y) → (-y, x)`).
///
/// In screen coordinates (y down) this is the direction a point moves in when
/// its polar angle increases.
#[inline]
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Point on the circle of `radius` around `center` at `angle` radians.
#[inline]
pub fn point_on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Polar angle of `point` as seen from `center`.
#[inline]
pub fn angle_from(center: Vec2, point: Vec2) -> f32 {
    let d = point - center;
    d.y.atan2(d.x)
}

/// Screen-space playing field.  Origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Size factor relative to a `reference` screen size (min of both axes).
    pub fn scale(&self, reference: f32) -> f32 {
        self.width.min(self.height) / reference
    }

    /// Narrow screens get lighter trails and starfields.
    pub fn is_compact(&self) -> bool {
        self.width < crate::constants::COMPACT_VIEWPORT_WIDTH
    }

    /// `true` when `p` lies more than `buffer` outside the viewport on any side.
    pub fn is_outside(&self, p: Vec2, buffer: f32) -> bool {
        p.x < -buffer || p.x > self.width + buffer || p.y < -buffer || p.y > self.height + buffer
    }

    /// Toroidal wraparound: leaving one edge re-enters at the opposite edge.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        let mut out = p;
        if out.x < 0.0 {
            out.x = self.width;
        } else if out.x > self.width {
            out.x = 0.0;
        }
        if out.y < 0.0 {
            out.y = self.height;
        } else if out.y > self.height {
            out.y = 0.0;
        }
        out
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 680.0)
    }
}
