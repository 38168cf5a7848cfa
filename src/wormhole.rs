//! The challenge target.

use crate::body::Body;
use crate::config::GameConfig;
use crate::constants::{WORMHOLE_BASE_RADIUS, WORMHOLE_EDGE_INSET};
use crate::geometry::{distance, Viewport};
use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Wormhole {
    pub position: Vec2,
    pub radius: f32,
    /// Cosmetic spin, radians.
    pub rotation: f32,
    /// Cosmetic pulse phase, radians.
    pub pulse_phase: f32,
}

impl Wormhole {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            rotation: 0.0,
            pulse_phase: 0.0,
        }
    }

    pub fn animate(&mut self, dt: f32) {
        self.rotation += 0.02 * dt;
        self.pulse_phase += 0.05 * dt;
    }

    /// `true` when a circle at `point` with `radius` overlaps the target.
    pub fn reached_by(&self, point: Vec2, radius: f32) -> bool {
        distance(point, self.position) < radius + self.radius
    }
}

/// Smallest margin between `p` and any body's gravity range plus `clearance`.
/// Positive means the spot is valid.
fn clearance_at(p: Vec2, bodies: &[Body], clearance: f32) -> f32 {
    bodies
        .iter()
        .map(|b| distance(p, b.position) - (b.gravity_range + clearance))
        .fold(f32::INFINITY, f32::min)
}

/// Place the target far from every body's influence.
///
/// Candidates are drawn inside the viewport inset by a fixed margin.  After
/// the attempt cap the best candidate seen is used anyway, so a challenge
/// always has a target.
pub fn place_wormhole<R: Rng + ?Sized>(
    rng: &mut R,
    bodies: &[Body],
    viewport: Viewport,
    config: &GameConfig,
) -> Wormhole {
    let scale = viewport.scale(config.reference_screen_size);
    let radius = WORMHOLE_BASE_RADIUS * scale;
    let span = Vec2::new(
        (viewport.width - 2.0 * WORMHOLE_EDGE_INSET).max(0.0),
        (viewport.height - 2.0 * WORMHOLE_EDGE_INSET).max(0.0),
    );

    let mut best = viewport.center();
    let mut best_margin = f32::NEG_INFINITY;
    for _ in 0..config.placement_max_attempts {
        let candidate = Vec2::splat(WORMHOLE_EDGE_INSET)
            + Vec2::new(rng.gen::<f32>() * span.x, rng.gen::<f32>() * span.y);
        let margin = clearance_at(candidate, bodies, config.wormhole_body_clearance);
        if margin >= 0.0 {
            return Wormhole::new(candidate, radius);
        }
        if margin > best_margin {
            best = candidate;
            best_margin = margin;
        }
    }

    debug!("no fully clear wormhole spot; using best margin {best_margin:.1}");
    Wormhole::new(best, radius)
}
