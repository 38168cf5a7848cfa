//! Debris field simulator.
//!
//! Debris are small free bodies pulled by every gravitating body in range.
//! A slow piece that drifts close enough to a body is captured into a
//! parametric orbit and stays there until it is destroyed.  Debris never
//! interact with each other.

use crate::body::{Body, BodyId};
use crate::config::GameConfig;
use crate::geometry::{angle_from, distance, point_on_circle, Viewport};
use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebrisKind {
    /// Ends the session on contact.
    Lethal,
    /// Grants bonus time on contact and is consumed.
    Bonus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebrisMotion {
    Free {
        velocity: Vec2,
    },
    Orbiting {
        body: BodyId,
        angle: f32,
        distance: f32,
        /// Radians per unit step; negative for retrograde orbits.
        angular_speed: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Debris {
    pub position: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub kind: DebrisKind,
    pub motion: DebrisMotion,
}

impl Debris {
    pub fn is_orbiting(&self) -> bool {
        matches!(self.motion, DebrisMotion::Orbiting { .. })
    }

    pub fn is_bonus(&self) -> bool {
        self.kind == DebrisKind::Bonus
    }
}

/// Tuning for the simplified gravity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisPhysics {
    /// Scales every acceleration so the field stays gentle at screen scale.
    pub gravity_damping: f32,
    /// Orbit entry is possible within this multiple of a body's orbit radius.
    pub capture_range_factor: f32,
    pub orbital_velocity_scale: f32,
}

impl DebrisPhysics {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            gravity_damping: config.debris_gravity_damping,
            capture_range_factor: config.debris_capture_range_factor,
            orbital_velocity_scale: config.debris_orbital_velocity_scale,
        }
    }

    /// Reference circular speed at distance `d` from `body`.
    pub fn orbital_velocity(&self, body: &Body, d: f32) -> f32 {
        (body.profile().gravity_strength() / d).sqrt() * self.orbital_velocity_scale
    }
}

impl Default for DebrisPhysics {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Scatter a fresh debris field around `bodies`.
///
/// Each piece needs a candidate spot outside `debris_body_clearance ×
/// orbit_radius` of every body; a piece that finds none within the attempt
/// cap is left out.
pub fn generate_debris<R: Rng + ?Sized>(
    rng: &mut R,
    bodies: &[Body],
    viewport: Viewport,
    config: &GameConfig,
) -> Vec<Debris> {
    let scale = viewport.scale(config.reference_screen_size);
    let count = rng.gen_range(config.debris_count_min..=config.debris_count_max);
    let mut field = Vec::with_capacity(count);

    for _ in 0..count {
        let spot = (0..config.placement_max_attempts)
            .map(|_| {
                Vec2::new(
                    rng.gen::<f32>() * viewport.width,
                    rng.gen::<f32>() * viewport.height,
                )
            })
            .find(|&p| {
                bodies.iter().all(|b| {
                    distance(p, b.position) >= b.orbit_radius * config.debris_body_clearance
                })
            });
        let Some(spot) = spot else {
            debug!("debris piece omitted: no clear spot");
            continue;
        };

        let orbiting = !bodies.is_empty() && rng.gen_bool(config.debris_initial_orbit_chance);
        let (position, motion) = if orbiting {
            let index = rng.gen_range(0..bodies.len());
            let anchor = &bodies[index];
            let angle = rng.gen::<f32>() * TAU;
            let orbit_distance = anchor.orbit_radius * rng.gen_range(1.2_f32..2.0);
            let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            (
                point_on_circle(anchor.position, orbit_distance, angle),
                DebrisMotion::Orbiting {
                    body: BodyId(index),
                    angle,
                    distance: orbit_distance,
                    angular_speed: direction * rng.gen_range(0.01_f32..0.03),
                },
            )
        } else {
            let velocity = Vec2::new(rng.gen_range(-0.4_f32..0.4), rng.gen_range(-0.4_f32..0.4));
            (spot, DebrisMotion::Free { velocity })
        };

        let kind = if rng.gen_bool(config.debris_bonus_chance) {
            DebrisKind::Bonus
        } else {
            DebrisKind::Lethal
        };

        field.push(Debris {
            position,
            radius: rng.gen_range(1.5_f32..4.5) * scale,
            rotation: rng.gen::<f32>() * TAU,
            rotation_speed: rng.gen_range(-0.05_f32..0.05),
            kind,
            motion,
        });
    }
    field
}

// ── Update ────────────────────────────────────────────────────────────────────

/// Advance one piece by `dt` unit steps.  Returns the body it was captured
/// by, if it entered an orbit this tick.
pub fn step_debris<R: Rng + ?Sized>(
    rng: &mut R,
    piece: &mut Debris,
    bodies: &[Body],
    physics: &DebrisPhysics,
    dt: f32,
) -> Option<BodyId> {
    match &mut piece.motion {
        DebrisMotion::Orbiting {
            body,
            angle,
            distance,
            angular_speed,
        } => {
            *angle += *angular_speed * dt;
            if let Some(anchor) = bodies.get(body.0) {
                piece.position = point_on_circle(anchor.position, *distance, *angle);
            }
            None
        }
        DebrisMotion::Free { velocity } => {
            for (i, body) in bodies.iter().enumerate() {
                let toward = body.position - piece.position;
                let d = toward.length();
                if d >= body.gravity_range || d <= body.radius {
                    continue;
                }

                let force = body.profile().gravity_strength() / (d * d);
                *velocity += toward / d * force * dt * physics.gravity_damping;

                if d < body.orbit_radius * physics.capture_range_factor {
                    let orbital = physics.orbital_velocity(body, d);
                    if velocity.length() < orbital * 2.0 {
                        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                        piece.motion = DebrisMotion::Orbiting {
                            body: BodyId(i),
                            angle: angle_from(body.position, piece.position),
                            distance: d,
                            angular_speed: sign * orbital / d,
                        };
                        return Some(BodyId(i));
                    }
                }
            }
            piece.position += *velocity * dt;
            None
        }
    }
}

/// Advance the whole field: motion, spin, wraparound, then removal of every
/// piece overlapping a body's solid radius.  Returns how many were destroyed.
pub fn update_debris<R: Rng + ?Sized>(
    rng: &mut R,
    field: &mut Vec<Debris>,
    bodies: &[Body],
    viewport: Viewport,
    physics: &DebrisPhysics,
    dt: f32,
) -> usize {
    for piece in field.iter_mut() {
        if let Some(id) = step_debris(rng, piece, bodies, physics, dt) {
            debug!("debris entered orbit around body {}", id.0);
        }
        piece.rotation += piece.rotation_speed * dt;
        piece.position = viewport.wrap(piece.position);
    }

    let before = field.len();
    field.retain(|piece| {
        bodies
            .iter()
            .all(|b| distance(piece.position, b.position) >= b.radius)
    });
    let destroyed = before - field.len();
    if destroyed > 0 {
        debug!("{destroyed} debris destroyed on body impact");
    }
    destroyed
}

/// Re-anchor every orbiting piece to its body's current centre, keeping its
/// angle and frozen distance.  Free pieces are untouched.
pub fn follow_anchors(field: &mut [Debris], bodies: &[Body], viewport: Viewport) {
    for piece in field.iter_mut() {
        if let DebrisMotion::Orbiting {
            body,
            angle,
            distance,
            ..
        } = piece.motion
        {
            if let Some(anchor) = bodies.get(body.0) {
                piece.position = viewport.wrap(point_on_circle(anchor.position, distance, angle));
            }
        }
    }
}
