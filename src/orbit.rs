//! Orbit & capture engine for the controlled body.
//!
//! ## State machine
//!
//! | State                         | Motion each tick                          | Leaves via        |
//! |-------------------------------|-------------------------------------------|-------------------|
//! | `Orbiting { body, angle }`    | `angle += body.orbit_speed · dt`, position on the circle | [`release`] |
//! | `Free { velocity, .. }`       | `position += velocity · dt`               | [`check_capture`] + [`capture`] |
//!
//! Velocity only exists in the `Free` variant, so a stale velocity can never
//! be read while the orbit is authoritative.
//!
//! ## Release convention
//!
//! The launch direction is the outward radial unit vector rotated by +90°,
//! `(nx, ny) → (-ny, nx)`.  At angle 0 around a body at the origin the
//! player leaves with velocity `(0, +launch_speed)`: along the direction of
//! increasing orbit angle.

use crate::body::{Body, BodyId, BodyKind};
use crate::geometry::{angle_from, distance, perpendicular, point_on_circle, unit_or};
use crate::player::Player;
use bevy::log::debug;
use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitState {
    Orbiting {
        body: BodyId,
        angle: f32,
    },
    Free {
        velocity: Vec2,
        /// The body last released from.  Capture and collision checks skip it
        /// until the player has left its gravity range.
        released_from: Option<BodyId>,
    },
}

/// Result of scanning the bodies for a free-flying player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCheck {
    Clear,
    Captured(BodyId),
    /// The player touched a body's solid surface.
    Collided(BodyId),
}

/// Forcibly attach the player to `id` at `angle`.
///
/// Used at challenge start, where there is no prior velocity to reason about;
/// callers pass a random angle.  Returns `false` (and changes nothing) for an
/// unknown body.
pub fn attach_to_orbit(player: &mut Player, bodies: &[Body], id: BodyId, angle: f32) -> bool {
    let Some(body) = bodies.get(id.0) else {
        return false;
    };
    player.state = OrbitState::Orbiting { body: id, angle };
    player.position = point_on_circle(body.position, body.orbit_radius, angle);
    true
}

/// Move the player by `dt` unit steps in its current state.
pub fn advance(player: &mut Player, bodies: &[Body], dt: f32) {
    match &mut player.state {
        OrbitState::Orbiting { body, angle } => {
            if let Some(b) = bodies.get(body.0) {
                *angle += b.orbit_speed * dt;
                player.position = point_on_circle(b.position, b.orbit_radius, *angle);
            }
        }
        OrbitState::Free {
            velocity,
            released_from,
        } => {
            player.position += *velocity * dt;
            // The exclusion only lasts until the player clears that body's range.
            if let Some(id) = *released_from {
                let cleared = bodies
                    .get(id.0)
                    .map_or(true, |b| distance(player.position, b.position) >= b.gravity_range);
                if cleared {
                    *released_from = None;
                }
            }
        }
    }
}

/// Re-derive an orbiting player's position from its body's current centre.
///
/// Run after scripted body motion so the player ends the tick on the orbit
/// circle of the body as it now stands.  Free players are untouched.
pub fn follow_orbited_body(player: &mut Player, bodies: &[Body]) {
    if let OrbitState::Orbiting { body, angle } = player.state {
        if let Some(b) = bodies.get(body.0) {
            player.position = point_on_circle(b.position, b.orbit_radius, angle);
        }
    }
}

/// Leave the current orbit on a tangent at `launch_speed`.
///
/// Returns the new velocity, or `None` when the player was not orbiting
/// (the request is then a no-op).  If the player sits exactly on the body's
/// centre the radial direction falls back to the orbit angle.
pub fn release(player: &mut Player, bodies: &[Body], launch_speed: f32) -> Option<Vec2> {
    let OrbitState::Orbiting { body, angle } = player.state else {
        return None;
    };
    let center = bodies.get(body.0)?.position;

    let radial = unit_or(player.position - center, Vec2::new(angle.cos(), angle.sin()));
    let velocity = perpendicular(radial) * launch_speed;
    player.state = OrbitState::Free {
        velocity,
        released_from: Some(body),
    };
    debug!("released from body {} with velocity {velocity}", body.0);
    Some(velocity)
}

/// Scan `bodies` in order for a collision or capture.
///
/// Per body: touching the solid radius is a collision; otherwise being inside
/// `gravity_range`, outside `inner_fraction × orbit_radius` and moving toward
/// the body (negative dot product of offset and velocity) is a capture.  The
/// first body that matches wins.  Orbiting players always get `Clear`.
pub fn check_capture(player: &Player, bodies: &[Body], inner_fraction: f32) -> CaptureCheck {
    let OrbitState::Free {
        velocity,
        released_from,
    } = player.state
    else {
        return CaptureCheck::Clear;
    };

    for (i, body) in bodies.iter().enumerate() {
        let id = BodyId(i);
        if released_from == Some(id) {
            continue;
        }
        let offset = player.position - body.position;
        let dist = offset.length();

        if dist < body.radius + player.radius {
            return CaptureCheck::Collided(id);
        }
        if dist < body.gravity_range
            && dist > body.orbit_radius * inner_fraction
            && offset.dot(velocity) < 0.0
        {
            return CaptureCheck::Captured(id);
        }
    }
    CaptureCheck::Clear
}

/// Enter orbit around `id` at the angle the player currently sits at, so the
/// snap onto the orbit circle is purely radial.
pub fn capture(player: &mut Player, bodies: &[Body], id: BodyId) -> bool {
    let Some(body) = bodies.get(id.0) else {
        return false;
    };
    let angle = angle_from(body.position, player.position);
    attach_to_orbit(player, bodies, id, angle)
}

/// Dilation factor at `position`: the multiplier of the first black hole
/// within `range_factor × gravity_range`, else exactly 1.0.
pub fn time_dilation(position: Vec2, bodies: &[Body], range_factor: f32) -> f32 {
    bodies
        .iter()
        .filter(|b| b.kind == BodyKind::BlackHole)
        .find(|b| distance(position, b.position) < b.gravity_range * range_factor)
        .and_then(Body::time_dilation)
        .unwrap_or(1.0)
}
