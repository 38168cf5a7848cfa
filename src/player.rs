//! The controlled body and its motion trail.
//!
//! The player is always either orbiting a body or in free flight; see
//! [`crate::orbit::OrbitState`].  Systems that move it live in
//! [`crate::orbit`]; this module only holds state and trail bookkeeping.

use crate::body::BodyId;
use crate::constants::{
    TRAIL_FADE_PER_TICK, TRAIL_MAX_POINTS, TRAIL_MAX_POINTS_COMPACT, TRAIL_SPACING,
    TRAIL_SPACING_COMPACT,
};
use crate::geometry::Viewport;
use crate::orbit::OrbitState;
use bevy::math::Vec2;
use std::collections::VecDeque;

/// The player-steered object.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub radius: f32,
    pub state: OrbitState,
    pub trail: Trail,
}

impl Player {
    /// A resting player at the origin, not attached to anything.
    pub fn new(radius: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            radius,
            state: OrbitState::Free {
                velocity: Vec2::ZERO,
                released_from: None,
            },
            trail: Trail::default(),
        }
    }

    pub fn is_orbiting(&self) -> bool {
        matches!(self.state, OrbitState::Orbiting { .. })
    }

    pub fn orbited_body(&self) -> Option<BodyId> {
        match self.state {
            OrbitState::Orbiting { body, .. } => Some(body),
            OrbitState::Free { .. } => None,
        }
    }

    /// Linear velocity in free flight; `None` while the orbit drives motion.
    pub fn velocity(&self) -> Option<Vec2> {
        match self.state {
            OrbitState::Free { velocity, .. } => Some(velocity),
            OrbitState::Orbiting { .. } => None,
        }
    }

    /// Drop back to a resting free state and forget the trail.
    pub fn reset(&mut self) {
        self.state = OrbitState::Free {
            velocity: Vec2::ZERO,
            released_from: None,
        };
        self.trail.clear();
    }
}

// ── Trail ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSettings {
    /// Per-axis distance the player must move before a point is recorded.
    pub spacing: f32,
    pub max_points: usize,
    pub fade_per_tick: f32,
}

impl TrailSettings {
    pub fn for_viewport(viewport: Viewport) -> Self {
        if viewport.is_compact() {
            Self {
                spacing: TRAIL_SPACING_COMPACT,
                max_points: TRAIL_MAX_POINTS_COMPACT,
                fade_per_tick: TRAIL_FADE_PER_TICK,
            }
        } else {
            Self {
                spacing: TRAIL_SPACING,
                max_points: TRAIL_MAX_POINTS,
                fade_per_tick: TRAIL_FADE_PER_TICK,
            }
        }
    }
}

/// Bounded list of recent positions, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
}

impl Trail {
    /// One tick of bookkeeping: maybe record `position`, cap the length, fade.
    pub fn record(&mut self, position: Vec2, settings: &TrailSettings) {
        let moved = match self.points.back() {
            None => true,
            Some(last) => {
                (position.x - last.position.x).abs() > settings.spacing
                    || (position.y - last.position.y).abs() > settings.spacing
            }
        };
        if moved {
            self.points.push_back(TrailPoint {
                position,
                alpha: 1.0,
            });
        }
        while self.points.len() > settings.max_points {
            self.points.pop_front();
        }
        for point in &mut self.points {
            point.alpha = (point.alpha - settings.fade_per_tick).max(0.0);
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn newest(&self) -> Option<&TrailPoint> {
        self.points.back()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TrailSettings {
        TrailSettings {
            spacing: 5.0,
            max_points: 3,
            fade_per_tick: 0.08,
        }
    }

    #[test]
    fn first_position_is_always_recorded() {
        let mut trail = Trail::default();
        trail.record(Vec2::new(1.0, 1.0), &settings());
        assert_eq!(trail.len(), 1);
        assert!((trail.newest().unwrap().alpha - 0.92).abs() < 1e-6);
    }

    #[test]
    fn small_moves_are_not_recorded() {
        let mut trail = Trail::default();
        trail.record(Vec2::ZERO, &settings());
        trail.record(Vec2::new(4.0, -4.0), &settings());
        assert_eq!(trail.len(), 1);
        trail.record(Vec2::new(0.0, 5.5), &settings());
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn oldest_points_are_dropped_past_capacity() {
        let mut trail = Trail::default();
        for i in 0..6 {
            trail.record(Vec2::new(i as f32 * 10.0, 0.0), &settings());
        }
        assert_eq!(trail.len(), 3);
        let xs: Vec<f32> = trail.points().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![30.0, 40.0, 50.0]);
    }

    #[test]
    fn alpha_never_goes_negative() {
        let mut trail = Trail::default();
        for _ in 0..40 {
            trail.record(Vec2::ZERO, &settings());
        }
        assert_eq!(trail.newest().unwrap().alpha, 0.0);
    }

    #[test]
    fn compact_viewport_uses_short_trail() {
        let compact = TrailSettings::for_viewport(Viewport::new(400.0, 800.0));
        let wide = TrailSettings::for_viewport(Viewport::new(1200.0, 800.0));
        assert_eq!(compact.max_points, TRAIL_MAX_POINTS_COMPACT);
        assert_eq!(wide.max_points, TRAIL_MAX_POINTS);
        assert!(compact.spacing > wide.spacing);
    }

    #[test]
    fn velocity_is_hidden_while_orbiting() {
        let mut player = Player::new(4.0);
        assert_eq!(player.velocity(), Some(Vec2::ZERO));
        player.state = OrbitState::Orbiting {
            body: BodyId(0),
            angle: 0.0,
        };
        assert_eq!(player.velocity(), None);
        assert_eq!(player.orbited_body(), Some(BodyId(0)));
    }
}
