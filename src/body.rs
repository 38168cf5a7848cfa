//! Celestial bodies and star-system generation.
//!
//! Every challenge is played in a freshly generated system.  Bodies never
//! attract each other; they sit at fixed positions except the two stars of a
//! binary pair, which follow a scripted circle around their shared centre
//! (see [`Motion`]).
//!
//! ## Layouts
//!
//! | Layout         | Roll                                   | Bodies                                  |
//! |----------------|----------------------------------------|-----------------------------------------|
//! | `Binary`       | first roll > `binary_system_threshold` | 2 co-orbiting stars + 2 satellites      |
//! | `MultiNeutron` | after challenge 1, second roll > `multi_neutron_threshold` | 3 neutron stars + central black hole + 2 satellites |
//! | `Regular`      | otherwise                              | home star + 3–4 satellites              |
//!
//! Satellites are placed by rejection sampling under a [`PlacementPolicy`];
//! when every attempt fails the satellite is simply left out.

use crate::config::GameConfig;
use crate::constants::SATELLITE_EDGE_INSET;
use crate::geometry::{distance, point_on_circle, Viewport};
use bevy::log::debug;
use bevy::math::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Index of a body in the session's body list.
///
/// Bodies are only ever replaced as a whole set, so an id stays valid for the
/// lifetime of the challenge that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

/// Per-kind physical constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub mass: f32,
    pub gravitational_constant: f32,
    /// Scales the default angular speed of satellites placed around this kind.
    pub orbit_speed_multiplier: f32,
    /// Real-time multiplier applied near the body; only black holes have one.
    pub time_dilation: Option<f32>,
}

impl KindProfile {
    /// `G · m`, the numerator of every force and orbital-velocity formula.
    pub fn gravity_strength(&self) -> f32 {
        self.gravitational_constant * self.mass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Normal,
    Neutron,
    BlackHole,
}

impl BodyKind {
    pub const fn profile(self) -> KindProfile {
        match self {
            BodyKind::Normal => KindProfile {
                mass: 1.0,
                gravitational_constant: 500.0,
                orbit_speed_multiplier: 1.0,
                time_dilation: None,
            },
            BodyKind::Neutron => KindProfile {
                mass: 3.0,
                gravitational_constant: 800.0,
                orbit_speed_multiplier: 2.5,
                time_dilation: None,
            },
            BodyKind::BlackHole => KindProfile {
                mass: 5.0,
                gravitational_constant: 1200.0,
                orbit_speed_multiplier: 1.8,
                time_dilation: Some(1.5),
            },
        }
    }
}

/// How a body's position evolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Fixed,
    /// Scripted circular motion around `center`; position is derived from
    /// `phase`, never integrated.
    BinaryPhase {
        center: Vec2,
        radius: f32,
        phase: f32,
        phase_rate: f32,
    },
}

/// A gravitating object.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Solid radius; touching it is fatal.
    pub radius: f32,
    /// Radius of the circle a captured satellite follows.
    pub orbit_radius: f32,
    /// Angular speed of satellites, radians per unit step.
    pub orbit_speed: f32,
    /// Radius of influence for capture and debris gravity.
    pub gravity_range: f32,
    pub kind: BodyKind,
    pub motion: Motion,
}

impl Body {
    pub fn new(
        kind: BodyKind,
        position: Vec2,
        radius: f32,
        orbit_radius: f32,
        orbit_speed: f32,
        gravity_range: f32,
    ) -> Self {
        Self {
            position,
            radius,
            orbit_radius,
            orbit_speed,
            gravity_range,
            kind,
            motion: Motion::Fixed,
        }
    }

    /// Put the body on a scripted circle; its position snaps to the phase.
    pub fn with_binary_motion(mut self, center: Vec2, radius: f32, phase: f32, rate: f32) -> Self {
        self.motion = Motion::BinaryPhase {
            center,
            radius,
            phase,
            phase_rate: rate,
        };
        self.position = point_on_circle(center, radius, phase);
        self
    }

    pub fn profile(&self) -> KindProfile {
        self.kind.profile()
    }

    pub fn time_dilation(&self) -> Option<f32> {
        self.kind.profile().time_dilation
    }

    /// Advance scripted motion by `dt` unit steps.  Fixed bodies are untouched.
    pub fn advance_motion(&mut self, dt: f32) {
        if let Motion::BinaryPhase {
            center,
            radius,
            phase,
            phase_rate,
        } = &mut self.motion
        {
            *phase += *phase_rate * dt;
            self.position = point_on_circle(*center, *radius, *phase);
        }
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// Rejection-sampling rule for placing a new body among existing ones.
///
/// A candidate is accepted only if it is farther than `min_separation` from
/// every body already placed.  After `max_attempts` rejected candidates the
/// placement gives up and returns `None`; callers omit the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPolicy {
    pub max_attempts: u32,
    pub min_separation: f32,
}

impl PlacementPolicy {
    pub fn for_satellites(config: &GameConfig, scale: f32) -> Self {
        Self {
            max_attempts: config.placement_max_attempts,
            min_separation: config.satellite_min_separation * scale,
        }
    }

    pub fn accepts(&self, candidate: Vec2, bodies: &[Body]) -> bool {
        bodies
            .iter()
            .all(|b| distance(candidate, b.position) > self.min_separation)
    }

    /// Draw candidates from `sample` until one is accepted or attempts run out.
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        bodies: &[Body],
        mut sample: impl FnMut(&mut R) -> Vec2,
    ) -> Option<Vec2> {
        (0..self.max_attempts)
            .map(|_| sample(rng))
            .find(|&candidate| self.accepts(candidate, bodies))
    }
}

// ── Generation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemLayout {
    Binary,
    MultiNeutron,
    Regular,
}

/// Roll which layout the next challenge uses.
///
/// Multi-neutron systems are only possible once at least one challenge has
/// been completed.
pub fn choose_layout<R: Rng + ?Sized>(
    rng: &mut R,
    challenges_completed: u32,
    config: &GameConfig,
) -> SystemLayout {
    let binary_roll: f64 = rng.gen();
    let multi_neutron =
        challenges_completed > 0 && rng.gen::<f64>() > config.multi_neutron_threshold;

    if binary_roll > config.binary_system_threshold {
        SystemLayout::Binary
    } else if multi_neutron {
        SystemLayout::MultiNeutron
    } else {
        SystemLayout::Regular
    }
}

/// Roll a layout and build its bodies.  The first body is always the one the
/// player starts on.
pub fn generate_system<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    challenges_completed: u32,
    config: &GameConfig,
) -> (SystemLayout, Vec<Body>) {
    let layout = choose_layout(rng, challenges_completed, config);
    (layout, build_layout(layout, rng, viewport, config))
}

pub fn build_layout<R: Rng + ?Sized>(
    layout: SystemLayout,
    rng: &mut R,
    viewport: Viewport,
    config: &GameConfig,
) -> Vec<Body> {
    let scale = viewport.scale(config.reference_screen_size);
    let policy = PlacementPolicy::for_satellites(config, scale);
    let center = viewport.center();

    let mut bodies = match layout {
        SystemLayout::Binary => binary_pair(rng, center, scale, config.binary_phase_rate),
        SystemLayout::MultiNeutron => neutron_triangle(center, scale),
        SystemLayout::Regular => vec![Body::new(
            BodyKind::Normal,
            center,
            15.0 * scale,
            60.0 * scale,
            0.02,
            150.0 * scale,
        )],
    };

    let satellites = match layout {
        SystemLayout::Binary | SystemLayout::MultiNeutron => 2,
        SystemLayout::Regular => rng.gen_range(3..=4),
    };
    for _ in 0..satellites {
        add_satellite(rng, &mut bodies, viewport, scale, &policy);
    }
    bodies
}

fn binary_pair<R: Rng + ?Sized>(rng: &mut R, center: Vec2, scale: f32, rate: f32) -> Vec<Body> {
    let pair_radius = crate::constants::BINARY_SEPARATION * 0.5 * scale;
    let secondary_kind = if rng.gen_bool(0.5) {
        BodyKind::BlackHole
    } else {
        BodyKind::Normal
    };

    let primary = Body::new(
        BodyKind::Normal,
        center,
        20.0 * scale,
        80.0 * scale,
        0.015,
        200.0 * scale,
    )
    .with_binary_motion(center, pair_radius, PI, rate);
    let secondary = Body::new(
        secondary_kind,
        center,
        15.0 * scale,
        60.0 * scale,
        0.02,
        250.0 * scale,
    )
    .with_binary_motion(center, pair_radius, 0.0, rate);

    vec![primary, secondary]
}

fn neutron_triangle(center: Vec2, scale: f32) -> Vec<Body> {
    let ring = crate::constants::NEUTRON_TRIANGLE_RADIUS * scale;
    let mut bodies: Vec<Body> = (0..3)
        .map(|i| {
            let angle = i as f32 / 3.0 * TAU;
            Body::new(
                BodyKind::Neutron,
                point_on_circle(center, ring, angle),
                8.0 * scale,
                40.0 * scale,
                0.05 + i as f32 * 0.01,
                130.0 * scale,
            )
        })
        .collect();
    bodies.push(Body::new(
        BodyKind::BlackHole,
        center,
        15.0 * scale,
        70.0 * scale,
        0.03,
        200.0 * scale,
    ));
    bodies
}

/// 30% black hole, otherwise an even split between neutron and normal.
pub fn roll_satellite_kind<R: Rng + ?Sized>(rng: &mut R) -> BodyKind {
    if rng.gen::<f32>() < 0.3 {
        BodyKind::BlackHole
    } else if rng.gen::<f32>() < 0.5 {
        BodyKind::Neutron
    } else {
        BodyKind::Normal
    }
}

/// Build a satellite of `kind`; only normal bodies draw a random size.
pub fn satellite<R: Rng + ?Sized>(rng: &mut R, kind: BodyKind, position: Vec2, scale: f32) -> Body {
    let radius = match kind {
        BodyKind::Neutron => 8.0 * scale,
        BodyKind::BlackHole => 12.0 * scale,
        BodyKind::Normal => rng.gen_range(10.0_f32..20.0) * scale,
    };
    let orbit_radius = match kind {
        BodyKind::Neutron => 40.0 * scale,
        BodyKind::BlackHole => 70.0 * scale,
        BodyKind::Normal => radius * 3.0 + 20.0,
    };
    let gravity_range = match kind {
        BodyKind::BlackHole => 200.0 * scale,
        _ => 150.0 * scale,
    };
    Body::new(
        kind,
        position,
        radius,
        orbit_radius,
        satellite_orbit_speed(kind, radius),
        gravity_range,
    )
}

/// Smaller bodies spin their satellites faster.
pub fn satellite_orbit_speed(kind: BodyKind, radius: f32) -> f32 {
    kind.profile().orbit_speed_multiplier * 0.02 / radius.sqrt()
}

/// Place one satellite; returns `false` when placement was exhausted.
pub fn add_satellite<R: Rng + ?Sized>(
    rng: &mut R,
    bodies: &mut Vec<Body>,
    viewport: Viewport,
    scale: f32,
    policy: &PlacementPolicy,
) -> bool {
    let inset = SATELLITE_EDGE_INSET * scale;
    let span = Vec2::new(
        (viewport.width - 2.0 * inset).max(0.0),
        (viewport.height - 2.0 * inset).max(0.0),
    );
    let placed = policy.place(rng, bodies, |rng| {
        Vec2::new(
            inset + rng.gen::<f32>() * span.x,
            inset + rng.gen::<f32>() * span.y,
        )
    });

    match placed {
        Some(position) => {
            let kind = roll_satellite_kind(rng);
            bodies.push(satellite(rng, kind, position, scale));
            true
        }
        None => {
            debug!(
                "satellite omitted after {} placement attempts",
                policy.max_attempts
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn only_black_holes_dilate_time() {
        assert_eq!(BodyKind::Normal.profile().time_dilation, None);
        assert_eq!(BodyKind::Neutron.profile().time_dilation, None);
        assert_eq!(BodyKind::BlackHole.profile().time_dilation, Some(1.5));
    }

    #[test]
    fn gravity_strength_is_g_times_mass() {
        assert_eq!(BodyKind::Normal.profile().gravity_strength(), 500.0);
        assert_eq!(BodyKind::Neutron.profile().gravity_strength(), 2400.0);
        assert_eq!(BodyKind::BlackHole.profile().gravity_strength(), 6000.0);
    }

    #[test]
    fn satellite_sizes_follow_kind() {
        let mut r = rng();
        let n = satellite(&mut r, BodyKind::Neutron, Vec2::ZERO, 2.0);
        assert_eq!((n.radius, n.orbit_radius, n.gravity_range), (16.0, 80.0, 300.0));
        let b = satellite(&mut r, BodyKind::BlackHole, Vec2::ZERO, 1.0);
        assert_eq!((b.radius, b.orbit_radius, b.gravity_range), (12.0, 70.0, 200.0));
        let p = satellite(&mut r, BodyKind::Normal, Vec2::ZERO, 1.0);
        assert!((10.0..20.0).contains(&p.radius));
        assert!((p.orbit_radius - (p.radius * 3.0 + 20.0)).abs() < 1e-5);
    }

    #[test]
    fn orbit_speed_scales_inverse_sqrt_radius() {
        let speed = satellite_orbit_speed(BodyKind::Neutron, 16.0);
        assert!((speed - 2.5 * 0.02 / 4.0).abs() < 1e-7);
        assert!(
            satellite_orbit_speed(BodyKind::Normal, 10.0)
                > satellite_orbit_speed(BodyKind::Normal, 20.0)
        );
    }

    #[test]
    fn placement_gives_up_after_max_attempts() {
        let policy = PlacementPolicy {
            max_attempts: 7,
            min_separation: 1_000.0,
        };
        let blocker = Body::new(BodyKind::Normal, Vec2::ZERO, 10.0, 30.0, 0.02, 100.0);
        let mut attempts = 0;
        let result = policy.place(&mut rng(), &[blocker], |_| {
            attempts += 1;
            Vec2::new(5.0, 5.0)
        });
        assert_eq!(result, None);
        assert_eq!(attempts, 7, "must try exactly max_attempts candidates");
    }

    #[test]
    fn placement_accepts_first_valid_candidate() {
        let policy = PlacementPolicy {
            max_attempts: 50,
            min_separation: 100.0,
        };
        let blocker = Body::new(BodyKind::Normal, Vec2::ZERO, 10.0, 30.0, 0.02, 100.0);
        let mut candidates = [Vec2::new(50.0, 0.0), Vec2::new(150.0, 0.0)].into_iter();
        let result = policy.place(&mut rng(), &[blocker], |_| {
            candidates.next().unwrap_or(Vec2::ZERO)
        });
        assert_eq!(result, Some(Vec2::new(150.0, 0.0)));
    }

    #[test]
    fn exhausted_satellite_is_omitted() {
        let mut bodies = vec![Body::new(
            BodyKind::Normal,
            Vec2::new(300.0, 300.0),
            10.0,
            30.0,
            0.02,
            100.0,
        )];
        let policy = PlacementPolicy {
            max_attempts: 50,
            min_separation: 10_000.0,
        };
        let placed = add_satellite(
            &mut rng(),
            &mut bodies,
            Viewport::new(600.0, 600.0),
            1.0,
            &policy,
        );
        assert!(!placed);
        assert_eq!(bodies.len(), 1);
    }

    #[test]
    fn binary_motion_keeps_pair_opposite() {
        let bodies = binary_pair(&mut rng(), Vec2::new(300.0, 300.0), 1.0, 0.01);
        let mut a = bodies[0].clone();
        let mut b = bodies[1].clone();
        assert!((a.position - Vec2::new(250.0, 300.0)).length() < 1e-3);
        for _ in 0..37 {
            a.advance_motion(1.0);
            b.advance_motion(1.0);
            assert!((distance(a.position, b.position) - 100.0).abs() < 1e-3);
            let midpoint = (a.position + b.position) * 0.5;
            assert!((midpoint - Vec2::new(300.0, 300.0)).length() < 1e-3);
        }
    }

    #[test]
    fn fixed_body_ignores_motion_update() {
        let mut body = Body::new(BodyKind::Neutron, Vec2::new(1.0, 2.0), 8.0, 40.0, 0.05, 130.0);
        body.advance_motion(10.0);
        assert_eq!(body.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn multi_neutron_layout_has_triangle_and_central_black_hole() {
        let vp = Viewport::new(1200.0, 1200.0);
        let bodies = build_layout(SystemLayout::MultiNeutron, &mut rng(), vp, &GameConfig::default());
        let center = vp.center();
        let neutrons: Vec<_> = bodies.iter().filter(|b| b.kind == BodyKind::Neutron).collect();
        assert!(neutrons.len() >= 3);
        for n in neutrons.iter().take(3) {
            assert!((distance(n.position, center) - 300.0).abs() < 1e-2);
        }
        assert_eq!(bodies[3].kind, BodyKind::BlackHole);
        assert_eq!(bodies[3].position, center);
        assert!(bodies.len() <= 6);
    }

    #[test]
    fn regular_layout_starts_with_home_star() {
        let vp = Viewport::new(1200.0, 800.0);
        let bodies = build_layout(SystemLayout::Regular, &mut rng(), vp, &GameConfig::default());
        assert_eq!(bodies[0].kind, BodyKind::Normal);
        assert_eq!(bodies[0].position, vp.center());
        assert!(bodies.len() <= 5);
        // Satellites respect the separation rule against everything placed before them.
        let min_sep = 180.0 * vp.scale(600.0);
        for (i, b) in bodies.iter().enumerate().skip(1) {
            for earlier in &bodies[..i] {
                assert!(distance(b.position, earlier.position) > min_sep);
            }
        }
    }

    #[test]
    fn first_challenge_never_rolls_multi_neutron() {
        let config = GameConfig::default();
        let mut r = rng();
        for _ in 0..500 {
            assert_ne!(choose_layout(&mut r, 0, &config), SystemLayout::MultiNeutron);
        }
    }

    #[test]
    fn later_challenges_can_roll_every_layout() {
        let config = GameConfig::default();
        let mut r = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(choose_layout(&mut r, 3, &config));
        }
        assert_eq!(seen.len(), 3);
    }
}
