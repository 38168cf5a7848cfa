//! End-to-end scenarios on a scripted [`Session`].
//!
//! Every test builds its own bodies and debris through
//! `Session::load_challenge`, so nothing depends on procedural generation
//! except the tests in the last section, which use a fixed seed.

use bevy::math::Vec2;
use orbits::body::{Body, BodyId, BodyKind};
use orbits::config::GameConfig;
use orbits::debris::{Debris, DebrisKind, DebrisMotion};
use orbits::geometry::{distance, Viewport};
use orbits::orbit::OrbitState;
use orbits::session::{GameOverCause, GamePhase, Session, SessionEvent};
use orbits::wormhole::Wormhole;

const FRAME_MS: f64 = 16.67;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn viewport() -> Viewport {
    Viewport::new(1200.0, 800.0)
}

fn session() -> Session {
    Session::with_seed(GameConfig::default(), viewport(), 7)
}

fn star(x: f32, y: f32) -> Body {
    Body::new(BodyKind::Normal, Vec2::new(x, y), 15.0, 60.0, 0.02, 150.0)
}

fn black_hole(x: f32, y: f32) -> Body {
    Body::new(BodyKind::BlackHole, Vec2::new(x, y), 12.0, 70.0, 0.03, 200.0)
}

fn resting_debris(position: Vec2, kind: DebrisKind) -> Debris {
    Debris {
        position,
        radius: 3.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        kind,
        motion: DebrisMotion::Free {
            velocity: Vec2::ZERO,
        },
    }
}

// ── Orbit invariants ──────────────────────────────────────────────────────────

#[test]
fn attach_at_angle_zero_sits_on_the_positive_x_axis() {
    let mut s = session();
    let body = Body::new(BodyKind::Normal, Vec2::new(300.0, 300.0), 25.0, 50.0, 0.02, 150.0);
    s.load_challenge(vec![body], Vec::new(), None);
    assert!(s.attach_to_orbit(BodyId(0), 0.0));
    assert_eq!(s.player().position, Vec2::new(350.0, 300.0));
}

#[test]
fn orbiting_player_keeps_orbit_radius_every_tick() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 2.0);
    for _ in 0..600 {
        s.advance_tick(FRAME_MS);
        let r = distance(s.player().position, Vec2::new(600.0, 400.0));
        assert!((r - 60.0).abs() < 1e-3, "orbit radius drifted to {r}");
    }
    assert_eq!(s.phase(), GamePhase::Playing);
}

#[test]
fn binary_star_carries_its_satellite_on_the_orbit_circle() {
    let mut s = session();
    let center = Vec2::new(600.0, 400.0);
    let primary = star(0.0, 0.0).with_binary_motion(center, 50.0, 0.0, 0.01);
    s.load_challenge(vec![primary], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 1.0);
    for _ in 0..200 {
        s.advance_tick(FRAME_MS);
        let body = &s.bodies()[0];
        assert!((distance(body.position, center) - 50.0).abs() < 1e-3);
        let r = distance(s.player().position, body.position);
        assert!((r - 60.0).abs() < 1e-3, "player orbit radius drifted to {r}");
    }
    assert_eq!(s.player().orbited_body(), Some(BodyId(0)));
}

#[test]
fn debris_orbiting_a_binary_star_keeps_its_distance() {
    let mut s = session();
    let center = Vec2::new(600.0, 400.0);
    let primary = star(0.0, 0.0).with_binary_motion(center, 50.0, 0.0, 0.01);
    let piece = Debris {
        position: Vec2::ZERO,
        radius: 2.0,
        rotation: 0.0,
        rotation_speed: 0.0,
        kind: DebrisKind::Lethal,
        motion: DebrisMotion::Orbiting {
            body: BodyId(0),
            angle: 2.0,
            distance: 90.0,
            angular_speed: 0.02,
        },
    };
    s.load_challenge(vec![primary], vec![piece], None);
    s.place_player(Vec2::new(100.0, 700.0), Vec2::ZERO);
    for _ in 0..200 {
        s.advance_tick(FRAME_MS);
        let r = distance(s.debris()[0].position, s.bodies()[0].position);
        assert!((r - 90.0).abs() < 1e-3, "debris orbit drifted to {r}");
    }
}

// ── Release ───────────────────────────────────────────────────────────────────

#[test]
fn release_at_angle_zero_around_origin_gives_positive_y_velocity() {
    let mut s = session();
    let body = Body::new(BodyKind::Normal, Vec2::ZERO, 10.0, 50.0, 0.02, 150.0);
    s.load_challenge(vec![body], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 0.0);
    assert!(s.request_release());
    let v = s.player().velocity().expect("free after release");
    assert!(v.x.abs() < 1e-6);
    assert!((v.y - 2.5).abs() < 1e-6);
}

#[test]
fn release_is_always_tangential_with_launch_speed() {
    for i in 0..36 {
        let angle = i as f32 * 0.175;
        let mut s = session();
        s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
        s.attach_to_orbit(BodyId(0), angle);
        s.advance_tick(FRAME_MS);
        let radial = s.player().position - Vec2::new(600.0, 400.0);
        assert!(s.request_release());
        let v = s.player().velocity().unwrap();
        assert!(radial.normalize().dot(v).abs() < 1e-4);
        assert!((v.length() - 2.5).abs() < 1e-5);
    }
}

#[test]
fn release_while_free_is_ignored() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.place_player(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0));
    assert!(!s.request_release());
    assert_eq!(s.player().velocity(), Some(Vec2::new(1.0, 0.0)));
    assert!(s.drain_events().is_empty());
}

#[test]
fn release_emits_event() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 0.0);
    s.request_release();
    assert_eq!(s.drain_events(), vec![SessionEvent::Released(BodyId(0))]);
}

// ── Capture ───────────────────────────────────────────────────────────────────

#[test]
fn receding_player_is_never_captured() {
    for step in 0..20 {
        let d = 50.0 + step as f32 * 4.5;
        let mut s = session();
        s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
        s.place_player(Vec2::new(600.0 + d, 400.0), Vec2::new(0.5, 0.0));
        s.advance_tick(FRAME_MS);
        assert!(!s.player().is_orbiting(), "captured at distance {d}");
    }
}

#[test]
fn tangential_pass_is_not_captured() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.place_player(Vec2::new(700.0, 400.0), Vec2::new(0.0, 1.0));
    s.advance_tick(FRAME_MS);
    // After one step the offset is (100, 1) and velocity (0, 1): dot > 0.
    assert!(!s.player().is_orbiting());
}

#[test]
fn approaching_player_is_captured_without_position_jump() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.place_player(Vec2::new(680.0, 480.0), Vec2::new(-1.0, -1.0));
    s.advance_tick(FRAME_MS);
    match s.player().state {
        OrbitState::Orbiting { body, angle } => {
            assert_eq!(body, BodyId(0));
            assert!((angle - std::f32::consts::FRAC_PI_4).abs() < 1e-3);
        }
        _ => panic!("expected capture"),
    }
}

#[test]
fn flying_into_a_body_ends_the_session() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.place_player(Vec2::new(620.0, 400.0), Vec2::new(-2.0, 0.0));
    s.advance_tick(FRAME_MS);
    assert_eq!(s.phase(), GamePhase::GameOver);
    assert_eq!(s.game_over_cause(), Some(GameOverCause::BodyCollision));
}

#[test]
fn leaving_the_viewport_ends_the_session() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.place_player(Vec2::new(1246.0, 400.0), Vec2::new(2.5, 0.0));
    s.advance_tick(FRAME_MS);
    assert_eq!(s.phase(), GamePhase::Playing, "still inside the buffer");
    s.advance_tick(FRAME_MS);
    assert_eq!(s.phase(), GamePhase::GameOver);
    assert_eq!(s.game_over_cause(), Some(GameOverCause::LeftViewport));
}

// ── Dilation ──────────────────────────────────────────────────────────────────

#[test]
fn dilation_is_neutral_away_from_black_holes() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0), black_hole(100.0, 100.0)], Vec::new(), None);
    s.place_player(Vec2::new(1000.0, 700.0), Vec2::ZERO);
    s.advance_tick(FRAME_MS);
    assert_eq!(s.dilation(), 1.0);
}

#[test]
fn dilation_matches_black_hole_inside_extended_range() {
    let mut s = session();
    s.load_challenge(vec![star(900.0, 400.0), black_hole(300.0, 400.0)], Vec::new(), None);
    // 290 from the hole: outside its 200 gravity range but inside 1.5 × 200.
    s.place_player(Vec2::new(590.0, 400.0), Vec2::ZERO);
    s.advance_tick(FRAME_MS);
    assert_eq!(s.dilation(), 1.5);
    let before = s.remaining_ms();
    s.advance_tick(100.0);
    assert!((before - s.remaining_ms() - 150.0).abs() < 1e-9);
}

// ── Time budget ───────────────────────────────────────────────────────────────

fn ticks_until_game_over(s: &mut Session, dt_ms: f64) -> usize {
    for tick in 1..=10_000 {
        s.advance_tick(dt_ms);
        if s.phase() == GamePhase::GameOver {
            return tick;
        }
    }
    panic!("session never timed out");
}

#[test]
fn budget_expires_exactly_when_exceeded() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 0.0);
    // 90 ticks land exactly on 90000 ms; the 91st exceeds it.
    assert_eq!(ticks_until_game_over(&mut s, 1_000.0), 91);
    assert_eq!(s.game_over_cause(), Some(GameOverCause::TimeExpired));
}

#[test]
fn dilated_budget_expires_sooner() {
    let mut s = session();
    s.load_challenge(vec![black_hole(600.0, 400.0)], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 0.0);
    // 1500 scaled ms per tick: 60 ticks reach 90000, the 61st exceeds it.
    assert_eq!(ticks_until_game_over(&mut s, 1_000.0), 61);
}

#[test]
fn timeout_emits_single_game_over_event() {
    let mut s = session();
    s.load_challenge(vec![star(600.0, 400.0)], Vec::new(), None);
    s.attach_to_orbit(BodyId(0), 0.0);
    s.advance_tick(90_001.0);
    s.advance_tick(FRAME_MS);
    let over: Vec<_> = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::GameOver(_)))
        .collect();
    assert_eq!(over, vec![SessionEvent::GameOver(GameOverCause::TimeExpired)]);
}

// ── Debris ────────────────────────────────────────────────────────────────────

#[test]
fn bonus_debris_adds_time_and_is_consumed() {
    let center = viewport().center();

    let mut control = session();
    control.load_challenge(Vec::new(), Vec::new(), None);
    control.advance_tick(FRAME_MS);

    let mut s = session();
    s.load_challenge(
        Vec::new(),
        vec![
            resting_debris(center, DebrisKind::Bonus),
            resting_debris(Vec2::new(100.0, 100.0), DebrisKind::Lethal),
        ],
        None,
    );
    s.advance_tick(FRAME_MS);

    assert_eq!(s.phase(), GamePhase::Playing);
    assert!((s.remaining_ms() - control.remaining_ms() - 10_000.0).abs() < 1e-9);
    assert_eq!(s.debris().len(), 1);
    assert_eq!(s.debris()[0].kind, DebrisKind::Lethal);
    assert!(s
        .drain_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::BonusCollected { .. })));
}

#[test]
fn lethal_debris_ends_session_and_leaves_field_alone() {
    let center = viewport().center();
    let mut s = session();
    let field = vec![
        resting_debris(Vec2::new(100.0, 100.0), DebrisKind::Bonus),
        resting_debris(center, DebrisKind::Lethal),
        resting_debris(Vec2::new(900.0, 100.0), DebrisKind::Lethal),
    ];
    s.load_challenge(Vec::new(), field.clone(), None);
    s.advance_tick(FRAME_MS);

    assert_eq!(s.phase(), GamePhase::GameOver);
    assert_eq!(s.game_over_cause(), Some(GameOverCause::DebrisCollision));
    assert_eq!(s.debris(), field.as_slice());
}

#[test]
fn orbiting_debris_keeps_its_distance() {
    let mut s = session();
    let piece = Debris {
        position: Vec2::new(690.0, 400.0),
        radius: 2.0,
        rotation: 0.0,
        rotation_speed: 0.03,
        kind: DebrisKind::Lethal,
        motion: DebrisMotion::Orbiting {
            body: BodyId(0),
            angle: 0.0,
            distance: 90.0,
            angular_speed: 0.02,
        },
    };
    s.load_challenge(vec![star(600.0, 400.0)], vec![piece], None);
    s.place_player(Vec2::new(100.0, 700.0), Vec2::ZERO);
    for _ in 0..300 {
        s.advance_tick(FRAME_MS);
        let piece = &s.debris()[0];
        let DebrisMotion::Orbiting { distance: d, .. } = piece.motion else {
            panic!("debris left its orbit");
        };
        assert_eq!(d, 90.0);
        assert!((distance(piece.position, Vec2::new(600.0, 400.0)) - 90.0).abs() < 1e-3);
    }
}

// ── Goal ──────────────────────────────────────────────────────────────────────

#[test]
fn reaching_the_wormhole_counts_once_and_regenerates() {
    let mut s = session();
    let target = Wormhole::new(Vec2::new(300.0, 300.0), 25.0);
    s.load_challenge(vec![star(900.0, 400.0)], Vec::new(), Some(target));
    s.place_player(Vec2::new(300.0, 300.0), Vec2::ZERO);

    s.advance_tick(FRAME_MS);
    s.advance_tick(FRAME_MS);
    assert_eq!(s.challenges_completed(), 1);
    assert!(s.is_completing());

    s.advance_tick(2_000.0);
    assert!(!s.is_completing());
    assert_eq!(s.challenges_completed(), 1);
    assert_eq!(s.phase(), GamePhase::Playing);
    assert!(s.layout().is_some());
    assert!(s.player().is_orbiting());
}

// ── Generated sessions ────────────────────────────────────────────────────────

#[test]
fn generated_challenge_attaches_player_to_first_body() {
    for seed in 0..25 {
        let mut s = Session::with_seed(GameConfig::default(), viewport(), seed);
        assert!(s.start());
        let home = &s.bodies()[0];
        let r = distance(s.player().position, home.position);
        assert!((r - home.orbit_radius).abs() < 1e-3, "seed {seed}");
        let target = s.wormhole().expect("target always placed");
        assert!(target.position.x >= 50.0 && target.position.x <= 1150.0);
        assert!(s.debris().len() <= 30);
    }
}

#[test]
fn full_cycle_start_game_over_restart() {
    let mut s = session();
    assert!(s.start());
    s.place_player(Vec2::new(-200.0, -200.0), Vec2::new(-1.0, 0.0));
    s.advance_tick(FRAME_MS);
    assert_eq!(s.phase(), GamePhase::GameOver);
    assert!(!s.start());
    assert!(s.restart());
    assert_eq!(s.phase(), GamePhase::StartScreen);
    assert!(s.start());
    assert_eq!(s.challenges_completed(), 0);
    assert_eq!(s.remaining_ms(), 90_000.0);
}
