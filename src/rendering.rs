//! Gizmo drawing, HUD text and the decorative starfield.
//!
//! The simulation works in screen coordinates (origin top-left, y down);
//! Bevy's 2D camera is centred with y up.  Every draw call goes through
//! [`to_world`].

use crate::body::BodyKind;
use crate::debris::DebrisKind;
use crate::geometry::Viewport;
use crate::menu::GameState;
use crate::session::{GamePhase, Session, SessionEvent};
use crate::simulation::SessionNotice;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Starfield>()
            .add_systems(Startup, (setup_camera, setup_hud))
            .add_systems(OnEnter(GameState::StartScreen), regenerate_starfield)
            .add_systems(
                Update,
                (
                    starfield_notice_system,
                    draw_starfield,
                    (draw_bodies, draw_wormhole, draw_debris, draw_player),
                    hud_system,
                )
                    .chain()
                    .run_if(resource_exists::<Session>),
            );
    }
}

/// Screen-space point → world-space point for a centred 2D camera.
pub fn to_world(p: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(p.x - viewport.width * 0.5, viewport.height * 0.5 - p.y)
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

// ── Starfield ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub position: Vec2,
    pub size: f32,
    pub brightness: f32,
}

/// Purely decorative background, in screen coordinates.
#[derive(Resource, Debug, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, viewport: Viewport) {
        let count = if viewport.is_compact() { 50 } else { 100 };
        self.stars = (0..count)
            .map(|_| Star {
                position: Vec2::new(
                    rng.gen::<f32>() * viewport.width,
                    rng.gen::<f32>() * viewport.height,
                ),
                size: rng.gen_range(0.5_f32..2.0),
                brightness: rng.gen_range(0.2_f32..1.0),
            })
            .collect();
    }
}

pub fn regenerate_starfield(mut starfield: ResMut<Starfield>, session: Option<Res<Session>>) {
    let viewport = session.map(|s| s.viewport()).unwrap_or_default();
    starfield.regenerate(&mut rand::thread_rng(), viewport);
}

/// New challenges get a new sky.
pub fn starfield_notice_system(
    mut notices: MessageReader<SessionNotice>,
    mut starfield: ResMut<Starfield>,
    session: Res<Session>,
) {
    let new_challenge = notices
        .read()
        .any(|n| matches!(n.0, SessionEvent::ChallengeStarted { .. }));
    if new_challenge || starfield.stars.is_empty() {
        starfield.regenerate(&mut rand::thread_rng(), session.viewport());
    }
}

pub fn draw_starfield(mut gizmos: Gizmos, starfield: Res<Starfield>, session: Res<Session>) {
    let vp = session.viewport();
    for star in &starfield.stars {
        gizmos.circle_2d(
            to_world(star.position, vp),
            star.size,
            Color::srgba(1.0, 1.0, 1.0, star.brightness),
        );
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

fn body_color(kind: BodyKind) -> Color {
    match kind {
        BodyKind::Normal => Color::srgb(1.0, 0.80, 0.35),
        BodyKind::Neutron => Color::srgb(0.55, 0.85, 1.0),
        BodyKind::BlackHole => Color::srgb(0.55, 0.25, 0.85),
    }
}

pub fn draw_bodies(mut gizmos: Gizmos, session: Res<Session>) {
    let vp = session.viewport();
    let orbited = session.player().orbited_body();

    for (i, body) in session.bodies().iter().enumerate() {
        let center = to_world(body.position, vp);
        let color = body_color(body.kind);
        gizmos.circle_2d(center, body.radius, color);

        let ring_alpha = if orbited.is_some_and(|id| id.0 == i) {
            0.45
        } else {
            0.15
        };
        gizmos.circle_2d(
            center,
            body.orbit_radius,
            Color::srgba(1.0, 1.0, 1.0, ring_alpha),
        );
        gizmos.circle_2d(
            center,
            body.gravity_range,
            Color::srgba(0.4, 0.6, 1.0, 0.05),
        );

        if body.kind == BodyKind::BlackHole {
            // Accretion disk
            gizmos.circle_2d(center, body.radius * 1.6, Color::srgba(1.0, 0.5, 0.2, 0.6));
        }
    }
}

pub fn draw_wormhole(mut gizmos: Gizmos, session: Res<Session>) {
    let Some(target) = session.wormhole() else {
        return;
    };
    let vp = session.viewport();
    let center = to_world(target.position, vp);
    let pulse = 1.0 + target.pulse_phase.sin() * 0.1;

    gizmos.circle_2d(center, target.radius * pulse, Color::srgb(0.35, 0.9, 0.95));
    gizmos.circle_2d(
        center,
        target.radius * 1.5,
        Color::srgba(0.35, 0.9, 0.95, 0.2),
    );
    for arm in 0..4 {
        // Screen y is flipped, so negate the angle to keep the spin direction.
        let angle = -(target.rotation + arm as f32 * TAU / 4.0);
        let tip = center + Vec2::from_angle(angle) * target.radius * 1.2;
        gizmos.line_2d(center, tip, Color::srgba(0.8, 1.0, 1.0, 0.7));
    }
}

pub fn draw_debris(mut gizmos: Gizmos, session: Res<Session>) {
    let vp = session.viewport();
    for piece in session.debris() {
        let center = to_world(piece.position, vp);
        match piece.kind {
            DebrisKind::Lethal => {
                let color = Color::srgb(0.95, 0.35, 0.30);
                gizmos.circle_2d(center, piece.radius, color);
                let spoke = Vec2::from_angle(-piece.rotation) * piece.radius * 1.4;
                gizmos.line_2d(center - spoke, center + spoke, color);
            }
            DebrisKind::Bonus => {
                gizmos.circle_2d(center, piece.radius, Color::srgb(0.35, 0.6, 1.0));
                gizmos.circle_2d(
                    center,
                    piece.radius * 2.0,
                    Color::srgba(0.35, 0.6, 1.0, 0.35),
                );
            }
        }
    }
}

pub fn draw_player(mut gizmos: Gizmos, session: Res<Session>) {
    if session.phase() == GamePhase::StartScreen {
        return;
    }
    let vp = session.viewport();
    let player = session.player();

    for point in player.trail.points() {
        gizmos.circle_2d(
            to_world(point.position, vp),
            player.radius * 0.6,
            Color::srgba(0.6, 0.8, 1.0, point.alpha * 0.6),
        );
    }

    let center = to_world(player.position, vp);
    gizmos.circle_2d(center, player.radius, Color::WHITE);
    if session.dilation() > 1.0 {
        gizmos.circle_2d(
            center,
            player.radius * 2.5,
            Color::srgba(0.7, 0.4, 1.0, 0.5),
        );
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Marker for the top-left status line.
#[derive(Component)]
pub struct HudText;

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.85, 0.90, 1.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        Visibility::Hidden,
        HudText,
    ));
}

pub fn hud_text(session: &Session) -> String {
    let seconds = session.remaining_ms().max(0.0) / 1000.0;
    let mut line = format!(
        "Time {seconds:.1}s  ·  Completed {}",
        session.challenges_completed()
    );
    if session.dilation() > 1.0 {
        line.push_str(&format!("  ·  Time ×{:.1}", session.dilation()));
    }
    if session.is_completing() {
        line.push_str("  ·  Wormhole reached!");
    }
    line
}

pub fn hud_system(
    session: Res<Session>,
    mut query: Query<(&mut Text, &mut Visibility), With<HudText>>,
) {
    for (mut text, mut visibility) in query.iter_mut() {
        if session.phase() != GamePhase::Playing {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Visible;
        *text = Text::new(hud_text(&session));
    }
}
