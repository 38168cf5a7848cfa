//! Bevy driver for the [`Session`].
//!
//! ## Systems (registered by `SimulationPlugin`)
//!
//! | System                     | Schedule  | Purpose                                      |
//! |----------------------------|-----------|----------------------------------------------|
//! | `setup_session`            | `Startup` | Build the `Session` from the loaded config   |
//! | `sync_viewport_system`     | `Update`  | Track the primary window size                |
//! | `player_input_system`      | `Update`  | Tap / click / space: start, release, restart |
//! | `simulation_tick_system`   | `Update`  | Throttled `advance_tick`                     |
//! | `session_event_system`     | `Update`  | Forward session notifications as messages    |
//!
//! The four `Update` systems are chained in that order and only run once the
//! `Session` resource exists.

use crate::clock::FrameThrottle;
use crate::config::{load_game_config, GameConfig};
use crate::geometry::Viewport;
use crate::session::{GamePhase, Session, SessionEvent};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// A session notification re-broadcast for presentation systems.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SessionNotice(pub SessionEvent);

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SessionNotice>()
            .add_systems(Startup, setup_session.after(load_game_config))
            .add_systems(
                Update,
                (
                    sync_viewport_system,
                    player_input_system,
                    simulation_tick_system,
                    session_event_system,
                )
                    .chain()
                    .run_if(resource_exists::<Session>),
            );
    }
}

fn window_viewport(window: &Window) -> Viewport {
    Viewport::new(window.width(), window.height())
}

/// Insert the [`Session`] and [`FrameThrottle`] sized to the primary window.
pub fn setup_session(
    mut commands: Commands,
    config: Res<GameConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = windows
        .single()
        .map(window_viewport)
        .unwrap_or_default();
    commands.insert_resource(Session::new(config.clone(), viewport));
    commands.insert_resource(FrameThrottle::new(config.frame_delay_ms()));
    match config.seed {
        Some(seed) => println!(
            "✓ Session ready at {}×{} (seed {seed})",
            viewport.width, viewport.height
        ),
        None => println!("✓ Session ready at {}×{}", viewport.width, viewport.height),
    }
}

pub fn sync_viewport_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut session: ResMut<Session>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport = window_viewport(window);
    // Compare first so change detection only fires on a real resize.
    if session.viewport() != viewport {
        debug!("viewport resized to {}×{}", viewport.width, viewport.height);
        session.set_viewport(viewport);
    }
}

/// One input gesture drives every transition: tap, left click or space.
///
/// - **StartScreen**: start a session.
/// - **Playing**: release from the current orbit.
/// - **GameOver**: back to the start screen (`R` also works).
pub fn player_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Option<Res<Touches>>,
    mut session: ResMut<Session>,
) {
    let tapped = mouse.just_pressed(MouseButton::Left)
        || keys.just_pressed(KeyCode::Space)
        || touches.is_some_and(|t| t.any_just_pressed());

    match session.phase() {
        GamePhase::StartScreen => {
            if tapped {
                session.start();
            }
        }
        GamePhase::Playing => {
            if tapped {
                session.request_release();
            }
        }
        GamePhase::GameOver => {
            if tapped || keys.just_pressed(KeyCode::KeyR) {
                session.restart();
            }
        }
    }
}

/// Feed real frame time through the throttle into the session.
pub fn simulation_tick_system(
    time: Res<Time>,
    mut throttle: ResMut<FrameThrottle>,
    mut session: ResMut<Session>,
) {
    if session.phase() != GamePhase::Playing {
        return;
    }
    if let Some(dt_ms) = throttle.poll(time.delta_secs() * 1000.0) {
        session.advance_tick(f64::from(dt_ms));
    }
}

/// Drain the session's notification queue and forward it to presentation.
///
/// The session already logs each transition, so events are only traced here.
pub fn session_event_system(
    mut session: ResMut<Session>,
    mut notices: MessageWriter<SessionNotice>,
) {
    for event in session.drain_events() {
        trace!("session event: {event:?}");
        notices.write(SessionNotice(event));
    }
}
