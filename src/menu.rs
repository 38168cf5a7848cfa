//! Start-screen and game-over overlays, and the `GameState` that shows them.
//!
//! ## States
//!
//! | State         | Description                                   |
//! |---------------|-----------------------------------------------|
//! | `StartScreen` | Initial state; title and instructions shown   |
//! | `Playing`     | A challenge is running; HUD visible           |
//! | `GameOver`    | Session ended; cause and restart hint shown   |
//!
//! `GameState` is a mirror: the [`Session`] owns the real phase and
//! `sync_game_state_system` follows it, so overlays appear and disappear
//! through the usual `OnEnter`/`OnExit` schedules.
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                    | Schedule                | Purpose                        |
//! |---------------------------|-------------------------|--------------------------------|
//! | `setup_start_screen`      | `OnEnter(StartScreen)`  | Spawn title overlay            |
//! | `cleanup_start_screen`    | `OnExit(StartScreen)`   | Despawn title overlay          |
//! | `setup_game_over`         | `OnEnter(GameOver)`     | Spawn game-over overlay        |
//! | `cleanup_game_over`       | `OnExit(GameOver)`      | Despawn game-over overlay      |
//! | `sync_game_state_system`  | `Update`                | Follow `Session::phase`        |
//! | `quit_key_system`         | `Update`                | Escape quits from any overlay  |

use crate::session::{GamePhase, Session};
use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    StartScreen,
    Playing,
    GameOver,
}

impl From<GamePhase> for GameState {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::StartScreen => GameState::StartScreen,
            GamePhase::Playing => GameState::Playing,
            GamePhase::GameOver => GameState::GameOver,
        }
    }
}

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the start-screen overlay.
#[derive(Component)]
pub struct StartScreenRoot;

/// Root node of the game-over overlay.
#[derive(Component)]
pub struct GameOverRoot;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState`, the overlays and the phase mirror.
///
/// Add this plugin before anything that uses `in_state(GameState::..)`.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::StartScreen), setup_start_screen)
            .add_systems(OnExit(GameState::StartScreen), cleanup_start_screen)
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over)
            .add_systems(
                Update,
                (
                    sync_game_state_system.run_if(resource_exists::<Session>),
                    quit_key_system.run_if(not(in_state(GameState::Playing))),
                ),
            );
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn title_color() -> Color {
    Color::srgb(0.30, 0.65, 1.0)
}
fn subtitle_color() -> Color {
    Color::srgb(0.75, 0.75, 0.85)
}
fn hint_color() -> Color {
    Color::srgb(0.40, 0.40, 0.50)
}
fn danger_color() -> Color {
    Color::srgb(1.0, 0.32, 0.32)
}

fn overlay_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        flex_direction: FlexDirection::Column,
        position_type: PositionType::Absolute,
        left: Val::Px(0.0),
        top: Val::Px(0.0),
        ..default()
    }
}

fn line(parent: &mut ChildSpawnerCommands<'_>, text: impl Into<String>, size: f32, color: Color) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    ));
}

/// Spawn a fixed-height invisible spacer node.
fn spacer(parent: &mut ChildSpawnerCommands<'_>, px: f32) {
    parent.spawn(Node {
        height: Val::Px(px),
        ..default()
    });
}

// ── Start screen ──────────────────────────────────────────────────────────────

/// ```text
/// ┌─────────────────────────────────────────────┐
/// │                  ORBITS                     │
/// │   Tap to release from orbit. Reach the      │
/// │   wormhole in 90 seconds. Avoid debris.     │
/// │                                             │
/// │            Tap to start                     │
/// └─────────────────────────────────────────────┘
/// ```
pub fn setup_start_screen(mut commands: Commands, session: Option<Res<Session>>) {
    let seconds = session
        .map(|s| s.config().challenge_time_limit_ms / 1000.0)
        .unwrap_or(crate::constants::CHALLENGE_TIME_LIMIT_MS / 1000.0);

    commands
        .spawn((overlay_node(), StartScreenRoot))
        .with_children(|root| {
            line(root, "ORBITS", 64.0, title_color());
            spacer(root, 24.0);
            line(root, "Tap to release from orbit.", 18.0, subtitle_color());
            line(
                root,
                format!("Reach the wormhole in {seconds:.0} seconds."),
                18.0,
                subtitle_color(),
            );
            line(root, "Avoid debris. Blue debris buys time.", 18.0, subtitle_color());
            line(
                root,
                "Black holes make your clock run faster.",
                18.0,
                subtitle_color(),
            );
            spacer(root, 40.0);
            line(root, "Tap, click or press Space to start", 20.0, Color::WHITE);
            spacer(root, 12.0);
            line(root, "Esc to quit", 12.0, hint_color());
        });
}

pub fn cleanup_start_screen(mut commands: Commands, query: Query<Entity, With<StartScreenRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

pub fn setup_game_over(mut commands: Commands, session: Option<Res<Session>>) {
    let (cause, completed) = session
        .as_ref()
        .map(|s| {
            (
                s.game_over_cause()
                    .map_or_else(|| "game over".to_string(), |c| c.to_string()),
                s.challenges_completed(),
            )
        })
        .unwrap_or_else(|| ("game over".to_string(), 0));

    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            ZIndex(300),
            GameOverRoot,
        ))
        .with_children(|root| {
            line(root, "GAME OVER", 52.0, danger_color());
            spacer(root, 8.0);
            line(root, cause.to_uppercase(), 20.0, subtitle_color());
            spacer(root, 16.0);
            line(
                root,
                format!("Challenges completed: {completed}"),
                22.0,
                Color::WHITE,
            );
            spacer(root, 36.0);
            line(root, "Tap or press R to continue", 18.0, subtitle_color());
            spacer(root, 12.0);
            line(root, "Esc to quit", 12.0, hint_color());
        });
}

pub fn cleanup_game_over(mut commands: Commands, query: Query<Entity, With<GameOverRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

// ── Update ────────────────────────────────────────────────────────────────────

/// Request a `GameState` transition whenever the session phase moves on.
pub fn sync_game_state_system(
    session: Res<Session>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let target = GameState::from(session.phase());
    if *state.get() != target {
        next_state.set(target);
    }
}

pub fn quit_key_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(bevy::app::AppExit::Success);
    }
}
