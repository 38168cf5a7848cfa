//! Challenge session controller.
//!
//! ## Phases
//!
//! ```text
//! StartScreen ──start──▶ Playing ──(timeout | out of bounds | collision)──▶ GameOver
//!      ▲                  │  ▲                                                 │
//!      │                  └──┘ wormhole reached: delay, then a new challenge   │
//!      └─────────────────────────────── restart ──────────────────────────────┘
//! ```
//!
//! A [`Session`] owns every piece of simulation state: bodies, debris, the
//! target, the controlled body, the clock and the RNG.  Nothing else mutates
//! them; the Bevy layer only calls [`Session::advance_tick`],
//! [`Session::request_release`] and the phase transitions, then reads the
//! accessors.

use crate::body::{self, Body, BodyId, SystemLayout};
use crate::clock::ChallengeClock;
use crate::config::{GameConfig, ReleaseDilation};
use crate::debris::{self, Debris, DebrisPhysics};
use crate::geometry::Viewport;
use crate::orbit::{self, CaptureCheck, OrbitState};
use crate::player::{Player, TrailSettings};
use crate::wormhole::{self, Wormhole};
use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    StartScreen,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverCause {
    TimeExpired,
    LeftViewport,
    BodyCollision,
    DebrisCollision,
}

impl fmt::Display for GameOverCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameOverCause::TimeExpired => "time's up",
            GameOverCause::LeftViewport => "lost in space",
            GameOverCause::BodyCollision => "crashed into a star",
            GameOverCause::DebrisCollision => "hit by debris",
        };
        f.write_str(text)
    }
}

/// Fire-and-forget notifications for audio and visual feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    ChallengeStarted { number: u32, layout: SystemLayout },
    Captured(BodyId),
    Released(BodyId),
    BonusCollected { remaining_ms: f64 },
    LethalCollision,
    ChallengeComplete { completed: u32 },
    GameOver(GameOverCause),
}

#[derive(Resource, Debug)]
pub struct Session {
    config: GameConfig,
    viewport: Viewport,
    rng: StdRng,
    phase: GamePhase,
    layout: Option<SystemLayout>,
    bodies: Vec<Body>,
    debris: Vec<Debris>,
    wormhole: Option<Wormhole>,
    player: Player,
    clock: ChallengeClock,
    dilation: f32,
    challenges_completed: u32,
    /// Driver milliseconds left before the next challenge is generated.
    completion_delay_ms: Option<f64>,
    game_over_cause: Option<GameOverCause>,
    events: Vec<SessionEvent>,
}

impl Session {
    /// New session on the start screen.  Uses `config.seed` when set.
    pub fn new(config: GameConfig, viewport: Viewport) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, viewport, rng)
    }

    pub fn with_seed(config: GameConfig, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, viewport: Viewport, rng: StdRng) -> Self {
        let scale = viewport.scale(config.reference_screen_size);
        Self {
            player: Player::new(config.player_base_radius * scale),
            clock: ChallengeClock::new(config.challenge_time_limit_ms),
            config,
            viewport,
            rng,
            phase: GamePhase::StartScreen,
            layout: None,
            bodies: Vec::new(),
            debris: Vec::new(),
            wormhole: None,
            dilation: 1.0,
            challenges_completed: 0,
            completion_delay_ms: None,
            game_over_cause: None,
            events: Vec::new(),
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// StartScreen → Playing with a fresh challenge.  No-op in other phases.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::StartScreen {
            return false;
        }
        self.challenges_completed = 0;
        self.phase = GamePhase::Playing;
        info!("session started");
        self.start_challenge();
        true
    }

    /// Generate a new system, debris field and target, and attach the player
    /// to the first body at a random angle.
    pub fn start_challenge(&mut self) {
        let (layout, bodies) = body::generate_system(
            &mut self.rng,
            self.viewport,
            self.challenges_completed,
            &self.config,
        );
        let debris = debris::generate_debris(&mut self.rng, &bodies, self.viewport, &self.config);
        let target = wormhole::place_wormhole(&mut self.rng, &bodies, self.viewport, &self.config);

        info!(
            "challenge {} started: {:?} system, {} bodies, {} debris",
            self.challenges_completed + 1,
            layout,
            bodies.len(),
            debris.len()
        );
        self.install(bodies, debris, Some(target));
        self.layout = Some(layout);

        let angle = self.rng.gen::<f32>() * TAU;
        self.attach_to_orbit(BodyId(0), angle);
        self.events.push(SessionEvent::ChallengeStarted {
            number: self.challenges_completed + 1,
            layout,
        });
    }

    /// Install a hand-built challenge and enter `Playing`.
    ///
    /// The player rests at the viewport centre in free flight; use
    /// [`Session::attach_to_orbit`] or [`Session::place_player`] to position it.
    pub fn load_challenge(
        &mut self,
        bodies: Vec<Body>,
        debris: Vec<Debris>,
        target: Option<Wormhole>,
    ) {
        self.phase = GamePhase::Playing;
        self.layout = None;
        self.install(bodies, debris, target);
        self.player.position = self.viewport.center();
    }

    fn install(&mut self, bodies: Vec<Body>, debris: Vec<Debris>, target: Option<Wormhole>) {
        self.bodies = bodies;
        self.debris = debris;
        self.wormhole = target;
        self.player.reset();
        self.player.radius =
            self.config.player_base_radius * self.viewport.scale(self.config.reference_screen_size);
        self.clock.reset(self.config.challenge_time_limit_ms);
        self.dilation = 1.0;
        self.completion_delay_ms = None;
        self.game_over_cause = None;
    }

    /// GameOver → StartScreen, clearing the challenge.  No-op in other phases.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.bodies.clear();
        self.debris.clear();
        self.wormhole = None;
        self.layout = None;
        self.player.reset();
        self.clock.reset(self.config.challenge_time_limit_ms);
        self.dilation = 1.0;
        self.completion_delay_ms = None;
        self.phase = GamePhase::StartScreen;
        info!("session reset to start screen");
        true
    }

    /// Attach the player to `id` at `angle`.  Near a black hole the dilation
    /// factor switches to that hole's multiplier immediately.
    pub fn attach_to_orbit(&mut self, id: BodyId, angle: f32) -> bool {
        if !orbit::attach_to_orbit(&mut self.player, &self.bodies, id, angle) {
            return false;
        }
        self.dilation = self.bodies[id.0].time_dilation().unwrap_or(1.0);
        true
    }

    /// Put the player in free flight at `position` with `velocity`.
    pub fn place_player(&mut self, position: Vec2, velocity: Vec2) {
        self.player.position = position;
        self.player.state = OrbitState::Free {
            velocity,
            released_from: None,
        };
    }

    /// Release from the current orbit.  Returns `false` (no-op) unless the
    /// player is orbiting during active play.
    pub fn request_release(&mut self) -> bool {
        if self.phase != GamePhase::Playing || self.completion_delay_ms.is_some() {
            return false;
        }
        let Some(from) = self.player.orbited_body() else {
            return false;
        };
        if orbit::release(&mut self.player, &self.bodies, self.config.launch_speed).is_none() {
            return false;
        }
        if self.config.release_dilation == ReleaseDilation::ResetToNeutral {
            self.dilation = 1.0;
        }
        self.events.push(SessionEvent::Released(from));
        true
    }

    /// Resize the playing field.  Takes effect for wraparound and bounds
    /// immediately and for generation from the next challenge.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Run one update pass covering `dt_ms` real milliseconds.
    ///
    /// Does nothing outside `Playing`.  Any transition to `GameOver` ends the
    /// pass immediately.
    pub fn advance_tick(&mut self, dt_ms: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }

        if let Some(left) = self.completion_delay_ms.as_mut() {
            *left -= dt_ms;
            if *left <= 0.0 {
                self.completion_delay_ms = None;
                self.start_challenge();
            }
            return;
        }

        let dt = dt_ms as f32 / self.config.reference_frame_ms;

        self.dilation = orbit::time_dilation(
            self.player.position,
            &self.bodies,
            self.config.dilation_range_factor,
        );
        if self.clock.advance(dt_ms, f64::from(self.dilation)) {
            self.end(GameOverCause::TimeExpired);
            return;
        }

        if !self.move_player(dt) {
            return;
        }

        let trail = TrailSettings::for_viewport(self.viewport);
        self.player.trail.record(self.player.position, &trail);

        let physics = DebrisPhysics::from_config(&self.config);
        debris::update_debris(
            &mut self.rng,
            &mut self.debris,
            &self.bodies,
            self.viewport,
            &physics,
            dt,
        );

        if let Some(target) = self.wormhole.as_mut() {
            target.animate(dt);
        }
        for body in &mut self.bodies {
            body.advance_motion(dt);
        }
        // Bodies may have moved; orbiters keep their angle on the new circle.
        orbit::follow_orbited_body(&mut self.player, &self.bodies);
        debris::follow_anchors(&mut self.debris, &self.bodies, self.viewport);

        self.resolve_contacts();
    }

    /// Player motion plus capture, collision and bounds checks.  Returns
    /// `false` if the session ended.
    fn move_player(&mut self, dt: f32) -> bool {
        orbit::advance(&mut self.player, &self.bodies, dt);
        if self.player.is_orbiting() {
            return true;
        }

        match orbit::check_capture(&self.player, &self.bodies, self.config.capture_inner_fraction) {
            CaptureCheck::Collided(id) => {
                debug!("player hit body {}", id.0);
                self.events.push(SessionEvent::LethalCollision);
                self.end(GameOverCause::BodyCollision);
                false
            }
            CaptureCheck::Captured(id) => {
                orbit::capture(&mut self.player, &self.bodies, id);
                debug!("captured by body {}", id.0);
                self.events.push(SessionEvent::Captured(id));
                true
            }
            CaptureCheck::Clear => {
                if self
                    .viewport
                    .is_outside(self.player.position, self.config.out_of_bounds_buffer)
                {
                    self.end(GameOverCause::LeftViewport);
                    return false;
                }
                true
            }
        }
    }

    /// Debris contacts (newest first), then the wormhole.
    fn resolve_contacts(&mut self) {
        let position = self.player.position;
        let radius = self.player.radius;

        for i in (0..self.debris.len()).rev() {
            let piece = &self.debris[i];
            if position.distance(piece.position) >= radius + piece.radius {
                continue;
            }
            if piece.is_bonus() {
                self.debris.remove(i);
                self.clock.add_bonus(self.config.bonus_time_ms);
                let remaining_ms = self.clock.remaining_ms();
                debug!("bonus collected, {remaining_ms:.0} ms left");
                self.events.push(SessionEvent::BonusCollected { remaining_ms });
            } else {
                self.events.push(SessionEvent::LethalCollision);
                self.end(GameOverCause::DebrisCollision);
                return;
            }
        }

        let reached = self
            .wormhole
            .as_ref()
            .is_some_and(|w| w.reached_by(position, radius));
        if reached {
            self.complete_challenge();
        }
    }

    fn complete_challenge(&mut self) {
        self.challenges_completed += 1;
        info!("challenge {} complete", self.challenges_completed);
        self.events.push(SessionEvent::ChallengeComplete {
            completed: self.challenges_completed,
        });
        if self.config.challenge_complete_delay_ms > 0.0 {
            self.completion_delay_ms = Some(self.config.challenge_complete_delay_ms);
        } else {
            self.start_challenge();
        }
    }

    fn end(&mut self, cause: GameOverCause) {
        self.phase = GamePhase::GameOver;
        self.game_over_cause = Some(cause);
        info!(
            "game over: {cause} after {} challenges",
            self.challenges_completed
        );
        self.events.push(SessionEvent::GameOver(cause));
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn layout(&self) -> Option<SystemLayout> {
        self.layout
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    pub fn wormhole(&self) -> Option<&Wormhole> {
        self.wormhole.as_ref()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn remaining_ms(&self) -> f64 {
        self.clock.remaining_ms()
    }

    pub fn dilation(&self) -> f32 {
        self.dilation
    }

    pub fn challenges_completed(&self) -> u32 {
        self.challenges_completed
    }

    /// `true` between reaching the wormhole and the next challenge.
    pub fn is_completing(&self) -> bool {
        self.completion_delay_ms.is_some()
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.game_over_cause
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Take every notification queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
