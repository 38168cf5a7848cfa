//! Runtime gameplay configuration loaded from `assets/orbits.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/orbits.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/orbits.toml`.
//! 2. Restart the game; no recompilation required.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{self, SimResult};
use bevy::prelude::*;
use serde::Deserialize;

/// What happens to the time-dilation factor at the moment of release.
///
/// Dilation is recomputed at the start of every tick either way; this only
/// decides the value reported between the release and the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseDilation {
    /// Leave the factor as the last tick computed it.
    #[default]
    Keep,
    /// Drop straight back to 1.0.
    ResetToNeutral,
}

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/orbits.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Session timing ────────────────────────────────────────────────────────
    pub challenge_time_limit_ms: f64,
    pub bonus_time_ms: f64,
    pub challenge_complete_delay_ms: f64,
    pub reference_frame_ms: f32,
    pub target_fps: f32,

    // ── Controlled body ───────────────────────────────────────────────────────
    pub player_base_radius: f32,
    pub launch_speed: f32,
    pub capture_inner_fraction: f32,
    pub out_of_bounds_buffer: f32,
    pub dilation_range_factor: f32,
    pub release_dilation: ReleaseDilation,

    // ── Debris ────────────────────────────────────────────────────────────────
    pub debris_gravity_damping: f32,
    pub debris_capture_range_factor: f32,
    pub debris_orbital_velocity_scale: f32,
    pub debris_count_min: usize,
    pub debris_count_max: usize,
    pub debris_bonus_chance: f64,
    pub debris_initial_orbit_chance: f64,
    pub debris_body_clearance: f32,

    // ── System generation ─────────────────────────────────────────────────────
    pub reference_screen_size: f32,
    pub placement_max_attempts: u32,
    pub satellite_min_separation: f32,
    pub wormhole_body_clearance: f32,
    pub binary_system_threshold: f64,
    pub multi_neutron_threshold: f64,
    pub binary_phase_rate: f32,

    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Session timing
            challenge_time_limit_ms: CHALLENGE_TIME_LIMIT_MS,
            bonus_time_ms: BONUS_TIME_MS,
            challenge_complete_delay_ms: CHALLENGE_COMPLETE_DELAY_MS,
            reference_frame_ms: REFERENCE_FRAME_MS,
            target_fps: TARGET_FPS,
            // Controlled body
            player_base_radius: PLAYER_BASE_RADIUS,
            launch_speed: LAUNCH_SPEED,
            capture_inner_fraction: CAPTURE_INNER_FRACTION,
            out_of_bounds_buffer: OUT_OF_BOUNDS_BUFFER,
            dilation_range_factor: DILATION_RANGE_FACTOR,
            release_dilation: ReleaseDilation::Keep,
            // Debris
            debris_gravity_damping: DEBRIS_GRAVITY_DAMPING,
            debris_capture_range_factor: DEBRIS_CAPTURE_RANGE_FACTOR,
            debris_orbital_velocity_scale: DEBRIS_ORBITAL_VELOCITY_SCALE,
            debris_count_min: DEBRIS_COUNT_MIN,
            debris_count_max: DEBRIS_COUNT_MAX,
            debris_bonus_chance: DEBRIS_BONUS_CHANCE,
            debris_initial_orbit_chance: DEBRIS_INITIAL_ORBIT_CHANCE,
            debris_body_clearance: DEBRIS_BODY_CLEARANCE,
            // System generation
            reference_screen_size: REFERENCE_SCREEN_SIZE,
            placement_max_attempts: PLACEMENT_MAX_ATTEMPTS,
            satellite_min_separation: SATELLITE_MIN_SEPARATION,
            wormhole_body_clearance: WORMHOLE_BODY_CLEARANCE,
            binary_system_threshold: BINARY_SYSTEM_THRESHOLD,
            multi_neutron_threshold: MULTI_NEUTRON_THRESHOLD,
            binary_phase_rate: BINARY_PHASE_RATE,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Check every value that would break the simulation if out of range.
    pub fn validate(&self) -> SimResult<()> {
        error::validate_positive("challenge_time_limit_ms", self.challenge_time_limit_ms)?;
        error::validate_positive("launch_speed", f64::from(self.launch_speed))?;
        error::validate_positive("reference_frame_ms", f64::from(self.reference_frame_ms))?;
        error::validate_positive("target_fps", f64::from(self.target_fps))?;
        error::validate_unit_fraction(
            "capture_inner_fraction",
            f64::from(self.capture_inner_fraction),
        )?;
        error::validate_positive(
            "reference_screen_size",
            f64::from(self.reference_screen_size),
        )?;
        error::validate_positive("player_base_radius", f64::from(self.player_base_radius))?;
        error::validate_non_negative("bonus_time_ms", self.bonus_time_ms)?;
        error::validate_non_negative(
            "challenge_complete_delay_ms",
            self.challenge_complete_delay_ms,
        )?;
        error::validate_non_negative(
            "out_of_bounds_buffer",
            f64::from(self.out_of_bounds_buffer),
        )?;
        error::validate_non_negative(
            "dilation_range_factor",
            f64::from(self.dilation_range_factor),
        )?;
        error::validate_non_negative(
            "debris_gravity_damping",
            f64::from(self.debris_gravity_damping),
        )?;
        error::validate_non_negative(
            "debris_capture_range_factor",
            f64::from(self.debris_capture_range_factor),
        )?;
        error::validate_non_negative(
            "debris_orbital_velocity_scale",
            f64::from(self.debris_orbital_velocity_scale),
        )?;
        // Negative rates are allowed; they just spin the pair the other way.
        error::validate_finite("binary_phase_rate", f64::from(self.binary_phase_rate))?;
        error::validate_probability("debris_bonus_chance", self.debris_bonus_chance)?;
        error::validate_probability(
            "debris_initial_orbit_chance",
            self.debris_initial_orbit_chance,
        )?;
        error::validate_probability("binary_system_threshold", self.binary_system_threshold)?;
        error::validate_probability("multi_neutron_threshold", self.multi_neutron_threshold)?;
        error::validate_count_range(self.debris_count_min, self.debris_count_max)?;
        if self.placement_max_attempts == 0 {
            return Err(error::SimError::UnsafeConstant {
                name: "placement_max_attempts",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }

    /// Real milliseconds between two driver ticks.
    pub fn frame_delay_ms(&self) -> f32 {
        1000.0 / self.target_fps
    }
}

/// Parse a TOML document into a validated config.
pub fn parse_game_config(contents: &str) -> Result<GameConfig, String> {
    let loaded = toml::from_str::<GameConfig>(contents).map_err(|e| e.to_string())?;
    loaded.validate().map_err(|e| e.to_string())?;
    Ok(loaded)
}

/// Startup system: attempt to load `assets/orbits.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are reported but do not abort the game.  A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/orbits.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_game_config(&contents) {
            Ok(loaded) => {
                *config = loaded;
                println!("✓ Loaded game config from {path}");
            }
            Err(e) => {
                warn!("rejected {path}: {e}; using defaults");
                eprintln!("⚠ Failed to load {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn shipped_config_parses() {
        let cfg = parse_game_config(include_str!("../assets/orbits.toml"))
            .expect("assets/orbits.toml must stay valid");
        assert_eq!(cfg.release_dilation, ReleaseDilation::Keep);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = parse_game_config("launch_speed = 3.0\nseed = 7\n").expect("valid toml");
        assert_eq!(cfg.launch_speed, 3.0);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.challenge_time_limit_ms, CHALLENGE_TIME_LIMIT_MS);
        assert_eq!(cfg.release_dilation, ReleaseDilation::Keep);
    }

    #[test]
    fn release_dilation_parses_snake_case() {
        let cfg = parse_game_config("release_dilation = \"reset_to_neutral\"\n")
            .expect("valid toml");
        assert_eq!(cfg.release_dilation, ReleaseDilation::ResetToNeutral);
    }

    #[test]
    fn negative_launch_speed_is_rejected() {
        let err = parse_game_config("launch_speed = -1.0\n").unwrap_err();
        assert!(err.contains("launch_speed"), "unexpected error: {err}");
    }

    #[test]
    fn inverted_debris_range_is_rejected() {
        assert!(parse_game_config("debris_count_min = 40\ndebris_count_max = 10\n").is_err());
    }

    #[test]
    fn zero_placement_attempts_is_rejected() {
        assert!(parse_game_config("placement_max_attempts = 0\n").is_err());
    }

    #[test]
    fn frame_delay_matches_target_fps() {
        let cfg = GameConfig::default();
        assert!((cfg.frame_delay_ms() - 1000.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn throttle_built_from_config_uses_its_frame_delay() {
        let cfg = parse_game_config("target_fps = 30.0\n").expect("valid toml");
        let throttle = crate::clock::FrameThrottle::new(cfg.frame_delay_ms());
        assert!((throttle.frame_ms() - 1000.0 / 30.0).abs() < 1e-4);
    }

    #[test]
    fn zero_reference_screen_size_is_rejected() {
        let err = parse_game_config("reference_screen_size = 0.0\n").unwrap_err();
        assert!(err.contains("reference_screen_size"), "unexpected error: {err}");
    }

    #[test]
    fn negative_distances_and_delays_are_rejected() {
        for doc in [
            "out_of_bounds_buffer = -1.0\n",
            "dilation_range_factor = -0.5\n",
            "debris_gravity_damping = -0.01\n",
            "challenge_complete_delay_ms = -10.0\n",
        ] {
            assert!(parse_game_config(doc).is_err(), "accepted {doc:?}");
        }
    }

    #[test]
    fn reversed_binary_phase_rate_is_allowed() {
        let cfg = parse_game_config("binary_phase_rate = -0.02\n").expect("valid toml");
        assert_eq!(cfg.binary_phase_rate, -0.02);
    }
}
