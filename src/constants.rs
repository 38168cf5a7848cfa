//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::GameConfig`] mirrors each of them so they can be
//! overridden from `assets/orbits.toml` at startup.
//!
//! ## Units
//!
//! Distances are screen units (logical pixels).  Speeds and angular speeds are
//! expressed *per reference frame* (`REFERENCE_FRAME_MS`), which is the unit
//! step the simulation integrates with.  Times are real milliseconds.

// ── Session timing ────────────────────────────────────────────────────────────

/// Dilation-scaled time budget for a single challenge (ms).
pub const CHALLENGE_TIME_LIMIT_MS: f64 = 90_000.0;

/// Time added to the budget when the player collects a bonus debris piece (ms).
pub const BONUS_TIME_MS: f64 = 10_000.0;

/// How long the "wormhole reached" pause lasts before the next challenge (ms).
///
/// The session stays in `Playing` but the simulation is frozen meanwhile.
pub const CHALLENGE_COMPLETE_DELAY_MS: f64 = 1_500.0;

/// Real milliseconds represented by one unit physics step.
///
/// `advance_tick(dt_ms)` integrates with `dt = dt_ms / REFERENCE_FRAME_MS`, so
/// every speed constant below means "units per 60 Hz frame".
pub const REFERENCE_FRAME_MS: f32 = 16.67;

/// Cadence the frame throttle targets.
pub const TARGET_FPS: f32 = 60.0;

// ── Controlled body ───────────────────────────────────────────────────────────

/// Radius of the player at the reference screen size; multiplied by scale.
pub const PLAYER_BASE_RADIUS: f32 = 4.0;

/// Tangential speed given to the player on release (units per frame).
///
/// Higher values make slingshots cross the screen faster and reduce the
/// chance of capture by bodies that are grazed rather than approached.
pub const LAUNCH_SPEED: f32 = 2.5;

/// Fraction of a body's orbit radius inside which capture is refused.
///
/// A free player must be beyond `CAPTURE_INNER_FRACTION × orbit_radius` to be
/// captured; closer than that it either flies on or hits the surface.
pub const CAPTURE_INNER_FRACTION: f32 = 0.8;

/// Distance beyond the viewport edge at which a free player is lost.
pub const OUT_OF_BOUNDS_BUFFER: f32 = 50.0;

/// Time-dilation influence radius as a multiple of a black hole's gravity range.
pub const DILATION_RANGE_FACTOR: f32 = 1.5;

// ── Trail ─────────────────────────────────────────────────────────────────────

/// Viewports narrower than this use the compact trail and starfield.
pub const COMPACT_VIEWPORT_WIDTH: f32 = 768.0;

/// Per-axis movement needed before a new trail point is recorded.
pub const TRAIL_SPACING: f32 = 5.0;
pub const TRAIL_SPACING_COMPACT: f32 = 10.0;

/// Maximum trail points retained.
pub const TRAIL_MAX_POINTS: usize = 15;
pub const TRAIL_MAX_POINTS_COMPACT: usize = 10;

/// Opacity lost by every trail point each tick.
pub const TRAIL_FADE_PER_TICK: f32 = 0.08;

// ── Debris ────────────────────────────────────────────────────────────────────

/// Damping applied to debris gravity so the field stays gentle at screen scale.
///
/// Tested at exactly 0.01; larger values make free debris spiral into the
/// nearest body within a few seconds.
pub const DEBRIS_GRAVITY_DAMPING: f32 = 0.01;

/// Debris within `DEBRIS_CAPTURE_RANGE_FACTOR × orbit_radius` of a body may
/// settle into orbit around it.
pub const DEBRIS_CAPTURE_RANGE_FACTOR: f32 = 2.0;

/// Scale applied to `sqrt(G·m / r)` to get the debris "orbital velocity".
pub const DEBRIS_ORBITAL_VELOCITY_SCALE: f32 = 0.05;

/// Debris count range per challenge (inclusive min, exclusive max).
pub const DEBRIS_COUNT_MIN: usize = 20;
pub const DEBRIS_COUNT_MAX: usize = 30;

/// Probability that a generated piece is bonus debris.
pub const DEBRIS_BONUS_CHANCE: f64 = 0.05;

/// Probability that a generated piece starts in orbit.
pub const DEBRIS_INITIAL_ORBIT_CHANCE: f64 = 0.4;

/// Debris spawns at least this many orbit radii away from every body.
pub const DEBRIS_BODY_CLEARANCE: f32 = 1.5;

// ── System generation ─────────────────────────────────────────────────────────

/// Screen size (min of width/height) at which scale = 1.
pub const REFERENCE_SCREEN_SIZE: f32 = 600.0;

/// Rejection-sampling cap for a single placement.
///
/// When every attempt fails the object is omitted; a challenge with fewer
/// satellites is acceptable.
pub const PLACEMENT_MAX_ATTEMPTS: u32 = 50;

/// Minimum centre-to-centre spacing for satellites (scaled).
pub const SATELLITE_MIN_SEPARATION: f32 = 180.0;

/// Inset from the viewport edges for satellite candidates (scaled).
pub const SATELLITE_EDGE_INSET: f32 = 50.0;

/// Extra clearance beyond a body's gravity range required for the wormhole.
pub const WORMHOLE_BODY_CLEARANCE: f32 = 100.0;

/// Inset from the viewport edges for wormhole candidates (unscaled).
pub const WORMHOLE_EDGE_INSET: f32 = 50.0;

/// Wormhole radius at the reference screen size.
pub const WORMHOLE_BASE_RADIUS: f32 = 25.0;

/// A binary system is generated when the first roll exceeds this.
pub const BINARY_SYSTEM_THRESHOLD: f64 = 0.4;

/// After the first challenge, a multi-neutron system is generated when the
/// second roll exceeds this (and the binary roll failed).
pub const MULTI_NEUTRON_THRESHOLD: f64 = 0.7;

/// Phase advanced by each binary star per unit step (radians).
pub const BINARY_PHASE_RATE: f32 = 0.01;

/// Distance between the two binary stars (scaled).
pub const BINARY_SEPARATION: f32 = 100.0;

/// Radius of the triangle the multi-neutron stars sit on (scaled).
pub const NEUTRON_TRIANGLE_RADIUS: f32 = 150.0;
