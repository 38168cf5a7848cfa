//! Orbits: an arcade orbital-slingshot game.
//!
//! The player hops between captured orbits around stars, neutron stars and
//! black holes, trying to reach a wormhole before a dilation-scaled
//! countdown runs out while dodging drifting debris.
//!
//! The simulation core (`body`, `orbit`, `debris`, `wormhole`, `clock`,
//! `session`) is plain Rust driven by explicit `dt` values and a seeded RNG.
//! The `simulation`, `menu` and `rendering` modules are the Bevy shell
//! around it.

pub mod body;
pub mod clock;
pub mod config;
pub mod constants;
pub mod debris;
pub mod error;
pub mod geometry;
pub mod menu;
pub mod orbit;
pub mod player;
pub mod rendering;
pub mod session;
pub mod simulation;
pub mod wormhole;
