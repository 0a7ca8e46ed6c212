//! # Outbreak Core
//!
//! Deterministic simulation core for the Outbreak infection-arena game.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No system randomness (all randomness flows through seeded PRNGs)
//!
//! This separation enables:
//! - Headless CI and balance runs
//! - Reproducible matches (same seed + same inputs = same match)
//! - Renderer/UI layers as thin external collaborators
//!
//! ## Crate Structure
//!
//! - [`arena`] - Procedural arena generation with a reachability guarantee
//! - [`collision`] - Axis-aligned rectangle queries
//! - [`characters`] - Character state, factions, and intents
//! - [`bullets`] - Projectiles and volley spawning
//! - [`systems`] - Per-tick movement/combat/respawn resolution
//! - [`ai`] - AI behavior policy
//! - [`session`] - The fixed-tick match loop and win evaluation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod arena;
pub mod bullets;
pub mod characters;
pub mod collision;
pub mod config;
pub mod error;
pub mod math;
pub mod session;
pub mod systems;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::{Arena, ArenaConfig, WalkGrid};
    pub use crate::bullets::Bullet;
    pub use crate::characters::{
        Ammo, Character, Controller, Faction, Intent, PlayerInput, ShotPlan,
    };
    pub use crate::collision::Rect;
    pub use crate::config::{AmmoCap, Difficulty, MatchSetup, Tunables};
    pub use crate::error::{GameError, Result};
    pub use crate::math::Vec2;
    pub use crate::session::{
        CharacterView, MatchSession, MatchState, TickEvents, WorldSnapshot, TICK_RATE,
    };
    pub use crate::systems::{INFECTED_ATTACK_RADIUS, RESPAWN_DELAY_TICKS};
}
