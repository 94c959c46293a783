//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable entity order (level encounter order)
//! - No rendering, physics or platform dependencies

pub mod collision;
pub mod error;
pub mod gravity;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{CollisionLayers, CollisionProfile, ColliderShape, player_profile};
pub use error::LevelError;
pub use gravity::{GravityGate, GravitySource, PointerGravity, TiltGravity};
pub use level::{
    BundledLevels, Entity, EntityKind, Level, LevelDirectory, LevelId, LevelSource, load_level,
    parse_level,
};
pub use state::{GameEvent, GamePhase, GameState, Player, PlayerAnimation};
pub use tick::{handle_contact, tick};
