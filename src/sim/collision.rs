//! Collision layers and the per-kind contact table
//!
//! The host physics engine decides *when* two bodies touch. This table decides
//! which touches it should report to the game at all, and which bodies block
//! the ball. It is a pure function of the entity kind.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::level::EntityKind;
use crate::consts::PLAYER_LINEAR_DAMPING;

bitflags! {
    /// Physics category bits. Values match the original game's categories,
    /// with teleporters added on the next free bit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        const PLAYER = 1;
        const WALL = 1 << 1;
        const STAR = 1 << 2;
        const VORTEX = 1 << 3;
        const FINISH = 1 << 4;
        const TELEPORT = 1 << 5;
    }
}

/// Body outline the host should give a proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Axis-aligned square filling the cell
    Square,
    /// Circle inscribed in the sprite
    Circle,
}

/// How the host should set up a body's physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionProfile {
    /// Category this body belongs to
    pub category: CollisionLayers,
    /// Categories this body physically bounces off
    pub collides_with: CollisionLayers,
    /// Categories whose contacts are reported to the game
    pub contact_test: CollisionLayers,
    /// Moved by the simulation (only the ball)
    pub dynamic: bool,
    /// Blocks the ball instead of letting it pass through
    pub solid: bool,
    pub shape: ColliderShape,
    pub allows_rotation: bool,
    pub linear_damping: f32,
}

impl CollisionProfile {
    /// Static, pass-through sensor reporting contacts with the ball
    const fn sensor(category: CollisionLayers) -> Self {
        Self {
            category,
            collides_with: CollisionLayers::empty(),
            contact_test: CollisionLayers::PLAYER,
            dynamic: false,
            solid: false,
            shape: ColliderShape::Circle,
            allows_rotation: false,
            linear_damping: 0.0,
        }
    }

    /// True if contacts between this body and the ball reach the gameplay handler
    pub fn contact_tested(&self) -> bool {
        self.contact_test.contains(CollisionLayers::PLAYER)
    }
}

impl EntityKind {
    /// Physics setup for this kind of level entity
    pub const fn profile(self) -> CollisionProfile {
        match self {
            EntityKind::Wall => CollisionProfile {
                category: CollisionLayers::WALL,
                collides_with: CollisionLayers::empty(),
                contact_test: CollisionLayers::empty(),
                dynamic: false,
                solid: true,
                shape: ColliderShape::Square,
                allows_rotation: false,
                linear_damping: 0.0,
            },
            EntityKind::Vortex => CollisionProfile::sensor(CollisionLayers::VORTEX),
            EntityKind::Star => CollisionProfile::sensor(CollisionLayers::STAR),
            EntityKind::Finish => CollisionProfile::sensor(CollisionLayers::FINISH),
            EntityKind::TeleportEntrance => CollisionProfile::sensor(CollisionLayers::TELEPORT),
            // Destination marker only
            EntityKind::TeleportExit => CollisionProfile {
                category: CollisionLayers::empty(),
                contact_test: CollisionLayers::empty(),
                ..CollisionProfile::sensor(CollisionLayers::empty())
            },
        }
    }

    /// Vortices spin forever; the host may use this to start a rotation loop
    pub const fn spins(self) -> bool {
        matches!(self, EntityKind::Vortex)
    }
}

/// Physics setup for the ball
pub const fn player_profile() -> CollisionProfile {
    CollisionProfile {
        category: CollisionLayers::PLAYER,
        collides_with: CollisionLayers::WALL,
        contact_test: CollisionLayers::STAR
            .union(CollisionLayers::VORTEX)
            .union(CollisionLayers::FINISH)
            .union(CollisionLayers::TELEPORT),
        dynamic: true,
        solid: true,
        shape: ColliderShape::Circle,
        allows_rotation: false,
        linear_damping: PLAYER_LINEAR_DAMPING,
    }
}
