//! Game state and core simulation types
//!
//! Everything the rules read or write lives in `GameState`, so a whole session
//! can be driven and inspected without an engine.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{Entity, Level};
use crate::settings::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball follows gravity, contacts are live
    Playing,
    /// Ball is sliding into a vortex and shrinking out
    Dying {
        /// Vortex the ball fell into
        vortex: Vec2,
        /// Ticks left before the respawn
        timer: u32,
    },
    /// Ball is sliding into a teleporter
    Teleporting {
        entrance: Vec2,
        /// Exit picked on contact
        destination: Vec2,
        timer: u32,
    },
    /// Finish reached, level torn down, waiting to load the next one
    LevelClearing { timer: u32 },
    /// Next level is loaded on the coming tick
    LevelLoading,
}

impl GamePhase {
    /// True while the ball reacts to tilt and contacts
    pub fn is_interactive(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    /// Uniform sprite scale (shrinks while dying/teleporting)
    pub scale: f32,
    /// Physics disabled
    pub suspended: bool,
}

impl Player {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            scale: 1.0,
            suspended: false,
        }
    }

    /// Put the ball back at `pos`, full size and live
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.scale = 1.0;
        self.suspended = false;
    }
}

/// Something the host engine has to reflect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// New level entity to create a proxy for
    EntitySpawned(Entity),
    /// Entity proxy to remove (star collected, level torn down)
    EntityRemoved { id: u32 },
    /// New ball proxy
    PlayerSpawned { id: u32, pos: Vec2 },
    /// Ball proxy to remove
    PlayerRemoved { id: u32 },
    /// Ball stops (or resumes) reacting to physics
    PlayerSuspended { id: u32, suspended: bool },
    /// Play a slide-then-shrink on the ball
    PlayerAnimation { id: u32, animation: PlayerAnimation },
    /// Ball is back at the start after a vortex
    PlayerRespawned { id: u32, pos: Vec2 },
    /// Ball came out of a teleporter exit
    PlayerTeleported { id: u32, pos: Vec2 },
    ScoreChanged { score: u32 },
    LevelCleared { level: super::LevelId },
    LevelLoaded { level: super::LevelId },
}

/// Slide to `target`, then shrink to nothing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnimation {
    pub target: Vec2,
    pub move_secs: f32,
    pub shrink_secs: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Level and teleport picks; serialized with its stream position
    rng: Pcg32,
    /// Never negative; vortex penalties stop at zero
    pub score: u32,
    pub phase: GamePhase,
    /// Current level (entities still present, teleport exits)
    pub level: Level,
    pub player: Player,
    /// Where the ball enters the level
    pub start: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Start a session on an already parsed level
    pub fn new(seed: u64, level: Level, tuning: &Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: GamePhase::Playing,
            level: Level::empty(level.id),
            player: Player::new(0, tuning.player_start),
            start: tuning.player_start,
            time_ticks: 0,
            next_id: 1,
        };
        state.install_level(level);
        state.spawn_player();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the current level, numbering its entities
    pub fn install_level(&mut self, mut level: Level) {
        self.next_id = level.assign_ids(self.next_id);
        self.level = level;
    }

    /// Create a fresh ball at the start
    pub fn spawn_player(&mut self) {
        let id = self.next_entity_id();
        self.player = Player::new(id, self.start);
    }

    /// Uniform pick in `0..len`
    pub fn roll(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    /// Events that create every proxy for the current level and ball
    pub fn spawn_events(&self) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self
            .level
            .entities
            .iter()
            .cloned()
            .map(GameEvent::EntitySpawned)
            .collect();
        events.push(GameEvent::PlayerSpawned {
            id: self.player.id,
            pos: self.player.pos,
        });
        events
    }

    /// HUD text
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityKind, LevelId, parse_level};

    fn state() -> GameState {
        let tuning = Tuning::default();
        let level = parse_level(LevelId(1), "xsx\nv f", tuning.cell_size).expect("level");
        GameState::new(7, level, &tuning)
    }

    #[test]
    fn test_new_state_is_playing() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.pos, Tuning::default().player_start);
        assert!(!state.player.suspended);
        assert_eq!(state.score_label(), "Score: 0");
    }

    #[test]
    fn test_ids_are_unique() {
        let state = state();
        let mut ids: Vec<u32> = state.level.entities.iter().map(|e| e.id).collect();
        ids.push(state.player.id);
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert_eq!(state.level.count(EntityKind::Wall), 2);
    }

    #[test]
    fn test_spawn_events_cover_level_and_player() {
        let state = state();
        let events = state.spawn_events();
        assert_eq!(events.len(), state.level.entities.len() + 1);
        assert!(matches!(events.last(), Some(GameEvent::PlayerSpawned { .. })));
    }

    #[test]
    fn test_rng_survives_serde() {
        let mut state = state();
        for _ in 0..5 {
            state.roll(10);
        }
        let json = serde_json::to_string(&state).expect("serialize");
        let mut restored: GameState = serde_json::from_str(&json).expect("deserialize");
        let expected: Vec<usize> = (0..20).map(|_| state.roll(1000)).collect();
        let actual: Vec<usize> = (0..20).map(|_| restored.roll(1000)).collect();
        assert_eq!(expected, actual);
    }
}
