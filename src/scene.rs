//! Scene driver
//!
//! Glue between the pure game core and whatever engine draws and simulates
//! the maze. The engine implements `SceneHost`; `MazeScene` feeds it contacts,
//! frame times and input, and replays the resulting `GameEvent`s onto it.

use glam::Vec2;

use crate::consts::MAX_SUBSTEPS;
use crate::settings::Tuning;
use crate::sim::{
    CollisionProfile, Entity, GameEvent, GameState, GravityGate, GravitySource, LevelError, LevelId,
    LevelSource, Player, PlayerAnimation, handle_contact, load_level, player_profile, tick,
};

/// What the game needs from a rendering/physics engine
pub trait SceneHost {
    /// Create a static proxy for a level entity
    fn spawn_entity(&mut self, entity: &Entity, profile: CollisionProfile);
    /// Create the ball proxy
    fn spawn_player(&mut self, player: &Player, profile: CollisionProfile);
    /// Remove any proxy
    fn remove(&mut self, id: u32);
    /// Teleport the ball proxy and set its scale
    fn set_player_transform(&mut self, id: u32, pos: Vec2, scale: f32);
    /// Turn the ball's physics on or off
    fn set_player_dynamic(&mut self, id: u32, dynamic: bool);
    /// Play the slide-and-shrink sequence on the ball
    fn animate_player(&mut self, id: u32, animation: PlayerAnimation);
    fn set_gravity(&mut self, gravity: Vec2);
    fn score_changed(&mut self, score: u32);
}

/// A running maze session
pub struct MazeScene<H: SceneHost, L: LevelSource> {
    state: GameState,
    tuning: Tuning,
    host: H,
    levels: L,
    gravity: GravityGate,
    accumulator: f32,
}

impl<H: SceneHost, L: LevelSource> MazeScene<H, L> {
    /// Load the first level and populate the host
    pub fn start(host: H, levels: L, first: LevelId, seed: u64, tuning: Tuning) -> Result<Self, LevelError> {
        let level = load_level(&levels, first, tuning.cell_size)?;
        let state = GameState::new(seed, level, &tuning);
        let mut scene = Self {
            state,
            tuning,
            host,
            levels,
            gravity: GravityGate::new(),
            accumulator: 0.0,
        };

        scene.host.set_gravity(Vec2::ZERO);
        scene.host.score_changed(scene.state.score);
        let events = scene.state.spawn_events();
        scene.apply(events);
        log::info!("Scene started on {first} (seed {seed})");
        Ok(scene)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The host moved the ball (called after each physics step)
    pub fn sync_player(&mut self, id: u32, pos: Vec2) {
        if id == self.state.player.id && !self.state.player.suspended {
            self.state.player.pos = pos;
        }
    }

    /// The host detected two proxies starting to touch
    pub fn contact_began(&mut self, a: u32, b: u32) {
        let events = handle_contact(&mut self.state, a, b, &self.tuning);
        self.apply(events);
    }

    /// Run one rendered frame: sample gravity, then fixed substeps
    pub fn update(&mut self, dt: f32, input: &dyn GravitySource) -> Result<(), LevelError> {
        if let Some(gravity) = self.gravity.update(&self.state.phase, input, self.state.player.pos) {
            self.host.set_gravity(gravity);
        }

        let step = self.tuning.sim_dt;
        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            let events = tick(&mut self.state, &self.levels, &self.tuning)?;
            self.apply(events);
            self.accumulator -= step;
            substeps += 1;
        }
        Ok(())
    }

    /// Current world gravity
    pub fn gravity(&self) -> Vec2 {
        self.gravity.current()
    }

    fn apply(&mut self, events: Vec<GameEvent>) {
        let current = self.state.player.id;
        for event in events {
            match event {
                GameEvent::EntitySpawned(entity) => {
                    let profile = entity.kind.profile();
                    self.host.spawn_entity(&entity, profile);
                }
                GameEvent::EntityRemoved { id } => self.host.remove(id),
                GameEvent::PlayerSpawned { id, .. } => {
                    if id == current {
                        self.host.spawn_player(&self.state.player, player_profile());
                    }
                }
                GameEvent::PlayerRemoved { id } => self.host.remove(id),
                // Anything below targets a ball that may have been replaced since
                GameEvent::PlayerSuspended { id, .. }
                | GameEvent::PlayerAnimation { id, .. }
                | GameEvent::PlayerRespawned { id, .. }
                | GameEvent::PlayerTeleported { id, .. }
                    if id != current =>
                {
                    log::debug!("Dropping event for stale ball {id}");
                }
                GameEvent::PlayerSuspended { id, suspended } => {
                    self.host.set_player_dynamic(id, !suspended)
                }
                GameEvent::PlayerAnimation { id, animation } => self.host.animate_player(id, animation),
                GameEvent::PlayerRespawned { id, pos } | GameEvent::PlayerTeleported { id, pos } => {
                    self.host.set_player_transform(id, pos, 1.0)
                }
                GameEvent::ScoreChanged { score } => self.host.score_changed(score),
                GameEvent::LevelCleared { level } => log::info!("Leaving {level}"),
                GameEvent::LevelLoaded { level } => log::info!("Entering {level}"),
            }
        }
    }
}
