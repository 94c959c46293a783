//! Headless scene host
//!
//! Keeps just enough of a scene graph to answer "what would be on screen":
//! live proxies, the ball transform, gravity and score. Every call is also
//! appended to a command log so a session can be replayed or asserted on.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::Serialize;

use crate::scene::SceneHost;
use crate::sim::{CollisionProfile, Entity, EntityKind, Player, PlayerAnimation};

/// One call made on the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostCommand {
    SpawnEntity { id: u32, kind: EntityKind, pos: Vec2, solid: bool },
    SpawnPlayer { id: u32, pos: Vec2 },
    Remove { id: u32 },
    SetPlayerTransform { id: u32, pos: Vec2, scale: f32 },
    SetPlayerDynamic { id: u32, dynamic: bool },
    AnimatePlayer { id: u32, animation: PlayerAnimation },
    SetGravity(Vec2),
    Score(u32),
}

#[derive(Debug, Clone)]
struct PlayerProxy {
    id: u32,
    pos: Vec2,
    scale: f32,
    dynamic: bool,
}

/// Recording `SceneHost` with no rendering or physics
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    entities: BTreeMap<u32, (EntityKind, Vec2)>,
    player: Option<PlayerProxy>,
    gravity: Vec2,
    score: u32,
    log: Vec<HostCommand>,
}

impl HeadlessHost {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live entity proxies of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|(k, _)| *k == kind).count()
    }

    pub fn has_proxy(&self, id: u32) -> bool {
        self.entities.contains_key(&id) || self.player.as_ref().is_some_and(|p| p.id == id)
    }

    /// Id of the live ball proxy
    pub fn player(&self) -> Option<u32> {
        self.player.as_ref().map(|p| p.id)
    }

    pub fn player_pos(&self) -> Option<Vec2> {
        self.player.as_ref().map(|p| p.pos)
    }

    pub fn player_scale(&self) -> Option<f32> {
        self.player.as_ref().map(|p| p.scale)
    }

    pub fn player_dynamic(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.dynamic)
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn commands(&self) -> &[HostCommand] {
        &self.log
    }

    /// Command log as JSON lines
    pub fn commands_json(&self) -> serde_json::Result<String> {
        let lines = self
            .log
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    /// Ball proxy, if `id` is the live one
    fn ball(&mut self, id: u32) -> Option<&mut PlayerProxy> {
        let proxy = self.player.as_mut().filter(|p| p.id == id);
        if proxy.is_none() {
            log::warn!("Headless host: no ball proxy {id}");
        }
        proxy
    }
}

impl SceneHost for HeadlessHost {
    fn spawn_entity(&mut self, entity: &Entity, profile: CollisionProfile) {
        self.entities.insert(entity.id, (entity.kind, entity.pos));
        self.log.push(HostCommand::SpawnEntity {
            id: entity.id,
            kind: entity.kind,
            pos: entity.pos,
            solid: profile.solid,
        });
    }

    fn spawn_player(&mut self, player: &Player, profile: CollisionProfile) {
        self.player = Some(PlayerProxy {
            id: player.id,
            pos: player.pos,
            scale: player.scale,
            dynamic: profile.dynamic && !player.suspended,
        });
        self.log.push(HostCommand::SpawnPlayer {
            id: player.id,
            pos: player.pos,
        });
    }

    fn remove(&mut self, id: u32) {
        if self.entities.remove(&id).is_none() {
            if self.player.as_ref().is_some_and(|p| p.id == id) {
                self.player = None;
            } else {
                log::warn!("Headless host: removing unknown proxy {id}");
            }
        }
        self.log.push(HostCommand::Remove { id });
    }

    fn set_player_transform(&mut self, id: u32, pos: Vec2, scale: f32) {
        if let Some(ball) = self.ball(id) {
            ball.pos = pos;
            ball.scale = scale;
        }
        self.log.push(HostCommand::SetPlayerTransform { id, pos, scale });
    }

    fn set_player_dynamic(&mut self, id: u32, dynamic: bool) {
        if let Some(ball) = self.ball(id) {
            ball.dynamic = dynamic;
        }
        self.log.push(HostCommand::SetPlayerDynamic { id, dynamic });
    }

    fn animate_player(&mut self, id: u32, animation: PlayerAnimation) {
        // No tweening here: jump straight to the end of the sequence
        if let Some(ball) = self.ball(id) {
            ball.pos = animation.target;
            ball.scale = 0.0;
        }
        self.log.push(HostCommand::AnimatePlayer { id, animation });
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
        self.log.push(HostCommand::SetGravity(gravity));
    }

    fn score_changed(&mut self, score: u32) {
        self.score = score;
        self.log.push(HostCommand::Score(score));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player_profile;
    use glam::UVec2;

    fn star(id: u32) -> Entity {
        Entity {
            id,
            kind: EntityKind::Star,
            cell: UVec2::ZERO,
            pos: Vec2::new(32.0, 32.0),
        }
    }

    #[test]
    fn test_tracks_proxies() {
        let mut host = HeadlessHost::default();
        host.spawn_entity(&star(1), EntityKind::Star.profile());
        host.spawn_player(&Player::new(2, Vec2::new(96.0, 672.0)), player_profile());
        assert!(host.has_proxy(1));
        assert_eq!(host.count(EntityKind::Star), 1);
        assert_eq!(host.player(), Some(2));
        assert!(host.player_dynamic());

        host.remove(1);
        host.remove(2);
        assert_eq!(host.entity_count(), 0);
        assert_eq!(host.player(), None);
        assert_eq!(host.commands().len(), 4);
    }

    #[test]
    fn test_stale_ball_calls_do_not_touch_new_ball() {
        let mut host = HeadlessHost::default();
        host.spawn_player(&Player::new(5, Vec2::ZERO), player_profile());
        host.set_player_transform(4, Vec2::new(1.0, 1.0), 1.0);
        assert_eq!(host.player_pos(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_commands_json_lines() {
        let mut host = HeadlessHost::default();
        host.score_changed(3);
        host.set_gravity(Vec2::new(0.0, -1.0));
        let json = host.commands_json().expect("json");
        assert_eq!(json.lines().count(), 2);
        assert!(json.contains("Score"));
    }
}
