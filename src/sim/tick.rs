//! Contact rules and the fixed timestep tick
//!
//! The host reports contact-begin events between proxies; `handle_contact`
//! applies the gameplay rule for the other body's kind. `tick` runs the timers
//! of the non-interactive phases and loads the next level when one is due.

use glam::Vec2;

use super::error::LevelError;
use super::level::{EntityKind, LevelSource, load_level};
use super::state::{GameEvent, GamePhase, GameState, PlayerAnimation};
use crate::consts::SHRUNK_SCALE;
use crate::settings::Tuning;

/// Apply the rule for a contact between two proxies.
///
/// Contacts are only honoured while `Playing`; anything that arrives during a
/// death, teleport or level change is dropped. Contacts that do not involve the
/// current ball, or name an entity that is already gone, are ignored.
pub fn handle_contact(state: &mut GameState, a: u32, b: u32, tuning: &Tuning) -> Vec<GameEvent> {
    let other = if a == state.player.id {
        b
    } else if b == state.player.id {
        a
    } else {
        log::debug!("Contact {a}/{b} does not involve the ball");
        return Vec::new();
    };

    if !state.phase.is_interactive() {
        log::debug!("Contact with {other} ignored during {:?}", state.phase);
        return Vec::new();
    }

    let Some(entity) = state.level.entity(other) else {
        log::debug!("Contact with unknown entity {other}");
        return Vec::new();
    };
    let (kind, pos) = (entity.kind, entity.pos);

    match kind {
        EntityKind::Vortex => fall_into_vortex(state, pos, tuning),
        EntityKind::Star => collect_star(state, other),
        EntityKind::Finish => reach_finish(state, tuning),
        EntityKind::TeleportEntrance => enter_teleport(state, pos, tuning),
        // Walls are physical only, exits are destinations only
        EntityKind::Wall | EntityKind::TeleportExit => Vec::new(),
    }
}

fn fall_into_vortex(state: &mut GameState, vortex: Vec2, tuning: &Tuning) -> Vec<GameEvent> {
    let id = state.player.id;
    state.player.suspended = true;
    state.score = state.score.saturating_sub(1);
    state.phase = GamePhase::Dying {
        vortex,
        timer: tuning.dying_ticks(),
    };
    log::info!("Ball fell into vortex at {vortex}, score {}", state.score);

    vec![
        GameEvent::PlayerSuspended { id, suspended: true },
        GameEvent::ScoreChanged { score: state.score },
        GameEvent::PlayerAnimation {
            id,
            animation: PlayerAnimation {
                target: vortex,
                move_secs: tuning.vortex_move_secs,
                shrink_secs: tuning.vortex_shrink_secs,
            },
        },
    ]
}

fn collect_star(state: &mut GameState, star: u32) -> Vec<GameEvent> {
    if state.level.remove(star).is_none() {
        return Vec::new();
    }
    state.score += 1;
    log::debug!("Star {star} collected, score {}", state.score);
    vec![
        GameEvent::EntityRemoved { id: star },
        GameEvent::ScoreChanged { score: state.score },
    ]
}

fn reach_finish(state: &mut GameState, tuning: &Tuning) -> Vec<GameEvent> {
    let level = state.level.id;
    log::info!("{level} cleared with score {}", state.score);

    let mut events = vec![
        GameEvent::LevelCleared { level },
        GameEvent::PlayerRemoved {
            id: state.player.id,
        },
    ];
    events.extend(
        state
            .level
            .entities
            .drain(..)
            .map(|e| GameEvent::EntityRemoved { id: e.id }),
    );
    state.level.teleport_exits.clear();
    state.player.suspended = true;
    state.phase = GamePhase::LevelClearing {
        timer: tuning.level_clear_ticks(),
    };
    events
}

fn enter_teleport(state: &mut GameState, entrance: Vec2, tuning: &Tuning) -> Vec<GameEvent> {
    let exits = state.level.teleport_exits.len();
    if exits == 0 {
        log::debug!("Teleporter at {entrance} has no exit");
        return Vec::new();
    }
    let pick = state.roll(exits);
    let destination = state.level.teleport_exits[pick];

    let id = state.player.id;
    state.player.suspended = true;
    state.phase = GamePhase::Teleporting {
        entrance,
        destination,
        timer: tuning.teleport_ticks(),
    };
    log::debug!("Teleporting {entrance} -> {destination}");

    vec![
        GameEvent::PlayerSuspended { id, suspended: true },
        GameEvent::PlayerAnimation {
            id,
            animation: PlayerAnimation {
                target: entrance,
                move_secs: tuning.teleport_move_secs,
                shrink_secs: tuning.teleport_shrink_secs,
            },
        },
    ]
}

/// Advance the game state by one fixed timestep.
///
/// Only fails when the next level cannot be loaded, which is fatal.
pub fn tick(
    state: &mut GameState,
    levels: &dyn LevelSource,
    tuning: &Tuning,
) -> Result<Vec<GameEvent>, LevelError> {
    state.time_ticks += 1;

    let mut events = Vec::new();
    match state.phase {
        GamePhase::Playing => {}

        GamePhase::Dying { vortex, timer } => {
            if timer > 1 {
                state.phase = GamePhase::Dying {
                    vortex,
                    timer: timer - 1,
                };
                state.player.pos = vortex;
                state.player.scale = SHRUNK_SCALE;
            } else {
                let id = state.player.id;
                state.player.reset(state.start);
                state.phase = GamePhase::Playing;
                events.push(GameEvent::PlayerRespawned {
                    id,
                    pos: state.start,
                });
                events.push(GameEvent::PlayerSuspended {
                    id,
                    suspended: false,
                });
            }
        }

        GamePhase::Teleporting {
            entrance,
            destination,
            timer,
        } => {
            if timer > 1 {
                state.phase = GamePhase::Teleporting {
                    entrance,
                    destination,
                    timer: timer - 1,
                };
                state.player.pos = entrance;
                state.player.scale = SHRUNK_SCALE;
            } else {
                let id = state.player.id;
                state.player.reset(destination);
                state.phase = GamePhase::Playing;
                events.push(GameEvent::PlayerTeleported {
                    id,
                    pos: destination,
                });
                events.push(GameEvent::PlayerSuspended {
                    id,
                    suspended: false,
                });
            }
        }

        GamePhase::LevelClearing { timer } => {
            state.phase = if timer > 1 {
                GamePhase::LevelClearing { timer: timer - 1 }
            } else {
                GamePhase::LevelLoading
            };
        }

        GamePhase::LevelLoading => {
            let next = pick_next_level(state, tuning);
            let level = load_level(levels, next, tuning.cell_size)?;
            state.install_level(level);
            state.spawn_player();
            state.phase = GamePhase::Playing;

            events.push(GameEvent::LevelLoaded { level: next });
            events.extend(state.spawn_events());
        }
    }

    Ok(events)
}

/// Uniform pick from the configured level set
fn pick_next_level(state: &mut GameState, tuning: &Tuning) -> super::LevelId {
    if tuning.levels.is_empty() {
        // Nothing configured: replay the current level
        return state.level.id;
    }
    let index = state.roll(tuning.levels.len());
    tuning.levels[index]
}
