//! Game tuning
//!
//! Every timing and scale the game core uses, loadable from JSON so level
//! designers can tweak feel without a rebuild. Defaults match the shipped game.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::secs_to_ticks;
use crate::sim::LevelId;

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed simulation timestep (seconds)
    pub sim_dt: f32,
    /// Grid cell side in world units
    pub cell_size: f32,
    /// Ball spawn point for every level
    pub player_start: Vec2,

    // === Animations ===
    pub vortex_move_secs: f32,
    pub vortex_shrink_secs: f32,
    pub teleport_move_secs: f32,
    pub teleport_shrink_secs: f32,
    /// Delay between reaching the finish and loading the next level
    pub level_clear_delay_secs: f32,

    // === Input ===
    /// Accelerometer g to world gravity
    pub tilt_scale: f32,
    /// Pointer offset divisor for the touch proxy
    pub pointer_divisor: f32,

    /// Level ids the next level is drawn from
    pub levels: Vec<LevelId>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sim_dt: SIM_DT,
            cell_size: CELL_SIZE,
            player_start: PLAYER_START,

            vortex_move_secs: VORTEX_MOVE_SECS,
            vortex_shrink_secs: VORTEX_SHRINK_SECS,
            teleport_move_secs: TELEPORT_MOVE_SECS,
            teleport_shrink_secs: TELEPORT_SHRINK_SECS,
            level_clear_delay_secs: LEVEL_CLEAR_DELAY_SECS,

            tilt_scale: TILT_SCALE,
            pointer_divisor: POINTER_DIVISOR,

            levels: (1..=LEVEL_COUNT).map(LevelId).collect(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring malformed tuning {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("No tuning at {} ({}), using defaults", path.display(), e),
        }
        Self::default()
    }

    /// Ticks the vortex death sequence lasts
    pub fn dying_ticks(&self) -> u32 {
        secs_to_ticks(self.vortex_move_secs + self.vortex_shrink_secs, self.sim_dt)
    }

    /// Ticks the teleport sequence lasts
    pub fn teleport_ticks(&self) -> u32 {
        secs_to_ticks(self.teleport_move_secs + self.teleport_shrink_secs, self.sim_dt)
    }

    /// Ticks between finish and next level load
    pub fn level_clear_ticks(&self) -> u32 {
        secs_to_ticks(self.level_clear_delay_secs, self.sim_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let tuning = Tuning::default();
        assert_eq!(tuning.dying_ticks(), 45);
        assert_eq!(tuning.teleport_ticks(), 45);
        assert_eq!(tuning.level_clear_ticks(), 180);
        assert_eq!(tuning.levels, vec![LevelId(1), LevelId(2), LevelId(3)]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "level_clear_delay_secs": 1.0, "levels": [2] }"#)
            .expect("valid tuning");
        assert_eq!(tuning.level_clear_ticks(), 60);
        assert_eq!(tuning.levels, vec![LevelId(2)]);
        assert_eq!(tuning.cell_size, CELL_SIZE);
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).expect("serialize");
        assert_eq!(Tuning::from_json(&json).expect("deserialize"), tuning);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tuning = Tuning::load(std::env::temp_dir().join("marble-maze-missing-tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
