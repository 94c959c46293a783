//! Marble Maze - a tilt-controlled ball maze
//!
//! Core modules:
//! - `sim`: Deterministic game core (level grid, contact rules, level lifecycle)
//! - `scene`: Drives a host engine from simulation events
//! - `platform`: Host implementations (headless recorder)
//! - `settings`: Data-driven tuning

pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;

pub use scene::{MazeScene, SceneHost};
pub use settings::Tuning;

use glam::{UVec2, Vec2};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Side of one level grid cell in world units
    pub const CELL_SIZE: f32 = 64.0;

    /// Where the ball enters every level (second column, second text line of a 12-line level)
    pub const PLAYER_START: Vec2 = Vec2::new(96.0, 672.0);
    /// Ball linear damping handed to the physics host
    pub const PLAYER_LINEAR_DAMPING: f32 = 0.5;

    /// Vortex death: slide into the pit, then shrink out
    pub const VORTEX_MOVE_SECS: f32 = 0.5;
    pub const VORTEX_SHRINK_SECS: f32 = 0.25;

    /// Teleport: slide into the entrance, then shrink out
    pub const TELEPORT_MOVE_SECS: f32 = 0.5;
    pub const TELEPORT_SHRINK_SECS: f32 = 0.25;

    /// Pause between reaching the finish and the next level appearing
    pub const LEVEL_CLEAR_DELAY_SECS: f32 = 3.0;

    /// Scale the ball shrinks to before it is hidden or moved
    pub const SHRUNK_SCALE: f32 = 0.0001;

    /// Accelerometer reading (in g) to world gravity
    pub const TILT_SCALE: f32 = 50.0;
    /// Pointer offset (world units) divided by this gives simulator gravity
    pub const POINTER_DIVISOR: f32 = 100.0;

    /// Levels shipped with the game
    pub const LEVEL_COUNT: u32 = 3;
}

/// Centre of a grid cell in world space
#[inline]
pub fn cell_to_world(cell: UVec2, cell_size: f32) -> Vec2 {
    Vec2::new(
        cell.x as f32 * cell_size + cell_size / 2.0,
        cell.y as f32 * cell_size + cell_size / 2.0,
    )
}

/// Fixed ticks needed to cover `secs` (rounded up, at least one for any positive duration)
#[inline]
pub fn secs_to_ticks(secs: f32, dt: f32) -> u32 {
    if secs <= 0.0 {
        return 0;
    }
    // Tolerance absorbs f32 error so 0.5s at 60 Hz is 30 ticks, not 31
    ((secs / dt - 1e-3).ceil() as u32).max(1)
}
