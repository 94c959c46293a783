//! Gravity from device input
//!
//! The ball is steered by tilting the world's gravity. On hardware that is the
//! accelerometer; in a simulator a held pointer pulls the ball toward it.

use glam::{Vec2, Vec3};

use super::state::GamePhase;

/// Per-tick world gravity provider
pub trait GravitySource {
    /// Gravity for this tick, or `None` when there is no reading yet
    fn current_gravity(&self, player: Vec2) -> Option<Vec2>;
}

/// Accelerometer-driven gravity.
///
/// The device is held in landscape, so its y axis runs along the world's x
/// axis (inverted) and its x axis along the world's y axis.
#[derive(Debug, Clone, Default)]
pub struct TiltGravity {
    reading: Option<Vec3>,
    scale: f32,
}

impl TiltGravity {
    pub fn new(scale: f32) -> Self {
        Self {
            reading: None,
            scale,
        }
    }

    /// Latest accelerometer sample, in g
    pub fn set_reading(&mut self, acceleration: Vec3) {
        self.reading = Some(acceleration);
    }
}

impl GravitySource for TiltGravity {
    fn current_gravity(&self, _player: Vec2) -> Option<Vec2> {
        self.reading
            .map(|a| Vec2::new(a.y * -self.scale, a.x * self.scale))
    }
}

/// Touch proxy for devices without an accelerometer
#[derive(Debug, Clone, Default)]
pub struct PointerGravity {
    pointer: Option<Vec2>,
    divisor: f32,
}

impl PointerGravity {
    pub fn new(divisor: f32) -> Self {
        Self {
            pointer: None,
            divisor,
        }
    }

    /// Touch began or moved (world coordinates)
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// Touch ended or was cancelled
    pub fn pointer_released(&mut self) {
        self.pointer = None;
    }
}

impl GravitySource for PointerGravity {
    fn current_gravity(&self, player: Vec2) -> Option<Vec2> {
        if self.divisor == 0.0 {
            return None;
        }
        self.pointer.map(|p| (p - player) / self.divisor)
    }
}

/// Holds the world gravity and only lets input change it during play.
///
/// While the ball is dying, teleporting or between levels gravity stays
/// frozen at its last value.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityGate {
    current: Vec2,
}

impl GravityGate {
    pub fn new() -> Self {
        Self { current: Vec2::ZERO }
    }

    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Sample the source; returns the new gravity if it changed the world
    pub fn update(&mut self, phase: &GamePhase, source: &dyn GravitySource, player: Vec2) -> Option<Vec2> {
        if !phase.is_interactive() {
            return None;
        }
        let gravity = source.current_gravity(player)?;
        self.current = gravity;
        Some(gravity)
    }
}
