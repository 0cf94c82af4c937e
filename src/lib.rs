//! Midnight Heist - a jewel thief arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game loop (movement, pickups, alarms, animation phases)
//! - `scene`: Static scenery layout (trees, houses, paths, moon)
//! - `renderer`: WebGPU rendering pipeline
//! - `camera`: Follow camera and viewport projection
//! - `hud`: One-way score/game-over projection for the UI layer
//! - `input`: Keyboard mapping
//! - `tuning`: Data-driven game rules
//! - `settings`: Player preferences (quality, reduced motion)

pub mod camera;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use hud::{HudPublisher, HudView};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest wall-clock delta accepted per frame (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player movement per step (world units)
    pub const MOVE_SPEED: f32 = 0.1;
    /// Player is clamped to [-PLAY_BOUND, PLAY_BOUND] on x and z
    pub const PLAY_BOUND: f32 = 15.0;
    /// Contact distance for jewels and alarms
    pub const PICKUP_RADIUS: f32 = 0.5;
    /// Jewels and alarms spawn in [-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT)
    pub const SPAWN_HALF_EXTENT: f32 = 8.0;

    pub const INITIAL_JEWELS: usize = 10;
    pub const INITIAL_ALARMS: usize = 5;
    /// One extra alarm every this many jewels
    pub const ALARM_INTERVAL: u32 = 5;

    /// Jewel spin per step (radians)
    pub const JEWEL_SPIN_PER_STEP: f32 = 0.01;
    pub const JEWEL_REST_HEIGHT: f32 = 0.15;
    pub const JEWEL_BOB_AMPLITUDE: f32 = 0.05;
    /// Bob angular rate per wall-clock millisecond
    pub const JEWEL_BOB_RATE: f64 = 0.003;
    /// Blink angular rate per wall-clock millisecond
    pub const ALARM_BLINK_RATE: f64 = 0.002;
    /// Blink phase offset between consecutive alarms
    pub const ALARM_PHASE_STEP: f32 = 0.7;
    pub const ALARM_HEIGHT: f32 = 0.05;

    /// Camera sits this far above and behind the player
    pub const CAMERA_HEIGHT: f32 = 2.0;
    pub const CAMERA_DISTANCE: f32 = 5.0;
    pub const CAMERA_PITCH: f32 = -0.2;
    pub const CAMERA_FOV_DEG: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
}

/// Distance between two points on the ground plane
#[inline]
pub fn ground_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}
