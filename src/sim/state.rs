//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in `GameState`. Ground-plane
//! positions are `Vec2` with `x` = world x and `y` = world z.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::JEWEL_REST_HEIGHT;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Caught by an alarm. Terminal until restart.
    GameOver,
}

/// Discrete facing of the thief
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    /// Toward -z
    Forward,
    /// Toward +z (faces the camera)
    #[default]
    Back,
    /// Toward -x
    Left,
    /// Toward +x
    Right,
}

impl Heading {
    /// Rotation about +Y for the avatar model
    pub fn yaw(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Heading::Forward => PI,
            Heading::Back => 0.0,
            Heading::Left => FRAC_PI_2,
            Heading::Right => -FRAC_PI_2,
        }
    }
}

/// The player-controlled thief
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub heading: Heading,
    /// Set once when an alarm catches the thief
    pub caught: bool,
}

/// A collectible jewel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jewel {
    pub id: u32,
    pub pos: Vec2,
    /// Accumulated rotation about +Y (radians)
    pub spin: f32,
    /// Current hover height
    pub height: f32,
}

/// A stationary security alarm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    pub id: u32,
    pub pos: Vec2,
    /// Blink phase offset, fixed at creation from the alarm's index
    pub phase: f32,
    /// Light intensity in [0, 1]
    pub blink: f32,
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    JewelCollected { score: u32 },
    AlarmSpawned { count: usize },
    Caught { score: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Spawn position RNG
    pub rng: Pcg32,
    /// Rules for this session
    pub tuning: Tuning,
    /// Jewels collected (never decreases)
    pub score: u32,
    pub phase: GamePhase,
    pub player: Player,
    pub jewels: Vec<Jewel>,
    /// Alarms in creation order; never removed during a session
    pub alarms: Vec<Alarm>,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Simulation steps taken
    pub time_steps: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with the default rules
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session with custom rules
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            phase: GamePhase::Playing,
            player: Player::default(),
            jewels: Vec::with_capacity(tuning.initial_jewels),
            alarms: Vec::with_capacity(tuning.initial_alarms),
            events: Vec::new(),
            time_steps: 0,
            next_id: 1,
            tuning,
        };

        for _ in 0..state.tuning.initial_jewels {
            state.spawn_jewel();
        }
        for _ in 0..state.tuning.initial_alarms {
            state.spawn_alarm();
        }

        state
    }

    /// Fresh session under the same rules. Nothing carries over.
    pub fn restarted(&self, seed: u64) -> Self {
        Self::with_tuning(seed, self.tuning.clone())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Uniform position inside the central spawn square
    pub fn random_spawn_pos(&mut self) -> Vec2 {
        let h = self.tuning.spawn_half_extent;
        Vec2::new(self.rng.random_range(-h..h), self.rng.random_range(-h..h))
    }

    /// Spawn a jewel at a random position
    pub fn spawn_jewel(&mut self) -> u32 {
        let pos = self.random_spawn_pos();
        self.place_jewel(pos)
    }

    /// Spawn a jewel at a fixed position
    pub fn place_jewel(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.jewels.push(Jewel {
            id,
            pos,
            spin: 0.0,
            height: JEWEL_REST_HEIGHT,
        });
        id
    }

    /// Spawn an alarm at a random position
    pub fn spawn_alarm(&mut self) -> u32 {
        let pos = self.random_spawn_pos();
        self.place_alarm(pos)
    }

    /// Spawn an alarm at a fixed position
    pub fn place_alarm(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let phase = self.alarms.len() as f32 * self.tuning.alarm_phase_step;
        self.alarms.push(Alarm {
            id,
            pos,
            phase,
            blink: 0.5,
        });
        id
    }

    /// One-way transition into `GameOver`. Returns false if already over.
    pub fn enter_game_over(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.player.caught = true;
        self.events.push(GameEvent::Caught { score: self.score });
        log::info!("Caught by security with {} jewels", self.score);
        true
    }
}
