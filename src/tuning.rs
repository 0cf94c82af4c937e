//! Data-driven game rules
//!
//! Defaults are the classic rules. Overrides come from JSON, so every
//! field is optional and missing ones fall back to the default.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Upper bound on initial jewel and alarm counts
pub const MAX_ENTITIES: usize = 1000;

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player movement per simulation step
    pub move_speed: f32,
    /// Half-size of the square the player is clamped to
    pub play_bound: f32,
    /// Contact distance for jewels and alarms
    pub pickup_radius: f32,
    /// Half-size of the central square jewels and alarms spawn in
    pub spawn_half_extent: f32,
    pub initial_jewels: usize,
    pub initial_alarms: usize,
    /// An extra alarm spawns whenever score is a multiple of this
    pub alarm_interval: u32,
    pub jewel_spin_per_step: f32,
    pub jewel_bob_rate: f64,
    pub alarm_blink_rate: f64,
    pub alarm_phase_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            play_bound: PLAY_BOUND,
            pickup_radius: PICKUP_RADIUS,
            spawn_half_extent: SPAWN_HALF_EXTENT,
            initial_jewels: INITIAL_JEWELS,
            initial_alarms: INITIAL_ALARMS,
            alarm_interval: ALARM_INTERVAL,
            jewel_spin_per_step: JEWEL_SPIN_PER_STEP,
            jewel_bob_rate: JEWEL_BOB_RATE,
            alarm_blink_rate: ALARM_BLINK_RATE,
            alarm_phase_step: ALARM_PHASE_STEP,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Clamp degenerate values instead of rejecting them
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            self.move_speed = defaults.move_speed;
        }
        if !self.play_bound.is_finite() || self.play_bound <= 0.0 {
            self.play_bound = defaults.play_bound;
        }
        if !self.pickup_radius.is_finite() || self.pickup_radius < 0.0 {
            self.pickup_radius = defaults.pickup_radius;
        }
        if !self.spawn_half_extent.is_finite() || self.spawn_half_extent <= 0.0 {
            self.spawn_half_extent = defaults.spawn_half_extent;
        }
        // Spawns outside the reachable square would be uncollectable
        self.spawn_half_extent = self.spawn_half_extent.min(self.play_bound);
        self.alarm_interval = self.alarm_interval.max(1);
        self.initial_jewels = self.initial_jewels.min(MAX_ENTITIES);
        self.initial_alarms = self.initial_alarms.min(MAX_ENTITIES);
        self
    }

    /// Load overrides from the page's inline `<script id="tuning">` block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Native builds always use the default rules
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let t = Tuning::default();
        assert_eq!(t.initial_jewels, 10);
        assert_eq!(t.initial_alarms, 5);
        assert_eq!(t.alarm_interval, 5);
        assert_eq!(t.pickup_radius, 0.5);
        assert_eq!(t.play_bound, 15.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "initial_alarms": 2 }"#).unwrap();
        assert_eq!(t.initial_alarms, 2);
        assert_eq!(t.initial_jewels, 10);
        assert_eq!(t.move_speed, MOVE_SPEED);
    }

    #[test]
    fn test_sanitize_degenerate_values() {
        let t = Tuning {
            move_speed: -1.0,
            play_bound: 0.0,
            pickup_radius: f32::NAN,
            alarm_interval: 0,
            spawn_half_extent: 40.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(t.move_speed, MOVE_SPEED);
        assert_eq!(t.play_bound, PLAY_BOUND);
        assert_eq!(t.pickup_radius, PICKUP_RADIUS);
        assert_eq!(t.alarm_interval, 1);
        assert_eq!(t.spawn_half_extent, PLAY_BOUND);
    }

    #[test]
    fn test_huge_entity_counts_are_capped() {
        let t = Tuning::from_json(r#"{ "initial_jewels": 100000000000000, "initial_alarms": 5000 }"#).unwrap();
        assert_eq!(t.initial_jewels, MAX_ENTITIES);
        assert_eq!(t.initial_alarms, MAX_ENTITIES);

        let state = crate::sim::GameState::with_tuning(1, t);
        assert_eq!(state.jewels.len(), MAX_ENTITIES);
        assert_eq!(state.alarms.len(), MAX_ENTITIES);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
