//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session one step at a time.

use std::f32::consts::TAU;

use super::collision::{clamp_to_bounds, first_contact, in_contact};
use super::state::{GameEvent, GameState, Heading};
use crate::consts::{JEWEL_BOB_AMPLITUDE, JEWEL_REST_HEIGHT};

/// Movement keys held during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    /// W / ArrowUp
    pub forward: bool,
    /// S / ArrowDown
    pub back: bool,
    /// A / ArrowLeft
    pub left: bool,
    /// D / ArrowRight
    pub right: bool,
}

impl MoveKeys {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub keys: MoveKeys,
    /// Wall-clock time in milliseconds, drives cosmetic animation only
    pub time_ms: f64,
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &FrameInput) {
    state.events.clear();
    state.time_steps += 1;

    move_player(state, &input.keys);
    check_collisions(state);
    update_animation(state, input.time_ms);
}

/// Value-style wrapper around [`tick`]
pub fn advance(mut state: GameState, input: &FrameInput) -> GameState {
    tick(&mut state, input);
    state
}

/// Move the thief one step and clamp to the play square.
///
/// Opposite keys on one axis cancel. Heading precedence: forward/back
/// overrides left/right, and within an axis the later key (back, right) wins.
pub fn move_player(state: &mut GameState, keys: &MoveKeys) {
    if state.is_game_over() || !keys.any() {
        return;
    }

    let speed = state.tuning.move_speed;
    let player = &mut state.player;
    let mut pos = player.pos;
    let mut heading = None;

    if keys.left {
        pos.x -= speed;
        heading = Some(Heading::Left);
    }
    if keys.right {
        pos.x += speed;
        heading = Some(Heading::Right);
    }
    if keys.forward {
        pos.y -= speed;
        heading = Some(Heading::Forward);
    }
    if keys.back {
        pos.y += speed;
        heading = Some(Heading::Back);
    }

    player.pos = clamp_to_bounds(pos, state.tuning.play_bound);
    if let Some(heading) = heading {
        player.heading = heading;
    }
}

/// Collect touched jewels, then check alarms.
///
/// Jewels are visited last to first so removal never skips an entry, and
/// replacements appended during the pass are not visited until next step.
pub fn check_collisions(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }

    let player = state.player.pos;
    let radius = state.tuning.pickup_radius;

    for i in (0..state.jewels.len()).rev() {
        if !in_contact(player, state.jewels[i].pos, radius) {
            continue;
        }

        state.jewels.remove(i);
        state.score += 1;
        state.events.push(GameEvent::JewelCollected { score: state.score });

        state.spawn_jewel();

        if state.score % state.tuning.alarm_interval == 0 {
            state.spawn_alarm();
            let count = state.alarms.len();
            state.events.push(GameEvent::AlarmSpawned { count });
        }
    }

    if let Some(i) = first_contact(player, state.alarms.iter().map(|a| &a.pos), radius) {
        log::debug!("Tripped alarm #{}", state.alarms[i].id);
        state.enter_game_over();
    }
}

/// Advance cosmetic phases. Runs in every phase, including game over.
pub fn update_animation(state: &mut GameState, time_ms: f64) {
    let tuning = &state.tuning;

    let bob = (time_ms * tuning.jewel_bob_rate).sin() as f32;
    let height = JEWEL_REST_HEIGHT + bob * JEWEL_BOB_AMPLITUDE;
    for jewel in &mut state.jewels {
        jewel.spin = (jewel.spin + tuning.jewel_spin_per_step).rem_euclid(TAU);
        jewel.height = height;
    }

    for alarm in &mut state.alarms {
        let wave = (time_ms * tuning.alarm_blink_rate + alarm.phase as f64).sin();
        alarm.blink = (wave * 0.5 + 0.5) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    /// Session with no random entities
    fn empty_state() -> GameState {
        GameState::with_tuning(
            12345,
            Tuning {
                initial_jewels: 0,
                initial_alarms: 0,
                ..Default::default()
            },
        )
    }

    fn keys(forward: bool, back: bool, left: bool, right: bool) -> FrameInput {
        FrameInput {
            keys: MoveKeys {
                forward,
                back,
                left,
                right,
            },
            time_ms: 0.0,
        }
    }

    #[test]
    fn test_jewel_within_radius_is_collected() {
        let mut state = empty_state();
        state.place_jewel(Vec2::new(0.3, 0.0));

        let state = advance(state, &FrameInput::default());

        assert_eq!(state.score, 1);
        assert_eq!(state.jewels.len(), 1);
        assert!(state.jewels.iter().all(|j| j.pos != Vec2::new(0.3, 0.0)));
        assert_eq!(state.events, vec![GameEvent::JewelCollected { score: 1 }]);
    }

    #[test]
    fn test_walking_into_alarm_ends_game() {
        let mut state = empty_state();
        state.place_alarm(Vec2::new(0.0, -0.3));

        let state = advance(state, &keys(true, false, false, false));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.player.caught);
        assert_eq!(state.score, 0);
        assert_eq!(state.events, vec![GameEvent::Caught { score: 0 }]);
    }

    #[test]
    fn test_repeated_contact_has_no_further_effect() {
        let mut state = empty_state();
        state.place_alarm(Vec2::new(0.1, 0.0));

        tick(&mut state, &FrameInput::default());
        assert!(state.is_game_over());
        let pos = state.player.pos;

        for _ in 0..5 {
            tick(&mut state, &keys(false, false, true, false));
            assert!(state.events.is_empty());
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.pos, pos);
    }

    #[test]
    fn test_game_over_freezes_gameplay() {
        let mut state = empty_state();
        state.enter_game_over();
        state.place_jewel(Vec2::ZERO);
        state.place_jewel(Vec2::new(0.1, 0.0));

        for _ in 0..10 {
            tick(&mut state, &keys(true, false, true, false));
        }

        assert_eq!(state.player.pos, Vec2::ZERO);
        assert_eq!(state.score, 0);
        assert_eq!(state.jewels.len(), 2);
        assert_eq!(state.alarms.len(), 0);
    }

    #[test]
    fn test_several_pickups_in_one_step() {
        let mut state = empty_state();
        state.place_jewel(Vec2::new(0.1, 0.0));
        state.place_jewel(Vec2::new(-0.2, 0.1));
        state.place_jewel(Vec2::new(5.0, 5.0));

        tick(&mut state, &FrameInput::default());

        assert_eq!(state.score, 2);
        assert_eq!(state.jewels.len(), 3);
        assert!(state.jewels.iter().any(|j| j.pos == Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_alarm_added_every_fifth_jewel() {
        let mut state = empty_state();
        // Far corner: random spawns never reach it
        state.player.pos = Vec2::new(14.0, 14.0);

        for n in 1..=12u32 {
            state.place_jewel(state.player.pos);
            let alarms_before = state.alarms.len();
            let jewels_before = state.jewels.len();

            tick(&mut state, &FrameInput::default());

            assert_eq!(state.score, n);
            assert_eq!(state.jewels.len(), jewels_before);
            let expected = if n % 5 == 0 { 1 } else { 0 };
            assert_eq!(state.alarms.len(), alarms_before + expected);
            assert_eq!(
                state.events.contains(&GameEvent::AlarmSpawned {
                    count: state.alarms.len()
                }),
                n % 5 == 0
            );
        }
        assert_eq!(state.alarms.len(), 2);
    }

    #[test]
    fn test_new_alarm_gets_next_phase() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(-14.0, 14.0);
        state.score = 4;
        state.place_alarm(Vec2::new(7.0, 7.0));
        state.place_jewel(state.player.pos);

        tick(&mut state, &FrameInput::default());

        assert_eq!(state.alarms.len(), 2);
        assert!((state.alarms[1].phase - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_heading_precedence() {
        let mut state = empty_state();
        move_player(&mut state, &keys(true, false, true, false).keys);
        assert_eq!(state.player.heading, Heading::Forward);
        assert!((state.player.pos - Vec2::new(-0.1, -0.1)).length() < 1e-6);

        let mut state = empty_state();
        move_player(&mut state, &keys(true, true, false, false).keys);
        assert_eq!(state.player.heading, Heading::Back);
        assert!(state.player.pos.length() < 1e-6);

        let mut state = empty_state();
        move_player(&mut state, &keys(false, false, true, true).keys);
        assert_eq!(state.player.heading, Heading::Right);

        let mut state = empty_state();
        move_player(&mut state, &keys(false, false, false, false).keys);
        assert_eq!(state.player.heading, Heading::Back);
    }

    #[test]
    fn test_movement_stops_at_bounds() {
        let mut state = empty_state();
        for _ in 0..500 {
            move_player(&mut state, &keys(false, true, false, true).keys);
        }
        assert_eq!(state.player.pos, Vec2::new(15.0, 15.0));
    }

    #[test]
    fn test_animation_phases() {
        let mut state = empty_state();
        state.place_jewel(Vec2::new(3.0, 3.0));
        state.place_alarm(Vec2::new(-3.0, 3.0));
        state.place_alarm(Vec2::new(-3.0, -3.0));

        update_animation(&mut state, 0.0);
        assert!((state.jewels[0].spin - 0.01).abs() < 1e-6);
        assert!((state.jewels[0].height - 0.15).abs() < 1e-6);
        assert!((state.alarms[0].blink - 0.5).abs() < 1e-6);
        let expected = (0.7f32).sin() * 0.5 + 0.5;
        assert!((state.alarms[1].blink - expected).abs() < 1e-5);

        // sin(500 * 0.003) = sin(1.5)
        update_animation(&mut state, 500.0);
        let expected = 0.15 + (1.5f32).sin() * 0.05;
        assert!((state.jewels[0].height - expected).abs() < 1e-5);
    }

    #[test]
    fn test_animation_continues_after_game_over() {
        let mut state = empty_state();
        state.place_jewel(Vec2::new(3.0, 3.0));
        state.enter_game_over();

        tick(&mut state, &FrameInput::default());
        tick(&mut state, &FrameInput::default());

        assert!((state.jewels[0].spin - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(77);
        state.score = 9;
        state.enter_game_over();
        state.spawn_alarm();

        let fresh = state.restarted(78);

        assert_eq!(fresh.score, 0);
        assert_eq!(fresh.phase, GamePhase::Playing);
        assert_eq!(fresh.jewels.len(), 10);
        assert_eq!(fresh.alarms.len(), 5);
        assert!(!fresh.player.caught);
        assert!(fresh.events.is_empty());
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            keys(true, false, false, false),
            keys(false, false, true, false),
            keys(false, true, false, true),
            FrameInput::default(),
        ];

        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.jewels.len(), b.jewels.len());
    }

    fn arb_keys() -> impl Strategy<Value = FrameInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>())
            .prop_map(|(f, b, l, r)| keys(f, b, l, r))
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_keys(), 1..400),
        ) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                tick(&mut state, input);
                prop_assert!(state.player.pos.x.abs() <= 15.0);
                prop_assert!(state.player.pos.y.abs() <= 15.0);
            }
        }

        #[test]
        fn prop_score_and_entity_counts(
            seed in any::<u64>(),
            inputs in prop::collection::vec(arb_keys(), 1..400),
        ) {
            let mut state = GameState::new(seed);
            for input in &inputs {
                let score = state.score;
                let alarms = state.alarms.len();
                let over = state.is_game_over();

                tick(&mut state, input);

                prop_assert!(state.score >= score);
                prop_assert_eq!(state.jewels.len(), 10);
                let expected_alarms = 5 + (state.score / 5) as usize;
                prop_assert_eq!(state.alarms.len(), expected_alarms);
                prop_assert!(state.alarms.len() >= alarms);
                if over {
                    prop_assert!(state.is_game_over());
                    prop_assert_eq!(state.score, score);
                }
            }
        }
    }
}
