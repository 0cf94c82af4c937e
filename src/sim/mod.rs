//! Game loop simulation module
//!
//! All gameplay logic lives here. This module must stay rendering-agnostic:
//! - Fixed step only
//! - Seeded RNG only
//! - Plain position data, no scene graph or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{clamp_to_bounds, first_contact, in_contact};
pub use state::{Alarm, GameEvent, GamePhase, GameState, Heading, Jewel, Player};
pub use tick::{FrameInput, MoveKeys, advance, check_collisions, move_player, tick, update_animation};
