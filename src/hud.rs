//! HUD projection
//!
//! The UI only ever sees a `HudView` derived from the session; it has no way
//! to write back into `GameState`.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// What the presentation layer needs to draw the score and game-over overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudView {
    pub score: u32,
    pub is_game_over: bool,
}

impl From<&GameState> for HudView {
    fn from(state: &GameState) -> Self {
        Self {
            score: state.score,
            is_game_over: state.is_game_over(),
        }
    }
}

impl HudView {
    /// JSON form handed to page scripts: `{"score":n,"isGameOver":b}`
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Publishes a view only when it differs from the last one published
#[derive(Debug, Default)]
pub struct HudPublisher {
    last: Option<HudView>,
}

impl HudPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view if the UI needs updating
    pub fn publish(&mut self, state: &GameState) -> Option<HudView> {
        let view = HudView::from(state);
        if self.last == Some(view) {
            return None;
        }
        self.last = Some(view);
        Some(view)
    }

    /// Force the next publish through (after a restart)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Run `frame` under a mutable borrow of the session, then hand any published
/// view to `notify` once the borrow is released. Page listeners reached from
/// `notify` may restart or shut down the session.
pub fn publish_after<T>(
    session: &RefCell<T>,
    frame: impl FnOnce(&mut T) -> Option<HudView>,
    notify: impl FnOnce(HudView),
) {
    let view = frame(&mut session.borrow_mut());
    if let Some(view) = view {
        notify(view);
    }
}
