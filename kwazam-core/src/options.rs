//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Knobs that change how a [`crate::Game`] drives the turn cadence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Switch the turn (flip the board, check the Time/Plus swap) right after
    /// every successful move instead of waiting for an explicit switch.
    pub auto_switch_turn: bool,
}

impl GameOptions {
    pub fn with_auto_switch_turn(mut self, enabled: bool) -> GameOptions {
        self.auto_switch_turn = enabled;
        self
    }
}
