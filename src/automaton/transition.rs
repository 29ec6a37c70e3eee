//! Transition representation

use crate::automaton::StateId;
use serde::{Deserialize, Serialize};

/// A labelled transition between two states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from_state: StateId,
    pub to_state: StateId,
    pub symbol: String,
}

impl Transition {
    pub fn new(from_state: StateId, to_state: StateId, symbol: String) -> Self {
        Self {
            from_state,
            to_state,
            symbol,
        }
    }

    pub fn is_loop(&self) -> bool {
        self.from_state == self.to_state
    }

    /// Whether this transition joins the unordered pair `{a, b}` without being a loop
    pub fn joins(&self, a: &str, b: &str) -> bool {
        !self.is_loop()
            && ((self.from_state == a && self.to_state == b)
                || (self.from_state == b && self.to_state == a))
    }

    pub fn touches(&self, state_id: &str) -> bool {
        self.from_state == state_id || self.to_state == state_id
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> String {
        format!("{} -{}-> {}", self.from_state, self.symbol, self.to_state)
    }
}
