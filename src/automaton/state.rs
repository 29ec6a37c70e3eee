//! State representation

use serde::{Deserialize, Serialize};

pub type StateId = String;

/// Upper bound on state sequence numbers; imported states stay below it
pub const MAX_STATE_NUMBER: usize = u32::MAX as usize;

/// Position on the editor canvas (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A state of the automaton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    /// Sequence number `n` of the id `q{n}`
    pub number: usize,
    pub position: Position,
    pub is_initial: bool,
    pub is_final: bool,
}

/// State classification derived from the initial/final markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateClass {
    Initial,
    InitialFinal,
    Final,
    Intermediate,
}

impl StateClass {
    pub fn color(&self) -> &'static str {
        match self {
            StateClass::Initial => "lightblue",
            StateClass::InitialFinal => "lightgreen",
            StateClass::Final => "green",
            StateClass::Intermediate => "lightgray",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StateClass::Initial => "Initial",
            StateClass::InitialFinal => "Initial + Final",
            StateClass::Final => "Final",
            StateClass::Intermediate => "Intermediate",
        }
    }
}

impl State {
    pub fn new(number: usize, position: Position) -> Self {
        Self {
            id: state_id(number),
            number,
            position,
            is_initial: false,
            is_final: false,
        }
    }

    pub fn with_initial(mut self, is_initial: bool) -> Self {
        self.is_initial = is_initial;
        self
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn class(&self) -> StateClass {
        match (self.is_initial, self.is_final) {
            (true, true) => StateClass::InitialFinal,
            (true, false) => StateClass::Initial,
            (false, true) => StateClass::Final,
            (false, false) => StateClass::Intermediate,
        }
    }

    /// List label, e.g. `q0 (I,F)`
    pub fn display_label(&self) -> String {
        let mut flags = Vec::new();
        if self.is_initial {
            flags.push("I");
        }
        if self.is_final {
            flags.push("F");
        }
        if flags.is_empty() {
            self.id.clone()
        } else {
            format!("{} ({})", self.id, flags.join(","))
        }
    }
}

/// Build the id of the `number`-th state
pub fn state_id(number: usize) -> StateId {
    format!("q{}", number)
}
