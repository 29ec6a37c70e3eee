//! Automaton module - states, transitions and their canvas layout

pub mod analyzer;
pub mod graph;
pub mod layout;
pub mod state;
pub mod transition;

// Re-export key types
pub use graph::{Automaton, AutomatonStats};
pub use state::{MAX_STATE_NUMBER, Position, State, StateClass, StateId, state_id};
pub use transition::Transition;
