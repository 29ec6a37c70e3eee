//! Right-linear equation systems
//!
//! Every state `q` of an automaton yields one equation describing the
//! language `A_q` accepted when starting from `q`:
//!
//! ```text
//! A_q = λ·[q is final] ∪ ⋃ { sym·A_p | q -sym-> p }
//! ```
//!
//! Solving the system for the initial state (see [`arden`]) gives a regular
//! expression for the whole automaton.

use crate::automaton::{Automaton, StateId};
use crate::error::AutomatonError;
use crate::expr::Glyphs;
use serde::Serialize;

pub mod arden;

pub use arden::{Derivation, EliminationStep, derive};

/// One `sym·A_p` term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub symbol: String,
    pub target: StateId,
}

/// The equation of a single state, terms in transition order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equation {
    pub state: StateId,
    pub number: usize,
    pub is_final: bool,
    pub terms: Vec<Term>,
}

impl Equation {
    /// Whether the right-hand side is the empty language
    pub fn is_empty(&self) -> bool {
        !self.is_final && self.terms.is_empty()
    }

    /// Render as e.g. `A_q0 = λ ∪ a·A_q1`
    pub fn render(&self, glyphs: &Glyphs) -> String {
        let mut rhs: Vec<String> = Vec::with_capacity(self.terms.len() + 1);
        if self.is_final {
            rhs.push(glyphs.epsilon.clone());
        }
        rhs.extend(
            self.terms
                .iter()
                .map(|t| format!("{}·{}", t.symbol, variable(&t.target))),
        );

        let rhs = if rhs.is_empty() {
            glyphs.empty.clone()
        } else {
            rhs.join(" ∪ ")
        };
        format!("{} = {}", variable(&self.state), rhs)
    }
}

/// Variable name of a state, `A_q0`
pub fn variable(state: &str) -> String {
    format!("A_{}", state)
}

/// All equations of an automaton plus the facts needed before solving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationSystem {
    /// One equation per state, ordered by state number
    pub equations: Vec<Equation>,
    pub initial: Option<StateId>,
    pub has_final: bool,
}

impl EquationSystem {
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let transitions = automaton.transitions();
        let equations: Vec<Equation> = automaton
            .states()
            .into_iter()
            .map(|state| Equation {
                state: state.id.clone(),
                number: state.number,
                is_final: state.is_final,
                terms: transitions
                    .iter()
                    .filter(|t| t.from_state == state.id)
                    .map(|t| Term {
                        symbol: t.symbol.clone(),
                        target: t.to_state.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            has_final: equations.iter().any(|e| e.is_final),
            initial: automaton.initial_state().map(|s| s.id.clone()),
            equations,
        }
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn get(&self, state: &str) -> Option<&Equation> {
        self.equations.iter().find(|e| e.state == state)
    }

    /// Checks the system can be solved and returns the initial state.
    ///
    /// Conditions are checked in the order the editor reports them: states,
    /// then a final state, then the initial state.
    pub fn validate(&self) -> Result<&StateId, AutomatonError> {
        if self.equations.is_empty() {
            return Err(AutomatonError::NoStates);
        }
        if !self.has_final {
            return Err(AutomatonError::NoFinalState);
        }
        self.initial.as_ref().ok_or(AutomatonError::NoInitialState)
    }

    pub fn render(&self, glyphs: &Glyphs) -> Vec<String> {
        self.equations.iter().map(|e| e.render(glyphs)).collect()
    }
}
