//! Solving equation systems by state elimination
//!
//! Each equation is held as a linear form `X = Σ αᵢ·Yᵢ ∪ β`. Eliminating a
//! variable `X` first removes its self reference with Arden's lemma
//!
//! ```text
//! X = αX ∪ β  ⇒  X = α*β
//! ```
//!
//! and then substitutes the result into every remaining equation. Once only
//! the initial state is left, its solved constant is the regular expression
//! of the automaton.
//!
//! All coefficients are built from transition symbols, so none of them
//! contains the empty word and the solution given by the lemma is unique.

use super::{EquationSystem, variable};
use crate::automaton::{Automaton, StateId, state_id};
use crate::config::EliminationOrder;
use crate::error::AutomatonError;
use crate::expr::{Expr, Glyphs};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// `X = Σ coefficients[n]·A_qn ∪ constant`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LinearForm {
    /// Keyed by state number
    pub coefficients: BTreeMap<usize, Expr>,
    pub constant: Expr,
}

impl LinearForm {
    fn new(constant: Expr) -> Self {
        Self {
            coefficients: BTreeMap::new(),
            constant,
        }
    }

    fn add_term(&mut self, var: usize, coefficient: Expr) {
        if coefficient.is_empty_language() {
            return;
        }
        let current = self.coefficients.remove(&var).unwrap_or_default();
        self.coefficients.insert(var, current.union(coefficient));
    }

    pub fn references(&self, var: usize) -> bool {
        self.coefficients.contains_key(&var)
    }

    /// Applies Arden's lemma to the self reference of `var`, if any
    fn resolve_self_reference(&mut self, var: usize) {
        let Some(alpha) = self.coefficients.remove(&var) else {
            return;
        };
        let prefix = alpha.star();
        self.constant = prefix.clone().concat(std::mem::take(&mut self.constant));
        for coefficient in self.coefficients.values_mut() {
            *coefficient = prefix.clone().concat(std::mem::take(coefficient));
        }
    }

    /// Replaces `var` by its solved form
    fn substitute(&mut self, var: usize, solution: &LinearForm) {
        let Some(coefficient) = self.coefficients.remove(&var) else {
            return;
        };
        for (&other, c) in &solution.coefficients {
            self.add_term(other, coefficient.clone().concat(c.clone()));
        }
        let constant = std::mem::take(&mut self.constant);
        self.constant = constant.union(coefficient.concat(solution.constant.clone()));
    }

    /// Right-hand side, e.g. `a*b·A_q0 ∪ a*`
    pub fn render(&self, glyphs: &Glyphs) -> String {
        let mut parts: Vec<String> = self
            .coefficients
            .iter()
            .map(|(&var, coefficient)| {
                let name = variable(&state_id(var));
                match coefficient {
                    Expr::Epsilon => name,
                    Expr::Union(_) => format!("({})·{}", coefficient.render(glyphs), name),
                    _ => format!("{}·{}", coefficient.render(glyphs), name),
                }
            })
            .collect();
        if !self.constant.is_empty_language() {
            parts.push(self.constant.render(glyphs));
        }

        if parts.is_empty() {
            glyphs.empty.clone()
        } else {
            parts.join(" ∪ ")
        }
    }
}

/// One eliminated variable and the equation it was solved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationStep {
    pub state: StateId,
    /// Whether Arden's lemma removed a self reference
    pub applied_arden: bool,
    pub solution: LinearForm,
}

impl EliminationStep {
    pub fn render(&self, glyphs: &Glyphs) -> String {
        format!("{} = {}", variable(&self.state), self.solution.render(glyphs))
    }
}

/// Result of solving an automaton's equation system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub initial: StateId,
    pub expression: Expr,
    /// Steps in elimination order; the initial state is always last
    pub steps: Vec<EliminationStep>,
}

impl Derivation {
    pub fn elimination_order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.state.as_str()).collect()
    }

    pub fn render_steps(&self, glyphs: &Glyphs) -> Vec<String> {
        self.steps.iter().map(|s| s.render(glyphs)).collect()
    }
}

/// Derive a regular expression for the language accepted by `automaton`
pub fn derive(automaton: &Automaton, order: EliminationOrder) -> Result<Derivation, AutomatonError> {
    let system = EquationSystem::from_automaton(automaton);
    let initial_id = system.validate()?.clone();

    let numbers: HashMap<&str, usize> = system
        .equations
        .iter()
        .map(|e| (e.state.as_str(), e.number))
        .collect();
    let initial = *numbers
        .get(initial_id.as_str())
        .ok_or(AutomatonError::NoInitialState)?;
    let finals: BTreeSet<usize> = system
        .equations
        .iter()
        .filter(|e| e.is_final)
        .map(|e| e.number)
        .collect();

    let mut forms: BTreeMap<usize, LinearForm> = BTreeMap::new();
    for equation in &system.equations {
        let mut form = LinearForm::new(if equation.is_final {
            Expr::Epsilon
        } else {
            Expr::Empty
        });
        for term in &equation.terms {
            let target = *numbers
                .get(term.target.as_str())
                .ok_or_else(|| AutomatonError::UnknownState(term.target.clone()))?;
            form.add_term(target, Expr::symbol(term.symbol.as_str()));
        }
        forms.insert(equation.number, form);
    }

    tracing::debug!(
        "Solving {} equations for {} ({:?} order)",
        forms.len(),
        initial_id,
        order
    );

    let mut steps = Vec::with_capacity(forms.len());
    while let Some(var) = pick_next(&forms, initial, &finals, order) {
        let Some(mut form) = forms.remove(&var) else {
            break;
        };
        let applied_arden = form.references(var);
        form.resolve_self_reference(var);
        for other in forms.values_mut() {
            other.substitute(var, &form);
        }
        let step = EliminationStep {
            state: state_id(var),
            applied_arden,
            solution: form,
        };
        tracing::trace!("Eliminated {}", step.render(&Glyphs::default()));
        steps.push(step);
    }

    let mut last = forms
        .remove(&initial)
        .ok_or(AutomatonError::NoInitialState)?;
    let applied_arden = last.references(initial);
    last.resolve_self_reference(initial);
    let expression = last.constant.clone();
    steps.push(EliminationStep {
        state: initial_id.clone(),
        applied_arden,
        solution: last,
    });

    tracing::debug!("Derived expression of size {}", expression.size());
    Ok(Derivation {
        initial: initial_id,
        expression,
        steps,
    })
}

/// Picks the next variable to eliminate; the initial state is never picked
fn pick_next(
    forms: &BTreeMap<usize, LinearForm>,
    initial: usize,
    finals: &BTreeSet<usize>,
    order: EliminationOrder,
) -> Option<usize> {
    let candidates = forms.keys().copied().filter(|&var| var != initial);
    match order {
        EliminationOrder::Sequential => candidates.min(),
        EliminationOrder::Heuristic => candidates.min_by_key(|&var| {
            let inbound = forms
                .iter()
                .filter(|&(&other, form)| other != var && form.references(var))
                .count();
            let outbound = forms
                .get(&var)
                .map_or(0, |form| form.coefficients.keys().filter(|&&o| o != var).count());
            (finals.contains(&var), inbound * outbound, var)
        }),
    }
}
