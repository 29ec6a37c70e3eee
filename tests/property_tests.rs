//! Property-based tests for state elimination.
//!
//! Random automata over {a, b} are solved and the resulting expression is
//! compared with direct simulation on every short word.

use automata_re::automaton::{Automaton, Position};
use automata_re::config::EliminationOrder;
use automata_re::equations::{EquationSystem, derive};
use automata_re::error::AutomatonError;
use proptest::prelude::*;

const SYMBOLS: [&str; 2] = ["a", "b"];
const MAX_WORD_LEN: usize = 5;

#[derive(Debug, Clone)]
struct Spec {
    states: usize,
    initial: usize,
    finals: Vec<bool>,
    transitions: Vec<(usize, usize, usize)>,
}

prop_compose! {
    fn arbitrary_spec()(states in 1..=4usize)(
        states in Just(states),
        initial in 0..states,
        finals in prop::collection::vec(any::<bool>(), states),
        transitions in prop::collection::vec((0..states, 0..states, 0..SYMBOLS.len()), 0..8),
    ) -> Spec {
        Spec { states, initial, finals, transitions }
    }
}

fn build(spec: &Spec) -> Automaton {
    let mut automaton = Automaton::new();
    for i in 0..spec.states {
        automaton.add_state(Position::new(i as f64 * 100.0, 100.0));
    }
    automaton.set_initial(&format!("q{}", spec.initial)).unwrap();
    for (i, &is_final) in spec.finals.iter().enumerate() {
        automaton.set_final(&format!("q{}", i), is_final).unwrap();
    }
    for &(from, to, symbol) in &spec.transitions {
        automaton
            .add_transition(&format!("q{}", from), &format!("q{}", to), SYMBOLS[symbol])
            .unwrap();
    }
    automaton
}

fn words() -> Vec<Vec<&'static str>> {
    let mut all = vec![Vec::new()];
    let mut frontier: Vec<Vec<&'static str>> = vec![Vec::new()];
    for _ in 0..MAX_WORD_LEN {
        frontier = frontier
            .iter()
            .flat_map(|w| {
                SYMBOLS.iter().map(move |s| {
                    let mut next = w.clone();
                    next.push(*s);
                    next
                })
            })
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

fn check_language(automaton: &Automaton, order: EliminationOrder) -> Result<(), TestCaseError> {
    match derive(automaton, order) {
        Ok(derivation) => {
            prop_assert_eq!(derivation.steps.len(), automaton.len());
            for word in words() {
                prop_assert_eq!(
                    automaton.accepts(&word),
                    derivation.expression.matches(&word),
                    "word {:?}, expression {}",
                    word,
                    derivation.expression
                );
            }
        }
        Err(e) => {
            prop_assert_eq!(e, AutomatonError::NoFinalState);
            prop_assert!(automaton.final_states().is_empty());
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn heuristic_elimination_preserves_language(spec in arbitrary_spec()) {
        check_language(&build(&spec), EliminationOrder::Heuristic)?;
    }

    #[test]
    fn sequential_elimination_preserves_language(spec in arbitrary_spec()) {
        check_language(&build(&spec), EliminationOrder::Sequential)?;
    }

    #[test]
    fn initial_state_is_eliminated_last(spec in arbitrary_spec()) {
        let automaton = build(&spec);
        if let Ok(derivation) = derive(&automaton, EliminationOrder::Heuristic) {
            let initial = format!("q{}", spec.initial);
            prop_assert_eq!(derivation.elimination_order().last().copied(), Some(initial.as_str()));
        }
    }

    #[test]
    fn one_equation_per_state(spec in arbitrary_spec()) {
        let automaton = build(&spec);
        let system = EquationSystem::from_automaton(&automaton);
        prop_assert_eq!(system.len(), spec.states);
        for equation in &system.equations {
            prop_assert_eq!(
                equation.terms.len(),
                automaton.outgoing_transitions(&equation.state).len()
            );
        }
    }

    #[test]
    fn delete_state_removes_only_incident_transitions(
        spec in arbitrary_spec(),
        victim in 0..4usize,
    ) {
        let mut automaton = build(&spec);
        let victim = format!("q{}", victim % spec.states);
        let expected: Vec<String> = automaton
            .transitions()
            .iter()
            .filter(|t| !t.touches(&victim))
            .map(|t| t.display_label())
            .collect();

        automaton.delete_state(&victim).unwrap();

        let remaining: Vec<String> = automaton
            .transitions()
            .iter()
            .map(|t| t.display_label())
            .collect();
        prop_assert_eq!(remaining, expected);
        prop_assert!(!automaton.contains_state(&victim));
    }
}
