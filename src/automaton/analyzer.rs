//! Structural analysis of an automaton
//!
//! Classifies the automaton (deterministic or not) and finds states that can
//! never contribute to an accepted word.

use super::{Automaton, StateId};
use petgraph::visit::{Dfs, Reversed};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonKind {
    /// At most one transition per (state, symbol)
    Deterministic,

    /// Some state has two transitions on the same symbol
    Nondeterministic,

    /// No states at all
    Empty,
}

impl AutomatonKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            AutomatonKind::Deterministic => "DFA",
            AutomatonKind::Nondeterministic => "NFA",
            AutomatonKind::Empty => "Empty",
        }
    }
}

/// Analysis report
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub kind: AutomatonKind,
    /// States no run from the initial state reaches
    pub unreachable: Vec<StateId>,
    /// States from which no final state can be reached
    pub dead: Vec<StateId>,
    pub has_cycles: bool,
    /// Whether the accepted language is empty
    pub language_empty: bool,
}

impl AnalysisReport {
    /// States that are reachable and can reach a final state
    pub fn useful_states(&self, automaton: &Automaton) -> Vec<StateId> {
        automaton
            .states()
            .into_iter()
            .filter(|s| !self.unreachable.contains(&s.id) && !self.dead.contains(&s.id))
            .map(|s| s.id.clone())
            .collect()
    }
}

/// Analyze an automaton
pub fn analyze(automaton: &Automaton) -> AnalysisReport {
    let graph = &automaton.graph;

    if graph.node_count() == 0 {
        return AnalysisReport {
            kind: AutomatonKind::Empty,
            unreachable: Vec::new(),
            dead: Vec::new(),
            has_cycles: false,
            language_empty: true,
        };
    }

    let mut reachable: HashSet<StateId> = HashSet::new();
    if let Some(start) = graph
        .node_indices()
        .find(|&idx| graph[idx].is_initial)
    {
        let mut dfs = Dfs::new(graph, start);
        while let Some(idx) = dfs.next(graph) {
            reachable.insert(graph[idx].id.clone());
        }
    }

    // walk backwards from every final state
    let reversed = Reversed(graph);
    let mut productive: HashSet<StateId> = HashSet::new();
    for start in graph.node_indices().filter(|&idx| graph[idx].is_final) {
        let mut dfs = Dfs::new(reversed, start);
        while let Some(idx) = dfs.next(reversed) {
            productive.insert(graph[idx].id.clone());
        }
    }

    let states = automaton.states();
    let unreachable: Vec<StateId> = states
        .iter()
        .filter(|s| !reachable.contains(&s.id))
        .map(|s| s.id.clone())
        .collect();
    let dead: Vec<StateId> = states
        .iter()
        .filter(|s| !productive.contains(&s.id))
        .map(|s| s.id.clone())
        .collect();

    let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();
    let deterministic = graph
        .edge_weights()
        .all(|t| seen.insert((t.from_state.as_str(), t.symbol.as_str())));

    AnalysisReport {
        kind: if deterministic {
            AutomatonKind::Deterministic
        } else {
            AutomatonKind::Nondeterministic
        },
        language_empty: !reachable.iter().any(|id| productive.contains(id)),
        unreachable,
        dead,
        has_cycles: petgraph::algo::is_cyclic_directed(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Position;

    fn chain(n: usize) -> Automaton {
        let mut automaton = Automaton::new();
        for i in 0..n {
            automaton.add_state(Position::new(i as f64 * 100.0, 0.0));
        }
        automaton
    }

    #[test]
    fn test_empty_automaton() {
        let report = analyze(&Automaton::new());
        assert_eq!(report.kind, AutomatonKind::Empty);
        assert!(report.language_empty);
    }

    #[test]
    fn test_unreachable_and_dead_states() {
        let mut automaton = chain(4);
        automaton.add_transition("q0", "q1", "a").unwrap();
        automaton.add_transition("q0", "q2", "b").unwrap();
        automaton.add_transition("q3", "q1", "a").unwrap();
        automaton.toggle_final("q1").unwrap();

        let report = analyze(&automaton);
        assert_eq!(report.kind, AutomatonKind::Deterministic);
        assert_eq!(report.unreachable, vec!["q3"]);
        assert_eq!(report.dead, vec!["q2"]);
        assert!(!report.has_cycles);
        assert!(!report.language_empty);
        assert_eq!(report.useful_states(&automaton), vec!["q0", "q1"]);
    }

    #[test]
    fn test_nondeterministic_with_cycle() {
        let mut automaton = chain(2);
        automaton.add_transition("q0", "q1", "a").unwrap();
        automaton.add_transition("q0", "q0", "a").unwrap();
        automaton.add_transition("q1", "q0", "b").unwrap();

        let report = analyze(&automaton);
        assert_eq!(report.kind, AutomatonKind::Nondeterministic);
        assert!(report.has_cycles);
        // no final state at all
        assert!(report.language_empty);
        assert_eq!(report.dead.len(), 2);
    }
}
