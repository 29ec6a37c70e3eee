use crate::automaton::{MAX_STATE_NUMBER, Position, State, StateId, Transition, state_id};
use crate::error::AutomatonError;
use petgraph::Direction;
use petgraph::prelude::EdgeRef;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use std::collections::{BTreeSet, HashMap};

/// A finite automaton under construction.
///
/// States are nodes and transitions are edges of a `StableGraph`, so indices
/// held elsewhere stay valid when unrelated states are removed. Transitions
/// additionally keep the order in which they were added, which is the order
/// the editor lists them in.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    /// The underlying graph structure.
    pub graph: StableGraph<State, Transition>,

    /// Lookup from state id (`q{n}`) to its node.
    state_index: HashMap<StateId, NodeIndex>,

    /// Edges in insertion order.
    transition_order: Vec<EdgeIndex>,

    /// Number used for the next `add_state`.
    next_number: usize,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Id the next call to [`Automaton::add_state`] will allocate
    pub fn next_state_id(&self) -> StateId {
        state_id(self.next_number)
    }

    /// Adds a new state at `position` and returns its id.
    ///
    /// The first state placed on an empty automaton is marked initial.
    pub fn add_state(&mut self, position: Position) -> StateId {
        let number = self.next_number;
        let state = State::new(number, position).with_initial(self.is_empty());
        let id = state.id.clone();
        self.insert(state);
        tracing::debug!("Added state {} at ({}, {})", id, position.x, position.y);
        id
    }

    /// Adds a state with an explicit sequence number, as found in a definition file.
    pub fn insert_state(
        &mut self,
        number: usize,
        position: Position,
    ) -> Result<StateId, AutomatonError> {
        if number.checked_add(1).is_none_or(|next| next > MAX_STATE_NUMBER) {
            return Err(AutomatonError::StateNumberOutOfRange(number));
        }
        let state = State::new(number, position);
        if self.state_index.contains_key(&state.id) {
            return Err(AutomatonError::DuplicateState(state.id));
        }
        let id = state.id.clone();
        self.insert(state);
        Ok(id)
    }

    fn insert(&mut self, state: State) {
        self.next_number = self.next_number.max(state.number.saturating_add(1));
        let id = state.id.clone();
        let node_index = self.graph.add_node(state);
        self.state_index.insert(id, node_index);
    }

    /// Removes a state together with every transition entering or leaving it.
    ///
    /// Deleting the most recently numbered state hands its number back to the
    /// allocator.
    pub fn delete_state(&mut self, id: &str) -> Result<State, AutomatonError> {
        let node_idx = self
            .state_index
            .remove(id)
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))?;
        let removed_transitions = self
            .graph
            .edges_directed(node_idx, Direction::Outgoing)
            .count()
            + self
                .graph
                .edges_directed(node_idx, Direction::Incoming)
                .filter(|e| e.source() != node_idx)
                .count();

        let state = self
            .graph
            .remove_node(node_idx)
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))?;
        // remove_node drops incident edges; forget their indices before any
        // new edge can reuse a slot
        let graph = &self.graph;
        self.transition_order
            .retain(|&edge| graph.edge_weight(edge).is_some());

        if state.number + 1 == self.next_number {
            self.next_number = state.number;
        }

        tracing::debug!(
            "Deleted state {} and {} transition(s)",
            state.id,
            removed_transitions
        );
        Ok(state)
    }

    /// Flips the final marker of a state and returns the new value
    pub fn toggle_final(&mut self, id: &str) -> Result<bool, AutomatonError> {
        let state = self.state_mut(id)?;
        state.is_final = !state.is_final;
        Ok(state.is_final)
    }

    /// Makes `id` the only initial state
    pub fn set_initial(&mut self, id: &str) -> Result<(), AutomatonError> {
        let target = *self
            .state_index
            .get(id)
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))?;
        let nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        for node_idx in nodes {
            if let Some(state) = self.graph.node_weight_mut(node_idx) {
                state.is_initial = node_idx == target;
            }
        }
        Ok(())
    }

    /// Sets the final marker of a state
    pub fn set_final(&mut self, id: &str, is_final: bool) -> Result<(), AutomatonError> {
        self.state_mut(id)?.is_final = is_final;
        Ok(())
    }

    /// Adds a transition and returns its position in the transition list.
    ///
    /// The symbol is trimmed; all three fields are required.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        symbol: &str,
    ) -> Result<usize, AutomatonError> {
        let symbol = symbol.trim();
        if from.is_empty() {
            return Err(AutomatonError::MissingField("source state"));
        }
        if to.is_empty() {
            return Err(AutomatonError::MissingField("target state"));
        }
        if symbol.is_empty() {
            return Err(AutomatonError::MissingField("symbol"));
        }

        let from_idx = *self
            .state_index
            .get(from)
            .ok_or_else(|| AutomatonError::UnknownState(from.to_string()))?;
        let to_idx = *self
            .state_index
            .get(to)
            .ok_or_else(|| AutomatonError::UnknownState(to.to_string()))?;

        let transition = Transition::new(from.to_string(), to.to_string(), symbol.to_string());
        tracing::debug!("Added transition {}", transition.display_label());
        let edge = self.graph.add_edge(from_idx, to_idx, transition);
        self.transition_order.push(edge);
        Ok(self.transition_order.len() - 1)
    }

    /// Removes the transition at `index` in the transition list
    pub fn delete_transition(&mut self, index: usize) -> Result<Transition, AutomatonError> {
        let len = self.transition_order.len();
        if index >= len {
            return Err(AutomatonError::TransitionIndex { index, len });
        }
        let edge = self.transition_order.remove(index);
        self.graph
            .remove_edge(edge)
            .ok_or(AutomatonError::TransitionIndex { index, len })
    }

    fn state_mut(&mut self, id: &str) -> Result<&mut State, AutomatonError> {
        self.state_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight_mut(idx))
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))
    }

    /// Get a state by its ID
    pub fn get_state(&self, id: &str) -> Option<&State> {
        self.state_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.state_index.contains_key(id)
    }

    /// All states ordered by state number
    pub fn states(&self) -> Vec<&State> {
        let mut states: Vec<&State> = self.graph.node_weights().collect();
        states.sort_by_key(|s| s.number);
        states
    }

    /// All transitions in the order they were added
    pub fn transitions(&self) -> Vec<&Transition> {
        self.transition_order
            .iter()
            .filter_map(|&edge| self.graph.edge_weight(edge))
            .collect()
    }

    pub fn transition_count(&self) -> usize {
        self.transition_order.len()
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.states().into_iter().find(|s| s.is_initial)
    }

    pub fn final_states(&self) -> Vec<&State> {
        self.states().into_iter().filter(|s| s.is_final).collect()
    }

    /// Transitions leaving a state, in list order
    pub fn outgoing_transitions(&self, id: &str) -> Vec<&Transition> {
        self.transitions()
            .into_iter()
            .filter(|t| t.from_state == id)
            .collect()
    }

    /// Symbols used by any transition
    pub fn alphabet(&self) -> BTreeSet<String> {
        self.graph.edge_weights().map(|t| t.symbol.clone()).collect()
    }

    /// Runs `word` (a sequence of symbols) through the automaton.
    ///
    /// Transitions are read nondeterministically; the word is accepted when
    /// some run from the initial state ends in a final state.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let Some(initial) = self.initial_state() else {
            return false;
        };
        let mut current: BTreeSet<&str> = BTreeSet::from([initial.id.as_str()]);

        for symbol in word {
            let symbol = symbol.as_ref();
            current = self
                .graph
                .edge_weights()
                .filter(|t| t.symbol == symbol && current.contains(t.from_state.as_str()))
                .map(|t| t.to_state.as_str())
                .collect();
            if current.is_empty() {
                return false;
            }
        }

        current
            .iter()
            .any(|id| self.get_state(id).is_some_and(|s| s.is_final))
    }

    /// Export to DOT format for Graphviz
    pub fn to_dot(&self) -> String {
        let mut dot = "digraph Automaton {\n".to_string();
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [style=filled];\n\n");

        if let Some(initial) = self.initial_state() {
            dot.push_str("  __start [shape=point, style=invis];\n");
            dot.push_str(&format!("  __start -> \"{}\";\n", initial.id));
        }

        for state in self.states() {
            let shape = if state.is_final {
                "doublecircle"
            } else {
                "circle"
            };
            dot.push_str(&format!(
                "  \"{}\" [shape={}, fillcolor=\"{}\"];\n",
                state.id,
                shape,
                state.class().color()
            ));
        }

        dot.push('\n');

        for transition in self.transitions() {
            dot.push_str(&format!(
                "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                transition.from_state,
                transition.to_state,
                transition.symbol.replace('\\', "\\\\").replace('"', "\\\"")
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Get automaton statistics
    pub fn stats(&self) -> AutomatonStats {
        let states = self.states();
        AutomatonStats {
            total_states: states.len(),
            total_transitions: self.transition_order.len(),
            final_states: states.iter().filter(|s| s.is_final).count(),
            loops: self.graph.edge_weights().filter(|t| t.is_loop()).count(),
            initial_state: states.iter().find(|s| s.is_initial).map(|s| s.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub final_states: usize,
    pub loops: usize,
    pub initial_state: Option<StateId>,
}
