//! TUI application state

use crate::automaton::{Automaton, Position, State, StateId, Transition};
use crate::config::{DeriveConfig, EditorConfig};
use crate::equations::{Derivation, EquationSystem, derive};
use crate::error::{AutomatonError, Severity};
use crate::expr::Glyphs;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

/// TUI application state
pub struct App {
    pub automaton: Automaton,
    pub editor: EditorConfig,
    pub derive: DeriveConfig,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub selected_state_index: usize,
    pub state_list_state: ListState,
    pub selected_transition_index: usize,
    pub transition_list_state: ListState,
    pub form: TransitionForm,
    /// Modal message; blocks all other input until dismissed
    pub message: Option<MessageBox>,
    pub derivation: Option<Derivation>,
    pub status: String,
    pub should_quit: bool,
    pub interrupted: bool,
    /// Where the canvas was last drawn, for mapping mouse clicks
    pub canvas_area: Rect,
    view_stack: Vec<ViewMode>,
}

/// View modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Editor,
    Equations,
    Regex,
    Help,
}

/// What keyboard and mouse input currently drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Next canvas click places a state
    PlacingState,
    TransitionForm,
}

/// List receiving ↑/↓ in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    States,
    Transitions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    From,
    To,
    Symbol,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::From => FormField::To,
            FormField::To => FormField::Symbol,
            FormField::Symbol => FormField::From,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::From => FormField::Symbol,
            FormField::To => FormField::From,
            FormField::Symbol => FormField::To,
        }
    }
}

/// The add-transition form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionForm {
    pub from: String,
    pub to: String,
    pub symbol: String,
    pub field: FormField,
}

impl TransitionForm {
    fn active_mut(&mut self) -> &mut String {
        match self.field {
            FormField::From => &mut self.from,
            FormField::To => &mut self.to,
            FormField::Symbol => &mut self.symbol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub severity: Severity,
    pub text: String,
}

impl MessageBox {
    pub fn title(&self) -> &'static str {
        match self.severity {
            Severity::Info => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl From<&AutomatonError> for MessageBox {
    fn from(err: &AutomatonError) -> Self {
        Self {
            severity: err.severity(),
            text: err.to_string(),
        }
    }
}

/// Maps a terminal cell inside the canvas block to canvas coordinates.
///
/// `area` includes the block border; clicks on the border map to nothing.
pub fn cell_to_canvas(area: Rect, column: u16, row: u16, editor: &EditorConfig) -> Option<Position> {
    let inner_x = area.x.checked_add(1)?;
    let inner_y = area.y.checked_add(1)?;
    let width = area.width.checked_sub(2)?;
    let height = area.height.checked_sub(2)?;
    if width == 0 || height == 0 {
        return None;
    }
    if column < inner_x || row < inner_y || column >= inner_x + width || row >= inner_y + height {
        return None;
    }

    let x = (f64::from(column - inner_x) + 0.5) * editor.canvas_width / f64::from(width);
    let y = (f64::from(row - inner_y) + 0.5) * editor.canvas_height / f64::from(height);
    Some(Position::new(x, y))
}

impl App {
    pub fn new(automaton: Automaton, editor: EditorConfig, derive: DeriveConfig) -> Self {
        let mut app = Self {
            automaton,
            editor,
            derive,
            view_mode: ViewMode::Editor,
            input_mode: InputMode::Normal,
            focus: Focus::States,
            selected_state_index: 0,
            state_list_state: ListState::default(),
            selected_transition_index: 0,
            transition_list_state: ListState::default(),
            form: TransitionForm::default(),
            message: None,
            derivation: None,
            status: "Press [a] to add a state, [?] for help".to_string(),
            should_quit: false,
            interrupted: false,
            canvas_area: Rect::default(),
            view_stack: Vec::new(),
        };
        app.sync_selection();
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Quit via Ctrl+C rather than the quit key
    pub fn interrupt(&mut self) {
        self.interrupted = true;
        self.should_quit = true;
    }

    /// Switches view, unwinding to an earlier entry if `mode` is already on the stack
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        if let Some(pos) = self.view_stack.iter().position(|m| *m == mode) {
            self.view_stack.truncate(pos);
        } else {
            self.view_stack.push(self.view_mode);
        }
        self.view_mode = mode;
    }

    pub fn pop_view_mode(&mut self) {
        self.view_mode = self.view_stack.pop().unwrap_or(ViewMode::Editor);
    }

    pub fn glyphs(&self) -> Glyphs {
        Glyphs::from(&self.derive)
    }

    pub fn equations(&self) -> EquationSystem {
        EquationSystem::from_automaton(&self.automaton)
    }

    fn show_error(&mut self, err: &AutomatonError) {
        tracing::debug!("Editor error: {}", err);
        self.message = Some(MessageBox::from(err));
    }

    fn show_warning(&mut self, text: impl Into<String>) {
        self.message = Some(MessageBox {
            severity: Severity::Warning,
            text: text.into(),
        });
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    // States

    pub fn get_selected_state(&self) -> Option<&State> {
        self.automaton
            .states()
            .get(self.selected_state_index)
            .copied()
    }

    pub fn get_selected_transition(&self) -> Option<&Transition> {
        self.automaton
            .transitions()
            .get(self.selected_transition_index)
            .copied()
    }

    fn select_state(&mut self, id: &str) {
        if let Some(pos) = self.automaton.states().iter().position(|s| s.id == id) {
            self.selected_state_index = pos;
        }
        self.sync_selection();
    }

    /// Clamps both selections after the automaton changed
    fn sync_selection(&mut self) {
        let states = self.automaton.len();
        let transitions = self.automaton.transition_count();
        self.selected_state_index = self.selected_state_index.min(states.saturating_sub(1));
        self.selected_transition_index = self
            .selected_transition_index
            .min(transitions.saturating_sub(1));
        self.state_list_state
            .select((states > 0).then_some(self.selected_state_index));
        self.transition_list_state
            .select((transitions > 0).then_some(self.selected_transition_index));
    }

    pub fn begin_add_state(&mut self) {
        self.input_mode = InputMode::PlacingState;
        self.status = format!(
            "Click on the canvas to place {} ([Enter] centre, [Esc] cancel)",
            self.automaton.next_state_id()
        );
    }

    pub fn place_state(&mut self, position: Position) -> StateId {
        let id = self.automaton.add_state(position);
        self.input_mode = InputMode::Normal;
        self.status = format!("Added {}", id);
        self.select_state(&id);
        id
    }

    pub fn place_state_at_center(&mut self) -> StateId {
        self.place_state(Position::new(
            self.editor.canvas_width / 2.0,
            self.editor.canvas_height / 2.0,
        ))
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.status = "Cancelled".to_string();
    }

    /// State whose circle contains `position`, closest first
    pub fn state_at(&self, position: Position) -> Option<StateId> {
        let radius = self.editor.state_radius;
        self.automaton
            .states()
            .into_iter()
            .map(|s| {
                let dx = s.position.x - position.x;
                let dy = s.position.y - position.y;
                (s, dx.hypot(dy))
            })
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s.id.clone())
    }

    /// Left click at a terminal cell
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let Some(position) = cell_to_canvas(self.canvas_area, column, row, &self.editor) else {
            return;
        };
        match self.input_mode {
            InputMode::PlacingState => {
                self.place_state(position);
            }
            InputMode::Normal => {
                if let Some(id) = self.state_at(position) {
                    self.focus = Focus::States;
                    self.select_state(&id);
                }
            }
            InputMode::TransitionForm => {}
        }
    }

    pub fn delete_selected_state(&mut self) {
        let Some(id) = self.get_selected_state().map(|s| s.id.clone()) else {
            self.show_warning("No state selected");
            return;
        };
        let before = self.automaton.transition_count();
        match self.automaton.delete_state(&id) {
            Ok(_) => {
                let removed = before - self.automaton.transition_count();
                self.status = format!("Deleted {} and {} transition(s)", id, removed);
                self.derivation = None;
                self.sync_selection();
            }
            Err(e) => self.show_error(&e),
        }
    }

    pub fn toggle_final_selected(&mut self) {
        let Some(id) = self.get_selected_state().map(|s| s.id.clone()) else {
            self.show_warning("No state selected");
            return;
        };
        match self.automaton.toggle_final(&id) {
            Ok(is_final) => {
                self.derivation = None;
                self.status = if is_final {
                    format!("{} is now final", id)
                } else {
                    format!("{} is no longer final", id)
                };
            }
            Err(e) => self.show_error(&e),
        }
    }

    pub fn make_initial_selected(&mut self) {
        let Some(id) = self.get_selected_state().map(|s| s.id.clone()) else {
            self.show_warning("No state selected");
            return;
        };
        match self.automaton.set_initial(&id) {
            Ok(()) => {
                self.derivation = None;
                self.status = format!("{} is now initial", id);
            }
            Err(e) => self.show_error(&e),
        }
    }

    // Transitions

    /// Opens the transition form, both states preset to the selection
    pub fn open_transition_form(&mut self) {
        let Some(id) = self.get_selected_state().map(|s| s.id.clone()) else {
            self.show_warning("Add a state before adding transitions");
            return;
        };
        self.form = TransitionForm {
            from: id.clone(),
            to: id,
            symbol: String::new(),
            field: FormField::Symbol,
        };
        self.input_mode = InputMode::TransitionForm;
    }

    pub fn form_next_field(&mut self) {
        self.form.field = self.form.field.next();
    }

    pub fn form_previous_field(&mut self) {
        self.form.field = self.form.field.previous();
    }

    pub fn form_push(&mut self, c: char) {
        self.form.active_mut().push(c);
    }

    pub fn form_backspace(&mut self) {
        self.form.active_mut().pop();
    }

    /// Steps the From/To field through the existing states
    pub fn form_cycle_state(&mut self, forward: bool) {
        if self.form.field == FormField::Symbol {
            return;
        }
        let ids: Vec<StateId> = self
            .automaton
            .states()
            .into_iter()
            .map(|s| s.id.clone())
            .collect();
        if ids.is_empty() {
            return;
        }
        let field = self.form.active_mut();
        let next = match ids.iter().position(|id| id == field) {
            Some(pos) if forward => (pos + 1) % ids.len(),
            Some(pos) => (pos + ids.len() - 1) % ids.len(),
            None => 0,
        };
        *field = ids[next].clone();
    }

    pub fn submit_transition_form(&mut self) {
        let form = self.form.clone();
        match self
            .automaton
            .add_transition(form.from.trim(), form.to.trim(), &form.symbol)
        {
            Ok(index) => {
                self.input_mode = InputMode::Normal;
                self.selected_transition_index = index;
                self.derivation = None;
                self.sync_selection();
                if let Some(t) = self.get_selected_transition() {
                    self.status = format!("Added {}", t.display_label());
                }
            }
            Err(e) => self.show_error(&e),
        }
    }

    pub fn delete_selected_transition(&mut self) {
        match self.automaton.delete_transition(self.selected_transition_index) {
            Ok(t) => {
                self.status = format!("Deleted {}", t.display_label());
                self.derivation = None;
                self.sync_selection();
            }
            Err(e) => self.show_error(&e),
        }
    }

    // Navigation

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::States => Focus::Transitions,
            Focus::Transitions => Focus::States,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::States => {
                let len = self.automaton.len();
                if len > 0 {
                    self.selected_state_index = (self.selected_state_index + 1) % len;
                }
            }
            Focus::Transitions => {
                let len = self.automaton.transition_count();
                if len > 0 {
                    self.selected_transition_index = (self.selected_transition_index + 1) % len;
                }
            }
        }
        self.sync_selection();
    }

    pub fn select_previous(&mut self) {
        match self.focus {
            Focus::States => {
                let len = self.automaton.len();
                if len > 0 {
                    self.selected_state_index = (self.selected_state_index + len - 1) % len;
                }
            }
            Focus::Transitions => {
                let len = self.automaton.transition_count();
                if len > 0 {
                    self.selected_transition_index =
                        (self.selected_transition_index + len - 1) % len;
                }
            }
        }
        self.sync_selection();
    }

    // Derivation

    pub fn show_equations(&mut self) {
        self.set_view_mode(ViewMode::Equations);
    }

    /// Solves the equation system; failures open a message box
    pub fn derive_expression(&mut self) {
        match derive(&self.automaton, self.derive.order) {
            Ok(derivation) => {
                self.status = format!(
                    "Regular expression: {}",
                    derivation.expression.render(&self.glyphs())
                );
                self.derivation = Some(derivation);
                self.set_view_mode(ViewMode::Regex);
            }
            Err(e) => self.show_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut automaton = Automaton::new();
        automaton.add_state(Position::new(100.0, 100.0));
        automaton.add_state(Position::new(300.0, 100.0));
        automaton.add_transition("q0", "q1", "a").unwrap();
        automaton.add_transition("q1", "q1", "b").unwrap();
        automaton.toggle_final("q1").unwrap();
        App::new(automaton, EditorConfig::default(), DeriveConfig::default())
    }

    fn empty_app() -> App {
        App::new(Automaton::new(), EditorConfig::default(), DeriveConfig::default())
    }

    #[test]
    fn test_app_creation() {
        let app = create_test_app();
        assert_eq!(app.view_mode, ViewMode::Editor);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state_list_state.selected(), Some(0));
        assert_eq!(app.transition_list_state.selected(), Some(0));
        assert!(!app.should_quit);

        let app = empty_app();
        assert_eq!(app.state_list_state.selected(), None);
        assert!(app.get_selected_state().is_none());
    }

    #[test]
    fn test_cell_to_canvas() {
        let editor = EditorConfig::default();
        let area = Rect::new(0, 0, 72, 52);

        // border cells map to nothing
        assert_eq!(cell_to_canvas(area, 0, 10, &editor), None);
        assert_eq!(cell_to_canvas(area, 71, 10, &editor), None);
        assert_eq!(cell_to_canvas(area, 10, 51, &editor), None);

        // 70 x 50 inner cells over a 700 x 500 canvas: 10 units per cell
        assert_eq!(
            cell_to_canvas(area, 1, 1, &editor),
            Some(Position::new(5.0, 5.0))
        );
        assert_eq!(
            cell_to_canvas(area, 70, 50, &editor),
            Some(Position::new(695.0, 495.0))
        );
        assert_eq!(cell_to_canvas(Rect::new(0, 0, 2, 2), 1, 1, &editor), None);
    }

    #[test]
    fn test_place_state_by_click() {
        let mut app = empty_app();
        app.canvas_area = Rect::new(0, 0, 72, 52);

        // clicks outside placing mode do not add states
        app.handle_click(30, 20);
        assert!(app.automaton.is_empty());

        app.begin_add_state();
        assert_eq!(app.input_mode, InputMode::PlacingState);
        assert!(app.status.contains("q0"));
        app.handle_click(30, 20);

        assert_eq!(app.input_mode, InputMode::Normal);
        let state = app.automaton.get_state("q0").unwrap();
        assert_eq!(state.position, Position::new(295.0, 195.0));
        assert!(state.is_initial);
    }

    #[test]
    fn test_click_selects_state() {
        let mut app = create_test_app();
        app.canvas_area = Rect::new(0, 0, 72, 52);
        // (300, 100) lies in cell (30, 10) of the inner area
        app.handle_click(31, 10);
        assert_eq!(app.get_selected_state().unwrap().id, "q1");
    }

    #[test]
    fn test_place_state_at_center() {
        let mut app = empty_app();
        app.begin_add_state();
        let id = app.place_state_at_center();
        assert_eq!(id, "q0");
        assert_eq!(
            app.automaton.get_state("q0").unwrap().position,
            Position::new(350.0, 250.0)
        );
        assert_eq!(app.get_selected_state().unwrap().id, "q0");
    }

    #[test]
    fn test_delete_selected_state_cascades() {
        let mut app = create_test_app();
        app.select_next();
        app.delete_selected_state();

        assert_eq!(app.automaton.len(), 1);
        assert_eq!(app.automaton.transition_count(), 0);
        assert_eq!(app.status, "Deleted q1 and 2 transition(s)");
        assert_eq!(app.selected_state_index, 0);
        assert_eq!(app.transition_list_state.selected(), None);
    }

    #[test]
    fn test_delete_without_states_warns() {
        let mut app = empty_app();
        app.delete_selected_state();
        let message = app.message.clone().unwrap();
        assert_eq!(message.severity, Severity::Warning);
        assert_eq!(message.title(), "Warning");

        app.dismiss_message();
        assert!(app.message.is_none());
    }

    #[test]
    fn test_toggle_final_and_initial() {
        let mut app = create_test_app();
        app.toggle_final_selected();
        assert!(app.automaton.get_state("q0").unwrap().is_final);
        app.toggle_final_selected();
        assert!(!app.automaton.get_state("q0").unwrap().is_final);

        app.select_next();
        app.make_initial_selected();
        assert_eq!(app.automaton.initial_state().unwrap().id, "q1");
        assert!(!app.automaton.get_state("q0").unwrap().is_initial);
    }

    #[test]
    fn test_transition_form() {
        let mut app = create_test_app();
        app.open_transition_form();
        assert_eq!(app.input_mode, InputMode::TransitionForm);
        assert_eq!(app.form.from, "q0");
        assert_eq!(app.form.field, FormField::Symbol);

        app.form_next_field();
        app.form_next_field();
        assert_eq!(app.form.field, FormField::To);
        app.form_cycle_state(true);
        assert_eq!(app.form.to, "q1");
        app.form_cycle_state(true);
        assert_eq!(app.form.to, "q0");

        app.form_previous_field();
        app.form_previous_field();
        assert_eq!(app.form.field, FormField::Symbol);
        app.form_push('c');
        app.form_push('x');
        app.form_backspace();
        app.submit_transition_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.automaton.transition_count(), 3);
        assert_eq!(app.selected_transition_index, 2);
        assert_eq!(app.status, "Added q0 -c-> q0");
    }

    #[test]
    fn test_transition_form_missing_symbol() {
        let mut app = create_test_app();
        app.open_transition_form();
        app.submit_transition_form();

        // the form stays open behind the message
        assert_eq!(app.input_mode, InputMode::TransitionForm);
        let message = app.message.clone().unwrap();
        assert_eq!(message.severity, Severity::Warning);
        assert!(message.text.contains("symbol"));
        assert_eq!(app.automaton.transition_count(), 2);
    }

    #[test]
    fn test_transition_form_unknown_state() {
        let mut app = create_test_app();
        app.open_transition_form();
        app.form.from = "q9".to_string();
        app.form.symbol = "a".to_string();
        app.submit_transition_form();

        let message = app.message.clone().unwrap();
        assert_eq!(message.severity, Severity::Error);
        assert_eq!(message.text, "Unknown state: q9");
    }

    #[test]
    fn test_delete_selected_transition() {
        let mut app = create_test_app();
        app.toggle_focus();
        app.select_next();
        app.delete_selected_transition();

        assert_eq!(app.automaton.transition_count(), 1);
        assert_eq!(app.automaton.transitions()[0].symbol, "a");
        assert_eq!(app.selected_transition_index, 0);

        app.delete_selected_transition();
        app.delete_selected_transition();
        assert!(app.message.is_some());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = create_test_app();
        app.select_previous();
        assert_eq!(app.selected_state_index, 1);
        app.select_next();
        assert_eq!(app.selected_state_index, 0);

        app.toggle_focus();
        assert_eq!(app.focus, Focus::Transitions);
        app.select_next();
        assert_eq!(app.transition_list_state.selected(), Some(1));
        assert_eq!(app.selected_state_index, 0);
    }

    #[test]
    fn test_derive_expression() {
        let mut app = create_test_app();
        app.derive_expression();
        assert_eq!(app.view_mode, ViewMode::Regex);
        assert_eq!(app.status, "Regular expression: ab*");
        assert!(app.derivation.is_some());

        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Editor);
    }

    #[test]
    fn test_derive_without_final_state() {
        let mut app = create_test_app();
        app.select_next();
        app.toggle_final_selected();
        app.derive_expression();

        assert_eq!(app.view_mode, ViewMode::Editor);
        let message = app.message.clone().unwrap();
        assert_eq!(message.text, "No final state defined");
        assert_eq!(message.title(), "Information");
    }

    #[test]
    fn test_view_modes() {
        let mut app = create_test_app();
        app.show_equations();
        assert_eq!(app.view_mode, ViewMode::Equations);
        app.set_view_mode(ViewMode::Help);
        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Equations);
        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Editor);
        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Editor);
    }

    #[test]
    fn test_alternating_views_do_not_grow_stack() {
        let mut app = create_test_app();
        for _ in 0..10 {
            app.set_view_mode(ViewMode::Equations);
            app.set_view_mode(ViewMode::Regex);
        }
        assert_eq!(app.view_stack, vec![ViewMode::Editor, ViewMode::Equations]);

        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Equations);
        app.pop_view_mode();
        assert_eq!(app.view_mode, ViewMode::Editor);
        assert!(app.view_stack.is_empty());
    }

    #[test]
    fn test_flag_changes_clear_derivation() {
        let mut app = create_test_app();
        app.derive_expression();
        assert!(app.derivation.is_some());

        app.toggle_final_selected();
        assert!(app.derivation.is_none());

        app.derive_expression();
        app.select_next();
        app.make_initial_selected();
        assert!(app.derivation.is_none());
    }

    #[test]
    fn test_interrupt() {
        let mut app = create_test_app();
        app.quit();
        assert!(app.should_quit);
        assert!(!app.interrupted);

        app.interrupt();
        assert!(app.interrupted);
    }
}
