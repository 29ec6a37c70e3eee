//! TUI module - interactive automaton editor

use crate::automaton::Automaton;
use crate::{Config, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::time::Duration;

pub mod app;
pub mod ui;

use app::{App, InputMode, ViewMode};

/// Run the TUI application
pub fn run(automaton: Automaton, config: &Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode().map_err(crate::Error::tui)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(crate::Error::tui)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(crate::Error::tui)?;

    // Create app and run
    let app = App::new(automaton, config.editor, config.derive.clone());
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode().map_err(crate::Error::tui)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(crate::Error::tui)?;
    terminal.show_cursor().map_err(crate::Error::tui)?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, &mut app))
            .map_err(crate::Error::tui)?;

        if event::poll(Duration::from_millis(100)).map_err(crate::Error::tui)? {
            match event::read().map_err(crate::Error::tui)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            tracing::info!("Editor closed with {} states", app.automaton.len());
            if app.interrupted {
                return Err(crate::Error::UserQuit);
            }
            return Ok(());
        }
    }
}

/// Dispatch a key press to the app
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.interrupt();
        return;
    }

    // a message box swallows everything until dismissed
    if app.message.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_message();
        }
        return;
    }

    match app.input_mode {
        InputMode::TransitionForm => match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => app.submit_transition_form(),
            KeyCode::Tab => app.form_next_field(),
            KeyCode::BackTab => app.form_previous_field(),
            KeyCode::Backspace => app.form_backspace(),
            KeyCode::Up => app.form_cycle_state(false),
            KeyCode::Down => app.form_cycle_state(true),
            KeyCode::Char(c) => app.form_push(c),
            _ => {}
        },
        InputMode::PlacingState => match key.code {
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Enter => {
                app.place_state_at_center();
            }
            _ => {}
        },
        InputMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.set_view_mode(ViewMode::Help),
        KeyCode::Char('e') => app.show_equations(),
        KeyCode::Char('r') => app.derive_expression(),
        KeyCode::Esc => app.pop_view_mode(),
        _ if app.view_mode != ViewMode::Editor => {}
        KeyCode::Char('a') => app.begin_add_state(),
        KeyCode::Char('x') | KeyCode::Delete => app.delete_selected_state(),
        KeyCode::Char('f') => app.toggle_final_selected(),
        KeyCode::Char('i') => app.make_initial_selected(),
        KeyCode::Char('t') => app.open_transition_form(),
        KeyCode::Char('X') => app.delete_selected_transition(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        _ => {}
    }
}

/// Dispatch a mouse event to the app; only left clicks matter
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.message.is_some() || app.view_mode != ViewMode::Editor {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.handle_click(mouse.column, mouse.row);
    }
}
