//! TUI UI rendering

use super::app::{App, Focus, FormField, InputMode, ViewMode};
use crate::automaton::layout::{
    EdgeGeometry, final_ring_radius, initial_arrow, layout_transitions,
};
use crate::automaton::{Position, StateClass};
use crate::error::Severity;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};

/// Segments per Bézier curve
const CURVE_SEGMENTS: usize = 16;
const ARROW_LENGTH: f64 = 8.0;

/// Draw the UI based on current app state
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.view_mode {
        ViewMode::Editor => draw_editor(f, app, chunks[1]),
        ViewMode::Equations => draw_equations(f, app, chunks[1]),
        ViewMode::Regex => draw_regex(f, app, chunks[1]),
        ViewMode::Help => draw_help(f, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    if app.input_mode == InputMode::TransitionForm {
        draw_transition_form(f, app);
    }
    if app.message.is_some() {
        draw_message_box(f, app);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.view_mode {
        ViewMode::Editor => "Automaton Editor",
        ViewMode::Equations => "Equation System",
        ViewMode::Regex => "Regular Expression",
        ViewMode::Help => "Help",
    };
    let header = Paragraph::new(format!("automata-re - {}", title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints = match (app.input_mode, app.view_mode) {
        (InputMode::PlacingState, _) => "[click] Place | [Enter] Centre | [Esc] Cancel",
        (InputMode::TransitionForm, _) => {
            "[Tab] Next field | [↑/↓] Pick state | [Enter] Add | [Esc] Cancel"
        }
        (InputMode::Normal, ViewMode::Editor) => {
            "[a] State | [t] Transition | [f] Final | [i] Initial | [x/X] Delete | [e] Equations | [r] Regex | [?] Help | [q] Quit"
        }
        (InputMode::Normal, _) => "[Esc] Back | [e] Equations | [r] Regex | [?] Help | [q] Quit",
    };
    let footer = Paragraph::new(vec![
        Line::from(app.status.as_str()),
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))),
    ])
    .style(Style::default().fg(Color::White))
    .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
    f.render_widget(footer, area);
}

fn state_color(class: StateClass) -> Color {
    match class {
        StateClass::Initial => Color::LightBlue,
        StateClass::InitialFinal => Color::LightGreen,
        StateClass::Final => Color::Green,
        StateClass::Intermediate => Color::Gray,
    }
}

fn draw_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    app.canvas_area = chunks[0];
    draw_canvas(f, app, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_state_list(f, app, side[0]);
    draw_transition_list(f, app, side[1]);
}

fn draw_canvas(f: &mut Frame, app: &App, area: Rect) {
    let editor = app.editor;
    let layouts = layout_transitions(&app.automaton, &editor);
    let states = app.automaton.states();
    let selected_state = app.get_selected_state().map(|s| s.id.clone());
    let selected_transition = match app.focus {
        Focus::Transitions => Some(app.selected_transition_index),
        Focus::States => None,
    };

    // canvas y grows downward, the widget's upward
    let flip = |p: Position| (p.x, editor.canvas_height - p.y);

    let title = if app.input_mode == InputMode::PlacingState {
        format!("Canvas - click to place {}", app.automaton.next_state_id())
    } else {
        "Canvas".to_string()
    };

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([0.0, editor.canvas_width])
        .y_bounds([0.0, editor.canvas_height])
        .paint(|ctx| {
            for layout in &layouts {
                let color = if selected_transition == Some(layout.index) {
                    Color::Yellow
                } else {
                    Color::White
                };
                draw_curve(ctx, &layout.geometry, color, &flip);
                let (x, y) = flip(layout.geometry.label);
                ctx.print(x, y, Span::styled(layout.symbol.clone(), Style::default().fg(color)));
            }

            for state in &states {
                let color = if selected_state.as_deref() == Some(state.id.as_str()) {
                    Color::Yellow
                } else {
                    state_color(state.class())
                };
                let (x, y) = flip(state.position);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: editor.state_radius,
                    color,
                });
                if state.is_final {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: final_ring_radius(&editor),
                        color,
                    });
                }
                if state.is_initial {
                    let (start, end) = initial_arrow(state.position, &editor);
                    let arrow = EdgeGeometry {
                        start,
                        control: start,
                        end,
                        label: start,
                    };
                    draw_segment(ctx, start, end, color, &flip);
                    for (a, b) in arrow.arrow_head(ARROW_LENGTH) {
                        draw_segment(ctx, a, b, color, &flip);
                    }
                }
                ctx.print(
                    x - editor.state_radius * 0.3,
                    y,
                    Span::styled(state.id.clone(), Style::default().fg(color)),
                );
            }
        });
    f.render_widget(canvas, area);
}

fn draw_segment(
    ctx: &mut Context,
    a: Position,
    b: Position,
    color: Color,
    flip: &impl Fn(Position) -> (f64, f64),
) {
    let (x1, y1) = flip(a);
    let (x2, y2) = flip(b);
    ctx.draw(&CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

fn draw_curve(
    ctx: &mut Context,
    geometry: &EdgeGeometry,
    color: Color,
    flip: &impl Fn(Position) -> (f64, f64),
) {
    let points = geometry.sample(CURVE_SEGMENTS);
    for pair in points.windows(2) {
        draw_segment(ctx, pair[0], pair[1], color, flip);
    }
    for (a, b) in geometry.arrow_head(ARROW_LENGTH) {
        draw_segment(ctx, a, b, color, flip);
    }
}

fn list_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_state_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .automaton
        .states()
        .into_iter()
        .map(|state| {
            ListItem::new(state.display_label())
                .style(Style::default().fg(state_color(state.class())))
        })
        .collect();

    let title = format!("States ({})", items.len());
    let list = List::new(items)
        .block(list_block(&title, app.focus == Focus::States))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.state_list_state);
}

fn draw_transition_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .automaton
        .transitions()
        .into_iter()
        .enumerate()
        .map(|(idx, t)| ListItem::new(format!("{}: {}", idx, t.display_label())))
        .collect();

    let title = format!("Transitions ({})", items.len());
    let list = List::new(items)
        .block(list_block(&title, app.focus == Focus::Transitions))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.transition_list_state);
}

fn draw_equations(f: &mut Frame, app: &App, area: Rect) {
    let system = app.equations();
    let glyphs = app.glyphs();

    let mut lines: Vec<Line> = system
        .render(&glyphs)
        .into_iter()
        .map(Line::from)
        .collect();
    if lines.is_empty() {
        lines.push(Line::from("No states defined"));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Initial state: {}",
        system.initial.as_deref().unwrap_or("none")
    )));
    lines.push(Line::from(format!(
        "Final state:   {}",
        if system.has_final { "yes" } else { "none" }
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Equations"))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn draw_regex(f: &mut Frame, app: &App, area: Rect) {
    let Some(derivation) = &app.derivation else {
        let widget = Paragraph::new("Nothing derived yet. Press [r] to derive.")
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
        return;
    };
    let glyphs = app.glyphs();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let expression = Paragraph::new(vec![
        Line::from(format!("Language of {}:", derivation.initial)),
        Line::from(Span::styled(
            derivation.expression.render(&glyphs),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Regular Expression"))
    .wrap(Wrap { trim: false });
    f.render_widget(expression, chunks[0]);

    let steps: Vec<Line> = derivation
        .steps
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            let mut spans = vec![Span::raw(format!("{:>3}. {}", idx + 1, step.render(&glyphs)))];
            if step.applied_arden {
                spans.push(Span::styled(
                    "  [Arden]",
                    Style::default().fg(Color::Magenta),
                ));
            }
            Line::from(spans)
        })
        .collect();
    let steps_widget = Paragraph::new(steps)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Elimination ({:?} order)", app.derive.order)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(steps_widget, chunks[1]);
}

/// Draw help screen
fn draw_help(f: &mut Frame, area: Rect) {
    let heading = |text: &'static str| {
        Line::from(vec![Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };
    let swatch = |color: Color, text: &'static str| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled("●", Style::default().fg(color)),
            Span::raw(text),
        ])
    };

    let help_text = vec![
        heading("Editing"),
        Line::from("  a            - Add a state (click the canvas, or Enter for the centre)"),
        Line::from("  x / Delete   - Delete the selected state and its transitions"),
        Line::from("  f            - Toggle final on the selected state"),
        Line::from("  i            - Make the selected state initial"),
        Line::from("  t            - Add a transition"),
        Line::from("  X            - Delete the selected transition"),
        Line::from(""),
        heading("Navigation"),
        Line::from("  ↑/↓          - Move through the focused list"),
        Line::from("  Tab          - Switch between states and transitions"),
        Line::from("  click        - Select a state on the canvas"),
        Line::from(""),
        heading("Views"),
        Line::from("  e            - Equation system"),
        Line::from("  r            - Derive the regular expression"),
        Line::from("  h or ?       - This help screen"),
        Line::from("  Esc          - Back"),
        Line::from("  q            - Quit"),
        Line::from(""),
        heading("State Colors"),
        swatch(Color::LightBlue, " Initial"),
        swatch(Color::LightGreen, " Initial + Final"),
        swatch(Color::Green, " Final (double ring)"),
        swatch(Color::Gray, " Intermediate"),
        swatch(Color::Yellow, " Selected"),
    ];

    let help_widget = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Keyboard Shortcuts & Legend"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(help_widget, area);
}

/// A `width` x `height` rectangle centred in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_transition_form(f: &mut Frame, app: &App) {
    let area = centered_rect(44, 7, f.area());
    let field = |label: &str, value: &str, which: FormField| {
        let active = app.form.field == which;
        let style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::raw(format!("  {:<8}", label)),
            Span::styled(format!("{}{}", value, cursor), style),
        ])
    };

    let lines = vec![
        field("From:", &app.form.from, FormField::From),
        field("To:", &app.form.to, FormField::To),
        field("Symbol:", &app.form.symbol, FormField::Symbol),
    ];
    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add Transition"),
    );
    f.render_widget(Clear, area);
    f.render_widget(form, area);
}

fn draw_message_box(f: &mut Frame, app: &App) {
    let Some(message) = &app.message else {
        return;
    };
    let color = match message.severity {
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };

    let area = centered_rect(50, 7, f.area());
    let widget = Paragraph::new(vec![
        Line::from(message.text.as_str()),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(message.title()),
    )
    .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::config::{DeriveConfig, EditorConfig};
    use ratatui::{Terminal, backend::TestBackend};

    fn create_test_app() -> App {
        let mut automaton = Automaton::new();
        automaton.add_state(Position::new(100.0, 250.0));
        automaton.add_state(Position::new(400.0, 250.0));
        automaton.add_transition("q0", "q1", "a").unwrap();
        automaton.add_transition("q1", "q1", "b").unwrap();
        automaton.toggle_final("q1").unwrap();
        App::new(automaton, EditorConfig::default(), DeriveConfig::default())
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 10, 40, 10));
        assert_eq!(centered_rect(200, 50, area), area);
    }

    #[test]
    fn test_draw_editor_records_canvas_area() {
        let mut app = create_test_app();
        let screen = render(&mut app);
        assert!(screen.contains("Automaton Editor"));
        assert!(screen.contains("q1 (F)"));
        assert!(screen.contains("0: q0 -a-> q1"));
        assert_eq!(app.canvas_area, Rect::new(0, 3, 70, 24));
    }

    #[test]
    fn test_draw_message_box() {
        let mut app = create_test_app();
        app.delete_selected_transition();
        app.delete_selected_transition();
        app.delete_selected_transition();
        let screen = render(&mut app);
        assert!(screen.contains("Warning"));
        assert!(screen.contains("[Enter] OK"));
    }

    #[test]
    fn test_draw_equations_and_regex() {
        let mut app = create_test_app();
        app.show_equations();
        let screen = render(&mut app);
        assert!(screen.contains("A_q1 = λ ∪ b·A_q1"));

        app.derive_expression();
        let screen = render(&mut app);
        assert!(screen.contains("ab*"));
        assert!(screen.contains("[Arden]"));
    }
}
