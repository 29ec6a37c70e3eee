//! Automaton definition files
//!
//! A definition lists states and transitions in TOML or JSON. Files are only
//! ever read; the editor has no save.

use crate::automaton::{Automaton, MAX_STATE_NUMBER, Position};
use crate::config::EditorConfig;
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::LazyLock;

static STATE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^q(0|[1-9]\d*)$").expect("state id pattern"));

/// Parsed definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutomatonDefinition {
    #[serde(default)]
    pub states: Vec<StateDef>,
    #[serde(default)]
    pub transitions: Vec<TransitionDef>,

    /// File the definition was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub id: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    #[serde(default)]
    pub initial: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: String,
    pub to: String,
    pub symbol: String,
}

/// Problems found in a definition. Errors prevent building the automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl AutomatonDefinition {
    /// Reads a definition, as TOML for `.toml` files and JSON otherwise
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let parsed = if is_toml {
            toml::from_str::<AutomatonDefinition>(&contents).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<AutomatonDefinition>(&contents).map_err(|e| e.to_string())
        };
        let mut definition = parsed.map_err(|message| Error::definition(&path, message))?;

        tracing::info!(
            "Loaded definition from {:?}: {} states, {} transitions",
            path,
            definition.states.len(),
            definition.transitions.len()
        );
        definition.source = Some(path);
        Ok(definition)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut ids = HashSet::new();
        for state in &self.states {
            match state_number(&state.id) {
                Some(Ok(_)) => {}
                Some(Err(())) => report
                    .errors
                    .push(format!("State id '{}' is out of range", state.id)),
                None => report
                    .errors
                    .push(format!("Invalid state id '{}': expected q<number>", state.id)),
            }
            if !ids.insert(state.id.as_str()) {
                report.errors.push(format!("Duplicate state '{}'", state.id));
            }
        }

        let initial: Vec<&str> = self
            .states
            .iter()
            .filter(|s| s.initial)
            .map(|s| s.id.as_str())
            .collect();
        match initial.len() {
            0 if !self.states.is_empty() => report.warnings.push("No initial state".to_string()),
            0 | 1 => {}
            _ => report
                .errors
                .push(format!("Multiple initial states: {}", initial.join(", "))),
        }
        if !self.states.is_empty() && !self.states.iter().any(|s| s.is_final) {
            report.warnings.push("No final state".to_string());
        }

        let mut seen = HashSet::new();
        for (idx, t) in self.transitions.iter().enumerate() {
            for endpoint in [&t.from, &t.to] {
                if !ids.contains(endpoint.as_str()) {
                    report
                        .errors
                        .push(format!("Transition {}: unknown state '{}'", idx, endpoint));
                }
            }
            if t.symbol.trim().is_empty() {
                report.errors.push(format!("Transition {}: empty symbol", idx));
            }
            if !seen.insert(t) {
                report.warnings.push(format!(
                    "Transition {}: duplicate of {} -{}-> {}",
                    idx, t.from, t.symbol, t.to
                ));
            }
        }

        report
    }

    /// Builds the automaton, failing on any validation error.
    ///
    /// States without a position are laid out in rows across the canvas.
    pub fn build(&self, editor: &EditorConfig) -> Result<Automaton> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(self.error(report.errors.join("; ")));
        }
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        let mut automaton = Automaton::new();
        for (idx, state) in self.states.iter().enumerate() {
            let number = state_number(&state.id)
                .and_then(|n| n.ok())
                .ok_or_else(|| self.error(format!("Invalid state id '{}'", state.id)))?;
            let fallback = auto_position(idx, editor);
            let position = Position::new(
                state.x.unwrap_or(fallback.x),
                state.y.unwrap_or(fallback.y),
            );
            automaton.insert_state(number, position)?;

            if state.initial {
                automaton.set_initial(&state.id)?;
            }
            automaton.set_final(&state.id, state.is_final)?;
        }

        for t in &self.transitions {
            automaton.add_transition(&t.from, &t.to, &t.symbol)?;
        }

        tracing::debug!("Built automaton: {:?}", automaton.stats());
        Ok(automaton)
    }

    /// Reads, validates and builds in one go
    pub fn load(path: impl Into<PathBuf>, editor: &EditorConfig) -> Result<Automaton> {
        Self::from_file(path)?.build(editor)
    }

    fn error(&self, message: String) -> Error {
        let file = self
            .source
            .clone()
            .unwrap_or_else(|| PathBuf::from("<inline>"));
        Error::Definition { file, message }
    }
}

/// Sequence number of a `q<n>` id without leading zeros.
///
/// `None` when the id is malformed, `Some(Err(()))` when the number does not
/// stay below [`MAX_STATE_NUMBER`].
fn state_number(id: &str) -> Option<std::result::Result<usize, ()>> {
    let captures = STATE_ID.captures(id)?;
    Some(
        captures[1]
            .parse::<usize>()
            .ok()
            .filter(|n| *n < MAX_STATE_NUMBER)
            .ok_or(()),
    )
}

fn auto_position(idx: usize, editor: &EditorConfig) -> Position {
    let r = editor.state_radius;
    let step = 4.0 * r;
    let per_row = (((editor.canvas_width - 2.0 * r) / step).floor() as usize).max(1);
    Position::new(
        2.0 * r + (idx % per_row) as f64 * step,
        3.0 * r + (idx / per_row) as f64 * step,
    )
}
