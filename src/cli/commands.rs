//! CLI command implementations
//!
//! This module contains the implementation for each CLI command. Every
//! command except `edit` writes to the given writer so it can be tested
//! without a terminal.

use crate::automaton::Automaton;
use crate::definition::AutomatonDefinition;
use crate::expr::Glyphs;
use crate::{Config, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

fn load_automaton(file: &Path, config: &Config) -> Result<Automaton> {
    tracing::info!("Loading automaton from {:?}", file);
    AutomatonDefinition::load(file, &config.editor)
}

/// Splits a word into symbols.
///
/// Symbols are separated by whitespace or commas; a word without separators
/// is read one character per symbol.
pub fn split_word(word: &str) -> Vec<String> {
    let is_separator = |c: char| c.is_whitespace() || c == ',';
    if word.contains(is_separator) {
        word.split(is_separator)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        word.chars().map(String::from).collect()
    }
}

/// Edit command implementation
pub mod edit {
    use super::*;

    /// Execute the edit command
    pub fn execute(load: Option<PathBuf>, config: &Config) -> Result<()> {
        let automaton = match load {
            Some(file) => load_automaton(&file, config)?,
            None => Automaton::new(),
        };

        tracing::info!("Launching editor with {} states", automaton.len());
        match crate::tui::run(automaton, config) {
            Err(e) if e.is_user_quit() => {
                tracing::info!("Editor interrupted");
                Ok(())
            }
            other => other,
        }
    }
}

/// Equations command implementation
pub mod equations {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::equations::EquationSystem;

    /// Execute the equations command
    pub fn execute(
        w: &mut impl Write,
        file: &Path,
        output: OutputFormat,
        config: &Config,
    ) -> Result<()> {
        let automaton = load_automaton(file, config)?;
        let system = EquationSystem::from_automaton(&automaton);
        let glyphs = Glyphs::from(&config.derive);

        match output {
            OutputFormat::Text => crate::cli::output::equations_text(w, &system, &glyphs),
            OutputFormat::Json => crate::cli::output::equations_json(w, &system, &glyphs),
        }
    }
}

/// Derive command implementation
pub mod derive {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::config::EliminationOrder;

    /// Execute the derive command
    pub fn execute(
        w: &mut impl Write,
        file: &Path,
        order: EliminationOrder,
        output: OutputFormat,
        steps: bool,
        config: &Config,
    ) -> Result<()> {
        let automaton = load_automaton(file, config)?;
        let derivation = crate::equations::derive(&automaton, order)?;
        let glyphs = Glyphs::from(&config.derive);

        tracing::info!(
            "Derived expression of size {} after {} steps",
            derivation.expression.size(),
            derivation.steps.len()
        );

        match output {
            OutputFormat::Text => {
                crate::cli::output::derivation_text(w, &derivation, order, &glyphs, steps)
            }
            OutputFormat::Json => crate::cli::output::derivation_json(w, &derivation, order, &glyphs),
        }
    }
}

/// Check command implementation
pub mod check {
    use super::*;

    /// Execute the check command
    pub fn execute(w: &mut impl Write, file: &Path, word: &str, config: &Config) -> Result<()> {
        let automaton = load_automaton(file, config)?;
        let symbols = split_word(word);
        let glyphs = Glyphs::from(&config.derive);
        tracing::debug!("Checking word {:?}", symbols);

        let by_automaton = automaton.accepts(&symbols);
        writeln!(w, "Word:       [{}]", symbols.join(", "))?;
        writeln!(w, "Automaton:  {}", verdict(by_automaton))?;

        match crate::equations::derive(&automaton, config.derive.order) {
            Ok(derivation) => {
                let by_expression = derivation.expression.matches(&symbols);
                writeln!(
                    w,
                    "Expression: {} ({})",
                    verdict(by_expression),
                    derivation.expression.render(&glyphs)
                )?;
                crate::ensure!(
                    by_automaton == by_expression,
                    "Automaton and expression disagree on {:?}",
                    symbols
                );
            }
            Err(e) => writeln!(w, "Expression: unavailable ({})", e)?,
        }
        Ok(())
    }

    fn verdict(accepted: bool) -> &'static str {
        if accepted { "accepted" } else { "rejected" }
    }
}

/// Dot command implementation
pub mod dot {
    use super::*;

    /// Execute the dot command
    pub fn execute(w: &mut impl Write, file: &Path, config: &Config) -> Result<()> {
        let automaton = load_automaton(file, config)?;
        write!(w, "{}", automaton.to_dot())?;
        Ok(())
    }
}

/// Validate command implementation
pub mod validate {
    use super::*;
    use crate::automaton::analyzer::analyze;

    /// Execute the validate command
    pub fn execute(w: &mut impl Write, file: &Path, config: &Config) -> Result<()> {
        tracing::info!("Validating definition: {:?}", file);

        let definition = match AutomatonDefinition::from_file(file) {
            Ok(d) => d,
            Err(e) => {
                writeln!(w, "❌ Failed to load definition: {}", e)?;
                return Err(e);
            }
        };

        let report = definition.validate();
        if !report.is_valid() {
            crate::cli::output::validation_report(w, file, &report, None)?;
            crate::bail!("Definition validation failed");
        }

        let automaton = definition.build(&config.editor)?;
        let stats = automaton.stats();
        let analysis = analyze(&automaton);
        crate::cli::output::validation_report(w, file, &report, Some((&stats, &analysis)))
    }
}
