//! Output formatting module
//!
//! This module handles formatting equation systems, derivations and
//! validation reports for the terminal or as JSON.

use crate::Result;
use crate::automaton::AutomatonStats;
use crate::automaton::analyzer::AnalysisReport;
use crate::config::EliminationOrder;
use crate::definition::ValidationReport;
use crate::equations::{Derivation, EquationSystem};
use crate::expr::Glyphs;
use serde_json::json;
use std::path::Path;

/// Output an equation system as JSON
pub fn equations_json(
    w: &mut impl std::io::Write,
    system: &EquationSystem,
    glyphs: &Glyphs,
) -> Result<()> {
    let output = json!({
        "initial": system.initial,
        "has_final": system.has_final,
        "equations": system.equations.iter().map(|eq| {
            json!({
                "state": eq.state,
                "final": eq.is_final,
                "terms": eq.terms,
                "rendered": eq.render(glyphs),
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output an equation system as text, one equation per line
pub fn equations_text(
    w: &mut impl std::io::Write,
    system: &EquationSystem,
    glyphs: &Glyphs,
) -> Result<()> {
    writeln!(w, "Equations ({} states)", system.len())?;
    writeln!(w, "{}", "=".repeat(40))?;
    for line in system.render(glyphs) {
        writeln!(w, "  {}", line)?;
    }
    writeln!(w)?;
    writeln!(
        w,
        "Initial state: {}",
        system.initial.as_deref().unwrap_or("none")
    )?;
    writeln!(
        w,
        "Final state:   {}",
        if system.has_final { "yes" } else { "none" }
    )?;
    Ok(())
}

/// Output a derivation as JSON, steps included
pub fn derivation_json(
    w: &mut impl std::io::Write,
    derivation: &Derivation,
    order: EliminationOrder,
    glyphs: &Glyphs,
) -> Result<()> {
    let output = json!({
        "initial": derivation.initial,
        "order": order,
        "regex": derivation.expression.render(glyphs),
        "expression": derivation.expression,
        "steps": derivation.steps.iter().map(|step| {
            json!({
                "state": step.state,
                "arden": step.applied_arden,
                "equation": step.render(glyphs),
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?;
    Ok(())
}

/// Output a derivation as text
pub fn derivation_text(
    w: &mut impl std::io::Write,
    derivation: &Derivation,
    order: EliminationOrder,
    glyphs: &Glyphs,
    steps: bool,
) -> Result<()> {
    if steps {
        writeln!(w, "Elimination steps ({:?} order)", order)?;
        writeln!(w, "{:-<40}", "")?;
        for (idx, step) in derivation.steps.iter().enumerate() {
            let marker = if step.applied_arden { "  [Arden]" } else { "" };
            writeln!(w, "{:>3}. {}{}", idx + 1, step.render(glyphs), marker)?;
        }
        writeln!(w)?;
    }

    writeln!(w, "Regular expression ({}):", derivation.initial)?;
    writeln!(w, "  {}", derivation.expression.render(glyphs))?;
    Ok(())
}

/// Output a definition validation report.
///
/// `analysis` is only available once the definition built successfully.
pub fn validation_report(
    w: &mut impl std::io::Write,
    file: &Path,
    report: &ValidationReport,
    built: Option<(&AutomatonStats, &AnalysisReport)>,
) -> Result<()> {
    writeln!(w, "📋 Definition Validation Report")?;
    writeln!(w, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(w, "File: {:?}", file)?;
    writeln!(w)?;

    if let Some((stats, analysis)) = built {
        writeln!(w, "Automaton: {}", analysis.kind.display_name())?;
        writeln!(w, "  States:      {}", stats.total_states)?;
        writeln!(w, "  Transitions: {} ({} loops)", stats.total_transitions, stats.loops)?;
        writeln!(
            w,
            "  Initial:     {}",
            stats.initial_state.as_deref().unwrap_or("none")
        )?;
        writeln!(w, "  Final:       {}", stats.final_states)?;
        if !analysis.unreachable.is_empty() {
            writeln!(w, "  Unreachable: {}", analysis.unreachable.join(", "))?;
        }
        if !analysis.dead.is_empty() {
            writeln!(w, "  Dead:        {}", analysis.dead.join(", "))?;
        }
        if analysis.language_empty {
            writeln!(w, "  Accepts no word")?;
        }
        writeln!(w)?;
    }

    if !report.errors.is_empty() {
        writeln!(w, "❌ Errors:")?;
        for error in &report.errors {
            writeln!(w, "   {}", error)?;
        }
        writeln!(w)?;
    }

    if !report.warnings.is_empty() {
        writeln!(w, "⚠️  Warnings:")?;
        for warning in &report.warnings {
            writeln!(w, "   {}", warning)?;
        }
        writeln!(w)?;
    }

    if report.is_valid() {
        writeln!(w, "✅ Definition is valid!")?;
    } else {
        writeln!(
            w,
            "❌ Definition validation failed with {} error(s)",
            report.errors.len()
        )?;
    }
    Ok(())
}
