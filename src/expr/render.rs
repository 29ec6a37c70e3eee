//! Textual rendering of expressions
//!
//! Union is written `+`, concatenation by juxtaposition and the Kleene star
//! as a postfix `*`. Parentheses appear only where precedence requires them.

use super::Expr;
use crate::config::DeriveConfig;
use std::fmt;

/// Glyphs used for the two constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub epsilon: String,
    pub empty: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            epsilon: "λ".to_string(),
            empty: "∅".to_string(),
        }
    }
}

impl From<&DeriveConfig> for Glyphs {
    fn from(config: &DeriveConfig) -> Self {
        Self {
            epsilon: config.epsilon.clone(),
            empty: config.empty.clone(),
        }
    }
}

const UNION: u8 = 0;
const CONCAT: u8 = 1;
const ATOM: u8 = 2;

impl Expr {
    pub fn render(&self, glyphs: &Glyphs) -> String {
        let mut out = String::new();
        self.write_to(&mut out, glyphs);
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Union(_) => UNION,
            Expr::Concat(_) => CONCAT,
            _ => ATOM,
        }
    }

    fn is_long_symbol(&self) -> bool {
        matches!(self, Expr::Symbol(s) if s.chars().count() > 1)
    }

    fn write_to(&self, out: &mut String, glyphs: &Glyphs) {
        match self {
            Expr::Empty => out.push_str(&glyphs.empty),
            Expr::Epsilon => out.push_str(&glyphs.epsilon),
            Expr::Symbol(s) => out.push_str(s),
            Expr::Union(alts) => {
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" + ");
                    }
                    alt.write_to(out, glyphs);
                }
            }
            Expr::Concat(factors) => {
                // juxtaposing multi-character symbols would be ambiguous
                let separator = if factors.iter().any(Expr::is_long_symbol) {
                    "·"
                } else {
                    ""
                };
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        out.push_str(separator);
                    }
                    factor.write_wrapped(out, glyphs, factor.precedence() < CONCAT);
                }
            }
            Expr::Star(inner) => {
                let wrap = inner.precedence() < ATOM || inner.is_long_symbol();
                inner.write_wrapped(out, glyphs, wrap);
                out.push('*');
            }
        }
    }

    fn write_wrapped(&self, out: &mut String, glyphs: &Glyphs, wrap: bool) {
        if wrap {
            out.push('(');
            self.write_to(out, glyphs);
            out.push(')');
        } else {
            self.write_to(out, glyphs);
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Glyphs::default()))
    }
}
