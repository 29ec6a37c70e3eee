//! Regular expressions over arbitrary symbols
//!
//! Symbols are opaque strings, so a transition labelled `ab` is a single
//! letter of the alphabet. The constructors on [`Expr`] simplify as they
//! build (unit and zero laws, flattening, ordered and deduplicated unions),
//! which keeps expressions produced by state elimination readable without a
//! separate normalisation pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod render;

pub use render::Glyphs;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expr {
    /// The empty language
    Empty,
    /// The language containing only the empty word
    Epsilon,
    Symbol(String),
    /// Two or more factors, none of them a concatenation
    Concat(Vec<Expr>),
    /// Two or more distinct alternatives, none of them a union, sorted
    Union(Vec<Expr>),
    Star(Box<Expr>),
}

impl Default for Expr {
    fn default() -> Self {
        Expr::Empty
    }
}

impl Expr {
    pub fn symbol(symbol: impl Into<String>) -> Self {
        Expr::Symbol(symbol.into())
    }

    /// `self · other`
    pub fn concat(self, other: Expr) -> Expr {
        match (self, other) {
            (Expr::Empty, _) | (_, Expr::Empty) => Expr::Empty,
            (Expr::Epsilon, e) | (e, Expr::Epsilon) => e,
            (a, b) => {
                let mut factors = a.into_factors();
                factors.extend(b.into_factors());
                Expr::Concat(factors)
            }
        }
    }

    /// `self + other`
    pub fn union(self, other: Expr) -> Expr {
        let mut alternatives = BTreeSet::new();
        for expr in [self, other] {
            match expr {
                Expr::Empty => {}
                Expr::Union(alts) => alternatives.extend(alts),
                e => {
                    alternatives.insert(e);
                }
            }
        }

        // a starred alternative already contains the empty word
        if alternatives.iter().any(|e| matches!(e, Expr::Star(_))) {
            alternatives.remove(&Expr::Epsilon);
        }

        let mut alternatives: Vec<Expr> = alternatives.into_iter().collect();
        match alternatives.len() {
            0 => Expr::Empty,
            1 => alternatives.remove(0),
            _ => Expr::Union(alternatives),
        }
    }

    /// `self*`
    pub fn star(self) -> Expr {
        match self {
            Expr::Empty | Expr::Epsilon => Expr::Epsilon,
            Expr::Star(inner) => Expr::Star(inner),
            Expr::Union(alts) if alts.contains(&Expr::Epsilon) => alts
                .into_iter()
                .filter(|e| *e != Expr::Epsilon)
                .fold(Expr::Empty, Expr::union)
                .star(),
            e => Expr::Star(Box::new(e)),
        }
    }

    pub fn concat_all(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        exprs.into_iter().fold(Expr::Epsilon, Expr::concat)
    }

    pub fn union_all(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        exprs.into_iter().fold(Expr::Empty, Expr::union)
    }

    fn into_factors(self) -> Vec<Expr> {
        match self {
            Expr::Concat(factors) => factors,
            e => vec![e],
        }
    }

    pub fn is_empty_language(&self) -> bool {
        matches!(self, Expr::Empty)
    }

    /// Whether the empty word belongs to the language
    pub fn is_nullable(&self) -> bool {
        match self {
            Expr::Empty | Expr::Symbol(_) => false,
            Expr::Epsilon | Expr::Star(_) => true,
            Expr::Concat(factors) => factors.iter().all(Expr::is_nullable),
            Expr::Union(alts) => alts.iter().any(Expr::is_nullable),
        }
    }

    /// Brzozowski derivative with respect to one symbol
    pub fn derivative(&self, symbol: &str) -> Expr {
        match self {
            Expr::Empty | Expr::Epsilon => Expr::Empty,
            Expr::Symbol(s) => {
                if s == symbol {
                    Expr::Epsilon
                } else {
                    Expr::Empty
                }
            }
            Expr::Union(alts) => Expr::union_all(alts.iter().map(|a| a.derivative(symbol))),
            Expr::Concat(factors) => match factors.split_first() {
                None => Expr::Empty,
                Some((head, tail)) => {
                    let rest = Expr::concat_all(tail.iter().cloned());
                    let through_head = head.derivative(symbol).concat(rest.clone());
                    if head.is_nullable() {
                        through_head.union(rest.derivative(symbol))
                    } else {
                        through_head
                    }
                }
            },
            Expr::Star(inner) => inner.derivative(symbol).concat(self.clone()),
        }
    }

    /// Whether `word` (a sequence of symbols) belongs to the language
    pub fn matches<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut current = self.clone();
        for symbol in word {
            current = current.derivative(symbol.as_ref());
            if current.is_empty_language() {
                return false;
            }
        }
        current.is_nullable()
    }

    /// Number of nodes in the expression tree
    pub fn size(&self) -> usize {
        match self {
            Expr::Empty | Expr::Epsilon | Expr::Symbol(_) => 1,
            Expr::Concat(children) | Expr::Union(children) => {
                1 + children.iter().map(Expr::size).sum::<usize>()
            }
            Expr::Star(inner) => 1 + inner.size(),
        }
    }
}
