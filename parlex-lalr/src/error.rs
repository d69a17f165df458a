//! Source locations and the error types reported by grammar validation,
//! table generation, and parsing.
//!
//! # Examples
//!
//! ```rust
//! # use parlex_lalr::{Position, Span};
//! let a = Span::new(Position::new(1, 1), Position::new(1, 4));
//! let b = Span::new(Position::new(1, 6), Position::new(2, 2));
//! let ab = a.merge(&b);
//! assert_eq!(ab.start, Position::new(1, 1));
//! assert_eq!(ab.end, Position::new(2, 2));
//! assert_eq!(ab.to_string(), "1:1-2:2");
//! ```

use crate::grammar::RuleID;
use crate::symbol::{NonterminalID, TerminalID};
use crate::table::Strength;
use crate::token::Token;
use std::fmt;
use thiserror::Error;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Starting position (inclusive).
    pub start: Position,
    /// Ending position (exclusive by convention).
    pub end: Position,
}

impl Span {
    /// Creates a new `Span` from `start` to `end`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    #[inline]
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// `true` if the span covers no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Problems found while validating a grammar in
/// [`GrammarBuilder::build`](crate::GrammarBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A symbol's `usize` index does not lead back to it through `ALL`.
    #[error("symbol {symbol} has index {index}, which does not map back to it in ALL (len {len})")]
    InconsistentIndex {
        symbol: String,
        index: usize,
        len: usize,
    },

    /// The start symbol has no production or its production has no rules.
    #[error("start symbol {start} has no rules")]
    MissingStartRule { start: String },

    /// A rule mentions a nonterminal that was never defined.
    #[error("rule {rule} refers to {nonterminal}, which has no production")]
    UndefinedNonterminal { rule: RuleID, nonterminal: String },

    /// A rule mentions the end-of-input terminal.
    #[error("rule {rule} contains the end-of-input terminal")]
    EndInRule { rule: RuleID },

    /// A rule mentions the start symbol on its right-hand side.
    #[error("rule {rule} refers to the start symbol {start}")]
    RecursiveStart { rule: RuleID, start: String },

    /// A rule outside the start production was flagged accepting.
    #[error("accepting rule {rule} does not belong to start symbol {start}")]
    AcceptingOutsideStart { rule: RuleID, start: String },

    /// The accepting rule cannot be determined.
    #[error("start symbol {start} needs exactly one accepting rule, found {found}")]
    AmbiguousStart { start: String, found: usize },
}

/// Failures while turning a grammar into a usable parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The table for `strength` has reduce/reduce conflicts, which have no
    /// silent resolution.
    #[error("{strength} table has {count} reduce/reduce conflict(s)")]
    Conflicts { strength: Strength, count: usize },
}

/// An error recorded while parsing a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError<T: TerminalID, N: NonterminalID> {
    /// The action table has no entry for `(state, token)`.
    #[error("unexpected {} in state {state}, expected one of {expected:?}", .token.describe())]
    UnexpectedToken {
        state: usize,
        token: Token<T>,
        expected: Vec<T>,
    },

    /// A reduction produced a nonterminal with no goto entry.
    #[error("no goto for {nonterminal:?} in state {state}")]
    MissingGoto { state: usize, nonterminal: N },

    /// A reduction asked for more stack entries than exist.
    #[error("stack underflow reducing rule {rule} in state {state}")]
    StackUnderflow { state: usize, rule: RuleID },
}

impl<T: TerminalID, N: NonterminalID> ParseError<T, N> {
    /// The parser state the error was detected in.
    pub fn state(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { state, .. }
            | ParseError::MissingGoto { state, .. }
            | ParseError::StackUnderflow { state, .. } => *state,
        }
    }

    /// Source span of the offending token, if it carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { token, .. } => token.span,
            _ => None,
        }
    }
}
