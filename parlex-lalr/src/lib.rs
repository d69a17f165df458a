//! SLR(1) and LALR(1) parse tables for context-free grammars, with
//! conflict reporting and a table-driven shift-reduce parser that builds a
//! syntax tree.
//!
//! # Example
//!
//! ```rust
//! use parlex_lalr::{GrammarBuilder, NonterminalID, Strength, Symbol, TerminalID, Token};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum Tok { Num, Plus, End }
//!
//! impl From<Tok> for usize {
//!     fn from(t: Tok) -> usize { t as usize }
//! }
//!
//! impl TerminalID for Tok {
//!     const ALL: &'static [Self] = &[Tok::Num, Tok::Plus, Tok::End];
//!     const END: Self = Tok::End;
//! }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum Nt { Start, Sum }
//!
//! impl From<Nt> for usize {
//!     fn from(n: Nt) -> usize { n as usize }
//! }
//!
//! impl NonterminalID for Nt {
//!     const ALL: &'static [Self] = &[Nt::Start, Nt::Sum];
//! }
//!
//! let mut builder: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
//! builder
//!     .define_production(Nt::Start)
//!     .accepting([Symbol::Nonterminal(Nt::Sum)]);
//! builder
//!     .define_production(Nt::Sum)
//!     .with([
//!         Symbol::Nonterminal(Nt::Sum),
//!         Symbol::Terminal(Tok::Plus),
//!         Symbol::Terminal(Tok::Num),
//!     ])
//!     .with([Symbol::Terminal(Tok::Num)]);
//! let grammar = builder.build().unwrap();
//! assert!(grammar.conflicts(Strength::Lalr).is_empty());
//!
//! let parser = grammar.parser(Strength::Lalr).unwrap();
//! let result = parser.parse([
//!     Token::new(Tok::Num, "1"),
//!     Token::new(Tok::Plus, "+"),
//!     Token::new(Tok::Num, "2"),
//! ]);
//! let tree = result.into_result().unwrap();
//! assert_eq!(tree.to_string(), "Sum => Sum Plus Num");
//! assert_eq!(tree.printed().to_string(), "1 + 2");
//! ```

mod ast;
mod conflict;
mod error;
mod grammar;
mod lalr;
mod lr0;
mod parser;
mod sets;
mod symbol;
mod table;
mod token;

#[cfg(test)]
mod test_grammars;

pub use crate::ast::{AstNode, Flatten, Printed, SearchAll};
pub use crate::conflict::{ConflictReport, ReduceReduceConflict, ReportDisplay, ShiftReduceConflict};
pub use crate::error::{GeneratorError, GrammarError, ParseError, Position, Span};
pub use crate::grammar::{Grammar, GrammarBuilder, Production, ProductionBuilder, Rule, RuleID};
pub use crate::lr0::{CollectionDisplay, Item, ItemDisplay, ItemSet, ItemSetCollection};
pub use crate::parser::{ParseResult, Parser, ParserStats};
pub use crate::sets::FirstFollow;
pub use crate::symbol::{NonterminalID, Symbol, TerminalID};
pub use crate::table::{Action, ParseTable, Strength};
pub use crate::token::Token;
