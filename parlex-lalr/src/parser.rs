//! Table-driven shift-reduce parser.
//!
//! The parser keeps a stack of `(state, node)` pairs, with a node-less
//! bottom entry for the start state, and consults the action table for the
//! current lookahead:
//!
//! - **Shift**: wrap the token in a leaf, push it with the target state,
//!   and advance.
//! - **Reduce**: pop one entry per right-hand-side symbol (none for an
//!   epsilon rule), build an interior node from the popped nodes in order,
//!   and push it with the goto state of the exposed state.
//! - **Accept**: hand back the tree.
//! - **Error**: record the error and stop.
//!
//! Errors are returned as data. On failure the nodes left on the stack are
//! returned as fragments.

use crate::ast::AstNode;
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::symbol::{NonterminalID, TerminalID};
use crate::table::{Action, ParseTable};
use crate::token::Token;
use std::iter::Fuse;

/// Counters collected during one [`Parser::parse`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Tokens pulled from the input, not counting a synthesized END.
    pub tokens: usize,
    /// Shift actions taken.
    pub shifts: usize,
    /// Reduce actions taken; Accept is not counted.
    pub reductions: usize,
}

/// Outcome of [`Parser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<T: TerminalID, N: NonterminalID> {
    /// The syntax tree, present iff the input was accepted.
    pub tree: Option<AstNode<T, N>>,
    /// Nodes left on the stack when parsing stopped early.
    pub fragments: Vec<AstNode<T, N>>,
    /// Errors in the order they were detected.
    pub errors: Vec<ParseError<T, N>>,
    pub stats: ParserStats,
}

impl<T: TerminalID, N: NonterminalID> ParseResult<T, N> {
    /// `true` if the input was accepted without errors.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.tree.is_some() && self.errors.is_empty()
    }

    /// Converts into a `Result`, keeping only the tree or the errors.
    pub fn into_result(self) -> Result<AstNode<T, N>, Vec<ParseError<T, N>>> {
        match self.tree {
            Some(tree) if self.errors.is_empty() => Ok(tree),
            _ => Err(self.errors),
        }
    }
}

/// A parser bound to a grammar and one of its tables.
///
/// Obtained from [`Grammar::parser`]. Parsers hold no per-parse state and
/// can be reused and shared.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g, T, N> {
    grammar: &'g Grammar<T, N>,
    table: &'g ParseTable<T, N>,
}

impl<'g, T: TerminalID, N: NonterminalID> Parser<'g, T, N> {
    pub(crate) fn new(grammar: &'g Grammar<T, N>, table: &'g ParseTable<T, N>) -> Self {
        Self { grammar, table }
    }

    /// The grammar this parser was built from.
    #[inline]
    pub fn grammar(&self) -> &'g Grammar<T, N> {
        self.grammar
    }

    /// The table driving this parser.
    #[inline]
    pub fn table(&self) -> &'g ParseTable<T, N> {
        self.table
    }

    /// Parses `tokens`, synthesizing END if the input does not end with it.
    ///
    /// Tokens after an END are never read. Parsing stops at the first
    /// error.
    pub fn parse<I>(&self, tokens: I) -> ParseResult<T, N>
    where
        I: IntoIterator<Item = Token<T>>,
    {
        let mut input = tokens.into_iter().fuse();
        let mut stats = ParserStats::default();
        let mut errors = Vec::new();
        let mut stack: Vec<(usize, Option<AstNode<T, N>>)> =
            vec![(self.table.start_state(), None)];
        let mut lookahead = next_token(&mut input, &mut stats);

        loop {
            if log::log_enabled!(log::Level::Trace) {
                dump_state(&stack, &lookahead);
            }
            let state = match stack.last() {
                Some(&(state, _)) => state,
                None => break,
            };
            match self.table.action(state, lookahead.terminal) {
                Some(Action::Shift(next)) => {
                    log::trace!("Shift {}", next);
                    let token = if lookahead.is_end() {
                        std::mem::replace(&mut lookahead, Token::end())
                    } else {
                        std::mem::replace(&mut lookahead, next_token(&mut input, &mut stats))
                    };
                    stack.push((next, Some(AstNode::leaf(token))));
                    stats.shifts += 1;
                }

                Some(Action::Reduce(rule_id)) => {
                    let rule = self.grammar.rule(rule_id);
                    log::trace!("Reduce {} ({})", rule_id, rule);
                    let Some(at) = stack.len().checked_sub(rule.len()).filter(|&at| at > 0) else {
                        errors.push(ParseError::StackUnderflow {
                            state,
                            rule: rule_id,
                        });
                        break;
                    };
                    let children = stack.split_off(at).into_iter().filter_map(|(_, n)| n);
                    let node = AstNode::interior(rule.lhs(), children.collect());
                    let exposed = stack.last().map_or(self.table.start_state(), |(s, _)| *s);
                    match self.table.goto(exposed, rule.lhs()) {
                        Some(next) => {
                            stack.push((next, Some(node)));
                            stats.reductions += 1;
                        }
                        None => {
                            errors.push(ParseError::MissingGoto {
                                state: exposed,
                                nonterminal: rule.lhs(),
                            });
                            stack.push((exposed, Some(node)));
                            break;
                        }
                    }
                }

                Some(Action::Accept) => {
                    log::trace!("Accept");
                    let rule = self.grammar.accepting_rule();
                    let mut nodes: Vec<AstNode<T, N>> =
                        stack.drain(1..).filter_map(|(_, n)| n).collect();
                    let tree = if rule.len() == 1 && nodes.len() == 1 {
                        nodes.pop()
                    } else {
                        Some(AstNode::interior(rule.lhs(), nodes))
                    };
                    log::debug!("parse accepted: {:?}", stats);
                    return ParseResult {
                        tree,
                        fragments: Vec::new(),
                        errors,
                        stats,
                    };
                }

                None => {
                    log::debug!(
                        "parse error in state {} on {}",
                        state,
                        lookahead.describe()
                    );
                    errors.push(ParseError::UnexpectedToken {
                        state,
                        expected: self.table.expected(state),
                        token: lookahead,
                    });
                    break;
                }
            }
        }

        let fragments = stack.into_iter().filter_map(|(_, n)| n).collect();
        ParseResult {
            tree: None,
            fragments,
            errors,
            stats,
        }
    }
}

fn next_token<T: TerminalID, I>(input: &mut Fuse<I>, stats: &mut ParserStats) -> Token<T>
where
    I: Iterator<Item = Token<T>>,
{
    match input.next() {
        Some(token) => {
            stats.tokens += 1;
            token
        }
        None => Token::end(),
    }
}

fn dump_state<T: TerminalID, N: NonterminalID>(
    stack: &[(usize, Option<AstNode<T, N>>)],
    incoming: &Token<T>,
) {
    let mut output = String::new();
    for (state, node) in stack {
        match node {
            Some(node) => output.push_str(&format!("<{}> {}  ", state, node.symbol())),
            None => output.push_str(&format!("<{}>  ", state)),
        }
    }
    output.push_str(&format!("<-  {:?}", incoming.terminal));
    log::trace!("{}", output);
}
