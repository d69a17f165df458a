//! Action/goto tables.
//!
//! SLR(1) and LALR(1) tables are built by the same routine over the same
//! LR(0) collection. They differ only in where reduce lookaheads come from,
//! which is abstracted by [`Lookaheads`]: FOLLOW of the rule's left-hand
//! side for SLR, propagated per-state lookaheads for LALR.
//!
//! Cells filled by a shift keep the shift when a reduce also applies. The
//! dropped reduce is reported as a shift/reduce conflict by
//! [`conflict::scan`](crate::conflict).

use crate::conflict::{self, ConflictReport};
use crate::grammar::{Grammar, RuleID};
use crate::lalr::PropagatedLookaheads;
use crate::lr0::{Item, ItemSetCollection};
use crate::sets::FirstFollow;
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

/// Which lookahead strategy a table is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strength {
    /// Reduce on FOLLOW of the rule's left-hand side.
    Slr,
    /// Reduce on lookaheads propagated per state.
    Lalr,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Slr => "SLR(1)",
            Strength::Lalr => "LALR(1)",
        })
    }
}

/// A parser action. Missing table entries mean "error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Push the lookahead and go to the state.
    Shift(usize),
    /// Pop the rule's right-hand side and push its left-hand side.
    Reduce(RuleID),
    /// The input is a sentence of the grammar.
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(rule) => write!(f, "{}", rule),
            Action::Accept => f.write_str("acc"),
        }
    }
}

/// Source of the terminals a completed item may be reduced on.
pub(crate) trait Lookaheads<T> {
    fn lookaheads(&self, state: usize, item: &Item) -> Option<&BTreeSet<T>>;
}

/// SLR(1): FOLLOW of the rule's left-hand side, independent of the state.
pub(crate) struct FollowLookaheads<'g, T, N> {
    grammar: &'g Grammar<T, N>,
    sets: &'g FirstFollow<T, N>,
}

impl<T: TerminalID, N: NonterminalID> Lookaheads<T> for FollowLookaheads<'_, T, N> {
    fn lookaheads(&self, _state: usize, item: &Item) -> Option<&BTreeSet<T>> {
        Some(self.sets.follow(self.grammar.rule(item.rule()).lhs()))
    }
}

/// LALR(1): lookaheads propagated through the LR(0) automaton.
impl<T: TerminalID> Lookaheads<T> for PropagatedLookaheads<T> {
    fn lookaheads(&self, state: usize, item: &Item) -> Option<&BTreeSet<T>> {
        self.get(state, item)
    }
}

/// Action and goto tables indexed by state and symbol index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable<T, N> {
    strength: Strength,
    action: Vec<Vec<Option<Action>>>,
    goto: Vec<Vec<Option<usize>>>,
    _marker: PhantomData<fn() -> (T, N)>,
}

impl<T: TerminalID, N: NonterminalID> ParseTable<T, N> {
    /// The lookahead strategy the table was built with.
    #[inline]
    pub fn strength(&self) -> Strength {
        self.strength
    }

    /// The state parsing starts in.
    #[inline]
    pub fn start_state(&self) -> usize {
        0
    }

    /// Number of rows, one per LR(0) state.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    /// `None` means error.
    #[inline]
    pub fn action(&self, state: usize, terminal: T) -> Option<Action> {
        self.action.get(state)?.get(terminal.index()).copied().flatten()
    }

    /// State to enter after reducing to `nonterminal` in `state`.
    #[inline]
    pub fn goto(&self, state: usize, nonterminal: N) -> Option<usize> {
        self.goto.get(state)?.get(nonterminal.index()).copied().flatten()
    }

    /// Terminals with a non-error action in `state`, in `T::ALL` order.
    pub fn expected(&self, state: usize) -> Vec<T> {
        T::ALL
            .iter()
            .copied()
            .filter(|&t| self.action(state, t).is_some())
            .collect()
    }
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for ParseTable<T, N> {
    /// One row per state; terminal columns first, then goto columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "state")?;
        for t in T::ALL {
            write!(f, "|{:>8}", format!("{:?}", t))?;
        }
        for n in N::ALL {
            write!(f, "|{:>8}", format!("{:?}", n))?;
        }
        writeln!(f)?;
        for state in 0..self.state_count() {
            write!(f, "{:>6}", state)?;
            for &t in T::ALL {
                let cell = self.action(state, t).map(|a| a.to_string());
                write!(f, "|{:>8}", cell.unwrap_or_default())?;
            }
            for &n in N::ALL {
                let cell = self.goto(state, n).map(|s| s.to_string());
                write!(f, "|{:>8}", cell.unwrap_or_default())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A table together with the conflicts found while building it.
#[derive(Debug, Clone)]
pub(crate) struct Compiled<T, N> {
    pub(crate) table: ParseTable<T, N>,
    pub(crate) conflicts: ConflictReport<T>,
}

/// Builds the table and conflict report for `strength`.
pub(crate) fn compile<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    strength: Strength,
) -> Compiled<T, N> {
    let sets = grammar.first_follow();
    let states = grammar.states();
    let compiled = match strength {
        Strength::Slr => {
            let lookaheads = FollowLookaheads { grammar, sets };
            build(grammar, states, &lookaheads, strength)
        }
        Strength::Lalr => {
            let lookaheads = PropagatedLookaheads::compute(grammar, sets, states);
            build(grammar, states, &lookaheads, strength)
        }
    };
    let report = &compiled.conflicts;
    if !report.shift_reduce.is_empty() {
        log::warn!(
            "{}: {} shift/reduce conflict(s) resolved as shift",
            strength,
            report.shift_reduce.len()
        );
    }
    if !report.reduce_reduce.is_empty() {
        log::warn!(
            "{}: {} reduce/reduce conflict(s)",
            strength,
            report.reduce_reduce.len()
        );
    }
    compiled
}

fn build<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    states: &ItemSetCollection<T, N>,
    lookaheads: &dyn Lookaheads<T>,
    strength: Strength,
) -> Compiled<T, N> {
    let table = build_table(grammar, states, lookaheads, strength);
    let conflicts = conflict::scan(grammar, states, lookaheads, strength);
    log::debug!(
        "{}: {} states, {} s/r and {} r/r conflicts",
        strength,
        table.state_count(),
        conflicts.shift_reduce.len(),
        conflicts.reduce_reduce.len()
    );
    Compiled { table, conflicts }
}

/// Fills the action and goto tables.
///
/// # Parameters
/// - `states`: the LR(0) collection with its transitions.
/// - `lookaheads`: terminals each completed item is reduced on.
///
/// # Returns
/// A table where shifts take precedence over reduces, and among
/// competing reduces the rule declared first is kept.
fn build_table<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    states: &ItemSetCollection<T, N>,
    lookaheads: &dyn Lookaheads<T>,
    strength: Strength,
) -> ParseTable<T, N> {
    let mut action = vec![vec![None; T::ALL.len()]; states.len()];
    let mut goto = vec![vec![None; N::ALL.len()]; states.len()];

    for state in states.iter() {
        let s = state.index();
        for (sym, target) in states.transitions(s) {
            match sym {
                Symbol::Terminal(t) => action[s][t.index()] = Some(Action::Shift(target)),
                Symbol::Nonterminal(n) => goto[s][n.index()] = Some(target),
            }
        }
        for item in state.completed(grammar) {
            let rule = grammar.rule(item.rule());
            if rule.is_accepting() {
                let cell = &mut action[s][T::END.index()];
                if !matches!(cell, Some(Action::Shift(_))) {
                    *cell = Some(Action::Accept);
                }
                continue;
            }
            let Some(las) = lookaheads.lookaheads(s, &item) else {
                continue;
            };
            for &t in las {
                let cell = &mut action[s][t.index()];
                match *cell {
                    None => *cell = Some(Action::Reduce(rule.id())),
                    Some(Action::Shift(_)) => {
                        log::trace!("state {}: shift on {:?} over {}", s, t, rule.id());
                    }
                    Some(_) => {}
                }
            }
        }
    }

    ParseTable {
        strength,
        action,
        goto,
        _marker: PhantomData,
    }
}
