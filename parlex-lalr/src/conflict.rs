//! Shift/reduce and reduce/reduce conflict detection.
//!
//! A shift/reduce conflict is a completed item whose reduce lookaheads
//! include a terminal the same state shifts on. The table keeps the shift,
//! so these are informational.
//!
//! A reduce/reduce conflict is a state holding two completed items that
//! may both apply. Under SLR any state with more than one completed item
//! qualifies. Under LALR two completed items must share a lookahead, the
//! accepting item counting as reducing on END. Either way the table is
//! unusable.

use crate::grammar::Grammar;
use crate::lr0::{Item, ItemSetCollection};
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use crate::table::{Lookaheads, Strength};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A reduce that lost to a shift on `terminal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftReduceConflict<T> {
    /// First state the conflict was seen in.
    pub state: usize,
    /// The completed item whose reduce was dropped.
    pub item: Item,
    /// The terminal both shifted and reduced on.
    pub terminal: T,
}

/// Overlapping reduces in one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceReduceConflict<T> {
    /// First state the conflict was seen in.
    pub state: usize,
    /// Completed non-kernel (epsilon) items of the state, by marker.
    pub nonkernel: Vec<Item>,
    /// Completed kernel items of the state, by marker.
    pub kernel: Vec<Item>,
    /// Terminals on which two or more items reduce. May be empty under
    /// SLR, where completed items alone make the conflict.
    pub lookaheads: BTreeSet<T>,
}

/// All conflicts of one table.
///
/// Shift/reduce conflicts are deduplicated by `(item, terminal)`, and
/// reduce/reduce conflicts by their item lists, keeping the first state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport<T> {
    /// Informational; the table keeps the shift.
    pub shift_reduce: Vec<ShiftReduceConflict<T>>,
    /// Critical; the table refuses to drive a parser.
    pub reduce_reduce: Vec<ReduceReduceConflict<T>>,
}

impl<T: TerminalID> ConflictReport<T> {
    /// `true` if neither kind of conflict was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shift_reduce.is_empty() && self.reduce_reduce.is_empty()
    }

    /// `true` if there is any reduce/reduce conflict.
    #[inline]
    pub fn is_critical(&self) -> bool {
        !self.reduce_reduce.is_empty()
    }

    /// Renders the report with item names resolved against `grammar`.
    pub fn display<'a, N: NonterminalID>(
        &'a self,
        grammar: &'a Grammar<T, N>,
    ) -> ReportDisplay<'a, T, N> {
        ReportDisplay {
            report: self,
            grammar,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`ConflictReport::display`].
pub struct ReportDisplay<'a, T, N> {
    report: &'a ConflictReport<T>,
    grammar: &'a Grammar<T, N>,
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for ReportDisplay<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.grammar;
        if !self.report.shift_reduce.is_empty() {
            writeln!(f, "Shift/Reduce conflicts (would favor shift):")?;
            for c in &self.report.shift_reduce {
                writeln!(
                    f,
                    "  [state {}] {} on {:?}",
                    c.state,
                    c.item.display(g),
                    c.terminal
                )?;
            }
        }
        if !self.report.reduce_reduce.is_empty() {
            writeln!(f, "Reduce/Reduce conflicts (critical):")?;
            for (i, c) in self.report.reduce_reduce.iter().enumerate() {
                writeln!(f, "=> {} [state {}] on {:?}", i, c.state, c.lookaheads)?;
                writeln!(f, "  Nonkernel:")?;
                for item in &c.nonkernel {
                    writeln!(f, "    {}", item.display(g))?;
                }
                writeln!(f, "  Kernel:")?;
                for item in &c.kernel {
                    writeln!(f, "    {}", item.display(g))?;
                }
            }
        }
        if self.report.is_empty() {
            writeln!(f, "no conflicts")?;
        }
        Ok(())
    }
}

/// Reduce lookaheads of a completed item; END for the accepting item.
fn reduce_set<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    lookaheads: &dyn Lookaheads<T>,
    state: usize,
    item: &Item,
) -> BTreeSet<T> {
    if grammar.rule(item.rule()).is_accepting() {
        return BTreeSet::from([T::END]);
    }
    lookaheads
        .lookaheads(state, item)
        .cloned()
        .unwrap_or_default()
}

/// Scans every state of `states` for conflicts under `lookaheads`.
pub(crate) fn scan<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    states: &ItemSetCollection<T, N>,
    lookaheads: &dyn Lookaheads<T>,
    strength: Strength,
) -> ConflictReport<T> {
    let mut shift_reduce = Vec::new();
    let mut reduce_reduce = Vec::new();
    let mut seen_sr: HashSet<(Item, T)> = HashSet::new();
    let mut seen_rr: HashSet<(Vec<Item>, Vec<Item>)> = HashSet::new();

    for state in states.iter() {
        let s = state.index();
        let completed: Vec<(Item, BTreeSet<T>)> = state
            .completed(grammar)
            .map(|item| (item, reduce_set(grammar, lookaheads, s, &item)))
            .collect();

        for (item, las) in &completed {
            if grammar.rule(item.rule()).is_accepting() {
                continue;
            }
            for &t in las {
                if states.goto(s, Symbol::Terminal(t)).is_some() && seen_sr.insert((*item, t)) {
                    shift_reduce.push(ShiftReduceConflict {
                        state: s,
                        item: *item,
                        terminal: t,
                    });
                }
            }
        }

        let mut overlap = BTreeSet::new();
        for (i, (_, a)) in completed.iter().enumerate() {
            for (_, b) in &completed[i + 1..] {
                overlap.extend(a.intersection(b).copied());
            }
        }
        let conflicting = match strength {
            Strength::Slr => completed.len() > 1,
            Strength::Lalr => !overlap.is_empty(),
        };
        if !conflicting {
            continue;
        }
        let (mut kernel, mut nonkernel): (Vec<Item>, Vec<Item>) = completed
            .iter()
            .map(|(item, _)| *item)
            .partition(|item| item.is_kernel(grammar));
        kernel.sort_by_key(|item| (item.marker(), item.rule()));
        nonkernel.sort_by_key(|item| (item.marker(), item.rule()));
        if seen_rr.insert((nonkernel.clone(), kernel.clone())) {
            reduce_reduce.push(ReduceReduceConflict {
                state: s,
                nonkernel,
                kernel,
                lookaheads: overlap,
            });
        }
    }

    ConflictReport {
        shift_reduce,
        reduce_reduce,
    }
}
