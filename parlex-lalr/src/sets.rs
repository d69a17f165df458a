//! Nullable, FIRST, and FOLLOW sets.
//!
//! All three are computed by fixed-point iteration over the grammar rules.
//! FOLLOW of the start symbol is seeded with the end-of-input terminal.

use crate::grammar::Grammar;
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

/// Nullability plus FIRST and FOLLOW sets of every nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstFollow<T, N> {
    nullable: Vec<bool>,
    first: Vec<BTreeSet<T>>,
    follow: Vec<BTreeSet<T>>,
    _marker: PhantomData<fn() -> N>,
}

impl<T: TerminalID, N: NonterminalID> FirstFollow<T, N> {
    pub(crate) fn compute(grammar: &Grammar<T, N>) -> Self {
        let (nullable, first) = first_sets(grammar);
        let follow = follow_sets(grammar, &nullable, &first);
        log::debug!("first/follow: {} nonterminals", N::ALL.len());
        Self {
            nullable,
            first,
            follow,
            _marker: PhantomData,
        }
    }

    /// `true` if `n` derives the empty string.
    #[inline]
    pub fn is_nullable(&self, n: N) -> bool {
        self.nullable[n.index()]
    }

    #[inline]
    pub fn first(&self, n: N) -> &BTreeSet<T> {
        &self.first[n.index()]
    }

    #[inline]
    pub fn follow(&self, n: N) -> &BTreeSet<T> {
        &self.follow[n.index()]
    }

    /// FIRST of a symbol string, plus whether the whole string is nullable.
    pub fn first_of(&self, symbols: &[Symbol<T, N>]) -> (BTreeSet<T>, bool) {
        let mut out = BTreeSet::new();
        let nullable = extend_first_of(&self.nullable, &self.first, symbols, &mut out);
        (out, nullable)
    }
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for FirstFollow<T, N> {
    /// One line per nonterminal: `N nullable? FIRST={..} FOLLOW={..}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &n in N::ALL {
            writeln!(
                f,
                "{:?}{} FIRST={:?} FOLLOW={:?}",
                n,
                if self.is_nullable(n) { " (nullable)" } else { "" },
                self.first(n),
                self.follow(n)
            )?;
        }
        Ok(())
    }
}

/// Adds FIRST(`symbols`) to `out` and returns whether `symbols` is nullable.
fn extend_first_of<T: TerminalID, N: NonterminalID>(
    nullable: &[bool],
    first: &[BTreeSet<T>],
    symbols: &[Symbol<T, N>],
    out: &mut BTreeSet<T>,
) -> bool {
    for sym in symbols {
        match *sym {
            Symbol::Terminal(t) => {
                out.insert(t);
                return false;
            }
            Symbol::Nonterminal(n) => {
                out.extend(first[n.index()].iter().copied());
                if !nullable[n.index()] {
                    return false;
                }
            }
        }
    }
    true
}

/// Computes nullability and FIRST sets, indexed by nonterminal.
///
/// # Returns
/// `(nullable, first)`, each with one entry per `N::ALL` element.
fn first_sets<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
) -> (Vec<bool>, Vec<BTreeSet<T>>) {
    let mut nullable = vec![false; N::ALL.len()];
    let mut first = vec![BTreeSet::new(); N::ALL.len()];
    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules() {
            let lhs = rule.lhs().index();
            let mut acc = BTreeSet::new();
            let rhs_nullable = extend_first_of(&nullable, &first, rule.rhs(), &mut acc);
            let before = first[lhs].len();
            first[lhs].extend(acc);
            if first[lhs].len() != before {
                changed = true;
            }
            if rhs_nullable && !nullable[lhs] {
                nullable[lhs] = true;
                changed = true;
            }
        }
    }
    (nullable, first)
}

/// Computes FOLLOW sets, indexed by nonterminal.
fn follow_sets<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    nullable: &[bool],
    first: &[BTreeSet<T>],
) -> Vec<BTreeSet<T>> {
    let mut follow = vec![BTreeSet::new(); N::ALL.len()];
    follow[grammar.start().index()].insert(T::END);
    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules() {
            let lhs = rule.lhs().index();
            let rhs = rule.rhs();
            for (i, sym) in rhs.iter().enumerate() {
                let Symbol::Nonterminal(b) = *sym else {
                    continue;
                };
                let mut acc = BTreeSet::new();
                if extend_first_of(nullable, first, &rhs[i + 1..], &mut acc) {
                    acc.extend(follow[lhs].iter().copied());
                }
                let target = &mut follow[b.index()];
                let before = target.len();
                target.extend(acc);
                if target.len() != before {
                    changed = true;
                }
            }
        }
    }
    follow
}
