//! Grammar symbols.
//!
//! Terminals and nonterminals are supplied by the user as small `Copy`
//! types, normally fieldless enums, implementing [`TerminalID`] and
//! [`NonterminalID`]. Each ID maps to a dense `usize` index via `Into<usize>`,
//! which is how the generated tables are laid out.

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Identifies a terminal symbol (token kind).
///
/// `ALL` lists every terminal exactly once and `END` is the distinguished
/// end-of-input marker, which must be part of `ALL`. The `usize` index of
/// every terminal must be smaller than `ALL.len()`.
pub trait TerminalID: Copy + Debug + Eq + Ord + Hash + Into<usize> + 'static {
    /// Every terminal of the grammar.
    const ALL: &'static [Self];
    /// The end-of-input marker.
    const END: Self;

    /// Dense table index of this terminal.
    #[inline]
    fn index(self) -> usize {
        self.into()
    }
}

/// Identifies a nonterminal symbol.
///
/// As with [`TerminalID`], the `usize` index of every nonterminal must be
/// smaller than `ALL.len()`.
pub trait NonterminalID: Copy + Debug + Eq + Ord + Hash + Into<usize> + 'static {
    /// Every nonterminal of the grammar.
    const ALL: &'static [Self];

    /// Dense table index of this nonterminal.
    #[inline]
    fn index(self) -> usize {
        self.into()
    }
}

/// A grammar symbol: either a terminal or a nonterminal.
///
/// Terminals order before nonterminals, so sets of symbols iterate in a
/// deterministic order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol<T, N> {
    /// A token kind.
    Terminal(T),
    /// A grammar variable with a production.
    Nonterminal(N),
}

impl<T: TerminalID, N: NonterminalID> Symbol<T, N> {
    /// `true` for [`Symbol::Terminal`].
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// `true` for [`Symbol::Nonterminal`].
    #[inline]
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }

    /// The terminal, if this is one.
    #[inline]
    pub fn terminal(&self) -> Option<T> {
        match *self {
            Symbol::Terminal(t) => Some(t),
            Symbol::Nonterminal(_) => None,
        }
    }

    /// The nonterminal, if this is one.
    #[inline]
    pub fn nonterminal(&self) -> Option<N> {
        match *self {
            Symbol::Terminal(_) => None,
            Symbol::Nonterminal(n) => Some(n),
        }
    }
}

impl<T: TerminalID, N: NonterminalID> Display for Symbol<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{:?}", t),
            Symbol::Nonterminal(n) => write!(f, "{:?}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_grammars::expr::{Nt, Tok};
    use std::collections::BTreeSet;

    #[test]
    fn symbol_accessors() {
        let t: Symbol<Tok, Nt> = Symbol::Terminal(Tok::Star);
        let n: Symbol<Tok, Nt> = Symbol::Nonterminal(Nt::Term);
        assert!(t.is_terminal());
        assert!(!t.is_nonterminal());
        assert_eq!(t.terminal(), Some(Tok::Star));
        assert_eq!(t.nonterminal(), None);
        assert!(n.is_nonterminal());
        assert_eq!(n.nonterminal(), Some(Nt::Term));
        assert_eq!(n.terminal(), None);
    }

    #[test]
    fn symbol_display_uses_names() {
        let t: Symbol<Tok, Nt> = Symbol::Terminal(Tok::Ident);
        let n: Symbol<Tok, Nt> = Symbol::Nonterminal(Nt::Factor);
        assert_eq!(t.to_string(), "Ident");
        assert_eq!(n.to_string(), "Factor");
    }

    #[test]
    fn terminals_sort_before_nonterminals() {
        let set: BTreeSet<Symbol<Tok, Nt>> = [
            Symbol::Nonterminal(Nt::Expr),
            Symbol::Terminal(Tok::RParen),
            Symbol::Nonterminal(Nt::Start),
            Symbol::Terminal(Tok::Ident),
        ]
        .into_iter()
        .collect();
        let order: Vec<_> = set.into_iter().collect();
        assert_eq!(
            order,
            vec![
                Symbol::Terminal(Tok::Ident),
                Symbol::Terminal(Tok::RParen),
                Symbol::Nonterminal(Nt::Start),
                Symbol::Nonterminal(Nt::Expr),
            ]
        );
    }

    #[test]
    fn indices_are_dense() {
        for (i, t) in Tok::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
        for (i, n) in Nt::ALL.iter().enumerate() {
            assert_eq!(n.index(), i);
        }
    }
}
