//! Grammar definition and the lazily computed analyses hanging off it.
//!
//! A [`Grammar`] is assembled with a [`GrammarBuilder`]: productions are
//! declared per nonterminal and each production collects one or more
//! [`Rule`]s. [`GrammarBuilder::build`] validates the result and freezes it.
//!
//! Every derived artifact (FIRST/FOLLOW sets, the LR(0) collection, and
//! the SLR/LALR tables with their conflict reports) is computed on first
//! use and cached inside the grammar, so repeated queries are cheap and the
//! grammar can be shared across threads.

use crate::conflict::ConflictReport;
use crate::error::{GeneratorError, GrammarError};
use crate::lr0::ItemSetCollection;
use crate::parser::Parser;
use crate::sets::FirstFollow;
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use crate::table::{self, Compiled, ParseTable, Strength};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use std::fmt;

/// Index of a rule in its grammar, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleID(pub(crate) usize);

impl From<RuleID> for usize {
    fn from(id: RuleID) -> Self {
        id.0
    }
}

impl fmt::Display for RuleID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// One alternative of a production: `lhs -> rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<T, N> {
    id: RuleID,
    lhs: N,
    rhs: Vec<Symbol<T, N>>,
    accepting: bool,
}

impl<T: TerminalID, N: NonterminalID> Rule<T, N> {
    /// Position of the rule in declaration order; the operand of reduce
    /// actions.
    #[inline]
    pub fn id(&self) -> RuleID {
        self.id
    }

    /// The nonterminal this rule reduces to.
    #[inline]
    pub fn lhs(&self) -> N {
        self.lhs
    }

    /// Right-hand-side symbols; empty for an epsilon rule.
    #[inline]
    pub fn rhs(&self) -> &[Symbol<T, N>] {
        &self.rhs
    }

    /// Number of right-hand-side symbols, i.e. stack entries popped on
    /// reduce.
    #[inline]
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// `true` for an epsilon rule.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// `true` if reducing this rule with lookahead END accepts the input.
    #[inline]
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for Rule<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return f.write_str(" ε");
        }
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// All rules sharing one left-hand nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production<N> {
    lhs: N,
    rules: Vec<RuleID>,
}

impl<N: Copy> Production<N> {
    fn new(lhs: N) -> Self {
        Self {
            lhs,
            rules: Vec::new(),
        }
    }

    /// The nonterminal shared by every rule of the production.
    #[inline]
    pub fn lhs(&self) -> N {
        self.lhs
    }

    /// Rule ids in declaration order.
    #[inline]
    pub fn rules(&self) -> &[RuleID] {
        &self.rules
    }
}

/// Incrementally assembles a [`Grammar`].
#[derive(Debug, Clone)]
pub struct GrammarBuilder<T, N> {
    start: N,
    productions: IndexMap<N, Production<N>>,
    rules: Vec<Rule<T, N>>,
}

impl<T: TerminalID, N: NonterminalID> GrammarBuilder<T, N> {
    /// Creates an empty builder for a grammar rooted at `start`.
    pub fn new(start: N) -> Self {
        Self {
            start,
            productions: IndexMap::new(),
            rules: Vec::new(),
        }
    }

    /// Returns a handle for adding rules to the production of `lhs`.
    ///
    /// Defining the same nonterminal twice yields the same production;
    /// rules keep accumulating on it.
    pub fn define_production(&mut self, lhs: N) -> ProductionBuilder<'_, T, N> {
        self.productions
            .entry(lhs)
            .or_insert_with(|| Production::new(lhs));
        ProductionBuilder { builder: self, lhs }
    }

    fn push_rule(&mut self, lhs: N, rhs: Vec<Symbol<T, N>>, accepting: bool) -> RuleID {
        let id = RuleID(self.rules.len());
        self.rules.push(Rule {
            id,
            lhs,
            rhs,
            accepting,
        });
        self.productions
            .entry(lhs)
            .or_insert_with(|| Production::new(lhs))
            .rules
            .push(id);
        id
    }

    /// Validates the grammar and freezes it.
    ///
    /// # Errors
    /// - [`GrammarError::InconsistentIndex`] if a terminal or nonterminal
    ///   (from `ALL`, the start symbol, `END`, or any rule) does not satisfy
    ///   `ALL[x.into()] == x`.
    /// - [`GrammarError::MissingStartRule`] if the start symbol has no rules.
    /// - [`GrammarError::UndefinedNonterminal`] if a rule refers to a
    ///   nonterminal without a production.
    /// - [`GrammarError::EndInRule`] if a rule contains the end terminal.
    /// - [`GrammarError::RecursiveStart`] if the start symbol appears on a
    ///   right-hand side.
    /// - [`GrammarError::AcceptingOutsideStart`] or
    ///   [`GrammarError::AmbiguousStart`] if the accepting rule is not
    ///   exactly one rule of the start production.
    ///
    /// When no rule is flagged accepting and the start production has a
    /// single rule, that rule becomes the accepting rule.
    pub fn build(mut self) -> Result<Grammar<T, N>, GrammarError> {
        self.check_indices()?;
        let start_name = format!("{:?}", self.start);
        let start_rules = match self.productions.get(&self.start) {
            Some(p) if !p.rules.is_empty() => p.rules.clone(),
            _ => return Err(GrammarError::MissingStartRule { start: start_name }),
        };

        for rule in &self.rules {
            for sym in &rule.rhs {
                match *sym {
                    Symbol::Terminal(t) if t == T::END => {
                        return Err(GrammarError::EndInRule { rule: rule.id });
                    }
                    Symbol::Terminal(_) => {}
                    Symbol::Nonterminal(n) if n == self.start => {
                        return Err(GrammarError::RecursiveStart {
                            rule: rule.id,
                            start: start_name,
                        });
                    }
                    Symbol::Nonterminal(n) => {
                        if !self.productions.contains_key(&n) {
                            return Err(GrammarError::UndefinedNonterminal {
                                rule: rule.id,
                                nonterminal: format!("{:?}", n),
                            });
                        }
                    }
                }
            }
        }

        let flagged: Vec<RuleID> = self
            .rules
            .iter()
            .filter(|r| r.accepting)
            .map(|r| r.id)
            .collect();
        if let Some(&outside) = flagged.iter().find(|id| self.rules[id.0].lhs != self.start) {
            return Err(GrammarError::AcceptingOutsideStart {
                rule: outside,
                start: start_name,
            });
        }
        let accepting = match (flagged.as_slice(), start_rules.as_slice()) {
            ([only], _) => *only,
            ([], [only]) => {
                self.rules[only.0].accepting = true;
                *only
            }
            ([], _) => {
                return Err(GrammarError::AmbiguousStart {
                    start: start_name,
                    found: 0,
                });
            }
            (many, _) => {
                return Err(GrammarError::AmbiguousStart {
                    start: start_name,
                    found: many.len(),
                });
            }
        };

        log::debug!(
            "grammar: {} productions, {} rules, accepting {}",
            self.productions.len(),
            self.rules.len(),
            self.rules[accepting.0]
        );

        Ok(Grammar {
            start: self.start,
            accepting,
            productions: self.productions,
            rules: self.rules,
            first_follow: OnceCell::new(),
            states: OnceCell::new(),
            slr: OnceCell::new(),
            lalr: OnceCell::new(),
        })
    }

    /// Every symbol the tables will be indexed with must round-trip through
    /// its `ALL` list.
    fn check_indices(&self) -> Result<(), GrammarError> {
        T::ALL.iter().try_for_each(|&t| check_index(T::ALL, t))?;
        N::ALL.iter().try_for_each(|&n| check_index(N::ALL, n))?;
        check_index(T::ALL, T::END)?;
        check_index(N::ALL, self.start)?;
        for rule in &self.rules {
            check_index(N::ALL, rule.lhs)?;
            for sym in &rule.rhs {
                match *sym {
                    Symbol::Terminal(t) => check_index(T::ALL, t)?,
                    Symbol::Nonterminal(n) => check_index(N::ALL, n)?,
                }
            }
        }
        Ok(())
    }
}

fn check_index<X>(all: &[X], x: X) -> Result<(), GrammarError>
where
    X: Copy + Eq + fmt::Debug + Into<usize>,
{
    let index: usize = x.into();
    if all.get(index) == Some(&x) {
        Ok(())
    } else {
        Err(GrammarError::InconsistentIndex {
            symbol: format!("{:?}", x),
            index,
            len: all.len(),
        })
    }
}

/// Adds rules to one production of a [`GrammarBuilder`].
pub struct ProductionBuilder<'b, T, N> {
    builder: &'b mut GrammarBuilder<T, N>,
    lhs: N,
}

impl<T: TerminalID, N: NonterminalID> ProductionBuilder<'_, T, N> {
    /// The nonterminal rules are added to.
    #[inline]
    pub fn lhs(&self) -> N {
        self.lhs
    }

    /// Appends `lhs -> rhs`.
    pub fn rule<I>(&mut self, rhs: I) -> RuleID
    where
        I: IntoIterator<Item = Symbol<T, N>>,
    {
        self.builder.push_rule(self.lhs, rhs.into_iter().collect(), false)
    }

    /// Appends the epsilon rule `lhs -> ε`.
    pub fn epsilon(&mut self) -> RuleID {
        self.builder.push_rule(self.lhs, Vec::new(), false)
    }

    /// Appends `lhs -> rhs` and marks it as the accepting rule.
    pub fn accepting<I>(&mut self, rhs: I) -> RuleID
    where
        I: IntoIterator<Item = Symbol<T, N>>,
    {
        self.builder.push_rule(self.lhs, rhs.into_iter().collect(), true)
    }

    /// Chaining form of [`rule`](Self::rule).
    pub fn with<I>(&mut self, rhs: I) -> &mut Self
    where
        I: IntoIterator<Item = Symbol<T, N>>,
    {
        self.rule(rhs);
        self
    }

    /// Chaining form of [`epsilon`](Self::epsilon).
    pub fn with_epsilon(&mut self) -> &mut Self {
        self.epsilon();
        self
    }
}

/// A validated context-free grammar.
pub struct Grammar<T, N> {
    start: N,
    accepting: RuleID,
    productions: IndexMap<N, Production<N>>,
    rules: Vec<Rule<T, N>>,
    first_follow: OnceCell<FirstFollow<T, N>>,
    states: OnceCell<ItemSetCollection<T, N>>,
    slr: OnceCell<Compiled<T, N>>,
    lalr: OnceCell<Compiled<T, N>>,
}

impl<T: TerminalID, N: NonterminalID> Grammar<T, N> {
    /// The start nonterminal.
    #[inline]
    pub fn start(&self) -> N {
        self.start
    }

    /// All rules in declaration order; `rules()[id]` has `id`.
    #[inline]
    pub fn rules(&self) -> &[Rule<T, N>] {
        &self.rules
    }

    /// The rule with `id`.
    ///
    /// # Panics
    /// If `id` was not issued by this grammar's builder.
    #[inline]
    pub fn rule(&self, id: RuleID) -> &Rule<T, N> {
        &self.rules[id.0]
    }

    /// The unique rule whose reduction on END accepts the input.
    #[inline]
    pub fn accepting_rule(&self) -> &Rule<T, N> {
        &self.rules[self.accepting.0]
    }

    /// The production of `lhs`, if one was defined.
    pub fn production(&self, lhs: N) -> Option<&Production<N>> {
        self.productions.get(&lhs)
    }

    /// Productions in the order they were first defined.
    pub fn productions(&self) -> impl Iterator<Item = &Production<N>> + '_ {
        self.productions.values()
    }

    /// Rule ids of the production of `lhs`; empty if undefined.
    pub(crate) fn rule_ids_of(&self, lhs: N) -> &[RuleID] {
        self.productions
            .get(&lhs)
            .map(|p| p.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Nullable, FIRST and FOLLOW sets, computed on first use.
    pub fn first_follow(&self) -> &FirstFollow<T, N> {
        self.first_follow.get_or_init(|| FirstFollow::compute(self))
    }

    /// The canonical collection of LR(0) item sets.
    pub fn states(&self) -> &ItemSetCollection<T, N> {
        self.states.get_or_init(|| ItemSetCollection::build(self))
    }

    fn compiled(&self, strength: Strength) -> &Compiled<T, N> {
        let cell = match strength {
            Strength::Slr => &self.slr,
            Strength::Lalr => &self.lalr,
        };
        cell.get_or_init(|| table::compile(self, strength))
    }

    /// The action/goto table for `strength`, built on first use.
    ///
    /// The table exists even when conflicted; check
    /// [`conflicts`](Self::conflicts) before trusting it.
    pub fn table(&self, strength: Strength) -> &ParseTable<T, N> {
        &self.compiled(strength).table
    }

    /// Conflicts found while building the `strength` table.
    pub fn conflicts(&self, strength: Strength) -> &ConflictReport<T> {
        &self.compiled(strength).conflicts
    }

    /// Returns a parser driven by the `strength` table.
    ///
    /// Shift/reduce conflicts are tolerated (shift wins). Reduce/reduce
    /// conflicts make the table unusable.
    pub fn parser(&self, strength: Strength) -> Result<Parser<'_, T, N>, GeneratorError> {
        let compiled = self.compiled(strength);
        let count = compiled.conflicts.reduce_reduce.len();
        if count > 0 {
            return Err(GeneratorError::Conflicts { strength, count });
        }
        Ok(Parser::new(self, &compiled.table))
    }
}

impl<T: fmt::Debug, N: fmt::Debug> fmt::Debug for Grammar<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("start", &self.start)
            .field("accepting", &self.accepting)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for Grammar<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}: {}", rule.id, rule)?;
        }
        Ok(())
    }
}
