//! LR(0) items and the canonical collection of item sets.
//!
//! States are discovered breadth-first from the closure of the accepting
//! rule's initial item. Two candidate states with the same items are the
//! same state, so state numbering depends only on the grammar.

use crate::grammar::{Grammar, RuleID};
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A rule with a marker (the *dot*) showing how much of its right-hand
/// side has been recognized.
///
/// For `E -> E + T` with marker `1`, the item reads `E -> E . + T`.
/// Two items are equal when rule and marker are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    rule: RuleID,
    marker: usize,
}

impl Item {
    /// Creates an item for `rule` with the marker before symbol `marker`.
    #[inline]
    pub fn new(rule: RuleID, marker: usize) -> Self {
        Self { rule, marker }
    }

    /// The rule this item is a position in.
    #[inline]
    pub fn rule(&self) -> RuleID {
        self.rule
    }

    /// Number of right-hand-side symbols already recognized.
    #[inline]
    pub fn marker(&self) -> usize {
        self.marker
    }

    /// The same item with the marker moved one symbol to the right.
    #[inline]
    pub fn advance(&self) -> Self {
        Self {
            rule: self.rule,
            marker: self.marker + 1,
        }
    }

    /// The symbol right after the marker, if any.
    pub fn next_symbol<T: TerminalID, N: NonterminalID>(
        &self,
        grammar: &Grammar<T, N>,
    ) -> Option<Symbol<T, N>> {
        grammar.rule(self.rule).rhs().get(self.marker).copied()
    }

    /// `true` when the marker is at the end of the rule.
    pub fn is_complete<T: TerminalID, N: NonterminalID>(&self, grammar: &Grammar<T, N>) -> bool {
        self.marker >= grammar.rule(self.rule).len()
    }

    /// Kernel items are the accepting rule's items and items whose marker
    /// has moved past the first symbol.
    pub fn is_kernel<T: TerminalID, N: NonterminalID>(&self, grammar: &Grammar<T, N>) -> bool {
        self.marker > 0 || grammar.rule(self.rule).is_accepting()
    }

    /// Renders the item as `Lhs -> a . b`.
    pub fn display<'g, T: TerminalID, N: NonterminalID>(
        &self,
        grammar: &'g Grammar<T, N>,
    ) -> ItemDisplay<'g, T, N> {
        ItemDisplay {
            grammar,
            item: *self,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`Item::display`].
pub struct ItemDisplay<'g, T, N> {
    grammar: &'g Grammar<T, N>,
    item: Item,
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for ItemDisplay<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = self.grammar.rule(self.item.rule);
        write!(f, "{:?} ->", rule.lhs())?;
        for (i, sym) in rule.rhs().iter().enumerate() {
            if i == self.item.marker {
                f.write_str(" .")?;
            }
            write!(f, " {}", sym)?;
        }
        if self.item.marker >= rule.len() {
            f.write_str(" .")?;
        }
        Ok(())
    }
}

/// A state of the LR(0) automaton: a closed set of items.
///
/// Equality and hashing look only at the items.
#[derive(Debug, Clone)]
pub struct ItemSet {
    index: usize,
    items: BTreeSet<Item>,
}

impl ItemSet {
    /// The state number, assigned in discovery order.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Items in `(rule, marker)` order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter()
    }

    #[inline]
    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items carried in by a transition, plus the accepting rule's items.
    pub fn kernel<'a, T: TerminalID, N: NonterminalID>(
        &'a self,
        grammar: &'a Grammar<T, N>,
    ) -> impl Iterator<Item = Item> + 'a {
        self.items
            .iter()
            .copied()
            .filter(move |item| item.is_kernel(grammar))
    }

    /// Items whose marker is at the end of their rule.
    pub fn completed<'a, T: TerminalID, N: NonterminalID>(
        &'a self,
        grammar: &'a Grammar<T, N>,
    ) -> impl Iterator<Item = Item> + 'a {
        self.items
            .iter()
            .copied()
            .filter(move |item| item.is_complete(grammar))
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemSet {}

impl Hash for ItemSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

/// Closes `kernel` under "add `B -> . γ` for every item with the marker
/// before `B`".
///
/// # Parameters
/// - `grammar`: the grammar the items refer to.
/// - `kernel`: the seed items.
///
/// # Returns
/// The seed items plus every item they imply.
pub(crate) fn closure<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    kernel: impl IntoIterator<Item = Item>,
) -> BTreeSet<Item> {
    let mut set = BTreeSet::new();
    let mut work = VecDeque::new();
    for item in kernel {
        if set.insert(item) {
            work.push_back(item);
        }
    }
    while let Some(item) = work.pop_front() {
        if let Some(Symbol::Nonterminal(b)) = item.next_symbol(grammar) {
            for &rule in grammar.rule_ids_of(b) {
                let new_item = Item::new(rule, 0);
                if set.insert(new_item) {
                    work.push_back(new_item);
                }
            }
        }
    }
    set
}

/// Advances every item of `items` whose next symbol is `sym` and closes
/// the result. Empty when no item expects `sym`.
pub(crate) fn goto<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    items: &BTreeSet<Item>,
    sym: Symbol<T, N>,
) -> BTreeSet<Item> {
    let moved = items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(sym))
        .map(Item::advance);
    closure(grammar, moved)
}

/// The canonical collection of LR(0) item sets together with its
/// transition (goto) function.
#[derive(Debug, Clone)]
pub struct ItemSetCollection<T, N> {
    states: Vec<ItemSet>,
    edges: Vec<BTreeMap<Symbol<T, N>, usize>>,
}

impl<T: TerminalID, N: NonterminalID> ItemSetCollection<T, N> {
    /// Builds the collection with a FIFO worklist.
    ///
    /// State 0 is the closure of the accepting rule's initial item. Each
    /// state is expanded on every symbol that follows a marker in it, in
    /// symbol order, and new states are numbered as they are discovered.
    pub(crate) fn build(grammar: &Grammar<T, N>) -> Self {
        let start = closure(grammar, [Item::new(grammar.accepting_rule().id(), 0)]);
        let mut registry: IndexSet<BTreeSet<Item>> = IndexSet::new();
        registry.insert(start);
        let mut edges = Vec::new();
        let mut next = 0;
        while let Some(items) = registry.get_index(next).cloned() {
            let symbols: BTreeSet<Symbol<T, N>> = items
                .iter()
                .filter_map(|item| item.next_symbol(grammar))
                .collect();
            let mut out = BTreeMap::new();
            for sym in symbols {
                let target = goto(grammar, &items, sym);
                let (index, _) = registry.insert_full(target);
                out.insert(sym, index);
            }
            edges.push(out);
            next += 1;
        }
        let states: Vec<ItemSet> = registry
            .into_iter()
            .enumerate()
            .map(|(index, items)| ItemSet { index, items })
            .collect();
        log::debug!(
            "lr(0): {} states, {} transitions",
            states.len(),
            edges.iter().map(BTreeMap::len).sum::<usize>()
        );
        Self { states, edges }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The state numbered `index`.
    #[inline]
    pub fn state(&self, index: usize) -> Option<&ItemSet> {
        self.states.get(index)
    }

    /// States in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemSet> {
        self.states.iter()
    }

    /// The state reached from `state` on `sym`, if any.
    pub fn goto(&self, state: usize, sym: Symbol<T, N>) -> Option<usize> {
        self.edges.get(state)?.get(&sym).copied()
    }

    /// All outgoing transitions of `state`, in symbol order.
    pub fn transitions(&self, state: usize) -> impl Iterator<Item = (Symbol<T, N>, usize)> + '_ {
        self.edges
            .get(state)
            .into_iter()
            .flat_map(|edges| edges.iter().map(|(&sym, &target)| (sym, target)))
    }

    /// Human-readable dump of every state and its transitions.
    pub fn display<'a>(&'a self, grammar: &'a Grammar<T, N>) -> CollectionDisplay<'a, T, N> {
        CollectionDisplay {
            collection: self,
            grammar,
        }
    }
}

/// [`fmt::Display`] adapter returned by [`ItemSetCollection::display`].
pub struct CollectionDisplay<'a, T, N> {
    collection: &'a ItemSetCollection<T, N>,
    grammar: &'a Grammar<T, N>,
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for CollectionDisplay<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in self.collection.iter() {
            writeln!(f, "state {}:", state.index())?;
            for item in state.items() {
                writeln!(f, "  {}", item.display(self.grammar))?;
            }
            for (sym, target) in self.collection.transitions(state.index()) {
                writeln!(f, "  on {} goto {}", sym, target)?;
            }
        }
        Ok(())
    }
}
