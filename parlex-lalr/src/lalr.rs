//! LALR(1) lookaheads by propagation over the LR(0) collection.
//!
//! For every kernel item an LR(1) closure is taken with a placeholder
//! lookahead (`None`). Lookaheads that show up in the goto targets are
//! either generated spontaneously (a real terminal) or propagated (the
//! placeholder), in which case a link from the source kernel item to the
//! target kernel item is recorded. Links are followed until nothing
//! changes. A final LR(1) closure of each state's kernel then yields the
//! lookaheads of its non-kernel items, epsilon rules included.

use crate::grammar::Grammar;
use crate::lr0::{Item, ItemSetCollection};
use crate::sets::FirstFollow;
use crate::symbol::{NonterminalID, Symbol, TerminalID};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Lookahead sets of one state; `None` is the propagation placeholder.
type LookaheadMap<T> = BTreeMap<Item, BTreeSet<Option<T>>>;

/// LR(1) closure over items carrying lookahead sets.
///
/// # Parameters
/// - `seeds`: kernel items with their lookaheads.
///
/// # Returns
/// Every item of the closure with the lookaheads it can be reduced or
/// shifted under.
fn closure1<T: TerminalID, N: NonterminalID>(
    grammar: &Grammar<T, N>,
    sets: &FirstFollow<T, N>,
    seeds: impl IntoIterator<Item = (Item, BTreeSet<Option<T>>)>,
) -> LookaheadMap<T> {
    let mut result: LookaheadMap<T> = BTreeMap::new();
    let mut work = VecDeque::new();
    for (item, las) in seeds {
        result.entry(item).or_default().extend(las);
        work.push_back(item);
    }
    while let Some(item) = work.pop_front() {
        let Some(Symbol::Nonterminal(b)) = item.next_symbol(grammar) else {
            continue;
        };
        let beta = &grammar.rule(item.rule()).rhs()[item.marker() + 1..];
        let (first, nullable) = sets.first_of(beta);
        let mut generated: BTreeSet<Option<T>> = first.into_iter().map(Some).collect();
        if nullable {
            if let Some(inherited) = result.get(&item) {
                generated.extend(inherited.iter().copied());
            }
        }
        for &rule in grammar.rule_ids_of(b) {
            let new_item = Item::new(rule, 0);
            let is_new = !result.contains_key(&new_item);
            let entry = result.entry(new_item).or_default();
            let before = entry.len();
            entry.extend(generated.iter().copied());
            if is_new || entry.len() != before {
                work.push_back(new_item);
            }
        }
    }
    result
}

/// Lookahead sets for every item of every state, computed by propagation.
#[derive(Debug, Clone)]
pub(crate) struct PropagatedLookaheads<T> {
    states: Vec<BTreeMap<Item, BTreeSet<T>>>,
}

impl<T: TerminalID> PropagatedLookaheads<T> {
    pub(crate) fn compute<N: NonterminalID>(
        grammar: &Grammar<T, N>,
        sets: &FirstFollow<T, N>,
        collection: &ItemSetCollection<T, N>,
    ) -> Self {
        let mut kernels: Vec<BTreeMap<Item, BTreeSet<T>>> = collection
            .iter()
            .map(|state| {
                state
                    .kernel(grammar)
                    .map(|item| (item, BTreeSet::new()))
                    .collect()
            })
            .collect();
        let start = Item::new(grammar.accepting_rule().id(), 0);
        if let Some(las) = kernels.first_mut().and_then(|k| k.get_mut(&start)) {
            las.insert(T::END);
        }

        // Spontaneous lookaheads and propagation links.
        let mut links: Vec<((usize, Item), (usize, Item))> = Vec::new();
        for state in collection.iter() {
            let from = state.index();
            for kernel in state.kernel(grammar) {
                let closed = closure1(grammar, sets, [(kernel, BTreeSet::from([None]))]);
                for (item, las) in &closed {
                    let Some(sym) = item.next_symbol(grammar) else {
                        continue;
                    };
                    let Some(to) = collection.goto(from, sym) else {
                        continue;
                    };
                    let advanced = item.advance();
                    for la in las {
                        match la {
                            Some(t) => {
                                if let Some(target) = kernels[to].get_mut(&advanced) {
                                    target.insert(*t);
                                }
                            }
                            None => links.push(((from, kernel), (to, advanced))),
                        }
                    }
                }
            }
        }
        links.sort();
        links.dedup();

        let mut rounds = 0;
        let mut changed = true;
        while changed {
            changed = false;
            rounds += 1;
            for &((from, src), (to, dst)) in &links {
                let incoming: Vec<T> = match kernels[from].get(&src) {
                    Some(las) => las.iter().copied().collect(),
                    None => continue,
                };
                if let Some(target) = kernels[to].get_mut(&dst) {
                    let before = target.len();
                    target.extend(incoming);
                    changed |= target.len() != before;
                }
            }
        }
        log::debug!(
            "lalr: {} propagation links, fixed point after {} rounds",
            links.len(),
            rounds
        );

        let states = kernels
            .into_iter()
            .map(|kernel| {
                let seeds = kernel
                    .into_iter()
                    .map(|(item, las)| (item, las.into_iter().map(Some).collect()));
                closure1(grammar, sets, seeds)
                    .into_iter()
                    .map(|(item, las)| (item, las.into_iter().flatten().collect()))
                    .collect()
            })
            .collect();
        Self { states }
    }

    /// Lookaheads of `item` in `state`.
    pub(crate) fn get(&self, state: usize, item: &Item) -> Option<&BTreeSet<T>> {
        self.states.get(state)?.get(item)
    }
}
