//! Syntax tree produced by the parser.
//!
//! Leaves wrap the shifted tokens. Interior nodes carry the left-hand
//! nonterminal of the reduced rule and one child per right-hand-side
//! symbol; epsilon reductions give interior nodes without children.
//!
//! Traversals (`search_all`, `flatten`), equality, and drop use explicit
//! stacks, so deep trees such as long left-recursive lists do not exhaust
//! the call stack. `Clone` and `Debug` are derived and recurse per level;
//! avoid them on very deep trees.

use crate::symbol::{NonterminalID, Symbol, TerminalID};
use crate::token::Token;
use std::fmt;

#[derive(Debug, Clone)]
pub struct AstNode<T, N> {
    symbol: Symbol<T, N>,
    token: Option<Token<T>>,
    children: Vec<AstNode<T, N>>,
}

impl<T: TerminalID, N: NonterminalID> AstNode<T, N> {
    /// A leaf for a shifted token.
    pub fn leaf(token: Token<T>) -> Self {
        Self {
            symbol: Symbol::Terminal(token.terminal),
            token: Some(token),
            children: Vec::new(),
        }
    }

    /// An interior node for a reduction to `lhs`.
    pub fn interior(lhs: N, children: Vec<Self>) -> Self {
        Self {
            symbol: Symbol::Nonterminal(lhs),
            token: None,
            children,
        }
    }

    /// The terminal of a leaf, or the reduced nonterminal.
    #[inline]
    pub fn symbol(&self) -> Symbol<T, N> {
        self.symbol
    }

    /// The token of a leaf; `None` for interior nodes.
    #[inline]
    pub fn token(&self) -> Option<&Token<T>> {
        self.token.as_ref()
    }

    /// Children in right-hand-side order.
    #[inline]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// `true` for token leaves and childless epsilon nodes.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First node in pre-order whose symbol is `symbol`.
    ///
    /// The node itself is checked first; below it, the first `start`
    /// children are skipped.
    pub fn search(&self, symbol: Symbol<T, N>, start: usize) -> Option<&Self> {
        self.search_all(symbol, start).next()
    }

    /// Like [`search`](Self::search), matching any of `symbols`.
    pub fn search_any(&self, symbols: &[Symbol<T, N>], start: usize) -> Option<&Self> {
        SearchAll::new(self, symbols.to_vec(), start).next()
    }

    /// All nodes whose symbol is `symbol`, in pre-order.
    ///
    /// Matches are not searched further, so a match nested inside another
    /// match is not yielded.
    pub fn search_all(&self, symbol: Symbol<T, N>, start: usize) -> SearchAll<'_, T, N> {
        SearchAll::new(self, vec![symbol], start)
    }

    /// Like [`search_all`](Self::search_all), matching any of `symbols`.
    pub fn search_all_any(&self, symbols: &[Symbol<T, N>], start: usize) -> SearchAll<'_, T, N> {
        SearchAll::new(self, symbols.to_vec(), start)
    }

    /// Leaf tokens from left to right.
    pub fn flatten(&self) -> Flatten<'_, T, N> {
        Flatten { stack: vec![self] }
    }

    /// Leaf lexemes joined with single spaces.
    pub fn printed(&self) -> Printed<'_, T, N> {
        Printed { node: self }
    }
}

impl<T: PartialEq, N: PartialEq> PartialEq for AstNode<T, N> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.symbol != b.symbol || a.token != b.token || a.children.len() != b.children.len()
            {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl<T: Eq, N: Eq> Eq for AstNode<T, N> {}

impl<T, N> Drop for AstNode<T, N> {
    /// Frees descendants from an explicit stack; every node reaches its own
    /// drop with no children left.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for AstNode<T, N> {
    /// `Lhs => A b C` for nodes with children, the bare symbol otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if !self.children.is_empty() {
            f.write_str(" =>")?;
            for child in &self.children {
                write!(f, " {}", child.symbol)?;
            }
        }
        Ok(())
    }
}

/// Iterator returned by [`AstNode::search_all`].
#[derive(Debug, Clone)]
pub struct SearchAll<'a, T, N> {
    symbols: Vec<Symbol<T, N>>,
    stack: Vec<&'a AstNode<T, N>>,
}

impl<'a, T: TerminalID, N: NonterminalID> SearchAll<'a, T, N> {
    fn new(root: &'a AstNode<T, N>, symbols: Vec<Symbol<T, N>>, start: usize) -> Self {
        let stack = if symbols.contains(&root.symbol) {
            vec![root]
        } else {
            root.children.iter().skip(start).rev().collect()
        };
        Self { symbols, stack }
    }
}

impl<'a, T: TerminalID, N: NonterminalID> Iterator for SearchAll<'a, T, N> {
    type Item = &'a AstNode<T, N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.symbols.contains(&node.symbol) {
                return Some(node);
            }
            self.stack.extend(node.children.iter().rev());
        }
        None
    }
}

/// Iterator returned by [`AstNode::flatten`].
#[derive(Debug, Clone)]
pub struct Flatten<'a, T, N> {
    stack: Vec<&'a AstNode<T, N>>,
}

impl<'a, T: TerminalID, N: NonterminalID> Iterator for Flatten<'a, T, N> {
    type Item = &'a Token<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Some(token) = &node.token {
                return Some(token);
            }
            self.stack.extend(node.children.iter().rev());
        }
        None
    }
}

/// [`fmt::Display`] adapter returned by [`AstNode::printed`].
pub struct Printed<'a, T, N> {
    node: &'a AstNode<T, N>,
}

impl<T: TerminalID, N: NonterminalID> fmt::Display for Printed<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.node.flatten().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_grammars::expr::{Nt, Tok};
    use crate::test_grammars::{N, T};

    type Node = AstNode<Tok, Nt>;

    fn leaf(t: Tok, text: &str) -> Node {
        AstNode::leaf(Token::new(t, text))
    }

    // Expr => Term
    //   Term => Term Star Factor
    //     Term => Factor
    //       Factor => Ident(a)
    //     Star
    //     Factor => LParen Expr RParen
    //       Expr => Term
    //         Term => Factor
    //           Factor => Ident(b)
    fn sample() -> Node {
        let a = AstNode::interior(
            Nt::Term,
            vec![AstNode::interior(Nt::Factor, vec![leaf(Tok::Ident, "a")])],
        );
        let inner = AstNode::interior(
            Nt::Expr,
            vec![AstNode::interior(
                Nt::Term,
                vec![AstNode::interior(Nt::Factor, vec![leaf(Tok::Ident, "b")])],
            )],
        );
        let paren = AstNode::interior(
            Nt::Factor,
            vec![leaf(Tok::LParen, "("), inner, leaf(Tok::RParen, ")")],
        );
        AstNode::interior(
            Nt::Expr,
            vec![AstNode::interior(
                Nt::Term,
                vec![a, leaf(Tok::Star, "*"), paren],
            )],
        )
    }

    #[test]
    fn leaf_and_interior_accessors() {
        let l = leaf(Tok::Number, "7");
        assert!(l.is_leaf());
        assert_eq!(l.symbol(), T(Tok::Number));
        assert_eq!(l.token().map(|t| t.lexeme.as_str()), Some("7"));
        assert_eq!(l.to_string(), "Number");

        let n = AstNode::interior(Nt::Factor, vec![l]);
        assert!(!n.is_leaf());
        assert!(n.token().is_none());
        assert_eq!(n.children().len(), 1);
        assert_eq!(n.to_string(), "Factor => Number");
    }

    #[test]
    fn search_checks_root_first() {
        let tree = sample();
        let found = tree.search(N(Nt::Expr), 0).unwrap();
        assert!(std::ptr::eq(found, &tree));
    }

    #[test]
    fn search_is_preorder() {
        let tree = sample();
        let factor = tree.search(N(Nt::Factor), 0).unwrap();
        assert_eq!(factor.to_string(), "Factor => Ident");
        assert_eq!(factor.printed().to_string(), "a");
        assert!(tree.search(T(Tok::Plus), 0).is_none());
    }

    #[test]
    fn search_start_skips_children() {
        let tree = sample();
        let term = &tree.children()[0];
        let factor = term.search(N(Nt::Factor), 1).unwrap();
        assert_eq!(factor.to_string(), "Factor => LParen Expr RParen");
        assert!(term.search(N(Nt::Factor), 3).is_none());
    }

    #[test]
    fn search_any_matches_first_of_set() {
        let tree = sample();
        let term = &tree.children()[0];
        let hit = term.search_any(&[T(Tok::Star), T(Tok::Ident)], 0).unwrap();
        assert_eq!(hit.token().unwrap().lexeme.as_str(), "a");
        let hit = term.search_any(&[T(Tok::Star), T(Tok::RParen)], 0).unwrap();
        assert_eq!(hit.symbol(), T(Tok::Star));
    }

    #[test]
    fn search_all_does_not_descend_into_matches() {
        let tree = sample();
        let term = &tree.children()[0];
        // the parenthesized Expr is inside the Factor match
        let factors: Vec<_> = term.search_all(N(Nt::Factor), 0).collect();
        assert_eq!(factors.len(), 2);
        let exprs: Vec<_> = term.search_all(N(Nt::Expr), 0).collect();
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].printed().to_string(), "b");
        let idents: Vec<_> = tree
            .search_all_any(&[T(Tok::Ident), T(Tok::RParen)], 0)
            .map(|n| n.token().unwrap().lexeme.to_string())
            .collect();
        assert_eq!(idents, vec!["a", "b", ")"]);
    }

    #[test]
    fn flatten_and_print() {
        let tree = sample();
        let lexemes: Vec<&str> = tree.flatten().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["a", "*", "(", "b", ")"]);
        assert_eq!(tree.printed().to_string(), "a * ( b )");
    }

    #[test]
    fn deep_tree_does_not_overflow() {
        let mut node = AstNode::interior(Nt::Factor, vec![leaf(Tok::Ident, "x")]);
        for _ in 0..100_000 {
            node = AstNode::interior(Nt::Term, vec![node]);
        }
        assert_eq!(node.flatten().count(), 1);
        assert_eq!(node.search_all(T(Tok::Ident), 0).count(), 1);
        drop(node);
    }

    #[test]
    fn deep_trees_compare_without_recursion() {
        let chain = |leaf_text: &str| {
            let mut node = AstNode::interior(Nt::Factor, vec![leaf(Tok::Ident, leaf_text)]);
            for _ in 0..100_000 {
                node = AstNode::interior(Nt::Term, vec![node]);
            }
            node
        };
        assert!(chain("x") == chain("x"));
        assert!(chain("x") != chain("y"));
    }

    #[test]
    fn equality_checks_shape_and_tokens() {
        let a = sample();
        let b = sample();
        assert_eq!(a, b);
        let other = AstNode::interior(Nt::Expr, vec![leaf(Tok::Ident, "a")]);
        assert_ne!(a, other);
        assert_ne!(leaf(Tok::Ident, "a"), leaf(Tok::Ident, "b"));
    }
}
