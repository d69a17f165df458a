//! Grammars shared by the unit tests.

pub(crate) use crate::symbol::Symbol::{Nonterminal as N, Terminal as T};

macro_rules! id_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VARIANTS: &'static [Self] = &[$($name::$variant),+];
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id as usize
            }
        }
    };
}

macro_rules! terminals {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        id_enum!($name { $($variant),+ });

        impl crate::symbol::TerminalID for $name {
            const ALL: &'static [Self] = $name::VARIANTS;
            const END: Self = $name::End;
        }
    };
}

macro_rules! nonterminals {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        id_enum!($name { $($variant),+ });

        impl crate::symbol::NonterminalID for $name {
            const ALL: &'static [Self] = $name::VARIANTS;
        }
    };
}

/// Arithmetic expressions.
pub mod expr {
    use super::{N, T};
    use crate::grammar::{Grammar, GrammarBuilder};

    terminals!(Tok { Ident, Number, Plus, Star, LParen, RParen, End });
    nonterminals!(Nt { Start, Expr, Term, Factor });

    fn term_and_factor(b: &mut GrammarBuilder<Tok, Nt>) {
        b.define_production(Nt::Term)
            .with([N(Nt::Term), T(Tok::Star), N(Nt::Factor)])
            .with([N(Nt::Factor)]);
        b.define_production(Nt::Factor)
            .with([T(Tok::LParen), N(Nt::Expr), T(Tok::RParen)])
            .with([T(Tok::Ident)])
            .with([T(Tok::Number)]);
    }

    /// ```text
    /// r0 Start  -> Expr
    /// r1 Expr   -> Expr Plus Term
    /// r2 Expr   -> Term
    /// r3 Term   -> Term Star Factor
    /// r4 Term   -> Factor
    /// r5 Factor -> LParen Expr RParen
    /// r6 Factor -> Ident
    /// r7 Factor -> Number
    /// ```
    pub fn grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::Expr)]);
        b.define_production(Nt::Expr)
            .with([N(Nt::Expr), T(Tok::Plus), N(Nt::Term)])
            .with([N(Nt::Term)]);
        term_and_factor(&mut b);
        b.build().unwrap()
    }

    /// Same language family, but the accepting rule is `Start -> Term`.
    pub fn term_grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).accepting([N(Nt::Term)]);
        term_and_factor(&mut b);
        b.define_production(Nt::Expr)
            .with([N(Nt::Expr), T(Tok::Plus), N(Nt::Term)])
            .with([N(Nt::Term)]);
        b.build().unwrap()
    }
}

/// Nested conditionals with an optional else branch.
pub mod dangling {
    use super::{N, T};
    use crate::grammar::{Grammar, GrammarBuilder};

    terminals!(Tok { If, Else, LParen, RParen, Ident, Semi, End });
    nonterminals!(Nt { Start, Stmt, Expr });

    /// ```text
    /// r0 Start -> Stmt
    /// r1 Stmt  -> If LParen Expr RParen Stmt
    /// r2 Stmt  -> If LParen Expr RParen Stmt Else Stmt
    /// r3 Stmt  -> Ident Semi
    /// r4 Expr  -> Ident
    /// ```
    pub fn grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::Stmt)]);
        b.define_production(Nt::Stmt)
            .with([
                T(Tok::If),
                T(Tok::LParen),
                N(Nt::Expr),
                T(Tok::RParen),
                N(Nt::Stmt),
            ])
            .with([
                T(Tok::If),
                T(Tok::LParen),
                N(Nt::Expr),
                T(Tok::RParen),
                N(Nt::Stmt),
                T(Tok::Else),
                N(Nt::Stmt),
            ])
            .with([T(Tok::Ident), T(Tok::Semi)]);
        b.define_production(Nt::Expr).rule([T(Tok::Ident)]);
        b.build().unwrap()
    }
}

/// Assignments through pointers: LALR(1) but not SLR(1).
pub mod pointer {
    use super::{N, T};
    use crate::grammar::{Grammar, GrammarBuilder};

    terminals!(Tok { Star, Equals, Id, End });
    nonterminals!(Nt { Start, S, L, R });

    /// ```text
    /// r0 Start -> S
    /// r1 S     -> L Equals R
    /// r2 S     -> R
    /// r3 L     -> Star R
    /// r4 L     -> Id
    /// r5 R     -> L
    /// ```
    pub fn grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::S)]);
        b.define_production(Nt::S)
            .with([N(Nt::L), T(Tok::Equals), N(Nt::R)])
            .with([N(Nt::R)]);
        b.define_production(Nt::L)
            .with([T(Tok::Star), N(Nt::R)])
            .with([T(Tok::Id)]);
        b.define_production(Nt::R).rule([N(Nt::L)]);
        b.build().unwrap()
    }
}

/// A possibly empty list, built with an epsilon rule.
pub mod list {
    use super::{N, T};
    use crate::grammar::{Grammar, GrammarBuilder};

    terminals!(Tok { Id, Semi, End });
    nonterminals!(Nt { Start, List, Item });

    /// ```text
    /// r0 Start -> List
    /// r1 List  -> List Item
    /// r2 List  -> ε
    /// r3 Item  -> Id Semi
    /// ```
    pub fn grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::List)]);
        b.define_production(Nt::List)
            .with([N(Nt::List), N(Nt::Item)])
            .with_epsilon();
        b.define_production(Nt::Item).rule([T(Tok::Id), T(Tok::Semi)]);
        b.build().unwrap()
    }
}

/// Grammars with reduce/reduce conflicts.
pub mod rr {
    use super::{N, T};
    use crate::grammar::{Grammar, GrammarBuilder};

    terminals!(Tok { Id, X, Y, End });
    nonterminals!(Nt { Start, S, A, B });

    /// ```text
    /// r0 Start -> S
    /// r1 S     -> A
    /// r2 S     -> B
    /// r3 A     -> Id
    /// r4 B     -> Id
    /// ```
    pub fn grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::S)]);
        b.define_production(Nt::S).with([N(Nt::A)]).with([N(Nt::B)]);
        b.define_production(Nt::A).rule([T(Tok::Id)]);
        b.define_production(Nt::B).rule([T(Tok::Id)]);
        b.build().unwrap()
    }

    /// ```text
    /// r0 Start -> S
    /// r1 S     -> A Id
    /// r2 S     -> B Id
    /// r3 A     -> ε
    /// r4 B     -> ε
    /// ```
    pub fn epsilon_grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::S)]);
        b.define_production(Nt::S)
            .with([N(Nt::A), T(Tok::Id)])
            .with([N(Nt::B), T(Tok::Id)]);
        b.define_production(Nt::A).epsilon();
        b.define_production(Nt::B).epsilon();
        b.build().unwrap()
    }

    /// FOLLOW(A) and FOLLOW(B) are disjoint, so only SLR complains.
    ///
    /// ```text
    /// r0 Start -> S
    /// r1 S     -> A X
    /// r2 S     -> B Y
    /// r3 A     -> Id
    /// r4 B     -> Id
    /// ```
    pub fn disjoint_grammar() -> Grammar<Tok, Nt> {
        let mut b: GrammarBuilder<Tok, Nt> = GrammarBuilder::new(Nt::Start);
        b.define_production(Nt::Start).rule([N(Nt::S)]);
        b.define_production(Nt::S)
            .with([N(Nt::A), T(Tok::X)])
            .with([N(Nt::B), T(Tok::Y)]);
        b.define_production(Nt::A).rule([T(Tok::Id)]);
        b.define_production(Nt::B).rule([T(Tok::Id)]);
        b.build().unwrap()
    }
}
