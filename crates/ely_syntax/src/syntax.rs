//! The arena-allocated syntax tree.
//!
//! Syntax nodes are `Copy` values whose backing storage - child slices,
//! atmosphere lists, scope annotations - lives in the arenas collected in a
//! [`SyntaxContext`]. Nothing here has a destructor, matching the arena
//! contract: the whole tree is released in O(1) when the front-end session
//! ends.
//!
//! # Size invariants
//!
//! For every node, `size = leading_size + inner_size + trailing_size`. For
//! lists, `inner_size` covers the open token (minus its leading
//! atmosphere), every child, and the close token (minus its trailing
//! atmosphere), so concatenating atmosphere and token text over the tree in
//! source order reproduces the input.
//!
//! # Poison
//!
//! A poisoned node marks a recoverable error: an unterminated list, a
//! mismatched closer, or a lexically broken literal. Later stages treat
//! poisoned regions as opaque but do not abort.

use ely_base::Arena;

use crate::atmosphere::Atmosphere;
use crate::scope::Scope;
use crate::token::{Token, TokenKind};

/// The typed arenas backing one front-end session's syntax tree.
///
/// `Copy`, so it is passed by value throughout the reader and expander.
#[derive(Clone, Copy)]
pub struct SyntaxContext<'a> {
    /// Arena for syntax nodes and child slices.
    pub syntax: &'a Arena<Syntax<'a>>,
    /// Arena for atmosphere lists.
    pub atmos: &'a Arena<Atmosphere>,
    /// Arena for scope-set annotations.
    pub scopes: &'a Arena<Scope>,
}

impl<'a> SyntaxContext<'a> {
    pub fn new(
        syntax: &'a Arena<Syntax<'a>>,
        atmos: &'a Arena<Atmosphere>,
        scopes: &'a Arena<Scope>,
    ) -> Self {
        SyntaxContext {
            syntax,
            atmos,
            scopes,
        }
    }
}

/// The closing side of a list: a real closer token, or poison when the
/// reader had to synthesize one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDelim<'a> {
    Token(Token<'a>),
    Poison,
}

impl<'a> CloseDelim<'a> {
    pub fn size(&self) -> usize {
        match self {
            CloseDelim::Token(token) => token.size(),
            CloseDelim::Poison => 0,
        }
    }

    pub fn trailing_size(&self) -> usize {
        match self {
            CloseDelim::Token(token) => token.trailing_size(),
            CloseDelim::Poison => 0,
        }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, CloseDelim::Poison)
    }
}

/// A parenthesized, bracketed or braced form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct List<'a> {
    pub open: Token<'a>,
    pub close: CloseDelim<'a>,
    pub children: &'a [Syntax<'a>],
    children_size: usize,
    poisoned: bool,
}

impl<'a> List<'a> {
    pub fn new(
        open: Token<'a>,
        close: CloseDelim<'a>,
        children: &'a [Syntax<'a>],
        children_poisoned: bool,
    ) -> Self {
        let children_size = children.iter().map(Syntax::size).sum();
        let poisoned = children_poisoned || close.is_poison();
        List {
            open,
            close,
            children,
            children_size,
            poisoned,
        }
    }

    pub fn poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn size(&self) -> usize {
        self.open.size() + self.close.size() + self.children_size
    }

    pub fn leading_size(&self) -> usize {
        self.open.leading_size()
    }

    pub fn trailing_size(&self) -> usize {
        self.close.trailing_size()
    }

    pub fn inner_size(&self) -> usize {
        self.size() - self.leading_size() - self.trailing_size()
    }
}

/// An identifier with its hygiene annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
    pub token: Token<'a>,
    /// Sorted scope annotation; empty at read time, extended by the
    /// expander when syntax is introduced by a template.
    pub scopes: &'a [Scope],
    poisoned: bool,
}

impl<'a> Identifier<'a> {
    pub fn new(token: Token<'a>) -> Self {
        let poisoned = token.kind.is_lexical_poison();
        Identifier {
            token,
            scopes: &[],
            poisoned,
        }
    }

    pub fn with_scopes(token: Token<'a>, scopes: &'a [Scope], poisoned: bool) -> Self {
        Identifier {
            token,
            scopes,
            poisoned,
        }
    }

    pub fn poisoned(&self) -> bool {
        self.poisoned
    }
}

/// A literal: numbers, strings, characters, keywords and booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    pub token: Token<'a>,
    poisoned: bool,
}

impl<'a> Literal<'a> {
    pub fn new(token: Token<'a>) -> Self {
        let poisoned = token.kind.is_lexical_poison();
        Literal { token, poisoned }
    }

    pub fn poisoned(&self) -> bool {
        self.poisoned
    }
}

/// A syntax object: the reader's output and the expander's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax<'a> {
    List(List<'a>),
    Identifier(Identifier<'a>),
    Literal(Literal<'a>),
    Eof(Token<'a>),
}

impl<'a> Syntax<'a> {
    pub fn poisoned(&self) -> bool {
        match self {
            Syntax::List(list) => list.poisoned(),
            Syntax::Identifier(identifier) => identifier.poisoned(),
            Syntax::Literal(literal) => literal.poisoned(),
            Syntax::Eof(_) => false,
        }
    }

    /// Full source size: leading atmosphere, content, trailing atmosphere.
    pub fn size(&self) -> usize {
        match self {
            Syntax::List(list) => list.size(),
            Syntax::Identifier(identifier) => identifier.token.size(),
            Syntax::Literal(literal) => literal.token.size(),
            Syntax::Eof(token) => token.size(),
        }
    }

    pub fn leading_size(&self) -> usize {
        match self {
            Syntax::List(list) => list.leading_size(),
            Syntax::Identifier(identifier) => identifier.token.leading_size(),
            Syntax::Literal(literal) => literal.token.leading_size(),
            Syntax::Eof(token) => token.leading_size(),
        }
    }

    pub fn trailing_size(&self) -> usize {
        match self {
            Syntax::List(list) => list.trailing_size(),
            Syntax::Identifier(identifier) => identifier.token.trailing_size(),
            Syntax::Literal(literal) => literal.token.trailing_size(),
            Syntax::Eof(token) => token.trailing_size(),
        }
    }

    pub fn inner_size(&self) -> usize {
        match self {
            Syntax::List(list) => list.inner_size(),
            Syntax::Identifier(identifier) => identifier.token.inner_size(),
            Syntax::Literal(literal) => literal.token.inner_size(),
            Syntax::Eof(token) => token.inner_size(),
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Syntax::Eof(_))
    }

    pub fn as_list(&self) -> Option<&List<'a>> {
        match self {
            Syntax::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            Syntax::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal<'a>> {
        match self {
            Syntax::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// An empty `()` form built from invisible tokens, used by builtins as
    /// a non-rewriting residue.
    pub fn empty_form(ctx: SyntaxContext<'a>) -> &'a Syntax<'a> {
        ctx.syntax.alloc(Syntax::List(List::new(
            Token::synthetic(TokenKind::LParen),
            CloseDelim::Token(Token::synthetic(TokenKind::RParen)),
            &[],
            false,
        )))
    }

    /// A poisoned zero-width identifier, the residue of a misused builtin.
    pub fn poison(ctx: SyntaxContext<'a>) -> &'a Syntax<'a> {
        ctx.syntax.alloc(Syntax::Identifier(Identifier::with_scopes(
            Token::synthetic(TokenKind::Unknown),
            &[],
            true,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ely_base::Symbol;

    fn token<'a>(
        kind: TokenKind,
        len: u32,
        leading: &'a [Atmosphere],
        trailing: &'a [Atmosphere],
    ) -> Token<'a> {
        Token {
            kind,
            text: Symbol::EMPTY,
            len,
            offset: 0,
            leading,
            trailing,
        }
    }

    #[test]
    fn list_size_composes_from_parts() {
        // "( a )" with a space on each side of `a`
        let open_trailing = [Atmosphere::Whitespace(1)];
        let open = token(TokenKind::LParen, 1, &[], &open_trailing);
        let a_trailing = [Atmosphere::Whitespace(1)];
        let a = Syntax::Identifier(Identifier::new(token(
            TokenKind::Identifier,
            1,
            &[],
            &a_trailing,
        )));
        let close = CloseDelim::Token(token(TokenKind::RParen, 1, &[], &[]));
        let children = [a];
        let list = List::new(open, close, &children, false);

        assert_eq!(list.size(), 5);
        assert_eq!(list.leading_size(), 0);
        assert_eq!(list.trailing_size(), 0);
        assert_eq!(list.inner_size(), 5);
        assert_eq!(
            list.size(),
            list.leading_size() + list.inner_size() + list.trailing_size()
        );
    }

    #[test]
    fn poison_close_poisons_the_list() {
        let open = token(TokenKind::LParen, 1, &[], &[]);
        let list = List::new(open, CloseDelim::Poison, &[], false);
        assert!(list.poisoned());
        assert_eq!(list.close.size(), 0);
    }

    #[test]
    fn poisoned_child_poisons_the_list() {
        let open = token(TokenKind::LParen, 1, &[], &[]);
        let bad = Syntax::Literal(Literal::new(token(
            TokenKind::UnterminatedStringLit,
            3,
            &[],
            &[],
        )));
        let children = [bad];
        let close = CloseDelim::Token(token(TokenKind::RParen, 1, &[], &[]));
        let list = List::new(open, close, &children, children.iter().any(Syntax::poisoned));
        assert!(list.poisoned());
    }

    #[test]
    fn lexical_poison_marks_nodes() {
        let unterminated = Literal::new(token(TokenKind::UnterminatedStringLit, 4, &[], &[]));
        assert!(unterminated.poisoned());
        let fine = Literal::new(token(TokenKind::StringLit, 4, &[], &[]));
        assert!(!fine.poisoned());
    }

    #[test]
    fn empty_form_is_invisible_and_clean() {
        let syntax = Arena::new();
        let atmos = Arena::new();
        let scopes = Arena::new();
        let ctx = SyntaxContext::new(&syntax, &atmos, &scopes);
        let form = Syntax::empty_form(ctx);
        assert_eq!(form.size(), 0);
        assert!(!form.poisoned());
        assert!(form.as_list().unwrap().children.is_empty());
    }

    #[test]
    fn poison_residue_is_poisoned() {
        let syntax = Arena::new();
        let atmos = Arena::new();
        let scopes = Arena::new();
        let ctx = SyntaxContext::new(&syntax, &atmos, &scopes);
        assert!(Syntax::poison(ctx).poisoned());
    }
}
