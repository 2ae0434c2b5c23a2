//! Owned view types for syntax serialization and display.
//!
//! This module provides "view" versions of the syntax types that replace
//! interned symbols with resolved string slices. Views are useful for:
//!
//! - Serialization (JSON/Serde) without an interner dependency
//! - Diagnostic renderers consuming the tree outside the front-end
//! - Test assertions over whole trees
//!
//! The conversion functions take an [`Interner`] reference to resolve
//! symbols; the resulting views borrow the interner's storage.

use ely_base::Interner;
use serde::Serialize;

use crate::atmosphere::Atmosphere;
use crate::syntax::{CloseDelim, Syntax};
use crate::token::{Token, TokenKind};

/// View of one piece of atmosphere with resolved comment text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AtmosphereView<'s> {
    Whitespace(u32),
    Tab(u32),
    NewlineCr,
    NewlineLf,
    NewlineCrlf,
    Comment(&'s str),
}

impl<'s> AtmosphereView<'s> {
    pub fn of(atmosphere: &Atmosphere, interner: &'s Interner) -> Self {
        match *atmosphere {
            Atmosphere::Whitespace(len) => AtmosphereView::Whitespace(len),
            Atmosphere::Tab(len) => AtmosphereView::Tab(len),
            Atmosphere::NewlineCr => AtmosphereView::NewlineCr,
            Atmosphere::NewlineLf => AtmosphereView::NewlineLf,
            Atmosphere::NewlineCrlf => AtmosphereView::NewlineCrlf,
            Atmosphere::Comment { text, .. } => AtmosphereView::Comment(interner.resolve(text)),
        }
    }
}

/// View of a token with resolved text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenView<'s> {
    pub kind: TokenKind,
    /// The token's source text: the fixed glyph for punctuation, the
    /// resolved symbol otherwise.
    pub text: &'s str,
    pub offset: u32,
    pub leading: Vec<AtmosphereView<'s>>,
    pub trailing: Vec<AtmosphereView<'s>>,
}

impl<'s> TokenView<'s> {
    pub fn of(token: &Token<'_>, interner: &'s Interner) -> Self {
        TokenView {
            kind: token.kind,
            text: token
                .kind
                .glyph()
                .unwrap_or_else(|| interner.resolve(token.text)),
            offset: token.offset,
            leading: token
                .leading
                .iter()
                .map(|a| AtmosphereView::of(a, interner))
                .collect(),
            trailing: token
                .trailing
                .iter()
                .map(|a| AtmosphereView::of(a, interner))
                .collect(),
        }
    }
}

/// View of a syntax node with resolved strings and plain scope ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyntaxView<'s> {
    List {
        open: TokenView<'s>,
        /// `None` when the closer was synthesized after an error.
        close: Option<TokenView<'s>>,
        children: Vec<SyntaxView<'s>>,
        poisoned: bool,
    },
    Identifier {
        token: TokenView<'s>,
        scopes: Vec<u32>,
        poisoned: bool,
    },
    Literal {
        token: TokenView<'s>,
        poisoned: bool,
    },
    Eof {
        token: TokenView<'s>,
    },
}

impl<'s> SyntaxView<'s> {
    pub fn of(syntax: &Syntax<'_>, interner: &'s Interner) -> Self {
        match syntax {
            Syntax::List(list) => SyntaxView::List {
                open: TokenView::of(&list.open, interner),
                close: match list.close {
                    CloseDelim::Token(token) => Some(TokenView::of(&token, interner)),
                    CloseDelim::Poison => None,
                },
                children: list
                    .children
                    .iter()
                    .map(|child| SyntaxView::of(child, interner))
                    .collect(),
                poisoned: list.poisoned(),
            },
            Syntax::Identifier(identifier) => SyntaxView::Identifier {
                token: TokenView::of(&identifier.token, interner),
                scopes: identifier.scopes.iter().map(|s| s.id()).collect(),
                poisoned: identifier.poisoned(),
            },
            Syntax::Literal(literal) => SyntaxView::Literal {
                token: TokenView::of(&literal.token, interner),
                poisoned: literal.poisoned(),
            },
            Syntax::Eof(token) => SyntaxView::Eof {
                token: TokenView::of(token, interner),
            },
        }
    }

    pub fn poisoned(&self) -> bool {
        match self {
            SyntaxView::List { poisoned, .. } => *poisoned,
            SyntaxView::Identifier { poisoned, .. } => *poisoned,
            SyntaxView::Literal { poisoned, .. } => *poisoned,
            SyntaxView::Eof { .. } => false,
        }
    }
}
