//! Atmosphere: source bytes with no semantic content.
//!
//! Whitespace runs, tabs, newlines and comments must survive parsing so
//! the original input can be reproduced byte-for-byte. Each atmosphere
//! item belongs to exactly one token's leading or trailing list.
//!
//! Comment text is interned, which keeps the variant `Copy` and lets
//! atmosphere lists live in arena slices alongside the syntax tree.

use ely_base::{Interner, Symbol};

use crate::lexeme::{Lexeme, LexemeKind};

/// One piece of atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atmosphere {
    /// A run of spaces.
    Whitespace(u32),
    /// A run of tabs.
    Tab(u32),
    NewlineCr,
    NewlineLf,
    NewlineCrlf,
    /// A `;` line comment, text including the semicolon.
    Comment { text: Symbol, len: u32 },
}

impl Atmosphere {
    /// Converts a decoded atmosphere lexeme, interning comment text.
    ///
    /// # Panics
    ///
    /// Panics if the lexeme is not atmosphere.
    pub fn from_lexeme(lexeme: &Lexeme, interner: &mut Interner) -> Atmosphere {
        match lexeme.kind {
            LexemeKind::Whitespace => Atmosphere::Whitespace(lexeme.len),
            LexemeKind::Tab => Atmosphere::Tab(lexeme.len),
            LexemeKind::NewlineCr => Atmosphere::NewlineCr,
            LexemeKind::NewlineLf => Atmosphere::NewlineLf,
            LexemeKind::NewlineCrlf => Atmosphere::NewlineCrlf,
            LexemeKind::LineComment => Atmosphere::Comment {
                text: interner.intern(&lexeme.text),
                len: lexeme.len,
            },
            kind => panic!("not atmosphere: {:?}", kind),
        }
    }

    /// Source size in bytes.
    pub fn size(&self) -> usize {
        match *self {
            Atmosphere::Whitespace(len) | Atmosphere::Tab(len) => len as usize,
            Atmosphere::NewlineCr | Atmosphere::NewlineLf => 1,
            Atmosphere::NewlineCrlf => 2,
            Atmosphere::Comment { len, .. } => len as usize,
        }
    }

    pub fn is_newline(&self) -> bool {
        matches!(
            self,
            Atmosphere::NewlineCr | Atmosphere::NewlineLf | Atmosphere::NewlineCrlf
        )
    }
}

/// Total source size of an atmosphere list.
pub fn atmosphere_size(list: &[Atmosphere]) -> usize {
    list.iter().map(Atmosphere::size).sum()
}
