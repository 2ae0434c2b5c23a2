//! The token stream: lexemes with atmosphere attached.
//!
//! Sits between the record tape and the reader. For each real token it
//! collects a leading atmosphere list (everything since the previous
//! token's trailing list) and a trailing list (whitespace, tabs and
//! comments after the token, closed by the first newline, which is
//! included). One lexeme of lookahead is cached so the split is stable.

use ely_base::{Interner, Symbol};

use crate::atmosphere::Atmosphere;
use crate::lexeme::Lexeme;
use crate::source::ChunkSource;
use crate::syntax::SyntaxContext;
use crate::tape::RecordTape;
use crate::token::{Token, TokenKind};

/// Pulls lexemes from a [`RecordTape`] and produces [`Token`]s.
pub struct TokenStream<'i, S: ChunkSource> {
    tape: RecordTape<S>,
    interner: &'i mut Interner,
    cached: Option<Lexeme>,
}

impl<'i, S: ChunkSource> TokenStream<'i, S> {
    pub fn new(source: S, interner: &'i mut Interner) -> Self {
        TokenStream {
            tape: RecordTape::new(source),
            interner,
            cached: None,
        }
    }

    pub fn interner(&mut self) -> &mut Interner {
        self.interner
    }

    pub fn interner_ref(&self) -> &Interner {
        self.interner
    }

    fn pull(&mut self) -> Lexeme {
        match self.cached.take() {
            Some(lexeme) => lexeme,
            None => self.tape.next(),
        }
    }

    /// Produces the next token with its atmosphere attached. At end of
    /// input this returns `Eof` tokens indefinitely.
    pub fn next<'a>(&mut self, ctx: SyntaxContext<'a>) -> Token<'a> {
        let mut leading: Vec<Atmosphere> = Vec::new();
        let mut lexeme = self.pull();
        while lexeme.is_atmosphere() {
            leading.push(Atmosphere::from_lexeme(&lexeme, self.interner));
            lexeme = self.tape.next();
        }

        let token_lexeme = lexeme;
        let mut trailing: Vec<Atmosphere> = Vec::new();

        if !token_lexeme.is_eof() {
            let mut next = self.tape.next();
            while next.is_atmosphere() {
                let is_newline = next.kind.is_newline();
                trailing.push(Atmosphere::from_lexeme(&next, self.interner));
                next = self.tape.next();
                if is_newline {
                    break;
                }
            }
            self.cached = Some(next);
        }

        let text = if token_lexeme.kind.carries_text() {
            self.interner.intern(&token_lexeme.text)
        } else {
            Symbol::EMPTY
        };

        Token {
            kind: TokenKind::from_lexeme(token_lexeme.kind),
            text,
            len: token_lexeme.len,
            offset: token_lexeme.offset as u32,
            leading: ctx.atmos.alloc_slice(leading),
            trailing: ctx.atmos.alloc_slice(trailing),
        }
    }
}
