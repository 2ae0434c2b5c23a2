//! The streaming S-expression reader.
//!
//! [`Reader::next`] yields one top-level syntax form at a time, then `Eof`
//! syntax once the input is exhausted. The reader never aborts: bracket
//! mismatches, stray closers and premature end-of-input become poisoned
//! nodes plus structured [`ReaderError`] records, and parsing continues
//! with the remaining input intact.
//!
//! Recovery rules:
//!
//! - A closer that does not match the innermost opener causes the expected
//!   closer to be synthesized at the current position (the list closes with
//!   [`CloseDelim::Poison`]) and the actual closer is re-processed one
//!   level up.
//! - End-of-input inside a list closes it with poison; the `Eof` token is
//!   re-processed at the top level so its atmosphere is not lost.
//! - A closer at the top level is recorded and skipped. Its atmosphere is
//!   carried onto the next token's leading list, so of the whole input
//!   only the stray glyph itself is absent from the tree; this is the one
//!   qualification to the byte-for-byte round-trip guarantee.
//! - Nesting deeper than [`MAX_DEPTH`] poisons the innermost list instead
//!   of growing the call stack without bound.

use std::fmt;

use ely_base::{Interner, Span};
use serde::Serialize;

use crate::atmosphere::Atmosphere;
use crate::source::ChunkSource;
use crate::stream::TokenStream;
use crate::syntax::{CloseDelim, Identifier, List, Literal, Syntax, SyntaxContext};
use crate::token::{Token, TokenKind};

/// Maximum list nesting before the reader stops recursing.
pub const MAX_DEPTH: usize = 1000;

/// What went wrong, in machine-readable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReaderErrorKind {
    /// A closer appeared at the top level with no open list.
    UnexpectedCloser { found: TokenKind },
    /// A closer did not match the innermost opener.
    MismatchedCloser {
        expected: TokenKind,
        found: TokenKind,
    },
    /// Input ended inside a list.
    UnexpectedEof { expected: TokenKind },
    /// Nesting exceeded [`MAX_DEPTH`].
    DepthExceeded,
}

/// A structured reader error with its source location.
///
/// The reader records errors and continues; rendering is a separate
/// concern and happens outside the front-end core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReaderError {
    pub kind: ReaderErrorKind,
    pub span: Span,
}

fn closer_glyph(kind: TokenKind) -> &'static str {
    kind.glyph().unwrap_or("?")
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReaderErrorKind::UnexpectedCloser { found } => {
                write!(f, "unexpected '{}'", closer_glyph(found))
            }
            ReaderErrorKind::MismatchedCloser { expected, found } => {
                write!(
                    f,
                    "expected '{}' before '{}'",
                    closer_glyph(expected),
                    closer_glyph(found)
                )
            }
            ReaderErrorKind::UnexpectedEof { expected } => {
                write!(
                    f,
                    "expected '{}' before end of input",
                    closer_glyph(expected)
                )
            }
            ReaderErrorKind::DepthExceeded => write!(f, "form nesting too deep"),
        }
    }
}

/// Token stream to syntax tree, with error recovery.
pub struct Reader<'a, 'i, S: ChunkSource> {
    stream: TokenStream<'i, S>,
    ctx: SyntaxContext<'a>,
    errors: Vec<ReaderError>,
    /// A closer or eof token handed back by an inner list for
    /// re-processing one level up.
    pending: Option<Token<'a>>,
    /// Atmosphere of skipped stray closers, waiting to lead the next
    /// token.
    carried: Vec<Atmosphere>,
}

impl<'a, 'i, S: ChunkSource> Reader<'a, 'i, S> {
    pub fn new(source: S, ctx: SyntaxContext<'a>, interner: &'i mut Interner) -> Self {
        Reader {
            stream: TokenStream::new(source, interner),
            ctx,
            errors: Vec::new(),
            pending: None,
            carried: Vec::new(),
        }
    }

    /// Shared view of the interner backing this reader's tokens.
    pub fn interner(&self) -> &Interner {
        self.stream.interner_ref()
    }

    /// The errors recorded so far, in source order.
    pub fn errors(&self) -> &[ReaderError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ReaderError> {
        std::mem::take(&mut self.errors)
    }

    fn pull(&mut self) -> Token<'a> {
        let mut token = match self.pending.take() {
            Some(token) => token,
            None => self.stream.next(self.ctx),
        };
        if !self.carried.is_empty() {
            let mut leading = std::mem::take(&mut self.carried);
            leading.extend_from_slice(token.leading);
            token.leading = self.ctx.atmos.alloc_slice(leading);
        }
        token
    }

    /// Yields the next top-level form, or `Eof` syntax at end of input.
    pub fn next(&mut self) -> Syntax<'a> {
        loop {
            let token = self.pull();
            match token.kind {
                kind if kind.is_opener() => return self.read_list(token, 1),
                kind if kind.is_closer() => {
                    self.errors.push(ReaderError {
                        kind: ReaderErrorKind::UnexpectedCloser { found: kind },
                        span: token.span(),
                    });
                    // the glyph is discarded from the tree, but its
                    // atmosphere still belongs to the stream: carry it
                    // onto the next token
                    self.carried.extend_from_slice(token.leading);
                    self.carried.extend_from_slice(token.trailing);
                }
                TokenKind::Eof => return Syntax::Eof(token),
                _ => return read_atom(token),
            }
        }
    }

    fn read_list(&mut self, open: Token<'a>, depth: usize) -> Syntax<'a> {
        let expected = open.kind.matching_closer();

        if depth > MAX_DEPTH {
            self.errors.push(ReaderError {
                kind: ReaderErrorKind::DepthExceeded,
                span: open.span(),
            });
            return Syntax::List(List::new(open, CloseDelim::Poison, &[], true));
        }

        let mut children: Vec<Syntax<'a>> = Vec::new();
        let mut children_poisoned = false;

        let close = loop {
            let token = self.pull();
            match token.kind {
                kind if kind == expected => break CloseDelim::Token(token),
                kind if kind.is_closer() => {
                    self.errors.push(ReaderError {
                        kind: ReaderErrorKind::MismatchedCloser {
                            expected,
                            found: kind,
                        },
                        span: token.span(),
                    });
                    self.pending = Some(token);
                    break CloseDelim::Poison;
                }
                TokenKind::Eof => {
                    self.errors.push(ReaderError {
                        kind: ReaderErrorKind::UnexpectedEof { expected },
                        span: token.span(),
                    });
                    self.pending = Some(token);
                    break CloseDelim::Poison;
                }
                kind if kind.is_opener() => {
                    let child = self.read_list(token, depth + 1);
                    children_poisoned |= child.poisoned();
                    children.push(child);
                }
                _ => {
                    let child = read_atom(token);
                    children_poisoned |= child.poisoned();
                    children.push(child);
                }
            }
        };

        Syntax::List(List::new(
            open,
            close,
            self.ctx.syntax.alloc_slice(children),
            children_poisoned,
        ))
    }
}

/// Classifies a non-structural token into a leaf node.
fn read_atom(token: Token<'_>) -> Syntax<'_> {
    match token.kind {
        kind if kind.is_literal() => Syntax::Literal(Literal::new(token)),
        // everything else - identifiers, the quote family, stray
        // punctuation, lexical poison - reads as an identifier node,
        // poisoned when the token kind is a poison kind
        _ => Syntax::Identifier(Identifier::new(token)),
    }
}
