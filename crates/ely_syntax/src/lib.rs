#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ely-syntax
//!
//! The syntax layer of the Ely front-end.
//!
//! This crate turns raw source bytes into scope-annotated syntax objects
//! through a three-stage pipeline with explicit boundaries:
//!
//! 1. **Lexer** ([`lexer::lex`]) - A resumable state machine that consumes
//!    byte chunks and writes a dense stream of 1-3 byte token records.
//!    Chunk exhaustion, output exhaustion and end-of-input are all signaled
//!    in-band by the final record.
//!
//! 2. **Record tape** ([`RecordTape`]) - Drives the lexer across a
//!    [`ChunkSource`], stitches tokens that spill across chunk boundaries,
//!    and yields decoded [`Lexeme`]s.
//!
//! 3. **Reader** ([`Reader`]) - Consumes tokens with one-token lookahead,
//!    attaches atmosphere (whitespace, comments) to each side of each token,
//!    and produces an arena-allocated [`Syntax`] tree, recording parse
//!    errors without aborting.
//!
//! ## Atmosphere
//!
//! Source bytes with no semantic content (spaces, tabs, newlines, comments)
//! are never discarded: each one belongs to exactly one token's leading or
//! trailing list, so the original input can be reproduced byte-for-byte
//! from the syntax tree. The single qualification is a stray closer at the
//! top level: the reader drops its one-byte glyph during recovery (the
//! token appears in no form) but carries its atmosphere onto the next
//! token, so even malformed input loses nothing else.
//!
//! ## Poison
//!
//! Lexical and structural errors never abort the pipeline. They surface as
//! poison token kinds, poisoned syntax nodes, and structured
//! [`ReaderError`] records for a separate diagnostic renderer.
//!
//! ## Example
//!
//! ```
//! use ely_base::{Arena, Interner};
//! use ely_syntax::{Reader, SliceSource, Syntax, SyntaxContext};
//!
//! let syntax = Arena::new();
//! let atmos = Arena::new();
//! let scopes = Arena::new();
//! let ctx = SyntaxContext::new(&syntax, &atmos, &scopes);
//! let mut interner = Interner::new();
//!
//! let mut reader = Reader::new(SliceSource::new(b"(def x 1)"), ctx, &mut interner);
//! let form = reader.next();
//! assert!(matches!(form, Syntax::List(_)));
//! assert!(!form.poisoned());
//! ```

pub mod atmosphere;
pub mod cont;
pub mod display;
pub mod lexeme;
pub mod lexer;
pub mod reader;
pub mod record;
pub mod scope;
pub mod source;
pub mod stream;
pub mod syntax;
pub mod tape;
pub mod token;
pub mod view;

pub use atmosphere::Atmosphere;
pub use cont::Cont;
pub use display::{DisplayWith, WithInterner};
pub use lexeme::{Lexeme, LexemeKind};
pub use lexer::lex;
pub use reader::{Reader, ReaderError, ReaderErrorKind};
pub use record::RecordKind;
pub use scope::{with_new_scope, Scope, ScopeGenerator, ScopeGuard, ScopeSet};
pub use source::{ChunkSource, FixedChunks, SliceSource};
pub use stream::TokenStream;
pub use syntax::{CloseDelim, Identifier, List, Literal, Syntax, SyntaxContext};
pub use tape::RecordTape;
pub use token::{Token, TokenKind};
pub use view::{AtmosphereView, SyntaxView, TokenView};
