#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ely-expand
//!
//! The hygienic macro expander of the Ely front-end.
//!
//! Expansion rewrites list forms whose head identifier resolves to a
//! binding, tracking hygiene with scope sets: every binding records the
//! set of scopes in effect where it was created, and a use site picks the
//! binding whose scope set is a subset of its own with the largest subset.
//!
//! - [`BindingMap`] — insertion-ordered bindings per symbol with
//!   subset-maximizing resolution
//! - [`Expander`] — `expand_once` / `expand_all` over syntax trees, with a
//!   transformer registry and the builtin `define`
//!
//! Transformers never raise: misuse produces poisoned syntax and the
//! pipeline keeps going.
//!
//! ## Example
//!
//! ```
//! use ely_base::{Arena, Interner};
//! use ely_expand::Expander;
//! use ely_syntax::{Reader, SliceSource, SyntaxContext};
//!
//! let syntax = Arena::new();
//! let atmos = Arena::new();
//! let scopes = Arena::new();
//! let ctx = SyntaxContext::new(&syntax, &atmos, &scopes);
//! let mut interner = Interner::new();
//!
//! let mut reader = Reader::new(SliceSource::new(b"(define x (f y))"), ctx, &mut interner);
//! let form = syntax.alloc(reader.next());
//!
//! let mut expander = Expander::new(ctx, &mut interner);
//! let expanded = expander.expand_all(form);
//! // the definition rewrites to an empty residue form
//! assert_eq!(expanded.as_list().unwrap().children.len(), 0);
//! ```

pub mod binding;
pub mod expand;

pub use binding::{Binding, BindingKind, BindingMap, Transformer, TransformerFn};
pub use expand::{apply_scopes, copy_syntax, Expander};
