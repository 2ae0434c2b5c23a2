#![cfg_attr(docsrs, feature(doc_cfg))]

//! # ely-base
//!
//! Pure structural atoms for the Ely front-end.
//!
//! This crate provides the foundational types used throughout the front-end:
//!
//! - [`Arena`] — Bump allocation for stable syntax-node references
//! - [`Forever`] — Intentionally-leaked storage for process-lifetime values
//! - [`Interner`]/[`Symbol`] — String interning for O(1) equality
//! - [`Uniquer`] — Canonical storage keyed by a caller projection
//! - [`IndexList`] — A doubly linked list over vector indices
//! - [`Span`] — Source location tracking
//! - [`SpannedError`]/[`Result`] — Errors with source positions
//!
//! # Design Principles
//!
//! This crate has **no knowledge of Ely syntax or I/O**. It provides only
//! generic, reusable infrastructure that higher-level crates build upon.
//!
//! # Example
//!
//! ```
//! use ely_base::{Arena, Interner, Span};
//!
//! let arena: Arena<&str> = Arena::new();
//! let mut interner = Interner::new();
//!
//! let hello = interner.intern("hello");
//! let span = Span::new(0, 5);
//!
//! let allocated = arena.alloc("hello");
//! assert_eq!(*allocated, "hello");
//! assert_eq!(interner.resolve(hello), "hello");
//! assert_eq!(span.len(), 5);
//! ```

pub mod arena;
pub mod error;
pub mod intern;
pub mod list;
pub mod span;
pub mod uniquer;

pub use arena::{Arena, Forever};
pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol, SymbolEq};
pub use list::{IndexList, ListIndex};
pub use span::Span;
pub use uniquer::Uniquer;
