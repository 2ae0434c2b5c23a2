//! Integration test suite for the Ely front-end.
//!
//! This crate exists only to run integration tests from the `tests/`
//! directory. All actual test code lives in `tests/*.rs` files.
//!
//! # Test Organization
//!
//! | File | Topic |
//! |------|-------|
//! | `lexer_properties.rs` | Byte preservation, chunking equivalence, resumption |
//! | `reader_roundtrip.rs` | Atmosphere round-trips, size composition, recovery |
//! | `expander_pipeline.rs` | End-to-end read-then-expand flows, hygiene |
