//! Character-level k-gram language model library.
//!
//! This crate provides a fixed-order Markov text model:
//! - Frequency accumulation over (k-gram, next character) transitions
//! - Weighted random sampling for generation, with dead-end recovery
//! - Deterministic seeding for reproducible output
//! - Small I/O helpers for the surrounding binaries
//!
//! Training and generation are single-threaded and synchronous; a model
//! instance owns its own tables and random generator, independent of other
//! instances. Callers needing concurrent access must serialize around the
//! whole instance.

/// Core model types and generation logic.
pub mod model;

/// Error taxonomy shared across the crate.
pub mod error;

/// I/O utilities (corpus loading, directory listing).
///
/// Thin glue for the command-line and server front ends.
pub mod io;
