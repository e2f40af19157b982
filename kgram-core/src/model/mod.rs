//! Top-level module for the k-gram language model.
//!
//! This crate provides a fixed-order character Markov model, including:
//! - Transition statistics and weighted sampling (`KGramStats`)
//! - Training and generation orchestration (`LanguageModel`)

/// Transition statistics keyed by k-gram.
///
/// Accumulates (k-gram, next character) observation counts and performs
/// weighted random sampling over them.
pub mod kgram_stats;

/// Fixed-order character language model (`k >= 1`).
///
/// Slides a k-wide window over training text and drives repeated sampling
/// to generate new text, with dead-end recovery.
pub mod language_model;
