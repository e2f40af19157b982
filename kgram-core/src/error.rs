use thiserror::Error;

/// Errors produced by model construction and sampling.
///
/// # Variants
/// - `InvalidParameter`: a constructor or caller-facing boundary received an
///   out-of-range value (non-positive k, non-positive requested length).
/// - `Untrained`: random k-gram sampling was attempted before any transition
///   was recorded (training never ran, or only on text shorter than k).
///
/// Errors are raised synchronously at the point of violation and propagate
/// to the immediate caller; there is no retry layer. The dead-end reseed
/// during generation is an ordinary algorithmic branch, not error recovery.
#[derive(Error, Debug)]
pub enum ModelError {
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	#[error("model has not been trained (no k-grams recorded)")]
	Untrained,
}
