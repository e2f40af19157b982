use crate::error::ModelError;
use crate::model::kgram_stats::KGramStats;

/// Fixed-order character-level Markov language model.
///
/// Holds the context length `k` (immutable after construction) and one
/// [`KGramStats`] instance it exclusively owns.
///
/// # Responsibilities
/// - Slide a k-wide window over training text and feed transitions into
///   the statistics tables
/// - Drive repeated sampling calls to generate text of a requested length,
///   reseeding when the rolling window reaches an unrecorded k-gram
///
/// # Invariants
/// - `k >= 1`
/// - Training is cumulative: repeated `train` calls extend the same tables;
///   there is no reset
#[derive(Debug)]
pub struct LanguageModel {
	/// Context length (number of characters in a k-gram).
	k: usize,
	stats: KGramStats,
}

impl LanguageModel {
	/// Creates an untrained model of order `k`, seeded from OS entropy.
	///
	/// # Errors
	/// Returns [`ModelError::InvalidParameter`] if `k < 1`.
	pub fn new(k: usize) -> Result<Self, ModelError> {
		Self::build(k, KGramStats::new())
	}

	/// Creates an untrained model of order `k` with a deterministic
	/// generator, for reproducible generation.
	///
	/// # Errors
	/// Returns [`ModelError::InvalidParameter`] if `k < 1`.
	pub fn with_seed(k: usize, seed: u64) -> Result<Self, ModelError> {
		Self::build(k, KGramStats::from_seed(seed))
	}

	fn build(k: usize, stats: KGramStats) -> Result<Self, ModelError> {
		if k < 1 {
			return Err(ModelError::InvalidParameter(format!(
				"k must be >= 1, got {k}"
			)));
		}
		Ok(Self { k, stats })
	}

	/// Context length this model was constructed with.
	pub fn k(&self) -> usize {
		self.k
	}

	/// Read access to the underlying statistics tables.
	pub fn stats(&self) -> &KGramStats {
		&self.stats
	}

	/// Trains the model on `text`, accumulating into the existing tables.
	///
	/// Slides a k-character window over the text (UTF-8 aware) and records
	/// each (window, following character) pair. Text shorter than `k`
	/// characters is ignored. The final window has no following character
	/// and records nothing, so the last k-gram of a text gains no frequency
	/// entry of its own.
	pub fn train(&mut self, text: &str) {
		let chars: Vec<char> = text.chars().collect();
		if chars.len() < self.k {
			// Too short to form a single window
			return;
		}

		for i in 0..chars.len() - self.k {
			let kgram: String = chars[i..i + self.k].iter().collect();
			self.stats.record_transition(&kgram, chars[i + self.k]);
		}

		log::debug!(
			"trained on {} chars, {} distinct k-grams known",
			chars.len(),
			self.stats.kgram_count()
		);
	}

	/// Generates text of at least `length` characters.
	///
	/// Seeds the output with a frequency-weighted random k-gram, then
	/// extends it one character at a time: sample a next character for the
	/// current k-gram, append it, and roll the window forward. Whenever the
	/// rolling window reaches a k-gram never seen in training (a dead end),
	/// a fresh random k-gram is drawn and generation continues from there
	/// instead of terminating early.
	///
	/// Returns an empty string for `length == 0`. For a trained model the
	/// output length is exactly `max(k, length)`: the seed k-gram is always
	/// emitted whole, even when `length < k`.
	///
	/// # Errors
	/// Returns [`ModelError::Untrained`] if no training occurred (or all
	/// training text was shorter than `k`).
	pub fn generate_text(&mut self, length: usize) -> Result<String, ModelError> {
		if length == 0 {
			return Ok(String::new());
		}

		let mut current = self.stats.sample_random_kgram()?;
		let mut result = current.clone();

		for _ in 0..length.saturating_sub(self.k) {
			if !self.stats.has_kgram(&current) {
				// Dead end: teleport to a fresh seed and keep going.
				log::trace!("dead end at {current:?}, reseeding");
				current = self.stats.sample_random_kgram()?;
			}

			// A recorded k-gram always has at least one transition.
			let next_char = self
				.stats
				.sample_next_char(&current)
				.ok_or(ModelError::Untrained)?;

			result.push(next_char);
			current.remove(0);
			current.push(next_char);
		}

		Ok(result)
	}
}
