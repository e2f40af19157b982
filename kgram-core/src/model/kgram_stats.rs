use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::ModelError;

/// Transition statistics for a fixed-order character Markov model.
///
/// A `KGramStats` owns two tables built incrementally during training:
/// - `kgram_freq`: how many times each k-gram was observed as a window
/// - `transitions`: per k-gram, how many times each next character followed
///
/// Conceptually each k-gram is a node in a Markov chain whose outgoing
/// edges are weighted by observation counts.
///
/// # Responsibilities
/// - Accumulate transition occurrences during learning
/// - Sample the next character for a k-gram by weighted random draw
/// - Sample a seed k-gram weighted by observed frequency
/// - Answer membership queries
///
/// # Invariants
/// - For every recorded k-gram C, the sum of `transitions[C]` counts equals
///   `kgram_freq[C]`
/// - All counts are strictly positive; both tables are append-only
/// - Both tables iterate in ascending order (`BTreeMap`), which is the
///   documented order for cumulative sampling and its rounding fallback
///
/// The component is length-agnostic: it never checks that keys have any
/// particular size. Window discipline belongs to [`LanguageModel`].
///
/// [`LanguageModel`]: super::language_model::LanguageModel
#[derive(Debug)]
pub struct KGramStats {
	/// Times each k-gram was observed as a training window.
	kgram_freq: BTreeMap<String, usize>,
	/// Outgoing transitions indexed by k-gram, then by next character.
	/// Example: { "th" => { 'e' => 42, 'a' => 3 } }
	transitions: BTreeMap<String, BTreeMap<char, usize>>,
	/// Single generator reused across all sampling calls for this instance.
	rng: SmallRng,
}

impl KGramStats {
	/// Creates empty statistics with a generator seeded from OS entropy.
	///
	/// Two instances created this way produce different sampling streams;
	/// use [`KGramStats::from_seed`] for reproducible runs.
	pub fn new() -> Self {
		Self {
			kgram_freq: BTreeMap::new(),
			transitions: BTreeMap::new(),
			rng: SmallRng::from_os_rng(),
		}
	}

	/// Creates empty statistics with a deterministic generator.
	///
	/// Given the same seed and the same sequence of calls, sampling is
	/// fully reproducible.
	pub fn from_seed(seed: u64) -> Self {
		Self {
			kgram_freq: BTreeMap::new(),
			transitions: BTreeMap::new(),
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Records one observation of `next_char` following `kgram`.
	///
	/// Increments both the k-gram frequency and the transition count,
	/// creating entries on first sight. Infallible.
	pub fn record_transition(&mut self, kgram: &str, next_char: char) {
		*self.kgram_freq.entry(kgram.to_owned()).or_insert(0) += 1;
		*self
			.transitions
			.entry(kgram.to_owned())
			.or_default()
			.entry(next_char)
			.or_insert(0) += 1;
	}

	/// Samples the next character for `kgram` by weighted random draw.
	///
	/// The probability of each character is its count divided by the total
	/// count for the k-gram. A uniform draw in `[0, 1)` is compared against
	/// the cumulative mass in ascending character order; if rounding leaves
	/// the draw uncovered, the last character in order is returned.
	///
	/// Returns `None` if `kgram` was never recorded. Callers that need to
	/// distinguish "unknown k-gram" should use [`KGramStats::has_kgram`]
	/// rather than treating `None` as a generated value.
	pub fn sample_next_char(&mut self, kgram: &str) -> Option<char> {
		let dist = self.transitions.get(kgram)?;
		let total: usize = dist.values().sum();

		let draw: f64 = self.rng.random();

		let mut cumulative = 0.0;
		let mut fallback = None;
		for (&next_char, &count) in dist {
			cumulative += count as f64 / total as f64;
			if draw <= cumulative {
				return Some(next_char);
			}
			fallback = Some(next_char);
		}

		// Rounding fallback: the cumulative sum can undershoot 1.0.
		fallback
	}

	/// Samples a k-gram weighted by how often it was observed in training.
	///
	/// Uses the same cumulative technique as [`KGramStats::sample_next_char`],
	/// iterating k-grams in ascending order with the last one as the
	/// rounding fallback.
	///
	/// # Errors
	/// Returns [`ModelError::Untrained`] if no k-gram was ever recorded.
	pub fn sample_random_kgram(&mut self) -> Result<String, ModelError> {
		if self.kgram_freq.is_empty() {
			return Err(ModelError::Untrained);
		}

		let total: usize = self.kgram_freq.values().sum();
		let draw = self.rng.random::<f64>() * total as f64;

		let mut cumulative = 0.0;
		let mut fallback = None;
		for (kgram, &count) in &self.kgram_freq {
			cumulative += count as f64;
			if draw <= cumulative {
				return Ok(kgram.clone());
			}
			fallback = Some(kgram);
		}

		// Rounding fallback; the table is non-empty here.
		fallback.cloned().ok_or(ModelError::Untrained)
	}

	/// Returns true if `kgram` was observed at least once during training.
	pub fn has_kgram(&self, kgram: &str) -> bool {
		self.kgram_freq.contains_key(kgram)
	}

	/// Times `kgram` was observed as a window, or `None` if never.
	pub fn kgram_frequency(&self, kgram: &str) -> Option<usize> {
		self.kgram_freq.get(kgram).copied()
	}

	/// Times `next_char` was observed following `kgram`, or `None`.
	pub fn transition_count(&self, kgram: &str, next_char: char) -> Option<usize> {
		self.transitions.get(kgram)?.get(&next_char).copied()
	}

	/// Sum of all transition counts recorded for `kgram`.
	///
	/// Equals [`KGramStats::kgram_frequency`] for every recorded k-gram.
	pub fn transition_total(&self, kgram: &str) -> Option<usize> {
		Some(self.transitions.get(kgram)?.values().sum())
	}

	/// Number of distinct k-grams observed so far.
	pub fn kgram_count(&self) -> usize {
		self.kgram_freq.len()
	}

	/// True until the first transition is recorded.
	pub fn is_empty(&self) -> bool {
		self.kgram_freq.is_empty()
	}
}

impl Default for KGramStats {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn record_transition_updates_both_tables() {
		let mut stats = KGramStats::from_seed(1);
		stats.record_transition("ab", 'c');
		stats.record_transition("ab", 'c');
		stats.record_transition("ab", 'd');

		assert_eq!(stats.kgram_frequency("ab"), Some(3));
		assert_eq!(stats.transition_count("ab", 'c'), Some(2));
		assert_eq!(stats.transition_count("ab", 'd'), Some(1));
		assert_eq!(stats.transition_total("ab"), Some(3));
	}

	#[test]
	fn frequency_matches_transition_sum() {
		let mut stats = KGramStats::from_seed(2);
		for (kgram, next) in [("ab", 'x'), ("ab", 'y'), ("cd", 'z'), ("ab", 'x')] {
			stats.record_transition(kgram, next);
		}

		for kgram in ["ab", "cd"] {
			assert_eq!(stats.kgram_frequency(kgram), stats.transition_total(kgram));
		}
	}

	#[test]
	fn sample_next_char_absent_kgram_is_none() {
		let mut stats = KGramStats::from_seed(3);
		stats.record_transition("ab", 'c');

		assert_eq!(stats.sample_next_char("zz"), None);
		assert!(!stats.has_kgram("zz"));
	}

	#[test]
	fn sample_next_char_single_transition_is_certain() {
		let mut stats = KGramStats::from_seed(4);
		stats.record_transition("ab", 'c');

		for _ in 0..50 {
			assert_eq!(stats.sample_next_char("ab"), Some('c'));
		}
	}

	#[test]
	fn sample_next_char_stays_within_recorded_set() {
		let mut stats = KGramStats::from_seed(5);
		stats.record_transition("th", 'e');
		stats.record_transition("th", 'a');
		stats.record_transition("th", 'o');

		for _ in 0..200 {
			let c = stats.sample_next_char("th").unwrap();
			assert!(['e', 'a', 'o'].contains(&c), "sampled unrecorded char {c:?}");
		}
	}

	#[test]
	fn sample_random_kgram_untrained_errors() {
		let mut stats = KGramStats::from_seed(6);
		assert!(matches!(
			stats.sample_random_kgram(),
			Err(ModelError::Untrained)
		));
	}

	#[test]
	fn sample_random_kgram_stays_within_recorded_set() {
		let mut stats = KGramStats::from_seed(7);
		stats.record_transition("ab", 'c');
		stats.record_transition("bc", 'd');

		for _ in 0..100 {
			let kgram = stats.sample_random_kgram().unwrap();
			assert!(kgram == "ab" || kgram == "bc");
		}
	}

	#[test]
	fn seeded_instances_sample_identically() {
		let mut a = KGramStats::from_seed(42);
		let mut b = KGramStats::from_seed(42);
		for stats in [&mut a, &mut b] {
			stats.record_transition("ab", 'x');
			stats.record_transition("ab", 'y');
			stats.record_transition("ba", 'z');
		}

		for _ in 0..100 {
			assert_eq!(a.sample_next_char("ab"), b.sample_next_char("ab"));
			assert_eq!(
				a.sample_random_kgram().unwrap(),
				b.sample_random_kgram().unwrap()
			);
		}
	}
}
