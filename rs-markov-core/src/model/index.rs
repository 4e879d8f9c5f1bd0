use std::collections::HashMap;

use log::trace;
use rand::Rng;
use rand::prelude::IteratorRandom;

use super::state::State;
use super::tokenizer::{Context, SENTINEL, Token, is_sentinel};

/// Variable-order Markov index.
///
/// Maps a context (the empty anchor, or 1..depth tokens) to the `State`
/// holding every continuation observed right after it.
///
/// # Responsibilities
/// - Decompose training sequences into (context, continuation) observations
///   for every depth up to the requested one
/// - Resolve a lookup context, shrinking it from the front when unknown
/// - Merge with another index
///
/// # Invariants
/// - Every stored state has at least one continuation
/// - If a context of length `n > 1` is stored, its suffix of length `n - 1` is too
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkovIndex {
	states: HashMap<Context, State>,
}

impl MarkovIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of distinct contexts, the empty anchor included.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	pub(crate) fn clear(&mut self) {
		self.states.clear();
	}

	/// Length of the longest recorded context.
	pub fn max_depth(&self) -> usize {
		self.states.keys().map(Vec::len).max().unwrap_or(0)
	}

	/// Returns the state recorded for exactly `context`.
	pub fn get<S: AsRef<str>>(&self, context: &[S]) -> Option<&State> {
		let key: Context = context.iter().map(|token| token.as_ref().to_owned()).collect();
		self.states.get(&key)
	}

	/// Number of times `next` was observed after `context`.
	pub fn count<S: AsRef<str>>(&self, context: &[S], next: &str) -> usize {
		self.get(context).map_or(0, |state| state.count(next))
	}

	/// Sum of every recorded observation.
	pub fn total_observations(&self) -> usize {
		self.states.values().map(State::total).sum()
	}

	/// Records a training sequence.
	///
	/// `tokens` is the sequence of real tokens. Sentinels are dropped before
	/// windowing, so the trailing one appended by `split_terminated` (or any
	/// other) never ends a sequence early.
	///
	/// For every depth `dep` in `1..=min(depth, len)`, each window of `dep`
	/// tokens is recorded with the token following it, the last window of
	/// each depth being followed by the sentinel. The empty anchor context
	/// records the first token once.
	///
	/// An empty sequence is a no-op. A depth of 0 is treated as 1.
	pub fn train(&mut self, tokens: &[Token], depth: usize) {
		let tokens = match tokens.split_last() {
			Some((last, head)) if is_sentinel(last) => head,
			_ => tokens,
		};
		let filtered: Vec<Token>;
		let tokens = if tokens.iter().any(|t| is_sentinel(t)) {
			filtered = tokens.iter().filter(|t| !is_sentinel(t)).cloned().collect();
			&filtered[..]
		} else {
			tokens
		};
		if tokens.is_empty() {
			return;
		}

		let depth = depth.clamp(1, tokens.len());

		self.record(&[], &tokens[0]);
		for dep in 1..=depth {
			for pos in 0..=tokens.len() - dep {
				let next = tokens.get(pos + dep).map_or(SENTINEL, String::as_str);
				self.record(&tokens[pos..pos + dep], next);
			}
		}
	}

	fn record(&mut self, context: &[Token], next: &str) {
		if let Some(state) = self.states.get_mut(context) {
			state.add_transition(next);
		} else {
			let mut state = State::new();
			state.add_transition(next);
			self.states.insert(context.to_vec(), state);
		}
	}

	/// Finds the longest recorded suffix of `context`.
	///
	/// The context is shrunk from the front, one token at a time, down to a
	/// single token. An empty context is looked up as the anchor directly.
	///
	/// Returns the matched suffix and its state, or `None` if nothing of
	/// length >= 1 (or the anchor, for an empty context) is recorded.
	pub fn resolve<'s, 'c>(&'s self, context: &'c [Token]) -> Option<(&'c [Token], &'s State)> {
		if context.is_empty() {
			return self.states.get(context).filter(|state| !state.is_empty()).map(|state| (context, state));
		}

		let mut candidate = context;
		loop {
			if let Some(state) = self.states.get(candidate).filter(|state| !state.is_empty()) {
				return Some((candidate, state));
			}
			if candidate.len() <= 1 {
				return None;
			}
			trace!("context of length {} unknown, shrinking", candidate.len());
			candidate = &candidate[1..];
		}
	}

	/// Picks a recorded context of length `n` uniformly at random.
	///
	/// - `n == 0` picks a random length among the recorded ones first
	/// - `n` larger than the longest recorded context is clamped to it
	///
	/// Candidates are sorted before drawing so a seeded generator always
	/// returns the same context. Returns `None` if nothing beyond the anchor
	/// is recorded.
	pub fn random_context<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Option<&[Token]> {
		let longest = self.max_depth();
		if longest == 0 {
			return None;
		}
		let n = if n == 0 { rng.random_range(1..=longest) } else { n.min(longest) };

		let mut candidates: Vec<&Context> = self.states.keys().filter(|key| key.len() == n).collect();
		candidates.sort();
		candidates.into_iter().choose(rng).map(Vec::as_slice)
	}

	/// Merges another index into this one, summing counts of shared
	/// (context, continuation) pairs.
	pub fn merge(&mut self, other: &Self) {
		for (context, state) in &other.states {
			if let Some(existing) = self.states.get_mut(context) {
				existing.merge(state);
			} else {
				self.states.insert(context.clone(), state.clone());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::tokenizer::{Mode, split, split_terminated};
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn trained(text: &str, depth: usize) -> MarkovIndex {
		let mut index = MarkovIndex::new();
		index.train(&split_terminated(text, Mode::Characters), depth);
		index
	}

	#[test]
	fn empty_sequence_is_a_noop() {
		let mut index = MarkovIndex::new();
		index.train(&[], 3);
		index.train(&split_terminated("", Mode::Characters), 3);
		assert!(index.is_empty());
	}

	#[test]
	fn records_windows_and_boundaries() {
		let index = trained("abc", 2);

		let empty: [&str; 0] = [];
		assert_eq!(index.count(&empty, "a"), 1);

		assert_eq!(index.count(&["a"], "b"), 1);
		assert_eq!(index.count(&["b"], "c"), 1);
		assert_eq!(index.count(&["c"], SENTINEL), 1);

		assert_eq!(index.count(&["a", "b"], "c"), 1);
		assert_eq!(index.count(&["b", "c"], SENTINEL), 1);

		// anchor + 3 singles + 2 pairs
		assert_eq!(index.len(), 6);
		assert_eq!(index.total_observations(), 6);
	}

	#[test]
	fn anchor_recorded_once_whatever_the_depth() {
		let index = trained("abcd", 4);
		let empty: [&str; 0] = [];
		assert_eq!(index.count(&empty, "a"), 1);
		assert_eq!(index.get(&empty).map(State::total), Some(1));
	}

	#[test]
	fn end_boundary_recorded_per_depth() {
		let index = trained("abc", 3);
		assert_eq!(index.count(&["c"], SENTINEL), 1);
		assert_eq!(index.count(&["b", "c"], SENTINEL), 1);
		assert_eq!(index.count(&["a", "b", "c"], SENTINEL), 1);
	}

	#[test]
	fn depth_is_clamped_to_sequence_length() {
		assert_eq!(trained("ab", 5), trained("ab", 2));
		assert_eq!(trained("ab", 5).max_depth(), 2);
	}

	#[test]
	fn depth_zero_trains_as_depth_one() {
		assert_eq!(trained("abc", 0), trained("abc", 1));
	}

	#[test]
	fn unterminated_sequence_is_accepted() {
		let mut index = MarkovIndex::new();
		index.train(&split("abc", Mode::Characters), 2);
		assert_eq!(index, trained("abc", 2));
	}

	#[test]
	fn interior_sentinels_are_ignored() {
		let tokens: Vec<Token> = ["a", SENTINEL, "b", SENTINEL, SENTINEL].iter().map(|t| t.to_string()).collect();
		let mut index = MarkovIndex::new();
		index.train(&tokens, 2);
		assert_eq!(index, trained("ab", 2));
		assert_eq!(index.count(&["a"], SENTINEL), 0);

		let mut only_sentinels = MarkovIndex::new();
		only_sentinels.train(&[SENTINEL.to_owned()], 2);
		assert!(only_sentinels.is_empty());
	}

	#[test]
	fn repeated_character_counts() {
		let index = trained("aaaa", 2);
		assert_eq!(index.count(&["a"], "a"), 3);
		assert_eq!(index.count(&["a"], SENTINEL), 1);
		assert_eq!(index.count(&["a", "a"], "a"), 2);
		assert_eq!(index.count(&["a", "a"], SENTINEL), 1);
	}

	#[test]
	fn training_accumulates() {
		let mut index = trained("ab", 1);
		index.train(&split_terminated("ab", Mode::Characters), 1);
		assert_eq!(index.count(&["a"], "b"), 2);
		let empty: [&str; 0] = [];
		assert_eq!(index.count(&empty, "a"), 2);
	}

	#[test]
	fn resolve_exact_match() {
		let index = trained("abc", 2);
		let context: Vec<Token> = split("ab", Mode::Characters);
		let (matched, state) = index.resolve(&context).unwrap();
		assert_eq!(matched, context.as_slice());
		assert_eq!(state.count("c"), 1);
	}

	#[test]
	fn resolve_shrinks_from_the_front() {
		let index = trained("abc", 2);
		// "xb" was never seen, "b" was
		let context: Vec<Token> = split("xb", Mode::Characters);
		let (matched, state) = index.resolve(&context).unwrap();
		assert_eq!(matched, &context[1..]);
		assert_eq!(state.count("c"), 1);
	}

	#[test]
	fn resolve_fails_when_nothing_matches() {
		let index = trained("abc", 2);
		let context: Vec<Token> = split("xy", Mode::Characters);
		assert!(index.resolve(&context).is_none());
		assert!(MarkovIndex::new().resolve(&[]).is_none());
	}

	#[test]
	fn resolve_empty_context_hits_the_anchor() {
		let index = trained("abc", 2);
		let (matched, state) = index.resolve(&[]).unwrap();
		assert!(matched.is_empty());
		assert_eq!(state.count("a"), 1);
	}

	#[test]
	fn random_context_respects_length() {
		let index = trained("abcdef", 3);
		let mut rng = StdRng::seed_from_u64(3);
		for n in 1..=3 {
			let context = index.random_context(n, &mut rng).unwrap();
			assert_eq!(context.len(), n);
		}
		assert_eq!(index.random_context(10, &mut rng).unwrap().len(), 3);
		let any = index.random_context(0, &mut rng).unwrap();
		assert!((1..=3).contains(&any.len()));
		assert!(MarkovIndex::new().random_context(1, &mut rng).is_none());
	}

	#[test]
	fn random_context_is_reproducible() {
		let index = trained("the cat sat on the mat", 2);
		let first = index.random_context(2, &mut StdRng::seed_from_u64(9)).map(<[Token]>::to_vec);
		let second = index.random_context(2, &mut StdRng::seed_from_u64(9)).map(<[Token]>::to_vec);
		assert_eq!(first, second);
	}

	#[test]
	fn merge_matches_sequential_training() {
		let mut merged = trained("abc", 2);
		merged.merge(&trained("abd", 2));

		let mut sequential = trained("abc", 2);
		sequential.train(&split_terminated("abd", Mode::Characters), 2);

		assert_eq!(merged, sequential);
	}
}
