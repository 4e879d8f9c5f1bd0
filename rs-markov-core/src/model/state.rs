use std::collections::BTreeMap;

use rand::Rng;

use crate::error::{MarkovError, MarkovResult};
use super::tokenizer::Token;

/// Observed continuations of a single context.
///
/// A `State` is a node of the Markov chain: its outgoing edges are the
/// tokens seen right after the context, weighted by how many times they
/// were observed.
///
/// ## Responsibilities:
/// - Accumulate continuation occurrences during training
/// - Draw a continuation by weighted random sampling
/// - Merge with another state (summing counts)
///
/// ## Invariants
/// - Each recorded occurrence count is strictly positive
/// - Continuations are enumerated in lexicographic order of their content,
///   which fixes tie-breaking in the weighted draw
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Continuation token => number of observations.
	/// Example: { "" => 2, "e" => 42, "a" => 3 }
	transitions: BTreeMap<Token, usize>,
}

impl State {
	/// Creates an empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `next`.
	pub fn add_transition(&mut self, next: &str) {
		if let Some(occurrence) = self.transitions.get_mut(next) {
			*occurrence += 1;
		} else {
			self.transitions.insert(next.to_owned(), 1);
		}
	}

	/// Number of times `next` was observed, 0 if never.
	pub fn count(&self, next: &str) -> usize {
		self.transitions.get(next).copied().unwrap_or(0)
	}

	/// Sum of all occurrence counts.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Iterates over `(continuation, count)` in draw order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Draws a continuation with probability proportional to
	/// `count + smoothing`.
	///
	/// Picks `r` uniformly in `[1, total]` and walks the continuations in
	/// order, subtracting each weight until `r` is exhausted.
	///
	/// Returns `Ok(None)` if the state has no continuation, or if every weight is 0.
	///
	/// # Errors
	/// Returns `WeightOverflow` if a weight or their sum does not fit in a `usize`.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R, smoothing: usize) -> MarkovResult<Option<&str>> {
		let mut total: usize = 0;
		for occurrence in self.transitions.values() {
			total = occurrence
				.checked_add(smoothing)
				.and_then(|weight| total.checked_add(weight))
				.ok_or(MarkovError::WeightOverflow { smoothing })?;
		}
		if total == 0 {
			return Ok(None);
		}

		let mut r = rng.random_range(1..=total);
		for (next, occurrence) in &self.transitions {
			// cannot overflow, bounded by total
			let weight = occurrence + smoothing;
			if r <= weight {
				return Ok(Some(next.as_str()));
			}
			r -= weight;
		}

		// r <= total, the loop always returns
		Ok(None)
	}

	/// Merges another state into this one by summing counts.
	pub fn merge(&mut self, other: &Self) {
		for (next, occurrence) in &other.transitions {
			*self.transitions.entry(next.clone()).or_insert(0) += *occurrence;
		}
	}
}
