use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, MarkovResult};

/// Context depth used when none is given.
pub const DEFAULT_DEPTH: usize = 2;

/// Strategy used to pick the tokens a generated sequence starts from.
///
/// # Variants
/// - `Anchor`: draw the first token from the empty (start-of-sequence) context.
/// - `Custom(String)`: start from the given text, tokenized with the chain's
///   mode. The seed is part of the generated output. An empty seed behaves
///   like `Anchor`.
/// - `Random(usize)`: start from a recorded context of the given length
///   picked at random (`0` picks the length at random too).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub enum StartSeed {
	#[default]
	Anchor,
	Custom(String),
	Random(usize),
}

/// Generation parameters.
///
/// # Responsibilities
/// - Hold the maximum context depth used for lookups
/// - Hold the start seed strategy
/// - Hold the number of retries used to avoid reproducing a training unit
/// - Hold the optional token-count safety bound
///
/// # Invariants
/// - `depth >= 1`
/// - `max_tokens`, when set, is `>= 1`
///
/// Both are enforced by the setters; a deserialized input is checked by
/// [`PredictionInput::validate`] before generation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PredictionInput {
	/// Maximum number of trailing tokens used as lookup context.
	depth: usize,

	/// Number of extra attempts when the generated text already exists in
	/// the training data. `0` returns the first generation as is.
	pub nb_try: usize,

	/// How the generated sequence starts.
	pub start_seed: StartSeed,

	/// Fails the generation once this many tokens were produced without
	/// drawing the end sentinel. `None` means unbounded.
	max_tokens: Option<usize>,
}

impl Default for PredictionInput {
	fn default() -> Self {
		Self { depth: DEFAULT_DEPTH, nb_try: 0, start_seed: StartSeed::Anchor, max_tokens: None }
	}
}

impl PredictionInput {
	/// Creates an input with the default parameters and the given depth.
	///
	/// # Errors
	/// Returns `InvalidDepth` if `depth` is 0.
	pub fn with_depth(depth: usize) -> MarkovResult<Self> {
		let mut input = Self::default();
		input.set_depth(depth)?;
		Ok(input)
	}

	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Sets the maximum lookup depth.
	///
	/// # Errors
	/// Returns `InvalidDepth` if `depth` is 0.
	pub fn set_depth(&mut self, depth: usize) -> MarkovResult<()> {
		if depth == 0 {
			return Err(MarkovError::InvalidDepth(depth));
		}
		self.depth = depth;
		Ok(())
	}

	pub fn max_tokens(&self) -> Option<usize> {
		self.max_tokens
	}

	/// Sets (or removes, with `None`) the generation length bound.
	///
	/// # Errors
	/// Returns `InvalidLength` for `Some(0)`.
	pub fn set_max_tokens(&mut self, max_tokens: Option<usize>) -> MarkovResult<()> {
		if max_tokens == Some(0) {
			return Err(MarkovError::InvalidLength(0));
		}
		self.max_tokens = max_tokens;
		Ok(())
	}

	/// Checks the invariants, for inputs that did not go through the setters.
	pub fn validate(&self) -> MarkovResult<()> {
		if self.depth == 0 {
			return Err(MarkovError::InvalidDepth(self.depth));
		}
		if self.max_tokens == Some(0) {
			return Err(MarkovError::InvalidLength(0));
		}
		Ok(())
	}
}
