use thiserror::Error;

use crate::model::tokenizer::Mode;

/// Errors returned by the Markov chain and its generator.
///
/// Training never fails; every variant here comes from generation,
/// configuration or corpus loading.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// No recorded context (down to the empty anchor) has a continuation.
	#[error("insufficient index: no continuation recorded for context \"{context}\"")]
	InsufficientIndex { context: String },

	#[error("depth must be >= 1, got {0}")]
	InvalidDepth(usize),

	#[error("max_tokens must be >= 1, got {0}")]
	InvalidLength(usize),

	/// The optional safety bound was reached before the end sentinel was drawn.
	#[error("generation reached the {limit} tokens limit without ending")]
	LengthLimit { limit: usize },

	/// `count + smoothing` weights of a context do not fit in a `usize`.
	#[error("continuation weights overflow with smoothing {smoothing}")]
	WeightOverflow { smoothing: usize },

	#[error("mode mismatch: expected {expected:?}, found {found:?}")]
	ModeMismatch { expected: Mode, found: Mode },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type MarkovResult<T> = Result<T, MarkovError>;
