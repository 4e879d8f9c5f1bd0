use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MarkovError, MarkovResult};
use super::chain::MarkovChain;
use super::prediction_input::{PredictionInput, StartSeed};
use super::tokenizer::{Token, is_sentinel};

/// Samples new text from a trained [`MarkovChain`].
///
/// # Responsibilities
/// - Own the random source used for every draw (seedable for reproducible runs)
/// - Walk the chain's index from the start seed until the end sentinel is drawn
/// - Shrink the lookup context when no exact match is recorded
/// - Retry generations that reproduce a training unit, when asked to
///
/// The chain is only borrowed, so any number of generators can sample from
/// the same trained chain.
#[derive(Debug)]
pub struct Generator<R = StdRng> {
	rng: R,
}

impl Generator<StdRng> {
	/// Creates a generator seeded from the operating system.
	pub fn new() -> Self {
		Self { rng: StdRng::from_os_rng() }
	}

	/// Creates a reproducible generator.
	pub fn seeded(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl Default for Generator<StdRng> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: Rng> Generator<R> {
	/// Creates a generator drawing from `rng`.
	pub fn with_rng(rng: R) -> Self {
		Self { rng }
	}

	/// Generates one text unit, using at most `depth` trailing tokens as context.
	///
	/// # Errors
	/// - `InvalidDepth` if `depth` is 0.
	/// - `InsufficientIndex` if the chain has nothing to continue from
	///   (never trained, or trained under another mode).
	pub fn generate(&mut self, chain: &MarkovChain, depth: usize) -> MarkovResult<String> {
		let input = PredictionInput::with_depth(depth)?;
		self.predict(chain, &input)
	}

	/// Generates one text unit with the full set of parameters.
	///
	/// # Behavior
	/// - Generates a sequence from the configured start seed.
	/// - If `nb_try > 0` and the result already exists in the training
	///   data, generates again, at most `nb_try` more times.
	/// - Returns the last attempt when every attempt was a duplicate.
	///
	/// # Errors
	/// - `InvalidDepth` / `InvalidLength` if `input` breaks its invariants.
	/// - `InsufficientIndex` if a lookup fails even after shrinking the context.
	/// - `LengthLimit` if `max_tokens` is reached before the end sentinel, or
	///   if the start seed alone is already longer than it.
	/// - `WeightOverflow` if the smoothing constant is too large to draw with.
	pub fn predict(&mut self, chain: &MarkovChain, input: &PredictionInput) -> MarkovResult<String> {
		input.validate()?;

		let mut text = self.internal_predict(chain, input)?;
		let mut nb_try = input.nb_try;
		while nb_try > 0 && chain.contains(&text) {
			debug!("{:?} already in training data, retrying ({} left)", text, nb_try);
			text = self.internal_predict(chain, input)?;
			nb_try -= 1;
		}
		Ok(text)
	}

	fn internal_predict(&mut self, chain: &MarkovChain, input: &PredictionInput) -> MarkovResult<String> {
		let mut result = self.start(chain, &input.start_seed)?;
		if let Some(limit) = input.max_tokens() {
			if result.len() > limit {
				return Err(MarkovError::LengthLimit { limit });
			}
		}

		loop {
			let from = result.len().saturating_sub(input.depth());
			let next = self.draw(chain, &result[from..])?;
			if is_sentinel(next) {
				break;
			}

			if let Some(limit) = input.max_tokens() {
				if result.len() >= limit {
					warn!("generation stopped at {} tokens without reaching an end", limit);
					return Err(MarkovError::LengthLimit { limit });
				}
			}
			result.push(next.to_owned());
		}

		trace!("generated {} tokens", result.len());
		Ok(chain.assemble(&result))
	}

	/// Builds the tokens a generation starts from.
	///
	/// An empty result means "start from the anchor".
	fn start(&mut self, chain: &MarkovChain, seed: &StartSeed) -> MarkovResult<Vec<Token>> {
		match seed {
			StartSeed::Anchor => Ok(Vec::new()),
			StartSeed::Custom(text) => Ok(chain.split(text)),
			StartSeed::Random(n) => chain
				.index()
				.random_context(*n, &mut self.rng)
				.map(<[Token]>::to_vec)
				.ok_or_else(|| MarkovError::InsufficientIndex { context: String::new() }),
		}
	}

	/// Resolves `context` (shrinking it if needed) and draws its continuation.
	fn draw<'c>(&mut self, chain: &'c MarkovChain, context: &[Token]) -> MarkovResult<&'c str> {
		let Some((matched, state)) = chain.index().resolve(context) else {
			return Err(MarkovError::InsufficientIndex { context: chain.assemble(context) });
		};
		if matched.len() < context.len() {
			trace!("context shrunk from {} to {} tokens", context.len(), matched.len());
		}

		state
			.predict(&mut self.rng, chain.smoothing())?
			.ok_or_else(|| MarkovError::InsufficientIndex { context: chain.assemble(matched) })
	}
}
