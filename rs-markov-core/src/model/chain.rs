use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{MarkovError, MarkovResult};
use crate::io::read_file;
use super::index::MarkovIndex;
use super::tokenizer::{self, Mode, Token};

/// A trainable variable-order Markov chain.
///
/// This struct manages:
/// - `mode`: how text is cut into tokens (characters or words).
/// - `smoothing`: a constant added to every recorded count when drawing.
/// - `index`: the context => continuation statistics.
/// - `sentences`: normalized training units, used to avoid re-generating them.
///
/// Generation never mutates the chain; see [`Generator`](super::generator::Generator).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkovChain {
	mode: Mode,
	smoothing: usize,
	index: MarkovIndex,
	sentences: HashSet<String>,
}

impl MarkovChain {
	/// Returns an empty chain in character mode, without smoothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns an empty chain using the given tokenization mode.
	pub fn with_mode(mode: Mode) -> Self {
		Self { mode, ..Self::default() }
	}

	pub fn mode(&self) -> Mode {
		self.mode
	}

	/// Changes the tokenization mode.
	///
	/// Statistics collected under one mode mean nothing under another, so a
	/// change clears everything learned so far. Setting the current mode is
	/// a no-op.
	pub fn set_mode(&mut self, mode: Mode) {
		if mode == self.mode {
			return;
		}
		info!("switching mode {:?} -> {:?}, dropping {} contexts", self.mode, mode, self.index.len());
		self.index.clear();
		self.sentences.clear();
		self.mode = mode;
	}

	pub fn smoothing(&self) -> usize {
		self.smoothing
	}

	/// Sets the additive smoothing constant.
	///
	/// It is added to the count of every continuation already recorded for
	/// a context; unseen continuations stay impossible.
	pub fn set_smoothing(&mut self, smoothing: usize) {
		self.smoothing = smoothing;
	}

	/// Read-only access to the collected statistics.
	pub fn index(&self) -> &MarkovIndex {
		&self.index
	}

	/// Returns `true` once something has been learned.
	pub fn is_trained(&self) -> bool {
		!self.index.is_empty()
	}

	/// Splits `text` with the chain's mode.
	pub fn split(&self, text: &str) -> Vec<Token> {
		tokenizer::split(text, self.mode)
	}

	/// Reassembles `tokens` with the chain's mode.
	pub fn assemble<S: AsRef<str>>(&self, tokens: &[S]) -> String {
		tokenizer::assemble(tokens, self.mode)
	}

	/// Learns from one training unit (a word, a line, a sentence...).
	///
	/// # Behavior
	/// - Tokenizes `text` with the current mode and terminates it with the sentinel.
	/// - Records every context of length 1 to `depth` (clamped to the
	///   number of tokens) with its continuation.
	/// - Empty or whitespace-only (in word mode) text is ignored.
	/// - A `depth` of 0 is treated as 1.
	///
	/// Training never fails; repeated calls accumulate.
	pub fn train(&mut self, text: &str, depth: usize) {
		let tokens = tokenizer::split_terminated(text, self.mode);
		if tokens.is_empty() {
			debug!("nothing to learn from {:?}", text);
			return;
		}
		if depth == 0 {
			warn!("training depth 0 requested, using 1");
		}

		self.index.train(&tokens, depth);
		let sentence = self.normalize(text);
		self.sentences.insert(sentence);
		debug!("trained on {} tokens, index now holds {} contexts", tokens.len() - 1, self.index.len());
	}

	/// Learns from every line of a text file.
	///
	/// Each line is one training unit. Returns the number of lines read.
	///
	/// # Errors
	/// Returns `MarkovError::Io` if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P, depth: usize) -> MarkovResult<usize> {
		let lines = read_file(&path)?;
		for line in &lines {
			self.train(line, depth);
		}
		info!("trained on {} lines from {}", lines.len(), path.as_ref().display());
		Ok(lines.len())
	}

	/// Returns `true` if `text` matches a training unit.
	///
	/// The comparison ignores case and, in word mode, whitespace layout.
	pub fn contains(&self, text: &str) -> bool {
		self.sentences.contains(&self.normalize(text))
	}

	fn normalize(&self, text: &str) -> String {
		self.assemble(&self.split(text)).to_lowercase()
	}

	/// Merges another chain into this one.
	///
	/// Observation counts are summed and training units are combined. The
	/// smoothing constant of `self` is kept.
	///
	/// # Errors
	/// Returns `ModeMismatch` if the chains do not use the same mode.
	pub fn merge(&mut self, other: &Self) -> MarkovResult<()> {
		if self.mode != other.mode {
			return Err(MarkovError::ModeMismatch { expected: self.mode, found: other.mode });
		}

		self.index.merge(&other.index);
		self.sentences.extend(other.sentences.iter().cloned());
		Ok(())
	}
}
