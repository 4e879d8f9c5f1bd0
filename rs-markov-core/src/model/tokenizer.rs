use serde::{Deserialize, Serialize};

/// An atomic unit of text: one character or one whitespace-delimited word.
pub type Token = String;

/// Ordered sequence of tokens used as a lookup key in the index.
pub type Context = Vec<Token>;

/// Empty token marking the end of a sequence.
///
/// The empty context plays the matching "start of sequence" role. Real
/// tokens are never empty, so the sentinel cannot collide with input.
pub const SENTINEL: &str = "";

/// Granularity at which text is cut into tokens.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
	/// One token per `char`.
	#[default]
	Characters,
	/// One token per whitespace-delimited word.
	Words,
}

/// Returns `true` if `token` is the end sentinel.
pub fn is_sentinel(token: &str) -> bool {
	token == SENTINEL
}

/// Splits `text` into tokens according to `mode`.
///
/// - `Characters`: one token per character, nothing filtered.
/// - `Words`: split on runs of whitespace, no empty tokens.
///
/// Empty input (or whitespace-only input in word mode) yields an empty sequence.
pub fn split(text: &str, mode: Mode) -> Vec<Token> {
	match mode {
		Mode::Characters => text.chars().map(String::from).collect(),
		Mode::Words => text.split_whitespace().map(str::to_owned).collect(),
	}
}

/// Same as [`split`], with the end sentinel appended to non-empty sequences.
///
/// The last real token then maps to the sentinel like any other continuation.
pub fn split_terminated(text: &str, mode: Mode) -> Vec<Token> {
	let mut tokens = split(text, mode);
	if !tokens.is_empty() {
		tokens.push(SENTINEL.to_owned());
	}
	tokens
}

/// Reassembles tokens into text.
///
/// Characters are concatenated, words are joined with a single space.
/// Sentinels are skipped.
pub fn assemble<S: AsRef<str>>(tokens: &[S], mode: Mode) -> String {
	let separator = match mode {
		Mode::Characters => "",
		Mode::Words => " ",
	};

	let mut text = String::new();
	for token in tokens.iter().map(AsRef::as_ref).filter(|t| !is_sentinel(t)) {
		if !text.is_empty() {
			text.push_str(separator);
		}
		text.push_str(token);
	}
	text
}
