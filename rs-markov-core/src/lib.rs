//! Variable-order Markov chain text generation library.
//!
//! This crate provides:
//! - Character-level and word-level tokenization
//! - A Markov index recording every context length up to a given depth
//! - Generation with context shrinking and weighted random draws
//! - Typed errors for every way generation can fail
//!
//! ```
//! use rs_markov_core::{Generator, MarkovChain, Mode};
//!
//! let mut chain = MarkovChain::with_mode(Mode::Words);
//! chain.train("the cat sat on the mat", 2);
//!
//! let text = Generator::seeded(7).generate(&chain, 2).unwrap();
//! assert!(text.starts_with("the"));
//! ```

/// Error type shared by the whole crate.
pub mod error;

/// Markov chain, index, tokenizer and generator.
pub mod model;

/// I/O utilities (corpus loading).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, MarkovResult};
pub use model::chain::MarkovChain;
pub use model::generator::Generator;
pub use model::index::MarkovIndex;
pub use model::prediction_input::{DEFAULT_DEPTH, PredictionInput, StartSeed};
pub use model::tokenizer::{Mode, SENTINEL, Token};
