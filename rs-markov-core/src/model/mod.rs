//! Variable-order Markov text generation.
//!
//! This module provides:
//! - Tokenization of text into characters or words (`tokenizer`)
//! - The context => continuation statistics (`MarkovIndex`)
//! - A trainable chain owning the mode and the index (`MarkovChain`)
//! - Generation parameters (`PredictionInput`)
//! - A seedable sampler producing new text (`Generator`)

/// Trainable Markov chain.
///
/// Owns the tokenization mode, the smoothing constant and the index.
pub mod chain;

/// Sampler walking a trained chain to produce new text.
///
/// Handles start seeds, context shrinking and weighted draws.
pub mod generator;

/// Context => continuation statistics over every depth.
pub mod index;

/// Generation parameters: depth, start seed, retries and length bound.
pub mod prediction_input;

/// Observed continuations of a single context.
///
/// Supports weighted random sampling. Re-exported for read access through
/// `MarkovIndex::get`.
mod state;

/// Character and word tokenization.
pub mod tokenizer;

pub use state::State;
