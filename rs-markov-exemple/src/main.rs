use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rs_markov_core::{Generator, MarkovChain, Mode, PredictionInput, StartSeed};

#[derive(Clone, Copy, ValueEnum)]
enum Granularity {
    Characters,
    Words,
}

impl From<Granularity> for Mode {
    fn from(value: Granularity) -> Self {
        match value {
            Granularity::Characters => Mode::Characters,
            Granularity::Words => Mode::Words,
        }
    }
}

/// Learns a Markov chain from a text file (one unit per line) and prints new units.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Training corpus, one unit per line
    corpus: PathBuf,

    /// Tokenize by characters or by words
    #[arg(short, long, value_enum, default_value = "characters")]
    mode: Granularity,

    /// Maximum context depth, for training and generation
    #[arg(short, long, default_value_t = rs_markov_core::DEFAULT_DEPTH)]
    depth: usize,

    /// Number of units to generate
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Additive smoothing constant
    #[arg(long, default_value_t = 0)]
    smoothing: usize,

    /// Retries when the generated unit already exists in the corpus
    #[arg(long, default_value_t = 100)]
    nb_try: usize,

    /// Start every unit with this text
    #[arg(long)]
    prefix: Option<String>,

    /// Give up on a unit after this many tokens
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut chain = MarkovChain::with_mode(args.mode.into());
    chain.set_smoothing(args.smoothing);
    let lines = chain.train_file(&args.corpus, args.depth)?;
    log::info!("{} contexts learned from {} lines", chain.index().len(), lines);

    let mut input = PredictionInput::with_depth(args.depth)?;
    input.nb_try = args.nb_try;
    input.set_max_tokens(args.max_tokens)?;
    if let Some(prefix) = args.prefix {
        input.start_seed = StartSeed::Custom(prefix);
    }

    let mut generator = match args.seed {
        Some(seed) => Generator::seeded(seed),
        None => Generator::new(),
    };

    for i in 0..args.count {
        match generator.predict(&chain, &input) {
            Ok(text) => {
                let known = if chain.contains(&text) { " (already in corpus)" } else { "" };
                println!("Generated unit {}: {}{}", i + 1, text, known);
            }
            Err(err) => eprintln!("Generation {} failed: {}", i + 1, err),
        }
    }

    Ok(())
}
