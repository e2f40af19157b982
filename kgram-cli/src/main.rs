use std::path::PathBuf;

use clap::Parser;

use kgram_core::error::ModelError;
use kgram_core::io::read_file;
use kgram_core::model::language_model::LanguageModel;

/// Train a character-level k-gram model on a text file and print freshly
/// generated text.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Context length (k-gram size), must be >= 1
    k: usize,

    /// Path to the training corpus
    input: PathBuf,

    /// Number of characters to generate, must be >= 1
    length: usize,

    /// Seed for reproducible output (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // The core treats length 0 as "produce empty output"; at the command
    // line that is a usage error.
    if args.length < 1 {
        return Err(Box::new(ModelError::InvalidParameter(
            "output length must be >= 1".to_owned(),
        )));
    }

    // Rejects k < 1 with InvalidParameter.
    let mut model = match args.seed {
        Some(seed) => LanguageModel::with_seed(args.k, seed)?,
        None => LanguageModel::new(args.k)?,
    };

    let text = read_file(&args.input)?;
    model.train(&text);
    log::info!(
        "trained k={} model on {}, {} distinct k-grams",
        args.k,
        args.input.display(),
        model.stats().kgram_count()
    );

    println!("{}", model.generate_text(args.length)?);
    Ok(())
}
