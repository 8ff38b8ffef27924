//! emoji-similar: query emoji sharing descriptive meaning with a given
//! emoji, against a directory of annotation payloads.
//!
//! The directory is expected to contain `<locale>.json` annotation files
//! and an `emoji.json` metadata table.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use libemoji_core::{EmojiMatcher, FsAnnotationSource, MatcherConfig};

#[derive(Parser)]
#[command(name = "emoji-similar")]
struct Args {
    /// Directory with <locale>.json payloads and emoji.json metadata
    #[arg(long)]
    data_dir: PathBuf,

    /// Preferred languages, most preferred first
    #[arg(long, num_args = 1.., default_value = "en")]
    languages: Vec<String>,

    /// Maximum number of results
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Print names only, without the matched-token list
    #[arg(long)]
    no_keywords: bool,

    /// The query emoji (or emoji sequence)
    query: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let config = MatcherConfig::new(args.languages.clone());
    let source = Arc::new(FsAnnotationSource::new(args.data_dir.clone()));
    let matcher = EmojiMatcher::new(&config, source)
        .with_context(|| format!("loading annotations from {}", args.data_dir.display()))?;

    let results = matcher.similar_with(&args.query, args.limit, !args.no_keywords);
    if results.is_empty() {
        println!("no match for {:?}", args.query);
        return Ok(());
    }
    for entry in results {
        println!("{entry}");
    }
    Ok(())
}
