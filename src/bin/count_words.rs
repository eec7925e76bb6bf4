//! Count occurrences of a fixed word list across the lyrics tree.
//!
//! Usage: count-words [--words a,b,c] [--output site/counts.json]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use lyrics_tools::config::{
    default_words, parse_word_list, ProjectLayout, DEFAULT_LYRICS_DIR, DEFAULT_WORD_COUNT_OUTPUT,
};
use lyrics_tools::logging;
use lyrics_tools::safety::validate_output_path;
use lyrics_tools::wordcount::{count_words, save_report};

#[derive(Parser)]
#[command(name = "count-words")]
#[command(about = "Analyze lyrics for specific word occurrences")]
struct Args {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show only errors
    #[arg(short, long)]
    quiet: bool,

    /// Run without saving output
    #[arg(short = 'n', long)]
    dry_run: bool,

    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(long, default_value = DEFAULT_LYRICS_DIR)]
    lyrics_dir: String,

    #[arg(long, default_value = DEFAULT_WORD_COUNT_OUTPUT)]
    output: PathBuf,

    /// Comma-separated words to count (defaults to the built-in list)
    #[arg(long)]
    words: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let layout = ProjectLayout {
        lyrics_dir: args.lyrics_dir,
        word_count_output: args.output,
        ..ProjectLayout::new(args.root)
    };
    let words = args
        .words
        .as_deref()
        .map(parse_word_list)
        .unwrap_or_else(default_words);

    let lyrics_dir = layout.lyrics_path();
    if !lyrics_dir.is_dir() {
        error!("Lyrics directory not found: {}", lyrics_dir.display());
        return Ok(());
    }
    let output = layout.word_count_path();
    validate_output_path(&output, "json", &[], &[&lyrics_dir])?;

    info!("Analyzing lyrics for words: {:?}", words);
    let report = count_words(&lyrics_dir, &words)?;

    info!("=== SUMMARY ===");
    for (key, album) in &report.albums {
        if album.total_count == 0 {
            continue;
        }
        info!("{}: {} total instances", key, album.total_count);
        for (word, n) in album.word_counts.iter().filter(|(_, n)| *n > 0) {
            info!("  - {}: {}", word, n);
        }
    }
    info!("Total instances across all albums: {}", report.total_count());

    if args.dry_run {
        info!("DRY RUN: Would save results to {}", layout.display_path(&output));
    } else {
        save_report(&report, &output)?;
        info!("Results saved to: {}", layout.display_path(&output));
    }

    Ok(())
}
