//! Fetch lyrics for every track in the manifest.
//!
//! Usage: fetch-lyrics [--limit N] [--album NAME] [--year YYYY] [--force]

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

use lyrics_tools::config::{
    request_delay, CleanupRules, FetchOptions, ProjectLayout, SourceSettings, DEFAULT_ARTIST,
    DEFAULT_MANIFEST, DEFAULT_REQUEST_DELAY_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use lyrics_tools::fetch::Fetcher;
use lyrics_tools::logging;
use lyrics_tools::progress::format_duration;
use lyrics_tools::sources::{build_client, AzLyrics, Genius, LyricsSource};
use lyrics_tools::structure::load_manifest;

#[derive(Parser)]
#[command(name = "fetch-lyrics")]
#[command(about = "Fetch lyrics for all tracks in albums_metadata.json")]
#[command(long_about = "Fetch lyrics for all tracks in albums_metadata.json.\n\n\
    Tries Genius first and AZLyrics as a fallback, with a delay between\n\
    requests to be respectful to the source websites.\n\n\
    Examples:\n  \
    fetch-lyrics --limit 5\n  \
    fetch-lyrics --album folklore\n  \
    fetch-lyrics --force")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show only errors
    #[arg(short, long)]
    quiet: bool,

    /// Run without fetching (show what would be done)
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Re-fetch lyrics even if files already have content
    #[arg(short, long)]
    force: bool,

    /// Limit number of tracks to process (0 = no limit)
    #[arg(short = 'L', long)]
    limit: Option<usize>,

    /// Filter to specific album (partial match)
    #[arg(long = "album")]
    album_filter: Option<String>,

    /// Filter to specific year
    #[arg(long = "year")]
    year_filter: Option<String>,

    /// Project root; manifest and lyrics paths resolve against it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(long, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,

    #[arg(long, default_value = DEFAULT_ARTIST)]
    artist: String,

    /// Seconds to wait between requests
    #[arg(long, default_value_t = DEFAULT_REQUEST_DELAY_SECS)]
    delay: f64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let layout = ProjectLayout {
        manifest: args.manifest,
        ..ProjectLayout::new(args.root)
    };

    let start = Instant::now();
    let manifest_path = layout.manifest_path();
    if !manifest_path.is_file() {
        error!("Metadata file not found: {}", manifest_path.display());
        return Ok(());
    }

    let manifest = load_manifest(&manifest_path)?;
    info!(
        "Loaded metadata for {} albums, {} tracks",
        manifest.total_albums, manifest.total_tracks
    );

    let settings = SourceSettings {
        user_agent: args.user_agent,
        timeout: Duration::from_secs(args.timeout),
    };
    let client = build_client(&settings)?;
    let sources: Vec<Box<dyn LyricsSource>> = vec![
        Box::new(Genius::new(client.clone())),
        Box::new(AzLyrics::new(client)),
    ];

    let options = FetchOptions {
        artist: args.artist,
        request_delay: request_delay(args.delay)?,
        force: args.force,
        dry_run: args.dry_run,
        limit: args.limit,
        album_filter: args.album_filter,
        year_filter: args.year_filter,
    };

    let fetcher = Fetcher::new(layout.root.clone(), sources, CleanupRules::default(), options);
    let stats = fetcher.run(&manifest);

    info!("{:=<50}", "");
    info!("Summary:");
    info!("  Total processed: {}", stats.processed);
    info!("  Successfully fetched: {}", stats.fetched);
    info!("  Skipped (already exist): {}", stats.skipped);
    info!("  Failed to fetch: {}", stats.failed);
    info!("  Elapsed: {}", format_duration(start.elapsed()));

    Ok(())
}
