use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

use lyrics_tools::config::{ProjectLayout, DEFAULT_LISTING, DEFAULT_LYRICS_DIR, DEFAULT_MANIFEST};
use lyrics_tools::listing::parse_listing;
use lyrics_tools::logging;
use lyrics_tools::models::Manifest;
use lyrics_tools::progress::format_duration;
use lyrics_tools::safety::validate_output_path;
use lyrics_tools::structure::{build_structure, save_manifest};

#[derive(Parser)]
#[command(name = "lyrics-structure")]
#[command(about = "Parse the studio albums listing and create the lyrics folder structure")]
#[command(long_about = "Parse the studio albums listing and create:\n  \
    1. lyrics/YEAR=YYYY/ALBUM=Name/XX_Track_Title.md (empty files)\n  \
    2. albums_metadata.json describing every album and track")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show only errors
    #[arg(short, long)]
    quiet: bool,

    /// Run without creating files/folders
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Project root; relative paths below resolve against it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Markdown album listing
    #[arg(long, default_value = DEFAULT_LISTING)]
    input: PathBuf,

    /// Lyrics directory name under the root
    #[arg(long, default_value = DEFAULT_LYRICS_DIR)]
    lyrics_dir: String,

    /// Manifest output
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let layout = ProjectLayout {
        listing: args.input,
        lyrics_dir: args.lyrics_dir,
        manifest: args.output,
        ..ProjectLayout::new(args.root)
    };

    let start = Instant::now();
    let input = layout.listing_path();
    if !input.is_file() {
        error!("Input file not found: {}", input.display());
        return Ok(());
    }

    let manifest_path = layout.manifest_path();
    validate_output_path(&manifest_path, "json", &[&input], &[&layout.lyrics_path()])?;

    info!("Processing: {}", layout.display_path(&input));
    let text = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let listing = parse_listing(&text);

    for line in &listing.malformed_headers {
        warn!("Ignoring malformed album header on line {}", line);
    }
    if !listing.orphan_lines.is_empty() {
        warn!(
            "Dropped {} track line(s) before the first album header (lines {:?})",
            listing.orphan_lines.len(),
            listing.orphan_lines
        );
    }
    info!("Found {} albums", listing.albums.len());

    let created = build_structure(&listing.albums, &layout, args.dry_run)?;
    info!("Created {} track files", created.len());

    let manifest = Manifest::from_albums(&listing.albums, &layout.lyrics_dir);
    if args.dry_run {
        info!("DRY RUN: Would save metadata to: {}", layout.display_path(&manifest_path));
    } else {
        save_manifest(&manifest, &manifest_path)?;
        info!("Saved metadata to: {}", layout.display_path(&manifest_path));
    }
    info!("Total tracks processed: {}", manifest.total_tracks);

    info!("{:=<60}", "");
    info!("Summary:");
    for album in &manifest.albums {
        info!("  {} ({}): {} tracks", album.title, album.year, album.track_count);
    }
    info!("  Elapsed: {}", format_duration(start.elapsed()));
    info!("{:=<60}", "");

    Ok(())
}
