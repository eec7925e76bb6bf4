//! Lyrics folder tree and manifest.
//!
//! Creates `YEAR=<y>/ALBUM=<name>/NN_<title>.md` under the lyrics directory
//! and writes the manifest describing the same paths.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{debug, info};

use crate::config::ProjectLayout;
use crate::models::{track_file_name, Album, Manifest};

/// Create album directories and empty track files.
///
/// Existing files are left as they are, so re-running the builder never
/// wipes fetched lyrics. Returns every track path relative to the root, in
/// listing order. With `dry_run` nothing is created.
pub fn build_structure(albums: &[Album], layout: &ProjectLayout, dry_run: bool) -> Result<Vec<String>> {
    let mut created = Vec::new();

    for album in albums {
        let folder = album.folder_path(&layout.lyrics_dir);
        let album_dir = layout.root.join(&folder);

        if dry_run {
            info!("DRY RUN: Would create directory: {}", folder);
        } else {
            fs::create_dir_all(&album_dir)
                .with_context(|| format!("Failed to create directory {}", album_dir.display()))?;
            info!("Created directory: {}", folder);
        }

        for track in &album.tracks {
            let file_name = track_file_name(track.number, &track.sanitized_title);
            if dry_run {
                debug!("  DRY RUN: Would create file: {}", file_name);
            } else {
                touch(&album_dir.join(&file_name))?;
                debug!("  Created file: {}", file_name);
            }
            created.push(album.track_path(&layout.lyrics_dir, track));
        }
    }

    Ok(created)
}

/// Create the file if missing without truncating existing content.
fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to create file {}", path.display()))?;
    Ok(())
}

pub fn save_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    fs::write(path, json).with_context(|| format!("Failed to write manifest {}", path.display()))?;
    Ok(())
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse manifest {}", path.display()))
}
