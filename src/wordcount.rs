//! Word occurrence counter over the lyrics tree.
//!
//! Counting is case-insensitive and substring based: "shithead" counts toward
//! "shit". No word boundaries, no stemming.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{AlbumWordCount, WordCounts};

/// Albums keyed by `"<year> - <album>"`.
///
/// Years are four digits, so key order is (year, album) order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct WordCountReport {
    pub albums: BTreeMap<String, AlbumWordCount>,
}

impl WordCountReport {
    pub fn total_count(&self) -> u64 {
        self.albums.values().map(|a| a.total_count).sum()
    }
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> u64 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as u64
}

/// Sorted child entries of `dir` whose name starts with `prefix`, with the
/// rest of the name.
fn prefixed_children(dir: &Path, prefix: &str, want_dirs: bool) -> Result<Vec<(PathBuf, String)>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if entry.file_type().is_dir() != want_dirs {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(rest) = name.strip_prefix(prefix) {
            out.push((entry.path().to_path_buf(), rest.to_string()));
        }
    }
    Ok(out)
}

fn track_files(album_dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(prefixed_children(album_dir, "", false)?
        .into_iter()
        .map(|(path, _)| path)
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .collect())
}

fn count_album(album_dir: &Path, words: &[String]) -> Result<(usize, WordCounts)> {
    let mut counts = WordCounts::zeroed(words);
    let mut total_songs = 0;

    for file in track_files(album_dir)? {
        total_songs += 1;
        let bytes = fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
        let content = String::from_utf8_lossy(&bytes).to_lowercase();

        for (word, total) in counts.0.iter_mut() {
            let n = count_occurrences(&content, &word.to_lowercase());
            *total += n;
            if n > 0 {
                debug!(
                    "  Found {} instance(s) of '{}' in {}",
                    n,
                    word,
                    file.file_name().unwrap_or_default().to_string_lossy()
                );
            }
        }
    }

    Ok((total_songs, counts))
}

/// Count every word in every `YEAR=*/ALBUM=*/*.md` file under `lyrics_dir`.
pub fn count_words(lyrics_dir: &Path, words: &[String]) -> Result<WordCountReport> {
    if !lyrics_dir.is_dir() {
        bail!("Lyrics directory not found: {}", lyrics_dir.display());
    }

    let mut report = WordCountReport::default();

    for (year_dir, year_text) in prefixed_children(lyrics_dir, "YEAR=", true)? {
        let Ok(year) = year_text.parse::<u32>() else {
            warn!("Skipping directory with non-numeric year: {}", year_dir.display());
            continue;
        };

        for (album_dir, album_text) in prefixed_children(&year_dir, "ALBUM=", true)? {
            let album = album_text.replace('_', " ");
            info!("Processing album: {} - {}", year, album);

            let (total_songs, word_counts) = count_album(&album_dir, words)?;
            let record = AlbumWordCount {
                year,
                album,
                total_songs,
                total_count: word_counts.total(),
                word_counts,
            };
            if record.total_count > 0 {
                info!("  Total instances: {}", record.total_count);
            }
            report.albums.insert(record.key(), record);
        }
    }

    Ok(report)
}

pub fn save_report(report: &WordCountReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("Failed to serialize word counts")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
