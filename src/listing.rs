//! Markdown album listing parser.
//!
//! The listing looks like:
//!
//! ```text
//! ## album: "Fearless" (2008)
//! Fearless
//! Fifteen
//! (bonus tracks)
//! Untouchable
//! ```
//!
//! Header lines open an album; every following plain line is a track of that
//! album until the next header.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{Album, Track};
use crate::normalize::sanitize_for_path;

const HEADER_PREFIX: &str = "## album:";

/// `## album: "<title>" (<yyyy>)`
pub static ALBUM_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^## album: "([^"]+)" \((\d{4})\)"#).unwrap());

/// Result of parsing a listing.
///
/// Malformed headers and track lines seen before any album do not stop the
/// parse; their 1-based line numbers are kept so callers can report them.
#[derive(Clone, Debug, Default)]
pub struct Listing {
    pub albums: Vec<Album>,
    pub malformed_headers: Vec<usize>,
    pub orphan_lines: Vec<usize>,
}

impl Listing {
    pub fn total_tracks(&self) -> usize {
        self.albums.iter().map(|a| a.tracks.len()).sum()
    }
}

/// Bonus-track annotations are wrapped in a single pair of parentheses.
fn is_annotation(line: &str) -> bool {
    line.starts_with('(') && line.ends_with(')')
}

pub fn parse_listing(text: &str) -> Listing {
    let mut listing = Listing::default();
    let mut current: Option<Album> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_no = idx + 1;

        if line.starts_with(HEADER_PREFIX) {
            let Some(caps) = ALBUM_HEADER.captures(line) else {
                listing.malformed_headers.push(line_no);
                continue;
            };
            if let Some(done) = current.take() {
                listing.albums.push(done);
            }
            let title = caps[1].to_string();
            let year = caps[2].to_string();
            debug!("Found album: {} ({})", title, year);
            current = Some(Album {
                sanitized_title: sanitize_for_path(&title),
                title,
                year,
                tracks: Vec::new(),
            });
            continue;
        }

        if line.is_empty() || line.starts_with('#') || is_annotation(line) {
            continue;
        }

        match current.as_mut() {
            Some(album) => {
                let number = album.tracks.len() as u32 + 1;
                debug!("  Track {}: {}", number, line);
                album.tracks.push(Track {
                    number,
                    title: line.to_string(),
                    sanitized_title: sanitize_for_path(line),
                });
            }
            None => listing.orphan_lines.push(line_no),
        }
    }

    if let Some(done) = current {
        listing.albums.push(done);
    }

    listing
}
