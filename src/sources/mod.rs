//! Lyrics sources.
//!
//! A source turns (artist, title) into raw lyrics text or nothing. Sources
//! never fail outward: network, status and parse problems are logged and
//! reported as `None` so one bad page cannot stop a batch.

pub mod azlyrics;
pub mod genius;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use scraper::ElementRef;
use thiserror::Error;

use crate::config::SourceSettings;

pub use azlyrics::AzLyrics;
pub use genius::Genius;

/// Lookup of raw lyrics text on one website.
pub trait LyricsSource {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Raw lyrics for the song, or `None` when the source has nothing usable.
    fn lookup(&self, artist: &str, title: &str) -> Option<String>;
}

/// Errors inside a source. Converted to a logged `None` at the trait boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Blocking HTTP client shared by all sources.
pub fn build_client(settings: &SourceSettings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Text of an element: text nodes trimmed, empties dropped, joined by newlines.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
