//! AZLyrics: deterministic song URL, lyrics block after a licence comment.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{ElementRef, Html};
use tracing::{debug, error, warn};

use super::{element_text, LyricsSource, SourceError};
use crate::normalize::url_slug;

pub const BASE_URL: &str = "https://www.azlyrics.com/lyrics";

/// Comment placed right before the lyrics `<div>`.
pub const LYRICS_MARKER: &str = "Usage of azlyrics.com content";

pub struct AzLyrics {
    client: Client,
    base_url: String,
}

impl AzLyrics {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    /// Build song URLs under `base_url` instead of the public site.
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn fetch(&self, artist: &str, title: &str) -> Result<Option<String>, SourceError> {
        let url = song_url_under(&self.base_url, artist, title);
        let response = self.client.get(&url).send()?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("AZLyrics page not found for: {} - {}", artist, title);
            return Ok(None);
        }

        let html = response.error_for_status()?.text()?;
        let lyrics = extract_lyrics(&html);
        if lyrics.is_none() {
            warn!("No lyrics div found on AZLyrics for: {} - {}", artist, title);
        }
        Ok(lyrics)
    }
}

impl LyricsSource for AzLyrics {
    fn name(&self) -> &str {
        "azlyrics"
    }

    fn lookup(&self, artist: &str, title: &str) -> Option<String> {
        self.fetch(artist, title).unwrap_or_else(|e| {
            error!("Error fetching from AZLyrics for {} - {}: {}", artist, title, e);
            None
        })
    }
}

/// `https://www.azlyrics.com/lyrics/<artist>/<title>.html` with alphanumeric slugs.
pub fn song_url(artist: &str, title: &str) -> String {
    song_url_under(BASE_URL, artist, title)
}

fn song_url_under(base_url: &str, artist: &str, title: &str) -> String {
    format!(
        "{}/{}/{}.html",
        base_url.trim_end_matches('/'),
        url_slug(artist),
        url_slug(title)
    )
}

/// Text of the first `<div>` following the licence comment, in document order.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let mut nodes = document.tree.root().descendants();

    nodes.find(|node| {
        node.value()
            .as_comment()
            .is_some_and(|comment| comment.contains(LYRICS_MARKER))
    })?;

    let div = nodes
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div")?;

    let text = element_text(div);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
