//! Genius: search API first, then scrape the song page.

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{element_text, LyricsSource, SourceError};
use crate::normalize::{clean_artist_name, clean_song_title};

pub const SEARCH_URL: &str = "https://genius.com/api/search/multi";

static LYRICS_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div[data-lyrics-container="true"]"#).unwrap());

pub struct Genius {
    client: Client,
    search_url: String,
}

impl Genius {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, SEARCH_URL)
    }

    /// Point the search endpoint elsewhere (mirrors, local servers).
    pub fn with_base_url(client: Client, search_url: impl Into<String>) -> Self {
        Self {
            client,
            search_url: search_url.into(),
        }
    }

    fn search(&self, artist: &str, title: &str) -> Result<Option<String>, SourceError> {
        let query = format!("{} {}", clean_artist_name(artist), clean_song_title(title));
        debug!("Genius search: {}", query);

        let data: Value = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.as_str())])
            .send()?
            .error_for_status()?
            .json()?;

        match first_song_url(&data) {
            Some(url) => self.fetch_page(&url),
            None => {
                warn!("No results found for: {} - {}", artist, title);
                Ok(None)
            }
        }
    }

    fn fetch_page(&self, url: &str) -> Result<Option<String>, SourceError> {
        let html = self.client.get(url).send()?.error_for_status()?.text()?;
        let lyrics = extract_lyrics(&html);
        if lyrics.is_none() {
            warn!("No lyrics container found at {}", url);
        }
        Ok(lyrics)
    }
}

impl LyricsSource for Genius {
    fn name(&self) -> &str {
        "genius"
    }

    fn lookup(&self, artist: &str, title: &str) -> Option<String> {
        self.search(artist, title).unwrap_or_else(|e| {
            error!("Error searching Genius for {} - {}: {}", artist, title, e);
            None
        })
    }
}

/// URL of the first hit in the first "song" section that has hits.
pub fn first_song_url(data: &Value) -> Option<String> {
    data.get("response")?
        .get("sections")?
        .as_array()?
        .iter()
        .filter(|section| section.get("type").and_then(Value::as_str) == Some("song"))
        .find_map(|section| {
            let hit = section.get("hits")?.as_array()?.first()?;
            hit.get("result")?.get("url")?.as_str().map(str::to_string)
        })
}

/// Text of every lyrics container, containers separated by a blank line.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let parts: Vec<String> = document
        .select(&LYRICS_CONTAINER)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}
