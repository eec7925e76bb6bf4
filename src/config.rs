//! Explicit configuration values for the three pipelines.
//!
//! Nothing here is read from a global: every component receives the pieces it
//! needs, so tests can swap in temporary directories, short word lists or a
//! zero request delay.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LISTING: &str = "studio-albums.md";
pub const DEFAULT_LYRICS_DIR: &str = "lyrics";
pub const DEFAULT_MANIFEST: &str = "albums_metadata.json";
pub const DEFAULT_WORD_COUNT_OUTPUT: &str = "site/cuss_word_analysis.json";

pub const DEFAULT_ARTIST: &str = "Taylor Swift";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Educational Lyrics Research Script)";

/// Seconds between requests to be respectful to the source sites
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 1.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Lines longer than this may be background prose rather than lyrics
pub const DEFAULT_NARRATIVE_MIN_LEN: usize = 100;

pub const DEFAULT_WORDS: &[&str] = &[
    "whore", "damn", "goddamn", "hell", "bitch", "shit", "fuck", "dickhead",
];

/// Translation menu entries seen on lyrics pages
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "Türkçe", "Español", "Français", "Deutsch", "Italiano",
    "Português", "Polski", "Svenska", "Afrikaans", "srpski",
    "Українська", "Беларуская", "Slovenščina", "日本語", "中文",
    "Русский", "العربية", "हिन्दी", "Nederlands", "Norsk",
];

/// Substrings (lower-case) that mark a long line as descriptive prose
pub const DEFAULT_NARRATIVE_INDICATORS: &[&str] = &[
    "wrote", "was", "were", "dated", "dating", "recorded",
    "released", "produced", "inspired", "about", "song is",
    "track is", "single", "album", "this song", "the song",
];

// ============================================================================
// Project layout
// ============================================================================

/// Where inputs and outputs live, relative to a project root.
#[derive(Clone, Debug)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub listing: PathBuf,
    /// Name of the lyrics directory under `root`; also the prefix of every
    /// manifest path.
    pub lyrics_dir: String,
    pub manifest: PathBuf,
    pub word_count_output: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            listing: PathBuf::from(DEFAULT_LISTING),
            lyrics_dir: DEFAULT_LYRICS_DIR.to_string(),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            word_count_output: PathBuf::from(DEFAULT_WORD_COUNT_OUTPUT),
        }
    }

    /// Resolve a possibly relative path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn listing_path(&self) -> PathBuf {
        self.resolve(&self.listing)
    }

    pub fn lyrics_path(&self) -> PathBuf {
        self.root.join(&self.lyrics_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.manifest)
    }

    pub fn word_count_path(&self) -> PathBuf {
        self.resolve(&self.word_count_output)
    }

    /// Path shown in log lines: relative to the root when possible.
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

// ============================================================================
// Network and fetch settings
// ============================================================================

/// Settings shared by the HTTP-backed lyrics sources.
#[derive(Clone, Debug)]
pub struct SourceSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Per-run options for the fetch orchestrator.
#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub artist: String,
    pub request_delay: Duration,
    pub force: bool,
    pub dry_run: bool,
    pub limit: Option<usize>,
    /// Case-insensitive substring of the album title
    pub album_filter: Option<String>,
    pub year_filter: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.to_string(),
            request_delay: Duration::from_secs_f64(DEFAULT_REQUEST_DELAY_SECS),
            force: false,
            dry_run: false,
            limit: None,
            album_filter: None,
            year_filter: None,
        }
    }
}

// ============================================================================
// Cleanup rules and word list
// ============================================================================

/// Tunables for the lyrics cleanup heuristic.
#[derive(Clone, Debug)]
pub struct CleanupRules {
    pub languages: Vec<String>,
    pub narrative_indicators: Vec<String>,
    pub narrative_min_len: usize,
}

impl Default for CleanupRules {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            narrative_indicators: DEFAULT_NARRATIVE_INDICATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            narrative_min_len: DEFAULT_NARRATIVE_MIN_LEN,
        }
    }
}

/// Parse a comma-separated word list, dropping empty entries and duplicates.
pub fn parse_word_list(s: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in s.split(',').map(|w| w.trim().to_lowercase()) {
        if !word.is_empty() && !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

/// Request delay from a `--delay` value in seconds.
pub fn request_delay(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("Invalid request delay: {} seconds", secs))
}

pub fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|s| s.to_string()).collect()
}
