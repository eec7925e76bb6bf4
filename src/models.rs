//! Core data models shared by the three pipelines.
//!
//! Albums and tracks come out of the listing parser; the manifest records are
//! their serialized form with derived paths; the word-count records are the
//! counter's output.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Listing Models
// ============================================================================

/// Album parsed from the markdown listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Album {
    pub title: String,
    /// Four-digit year, kept as text
    pub year: String,
    pub sanitized_title: String,
    pub tracks: Vec<Track>,
}

/// Track within an album. `number` is 1-based in listing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub number: u32,
    pub title: String,
    pub sanitized_title: String,
}

/// Folder of an album relative to the project root:
/// `<lyrics_dir>/YEAR=<year>/ALBUM=<sanitized album>`.
pub fn album_folder_path(lyrics_dir: &str, year: &str, album_sanitized: &str) -> String {
    format!("{}/YEAR={}/ALBUM={}", lyrics_dir, year, album_sanitized)
}

/// File name of a track: zero-padded number and sanitized title.
pub fn track_file_name(number: u32, track_sanitized: &str) -> String {
    format!("{:02}_{}.md", number, track_sanitized)
}

/// Track file path relative to the project root. Pure function of its inputs;
/// the builder and the manifest both go through here.
pub fn track_file_path(
    lyrics_dir: &str,
    year: &str,
    album_sanitized: &str,
    number: u32,
    track_sanitized: &str,
) -> String {
    format!(
        "{}/{}",
        album_folder_path(lyrics_dir, year, album_sanitized),
        track_file_name(number, track_sanitized)
    )
}

impl Album {
    pub fn folder_path(&self, lyrics_dir: &str) -> String {
        album_folder_path(lyrics_dir, &self.year, &self.sanitized_title)
    }

    pub fn track_path(&self, lyrics_dir: &str, track: &Track) -> String {
        track_file_path(
            lyrics_dir,
            &self.year,
            &self.sanitized_title,
            track.number,
            &track.sanitized_title,
        )
    }
}

// ============================================================================
// Manifest
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub total_albums: usize,
    pub total_tracks: usize,
    pub albums: Vec<AlbumRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumRecord {
    pub title: String,
    pub year: String,
    pub sanitized_title: String,
    pub track_count: usize,
    pub folder_path: String,
    pub tracks: Vec<TrackRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackRecord {
    pub number: u32,
    pub title: String,
    pub sanitized_title: String,
    pub file_path: String,
}

impl Manifest {
    pub fn from_albums(albums: &[Album], lyrics_dir: &str) -> Self {
        let records: Vec<AlbumRecord> = albums
            .iter()
            .map(|album| AlbumRecord {
                title: album.title.clone(),
                year: album.year.clone(),
                sanitized_title: album.sanitized_title.clone(),
                track_count: album.tracks.len(),
                folder_path: album.folder_path(lyrics_dir),
                tracks: album
                    .tracks
                    .iter()
                    .map(|track| TrackRecord {
                        number: track.number,
                        title: track.title.clone(),
                        sanitized_title: track.sanitized_title.clone(),
                        file_path: album.track_path(lyrics_dir, track),
                    })
                    .collect(),
            })
            .collect();

        Self {
            total_albums: records.len(),
            total_tracks: records.iter().map(|a| a.tracks.len()).sum(),
            albums: records,
        }
    }
}

// ============================================================================
// Word Counts
// ============================================================================

/// Per-word counts in word-list order. Serialized as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordCounts(pub Vec<(String, u64)>);

impl WordCounts {
    pub fn zeroed(words: &[String]) -> Self {
        Self(words.iter().map(|w| (w.clone(), 0)).collect())
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, n)| *n)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(w, n)| (w.as_str(), *n))
    }
}

impl Serialize for WordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, count) in &self.0 {
            map.serialize_entry(word, count)?;
        }
        map.end()
    }
}

/// Word-count summary for one album directory.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct AlbumWordCount {
    pub year: u32,
    pub album: String,
    pub total_songs: usize,
    pub word_counts: WordCounts,
    pub total_count: u64,
}

impl AlbumWordCount {
    /// Key used in the output JSON: `"<year> - <album>"`.
    pub fn key(&self) -> String {
        format!("{} - {}", self.year, self.album)
    }
}
