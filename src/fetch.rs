//! Lyrics fetch orchestrator.
//!
//! Walks the manifest, asks each source in turn for a track's lyrics, cleans
//! the text and writes it under a small metadata header. Requests go out one
//! at a time with a fixed delay in between.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, error, info, warn};

use crate::cleanup::clean_lyrics;
use crate::config::{CleanupRules, FetchOptions};
use crate::models::{AlbumRecord, Manifest, TrackRecord};
use crate::progress::create_track_bar;
use crate::sources::LyricsSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Lyrics written; `source` names the source that supplied them.
    Fetched { source: String },
    /// File already had content and `force` was off. No request made.
    Skipped,
    /// No source produced usable lyrics. File left untouched.
    NotFound,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub processed: usize,
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Lyrics file body: header block, separator, cleaned lyrics.
pub fn format_lyrics_file(album: &AlbumRecord, track: &TrackRecord, lyrics: &str) -> String {
    format!(
        "# {}\n\nAlbum: {}\nTrack: {}\nYear: {}\n\n---\n\n{}\n",
        track.title, album.title, track.number, album.year, lyrics
    )
}

fn has_content(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

pub struct Fetcher {
    root: PathBuf,
    /// Tried in order until one returns text.
    sources: Vec<Box<dyn LyricsSource>>,
    rules: CleanupRules,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(
        root: impl Into<PathBuf>,
        sources: Vec<Box<dyn LyricsSource>>,
        rules: CleanupRules,
        options: FetchOptions,
    ) -> Self {
        Self {
            root: root.into(),
            sources,
            rules,
            options,
        }
    }

    pub fn track_path(&self, track: &TrackRecord) -> PathBuf {
        self.root.join(&track.file_path)
    }

    fn should_skip(&self, path: &Path) -> bool {
        !self.options.force && has_content(path)
    }

    fn pause(&self) {
        if !self.options.request_delay.is_zero() {
            thread::sleep(self.options.request_delay);
        }
    }

    fn album_selected(&self, album: &AlbumRecord) -> bool {
        if let Some(filter) = &self.options.album_filter {
            if !album.title.to_lowercase().contains(&filter.to_lowercase()) {
                return false;
            }
        }
        if let Some(year) = &self.options.year_filter {
            if &album.year != year {
                return false;
            }
        }
        true
    }

    /// Fetch, clean and save lyrics for one track.
    ///
    /// Only fails when writing the file fails; source problems are a
    /// `NotFound` outcome.
    pub fn fetch_track(&self, album: &AlbumRecord, track: &TrackRecord) -> Result<FetchOutcome> {
        let path = self.track_path(track);
        if self.should_skip(&path) {
            debug!("Skipping (already has content): {}", track.title);
            return Ok(FetchOutcome::Skipped);
        }

        debug!("Fetching lyrics for: {} ({})", track.title, album.title);

        let mut found = None;
        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 {
                self.pause();
            }
            if let Some(raw) = source.lookup(&self.options.artist, &track.title) {
                found = Some((source.name().to_string(), raw));
                break;
            }
        }

        let Some((source, raw)) = found else {
            warn!("Could not find lyrics for: {}", track.title);
            return Ok(FetchOutcome::NotFound);
        };

        let lyrics = clean_lyrics(&raw, &track.title, &self.rules);
        if lyrics.is_empty() {
            warn!("Lyrics from {} were empty after cleanup: {}", source, track.title);
            return Ok(FetchOutcome::NotFound);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, format_lyrics_file(album, track, &lyrics))
            .with_context(|| format!("Failed to write lyrics to {}", path.display()))?;
        debug!("Saved lyrics to: {}", track.file_path);

        Ok(FetchOutcome::Fetched { source })
    }

    /// Process every selected track of the manifest.
    ///
    /// A `limit` of zero means no limit.
    pub fn run(&self, manifest: &Manifest) -> FetchStats {
        let mut stats = FetchStats::default();
        let mut hit_network = false;
        let limit = self.options.limit.filter(|&n| n > 0);
        let limit_reached = |stats: &FetchStats| limit.is_some_and(|n| stats.processed >= n);

        'albums: for album in manifest.albums.iter().filter(|a| self.album_selected(a)) {
            if limit_reached(&stats) {
                break;
            }
            let banner = format!("ALBUM: {} ({})", album.title, album.year);
            info!("{}", "=".repeat(banner.chars().count()));
            info!("{}", banner);
            info!("{}", "=".repeat(banner.chars().count()));

            let pb = create_track_bar(album.tracks.len(), &album.title);
            for track in &album.tracks {
                if limit_reached(&stats) {
                    pb.abandon();
                    break 'albums;
                }
                stats.processed += 1;

                let path = self.track_path(track);
                if self.options.dry_run {
                    if self.should_skip(&path) {
                        info!("DRY RUN: Would skip (already has content): {}", track.title);
                    } else {
                        info!("DRY RUN: Would fetch lyrics for: {}", track.title);
                    }
                    pb.inc(1);
                    continue;
                }

                if hit_network && !self.should_skip(&path) {
                    self.pause();
                }

                match self.fetch_track(album, track) {
                    Ok(FetchOutcome::Fetched { source }) => {
                        hit_network = true;
                        stats.fetched += 1;
                        info!("Fetched lyrics from {}: {}", source, track.title);
                    }
                    Ok(FetchOutcome::Skipped) => stats.skipped += 1,
                    Ok(FetchOutcome::NotFound) => {
                        hit_network = true;
                        stats.failed += 1;
                    }
                    Err(e) => {
                        hit_network = true;
                        stats.failed += 1;
                        error!("{:#}", e);
                    }
                }
                pb.inc(1);
            }
            pb.finish();
        }
        if limit_reached(&stats) {
            info!("Reached limit of {} tracks", stats.processed);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Album, Track};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    struct CannedSource {
        name: &'static str,
        reply: Option<String>,
        calls: Rc<Cell<usize>>,
    }

    impl LyricsSource for CannedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn lookup(&self, _artist: &str, _title: &str) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.reply.clone()
        }
    }

    fn canned(name: &'static str, reply: Option<&str>) -> (Box<dyn LyricsSource>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let source = CannedSource {
            name,
            reply: reply.map(str::to_string),
            calls: Rc::clone(&calls),
        };
        (Box::new(source), calls)
    }

    fn album(title: &str, year: &str, tracks: &[&str]) -> Album {
        Album {
            title: title.to_string(),
            year: year.to_string(),
            sanitized_title: title.to_string(),
            tracks: tracks
                .iter()
                .enumerate()
                .map(|(i, t)| Track {
                    number: i as u32 + 1,
                    title: t.to_string(),
                    sanitized_title: t.replace(' ', "_"),
                })
                .collect(),
        }
    }

    fn manifest() -> Manifest {
        Manifest::from_albums(
            &[
                album("Red", "2012", &["State of Grace", "Red", "Treacherous"]),
                album("Folklore", "2020", &["the 1", "cardigan"]),
            ],
            "lyrics",
        )
    }

    fn options() -> FetchOptions {
        FetchOptions {
            request_delay: Duration::ZERO,
            ..FetchOptions::default()
        }
    }

    #[test]
    fn test_skips_file_with_content_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", Some("[Verse]\nnew"));
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), options());

        let album = &manifest.albums[0];
        let track = &album.tracks[0];
        let path = fetcher.track_path(track);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "existing").unwrap();

        assert_eq!(fetcher.fetch_track(album, track).unwrap(), FetchOutcome::Skipped);
        assert_eq!(a_calls.get(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn test_force_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", Some("[Verse]\nnew"));
        let opts = FetchOptions { force: true, ..options() };
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts);

        let album = &manifest.albums[0];
        let track = &album.tracks[0];
        let path = fetcher.track_path(track);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "existing").unwrap();

        let outcome = fetcher.fetch_track(album, track).unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched { source: "a".to_string() });
        assert_eq!(a_calls.get(), 1);
        assert!(fs::read_to_string(&path).unwrap().ends_with("[Verse]\nnew\n"));
    }

    #[test]
    fn test_falls_back_to_second_source() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", None);
        let (b, b_calls) = canned("b", Some("2 Contributors\nRed Lyrics\n[Chorus]\nLoving him was red"));
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), options());

        let album = &manifest.albums[0];
        let track = &album.tracks[1];
        let outcome = fetcher.fetch_track(album, track).unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched { source: "b".to_string() });
        assert_eq!((a_calls.get(), b_calls.get()), (1, 1));

        let written = fs::read_to_string(fetcher.track_path(track)).unwrap();
        assert_eq!(
            written,
            "# Red\n\nAlbum: Red\nTrack: 2\nYear: 2012\n\n---\n\n[Chorus]\nLoving him was red\n"
        );
    }

    #[test]
    fn test_first_source_hit_skips_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, _) = canned("a", Some("[Verse]\nhi"));
        let (b, b_calls) = canned("b", Some("[Verse]\nother"));
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), options());

        let album = &manifest.albums[0];
        fetcher.fetch_track(album, &album.tracks[0]).unwrap();
        assert_eq!(b_calls.get(), 0);
    }

    #[test]
    fn test_not_found_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, _) = canned("a", None);
        let (b, _) = canned("b", None);
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), options());

        let album = &manifest.albums[0];
        let track = &album.tracks[0];
        let path = fetcher.track_path(track);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();

        assert_eq!(fetcher.fetch_track(album, track).unwrap(), FetchOutcome::NotFound);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_boilerplate_only_counts_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, _) = canned("a", Some("5 Contributors\nTranslations\nEspañol"));
        let (b, b_calls) = canned("b", Some("[Verse]\nunused"));
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), options());

        let album = &manifest.albums[0];
        let track = &album.tracks[0];
        assert_eq!(fetcher.fetch_track(album, track).unwrap(), FetchOutcome::NotFound);
        assert_eq!(b_calls.get(), 0);
        assert!(!fetcher.track_path(track).exists());
    }

    #[test]
    fn test_run_counts_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", Some("[Verse]\nla la"));
        let opts = FetchOptions { limit: Some(4), ..options() };
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts);

        let first = fetcher.track_path(&manifest.albums[0].tracks[0]);
        fs::create_dir_all(first.parent().unwrap()).unwrap();
        fs::write(&first, "done").unwrap();

        let stats = fetcher.run(&manifest);
        assert_eq!(
            stats,
            FetchStats { processed: 4, fetched: 3, skipped: 1, failed: 0 }
        );
        assert_eq!(a_calls.get(), 3);
        assert!(fetcher.track_path(&manifest.albums[1].tracks[0]).exists());
        assert!(!fetcher.track_path(&manifest.albums[1].tracks[1]).exists());
    }

    #[test]
    fn test_run_filters() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();

        let (a, a_calls) = canned("a", None);
        let opts = FetchOptions { album_filter: Some("FOLK".to_string()), ..options() };
        let stats = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts).run(&manifest);
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(a_calls.get(), 2);

        let (a, a_calls) = canned("a", None);
        let opts = FetchOptions { year_filter: Some("2012".to_string()), ..options() };
        let stats = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts).run(&manifest);
        assert_eq!(stats.processed, 3);
        assert_eq!(a_calls.get(), 3);

        let (a, a_calls) = canned("a", None);
        let opts = FetchOptions { year_filter: Some("1999".to_string()), ..options() };
        let stats = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts).run(&manifest);
        assert_eq!(stats, FetchStats::default());
        assert_eq!(a_calls.get(), 0);
    }

    #[test]
    fn test_dry_run_makes_no_calls_or_writes() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", Some("[Verse]\nla"));
        let opts = FetchOptions { dry_run: true, ..options() };
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts);

        let stats = fetcher.run(&manifest);
        assert_eq!(stats.processed, 5);
        assert_eq!(stats.fetched + stats.skipped + stats.failed, 0);
        assert_eq!(a_calls.get(), 0);
        assert!(!dir.path().join("lyrics").exists());
    }

    #[test]
    fn test_limit_zero_means_no_limit() {
        let dir = tempfile::tempdir().unwrap();
        let (a, a_calls) = canned("a", None);
        let opts = FetchOptions { limit: Some(0), ..options() };
        let stats = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts).run(&manifest());
        assert_eq!(stats.processed, 5);
        assert_eq!(a_calls.get(), 5);
    }

    #[test]
    fn test_limit_at_album_end_stops_before_next_album() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, a_calls) = canned("a", Some("[Verse]\nla"));
        let opts = FetchOptions { limit: Some(3), ..options() };
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), opts);

        let stats = fetcher.run(&manifest);
        assert_eq!(stats, FetchStats { processed: 3, fetched: 3, skipped: 0, failed: 0 });
        assert_eq!(a_calls.get(), 3);
        assert!(!dir.path().join("lyrics/YEAR=2020").exists());
    }

    const DELAY: Duration = Duration::from_millis(200);

    fn delayed() -> FetchOptions {
        FetchOptions { request_delay: DELAY, ..FetchOptions::default() }
    }

    #[test]
    fn test_fallback_waits_between_sources() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, _) = canned("a", None);
        let (b, _) = canned("b", Some("[Verse]\nx"));
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), delayed());

        let album = &manifest.albums[0];
        let start = Instant::now();
        let outcome = fetcher.fetch_track(album, &album.tracks[0]).unwrap();
        assert_eq!(outcome, FetchOutcome::Fetched { source: "b".to_string() });
        assert!(start.elapsed() >= DELAY, "{:?}", start.elapsed());
    }

    #[test]
    fn test_first_source_hit_and_skip_do_not_wait() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = manifest();
        let (a, _) = canned("a", Some("[Verse]\nx"));
        let (b, _) = canned("b", Some("[Verse]\ny"));
        let fetcher = Fetcher::new(dir.path(), vec![a, b], CleanupRules::default(), delayed());
        let album = &manifest.albums[0];

        let start = Instant::now();
        fetcher.fetch_track(album, &album.tracks[0]).unwrap();
        assert!(start.elapsed() < DELAY / 2, "{:?}", start.elapsed());

        let start = Instant::now();
        assert_eq!(fetcher.fetch_track(album, &album.tracks[0]).unwrap(), FetchOutcome::Skipped);
        assert!(start.elapsed() < DELAY / 2, "{:?}", start.elapsed());
    }

    #[test]
    fn test_run_waits_between_network_tracks_only() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::from_albums(&[album("Lover", "2019", &["Lover", "Paper Rings"])], "lyrics");
        let (a, _) = canned("a", Some("[Verse]\nx"));
        let fetcher = Fetcher::new(dir.path(), vec![a], CleanupRules::default(), delayed());

        let start = Instant::now();
        let stats = fetcher.run(&manifest);
        assert_eq!(stats.fetched, 2);
        assert!(start.elapsed() >= DELAY, "{:?}", start.elapsed());

        // Both files now have content; a rerun makes no requests and never sleeps.
        let start = Instant::now();
        let stats = fetcher.run(&manifest);
        assert_eq!(stats.skipped, 2);
        assert!(start.elapsed() < DELAY / 2, "{:?}", start.elapsed());
    }
}
