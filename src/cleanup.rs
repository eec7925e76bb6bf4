//! Lyrics cleanup heuristic.
//!
//! Scraped lyrics pages start with site chrome: contributor counts, a
//! translation-language menu, a "<Title> Lyrics" heading and sometimes a
//! paragraph of background prose. Lines are dropped until the first line that
//! looks like lyrics; from there everything is kept verbatim.
//!
//! Tuned to one site's layout. Other layouts may be misclassified.

use crate::config::CleanupRules;

/// Substrings that rule a line out as the first lyrics line.
const METADATA_MARKERS: [&str; 3] = ["Contributors", "Translations", "Lyrics"];

fn is_boilerplate(line: &str, title_heading: &str, rules: &CleanupRules) -> bool {
    line.is_empty()
        || line.contains("Contributor")
        || line == "Translations"
        || rules.languages.iter().any(|lang| lang == line)
        || line == title_heading
        || line == "Read More"
}

fn is_lyrics_candidate(line: &str) -> bool {
    line.starts_with('[')
        || line.starts_with('"')
        || !METADATA_MARKERS.iter().any(|m| line.contains(m))
}

/// Long lines mentioning things like "recorded" or "released" are background
/// prose, not the opening lyric.
fn is_narrative(line: &str, rules: &CleanupRules) -> bool {
    if line.chars().count() <= rules.narrative_min_len {
        return false;
    }
    let lower = line.to_lowercase();
    rules
        .narrative_indicators
        .iter()
        .any(|indicator| lower.contains(&indicator.to_lowercase()))
}

/// Strip leading boilerplate from raw lyrics text.
///
/// Returns an empty string when no line qualifies as lyrics.
pub fn clean_lyrics(raw: &str, title: &str, rules: &CleanupRules) -> String {
    let title_heading = format!("{} Lyrics", title);
    let mut kept: Vec<&str> = Vec::new();
    let mut in_metadata = true;

    for line in raw.lines() {
        if !in_metadata {
            kept.push(line);
            continue;
        }

        let stripped = line.trim();
        if is_boilerplate(stripped, &title_heading, rules) {
            continue;
        }
        if !is_lyrics_candidate(stripped) || is_narrative(stripped, rules) {
            continue;
        }

        in_metadata = false;
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}
