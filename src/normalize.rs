//! String normalization shared by the builder and the lyrics sources.
//!
//! - `sanitize_for_path` turns titles into folder/file name tokens.
//! - `clean_artist_name` / `clean_song_title` build search queries.
//! - `url_slug` builds the lower-case alphanumeric path segments some sites use.
//!
//! CRITICAL: `sanitize_for_path` decides every manifest path. Changing it moves
//! files on the next builder run.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Characters that are illegal in common filesystems.
pub static INVALID_PATH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Punctuation replaced by a hyphen in path tokens: ' , . ! & and the ellipsis.
pub static PATH_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[',.!&…]").unwrap());

pub static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Anything that is neither a word character nor whitespace.
pub static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Parenthesised segments like "(Taylor's Version)" or "(feat. Someone)".
pub static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

pub static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").unwrap());

// ============================================================================
// PATH TOKENS
// ============================================================================

/// Sanitize text for use in file/folder names.
///
/// Spaces become underscores; invalid path characters and common punctuation
/// become hyphens; hyphen runs collapse; leading/trailing `-` and `_` go.
/// The result is stable under repeated application.
pub fn sanitize_for_path(text: &str) -> String {
    let s = text.replace(' ', "_");
    let s = INVALID_PATH_CHARS.replace_all(&s, "-");
    let s = PATH_PUNCTUATION.replace_all(&s, "-");
    let s = HYPHEN_RUN.replace_all(&s, "-");
    s.trim_matches(|c| c == '-' || c == '_').to_string()
}

// ============================================================================
// SEARCH TERMS
// ============================================================================

/// Clean artist name for search - remove special characters.
pub fn clean_artist_name(artist: &str) -> String {
    NON_WORD.replace_all(artist, "").trim().to_string()
}

/// Clean song title for search - drop parenthetical content and special characters.
pub fn clean_song_title(title: &str) -> String {
    let s = PARENTHETICAL.replace_all(title, "");
    NON_WORD.replace_all(&s, "").trim().to_string()
}

/// Check if a character is a Unicode combining mark (diacritics).
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Fold to lowercase ASCII: strip diacritics, then transliterate the rest.
pub fn fold_to_ascii(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped).to_lowercase()
}

/// Lower-case alphanumeric-only slug: "Mr. Perfectly Fine" → "mrperfectlyfine".
pub fn url_slug(s: &str) -> String {
    NON_ALNUM.replace_all(&fold_to_ascii(s), "").to_string()
}
