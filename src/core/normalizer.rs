//! Name normalization.
//!
//! Turns a noisy release name such as
//! `[Group] Show.Name.S01E03.1080p.x265 [CHS].mkv` into a searchable title,
//! and decides whether what is left is worth sending to a metadata search.

use crate::utils::chinese::contains_letter;
use regex::Regex;
use std::sync::LazyLock;

/// `[...]`, `(...)` and `{...}` groups.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]+\]|\([^)]+\)|\{[^}]+\}").expect("Invalid tag pattern")
});

static SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._]").expect("Invalid separator pattern"));

/// Resolution and codec markers.
static QUALITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:480p|720p|1080p|2160p|4k|x264|x265|h264|h265|hevc|avc|aac|flac)\b")
        .expect("Invalid quality pattern")
});

static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));

/// Season, episode and special markers that carry no title information.
static NUMBERING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bs\d{1,2}(?:\s*e\d{1,3})?\b|\bseason\s*\d{1,2}\b|\b(?:ep?|episode)\s*\d{1,3}\b|第\s*\d+\s*[季话話集期]|\b(?:ova|oad|sp|specials?|ncop|nced)\s*\d*\b",
    )
    .expect("Invalid numbering pattern")
});

static EPISODE_TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)s\d{1,2}e\d{1,3}").expect("Invalid episode token pattern"));

/// A standalone 1-3 digit number at the end of the name.
static TRAILING_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)\d{1,3}$").expect("Invalid trailing number pattern")
});

/// Release-group, codec, container and subtitle jargon.
const NOISE_TOKENS: &[&str] = &[
    // Sources
    "web", "webrip", "web-dl", "webdl", "bdrip", "bd", "bluray", "blu-ray", "dvdrip", "dvd",
    "hdtv", "tvrip", "remux", "raw", "raws",
    // Video
    "480p", "720p", "1080p", "2160p", "4k", "uhd", "hdr", "hdr10", "dv", "sdr", "x264", "x265",
    "h264", "h265", "hevc", "avc", "10bit", "8bit", "hi10p", "ma10p", "60fps",
    // Audio
    "aac", "flac", "ac3", "eac3", "dts", "truehd", "atmos", "opus", "mp3", "2ch", "5.1",
    // Containers
    "mkv", "mp4", "avi", "ts", "m2ts", "rmvb",
    // Subtitles
    "chs", "cht", "sc", "tc", "gb", "big5", "jp", "jpn", "eng", "sub", "subs", "softsub",
    "hardsub", "简体", "繁体", "简繁", "简日", "繁日", "简中", "繁中", "内封", "内嵌", "外挂",
    "字幕", "中字", "双语", "国语", "粤语", "日语",
    // Release markers
    "v2", "v3", "fin", "end", "complete", "batch", "repack", "proper", "uncut", "tv", "ova",
    "oad", "sp", "movie",
];

/// Delimiter pairs scanned, in priority order, for a fallback title.
const TITLE_DELIMITERS: &[(char, char)] = &[('【', '】'), ('[', ']'), ('《', '》'), ('(', ')')];

/// Strip tag groups and quality markers, collapse separators and whitespace.
///
/// Idempotent: normalizing an already normalized name returns it unchanged.
pub fn normalize_name(raw: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(raw, " ");
    let spaced = SEPARATOR_PATTERN.replace_all(&without_tags, " ");
    let without_quality = QUALITY_PATTERN.replace_all(&spaced, " ");
    WHITESPACE_PATTERN
        .replace_all(&without_quality, " ")
        .trim()
        .to_string()
}

/// Whether a normalized name still contains something that looks like a title.
///
/// Numbering markers and bare numbers are ignored; at least one remaining
/// token must be outside the noise vocabulary and contain a Latin or CJK letter.
pub fn is_meaningful_name(candidate: &str) -> bool {
    let stripped = NUMBERING_PATTERN.replace_all(candidate, " ");
    stripped
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '+' | '&' | ',' | '~' | '|' | '/'))
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
        .any(|token| !NOISE_TOKENS.contains(&token.as_str()) && contains_letter(&token))
}

/// Derive a search title from a raw name.
///
/// Uses the normalized name when meaningful; otherwise the first
/// bracket-enclosed substring (by delimiter priority) that normalizes to a
/// meaningful title; otherwise the normalized name as a last resort.
pub fn derive_search_name(raw: &str) -> String {
    let normalized = normalize_name(raw);
    if is_meaningful_name(&normalized) {
        return normalized;
    }

    for &(open, close) in TITLE_DELIMITERS {
        for inner in enclosed_segments(raw, open, close) {
            let candidate = normalize_name(inner);
            if is_meaningful_name(&candidate) {
                tracing::debug!("Fallback title from {}{}: {}", open, close, candidate);
                return candidate;
            }
        }
    }

    normalized
}

/// Search title for an input basename (extension already removed).
///
/// Drops the first `SxxEyy` token and a trailing episode number from the
/// normalized name; falls back to [`derive_search_name`] when what is left
/// is not meaningful.
pub fn search_title(raw_name: &str) -> String {
    let raw_base = normalize_name(raw_name);
    let without_episode = EPISODE_TOKEN_PATTERN.replace(&raw_base, "");
    let without_number = TRAILING_NUMBER_PATTERN.replace(without_episode.trim_end(), "");
    let stripped =
        normalize_name(without_number.trim_end_matches(|c: char| c == '-' || c.is_whitespace()));
    let candidate = if stripped.is_empty() { raw_base } else { stripped };

    if is_meaningful_name(&candidate) {
        return candidate;
    }
    let fallback = derive_search_name(raw_name);
    if fallback.is_empty() {
        candidate
    } else {
        fallback
    }
}

/// Non-nested substrings between `open` and the next `close`.
fn enclosed_segments(raw: &str, open: char, close: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find(open) {
        let after_open = &rest[start + open.len_utf8()..];
        match after_open.find(close) {
            Some(end) => {
                segments.push(&after_open[..end]);
                rest = &after_open[end + close.len_utf8()..];
            }
            None => break,
        }
    }
    segments
}
