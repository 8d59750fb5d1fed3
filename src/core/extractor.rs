//! Attribute extraction from file and folder names.
//!
//! Every extractor is total: it returns `None` (or `false`) when nothing
//! matches. Patterns are tried in order and the first match wins.

use regex::Regex;
use std::sync::LazyLock;

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Za-z_])(19\d{2}|20\d{2})(?:[^0-9A-Za-z_]|$)")
        .expect("Invalid year pattern")
});

static SEASON_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)season\s*([0-9]{1,2})",
        r"(?i)s([0-9]{1,2})",
        r"第\s*([0-9]{1,2})\s*季",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid season pattern"))
    .collect()
});

static EPISODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)s\d{1,2}e(\d{1,3})",
        r"(?i)e(\d{1,3})",
        r"(?i)ep(\d{1,3})",
        r"第\s*([0-9]{1,3})\s*[话話集]",
        r"(?:^|\D)(\d{1,3})(?:\D|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid episode pattern"))
    .collect()
});

/// Noise removed before looking for an episode number: tag groups,
/// separators, quality markers, `NNNp`, bit depth and `xNNN` tokens.
static EPISODE_NOISE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\[[^\]]+\]|\([^)]+\)|\{[^}]+\}",
        r"[._]",
        r"(?i)\b(?:480p|720p|1080p|2160p|4k|x264|x265|h264|h265|hevc|avc|aac|flac)\b",
        r"(?i)\b\d{3,4}p\b",
        r"(?i)\b\d{1,2}bit\b",
        r"(?i)\bx\d+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid episode noise pattern"))
    .collect()
});

/// Bonus content: opening/ending themes, previews, menus, interviews.
const EXTRA_TAGS: &[&str] = &[
    "ncop", "nced", "menu", "teaser", "iv", "cm", "nc", "op", "pv", "ed", "advice", "trailer",
    "event", "fans", "访谈", "preview", "picture drama", "预告", "特典", "映像",
];

/// Specials mapped to season 0.
const SEASON0_TAGS: &[&str] = &["ova", "oad", "special", "sp", "00", ".5", "chaos no kakera"];

/// First 4-digit year in 1900-2099 that stands alone.
pub fn extract_year(name: &str) -> Option<u16> {
    YEAR_PATTERN
        .captures(name)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Season number from `season N`, `sN` or `第N季`.
pub fn extract_season(name: &str) -> Option<u32> {
    SEASON_PATTERNS.iter().find_map(|re| {
        re.captures(name)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// Episode number in `[1, 999]`, or `None`.
///
/// Tries `sNNeEE`, `eEE`, `epEE`, `第EE话/集`, then a bare 1-3 digit number.
/// A first match of zero yields `None`.
pub fn extract_episode(name: &str) -> Option<u32> {
    let mut cleaned = name.to_string();
    for re in EPISODE_NOISE_PATTERNS.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let episode: u32 = EPISODE_PATTERNS.iter().find_map(|re| {
        re.captures(&cleaned)
            .and_then(|cap| cap.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })?;

    (1..=999).contains(&episode).then_some(episode)
}

/// Whether the name carries a bonus-content marker.
pub fn has_extra_tag(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXTRA_TAGS.iter().any(|tag| lower.contains(tag))
}

/// Whether the name carries a special/OVA marker.
pub fn has_season0_tag(name: &str) -> bool {
    let lower = name.to_lowercase();
    SEASON0_TAGS.iter().any(|tag| lower.contains(tag))
}

/// Zero-pad single digits only: `3 -> "03"`, `12 -> "12"`, `100 -> "100"`.
pub fn pad_number(n: u32) -> String {
    if n < 10 {
        format!("0{}", n)
    } else {
        n.to_string()
    }
}
