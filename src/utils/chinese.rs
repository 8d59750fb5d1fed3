//! CJK text utilities.

/// Check if a string contains at least one Latin or CJK letter.
pub fn contains_letter(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic() || is_cjk_char(c))
}

/// Check if a character is a CJK character.
fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |  // CJK Unified Ideographs Extension A
        '\u{F900}'..='\u{FAFF}' |  // CJK Compatibility Ideographs
        '\u{20000}'..='\u{2A6DF}' | // CJK Unified Ideographs Extension B
        '\u{3040}'..='\u{309F}' |  // Hiragana
        '\u{30A0}'..='\u{30FF}'    // Katakana
    )
}
