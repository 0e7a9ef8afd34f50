/// Collapses every run of whitespace to a single space and trims both ends
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max` characters of `s`, never splitting a character
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_index, _)) => s[..byte_index].to_string(),
        None => s.to_string(),
    }
}

/// Character count (not byte count)
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
