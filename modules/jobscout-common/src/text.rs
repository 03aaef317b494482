/// Truncate a string to at most `max` characters. Returns the original
/// slice when it already fits.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
