/// Returns the prefix of `s` holding at most `max_chars` Unicode scalar values.
///
/// Never splits a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
