/// Normalizes a message's plain text: CRLF and lone CR become `\n`, and
/// surrounding whitespace is trimmed. Interior spacing is left alone.
pub fn normalize_message(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// Returns at most `max_chars` characters from the start of `text`.
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
