//! Whitespace and text helpers shared by the arena and the evaluators

/// Whitespace as far as blank checks are concerned: space, tab, newline,
/// form feed, carriage return.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{000C}' | '\r')
}

/// Whitespace for normalisation. Adds the non-breaking space, which renders
/// as a space and should collapse like one.
pub fn is_actually_whitespace(c: char) -> bool {
    is_whitespace(c) || c == '\u{00A0}'
}

/// True if the string is empty or contains only whitespace
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_whitespace)
}

/// Collapse every run of whitespace into a single space.
///
/// Leading and trailing runs collapse too but are kept; use
/// [`normalise_trimmed`] for display text.
pub fn normalise_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_white = false;

    for c in text.chars() {
        if is_actually_whitespace(c) {
            if !last_was_white {
                out.push(' ');
                last_was_white = true;
            }
        } else {
            out.push(c);
            last_was_white = false;
        }
    }

    out
}

/// Normalised and trimmed: the display form of a value
pub fn normalise_trimmed(text: &str) -> String {
    normalise_whitespace(text).trim_matches(' ').to_string()
}

/// Normalised, trimmed and lower-cased. `to_lowercase` is locale independent.
pub fn fold(text: &str) -> String {
    normalise_trimmed(text).to_lowercase()
}

/// Number of chars in the string. Split offsets are counted in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte position of the `offset`th char, or `None` if past the end
pub fn byte_offset(text: &str, offset: usize) -> Option<usize> {
    if offset == char_len(text) {
        return Some(text.len());
    }
    text.char_indices().nth(offset).map(|(i, _)| i)
}
