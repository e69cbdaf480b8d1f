//! Codepoint decoding and classification for flanking rules.

use crate::error::{CoreError, Result};
use unicode_categories::UnicodeCategories;

/// Decode the scalar starting at byte offset `pos`.
///
/// `Ok(None)` at end of line. Fails when `pos` splits a scalar.
pub fn decode_at(text: &str, pos: usize) -> Result<Option<char>> {
    if pos >= text.len() {
        return Ok(None);
    }
    if !text.is_char_boundary(pos) {
        return Err(CoreError::MalformedUnicode { position: pos });
    }
    Ok(text[pos..].chars().next())
}

/// Decode the scalar ending just before byte offset `pos`.
///
/// `Ok(None)` at start of line. Fails when `pos` splits a scalar.
pub fn decode_before(text: &str, pos: usize) -> Result<Option<char>> {
    if pos == 0 {
        return Ok(None);
    }
    if pos > text.len() || !text.is_char_boundary(pos) {
        return Err(CoreError::MalformedUnicode { position: pos });
    }
    Ok(text[..pos].chars().next_back())
}

/// Unicode whitespace: any `Zs` scalar, tab, line feed, form feed or carriage return.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0c' | '\r') || c.is_separator_space()
}

/// ASCII punctuation as CommonMark defines it (escapable characters).
#[inline]
pub fn is_ascii_punctuation(b: u8) -> bool {
    b.is_ascii_punctuation()
}

/// ASCII punctuation or any scalar in a Unicode `P` category.
#[inline]
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || c.is_punctuation()
}
