//! Zero-copy cursor over the heading line.
//!
//! The scanner only ever branches on ASCII bytes, so the view works on
//! bytes and hands out `&str` slices cut at ASCII boundaries. Those are
//! always valid UTF-8.

use crate::Range;

/// An immutable view over a line with a movable scan position.
///
/// Copying a view is cheap; the scanner saves one before a speculative
/// parse and restores it when the parse fails.
///
/// # Example
/// ```
/// use anchormark::TextView;
///
/// let mut view = TextView::new("**bold**");
/// assert_eq!(view.take_while(b'*'), 2);
/// assert_eq!(view.peek(), Some(b'b'));
/// ```
#[derive(Clone, Copy)]
pub struct TextView<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextView<'a> {
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// A view over `range` of this view's text, positioned at its start.
    #[inline]
    pub fn sub(&self, range: Range) -> TextView<'a> {
        TextView::new(range.slice(self.text))
    }

    /// The whole underlying text.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Current offset from the start of the line.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Move the scan position. Used to rewind after a failed match.
    #[inline]
    pub fn set_offset(&mut self, pos: usize) {
        debug_assert!(pos <= self.text.len());
        self.pos = pos;
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.text.len() - self.pos
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining());
        self.pos += n;
    }

    #[inline]
    pub fn bump(&mut self) {
        debug_assert!(!self.is_eof());
        self.pos += 1;
    }

    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.bump();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.bump();
        }
        self.pos - start
    }

    /// Skip spaces and tabs.
    #[inline]
    pub fn skip_spaces(&mut self) -> usize {
        self.skip_while(|b| b == b' ' || b == b'\t')
    }

    /// Consume a run of `b`, returning its length.
    #[inline]
    pub fn take_while(&mut self, b: u8) -> usize {
        self.skip_while(|c| c == b)
    }

    /// Consume a line ending (`\n`, `\r` or `\r\n`). True if one was eaten.
    #[inline]
    pub fn eat_line_end(&mut self) -> bool {
        let start = self.pos;
        self.eat(b'\r');
        self.eat(b'\n');
        self.pos > start
    }

    /// Offset of the next `needle` at or after the scan position.
    #[inline]
    pub fn find(&self, needle: u8) -> Option<usize> {
        memchr::memchr(needle, self.rest_bytes()).map(|i| self.pos + i)
    }

    #[inline]
    pub fn range_from(&self, start: usize) -> Range {
        Range::from_usize(start, self.pos)
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    #[inline]
    pub fn rest_bytes(&self) -> &'a [u8] {
        &self.bytes()[self.pos..]
    }
}

impl std::fmt::Debug for TextView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextView")
            .field("offset", &self.pos)
            .field("remaining", &self.remaining())
            .finish()
    }
}
