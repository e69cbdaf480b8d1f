//! Code span resolution.
//!
//! Code spans have highest precedence among inline elements: a matched
//! span hides every delimiter, bracket and entity inside it. Backtick
//! runs must match exactly. The closer search remembers where it last
//! saw a run of each length so a line full of unmatched openers is still
//! scanned once.

use super::node::{NodeId, NodeValue};
use super::Subject;
use crate::limits::MAX_CODE_SPAN_BACKTICKS;
use crate::Range;

impl<'a> Subject<'a, '_> {
    pub(super) fn handle_backticks(&mut self) -> NodeId {
        let start = self.view.offset();
        let open_len = self.view.take_while(b'`');
        let content_start = self.view.offset();

        match self.scan_to_closing_backtick(open_len) {
            Some(end) => {
                let content = self.view.sub(Range::from_usize(content_start, end - open_len)).text();
                self.ignore(start, content_start);
                self.ignore(end - open_len, end);
                self.arena
                    .alloc(NodeValue::Code(normalize_code(content)), self.view.range_from(start))
            }
            None => {
                self.view.set_offset(content_start);
                self.text_node(start, content_start)
            }
        }
    }

    /// Find a closing run of exactly `open_len` backticks. On success the
    /// cursor sits just past the closer and its end offset is returned.
    /// Runs longer than `MAX_CODE_SPAN_BACKTICKS` never match.
    fn scan_to_closing_backtick(&mut self, open_len: usize) -> Option<usize> {
        if open_len > MAX_CODE_SPAN_BACKTICKS {
            return None;
        }
        if self.scanned_for_backticks && self.backticks[open_len] <= self.view.offset() {
            return None;
        }

        loop {
            match self.view.find(b'`') {
                Some(pos) => self.view.set_offset(pos),
                None => {
                    self.view.set_offset(self.view.len());
                    self.scanned_for_backticks = true;
                    return None;
                }
            }
            let run_start = self.view.offset();
            let run = self.view.take_while(b'`');
            if run <= MAX_CODE_SPAN_BACKTICKS {
                self.backticks[run] = run_start;
            }
            if run == open_len {
                return Some(self.view.offset());
            }
        }
    }
}

/// Line endings become spaces, then one leading and one trailing space
/// are stripped when both are present and the content is not all spaces.
pub fn normalize_code(content: &str) -> String {
    let mut code = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                code.push(' ');
            }
            '\n' => code.push(' '),
            c => code.push(c),
        }
    }

    if code.len() >= 2 && code.starts_with(' ') && code.ends_with(' ') && code.bytes().any(|b| b != b' ') {
        code.pop();
        code.remove(0);
    }
    code
}
