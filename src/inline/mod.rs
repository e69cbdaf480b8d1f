//! Inline scanner for a single heading line.
//!
//! A single left-to-right pass in the style of the CommonMark reference
//! parser:
//! 1. Dispatch on each special byte, appending nodes to the root and
//!    pushing emphasis delimiters and link brackets on their stacks
//! 2. Resolve links eagerly on every `]`, running emphasis over the link text
//! 3. Resolve the remaining emphasis once the line is exhausted
//!
//! Every byte of markup that disappears from the output is recorded as an
//! ignore range over the original line.

mod code_span;
mod delimiters;
mod emphasis;
mod html;
mod links;
pub mod node;
mod smart;

pub use html::{scan_autolink_email, scan_autolink_uri, scan_html, HtmlSkip};
pub use node::{Arena, NodeId, NodeValue};

use crate::entity::decode_entity;
use crate::error::Result;
use crate::limits::MAX_CODE_SPAN_BACKTICKS;
use crate::link_ref::ReferenceMap;
use crate::profile::ParserProfile;
use crate::range;
use crate::{Range, TextView};
use delimiters::Delimiter;
use links::Bracket;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Bytes that always end a plain text run.
static SPECIAL_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'\n' as usize] = true;
    table[b'\r' as usize] = true;
    table[b'`' as usize] = true;
    table[b'\\' as usize] = true;
    table[b'*' as usize] = true;
    table[b'_' as usize] = true;
    table[b'[' as usize] = true;
    table[b']' as usize] = true;
    table[b'!' as usize] = true;
    table[b'<' as usize] = true;
    table[b'&' as usize] = true;
    table
};

/// Extra bytes that end a text run when smart punctuation is on.
static SMART_CHARS: [bool; 256] = {
    let mut table = [false; 256];
    table[b'\'' as usize] = true;
    table[b'"' as usize] = true;
    table[b'-' as usize] = true;
    table[b'.' as usize] = true;
    table
};

/// Resolved inline structure of one line.
#[derive(Debug, Clone)]
pub struct InlineTree<'a> {
    line: &'a str,
    arena: Arena<'a>,
    root: NodeId,
    ignore: Vec<Range>,
}

impl<'a> InlineTree<'a> {
    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn arena(&self) -> &Arena<'a> {
        &self.arena
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Sorted, merged byte ranges of the line that markup consumed.
    pub fn ignore_ranges(&self) -> &[Range] {
        &self.ignore
    }

    /// The line with every ignore range deleted. Substitutions (entities,
    /// code-span normalization, smart punctuation) are not applied.
    pub fn strip_ignored(&self) -> String {
        range::delete_ranges(self.line, &self.ignore)
    }
}

/// Scan `line` into an [`InlineTree`].
///
/// # Example
/// ```
/// use anchormark::{scan, ParserProfile, Range, ReferenceMap};
///
/// let tree = scan("*hi*", &ParserProfile::default(), &ReferenceMap::new()).unwrap();
/// assert_eq!(tree.ignore_ranges(), &[Range::new(0, 1), Range::new(3, 4)]);
/// ```
pub fn scan<'a>(line: &'a str, profile: &ParserProfile, refs: &ReferenceMap) -> Result<InlineTree<'a>> {
    let mut subject = Subject::new(line, profile, refs);
    while subject.parse_inline()? {}
    subject.process_emphasis(0);
    subject.brackets.clear();
    Ok(subject.finish())
}

/// Scanner state for one line: cursor, node arena and the two stacks.
pub(crate) struct Subject<'a, 'p> {
    view: TextView<'a>,
    profile: &'p ParserProfile,
    refs: &'p ReferenceMap,
    arena: Arena<'a>,
    root: NodeId,
    delimiters: Vec<Delimiter>,
    last_delim: Option<usize>,
    brackets: SmallVec<[Bracket; 8]>,
    ignore: Vec<Range>,
    /// Start of the last backtick run seen for each run length.
    backticks: [usize; MAX_CODE_SPAN_BACKTICKS + 1],
    scanned_for_backticks: bool,
    html_skip: HtmlSkip,
}

impl<'a, 'p> Subject<'a, 'p> {
    fn new(line: &'a str, profile: &'p ParserProfile, refs: &'p ReferenceMap) -> Self {
        let mut arena = Arena::with_capacity(line.len() / 4 + 4);
        let root = arena.alloc(NodeValue::Root, Range::from_usize(0, line.len()));
        Self {
            view: TextView::new(line),
            profile,
            refs,
            arena,
            root,
            delimiters: Vec::new(),
            last_delim: None,
            brackets: SmallVec::new(),
            ignore: Vec::new(),
            backticks: [0; MAX_CODE_SPAN_BACKTICKS + 1],
            scanned_for_backticks: false,
            html_skip: HtmlSkip::default(),
        }
    }

    fn finish(self) -> InlineTree<'a> {
        let mut ignore = self.ignore;
        range::normalize(&mut ignore);
        InlineTree {
            line: self.view.text(),
            arena: self.arena,
            root: self.root,
            ignore,
        }
    }

    /// Handle the construct at the cursor. Returns false at end of line.
    fn parse_inline(&mut self) -> Result<bool> {
        let Some(c) = self.view.peek() else {
            return Ok(false);
        };

        let node = match c {
            b'\n' | b'\r' => Some(self.handle_newline()),
            b'`' => Some(self.handle_backticks()),
            b'\\' => Some(self.handle_backslash()),
            b'&' => Some(self.handle_entity()),
            b'<' => Some(self.handle_pointy_brace()),
            b'*' | b'_' => Some(self.handle_delim(c)?),
            b'\'' | b'"' if self.profile.smart => Some(self.handle_delim(c)?),
            b'-' if self.profile.smart => Some(self.handle_hyphen()),
            b'.' if self.profile.smart => Some(self.handle_period()),
            b'[' => {
                let start = self.view.offset();
                self.view.bump();
                let node = self.literal("[", start);
                self.push_bracket(false, node);
                Some(node)
            }
            b']' => self.handle_close_bracket(),
            b'!' => {
                let start = self.view.offset();
                self.view.bump();
                if self.view.eat(b'[') {
                    let node = self.literal("![", start);
                    self.push_bracket(true, node);
                    Some(node)
                } else {
                    Some(self.literal("!", start))
                }
            }
            _ => Some(self.handle_text()),
        };

        if let Some(node) = node {
            self.arena.append(self.root, node);
        }
        Ok(true)
    }

    /// Text node over `[start, cursor)` borrowing the line.
    fn text_node(&mut self, start: usize, end: usize) -> NodeId {
        let text = self.view.slice(start, end);
        self.arena
            .alloc(NodeValue::Text(Cow::Borrowed(text)), Range::from_usize(start, end))
    }

    /// Text node with fixed contents covering `[start, cursor)`.
    fn literal(&mut self, text: &'static str, start: usize) -> NodeId {
        let span = self.view.range_from(start);
        self.arena.alloc(NodeValue::Text(Cow::Borrowed(text)), span)
    }

    fn ignore(&mut self, start: usize, end: usize) {
        if start < end {
            self.ignore.push(Range::from_usize(start, end));
        }
    }

    fn find_special_char(&self) -> usize {
        let smart = self.profile.smart;
        let rest = self.view.rest_bytes();
        rest.iter()
            .position(|&b| SPECIAL_CHARS[b as usize] || (smart && SMART_CHARS[b as usize]))
            .map_or(self.view.len(), |i| self.view.offset() + i)
    }

    fn handle_text(&mut self) -> NodeId {
        let start = self.view.offset();
        let end = self.find_special_char().max(start + 1);
        self.view.set_offset(end);

        // Spaces before a line ending belong to the break, not the text
        let mut text_end = end;
        if matches!(self.view.peek(), Some(b'\n' | b'\r')) {
            let bytes = self.view.bytes();
            while text_end > start && bytes[text_end - 1] == b' ' {
                text_end -= 1;
            }
            self.ignore(text_end, end);
        }
        let node = self.text_node(start, text_end);
        self.arena.get_mut(node).span = Range::from_usize(start, end);
        node
    }

    fn handle_newline(&mut self) -> NodeId {
        let nlpos = self.view.offset();
        self.view.eat_line_end();
        let bytes = self.view.bytes();
        let hard = nlpos >= 2 && bytes[nlpos - 1] == b' ' && bytes[nlpos - 2] == b' ';
        let value = if hard { NodeValue::LineBreak } else { NodeValue::SoftBreak };
        let node = self.arena.alloc(value, self.view.range_from(nlpos));
        self.skip_leading_spaces();
        node
    }

    /// Spaces at the start of a continuation line are dropped.
    fn skip_leading_spaces(&mut self) {
        let start = self.view.offset();
        self.view.skip_spaces();
        self.ignore(start, self.view.offset());
    }

    fn handle_backslash(&mut self) -> NodeId {
        let start = self.view.offset();
        self.view.bump();

        match self.view.peek() {
            Some(b) if crate::classify::is_ascii_punctuation(b) => {
                self.view.bump();
                self.ignore(start, start + 1);
                self.text_node(start + 1, start + 2)
            }
            Some(b'\n' | b'\r') => {
                self.view.eat_line_end();
                self.ignore(start, start + 1);
                let node = self.arena.alloc(NodeValue::LineBreak, self.view.range_from(start));
                self.skip_leading_spaces();
                node
            }
            _ => self.literal("\\", start),
        }
    }

    fn handle_entity(&mut self) -> NodeId {
        let start = self.view.offset();
        self.view.bump();

        match decode_entity(self.view.rest_bytes()) {
            Some((decoded, len)) => {
                self.view.advance(len);
                self.arena
                    .alloc(NodeValue::Text(decoded), self.view.range_from(start))
            }
            None => self.literal("&", start),
        }
    }
}
