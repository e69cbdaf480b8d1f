//! Delimiter runs and the push step of emphasis processing.
//!
//! Each run of `*`, `_` (or, with smart punctuation, a single `'`/`"`)
//! becomes a text node plus an entry in a doubly linked list threaded
//! through `Subject::delimiters` by index.

use super::node::{NodeId, NodeValue};
use super::Subject;
use crate::classify::{decode_at, decode_before, is_punctuation, is_whitespace};
use crate::error::Result;
use crate::Range;
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub(crate) struct Delimiter {
    pub ch: u8,
    /// Length of the run as scanned. Used by the rule of 3.
    pub run_length: u32,
    /// Characters not yet consumed by a match. Never exceeds `run_length`.
    pub remaining: u32,
    pub can_open: bool,
    pub can_close: bool,
    /// Text node holding the unconsumed characters.
    pub node: NodeId,
    /// Offset just past the run. Strictly increasing along the list.
    pub position: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// Opener/closer status of a delimiter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flanking {
    pub can_open: bool,
    pub can_close: bool,
}

/// Apply the CommonMark flanking rules to a run of `ch` between `before`
/// and `after`. Line boundaries count as whitespace.
pub(crate) fn flanking(ch: u8, before: Option<char>, after: Option<char>) -> Flanking {
    let before = before.unwrap_or('\n');
    let after = after.unwrap_or('\n');

    let left = !is_whitespace(after)
        && (!is_punctuation(after) || is_whitespace(before) || is_punctuation(before));
    let right = !is_whitespace(before)
        && (!is_punctuation(before) || is_whitespace(after) || is_punctuation(after));

    match ch {
        b'_' => Flanking {
            can_open: left && (!right || is_punctuation(before)),
            can_close: right && (!left || is_punctuation(after)),
        },
        b'\'' | b'"' => Flanking {
            can_open: left
                && (!right || before == '(' || before == '[')
                && before != ']'
                && before != ')',
            can_close: right,
        },
        _ => Flanking {
            can_open: left,
            can_close: right,
        },
    }
}

impl<'a> Subject<'a, '_> {
    /// Scan a delimiter run at the cursor and push it on the stack.
    pub(super) fn handle_delim(&mut self, c: u8) -> Result<NodeId> {
        let start = self.view.offset();
        let text = self.view.text();
        let before = decode_before(text, start)?;

        let run = if c == b'\'' || c == b'"' {
            self.view.bump();
            1
        } else {
            self.view.take_while(c)
        };
        let after = decode_at(text, self.view.offset())?;
        let Flanking { can_open, can_close } = flanking(c, before, after);

        let contents = match c {
            b'\'' => Cow::Borrowed("’"),
            b'"' if can_close => Cow::Borrowed("”"),
            b'"' => Cow::Borrowed("“"),
            _ => Cow::Borrowed(self.view.slice(start, self.view.offset())),
        };
        let node = self
            .arena
            .alloc(NodeValue::Text(contents), self.view.range_from(start));

        if can_open || can_close {
            self.push_delimiter(c, run as u32, can_open, can_close, node);
        }
        Ok(node)
    }

    fn push_delimiter(&mut self, ch: u8, run_length: u32, can_open: bool, can_close: bool, node: NodeId) {
        let id = self.delimiters.len();
        self.delimiters.push(Delimiter {
            ch,
            run_length,
            remaining: run_length,
            can_open,
            can_close,
            node,
            position: self.view.offset(),
            prev: self.last_delim,
            next: None,
        });
        if let Some(prev) = self.last_delim {
            self.delimiters[prev].next = Some(id);
        }
        self.last_delim = Some(id);
    }

    /// Unlink a delimiter. Its node stays in the tree.
    pub(super) fn remove_delimiter(&mut self, id: usize) {
        let Delimiter { prev, next, .. } = self.delimiters[id];
        match next {
            Some(n) => self.delimiters[n].prev = prev,
            None => {
                debug_assert_eq!(self.last_delim, Some(id));
                self.last_delim = prev;
            }
        }
        if let Some(p) = prev {
            self.delimiters[p].next = next;
        }
    }

    /// Unlink every delimiter at or above `floor`.
    pub(super) fn remove_delimiters(&mut self, floor: usize) {
        while let Some(d) = self.last_delim {
            if self.delimiters[d].position < floor {
                break;
            }
            self.remove_delimiter(d);
        }
    }

    /// Consume `n` characters from the end of an opener run.
    pub(super) fn consume_opener(&mut self, id: usize, n: u32) {
        let node = self.delimiters[id].node;
        let consumed = self.arena.get_mut(node).span.take_back(n);
        self.consume(id, node, consumed);
    }

    /// Consume `n` characters from the start of a closer run.
    pub(super) fn consume_closer(&mut self, id: usize, n: u32) {
        let node = self.delimiters[id].node;
        let consumed = self.arena.get_mut(node).span.take_front(n);
        self.consume(id, node, consumed);
    }

    fn consume(&mut self, id: usize, node: NodeId, consumed: Range) {
        let delim = &mut self.delimiters[id];
        debug_assert!(consumed.len() <= delim.remaining);
        delim.remaining -= consumed.len();
        self.ignore.push(consumed);

        let span = self.arena.get(node).span;
        let text = span.slice(self.view.text());
        self.arena.get_mut(node).value = NodeValue::Text(Cow::Borrowed(text));
    }
}
