//! Autolinks and raw inline HTML.
//!
//! Every scanner here starts just past the `<` and returns the length of
//! the construct from there, including the closing `>`.

use super::node::{NodeId, NodeValue};
use super::Subject;
use crate::limits::MAX_AUTOLINK_SCHEME_LENGTH;
use crate::profile::ParserProfile;
use memchr::memmem;
use std::borrow::Cow;

/// Constructs whose terminator is known to be absent from the rest of the
/// line. Once set, later `<` on the same line skip that grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSkip {
    pub comment: bool,
    pub cdata: bool,
    pub declaration: bool,
    pub processing_instruction: bool,
}

/// `scheme:path>` with a 2 to 32 character scheme and no spaces, controls
/// or angle brackets in the path.
pub fn scan_autolink_uri(rest: &[u8]) -> Option<usize> {
    let first = *rest.first()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let scheme_len = rest
        .iter()
        .take(MAX_AUTOLINK_SCHEME_LENGTH + 1)
        .position(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')))?;
    if !(2..=MAX_AUTOLINK_SCHEME_LENGTH).contains(&scheme_len) || rest[scheme_len] != b':' {
        return None;
    }

    let path = &rest[scheme_len + 1..];
    let end = path
        .iter()
        .position(|&b| b == b'>' || b == b'<' || b <= b' ' || b == 0x7f)?;
    (path[end] == b'>').then_some(scheme_len + 1 + end + 1)
}

/// `local@domain>` following the HTML5 valid-email grammar.
pub fn scan_autolink_email(rest: &[u8]) -> Option<usize> {
    let local = rest.iter().take_while(|&&b| is_email_local_char(b)).count();
    if local == 0 || rest.get(local) != Some(&b'@') {
        return None;
    }

    let mut pos = local + 1;
    loop {
        let label = rest[pos..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count();
        if label == 0 || label > 63 {
            return None;
        }
        let label_bytes = &rest[pos..pos + label];
        if label_bytes[0] == b'-' || label_bytes[label - 1] == b'-' {
            return None;
        }
        pos += label;
        match rest.get(pos) {
            Some(b'.') => pos += 1,
            Some(b'>') => return Some(pos + 1),
            _ => return None,
        }
    }
}

#[inline]
fn is_email_local_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b".!#$%&'*+/=?^_`{|}~-".contains(&b)
}

/// Raw HTML: comment, CDATA section, declaration, processing instruction,
/// open tag or close tag. Tags the profile disallows never match.
pub fn scan_html(rest: &[u8], profile: &ParserProfile, skip: &mut HtmlSkip) -> Option<usize> {
    match *rest.first()? {
        b'!' => {
            if rest.starts_with(b"!--") {
                scan_comment(rest, skip)
            } else if rest.starts_with(b"![CDATA[") {
                scan_until(rest, 8, b"]]>", &mut skip.cdata)
            } else if rest.get(1).is_some_and(u8::is_ascii_alphabetic) {
                scan_until(rest, 2, b">", &mut skip.declaration)
            } else {
                None
            }
        }
        b'?' => scan_until(rest, 1, b"?>", &mut skip.processing_instruction),
        b'/' => scan_close_tag(rest, profile),
        _ => scan_open_tag(rest, profile),
    }
}

/// Find `terminator` at or after `from`, remembering a miss in `flag`.
fn scan_until(rest: &[u8], from: usize, terminator: &[u8], flag: &mut bool) -> Option<usize> {
    if *flag {
        return None;
    }
    match memmem::find(&rest[from..], terminator) {
        Some(i) => Some(from + i + terminator.len()),
        None => {
            *flag = true;
            None
        }
    }
}

/// `!--` then a body that does not start with `>` or `->`, does not contain
/// `--` and does not end with `-`, then `-->`.
fn scan_comment(rest: &[u8], skip: &mut HtmlSkip) -> Option<usize> {
    let body_start = 3;
    let end = scan_until(rest, body_start, b"-->", &mut skip.comment)?;
    let body = &rest[body_start..end - 3];
    if body.starts_with(b">") || body.starts_with(b"->") {
        return None;
    }
    if body.ends_with(b"-") || memmem::find(body, b"--").is_some() {
        return None;
    }
    Some(end)
}

/// Tag name at `pos`: an ASCII letter then letters, digits or `-`.
fn tag_name_len(rest: &[u8], pos: usize) -> Option<usize> {
    if !rest.get(pos)?.is_ascii_alphabetic() {
        return None;
    }
    Some(
        1 + rest[pos + 1..]
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
            .count(),
    )
}

fn scan_close_tag(rest: &[u8], profile: &ParserProfile) -> Option<usize> {
    let name_len = tag_name_len(rest, 1)?;
    if profile.is_disallowed_tag(&rest[1..1 + name_len]) {
        return None;
    }
    let mut pos = 1 + name_len;
    pos += skip_html_whitespace(rest, pos);
    (rest.get(pos) == Some(&b'>')).then_some(pos + 1)
}

fn scan_open_tag(rest: &[u8], profile: &ParserProfile) -> Option<usize> {
    let name_len = tag_name_len(rest, 0)?;
    if profile.is_disallowed_tag(&rest[..name_len]) {
        return None;
    }
    let len = rest.len();
    let mut i = name_len;

    loop {
        let ws = skip_html_whitespace(rest, i);
        i += ws;
        match *rest.get(i)? {
            b'>' => return Some(i + 1),
            b'/' => return (rest.get(i + 1) == Some(&b'>')).then_some(i + 2),
            _ if ws == 0 => return None,
            b if !is_attr_name_start(b) => return None,
            _ => {}
        }

        i += 1;
        while i < len && is_attr_name_char(rest[i]) {
            i += 1;
        }

        // Optional value
        let before_value = i;
        i += skip_html_whitespace(rest, i);
        if rest.get(i) != Some(&b'=') {
            i = before_value;
            continue;
        }
        i += 1;
        i += skip_html_whitespace(rest, i);
        match *rest.get(i)? {
            quote @ (b'"' | b'\'') => {
                let close = memchr::memchr(quote, &rest[i + 1..])?;
                i += close + 2;
            }
            _ => {
                let unquoted = rest[i..]
                    .iter()
                    .take_while(|&&b| !is_html_whitespace(b) && !b"\"'=<>`".contains(&b))
                    .count();
                if unquoted == 0 {
                    return None;
                }
                i += unquoted;
            }
        }
    }
}

#[inline]
fn skip_html_whitespace(rest: &[u8], pos: usize) -> usize {
    rest.get(pos..)
        .map_or(0, |tail| tail.iter().take_while(|&&b| is_html_whitespace(b)).count())
}

#[inline]
fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

#[inline]
fn is_attr_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

#[inline]
fn is_attr_name_char(b: u8) -> bool {
    is_attr_name_start(b) || b.is_ascii_digit() || b == b'.' || b == b'-'
}

impl<'a> Subject<'a, '_> {
    pub(super) fn handle_pointy_brace(&mut self) -> NodeId {
        let start = self.view.offset();
        self.view.bump();
        let rest = self.view.rest_bytes();

        if let Some(len) = scan_autolink_uri(rest) {
            return self.autolink(start, len, false);
        }
        if let Some(len) = scan_autolink_email(rest) {
            return self.autolink(start, len, true);
        }
        if let Some(len) = scan_html(rest, self.profile, &mut self.html_skip) {
            self.view.advance(len);
            let end = self.view.offset();
            self.ignore(start, end);
            let html = self.view.slice(start, end);
            return self
                .arena
                .alloc(NodeValue::HtmlInline(html), self.view.range_from(start));
        }

        self.literal("<", start)
    }

    /// Link node over `<address>` whose only child is the address text.
    fn autolink(&mut self, start: usize, len: usize, email: bool) -> NodeId {
        let content_start = start + 1;
        self.view.advance(len);
        let end = self.view.offset();
        let content_end = end - 1;

        let address = self.view.slice(content_start, content_end);
        let url = if email {
            Cow::Owned(format!("mailto:{address}"))
        } else {
            Cow::Borrowed(address)
        };
        let link = self.arena.alloc(
            NodeValue::Link {
                url,
                title: Cow::Borrowed(""),
            },
            self.view.range_from(start),
        );
        let text = self.text_node(content_start, content_end);
        self.arena.append(link, text);

        self.ignore(start, content_start);
        self.ignore(content_end, end);
        link
    }
}
