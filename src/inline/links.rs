//! Link and image resolution.
//!
//! Every `[` and `![` pushes a [`Bracket`]. A `]` looks at the nearest one
//! and tries, in order: an inline destination `(url "title")`, a full or
//! collapsed reference `[label]`, and a shortcut reference using the
//! bracketed text itself. A match wraps everything after the opening
//! bracket in a link node, resolves the emphasis inside it, and
//! deactivates earlier link brackets so links never nest.

use super::node::{NodeId, NodeValue};
use super::Subject;
use crate::classify::is_ascii_punctuation;
use crate::limits::MAX_LINK_PAREN_DEPTH;
use crate::Range;
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Bracket {
    /// Placeholder text node holding `[` or `![`.
    pub node: NodeId,
    pub image: bool,
    /// Cleared once an enclosing link has matched.
    pub active: bool,
    /// Offset just past the opening `[`.
    pub position: usize,
    /// Delimiter stack tail when the bracket was pushed.
    pub previous_delimiter: Option<usize>,
    /// Another `[` was pushed after this one.
    pub bracket_after: bool,
}

/// Bytes CommonMark treats as spacing inside link syntax.
#[inline]
fn is_space_char(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

fn skip_space_chars(bytes: &[u8], pos: usize) -> usize {
    pos + bytes
        .get(pos..)
        .map_or(0, |tail| tail.iter().take_while(|&&b| is_space_char(b)).count())
}

/// Length of a link destination at the start of `rest`: `<...>` with no
/// line ending or unescaped `<`, or a bare run with balanced parentheses.
/// Something must follow the destination for the link to close.
pub fn scan_link_url(rest: &[u8]) -> Option<usize> {
    if rest.first() == Some(&b'<') {
        let mut i = 1;
        while i < rest.len() {
            match rest[i] {
                b'>' => return (i + 1 < rest.len()).then_some(i + 1),
                b'\\' => i += 2,
                b'\n' | b'\r' | b'<' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' if rest.get(i + 1).is_some_and(|&b| is_ascii_punctuation(b)) => i += 2,
            b'(' => {
                depth += 1;
                if depth > MAX_LINK_PAREN_DEPTH {
                    return None;
                }
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                i += 1;
            }
            b if is_space_char(b) || b.is_ascii_control() => {
                if i == 0 {
                    return None;
                }
                break;
            }
            _ => i += 1,
        }
    }
    (i < rest.len() && depth == 0).then_some(i)
}

/// Length of a `"title"`, `'title'` or `(title)` at the start of `rest`.
pub fn scan_link_title(rest: &[u8]) -> Option<usize> {
    let close = match *rest.first()? {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut i = 1;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == close => return Some(i + 1),
            b'(' if close == b')' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Parsed `(destination title)` after a `]`.
struct InlineDestination<'a> {
    url: &'a str,
    title: &'a str,
    end: usize,
}

impl<'a> Subject<'a, '_> {
    pub(super) fn push_bracket(&mut self, image: bool, node: NodeId) {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        self.brackets.push(Bracket {
            node,
            image,
            active: true,
            position: self.view.offset(),
            previous_delimiter: self.last_delim,
            bracket_after: false,
        });
    }

    /// Returns the literal `]` node when no link closes here.
    pub(super) fn handle_close_bracket(&mut self) -> Option<NodeId> {
        let start = self.view.offset();
        self.view.bump();
        let after_close = self.view.offset();

        let Some(opener) = self.brackets.last().copied() else {
            return Some(self.literal("]", start));
        };
        if !opener.active {
            self.brackets.pop();
            return Some(self.literal("]", start));
        }

        if let Some(dest) = self.inline_destination(after_close) {
            self.view.set_offset(dest.end);
            let (url, title) = (Cow::Borrowed(dest.url), Cow::Borrowed(dest.title));
            let value = if opener.image {
                NodeValue::Image { url, title }
            } else {
                NodeValue::Link { url, title }
            };
            self.close_bracket_match(opener, value, start, "inline");
            return None;
        }

        let label = match self.link_label() {
            Some(label) if !label.is_empty() => Some(label),
            _ if !opener.bracket_after => Some(self.view.slice(opener.position, start)),
            _ => None,
        };
        let refs = self.refs;
        let max = self.profile.max_label_length;
        if let Some(reference) = label.filter(|l| l.len() <= max).and_then(|l| refs.lookup(l)) {
            let url = Cow::Owned(reference.url.clone());
            let title = Cow::Owned(reference.title.clone().unwrap_or_default());
            let value = if opener.image {
                NodeValue::Image { url, title }
            } else {
                NodeValue::Link { url, title }
            };
            self.close_bracket_match(opener, value, start, "reference");
            return None;
        }

        self.brackets.pop();
        self.view.set_offset(after_close);
        Some(self.literal("]", start))
    }

    fn inline_destination(&self, after_close: usize) -> Option<InlineDestination<'a>> {
        let bytes = self.view.bytes();
        if bytes.get(after_close) != Some(&b'(') {
            return None;
        }

        let url_start = skip_space_chars(bytes, after_close + 1);
        let url_end = url_start + scan_link_url(&bytes[url_start..])?;
        let title_start = skip_space_chars(bytes, url_end);
        // A title must be separated from the destination
        let title_end = if title_start == url_end {
            title_start
        } else {
            title_start + scan_link_title(&bytes[title_start..]).unwrap_or(0)
        };
        let end = skip_space_chars(bytes, title_end);
        if bytes.get(end) != Some(&b')') {
            return None;
        }

        let url = self.view.slice(url_start, url_end);
        let url = url
            .strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .unwrap_or(url);
        let title = if title_end > title_start {
            self.view.slice(title_start + 1, title_end - 1)
        } else {
            ""
        };
        Some(InlineDestination { url, title, end: end + 1 })
    }

    /// Scan `[label]` at the cursor. On success the cursor moves past it
    /// and the trimmed label is returned; otherwise nothing moves.
    fn link_label(&mut self) -> Option<&'a str> {
        let start = self.view.offset();
        let bytes = self.view.bytes();
        if bytes.get(start) != Some(&b'[') {
            return None;
        }

        let max = self.profile.max_label_length;
        let mut pos = start + 1;
        while let Some(&b) = bytes.get(pos) {
            match b {
                b'[' => return None,
                b']' => {
                    self.view.set_offset(pos + 1);
                    return Some(self.view.slice(start + 1, pos).trim());
                }
                b'\\' if bytes.get(pos + 1).is_some_and(|&n| is_ascii_punctuation(n)) => pos += 2,
                _ => pos += 1,
            }
            if pos - (start + 1) > max {
                return None;
            }
        }
        None
    }

    /// Replace the opener's placeholder with `value`, moving every node
    /// after it into the new link. The cursor is already past the link.
    fn close_bracket_match(&mut self, opener: Bracket, value: NodeValue<'a>, close_start: usize, kind: &'static str) {
        let end = self.view.offset();
        let open_span = self.arena.get(opener.node).span;

        let link = self
            .arena
            .alloc(value, Range::from_usize(open_span.start_usize(), end));
        self.arena.insert_before(opener.node, link);
        self.arena.adopt_between(link, opener.node, None);
        self.arena.detach(opener.node);

        self.ignore.push(open_span);
        self.ignore(close_start, end);
        debug!(image = opener.image, kind, start = open_span.start, end, "resolved link");

        let floor = opener
            .previous_delimiter
            .map_or(0, |d| self.delimiters[d].position + 1);
        self.process_emphasis(floor);
        self.brackets.pop();

        if !opener.image {
            for bracket in self.brackets.iter_mut().rev() {
                if !bracket.image {
                    if !bracket.active {
                        break;
                    }
                    bracket.active = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::scan;
    use crate::{ParserProfile, ReferenceMap};

    fn strip_with(line: &str, refs: &ReferenceMap) -> String {
        scan(line, &ParserProfile::default(), refs).unwrap().strip_ignored()
    }

    fn strip(line: &str) -> String {
        strip_with(line, &ReferenceMap::new())
    }

    fn first_link(line: &str) -> Option<(String, String)> {
        let tree = scan(line, &ParserProfile::default(), &ReferenceMap::new()).unwrap();
        let arena = tree.arena();
        arena.children(tree.root()).find_map(|id| match arena.value(id) {
            NodeValue::Link { url, title } | NodeValue::Image { url, title } => {
                Some((url.to_string(), title.to_string()))
            }
            _ => None,
        })
    }

    #[test]
    fn test_scan_link_url() {
        assert_eq!(scan_link_url(b"/url)"), Some(4));
        assert_eq!(scan_link_url(b"<my url>)"), Some(8));
        assert_eq!(scan_link_url(b"foo(and(bar)))"), Some(13));
        assert_eq!(scan_link_url(b"foo(and(bar))"), None);
        assert_eq!(scan_link_url(b"foo\\)bar)"), Some(8));
        assert_eq!(scan_link_url(b"<a<b>)"), None);
        assert_eq!(scan_link_url(b")"), Some(0));
        assert_eq!(scan_link_url(b"/url"), None);
    }

    #[test]
    fn test_paren_depth_cap() {
        let mut deep = "(".repeat(32);
        deep.push_str(&")".repeat(32));
        deep.push(')');
        assert_eq!(scan_link_url(deep.as_bytes()), Some(64));

        let mut too_deep = "(".repeat(33);
        too_deep.push_str(&")".repeat(34));
        assert_eq!(scan_link_url(too_deep.as_bytes()), None);
    }

    #[test]
    fn test_scan_link_title() {
        assert_eq!(scan_link_title(b"\"title\")"), Some(7));
        assert_eq!(scan_link_title(b"'it\\'s')"), Some(7));
        assert_eq!(scan_link_title(b"(paren))"), Some(7));
        assert_eq!(scan_link_title(b"(a(b))"), None);
        assert_eq!(scan_link_title(b"\"open"), None);
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(strip("[bar](/url)"), "bar");
        assert_eq!(strip("a [b](/u \"t\") c"), "a b c");
        assert_eq!(strip("![alt](/img.png)"), "alt");
        assert_eq!(first_link("[x](<a b> 'T')"), Some(("a b".into(), "T".into())));
        assert_eq!(first_link("[x]()"), Some(("".into(), "".into())));
    }

    #[test]
    fn test_title_needs_space() {
        assert_eq!(strip("[a](/u\"t\")"), "a");
        assert_eq!(first_link("[a](/u\"t\")"), Some(("/u\"t\"".into(), "".into())));
    }

    #[test]
    fn test_failed_links_stay_literal() {
        assert_eq!(strip("[bar]"), "[bar]");
        assert_eq!(strip("[bar] (/url)"), "[bar] (/url)");
        assert_eq!(strip("[a](b c d)"), "[a](b c d)");
        assert_eq!(strip("a]b"), "a]b");
    }

    #[test]
    fn test_no_links_in_links() {
        assert_eq!(strip("[a [b](c) d](e)"), "[a b d](e)");
        assert_eq!(strip("![a [b](c) d](e)"), "a b d");
    }

    #[test]
    fn test_emphasis_across_link() {
        assert_eq!(strip("*foo [bar](/url)*"), "foo bar");
        assert_eq!(strip("[*a*](b)"), "a");
        assert_eq!(strip("*[a*](b)"), "*a*");
    }

    #[test]
    fn test_reference_forms() {
        let mut refs = ReferenceMap::new();
        refs.insert("Foo Bar", "/url", Some("title".to_string()));

        assert_eq!(strip_with("[text][foo bar]", &refs), "text");
        assert_eq!(strip_with("[Foo  Bar][]", &refs), "Foo  Bar");
        assert_eq!(strip_with("[FOO BAR]", &refs), "FOO BAR");
        assert_eq!(strip_with("[text][missing]", &refs), "[text][missing]");
        assert_eq!(strip_with("[missing]", &refs), "[missing]");
    }

    #[test]
    fn test_label_cap_counts_bytes() {
        let profile = ParserProfile::default().with_max_label_length(4);
        let mut refs = ReferenceMap::new();
        refs.insert("éé", "/two", None);
        refs.insert("ééé", "/three", None);
        let strip_capped = |line: &str| scan(line, &profile, &refs).unwrap().strip_ignored();
        assert_eq!(strip_capped("[éé]"), "éé");
        // Three characters, six bytes
        assert_eq!(strip_capped("[ééé]"), "[ééé]");
        assert_eq!(strip_capped("[x][ééé]"), "[x][ééé]");
    }

    #[test]
    fn test_bracket_after_blocks_shortcut() {
        let mut refs = ReferenceMap::new();
        refs.insert("a ![b]", "/url", None);
        // `![b]` fails, but its `[` still rules the outer text out as a label
        assert_eq!(strip_with("[a ![b]]", &refs), "[a ![b]]");
        assert_eq!(strip_with("[a ![b]][]", &refs), "[a ![b]][]");
        assert_eq!(strip_with("[x][a ![b]]", &refs), "[x][a ![b]]");
    }
}
