//! Anchor-source text writer.
//!
//! Walks a resolved inline tree and keeps only what a renderer would show
//! as plain text: text and code content, the visible text of links and
//! images, a newline per line break. Raw HTML contributes nothing.

use crate::inline::{Arena, InlineTree, NodeId, NodeValue};

/// Plain text output with a reusable buffer.
///
/// # Example
/// ```
/// use anchormark::{scan, AnchorWriter, ParserProfile, ReferenceMap};
///
/// let tree = scan("**Install** `cargo`", &ParserProfile::default(), &ReferenceMap::new()).unwrap();
/// let mut writer = AnchorWriter::with_capacity_for(tree.line().len());
/// writer.write_tree(&tree);
/// assert_eq!(writer.into_string(), "Install cargo");
/// ```
#[derive(Debug, Default)]
pub struct AnchorWriter {
    out: String,
}

impl AnchorWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup only ever shrinks a heading, apart from entities and smart
    /// punctuation expanding a few bytes.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + 16),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    pub fn write_tree(&mut self, tree: &InlineTree<'_>) {
        self.write_node(tree.arena(), tree.root());
    }

    /// Write `node` and its descendants in document order.
    pub fn write_node(&mut self, arena: &Arena<'_>, node: NodeId) {
        // Explicit stack: link text may nest emphasis arbitrarily deep
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match arena.value(id) {
                NodeValue::Text(text) => self.out.push_str(text),
                NodeValue::Code(code) => self.out.push_str(code),
                NodeValue::SoftBreak | NodeValue::LineBreak => self.out.push('\n'),
                NodeValue::HtmlInline(_) => {}
                NodeValue::Root
                | NodeValue::Emph
                | NodeValue::Strong
                | NodeValue::Link { .. }
                | NodeValue::Image { .. } => {
                    let start = stack.len();
                    stack.extend(arena.children(id));
                    stack[start..].reverse();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scan, ParserProfile, ReferenceMap};

    fn render(line: &str) -> String {
        let tree = scan(line, &ParserProfile::default(), &ReferenceMap::new()).unwrap();
        let mut writer = AnchorWriter::new();
        writer.write_tree(&tree);
        writer.into_string()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render("Getting started"), "Getting started");
    }

    #[test]
    fn test_nested_containers_keep_order() {
        assert_eq!(render("a *b **c [d](e) f** g* h"), "a b c d f g h");
        assert_eq!(render("![*alt* text](x.png)"), "alt text");
    }

    #[test]
    fn test_substitutions() {
        assert_eq!(render("`` a ` b ``"), "a ` b");
        assert_eq!(render("Fish &amp; Chips &#35;1"), "Fish & Chips #1");
        assert_eq!(render("<b>bold</b>"), "bold");
        assert_eq!(render("<https://example.com>"), "https://example.com");
    }

    #[test]
    fn test_breaks() {
        assert_eq!(render("one  \ntwo\nthree"), "one\ntwo\nthree");
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let depth = 5000;
        let line = format!("{}x{}", "*".repeat(depth), "*".repeat(depth));
        assert_eq!(render(&line), "x");
    }

    #[test]
    fn test_writer_reuse() {
        let tree = scan("*a*", &ParserProfile::default(), &ReferenceMap::new()).unwrap();
        let mut writer = AnchorWriter::with_capacity_for(3);
        writer.write_tree(&tree);
        assert_eq!(writer.as_str(), "a");
        writer.clear();
        assert!(writer.as_str().is_empty());
    }
}
