//! Inline node kinds and the index arena that holds them.
//!
//! Nodes are linked by index: parent, first/last child and siblings.
//! Emphasis and links re-parent runs of siblings, so a plain `Vec` of
//! nodes is not enough, but nothing needs more than these five links.

use crate::Range;
use std::borrow::Cow;

pub type NodeId = usize;

/// What an inline node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue<'a> {
    /// Container for the whole line.
    Root,
    Text(Cow<'a, str>),
    /// Normalized code span content.
    Code(String),
    HtmlInline(&'a str),
    SoftBreak,
    LineBreak,
    Emph,
    Strong,
    Link { url: Cow<'a, str>, title: Cow<'a, str> },
    Image { url: Cow<'a, str>, title: Cow<'a, str> },
}

impl<'a> NodeValue<'a> {
    #[inline]
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeValue::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub value: NodeValue<'a>,
    /// Source bytes this node covers on the original line.
    pub span: Range,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Owner of every node produced while scanning one line.
#[derive(Debug, Clone, Default)]
pub struct Arena<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> Arena<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, value: NodeValue<'a>, span: Range) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            value,
            span,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<'a> {
        &mut self.nodes[id]
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> &NodeValue<'a> {
        &self.nodes[id].value
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].first_child
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> Children<'_, 'a> {
        Children {
            arena: self,
            next: self.nodes[id].first_child,
        }
    }

    /// Unlink `id` from its parent and siblings. Its own children stay.
    pub fn detach(&mut self, id: NodeId) {
        let Node { parent, prev, next, .. } = self.nodes[id];
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].first_child = next;
                }
            }
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].last_child = prev;
                }
            }
        }
        let node = &mut self.nodes[id];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent].last_child;
        {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.prev = last;
        }
        match last {
            Some(l) => self.nodes[l].next = Some(child),
            None => self.nodes[parent].first_child = Some(child),
        }
        self.nodes[parent].last_child = Some(child);
    }

    /// Insert `new` as the next sibling of `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) {
        self.detach(new);
        let parent = self.nodes[anchor].parent;
        let next = self.nodes[anchor].next;
        {
            let node = &mut self.nodes[new];
            node.parent = parent;
            node.prev = Some(anchor);
            node.next = next;
        }
        self.nodes[anchor].next = Some(new);
        match next {
            Some(n) => self.nodes[n].prev = Some(new),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].last_child = Some(new);
                }
            }
        }
    }

    /// Insert `new` as the previous sibling of `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) {
        self.detach(new);
        let parent = self.nodes[anchor].parent;
        let prev = self.nodes[anchor].prev;
        {
            let node = &mut self.nodes[new];
            node.parent = parent;
            node.prev = prev;
            node.next = Some(anchor);
        }
        self.nodes[anchor].prev = Some(new);
        match prev {
            Some(p) => self.nodes[p].next = Some(new),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent].first_child = Some(new);
                }
            }
        }
    }

    /// Move every sibling strictly between `from` and `to` under `parent`.
    /// With `to == None`, moves everything after `from`.
    pub fn adopt_between(&mut self, parent: NodeId, from: NodeId, to: Option<NodeId>) {
        let mut cur = self.nodes[from].next;
        while let Some(id) = cur {
            if Some(id) == to {
                break;
            }
            cur = self.nodes[id].next;
            self.append(parent, id);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub struct Children<'t, 'a> {
    arena: &'t Arena<'a>,
    next: Option<NodeId>,
}

impl Iterator for Children<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.arena.nodes[id].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(arena: &mut Arena<'static>, s: &'static str) -> NodeId {
        arena.alloc(NodeValue::Text(Cow::Borrowed(s)), Range::default())
    }

    fn texts(arena: &Arena<'_>, parent: NodeId) -> Vec<String> {
        arena
            .children(parent)
            .map(|id| arena.value(id).text().unwrap_or("<node>").to_string())
            .collect()
    }

    #[test]
    fn test_append_and_detach() {
        let mut arena = Arena::default();
        let root = arena.alloc(NodeValue::Root, Range::default());
        let a = text(&mut arena, "a");
        let b = text(&mut arena, "b");
        let c = text(&mut arena, "c");
        arena.append(root, a);
        arena.append(root, b);
        arena.append(root, c);
        assert_eq!(texts(&arena, root), ["a", "b", "c"]);

        arena.detach(b);
        assert_eq!(texts(&arena, root), ["a", "c"]);
        arena.detach(c);
        arena.detach(a);
        assert!(arena.first_child(root).is_none());
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut arena = Arena::default();
        let root = arena.alloc(NodeValue::Root, Range::default());
        let b = text(&mut arena, "b");
        arena.append(root, b);
        let a = text(&mut arena, "a");
        let c = text(&mut arena, "c");
        arena.insert_before(b, a);
        arena.insert_after(b, c);
        assert_eq!(texts(&arena, root), ["a", "b", "c"]);
        assert_eq!(arena.parent(c), Some(root));
    }

    #[test]
    fn test_adopt_between() {
        let mut arena = Arena::default();
        let root = arena.alloc(NodeValue::Root, Range::default());
        let ids: Vec<_> = ["*", "x", "y", "*"]
            .into_iter()
            .map(|s| {
                let id = text(&mut arena, s);
                arena.append(root, id);
                id
            })
            .collect();

        let emph = arena.alloc(NodeValue::Emph, Range::default());
        arena.adopt_between(emph, ids[0], Some(ids[3]));
        arena.insert_after(ids[0], emph);

        assert_eq!(texts(&arena, root), ["*", "<node>", "*"]);
        assert_eq!(texts(&arena, emph), ["x", "y"]);
    }
}
