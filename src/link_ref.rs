//! Reference-style link definitions, keyed by normalized label.

use rustc_hash::FxHashMap;
use unicode_casefold::UnicodeCaseFold;

/// Destination and optional title of a link reference definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkReference {
    pub url: String,
    pub title: Option<String>,
}

/// Read-only lookup of link reference definitions.
///
/// Built once per document and shared by every heading. First
/// definition of a label wins.
#[derive(Debug, Default, Clone)]
pub struct ReferenceMap {
    by_label: FxHashMap<String, LinkReference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition under `label`. Returns false if the normalized
    /// label was already defined (the earlier one is kept) or is blank.
    pub fn insert(&mut self, label: &str, url: impl Into<String>, title: Option<String>) -> bool {
        let key = normalize_label(label);
        if key.is_empty() || self.by_label.contains_key(&key) {
            return false;
        }
        self.by_label.insert(
            key,
            LinkReference {
                url: url.into(),
                title,
            },
        );
        true
    }

    /// Look up a label exactly as written between the brackets.
    pub fn lookup(&self, label: &str) -> Option<&LinkReference> {
        if self.by_label.is_empty() {
            return None;
        }
        self.by_label.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Normalize a link label: Unicode case fold, collapse internal
/// whitespace runs to one space, trim.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;

    for ch in label.chars().case_fold() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
    }
    out
}
