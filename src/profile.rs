//! Per-flavor parser configuration.

use crate::limits::MAX_LINK_LABEL_LENGTH;
use std::fmt;
use std::str::FromStr;

/// Tag names GitHub's disallowed-raw-HTML extension leaves as literal text.
pub const GFM_DISALLOWED_TAGS: &[&str] = &[
    "title",
    "textarea",
    "style",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "script",
    "plaintext",
];

/// Immutable settings that select one renderer's inline behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserProfile {
    /// Smart punctuation: typographic quotes, dashes and ellipses.
    pub smart: bool,
    /// Raw HTML tag names that never match as tags (ASCII case-insensitive).
    pub disallowed_tags: Vec<String>,
    /// Maximum link-label length. Reference labels inside `[...]` are
    /// capped in bytes while scanning; the resolved anchor text is capped
    /// in characters.
    pub max_label_length: usize,
    /// Reject headings that resolve to an empty anchor label.
    pub strict: bool,
}

impl Default for ParserProfile {
    fn default() -> Self {
        Self {
            smart: false,
            disallowed_tags: Vec::new(),
            max_label_length: MAX_LINK_LABEL_LENGTH,
            strict: false,
        }
    }
}

impl ParserProfile {
    pub fn with_smart(mut self, smart: bool) -> Self {
        self.smart = smart;
        self
    }

    pub fn with_disallowed_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallowed_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_label_length(mut self, max: usize) -> Self {
        self.max_label_length = max;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// True if `name` is on the disallowed list.
    pub fn is_disallowed_tag(&self, name: &[u8]) -> bool {
        self.disallowed_tags
            .iter()
            .any(|tag| tag.as_bytes().eq_ignore_ascii_case(name))
    }
}

/// Target renderers with a preset [`ParserProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    /// The CommonMark reference renderer.
    #[default]
    Cmark,
    GitHub,
    GitLab,
    Redcarpet,
    Commonmarker,
    Goldmark,
}

impl Flavor {
    pub const ALL: [Flavor; 6] = [
        Flavor::Cmark,
        Flavor::GitHub,
        Flavor::GitLab,
        Flavor::Redcarpet,
        Flavor::Commonmarker,
        Flavor::Goldmark,
    ];

    pub fn profile(self) -> ParserProfile {
        let base = ParserProfile::default();
        match self {
            Flavor::Cmark => base,
            Flavor::GitHub | Flavor::Commonmarker => base.with_disallowed_tags(GFM_DISALLOWED_TAGS.iter().copied()),
            Flavor::GitLab => base
                .with_disallowed_tags(GFM_DISALLOWED_TAGS.iter().copied())
                .with_strict(true),
            Flavor::Goldmark => base.with_strict(true),
            Flavor::Redcarpet => base.with_smart(true).with_strict(true),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Flavor::Cmark => "cmark",
            Flavor::GitHub => "github",
            Flavor::GitLab => "gitlab",
            Flavor::Redcarpet => "redcarpet",
            Flavor::Commonmarker => "commonmarker",
            Flavor::Goldmark => "goldmark",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized flavor name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flavor `{0}`")]
pub struct UnknownFlavor(pub String);

impl FromStr for Flavor {
    type Err = UnknownFlavor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cmark" | "commonmark" => Ok(Flavor::Cmark),
            "github" | "gfm" | "github.com" => Ok(Flavor::GitHub),
            "gitlab" | "glfm" | "gitlab.com" => Ok(Flavor::GitLab),
            "redcarpet" => Ok(Flavor::Redcarpet),
            "commonmarker" => Ok(Flavor::Commonmarker),
            "goldmark" => Ok(Flavor::Goldmark),
            _ => Err(UnknownFlavor(s.to_string())),
        }
    }
}
