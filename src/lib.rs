//! anchormark: heading text to anchor-source text
//!
//! A table of contents links each heading through an anchor derived from
//! the heading's plain text. This crate computes that plain text the way
//! a CommonMark renderer would: emphasis markers, link syntax, raw HTML
//! and code fences disappear; entities are decoded; escaped characters
//! stay literal.
//!
//! # Design Principles
//! - Single line, single pass: the CommonMark delimiter and bracket stacks
//! - Linear time on all inputs: `openers_bottom`, backtick and HTML caches
//! - Borrowed text: nodes point into the heading line where they can
//! - Per-flavor behavior is data ([`ParserProfile`]), not code paths
//!
//! # Example
//! ```
//! use anchormark::{resolve_anchor_source, Flavor, ReferenceMap};
//!
//! let profile = Flavor::GitHub.profile();
//! let text = resolve_anchor_source("*Fast* [setup](#setup) &amp; `run`", &profile, &ReferenceMap::new()).unwrap();
//! assert_eq!(text, "Fast setup & run");
//! ```

pub mod classify;
pub mod entity;
mod error;
pub mod inline;
pub mod limits;
pub mod link_ref;
pub mod profile;
pub mod range;
pub mod render;
pub mod view;

pub use error::{CoreError, Result};
pub use inline::{scan, InlineTree};
pub use link_ref::{LinkReference, ReferenceMap};
pub use profile::{Flavor, ParserProfile, UnknownFlavor};
pub use range::Range;
pub use render::AnchorWriter;
pub use view::TextView;

use tracing::{debug, trace};

/// Resolve one heading's raw text into its anchor-source text.
///
/// `raw_heading_text` is the heading content without the `#` markers or
/// surrounding whitespace. Soft breaks inside it are `\n`.
///
/// # Errors
/// - [`CoreError::EmptyLinkLabel`] when a strict profile would get an
///   empty (or all-whitespace) label
/// - [`CoreError::LabelTooLong`] when the label has more characters than
///   the profile's `max_label_length`
/// - [`CoreError::MalformedUnicode`] if scanning ever lands inside a
///   multi-byte scalar
pub fn resolve_anchor_source(
    raw_heading_text: &str,
    profile: &ParserProfile,
    refs: &ReferenceMap,
) -> Result<String> {
    trace!(
        len = raw_heading_text.len(),
        smart = profile.smart,
        strict = profile.strict,
        "resolving heading"
    );

    let tree = scan(raw_heading_text, profile, refs).inspect_err(|err| debug!(%err, "heading rejected"))?;
    let mut writer = AnchorWriter::with_capacity_for(raw_heading_text.len());
    writer.write_tree(&tree);
    let anchor = writer.into_string();

    check_label(&anchor, profile).inspect_err(|err| debug!(%err, "heading rejected"))?;
    Ok(anchor)
}

/// Byte-level entry point for callers reading raw file contents.
///
/// Invalid UTF-8 is reported as [`CoreError::MalformedUnicode`] at the
/// first offending byte.
pub fn resolve_anchor_source_bytes(
    raw_heading_text: &[u8],
    profile: &ParserProfile,
    refs: &ReferenceMap,
) -> Result<String> {
    let text = std::str::from_utf8(raw_heading_text).map_err(|err| CoreError::MalformedUnicode {
        position: err.valid_up_to(),
    })?;
    resolve_anchor_source(text, profile, refs)
}

fn check_label(anchor: &str, profile: &ParserProfile) -> Result<()> {
    if profile.strict && anchor.trim().is_empty() {
        return Err(CoreError::EmptyLinkLabel);
    }
    let length = anchor.chars().count();
    if length > profile.max_label_length {
        return Err(CoreError::LabelTooLong {
            length,
            max: profile.max_label_length,
        });
    }
    Ok(())
}
