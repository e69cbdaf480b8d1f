//! Error types for anchor-source resolution.

use thiserror::Error;

/// Errors that abort resolution of a single heading.
///
/// State is never shared between headings, so a caller can report the
/// error and keep going with the next heading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The input is not a sequence of whole Unicode scalars at `position`.
    #[error("malformed unicode at byte offset {position}")]
    MalformedUnicode { position: usize },

    /// The heading would produce an empty anchor label under a strict flavor.
    #[error("heading produces an empty anchor label")]
    EmptyLinkLabel,

    /// The anchor label exceeds the flavor's maximum link-label length.
    #[error("anchor label is {length} characters long, maximum is {max}")]
    LabelTooLong { length: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
