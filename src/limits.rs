//! DoS prevention constants.
//!
//! These limits keep every scan linear on pathological headings.

/// Longest backtick run that can open or close a code span (cmark:
/// 1000). Longer runs are always literal text.
pub const MAX_CODE_SPAN_BACKTICKS: usize = 1000;

/// Maximum parentheses nesting in link destinations (CommonMark: 32)
pub const MAX_LINK_PAREN_DEPTH: usize = 32;

/// Default maximum length of a link label (CommonMark: 999). Bytes when
/// scanning `[...]` labels, characters for the resolved anchor text.
pub const MAX_LINK_LABEL_LENGTH: usize = 999;

/// Shortest named entity accepted between `&` and `;`
pub const MIN_ENTITY_NAME_LENGTH: usize = 2;

/// Longest named entity accepted between `&` and `;`
pub const MAX_ENTITY_NAME_LENGTH: usize = 32;

/// Maximum digits in a numeric character reference
pub const MAX_NUMERIC_ENTITY_DIGITS: usize = 7;

/// Maximum length of an autolink URI scheme
pub const MAX_AUTOLINK_SCHEME_LENGTH: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_CODE_SPAN_BACKTICKS >= 16) };
        const { assert!(MAX_LINK_PAREN_DEPTH == 32) };
        const { assert!(MIN_ENTITY_NAME_LENGTH < MAX_ENTITY_NAME_LENGTH) };
        const { assert!(MAX_NUMERIC_ENTITY_DIGITS == 7) };
    }
}
