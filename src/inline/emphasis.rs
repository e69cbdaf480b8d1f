//! Emphasis and strong emphasis resolution.
//!
//! Walks the delimiter list left to right looking for closers, and for
//! each closer searches backward for the nearest compatible opener.
//! `openers_bottom` remembers, per delimiter class, how far down a
//! failed search already looked, so no stretch of the list is searched
//! twice for the same class and the pass stays linear.

use super::node::NodeValue;
use super::Subject;
use std::borrow::Cow;

/// Number of `openers_bottom` classes: `"`, `'`, `_`, and `*` by closer length mod 3.
const OPENER_CLASSES: usize = 6;

#[inline]
fn opener_class(ch: u8, run_length: u32) -> usize {
    match ch {
        b'"' => 0,
        b'\'' => 1,
        b'_' => 2,
        _ => 3 + (run_length % 3) as usize,
    }
}

/// The rule of 3: when either run could both open and close, the two
/// can only pair if their combined length is not a multiple of 3, unless
/// both lengths are multiples of 3.
#[inline]
pub(crate) fn violates_rule_of_three(
    opener_len: u32,
    opener_can_close: bool,
    closer_len: u32,
    closer_can_open: bool,
) -> bool {
    (closer_can_open || opener_can_close)
        && (opener_len + closer_len) % 3 == 0
        && !(opener_len % 3 == 0 && closer_len % 3 == 0)
}

impl<'a> Subject<'a, '_> {
    /// Match every delimiter at or above `floor` (a delimiter position),
    /// then drop them all from the stack.
    pub(super) fn process_emphasis(&mut self, floor: usize) {
        let mut openers_bottom = [floor; OPENER_CLASSES];

        // Lowest delimiter at or above the floor
        let mut closer = None;
        let mut candidate = self.last_delim;
        while let Some(c) = candidate {
            if self.delimiters[c].position < floor {
                break;
            }
            closer = Some(c);
            candidate = self.delimiters[c].prev;
        }

        while let Some(c) = closer {
            if !self.delimiters[c].can_close {
                closer = self.delimiters[c].next;
                continue;
            }

            let ch = self.delimiters[c].ch;
            let ix = opener_class(ch, self.delimiters[c].run_length);

            let mut opener = self.delimiters[c].prev;
            let mut opener_found = false;
            let mut mod_three_rule_invoked = false;
            while let Some(o) = opener {
                let od = &self.delimiters[o];
                if od.position < openers_bottom[ix] {
                    break;
                }
                if od.can_open && od.ch == ch {
                    let cd = &self.delimiters[c];
                    if !violates_rule_of_three(od.run_length, od.can_close, cd.run_length, cd.can_open) {
                        opener_found = true;
                        break;
                    }
                    mod_three_rule_invoked = true;
                }
                opener = od.prev;
            }

            let old_closer = c;
            match (ch, opener) {
                (b'*' | b'_', Some(o)) if opener_found => {
                    closer = self.insert_emph(o, c);
                }
                (b'*' | b'_', _) => {
                    closer = self.delimiters[c].next;
                }
                (_, opener) => {
                    closer = self.delimiters[c].next;
                    if let Some(o) = opener.filter(|_| opener_found) {
                        let (left, right) = if ch == b'\'' { ("‘", "’") } else { ("“", "”") };
                        self.set_delimiter_text(o, left);
                        self.set_delimiter_text(c, right);
                        self.remove_delimiter(o);
                        self.remove_delimiter(c);
                    } else if ch == b'\'' {
                        self.set_delimiter_text(c, "’");
                    } else {
                        self.set_delimiter_text(c, "”");
                    }
                }
            }

            if !opener_found {
                if !mod_three_rule_invoked {
                    openers_bottom[ix] = self.delimiters[old_closer].position;
                }
                // A closer with no opener that can't open is plain text from here on
                if !self.delimiters[old_closer].can_open {
                    self.remove_delimiter(old_closer);
                }
            }
        }

        self.remove_delimiters(floor);
    }

    /// Pair `opener` with `closer`, wrapping the nodes between them in an
    /// emphasis node. Returns the next closer to examine.
    fn insert_emph(&mut self, opener: usize, closer: usize) -> Option<usize> {
        let use_delims = if self.delimiters[opener].remaining >= 2 && self.delimiters[closer].remaining >= 2 {
            2
        } else {
            1
        };

        self.consume_opener(opener, use_delims);
        self.consume_closer(closer, use_delims);

        // Delimiters between the pair were already scanned and matched nothing
        let mut between = self.delimiters[closer].prev;
        while let Some(d) = between {
            if d == opener {
                break;
            }
            between = self.delimiters[d].prev;
            self.remove_delimiter(d);
        }

        let opener_node = self.delimiters[opener].node;
        let closer_node = self.delimiters[closer].node;
        // Both runs have shrunk, so this span covers the consumed characters
        let start = self.arena.get(opener_node).span.end;
        let end = self.arena.get(closer_node).span.start;
        let value = if use_delims == 1 { NodeValue::Emph } else { NodeValue::Strong };
        let emph = self.arena.alloc(value, crate::Range::new(start, end));
        self.arena.adopt_between(emph, opener_node, Some(closer_node));
        self.arena.insert_after(opener_node, emph);

        if self.delimiters[opener].remaining == 0 {
            self.arena.detach(opener_node);
            self.remove_delimiter(opener);
        }

        if self.delimiters[closer].remaining == 0 {
            self.arena.detach(closer_node);
            let next = self.delimiters[closer].next;
            self.remove_delimiter(closer);
            next
        } else {
            Some(closer)
        }
    }

    fn set_delimiter_text(&mut self, id: usize, text: &'static str) {
        let node = self.delimiters[id].node;
        self.arena.get_mut(node).value = NodeValue::Text(Cow::Borrowed(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::scan;
    use crate::{ParserProfile, Range, ReferenceMap};

    fn strip(line: &str) -> String {
        scan(line, &ParserProfile::default(), &ReferenceMap::new())
            .unwrap()
            .strip_ignored()
    }

    #[test]
    fn test_rule_of_three_predicate() {
        // `*foo**bar*`: the inner `**` can open and close, 1 + 2 is a multiple of 3
        assert!(violates_rule_of_three(1, false, 2, true));
        // Both multiples of 3 may pair
        assert!(!violates_rule_of_three(3, true, 3, true));
        // Neither run is ambiguous
        assert!(!violates_rule_of_three(1, false, 2, false));
        assert!(!violates_rule_of_three(2, false, 2, true));
    }

    #[test]
    fn test_simple_and_strong() {
        assert_eq!(strip("*a*"), "a");
        assert_eq!(strip("**a**"), "a");
        assert_eq!(strip("***a***"), "a");
        assert_eq!(strip("_a_ __b__"), "a b");
    }

    #[test]
    fn test_mismatched_runs_leave_leftovers() {
        assert_eq!(strip("**a*"), "*a");
        assert_eq!(strip("*a**"), "a*");
        assert_eq!(strip("** a *"), "** a *");
    }

    #[test]
    fn test_rule_of_three() {
        assert_eq!(strip("*foo**bar*"), "foo**bar");
        assert_eq!(strip("*foo**bar**baz*"), "foobarbaz");
        assert_eq!(strip("**foo*bar*baz**"), "foobarbaz");
        assert_eq!(strip("foo***bar***baz"), "foobarbaz");
        assert_eq!(strip("foo******bar*********baz"), "foobar***baz");
    }

    #[test]
    fn test_mixed_characters_do_not_pair() {
        assert_eq!(strip("*a_"), "*a_");
        assert_eq!(strip("_a*"), "_a*");
        assert_eq!(strip("*a _b* c_"), "a _b c_");
    }

    #[test]
    fn test_intraword_underscore_is_literal() {
        assert_eq!(strip("snake_case_name"), "snake_case_name");
        assert_eq!(strip("foo*bar*"), "foobar");
    }

    #[test]
    fn test_ignore_ranges_for_nested() {
        let tree = scan("***a** b*", &ParserProfile::default(), &ReferenceMap::new()).unwrap();
        assert_eq!(
            tree.ignore_ranges(),
            &[Range::new(0, 3), Range::new(4, 6), Range::new(8, 9)]
        );
    }

    #[test]
    fn test_openers_bottom_with_long_input() {
        // Many unmatched closers followed by one real pair
        let mut line = "a* ".repeat(2000);
        line.push_str("*x*");
        let stripped = strip(&line);
        assert!(stripped.ends_with("x"));
        assert_eq!(stripped.matches('*').count(), 2000);
    }
}
