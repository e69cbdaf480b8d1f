//! Smart punctuation: dashes and ellipses. Quotes go through the
//! delimiter stack and are handled in `emphasis`.

use super::node::{NodeId, NodeValue};
use super::Subject;
use std::borrow::Cow;

const EM_DASH: &str = "—";
const EN_DASH: &str = "–";

/// Split a run of `n` hyphens into (en dashes, em dashes).
///
/// Homogeneous runs are preferred; otherwise em dashes come first and as
/// few en dashes as possible make up the rest.
pub fn dash_counts(n: usize) -> (usize, usize) {
    if n % 3 == 0 {
        (0, n / 3)
    } else if n % 2 == 0 {
        (n / 2, 0)
    } else if n % 3 == 2 {
        (1, (n - 2) / 3)
    } else {
        (2, (n - 4) / 3)
    }
}

impl<'a> Subject<'a, '_> {
    pub(super) fn handle_hyphen(&mut self) -> NodeId {
        let start = self.view.offset();
        let run = self.view.take_while(b'-');
        if run == 1 {
            return self.literal("-", start);
        }

        let (ens, ems) = dash_counts(run);
        let mut dashes = String::with_capacity((ens + ems) * 3);
        for _ in 0..ems {
            dashes.push_str(EM_DASH);
        }
        for _ in 0..ens {
            dashes.push_str(EN_DASH);
        }
        self.arena
            .alloc(NodeValue::Text(Cow::Owned(dashes)), self.view.range_from(start))
    }

    pub(super) fn handle_period(&mut self) -> NodeId {
        let start = self.view.offset();
        self.view.bump();
        if !self.view.eat(b'.') {
            return self.literal(".", start);
        }
        if self.view.eat(b'.') {
            self.literal("…", start)
        } else {
            self.literal("..", start)
        }
    }
}
