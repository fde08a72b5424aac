//! Line breaks: two trailing spaces make a hard break, otherwise soft.

use crate::common::is_space;
use crate::inline::InlineState;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn newline(state: &mut InlineState<'_>, silent: bool) -> RuleResult {
    let mut pos = state.pos;
    if state.byte(pos) != b'\n' {
        return RuleResult::NoMatch;
    }

    if !silent {
        let pending = state.pending.as_bytes();
        let trailing = pending.iter().rev().take_while(|&&b| b == b' ').count();
        if trailing >= 2 {
            let keep = state.pending.len() - trailing;
            state.pending.truncate(keep);
            state.push("hardbreak", "br", Nesting::Leaf);
        } else {
            if trailing == 1 {
                state.pending.pop();
            }
            state.push("softbreak", "br", Nesting::Leaf);
        }
    }

    pos += 1;
    // Leading spaces of the next line are not content.
    while pos < state.pos_max && is_space(state.byte(pos)) {
        pos += 1;
    }
    state.pos = pos;
    RuleResult::Matched
}
