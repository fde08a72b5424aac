//! Thematic breaks: `***`, `---`, `___`.

use crate::block::BlockState;
use crate::common::is_space;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn hr(
    state: &mut BlockState<'_>,
    start_line: usize,
    _end_line: usize,
    silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent >= 4 {
        return RuleResult::NoMatch;
    }

    let max = state.e_marks[start_line];
    let mut pos = state.b_marks[start_line] + state.t_shift[start_line];
    let marker = state.byte(pos);
    if !matches!(marker, b'*' | b'-' | b'_') {
        return RuleResult::NoMatch;
    }
    pos += 1;

    let mut count = 1;
    while pos < max {
        let ch = state.byte(pos);
        pos += 1;
        if ch != marker && !is_space(ch) {
            return RuleResult::NoMatch;
        }
        if ch == marker {
            count += 1;
        }
    }

    if count < 3 {
        return RuleResult::NoMatch;
    }
    if silent {
        return RuleResult::Matched;
    }

    state.line = start_line + 1;
    let token = state.push("hr", "hr", Nesting::Leaf);
    token.map = Some(Span::new(start_line, start_line + 1));
    token.markup = (marker as char).to_string().repeat(count);
    RuleResult::Matched
}
