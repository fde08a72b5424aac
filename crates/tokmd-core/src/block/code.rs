//! Indented code blocks.

use crate::block::BlockState;
use crate::span::Span;
use crate::token::Nesting;
use crate::RuleResult;

pub(crate) fn code(
    state: &mut BlockState<'_>,
    start_line: usize,
    end_line: usize,
    _silent: bool,
) -> RuleResult {
    if state.s_count[start_line] - state.blk_indent < 4 {
        return RuleResult::NoMatch;
    }

    let mut next_line = start_line + 1;
    let mut last = next_line;
    while next_line < end_line {
        if state.is_empty(next_line) {
            next_line += 1;
            continue;
        }
        if state.s_count[next_line] - state.blk_indent >= 4 {
            next_line += 1;
            last = next_line;
            continue;
        }
        break;
    }

    state.line = last;
    let content = state.get_lines(start_line, last, 4 + state.blk_indent as usize, false) + "\n";
    let token = state.push("code_block", "code", Nesting::Leaf);
    token.content = content;
    token.map = Some(Span::new(start_line, last));
    RuleResult::Matched
}
